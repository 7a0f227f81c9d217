use std::fmt;

/// User action that moves the current price out of cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shock {
    Buy,
    Sell,
}

impl fmt::Display for Shock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shock::Buy => write!(f, "BUY"),
            Shock::Sell => write!(f, "SELL"),
        }
    }
}
