/// One price observation. `timestamp` is unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub timestamp: i64,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }
}
