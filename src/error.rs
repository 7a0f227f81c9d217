use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("bucket width must be > 0 seconds, got {0}")]
    NonPositiveBucketWidth(i64),

    #[error("tick interval must be > 0 ms")]
    ZeroTickInterval,

    #[error("{name} multiplier must be a finite value > 0, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },

    #[error("price floor must be a finite value >= 0, got {0}")]
    InvalidPriceFloor(f64),

    #[error("initial price must be finite and >= price floor ({floor}), got {price}")]
    InvalidInitialPrice { price: f64, floor: f64 },

    #[error("max step must be a finite value > 0, got {0}")]
    InvalidMaxStep(f64),
}
