use crate::error::ConfigError;

/// Width of a candle bucket in seconds. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketWidth(i64);

impl BucketWidth {
    pub fn new(seconds: i64) -> Result<Self, ConfigError> {
        if seconds <= 0 {
            return Err(ConfigError::NonPositiveBucketWidth(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    /// Floor `timestamp` (unix seconds) to the start of its bucket.
    /// Negative timestamps floor toward negative infinity; the lowest bucket,
    /// whose true start is below `i64::MIN`, saturates to `i64::MIN`.
    pub fn bucket_start(&self, timestamp: i64) -> i64 {
        timestamp.saturating_sub(timestamp.rem_euclid(self.0))
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self(60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub bucket_start: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Flat candle where every field equals `price`.
    pub fn seed(bucket_start: i64, price: f64) -> Self {
        Self {
            bucket_start,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// New bucket that opens at the previous close and has seen one trade at `price`.
    pub fn opened_from(bucket_start: i64, open: f64, price: f64) -> Self {
        Self {
            bucket_start,
            open,
            high: open.max(price),
            low: open.min(price),
            close: price,
        }
    }

    /// Fold a trade price into this candle. `open` never changes.
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// `low <= open, close <= high`.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
    }
}
