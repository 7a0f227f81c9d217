use crate::model::candle::{BucketWidth, Candle};
use crate::model::tick::Tick;
use crate::sink::ChartSink;

/// Folds ticks into a sorted, deduplicated series of fixed-width candles and
/// republishes the whole series to its sink after every fold.
///
/// The series always holds at least the seed candle. Keys (`bucket_start`)
/// are unique and ascending after every mutation.
#[derive(Debug)]
pub struct CandleAggregator<S> {
    width: BucketWidth,
    candles: Vec<Candle>,
    sink: S,
}

impl<S: ChartSink> CandleAggregator<S> {
    /// Start a series with one flat candle at `seed.price` and publish it.
    pub fn new(width: BucketWidth, seed: Tick, mut sink: S) -> Self {
        let candles = vec![Candle::seed(width.bucket_start(seed.timestamp), seed.price)];
        sink.set_data(&candles);
        Self {
            width,
            candles,
            sink,
        }
    }

    pub fn fold(&mut self, tick: Tick) -> Option<&Candle> {
        self.fold_at(tick.timestamp, tick.price)
    }

    /// Fold one observation and return the candle it landed in.
    ///
    /// Existing bucket: high/low/close move, open stays. New bucket: opens at
    /// the close of the latest candle before this fold. Late ticks update
    /// their historical bucket in place.
    ///
    /// NaN and infinite prices are dropped: the series is left untouched,
    /// nothing is published and `None` is returned.
    pub fn fold_at(&mut self, timestamp: i64, price: f64) -> Option<&Candle> {
        if !price.is_finite() {
            tracing::warn!(timestamp, price, "dropping non-finite price");
            return None;
        }
        let bucket_start = self.width.bucket_start(timestamp);

        let candle = match self.candles.iter().find(|c| c.bucket_start == bucket_start) {
            Some(existing) => {
                let mut updated = *existing;
                updated.update(price);
                updated
            }
            None => {
                let open = self
                    .candles
                    .last()
                    .map(|c| c.close)
                    .unwrap_or(price);
                tracing::debug!(bucket_start, open, price, "opening candle");
                Candle::opened_from(bucket_start, open, price)
            }
        };

        // Replace-or-append, then restore order unconditionally.
        self.candles.retain(|c| c.bucket_start != bucket_start);
        self.candles.push(candle);
        self.candles.sort_by_key(|c| c.bucket_start);

        self.sink.set_data(&self.candles);

        let index = self
            .candles
            .binary_search_by_key(&bucket_start, |c| c.bucket_start)
            .unwrap_or(self.candles.len() - 1);
        Some(&self.candles[index])
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Candle with the highest `bucket_start`.
    pub fn last(&self) -> &Candle {
        // Seeded in `new` and never drained.
        &self.candles[self.candles.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn width(&self) -> BucketWidth {
        self.width
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
