use tokio::sync::watch;

use crate::model::candle::Candle;

/// Downstream consumer of the candle series.
///
/// `set_data` replaces whatever the sink held before. Callers always pass a
/// series sorted ascending by `bucket_start` with unique keys, so sinks do not
/// re-validate it.
pub trait ChartSink {
    fn set_data(&mut self, candles: &[Candle]);
}

impl<F> ChartSink for F
where
    F: FnMut(&[Candle]),
{
    fn set_data(&mut self, candles: &[Candle]) {
        self(candles)
    }
}

/// Keeps the most recent snapshot and counts publishes.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    last: Vec<Candle>,
    publishes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &[Candle] {
        &self.last
    }

    pub fn publishes(&self) -> usize {
        self.publishes
    }
}

impl ChartSink for RecordingSink {
    fn set_data(&mut self, candles: &[Candle]) {
        self.last.clear();
        self.last.extend_from_slice(candles);
        self.publishes += 1;
    }
}

/// Publishes snapshots into a `watch` channel for the terminal chart.
#[derive(Debug)]
pub struct WatchSink {
    tx: watch::Sender<Vec<Candle>>,
}

impl WatchSink {
    pub fn channel() -> (Self, watch::Receiver<Vec<Candle>>) {
        let (tx, rx) = watch::channel(Vec::new());
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Candle>> {
        self.tx.subscribe()
    }
}

impl ChartSink for WatchSink {
    fn set_data(&mut self, candles: &[Candle]) {
        // send_replace succeeds even with no live receivers.
        self.tx.send_replace(candles.to_vec());
    }
}
