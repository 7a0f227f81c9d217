use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::aggregator::CandleAggregator;
use crate::config::TickerConfig;
use crate::error::ConfigError;
use crate::event::AppEvent;
use crate::model::candle::{BucketWidth, Candle};
use crate::model::shock::Shock;
use crate::model::tick::Tick;
use crate::sink::ChartSink;
use crate::ticker::PriceTicker;

const SHOCK_QUEUE_LEN: usize = 16;

/// Source of unix-second timestamps for emitted ticks.
pub trait Clock: Send + 'static {
    fn now_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + 'static,
{
    fn now_secs(&self) -> i64 {
        self()
    }
}

/// Price source and candle series, stepped together.
#[derive(Debug)]
pub struct Simulation<S, R = StdRng> {
    ticker: PriceTicker<R>,
    aggregator: CandleAggregator<S>,
}

impl<S: ChartSink, R: Rng> Simulation<S, R> {
    /// Seed the series with the configured initial price at `now`.
    pub fn new(
        config: &TickerConfig,
        width: BucketWidth,
        now: i64,
        sink: S,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let ticker = PriceTicker::new(config, rng)?;
        Ok(Self::from_ticker(ticker, width, now, sink))
    }

    /// Seed the series with the ticker's current price at `now`.
    pub fn from_ticker(ticker: PriceTicker<R>, width: BucketWidth, now: i64, sink: S) -> Self {
        let aggregator = CandleAggregator::new(width, Tick::new(now, ticker.price()), sink);
        Self { ticker, aggregator }
    }

    /// Advance the price and fold the resulting tick.
    pub fn step(&mut self, now: i64) -> (Tick, Candle) {
        let tick = self.ticker.advance(now);
        let candle = self
            .aggregator
            .fold(tick)
            .copied()
            .unwrap_or_else(|| *self.aggregator.last());
        (tick, candle)
    }

    /// Shocks only touch the price; the series sees them on the next step.
    pub fn shock(&mut self, shock: Shock) -> f64 {
        self.ticker.apply(shock)
    }

    pub fn price(&self) -> f64 {
        self.ticker.price()
    }

    pub fn ticker(&self) -> &PriceTicker<R> {
        &self.ticker
    }

    pub fn aggregator(&self) -> &CandleAggregator<S> {
        &self.aggregator
    }
}

fn emit(events: &mpsc::Sender<AppEvent>, event: AppEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!("Event channel full, dropping event");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!("Event channel closed");
        }
    }
}

/// Drive `sim` every `tick_interval` until `shutdown` flips to true or its
/// sender is dropped. The first step happens one full interval after start.
pub async fn run<S, R, C>(
    mut sim: Simulation<S, R>,
    clock: C,
    tick_interval: Duration,
    mut shocks: mpsc::Receiver<Shock>,
    events: mpsc::Sender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> Simulation<S, R>
where
    S: ChartSink,
    R: Rng,
    C: Clock,
{
    let mut interval = tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_ms = tick_interval.as_millis() as u64,
        bucket_width = sim.aggregator.width().seconds(),
        price = sim.price(),
        "Simulator started"
    );
    emit(
        &events,
        AppEvent::LogMessage(format!(
            "Simulator started @ {:.2} | every {}ms",
            sim.price(),
            tick_interval.as_millis()
        )),
    );

    while !*shutdown.borrow() {
        tokio::select! {
            _ = interval.tick() => {
                let (tick, candle) = sim.step(clock.now_secs());
                tracing::debug!(
                    timestamp = tick.timestamp,
                    price = tick.price,
                    bucket_start = candle.bucket_start,
                    "Folded tick"
                );
                emit(&events, AppEvent::Tick {
                    tick,
                    candle,
                    candles: sim.aggregator.len(),
                });
            }
            Some(shock) = shocks.recv() => {
                let price = sim.shock(shock);
                tracing::info!(%shock, price, "Shock applied");
                emit(&events, AppEvent::ShockApplied { shock, price });
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(candles = sim.aggregator.len(), "Simulator stopped");
    emit(&events, AppEvent::SimulatorStopped);
    sim
}

/// Owns the running simulator task. Dropping the handle without `stop`
/// closes the shutdown channel, which also ends the task.
#[derive(Debug)]
pub struct SimulatorHandle<S, R = StdRng> {
    shutdown_tx: watch::Sender<bool>,
    shock_tx: mpsc::Sender<Shock>,
    join: JoinHandle<Simulation<S, R>>,
}

pub fn spawn<S, R, C>(
    sim: Simulation<S, R>,
    clock: C,
    tick_interval: Duration,
    events: mpsc::Sender<AppEvent>,
) -> SimulatorHandle<S, R>
where
    S: ChartSink + Send + 'static,
    R: Rng + Send + 'static,
    C: Clock,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (shock_tx, shock_rx) = mpsc::channel(SHOCK_QUEUE_LEN);
    let join = tokio::spawn(run(sim, clock, tick_interval, shock_rx, events, shutdown_rx));
    SimulatorHandle {
        shutdown_tx,
        shock_tx,
        join,
    }
}

impl<S, R> SimulatorHandle<S, R> {
    /// Queue a shock. Returns false if the queue is full or the task has ended.
    pub fn shock(&self, shock: Shock) -> bool {
        match self.shock_tx.try_send(shock) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%shock, error = %e, "Failed to enqueue shock");
                false
            }
        }
    }

    pub fn shutdown_sender(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal shutdown and wait for the task to hand back the simulation.
    pub async fn stop(self) -> Result<Simulation<S, R>> {
        self.shutdown_tx.send_replace(true);
        self.join.await.context("simulator task failed")
    }
}
