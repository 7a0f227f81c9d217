use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use candle_sim::config::TickerConfig;
use candle_sim::event::AppEvent;
use candle_sim::model::candle::BucketWidth;
use candle_sim::model::shock::Shock;
use candle_sim::simulator::{self, Simulation};
use candle_sim::sink::{RecordingSink, WatchSink};

fn sim(width: i64) -> Simulation<RecordingSink> {
    Simulation::new(
        &TickerConfig::default(),
        BucketWidth::new(width).unwrap(),
        0,
        RecordingSink::new(),
        StdRng::seed_from_u64(7),
    )
    .unwrap()
}

fn paused_clock() -> impl Fn() -> i64 + Send + 'static {
    let origin = tokio::time::Instant::now();
    move || origin.elapsed().as_secs() as i64
}

#[tokio::test(start_paused = true)]
/// Verifies cadence and cancellation:
/// three intervals produce three folds and publishes, and stop ends the task.
async fn publishes_once_per_tick_until_stopped() {
    let (events_tx, mut events_rx) = mpsc::channel(64);
    let handle = simulator::spawn(sim(1), paused_clock(), Duration::from_millis(1000), events_tx);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let sim = handle.stop().await.expect("simulator should stop cleanly");

    // Seed publish plus one per tick.
    assert_eq!(sim.aggregator().sink().publishes(), 4);
    let starts: Vec<i64> = sim
        .aggregator()
        .candles()
        .iter()
        .map(|c| c.bucket_start)
        .collect();
    assert_eq!(starts, vec![0, 1, 2, 3]);

    let mut ticks = 0;
    let mut stopped = false;
    let mut first = None;
    while let Some(event) = events_rx.recv().await {
        if first.is_none() {
            first = Some(event.clone());
        }
        match event {
            AppEvent::Tick { .. } => ticks += 1,
            AppEvent::SimulatorStopped => stopped = true,
            _ => {}
        }
    }
    match first {
        Some(AppEvent::LogMessage(msg)) => {
            assert!(msg.starts_with("Simulator started @ 150.00"), "{}", msg)
        }
        other => panic!("expected startup log line first, got {:?}", other),
    }
    assert_eq!(ticks, 3);
    assert!(stopped);
}

#[tokio::test(start_paused = true)]
/// Verifies shocks are applied out of cadence without publishing,
/// and the next scheduled tick starts from the shocked price.
async fn shock_is_visible_on_next_tick() {
    let (events_tx, mut events_rx) = mpsc::channel(64);
    let handle = simulator::spawn(sim(60), paused_clock(), Duration::from_millis(1000), events_tx);

    assert!(handle.shock(Shock::Buy));
    assert!(matches!(events_rx.recv().await, Some(AppEvent::LogMessage(_))));
    match events_rx.recv().await {
        Some(AppEvent::ShockApplied { shock, price }) => {
            assert_eq!(shock, Shock::Buy);
            assert!((price - 157.5).abs() < 1e-9);
        }
        other => panic!("expected shock event, got {:?}", other),
    }

    match events_rx.recv().await {
        Some(AppEvent::Tick { tick, candle, candles }) => {
            assert!((tick.price - 157.5).abs() <= 1.0);
            assert_eq!(candle.bucket_start, 0);
            assert_eq!(candles, 1);
        }
        other => panic!("expected tick event, got {:?}", other),
    }

    let sim = handle.stop().await.expect("simulator should stop cleanly");
    assert_eq!(sim.aggregator().sink().publishes(), 2);
    // Seed open is untouched by the shock.
    assert!((sim.aggregator().candles()[0].open - 150.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn watch_sink_feeds_receivers() {
    let (sink, mut rx) = WatchSink::channel();
    let sim = Simulation::new(
        &TickerConfig::default(),
        BucketWidth::new(1).unwrap(),
        0,
        sink,
        StdRng::seed_from_u64(3),
    )
    .unwrap();
    assert_eq!(rx.borrow_and_update().len(), 1);

    let (events_tx, _events_rx) = mpsc::channel(64);
    let handle = simulator::spawn(sim, paused_clock(), Duration::from_millis(1000), events_tx);

    rx.changed().await.expect("sink should publish");
    assert_eq!(rx.borrow_and_update().len(), 2);

    handle.stop().await.expect("simulator should stop cleanly");
}

#[tokio::test(start_paused = true)]
async fn shutdown_sender_stops_task() {
    let (events_tx, _events_rx) = mpsc::channel(64);
    let handle = simulator::spawn(sim(60), paused_clock(), Duration::from_millis(1000), events_tx);
    handle
        .shutdown_sender()
        .send(true)
        .expect("task should still be listening");
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(handle.is_finished());
    let sim = handle.stop().await.expect("joined");
    assert_eq!(sim.aggregator().sink().publishes(), 1);
}
