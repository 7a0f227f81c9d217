use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::Event;
use tokio::sync::mpsc;

use candle_sim::config::Config;
use candle_sim::event::AppEvent;
use candle_sim::input::{parse_main_command, UiCommand};
use candle_sim::simulator::{self, Simulation, SystemClock};
use candle_sim::sink::WatchSink;
use candle_sim::ticker::PriceTicker;
use candle_sim::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Check config/default.toml or the file named by CANDLE_SIM_CONFIG");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("failed to create {}", config.logging.file))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let width = config
        .chart
        .bucket_width()
        .context("validated chart.bucket_width_seconds became invalid at runtime")?;

    tracing::info!(
        symbol = %config.ui.symbol,
        bucket_width = width.seconds(),
        tick_interval_ms = config.ticker.tick_interval_ms,
        initial_price = config.ticker.initial_price,
        "Starting candle-sim"
    );

    // Channels
    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (sink, mut candles_rx) = WatchSink::channel();

    let ticker = PriceTicker::from_entropy(&config.ticker).context("invalid ticker settings")?;
    let sim = Simulation::from_ticker(ticker, width, chrono::Utc::now().timestamp(), sink);
    let handle = simulator::spawn(sim, SystemClock, config.ticker.tick_interval(), app_tx);

    // Ctrl+C handler
    let ctrl_c_shutdown = handle.shutdown_sender();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(&config.ui.symbol, width.seconds());
    app_state.set_candles(candles_rx.borrow_and_update().clone());
    app_state.push_log(format!(
        "candle-sim started | {} | bucket {}s",
        config.ui.symbol,
        width.seconds()
    ));

    let draw_result = loop {
        if candles_rx.has_changed().unwrap_or(false) {
            app_state.set_candles(candles_rx.borrow_and_update().clone());
        }
        while let Ok(event) = app_rx.try_recv() {
            app_state.apply(event);
        }

        if let Err(e) = terminal.draw(|frame| ui::render(frame, &app_state)) {
            break Err(e).context("failed to draw frame");
        }

        // Handle input (non-blocking with timeout)
        match crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms)) {
            Ok(true) => match crossterm::event::read() {
                Ok(Event::Key(key)) => match parse_main_command(&key.code) {
                    Some(UiCommand::Quit) => {
                        tracing::info!("User quit");
                        break Ok(());
                    }
                    Some(UiCommand::Shock(shock)) => {
                        if !handle.shock(shock) {
                            app_state.push_log(format!("[WARN] {} dropped", shock));
                        }
                    }
                    None => {}
                },
                Ok(_) => {}
                Err(e) => break Err(e).context("failed to read terminal event"),
            },
            Ok(false) => {}
            Err(e) => break Err(e).context("failed to poll terminal events"),
        }

        if handle.is_finished() {
            break Ok(());
        }
    };

    ratatui::restore();

    let sim = handle.stop().await?;
    tracing::info!(
        candles = sim.aggregator().len(),
        price = sim.price(),
        "Shutdown complete"
    );
    println!(
        "Goodbye! {} candles, last price {:.2}. Check {} for details.",
        sim.aggregator().len(),
        sim.price(),
        config.logging.file
    );
    draw_result
}
