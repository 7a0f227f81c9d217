pub mod chart;
pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::AppEvent;
use crate::model::candle::Candle;
use crate::model::shock::Shock;

use chart::CandleChart;
use dashboard::{KeybindBar, LogPanel, PricePanel, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub symbol: String,
    pub bucket_width_seconds: i64,
    pub candles: Vec<Candle>,
    pub price: Option<f64>,
    pub last_shock: Option<Shock>,
    pub tick_count: u64,
    pub running: bool,
    pub log_messages: Vec<String>,
    series_len: usize,
}

impl AppState {
    pub fn new(symbol: &str, bucket_width_seconds: i64) -> Self {
        Self {
            symbol: symbol.to_string(),
            bucket_width_seconds,
            candles: Vec::new(),
            price: None,
            last_shock: None,
            tick_count: 0,
            running: true,
            log_messages: Vec::new(),
            series_len: 1,
        }
    }

    pub fn last_candle(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Latest price: the last tick or shock, else the newest close.
    pub fn last_price(&self) -> Option<f64> {
        self.price.or_else(|| self.last_candle().map(|c| c.close))
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Replace the chart series with the latest published snapshot.
    pub fn set_candles(&mut self, candles: Vec<Candle>) {
        self.candles = candles;
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick {
                tick,
                candle,
                candles,
            } => {
                self.tick_count += 1;
                self.price = Some(tick.price);
                if candles > self.series_len {
                    self.push_log(format!(
                        "New candle @ {} open {:.2}",
                        candle.bucket_start, candle.open
                    ));
                }
                self.series_len = candles;
            }
            AppEvent::ShockApplied { shock, price } => {
                self.last_shock = Some(shock);
                self.price = Some(price);
                self.push_log(format!("{} -> {:.2}", shock, price));
            }
            AppEvent::SimulatorStopped => {
                self.running = false;
                self.push_log("[WARN] Simulator stopped".to_string());
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // chart + price panel
            Constraint::Length(6), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol: &state.symbol,
            running: state.running,
            tick_count: state.tick_count,
            bucket_width_seconds: state.bucket_width_seconds,
            candle_count: state.candles.len(),
        },
        outer[0],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(24)])
        .split(outer[1]);

    let current_price = state.last_price();
    frame.render_widget(
        CandleChart::new(&state.candles, &state.symbol).current_price(current_price),
        main_area[0],
    );
    frame.render_widget(
        PricePanel::new(current_price, state.last_candle(), state.last_shock),
        main_area[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[2]);
    frame.render_widget(KeybindBar, outer[3]);
}
