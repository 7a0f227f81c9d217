use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::candle::Candle;

const BODY: &str = "█";
const WICK: &str = "│";

/// Terminal candlestick chart. Expects candles sorted ascending by bucket.
pub struct CandleChart<'a> {
    candles: &'a [Candle],
    symbol: &'a str,
    current_price: Option<f64>,
}

impl<'a> CandleChart<'a> {
    pub fn new(candles: &'a [Candle], symbol: &'a str) -> Self {
        Self {
            candles,
            symbol,
            current_price: None,
        }
    }

    pub fn current_price(mut self, price: Option<f64>) -> Self {
        self.current_price = price;
        self
    }
}

/// Map `price` into a row offset from the top of a `height`-row plot.
fn price_row(price: f64, min: f64, range: f64, height: usize) -> usize {
    let normalized = ((price - min) / range).clamp(0.0, 1.0);
    let from_bottom = (normalized * (height - 1) as f64).round() as usize;
    height - 1 - from_bottom.min(height - 1)
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Candles ({}) ", self.symbol))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.candles.is_empty() || inner.height < 3 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height as usize;
        // Two columns per candle: body plus a gap.
        let max_visible = (inner.width as usize / 2).max(1);
        let start = self.candles.len().saturating_sub(max_visible);
        let visible = &self.candles[start..];

        let min_price = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max_price = visible
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max_price - min_price;
        let range = if range < 0.01 { 1.0 } else { range };

        for (i, candle) in visible.iter().enumerate() {
            let x = inner.x + (i * 2) as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let color = if candle.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };
            let style = Style::default().fg(color);

            let high_row = price_row(candle.high, min_price, range, chart_height);
            let low_row = price_row(candle.low, min_price, range, chart_height);
            let body_top = price_row(candle.open.max(candle.close), min_price, range, chart_height);
            let body_bottom =
                price_row(candle.open.min(candle.close), min_price, range, chart_height);

            for row in high_row..=low_row {
                let symbol = if (body_top..=body_bottom).contains(&row) {
                    BODY
                } else {
                    WICK
                };
                buf.set_string(x, inner.y + row as u16, symbol, style);
            }
        }

        // Axis labels
        let label_style = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format!("{:.2}", max_price), label_style);
        buf.set_string(
            inner.x,
            inner.y + inner.height - 1,
            format!("{:.2}", min_price),
            label_style,
        );
        if let Some(price) = self.current_price {
            let label = format!("{:.2}", price);
            let width = label.len() as u16;
            if width < inner.width {
                let row = price_row(price, min_price, range, chart_height);
                buf.set_string(
                    inner.x + inner.width - width,
                    inner.y + row as u16,
                    label,
                    Style::default().fg(Color::Cyan),
                );
            }
        }
    }
}
