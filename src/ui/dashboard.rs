use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::model::candle::Candle;
use crate::model::shock::Shock;

pub struct PricePanel<'a> {
    price: Option<f64>,
    last_candle: Option<&'a Candle>,
    last_shock: Option<Shock>,
}

impl<'a> PricePanel<'a> {
    pub fn new(price: Option<f64>, last_candle: Option<&'a Candle>, last_shock: Option<Shock>) -> Self {
        Self {
            price,
            last_candle,
            last_shock,
        }
    }
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let fmt_price = |v: Option<f64>| {
            v.map(|p| format!(" {:.2}", p))
                .unwrap_or_else(|| " ---".to_string())
        };

        let price_color = match self.last_candle {
            Some(c) if c.is_bullish() => Color::Green,
            Some(_) => Color::Red,
            None => Color::White,
        };
        let (shock_str, shock_color) = match self.last_shock {
            Some(Shock::Buy) => ("BUY", Color::Green),
            Some(Shock::Sell) => ("SELL", Color::Red),
            None => ("---", Color::DarkGray),
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Price:", label),
                Span::styled(
                    fmt_price(self.price),
                    Style::default()
                        .fg(price_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Shock:", label),
                Span::styled(format!(" {}", shock_str), Style::default().fg(shock_color)),
            ]),
        ];
        if let Some(c) = self.last_candle {
            lines.push(Line::from(vec![
                Span::styled("O:", label),
                Span::styled(fmt_price(Some(c.open)), value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("H:", label),
                Span::styled(fmt_price(Some(c.high)), value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("L:", label),
                Span::styled(fmt_price(Some(c.low)), value),
            ]));
            lines.push(Line::from(vec![
                Span::styled("C:", label),
                Span::styled(fmt_price(Some(c.close)), value),
            ]));
        }

        let block = Block::default()
            .title(" Trading Terminal ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;

        let start = self.messages.len().saturating_sub(inner_height);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub running: bool,
    pub tick_count: u64,
    pub bucket_width_seconds: i64,
    pub candle_count: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let run_status = if self.running {
            Span::styled(" RUNNING ", Style::default().fg(Color::Green))
        } else {
            Span::styled(
                " STOPPED ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        };
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));

        let line = Line::from(vec![
            Span::styled(
                " candle-sim ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.symbol, Style::default().fg(Color::Cyan)),
            sep(),
            run_status,
            sep(),
            Span::styled(
                format!("bucket: {}s", self.bucket_width_seconds),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            Span::styled(
                format!("candles: {}", self.candle_count),
                Style::default().fg(Color::DarkGray),
            ),
            sep(),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let line = Line::from(vec![
            Span::styled(" [B]", Style::default().fg(Color::Yellow)),
            Span::styled("uy  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[S]", Style::default().fg(Color::Yellow)),
            Span::styled("ell  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
