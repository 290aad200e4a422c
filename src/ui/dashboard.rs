use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::market::state::RefreshStatus;
use crate::model::snapshot::{AssetSnapshot, Trend};

pub struct MarketBoard<'a> {
    snapshots: &'a [AssetSnapshot],
    stale: bool,
}

impl<'a> MarketBoard<'a> {
    pub fn new(snapshots: &'a [AssetSnapshot], stale: bool) -> Self {
        Self { snapshots, stale }
    }
}

impl Widget for MarketBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(vec!["Asset", "", "Price", "24h", "Volume"]).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let value_color = if self.stale {
            Color::DarkGray
        } else {
            Color::White
        };

        let rows = self.snapshots.iter().map(|asset| {
            let trend_color = match asset.trend {
                Trend::Up => Color::Green,
                Trend::Down => Color::Red,
            };
            // `*` marks rows where the exchange sent numbers we could not read.
            let name = if asset.degraded {
                format!("{} *", asset.name)
            } else {
                asset.name.clone()
            };
            Row::new(vec![
                Cell::from(name).style(Style::default().fg(Color::White)),
                Cell::from(asset.symbol.as_str()).style(Style::default().fg(Color::Cyan)),
                Cell::from(asset.price.as_str()).style(Style::default().fg(value_color)),
                Cell::from(asset.change_percent.as_str()).style(Style::default().fg(trend_color)),
                Cell::from(asset.volume.as_str()).style(Style::default().fg(Color::DarkGray)),
            ])
        });

        let widths = [
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(18),
            Constraint::Length(9),
            Constraint::Min(12),
        ];

        let title = if self.stale {
            " Market (stale) "
        } else {
            " Market "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block)
            .render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub status: RefreshStatus,
    pub updated_label: &'a str,
    pub asset_count: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status_style = match self.status {
            RefreshStatus::Idle => Style::default().fg(Color::DarkGray),
            RefreshStatus::Loading => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            RefreshStatus::Ok => Style::default().fg(Color::Green),
            RefreshStatus::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };

        let line = Line::from(vec![
            Span::styled(
                " market-pulse ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.status.as_str(), status_style),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.updated_label, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("assets: {}", self.asset_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct ErrorBanner<'a> {
    pub message: Option<&'a str>,
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(message) = self.message {
            let line = Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Red),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
        }
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
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| Line::from(Span::styled(m.as_str(), Style::default().fg(Color::Gray))))
            .collect();

        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar {
    pub loading: bool,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let refresh_key = if self.loading {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", refresh_key),
            Span::styled(
                if self.loading { "efreshing...  " } else { "efresh  " },
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
