use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

pub struct ContentWidget;

impl ContentWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;

        let lines: Vec<Line> = app
            .content
            .iter()
            .map(|text| {
                let style = if text.starts_with('[') {
                    Style::default().fg(theme.success)
                } else {
                    Style::default().fg(theme.fg0)
                };
                Line::styled(text.as_str(), style)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.bg2))
            .style(Style::default().bg(theme.bg0));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
