use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

use pulldown_core::PullPhase;

use crate::app::App;
use crate::demo::BANNER_ART;

pub struct BannerWidget;

impl BannerWidget {
    /// Render the banner: artwork stretched over its rows, plus the
    /// loading indicator at its parallax row
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let layout = app.controller.target().layout();

        let background = Block::default().style(Style::default().bg(theme.banner));
        frame.render_widget(background, area);

        // Artwork rows repeat as the banner grows
        let art: Vec<Line> = (0..area.height)
            .map(|row| {
                let text = BANNER_ART[row as usize % BANNER_ART.len()];
                Line::styled(text, Style::default().fg(theme.banner_art))
            })
            .collect();
        frame.render_widget(Paragraph::new(art).alignment(Alignment::Center), area);

        let indicator = match app.controller.phase() {
            PullPhase::LockedPulling | PullPhase::Refreshing => Some(app.spinner().to_string()),
            _ if app.controller.is_refreshing() => Some(app.spinner().to_string()),
            PullPhase::Pulling if app.controller.current_offset() > 0.0 => {
                let max = app.controller.config().max_offset();
                let pct = if max > 0.0 {
                    (app.controller.current_offset() / max * 100.0).round() as u32
                } else {
                    100
                };
                Some(format!(" pull {:>3}% ", pct))
            }
            _ => None,
        };

        if let Some(text) = indicator {
            let row = layout.indicator_row.min(area.height - 1);
            let indicator_area = Rect::new(area.x, area.y + row, area.width, 1);
            let line = Line::styled(
                text,
                Style::default()
                    .fg(theme.indicator)
                    .bg(theme.banner)
                    .add_modifier(Modifier::BOLD),
            );
            frame.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                indicator_area,
            );
        }
    }
}
