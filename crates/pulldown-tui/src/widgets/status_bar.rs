use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use pulldown_core::PullPhase;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let phase_str = match app.controller.phase() {
            PullPhase::Idle => "IDLE",
            PullPhase::Pulling => "PULLING",
            PullPhase::LockedPulling => "LOCKED",
            PullPhase::Refreshing => "REFRESHING",
            PullPhase::Recovering => "RECOVERING",
        };

        let last = app
            .last_refreshed
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} ", msg)
        } else {
            format!(
                " {} | offset {:.0} | scroll {} | last refresh {} ",
                phase_str,
                app.controller.current_offset(),
                app.scroll,
                last
            )
        };

        let help_hint = " drag:pull j/k:scroll ?:help q:quit ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + help_hint.len());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
