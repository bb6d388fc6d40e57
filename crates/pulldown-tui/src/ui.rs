//! Frame layout: banner on top, content pushed down by the pull, status bar

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, Mode};
use crate::widgets::{BannerWidget, ContentWidget, PopupWidget, StatusBarWidget};

/// Draw one frame and record the viewport size the content was laid out in
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let main = chunks[0];

    let layout = app.controller.target().layout();
    let rest_rows = app.controller.target().rest_rows().min(main.height);

    // Scroll limits are computed against the content area at rest
    app.viewport_height = main.height.saturating_sub(rest_rows).saturating_sub(1);
    app.content_width = main.width;

    let banner_rows = layout.banner_rows.min(main.height);
    let banner_area = Rect::new(main.x, main.y, main.width, banner_rows);

    let content_top = rest_rows.saturating_add(layout.content_shift).min(main.height);
    let content_area = Rect::new(
        main.x,
        main.y + content_top,
        main.width,
        main.height - content_top,
    );

    BannerWidget::render(frame, banner_area, app);
    ContentWidget::render(frame, content_area, app);
    StatusBarWidget::render(frame, chunks[1], app);

    if app.mode == Mode::Help {
        PopupWidget::render_help(frame, &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pulldown_core::{AppConfig, TouchEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_at_rest_sets_viewport() {
        let (completion_tx, _completion_rx) = mpsc::unbounded_channel();
        let (result_tx, _result_rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(AppConfig::default()), completion_tx, result_tx);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        // 20 rows minus status bar, banner rest rows and content border
        let rest = app.controller.target().rest_rows();
        assert_eq!(app.viewport_height, 19 - rest - 1);
        assert_eq!(app.content_width, 60);
        assert!(buffer_text(&terminal).contains("IDLE"));
    }

    #[test]
    fn test_draw_while_pulling_shows_progress() {
        let (completion_tx, _completion_rx) = mpsc::unbounded_channel();
        let (result_tx, _result_rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(AppConfig::default()), completion_tx, result_tx);

        app.handle_touch(TouchEvent::start(0.0));
        // 0.3 * 200 = 60 units, below the 150 unit limit
        app.handle_touch(TouchEvent::moved(200.0));

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("PULLING"));
        assert!(text.contains("pull  40%"));
    }

    #[test]
    fn test_help_popup() {
        let (completion_tx, _completion_rx) = mpsc::unbounded_channel();
        let (result_tx, _result_rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(AppConfig::default()), completion_tx, result_tx);
        app.mode = Mode::Help;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("toggle this help"));
    }
}
