use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use pulldown_core::{AppConfig, PullController, RefreshCompletion, TouchEvent, TouchPhase};
use tokio::sync::mpsc;
use tracing::debug;

use crate::demo::{initial_content, DemoRefresher, SPINNER};
use crate::event::RefreshResult;
use crate::input::{Action, PointerInput};
use crate::surface::TerminalSurface;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

/// Demo application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub controller: PullController<TerminalSurface>,
    pub theme: Theme,
    pub mode: Mode,
    pub content: Vec<String>,
    /// Scroll position of the content in rows; the pull is only legal at 0
    pub scroll: u16,
    pub viewport_height: u16,
    pub content_width: u16,
    pub status_message: Option<String>,
    pub spinner_frame: usize,
    pub last_refreshed: Option<DateTime<Local>>,
    pub refresh_count: u32,
    pub should_quit: bool,
    /// Last pointer position of a drag, for native scrolling
    drag_y: Option<f64>,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        completions: mpsc::UnboundedSender<RefreshCompletion>,
        results: mpsc::UnboundedSender<RefreshResult>,
    ) -> Self {
        let surface = TerminalSurface::new(
            config.pull.easing,
            config.pull.banner_height,
            config.ui.pixels_per_row,
        );
        let refresher = DemoRefresher::new(
            Duration::from_millis(config.demo.refresh_delay_ms),
            results,
        );
        let controller = PullController::new(config.pull.clone(), surface)
            .with_refresh_handler(Arc::new(refresher), completions);

        Self {
            config,
            controller,
            theme: Theme::default(),
            mode: Mode::Normal,
            content: initial_content(),
            scroll: 0,
            viewport_height: 0,
            content_width: 0,
            status_message: None,
            spinner_frame: 0,
            last_refreshed: None,
            refresh_count: 0,
            should_quit: false,
            drag_y: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Total content height in rows once wrapped to `content_width`
    pub fn content_height(&self) -> u16 {
        let width = self.content_width.max(1) as usize;
        self.content
            .iter()
            .map(|line| {
                let chars = line.chars().count();
                if chars == 0 {
                    1
                } else {
                    chars.div_ceil(width) as u16
                }
            })
            .fold(0u16, |acc, h| acc.saturating_add(h))
    }

    pub fn max_scroll(&self) -> u16 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.max_scroll() as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max.max(0)) as u16;
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollHalfPageDown => {
                self.scroll_by((self.viewport_height / 2).max(1) as i32)
            }
            Action::ScrollHalfPageUp => {
                self.scroll_by(-((self.viewport_height / 2).max(1) as i32))
            }
            Action::JumpToTop => self.scroll = 0,
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Help => Mode::Normal,
                    Mode::Normal => Mode::Help,
                }
            }
            Action::ExitMode => {
                self.mode = Mode::Normal;
                self.clear_status();
            }
            Action::None => {}
        }
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        match input {
            PointerInput::Touch(event) => self.handle_touch(event),
            PointerInput::Wheel(notches) => self.scroll_by(notches * 3),
        }
    }

    /// Feed a touch to the controller; unprevented drags scroll the page
    pub fn handle_touch(&mut self, mut event: TouchEvent) {
        let page = self.scroll as f64;
        self.controller.handle_touch(&mut event, &page);

        match event.phase {
            TouchPhase::Start => self.drag_y = event.primary_y(),
            TouchPhase::Move => {
                if let (Some(prev), Some(y)) = (self.drag_y, event.primary_y()) {
                    if !event.default_prevented() {
                        let rows = ((prev - y) / self.config.ui.pixels_per_row).round() as i32;
                        if rows != 0 {
                            self.scroll_by(rows);
                        }
                    }
                }
                self.drag_y = event.primary_y();
            }
            TouchPhase::End | TouchPhase::Cancel => self.drag_y = None,
        }
    }

    pub fn handle_refresh_completion(&mut self, completion: RefreshCompletion) {
        self.controller.on_refresh_complete(completion);
    }

    /// Prepend the items a demo refresh "fetched"
    pub fn handle_refresh_result(&mut self, result: RefreshResult) {
        self.refresh_count += 1;
        let stamp = result.fetched_at.format("%H:%M:%S");
        for i in (0..result.new_items).rev() {
            self.content.insert(
                0,
                format!("[{}] New item #{} from refresh {}", stamp, i + 1, self.refresh_count),
            );
        }
        self.last_refreshed = Some(result.fetched_at);
        self.set_status(format!("Refreshed: {} new items", result.new_items));
        debug!(new_items = result.new_items, "Demo content refreshed");
    }

    /// Advance the banner transition; reports its end to the controller
    pub fn update_animation(&mut self) {
        let frame = self.controller.target_mut().tick();
        if frame.finished {
            self.controller.on_transition_end();
        }
    }

    /// Whether the loop should poll at animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.controller.target().is_animating() || self.controller.is_refreshing()
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}
