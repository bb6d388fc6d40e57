//! Frame timing for the UI loop

use std::time::Duration;

pub use pulldown_core::config::UiConfig;

/// Extension trait for UiConfig with timing helpers
pub trait UiConfigExt {
    /// Poll interval while nothing is moving
    fn tick_duration(&self) -> Duration;

    /// Poll interval while a transition is running
    fn animation_tick_duration(&self) -> Duration;
}

impl UiConfigExt for UiConfig {
    #[inline]
    fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis((1000 / self.animation_fps as u64).max(1))
        }
    }
}
