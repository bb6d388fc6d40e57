use std::time::Duration;

use pulldown_core::{BannerPose, EasingType, VisualTarget};

use crate::transition::{PoseAnimator, PoseFrame};

/// Terminal rendering target for the pull controller
///
/// Poses arrive in touch units and are turned into terminal rows with
/// `pixels_per_row`. Animated poses are tweened by the UI loop calling
/// [`TerminalSurface::tick`], whose `finished` flag is the
/// transition-complete notification for the controller.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    animator: PoseAnimator,
    banner_height: f64,
    pixels_per_row: f64,
}

/// A pose converted to whole terminal rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Rows the banner occupies
    pub banner_rows: u16,
    /// Rows the content area is pushed down below its rest position
    pub content_shift: u16,
    /// Row of the loading indicator inside the banner
    pub indicator_row: u16,
}

impl TerminalSurface {
    pub fn new(easing: EasingType, banner_height: f64, pixels_per_row: f64) -> Self {
        Self {
            animator: PoseAnimator::new(easing),
            banner_height,
            pixels_per_row,
        }
    }

    pub fn pose(&self) -> BannerPose {
        self.animator.current()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Advance any running transition by one frame
    pub fn tick(&mut self) -> PoseFrame {
        self.animator.update()
    }

    fn rows(&self, units: f64) -> u16 {
        (units / self.pixels_per_row).round().clamp(0.0, u16::MAX as f64) as u16
    }

    pub fn layout(&self) -> RowLayout {
        let pose = self.pose();
        let rest_rows = self.rest_rows();
        let banner_rows = self.rows(self.banner_height * pose.banner_scale).max(rest_rows);
        RowLayout {
            banner_rows,
            content_shift: self.rows(pose.content_offset),
            indicator_row: (rest_rows / 2)
                .saturating_add(self.rows(pose.indicator_offset))
                .min(banner_rows - 1),
        }
    }

    /// Banner height in rows at rest
    pub fn rest_rows(&self) -> u16 {
        self.rows(self.banner_height).max(1)
    }
}

impl VisualTarget for TerminalSurface {
    fn set_instant(&mut self, pose: BannerPose) {
        self.animator.jump(pose);
    }

    fn set_animated(&mut self, pose: BannerPose, duration: Duration) {
        self.animator.animate_to(pose, duration);
    }
}
