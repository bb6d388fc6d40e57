//! Rendering seam: banner poses and the targets that display them

use std::time::Duration;

/// Visual state of every element that follows the pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerPose {
    /// Banner scale relative to its rest height
    pub banner_scale: f64,
    /// Downward shift of the content area
    pub content_offset: f64,
    /// Downward shift of the loading indicator
    pub indicator_offset: f64,
}

impl BannerPose {
    pub const REST: BannerPose = BannerPose {
        banner_scale: 1.0,
        content_offset: 0.0,
        indicator_offset: 0.0,
    };

    /// Pose for a banner expanded by `offset` beyond `banner_height`
    ///
    /// The indicator moves at half speed so it settles near the middle of
    /// the banner by the time the threshold is reached.
    pub fn from_offset(offset: f64, banner_height: f64) -> Self {
        Self {
            banner_scale: (banner_height + offset) / banner_height,
            content_offset: offset,
            indicator_offset: offset / 2.0,
        }
    }
}

impl Default for BannerPose {
    fn default() -> Self {
        Self::REST
    }
}

/// A rendering backend that can display a [`BannerPose`]
///
/// Animated changes must eventually be reported back to the controller
/// through `PullController::on_transition_end`.
pub trait VisualTarget {
    /// Apply a pose immediately, replacing any running transition
    fn set_instant(&mut self, pose: BannerPose);

    /// Transition from the current pose to `pose` over `duration`
    fn set_animated(&mut self, pose: BannerPose, duration: Duration);
}

impl<T: VisualTarget + ?Sized> VisualTarget for Box<T> {
    fn set_instant(&mut self, pose: BannerPose) {
        (**self).set_instant(pose)
    }

    fn set_animated(&mut self, pose: BannerPose, duration: Duration) {
        (**self).set_animated(pose, duration)
    }
}

/// Maps drag offsets onto instantaneous poses
#[derive(Debug, Clone, Copy)]
pub struct VisualFeedbackDriver {
    banner_height: f64,
}

impl VisualFeedbackDriver {
    pub fn new(banner_height: f64) -> Self {
        Self { banner_height }
    }

    pub fn apply(&self, target: &mut dyn VisualTarget, offset: f64) -> BannerPose {
        let pose = BannerPose::from_offset(offset, self.banner_height);
        target.set_instant(pose);
        pose
    }
}

/// A command received by a [`RecordingTarget`]
#[derive(Debug, Clone, PartialEq)]
pub enum VisualCommand {
    Instant(BannerPose),
    Animated { pose: BannerPose, duration: Duration },
}

/// Headless target that keeps every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    commands: Vec<VisualCommand>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[VisualCommand] {
        &self.commands
    }

    /// Pose the element would show once all transitions finish
    pub fn current(&self) -> BannerPose {
        match self.commands.last() {
            Some(VisualCommand::Instant(pose)) => *pose,
            Some(VisualCommand::Animated { pose, .. }) => *pose,
            None => BannerPose::REST,
        }
    }

    pub fn animation_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, VisualCommand::Animated { .. }))
            .count()
    }

    pub fn last_animation(&self) -> Option<(BannerPose, Duration)> {
        self.commands.iter().rev().find_map(|c| match c {
            VisualCommand::Animated { pose, duration } => Some((*pose, *duration)),
            VisualCommand::Instant(_) => None,
        })
    }
}

impl VisualTarget for RecordingTarget {
    fn set_instant(&mut self, pose: BannerPose) {
        self.commands.push(VisualCommand::Instant(pose));
    }

    fn set_animated(&mut self, pose: BannerPose, duration: Duration) {
        self.commands.push(VisualCommand::Animated { pose, duration });
    }
}
