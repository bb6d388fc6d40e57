//! Pose animator: tweens the banner between poses one frame at a time

use std::time::{Duration, Instant};

use pulldown_core::BannerPose;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_pose, progress};

#[derive(Debug, Clone)]
struct ActiveTransition {
    start: Instant,
    from: BannerPose,
    to: BannerPose,
    duration: Duration,
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFrame {
    pub pose: BannerPose,
    /// A transition reached its end during this frame
    pub finished: bool,
}

/// Tweens a [`BannerPose`] with a fixed easing curve
///
/// `jump()` applies a pose at once and drops any running transition;
/// `animate_to()` starts one from whatever is currently displayed. Call
/// `update()` every frame; the frame in which a transition completes is
/// reported exactly once through [`PoseFrame::finished`].
#[derive(Debug, Clone)]
pub struct PoseAnimator {
    transition: Option<ActiveTransition>,
    easing: EasingType,
    current: BannerPose,
}

impl PoseAnimator {
    pub fn new(easing: EasingType) -> Self {
        Self {
            transition: None,
            easing,
            current: BannerPose::REST,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Pose displayed as of the last update
    #[inline]
    pub fn current(&self) -> BannerPose {
        self.current
    }

    /// Pose the running transition ends at, or the current one
    pub fn target(&self) -> BannerPose {
        self.transition
            .as_ref()
            .map(|t| t.to)
            .unwrap_or(self.current)
    }

    pub fn jump(&mut self, pose: BannerPose) {
        self.transition = None;
        self.current = pose;
    }

    pub fn animate_to(&mut self, pose: BannerPose, duration: Duration) {
        self.animate_to_at(pose, duration, Instant::now());
    }

    pub fn animate_to_at(&mut self, pose: BannerPose, duration: Duration, now: Instant) {
        self.transition = Some(ActiveTransition {
            start: now,
            from: self.current,
            to: pose,
            duration,
        });
    }

    pub fn update(&mut self) -> PoseFrame {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> PoseFrame {
        let Some(transition) = self.transition.as_ref() else {
            return PoseFrame {
                pose: self.current,
                finished: false,
            };
        };

        if is_complete(transition.start, transition.duration, now) {
            self.current = transition.to;
            self.transition = None;
            return PoseFrame {
                pose: self.current,
                finished: true,
            };
        }

        let t = progress(transition.start, transition.duration, now);
        self.current = lerp_pose(transition.from, transition.to, self.easing.apply(t));
        PoseFrame {
            pose: self.current,
            finished: false,
        }
    }
}
