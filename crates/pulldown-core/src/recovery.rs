use std::time::Duration;

use tracing::debug;

use crate::visual::{BannerPose, VisualTarget};

/// Displacements below this are snapped to rest without a transition
const REST_EPSILON: f64 = 1.0;

/// What a call to [`RecoveryAnimator::recover`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// A timed transition back to rest was started
    Started,
    /// A sub-unit displacement was cleared instantly
    Snapped,
    /// Nothing to do: already at rest or already recovering
    Skipped,
}

/// Returns the banner to rest and tracks the transition in flight
///
/// Displacement is the explicit `current_offset` recorded whenever the
/// controller poses the banner, never a read-back of rendered output.
#[derive(Debug, Clone)]
pub struct RecoveryAnimator {
    duration: Duration,
    current_offset: f64,
    is_recovering: bool,
}

impl RecoveryAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current_offset: 0.0,
            is_recovering: false,
        }
    }

    #[inline]
    pub fn is_recovering(&self) -> bool {
        self.is_recovering
    }

    #[inline]
    pub fn current_offset(&self) -> f64 {
        self.current_offset
    }

    /// Record the offset most recently applied by drag feedback
    pub fn record_offset(&mut self, offset: f64) {
        self.current_offset = offset;
    }

    pub fn recover(&mut self, target: &mut dyn VisualTarget) -> Recovery {
        if self.is_recovering || self.current_offset == 0.0 {
            debug!(
                offset = self.current_offset,
                recovering = self.is_recovering,
                "Recovery skipped"
            );
            return Recovery::Skipped;
        }

        if self.current_offset < REST_EPSILON {
            target.set_instant(BannerPose::REST);
            self.current_offset = 0.0;
            return Recovery::Snapped;
        }

        debug!(
            offset = self.current_offset,
            duration_ms = self.duration.as_millis() as u64,
            "Recovery started"
        );
        target.set_animated(BannerPose::REST, self.duration);
        self.current_offset = 0.0;
        self.is_recovering = true;
        Recovery::Started
    }

    /// Backend reported the transition finished; returns whether one was
    /// in flight
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.is_recovering, false)
    }
}
