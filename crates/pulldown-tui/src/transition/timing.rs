//! Time and interpolation helpers for transitions

use std::time::{Duration, Instant};

use pulldown_core::BannerPose;

/// Progress (0.0 to 1.0) of a transition started at `start`, as of `now`
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolate every component of a pose
pub fn lerp_pose(from: BannerPose, to: BannerPose, t: f64) -> BannerPose {
    BannerPose {
        banner_scale: lerp(from.banner_scale, to.banner_scale, t),
        content_offset: lerp(from.content_offset, to.content_offset, t),
        indicator_offset: lerp(from.indicator_offset, to.indicator_offset, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let start = Instant::now();
        let duration = Duration::from_millis(200);
        assert_eq!(progress(start, duration, start), 0.0);
        assert!((progress(start, duration, start + Duration::from_millis(50)) - 0.25).abs() < 1e-9);
        assert_eq!(progress(start, duration, start + Duration::from_secs(1)), 1.0);
        assert_eq!(progress(start, Duration::ZERO, start), 1.0);
    }

    #[test]
    fn test_is_complete() {
        let start = Instant::now();
        let duration = Duration::from_millis(350);
        assert!(!is_complete(start, duration, start + Duration::from_millis(349)));
        assert!(is_complete(start, duration, start + Duration::from_millis(350)));
    }

    #[test]
    fn test_lerp_pose_midpoint() {
        let from = BannerPose::from_offset(150.0, 50.0);
        let mid = lerp_pose(from, BannerPose::REST, 0.5);
        assert!((mid.banner_scale - 2.5).abs() < 1e-9);
        assert!((mid.content_offset - 75.0).abs() < 1e-9);
        assert!((mid.indicator_offset - 37.5).abs() < 1e-9);
    }
}
