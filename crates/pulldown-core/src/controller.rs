//! The pull-to-refresh state machine
//!
//! `PullController` is driven entirely by its host's event loop: touch
//! events, refresh completions drained from the completion channel, and
//! transition-end notifications from the visual target. It never blocks
//! and never fails; conditions it cannot act on are logged and skipped.
//!
//! Recovery to rest is gated on "gesture ended AND no refresh
//! outstanding", checked both at touch end and at refresh completion, so
//! it fires exactly once whichever of the two happens last.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::PullConfig;
use crate::gesture::{DragMetrics, GestureTracker, ScrollProbe, TouchEvent, TouchPhase};
use crate::recovery::{Recovery, RecoveryAnimator};
use crate::refresh::{RefreshCompletion, RefreshCoordinator, RefreshHandler, RefreshTicket};
use crate::visual::{VisualFeedbackDriver, VisualTarget};

/// Coarse phase, for display and tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullPhase {
    Idle,
    Pulling,
    /// Pinned at threshold after triggering a refresh
    LockedPulling,
    /// Gesture over, waiting on the refresh before recovering
    Refreshing,
    Recovering,
}

/// Snapshot of every controller flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PullState {
    pub phase: PullPhase,
    pub is_pulling: bool,
    pub is_locked: bool,
    pub is_refreshing: bool,
    pub is_recovering: bool,
    pub offset: f64,
}

pub struct PullController<T: VisualTarget> {
    config: PullConfig,
    target: T,
    gesture: GestureTracker,
    feedback: VisualFeedbackDriver,
    refresh: RefreshCoordinator,
    recovery: RecoveryAnimator,
}

impl<T: VisualTarget> PullController<T> {
    /// Create a controller without a refresh handler
    ///
    /// `config` is expected to have passed [`PullConfig::validate`].
    pub fn new(config: PullConfig, target: T) -> Self {
        Self {
            feedback: VisualFeedbackDriver::new(config.banner_height),
            refresh: RefreshCoordinator::new(config.refresh_timeout()),
            recovery: RecoveryAnimator::new(config.recovery_duration()),
            gesture: GestureTracker::new(),
            target,
            config,
        }
    }

    /// Set the refresh handler and the channel its completions are sent on
    pub fn with_refresh_handler(
        mut self,
        handler: Arc<dyn RefreshHandler>,
        completions: mpsc::UnboundedSender<RefreshCompletion>,
    ) -> Self {
        self.refresh.set_handler(handler, completions);
        self
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    #[inline]
    pub fn is_pulling(&self) -> bool {
        self.gesture.is_pulling()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.refresh.is_locked()
    }

    #[inline]
    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    #[inline]
    pub fn is_recovering(&self) -> bool {
        self.recovery.is_recovering()
    }

    /// Offset last applied to the visual target
    pub fn current_offset(&self) -> f64 {
        self.recovery.current_offset()
    }

    pub fn pending_refresh(&self) -> Option<RefreshTicket> {
        self.refresh.pending()
    }

    pub fn phase(&self) -> PullPhase {
        if self.is_recovering() {
            PullPhase::Recovering
        } else if self.is_pulling() && self.is_locked() {
            PullPhase::LockedPulling
        } else if self.is_pulling() {
            PullPhase::Pulling
        } else if self.is_refreshing() {
            PullPhase::Refreshing
        } else {
            PullPhase::Idle
        }
    }

    pub fn state(&self) -> PullState {
        PullState {
            phase: self.phase(),
            is_pulling: self.is_pulling(),
            is_locked: self.is_locked(),
            is_refreshing: self.is_refreshing(),
            is_recovering: self.is_recovering(),
            offset: self.current_offset(),
        }
    }

    /// Route a touch event to the handler for its phase
    pub fn handle_touch(&mut self, event: &mut TouchEvent, page: &dyn ScrollProbe) {
        match event.phase {
            TouchPhase::Start => self.on_touch_start(event, page),
            TouchPhase::Move => self.on_touch_move(event, page),
            TouchPhase::End | TouchPhase::Cancel => self.on_touch_end(event),
        }
    }

    pub fn on_touch_start(&mut self, event: &TouchEvent, page: &dyn ScrollProbe) {
        let Some(y) = event.primary_y() else {
            warn!("Touch start without a touch point, ignored");
            return;
        };
        if self.gesture.begin(y, page) {
            debug!(start_y = y, "Pull started");
        } else {
            debug!(scroll_top = page.scroll_top(), "Page not at top, pull not started");
        }
    }

    pub fn on_touch_move(&mut self, event: &mut TouchEvent, page: &dyn ScrollProbe) {
        if !self.gesture.is_pulling() {
            return;
        }
        let Some(y) = event.primary_y() else {
            return;
        };
        let movement = self.gesture.track(y);

        // Own the gesture once a downward pull is under way
        if movement >= 0.0 && event.cancelable() && page.is_at_top() {
            event.prevent_default();
        }

        if self.recovery.is_recovering() || self.refresh.is_locked() || movement <= 0.0 {
            return;
        }

        let metrics = DragMetrics::compute(movement, self.config.pull_factor, self.config.max_offset());
        self.feedback.apply(&mut self.target, metrics.offset);
        self.recovery.record_offset(metrics.offset);

        if metrics.at_threshold() && !self.refresh.is_refreshing() {
            if let Some(ticket) = self.refresh.trigger() {
                info!(
                    ticket = ticket.id(),
                    offset = metrics.offset,
                    "Pull threshold reached"
                );
            }
        }
    }

    /// Touch end and touch cancel
    pub fn on_touch_end(&mut self, event: &TouchEvent) {
        self.refresh.release_lock();

        let Some(movement) = self.gesture.finish(event.primary_y()) else {
            return;
        };
        debug!(movement, "Pull ended");

        if self.refresh.is_refreshing() {
            debug!("Recovery deferred until refresh completes");
            return;
        }
        // Recovery is a no-op at rest, so a drag that ended above its
        // origin with the banner still displaced is covered as well
        self.recover();
    }

    /// Deliver a completion drained from the refresh channel
    pub fn on_refresh_complete(&mut self, completion: RefreshCompletion) {
        if !self.refresh.complete(completion) {
            return;
        }
        if self.refresh.is_locked() || self.gesture.is_pulling() {
            debug!("Refresh done while finger is down, recovery waits for touch end");
            return;
        }
        self.recover();
    }

    /// The visual target finished its running transition
    pub fn on_transition_end(&mut self) {
        if self.recovery.finish() {
            debug!("Recovery transition finished");
        }
    }

    /// Return the banner to rest if it is displaced
    pub fn recover(&mut self) -> Recovery {
        self.recovery.recover(&mut self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::{refresh_fn, RefreshOutcome};
    use crate::visual::{BannerPose, RecordingTarget};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    type Completions = mpsc::UnboundedReceiver<RefreshCompletion>;

    fn pull_config() -> PullConfig {
        PullConfig::default()
    }

    /// Handler that counts calls and resolves only when the gate is opened
    fn gated_handler() -> (Arc<dyn RefreshHandler>, Arc<Notify>, Arc<AtomicU32>) {
        let gate = Arc::new(Notify::new());
        let calls = Arc::new(AtomicU32::new(0));
        let handler = {
            let gate = gate.clone();
            let calls = calls.clone();
            refresh_fn(move || {
                let gate = gate.clone();
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    gate.notified().await;
                }
            })
        };
        (handler, gate, calls)
    }

    fn controller_with(
        handler: Arc<dyn RefreshHandler>,
        config: PullConfig,
    ) -> (PullController<RecordingTarget>, Completions) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller =
            PullController::new(config, RecordingTarget::new()).with_refresh_handler(handler, tx);
        (controller, rx)
    }

    fn touch(controller: &mut PullController<RecordingTarget>, mut event: TouchEvent) -> TouchEvent {
        controller.handle_touch(&mut event, &0.0);
        event
    }

    #[tokio::test]
    async fn scenario_a_threshold_triggers_once() {
        let (handler, gate, calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(200.0));
        assert!(!controller.is_refreshing());

        touch(&mut controller, TouchEvent::moved(500.0));
        assert!(controller.is_refreshing());
        assert!(controller.is_locked());
        assert_eq!(controller.current_offset(), 150.0);
        assert_eq!(controller.phase(), PullPhase::LockedPulling);

        let applied = controller.target().commands().len();
        for y in [520.0, 600.0, 800.0, 1200.0] {
            touch(&mut controller, TouchEvent::moved(y));
        }
        // Pinned moves neither re-trigger nor repaint
        assert_eq!(controller.target().commands().len(), applied);
        assert_eq!(controller.target().current().banner_scale, 4.0);

        gate.notify_one();
        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.outcome, RefreshOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn scenario_b_short_pull_recovers() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(100.0));
        assert!((controller.current_offset() - 30.0).abs() < 1e-9);

        touch(&mut controller, TouchEvent::end(100.0));
        assert!(!controller.is_refreshing());
        assert!(rx.try_recv().is_err());
        assert_eq!(
            controller.target().last_animation(),
            Some((BannerPose::REST, Duration::from_millis(350)))
        );
        assert_eq!(controller.phase(), PullPhase::Recovering);

        controller.on_transition_end();
        assert_eq!(controller.phase(), PullPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_c_release_before_refresh_resolves() {
        let handler = refresh_fn(|| tokio::time::sleep(Duration::from_secs(1)));
        let (mut controller, mut rx) = controller_with(handler, pull_config());
        let started = tokio::time::Instant::now();

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(500.0));
        touch(&mut controller, TouchEvent::end(500.0));

        assert!(!controller.is_locked());
        assert!(controller.is_refreshing());
        assert_eq!(controller.phase(), PullPhase::Refreshing);
        assert_eq!(controller.target().animation_count(), 0);
        assert_eq!(controller.target().current().content_offset, 150.0);

        let completion = rx.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        controller.on_refresh_complete(completion);

        assert_eq!(controller.target().animation_count(), 1);
        assert!(controller.is_recovering());
        assert!(!controller.is_refreshing());
    }

    #[tokio::test]
    async fn scenario_d_scrolled_page_is_not_a_pull() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        let mut start = TouchEvent::start(0.0);
        controller.handle_touch(&mut start, &10.0);
        assert!(!controller.is_pulling());

        for y in [50.0, 200.0, 600.0] {
            let mut event = TouchEvent::moved(y);
            controller.handle_touch(&mut event, &10.0);
            assert!(!event.default_prevented());
        }
        // Reaching the top mid-gesture does not turn it into a pull
        let mut event = TouchEvent::moved(700.0);
        controller.handle_touch(&mut event, &0.0);
        assert!(!event.default_prevented());

        assert!(controller.target().commands().is_empty());
        assert!(!controller.is_refreshing());
    }

    #[tokio::test]
    async fn refresh_resolving_before_release_defers_recovery() {
        let (handler, gate, _calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(600.0));
        gate.notify_one();
        let completion = rx.recv().await.unwrap();
        controller.on_refresh_complete(completion);

        assert!(!controller.is_refreshing());
        assert_eq!(controller.target().animation_count(), 0);

        touch(&mut controller, TouchEvent::moved(650.0));
        touch(&mut controller, TouchEvent::end(650.0));
        assert_eq!(controller.target().animation_count(), 1);

        controller.on_transition_end();
        assert_eq!(controller.recover(), Recovery::Skipped);
        assert_eq!(controller.target().animation_count(), 1);
    }

    #[tokio::test]
    async fn below_threshold_never_triggers() {
        let (handler, _gate, calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());
        // (200 - 50) / 0.3 = 500
        let mut y: f64 = 0.0;
        touch(&mut controller, TouchEvent::start(0.0));
        while y < 499.0 {
            y += 7.0;
            touch(&mut controller, TouchEvent::moved(y.min(499.0)));
        }
        touch(&mut controller, TouchEvent::end(499.0));

        tokio::task::yield_now().await;
        assert!(!controller.is_refreshing());
        assert!(rx.try_recv().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(controller.current_offset() == 0.0 && controller.is_recovering());
    }

    #[tokio::test]
    async fn moves_during_recovery_are_ignored() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(100.0));
        touch(&mut controller, TouchEvent::end(100.0));
        assert!(controller.is_recovering());
        let applied = controller.target().commands().len();

        touch(&mut controller, TouchEvent::start(0.0));
        let event = touch(&mut controller, TouchEvent::moved(80.0));
        assert!(event.default_prevented());
        assert_eq!(controller.target().commands().len(), applied);

        controller.on_transition_end();
        touch(&mut controller, TouchEvent::moved(90.0));
        assert_eq!(controller.target().commands().len(), applied + 1);
    }

    #[tokio::test]
    async fn default_prevented_only_for_downward_cancelable_moves() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(100.0));
        assert!(touch(&mut controller, TouchEvent::moved(100.0)).default_prevented());
        assert!(!touch(&mut controller, TouchEvent::moved(60.0)).default_prevented());
        assert_eq!(controller.target().commands().len(), 0);

        // A non-cancelable move still drives the banner
        let event = touch(
            &mut controller,
            TouchEvent::moved(160.0).with_cancelable(false),
        );
        assert!(!event.default_prevented());
        assert_eq!(controller.target().commands().len(), 1);
    }

    #[tokio::test]
    async fn page_scrolled_mid_pull_keeps_native_scroll() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        let mut event = TouchEvent::moved(100.0);
        controller.handle_touch(&mut event, &5.0);

        assert!(!event.default_prevented());
        // Feedback still follows the finger
        assert!((controller.current_offset() - 30.0).abs() < 1e-9);
        assert_eq!(controller.target().commands().len(), 1);
    }

    #[tokio::test]
    async fn drag_ending_above_origin_still_recovers() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(100.0));
        touch(&mut controller, TouchEvent::moved(200.0));
        touch(&mut controller, TouchEvent::moved(50.0));
        assert!((controller.current_offset() - 30.0).abs() < 1e-9);

        touch(&mut controller, TouchEvent::end(50.0));
        assert!(controller.is_recovering());
        assert_eq!(controller.current_offset(), 0.0);
        assert_eq!(controller.target().animation_count(), 1);
        assert_eq!(controller.target().current(), BannerPose::REST);
    }

    #[tokio::test]
    async fn second_finger_is_ignored() {
        let (handler, _gate, _calls) = gated_handler();
        let (mut controller, _rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0).with_extra_touch(400.0));
        touch(&mut controller, TouchEvent::moved(100.0).with_extra_touch(900.0));
        assert!((controller.current_offset() - 30.0).abs() < 1e-9);
        assert!(!controller.is_refreshing());
    }

    #[tokio::test]
    async fn new_pull_during_refresh_keeps_banner_until_release() {
        let (handler, gate, calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(500.0));
        touch(&mut controller, TouchEvent::end(500.0));

        // Second pull while the first refresh is outstanding
        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(700.0));
        assert!(!controller.is_locked());

        gate.notify_one();
        controller.on_refresh_complete(rx.recv().await.unwrap());
        assert_eq!(controller.target().animation_count(), 0);

        touch(&mut controller, TouchEvent::end(700.0));
        assert_eq!(controller.target().animation_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_handler_never_locks() {
        let mut controller = PullController::new(pull_config(), RecordingTarget::new());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(600.0));
        assert!(!controller.is_locked());
        assert!(!controller.is_refreshing());

        touch(&mut controller, TouchEvent::end(600.0));
        assert!(controller.is_recovering());
    }

    #[tokio::test]
    async fn touch_cancel_behaves_like_end() {
        let (handler, gate, _calls) = gated_handler();
        let (mut controller, mut rx) = controller_with(handler, pull_config());

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(500.0));
        touch(&mut controller, TouchEvent::cancel(500.0));
        assert!(!controller.is_locked());
        assert!(!controller.is_pulling());

        gate.notify_one();
        controller.on_refresh_complete(rx.recv().await.unwrap());
        assert!(controller.is_recovering());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_refresh_unfreezes_triggers() {
        let config = PullConfig {
            refresh_timeout_ms: 2000,
            ..pull_config()
        };
        let handler = refresh_fn(std::future::pending::<()>);
        let (mut controller, mut rx) = controller_with(handler, config);

        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(500.0));
        touch(&mut controller, TouchEvent::end(500.0));

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.outcome, RefreshOutcome::TimedOut);
        controller.on_refresh_complete(completion);
        assert!(!controller.is_refreshing());
        assert!(controller.is_recovering());

        controller.on_transition_end();
        touch(&mut controller, TouchEvent::start(0.0));
        touch(&mut controller, TouchEvent::moved(500.0));
        assert!(controller.is_refreshing());
        assert_eq!(controller.pending_refresh().map(|t| t.id()), Some(2));
    }
}
