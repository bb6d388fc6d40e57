//! Touch input model and single-finger pull tracking

/// Phase of a touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One contact point, in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub page_y: f64,
}

/// A touch event as delivered by the host
///
/// `touches` holds the points still on the surface, `changed_touches` the
/// points that changed in this event (the lifted finger on end/cancel).
/// Only the first point of either list is ever read.
#[derive(Debug, Clone)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
    pub changed_touches: Vec<TouchPoint>,
    cancelable: bool,
    default_prevented: bool,
}

impl TouchEvent {
    fn single(phase: TouchPhase, y: f64) -> Self {
        let point = TouchPoint { page_y: y };
        let touches = match phase {
            TouchPhase::Start | TouchPhase::Move => vec![point],
            TouchPhase::End | TouchPhase::Cancel => Vec::new(),
        };
        Self {
            phase,
            touches,
            changed_touches: vec![point],
            cancelable: true,
            default_prevented: false,
        }
    }

    pub fn start(y: f64) -> Self {
        Self::single(TouchPhase::Start, y)
    }

    pub fn moved(y: f64) -> Self {
        Self::single(TouchPhase::Move, y)
    }

    pub fn end(y: f64) -> Self {
        Self::single(TouchPhase::End, y)
    }

    pub fn cancel(y: f64) -> Self {
        Self::single(TouchPhase::Cancel, y)
    }

    /// Mark whether the host still allows suppressing the default action
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Add a further finger behind the primary one
    pub fn with_extra_touch(mut self, y: f64) -> Self {
        let point = TouchPoint { page_y: y };
        if matches!(self.phase, TouchPhase::Start | TouchPhase::Move) {
            self.touches.push(point);
        }
        self.changed_touches.push(point);
        self
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Suppress the host's native scroll/bounce for this event
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Vertical position of the primary finger
    pub fn primary_y(&self) -> Option<f64> {
        match self.phase {
            TouchPhase::Start | TouchPhase::Move => self.touches.first(),
            TouchPhase::End | TouchPhase::Cancel => self.changed_touches.first(),
        }
        .map(|p| p.page_y)
    }
}

/// Answers whether the scrollable page is at its top-most position
pub trait ScrollProbe {
    fn scroll_top(&self) -> f64;

    fn is_at_top(&self) -> bool {
        self.scroll_top() == 0.0
    }
}

impl ScrollProbe for f64 {
    fn scroll_top(&self) -> f64 {
        *self
    }
}

/// Derived drag quantities for one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMetrics {
    pub movement: f64,
    pub offset: f64,
    pub max_offset: f64,
}

impl DragMetrics {
    pub fn compute(movement: f64, pull_factor: f64, max_offset: f64) -> Self {
        let offset = (movement * pull_factor).min(max_offset).max(0.0);
        Self {
            movement,
            offset,
            max_offset,
        }
    }

    /// Banner is pinned at its maximum expansion
    pub fn at_threshold(&self) -> bool {
        self.offset == self.max_offset
    }
}

/// Tracks one finger's vertical drag from touch-start to touch-end
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    is_pulling: bool,
    start_y: f64,
    last_y: f64,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_pulling(&self) -> bool {
        self.is_pulling
    }

    pub fn start_y(&self) -> f64 {
        self.start_y
    }

    /// Begin a pull if the page sits at its top; returns whether it began
    pub fn begin(&mut self, y: f64, page: &dyn ScrollProbe) -> bool {
        if !page.is_at_top() {
            self.is_pulling = false;
            return false;
        }
        self.is_pulling = true;
        self.start_y = y;
        self.last_y = y;
        true
    }

    /// Movement of `y` relative to the pull origin
    pub fn track(&mut self, y: f64) -> f64 {
        self.last_y = y;
        y - self.start_y
    }

    /// End the pull; returns the net movement if a pull was active
    ///
    /// Falls back to the last tracked position when the host supplies no
    /// lifted point.
    pub fn finish(&mut self, y: Option<f64>) -> Option<f64> {
        if !self.is_pulling {
            return None;
        }
        self.is_pulling = false;
        let end_y = y.unwrap_or(self.last_y);
        Some(end_y - self.start_y)
    }
}
