use strata_core::ScrollMetrics;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollConfig {
    /// Distance (px) from the container's top or bottom edge that scrolls.
    pub band: f32,
    /// Each frame scrolls `scroll_height / step_divisor`.
    pub step_divisor: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            band: 100.0,
            step_divisor: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Edge scrolling while a drag or rectangle select is in progress.
#[derive(Debug, Clone, Default)]
pub struct AutoScroll {
    active: Option<ScrollDirection>,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.active
    }

    /// Re-evaluate against the pointer's viewport-relative `y`.
    pub fn update(&mut self, pointer_y: f32, metrics: &ScrollMetrics, config: &AutoScrollConfig) {
        let from_bottom = metrics.client_height - pointer_y;
        self.active = if !metrics.is_scrollable() {
            None
        } else if pointer_y > 0.0 && pointer_y < config.band && !metrics.at_top() {
            Some(ScrollDirection::Up)
        } else if from_bottom > 0.0 && from_bottom < config.band && !metrics.at_bottom() {
            Some(ScrollDirection::Down)
        } else {
            None
        };
    }

    /// Scroll delta for this frame, clamped to the scrollable range. Stops
    /// once the container reaches the end it was scrolling towards.
    pub fn step(&mut self, metrics: &ScrollMetrics, config: &AutoScrollConfig) -> f32 {
        let Some(direction) = self.active else {
            return 0.0;
        };
        let step = metrics.scroll_height / config.step_divisor.max(1.0);
        let max_top = (metrics.scroll_height - metrics.client_height).max(0.0);
        let delta = match direction {
            ScrollDirection::Up => -step.min(metrics.scroll_top),
            ScrollDirection::Down => step.min(max_top - metrics.scroll_top).max(0.0),
        };
        if delta == 0.0 {
            self.active = None;
        }
        delta
    }

    pub fn stop(&mut self) {
        self.active = None;
    }
}

/// Keeps only the latest value between animation frames.
#[derive(Debug, Clone)]
pub struct FrameThrottle<T> {
    pending: Option<T>,
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameThrottle<T> {
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
