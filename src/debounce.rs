// Viewport-change signal with a fixed coalescing window.

use crate::selection::Viewport;

/// Quiet period after the last resize before a rebuild fires.
pub const RESIZE_QUIET_MS: u64 = 100;

/// Trailing-edge debouncer fed with timestamped viewport changes.
///
/// Time comes from the caller, so coalescing is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    window_ms: u64,
    pending: Option<(Viewport, u64)>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Debouncer {
            window_ms,
            pending: None,
        }
    }

    /// Record a viewport change at `now_ms`, restarting the quiet window.
    pub fn signal(&mut self, viewport: Viewport, now_ms: u64) {
        self.pending = Some((viewport, now_ms));
    }

    /// Release the latest viewport once the window has elapsed without a new signal.
    pub fn poll(&mut self, now_ms: u64) -> Option<Viewport> {
        match self.pending {
            Some((viewport, at)) if now_ms.saturating_sub(at) >= self.window_ms => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release whatever is pending regardless of time.
    pub fn flush(&mut self) -> Option<Viewport> {
        self.pending.take().map(|(viewport, _)| viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_coalesces_to_last() {
        let mut d = Debouncer::new(RESIZE_QUIET_MS);
        d.signal(Viewport::new(600, 400), 0);
        d.signal(Viewport::new(650, 400), 40);
        d.signal(Viewport::new(700, 400), 90);
        assert_eq!(d.poll(150), None);
        assert_eq!(d.poll(190), Some(Viewport::new(700, 400)));
        assert_eq!(d.poll(500), None);
    }

    #[test]
    fn test_flush() {
        let mut d = Debouncer::new(RESIZE_QUIET_MS);
        assert_eq!(d.flush(), None);
        d.signal(Viewport::new(10, 10), 5);
        assert!(d.is_pending());
        assert_eq!(d.flush(), Some(Viewport::new(10, 10)));
        assert!(!d.is_pending());
    }
}
