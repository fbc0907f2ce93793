/// Rate limiter for hover updates while a piece is being dragged.
///
/// Hover is purely visual, so dropping intermediate updates is harmless. The
/// first update is always accepted; afterwards at most one per
/// `min_interval_ms`.
#[derive(Debug, Clone)]
pub struct HoverThrottle {
    min_interval_ms: u64,
    last_accept_ms: u64,
    has_accepted: bool,
}

impl HoverThrottle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_accept_ms: 0,
            has_accepted: false,
        }
    }

    /// Decide whether the update at `now_ms` should be applied.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if !self.has_accepted {
            self.has_accepted = true;
            self.last_accept_ms = now_ms;
            return true;
        }

        if now_ms.saturating_sub(self.last_accept_ms) >= self.min_interval_ms {
            self.last_accept_ms = now_ms;
            return true;
        }

        false
    }

    /// Forget history so the next update is accepted immediately
    pub fn reset(&mut self) {
        self.has_accepted = false;
        self.last_accept_ms = 0;
    }
}
