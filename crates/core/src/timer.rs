//! Interval timers driven by elapsed milliseconds.
//!
//! Nothing here reads a clock. The host calls [`Timers::advance`] with the
//! time that passed since the previous call, the same way the game loop feeds
//! `tick(elapsed_ms)`. Cancelling a handle guarantees it never fires again.

/// Opaque handle for a running interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone, Copy)]
struct Interval {
    handle: TimerHandle,
    period_ms: u32,
    accumulated_ms: u32,
}

/// One interval that fired during [`Timers::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    /// Number of whole periods that elapsed
    pub count: u32,
}

/// Set of cancellable interval timers
#[derive(Debug, Clone, Default)]
pub struct Timers {
    next_id: u32,
    intervals: Vec<Interval>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer. A zero period is bumped to 1 ms.
    pub fn start_interval(&mut self, period_ms: u32) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);
        self.intervals.push(Interval {
            handle,
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
        });
        handle
    }

    /// Cancel one timer. Returns false if it was not running.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.handle != handle);
        self.intervals.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.intervals.clear();
    }

    pub fn is_running(&self, handle: TimerHandle) -> bool {
        self.intervals.iter().any(|i| i.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.intervals.len()
    }

    /// Advance every running timer, returning those that fired in start order.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<Fired> {
        let mut fired = Vec::new();
        for interval in &mut self.intervals {
            interval.accumulated_ms = interval.accumulated_ms.saturating_add(elapsed_ms);
            let count = interval.accumulated_ms / interval.period_ms;
            if count > 0 {
                interval.accumulated_ms %= interval.period_ms;
                fired.push(Fired {
                    handle: interval.handle,
                    count,
                });
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_full_period() {
        let mut timers = Timers::new();
        let h = timers.start_interval(1000);
        assert!(timers.advance(999).is_empty());
        assert_eq!(timers.advance(1), vec![Fired { handle: h, count: 1 }]);
        assert!(timers.advance(500).is_empty());
    }

    #[test]
    fn large_step_fires_multiple_periods() {
        let mut timers = Timers::new();
        let h = timers.start_interval(1000);
        assert_eq!(timers.advance(3500), vec![Fired { handle: h, count: 3 }]);
        assert_eq!(timers.advance(500), vec![Fired { handle: h, count: 1 }]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let a = timers.start_interval(100);
        let b = timers.start_interval(100);
        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert!(!timers.is_running(a));
        let fired = timers.advance(100);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, b);

        timers.cancel_all();
        assert_eq!(timers.active_count(), 0);
        assert!(timers.advance(1000).is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let mut timers = Timers::new();
        let a = timers.start_interval(10);
        timers.cancel(a);
        let b = timers.start_interval(10);
        assert_ne!(a, b);
    }
}
