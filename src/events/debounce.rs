//! Quiet-period debouncing for viewport resizes.
//!
//! The debouncer only does bookkeeping against caller-supplied timestamps in
//! milliseconds, so the browser (timers from `setTimeout`) and the native
//! runtime (tokio timers) share it. Each new value replaces the pending one
//! and pushes the deadline out.

/// Pending value and the time it becomes due.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending<T> {
    value: T,
    due_ms: u64,
}

/// Delays a value until no newer value has arrived for `quiet_ms`.
///
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T: Copy> Debouncer<T> {
    pub fn new(quiet_ms: u64) -> Self {
        Debouncer {
            quiet_ms,
            pending: None,
        }
    }

    pub fn quiet_ms(&self) -> u64 {
        self.quiet_ms
    }

    /// Record a new value at `now_ms`, replacing any pending one. Returns
    /// the new deadline.
    ///
    pub fn schedule(&mut self, now_ms: u64, value: T) -> u64 {
        let due_ms = now_ms.saturating_add(self.quiet_ms);
        self.pending = Some(Pending { value, due_ms });
        due_ms
    }

    /// Deadline of the pending value, if any.
    ///
    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|p| p.due_ms)
    }

    /// Take the pending value if its deadline has passed at `now_ms`.
    ///
    pub fn fire(&mut self, now_ms: u64) -> Option<T> {
        match self.pending {
            Some(p) if now_ms >= p.due_ms => {
                self.pending = None;
                Some(p.value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_values_fire_once_with_latest() {
        let mut debouncer = Debouncer::new(250);
        debouncer.schedule(0, 900u32);
        debouncer.schedule(50, 950);
        debouncer.schedule(100, 1000);
        assert_eq!(debouncer.fire(349), None);
        let deadline = debouncer.schedule(200, 1100);
        assert_eq!(deadline, 450);

        assert_eq!(debouncer.fire(350), None);
        assert_eq!(debouncer.fire(449), None);
        assert_eq!(debouncer.fire(450), Some(1100));
        assert_eq!(debouncer.fire(10_000), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn late_fire_still_delivers() {
        let mut debouncer = Debouncer::new(250);
        debouncer.schedule(10, 1300u32);
        assert_eq!(debouncer.deadline(), Some(260));
        assert_eq!(debouncer.fire(5_000), Some(1300));
    }

    #[test]
    fn zero_quiet_period_fires_immediately() {
        let mut debouncer = Debouncer::new(0);
        debouncer.schedule(42, 7u32);
        assert_eq!(debouncer.fire(42), Some(7));
        assert_eq!(debouncer.quiet_ms(), 0);
    }
}
