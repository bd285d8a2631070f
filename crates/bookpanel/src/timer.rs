use std::time::Instant;

/// Single-slot deadline timer.
///
/// Holds at most one pending value; scheduling again replaces the previous
/// one, so at most one firing is ever outstanding. The host drives it by
/// calling [`DelaySlot::fire`] from its tick loop — the slot never blocks or
/// spawns. Used for the search debounce and the long-press gesture.
#[derive(Debug)]
pub struct DelaySlot<T> {
    pending: Option<(T, Instant)>,
}

impl<T> Default for DelaySlot<T> {
    fn default() -> Self {
        DelaySlot { pending: None }
    }
}

impl<T> DelaySlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` to fire at `deadline`, replacing any pending value.
    pub fn schedule(&mut self, value: T, deadline: Instant) {
        self.pending = Some((value, deadline));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_only_after_deadline() {
        let start = Instant::now();
        let mut slot = DelaySlot::new();
        slot.schedule("q", start + Duration::from_millis(200));

        assert_eq!(slot.fire(start), None);
        assert_eq!(slot.fire(start + Duration::from_millis(199)), None);
        assert_eq!(slot.fire(start + Duration::from_millis(200)), Some("q"));
        assert!(!slot.is_pending());
    }

    #[test]
    fn reschedule_replaces_pending_value() {
        let start = Instant::now();
        let mut slot = DelaySlot::new();
        slot.schedule("first", start + Duration::from_millis(200));
        slot.schedule("second", start + Duration::from_millis(400));

        // The first deadline passes with nothing to fire.
        assert_eq!(slot.fire(start + Duration::from_millis(300)), None);
        assert_eq!(
            slot.fire(start + Duration::from_millis(400)),
            Some("second")
        );
    }

    #[test]
    fn cancel_discards_pending() {
        let start = Instant::now();
        let mut slot = DelaySlot::new();
        slot.schedule(1, start);
        slot.cancel();
        assert_eq!(slot.fire(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn fires_at_most_once() {
        let start = Instant::now();
        let mut slot = DelaySlot::new();
        slot.schedule(7, start);
        assert_eq!(slot.fire(start), Some(7));
        assert_eq!(slot.fire(start + Duration::from_secs(1)), None);
    }
}
