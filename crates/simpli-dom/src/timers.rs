//! Timer APIs
//!
//! setTimeout / setInterval on a virtual clock. The host decides when time
//! passes by calling `advance` or `run_until_idle`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Upper bound on callbacks fired by one `run_until_idle`
const MAX_IDLE_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u32);

impl TimerId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

pub type TimerCallback = Box<dyn FnMut(TimerId)>;

/// Timer entry
struct Timer {
    due: u64,
    delay_ms: u64,
    repeat: bool,
    /// Taken out while the callback runs
    callback: Option<TimerCallback>,
}

/// Timer manager
///
/// Shared through `Rc`; every method takes `&self` so callbacks can
/// schedule or clear timers while they run.
#[derive(Default)]
pub struct TimerManager {
    timers: RefCell<BTreeMap<TimerId, Timer>>,
    now_ms: Cell<u64>,
    next_id: Cell<u32>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule(&self, delay_ms: u64, repeat: bool, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.timers.borrow_mut().insert(
            id,
            Timer {
                due: self.now_ms.get() + delay_ms,
                delay_ms,
                repeat,
                callback: Some(callback),
            },
        );
        id
    }

    /// Add a timeout
    pub fn set_timeout(&self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        self.schedule(delay_ms, false, callback)
    }

    /// Add an interval (delay clamped to at least 1ms)
    pub fn set_interval(&self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        self.schedule(delay_ms.max(1), true, callback)
    }

    /// Clear a timer, returns whether it was pending
    pub fn clear(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().remove(&id).is_some()
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(&id)
    }

    /// Virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms.get()
    }

    /// Milliseconds until the next timer fires
    pub fn time_until_next(&self) -> Option<u64> {
        let now = self.now_ms.get();
        self.timers
            .borrow()
            .values()
            .filter(|t| t.callback.is_some())
            .map(|t| t.due.saturating_sub(now))
            .min()
    }

    fn next_due(&self, until: u64) -> Option<(TimerId, u64)> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, t)| t.due <= until && t.callback.is_some())
            .min_by_key(|(id, t)| (t.due, **id))
            .map(|(id, t)| (*id, t.due))
    }

    /// Move the clock forward, firing due timers in (due time, id) order.
    /// Returns the number of callbacks run.
    pub fn advance(&self, ms: u64) -> usize {
        let until = self.now_ms.get() + ms;
        let mut fired = 0;
        while let Some((id, due)) = self.next_due(until) {
            self.now_ms.set(self.now_ms.get().max(due));
            let callback = {
                let mut timers = self.timers.borrow_mut();
                match timers.get_mut(&id) {
                    Some(timer) if timer.repeat => {
                        timer.due += timer.delay_ms;
                        timer.callback.take()
                    }
                    Some(_) => timers.remove(&id).and_then(|t| t.callback),
                    None => None,
                }
            };
            let Some(mut callback) = callback else {
                continue;
            };
            callback(id);
            fired += 1;
            // Cleared from inside the callback: drop it.
            if let Some(timer) = self.timers.borrow_mut().get_mut(&id) {
                timer.callback = Some(callback);
            }
        }
        self.now_ms.set(until);
        fired
    }

    /// Fire timers until none remain (bounded for runaway intervals)
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(wait) = self.time_until_next() {
            if fired >= MAX_IDLE_ITERATIONS {
                tracing::warn!(pending = self.pending_count(), "timers still pending after iteration limit");
                break;
            }
            fired += self.advance(wait);
        }
        fired
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("now_ms", &self.now_ms.get())
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_timer_manager() {
        let tm = TimerManager::new();

        let id1 = tm.set_timeout(100, Box::new(|_| {}));
        let id2 = tm.set_timeout(200, Box::new(|_| {}));

        assert!(tm.has_pending());

        assert!(tm.clear(id1));
        assert!(tm.has_pending()); // Still has id2

        assert!(tm.clear(id2));
        assert!(!tm.has_pending());
        assert!(!tm.clear(id2));
    }

    #[test]
    fn test_timeout_fires_once() {
        let tm = TimerManager::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        tm.set_timeout(50, Box::new(move |_| h.set(h.get() + 1)));

        assert_eq!(tm.advance(49), 0);
        assert_eq!(tm.advance(1), 1);
        assert_eq!(tm.advance(1000), 0);
        assert_eq!(hits.get(), 1);
        assert!(!tm.has_pending());
    }

    #[test]
    fn test_interval_repeats_until_cleared() {
        let tm = Rc::new(TimerManager::new());
        let hits = Rc::new(Cell::new(0));
        let (h, t) = (hits.clone(), tm.clone());
        tm.set_interval(
            10,
            Box::new(move |id| {
                h.set(h.get() + 1);
                if h.get() == 3 {
                    t.clear(id);
                }
            }),
        );

        assert_eq!(tm.advance(25), 2);
        assert_eq!(tm.now(), 25);
        tm.run_until_idle();
        assert_eq!(hits.get(), 3);
        assert!(!tm.has_pending());
    }

    #[test]
    fn test_fire_order_by_due_then_id() {
        let tm = TimerManager::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, name) in [(20, "c"), (10, "a"), (10, "b")] {
            let order = order.clone();
            tm.set_timeout(delay, Box::new(move |_| order.borrow_mut().push(name)));
        }
        tm.run_until_idle();
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let tm = TimerManager::new();
        tm.set_interval(0, Box::new(|_| {}));
        assert_eq!(tm.time_until_next(), Some(1));
    }
}
