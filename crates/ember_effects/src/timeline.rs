//! # Expiry Timeline
//!
//! One-shot delayed events on the simulation clock.
//!
//! The timeline owns the clock. Callers advance it from their tick and get
//! back the keys whose deadline has been reached, each exactly once and in
//! deadline order. Nothing runs on another thread; a cancelled entry is
//! simply never returned.
//!
//! Frame deltas arrive as `f32`, and values like `0.01` round down. Summed
//! over a lifetime they leave the clock a hair short of a deadline, so an
//! entry counts as due within a relative slack of `f32::EPSILON`. When one
//! fires early by that slack the clock snaps forward to its deadline.

/// True once `now` has reached `deadline`, give or take `f32` rounding.
///
/// Each `f32` delta is off by at most half an ulp, so a sum of deltas lags
/// its decimal value by less than `deadline * EPSILON / 2`.
fn is_due(deadline: f64, now: f64) -> bool {
    deadline <= now + f64::from(f32::EPSILON) * deadline.abs().max(1.0)
}

/// Handle to a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct TimerEntry<K> {
    id: TimerId,
    deadline: f64,
    key: K,
}

/// Pending one-shot entries keyed by `K`.
#[derive(Debug, Clone)]
pub struct ExpiryTimeline<K> {
    entries: Vec<TimerEntry<K>>,
    next_id: u64,
    now: f64,
}

impl<K> ExpiryTimeline<K> {
    /// Creates an empty timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            now: 0.0,
        }
    }

    /// Current simulation time.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of entries that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedules `key` to fire `delay` after the current time.
    ///
    /// A negative delay is treated as zero: the entry fires on the next advance.
    pub fn schedule_once(&mut self, delay: f64, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            deadline: self.now + delay.max(0.0),
            key,
        });
        id
    }

    /// Deadline of a pending entry.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.deadline)
    }

    /// Cancels a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Advances the clock by `dt` and returns the due keys.
    pub fn advance(&mut self, dt: f64) -> Vec<K> {
        let now = self.now + dt.max(0.0);
        self.advance_to(now)
    }

    /// Moves the clock to `now` (never backwards) and returns every key whose
    /// deadline has been reached, earliest first.
    pub fn advance_to(&mut self, now: f64) -> Vec<K> {
        if now > self.now {
            self.now = now;
        }

        let current = self.now;
        if !self.entries.iter().any(|e| is_due(e.deadline, current)) {
            return Vec::new();
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| is_due(e.deadline, current));
        self.entries = pending;

        if let Some(latest) = due.iter().map(|e| e.deadline).reduce(f64::max) {
            self.now = self.now.max(latest);
        }

        due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline).then(a.id.cmp(&b.id)));
        due.into_iter().map(|e| e.key).collect()
    }

    /// Cancels everything. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

impl<K> Default for ExpiryTimeline<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_deadline_not_before() {
        let mut timeline = ExpiryTimeline::new();
        timeline.schedule_once(2.0, "explosion");

        assert!(timeline.advance(0.5).is_empty());
        assert!(timeline.advance(0.5).is_empty());
        assert!(timeline.advance(0.75).is_empty());
        assert_eq!(timeline.advance(0.25), vec!["explosion"]);
        assert_eq!(timeline.now(), 2.0);
    }

    #[test]
    fn test_fires_on_last_frame_of_f32_steps() {
        for (dt, frames) in [(0.02_f32, 100), (0.01, 200), (1.0 / 60.0, 120)] {
            let mut timeline = ExpiryTimeline::new();
            timeline.schedule_once(2.0, ());

            let mut fired_on = None;
            for frame in 1..=frames + 1 {
                if !timeline.advance(f64::from(dt)).is_empty() {
                    fired_on = Some(frame);
                    break;
                }
            }

            assert_eq!(fired_on, Some(frames), "dt = {dt}");
            assert!(timeline.now() >= 2.0, "dt = {dt}");
            assert!(timeline.now() - 2.0 < 1e-6, "dt = {dt}");
        }
    }

    #[test]
    fn test_slack_does_not_fire_a_frame_early() {
        let mut timeline = ExpiryTimeline::new();
        timeline.schedule_once(2.0, ());

        assert!(timeline.advance(1.999).is_empty());
        assert!(timeline.advance(0.000_9).is_empty());
        assert_eq!(timeline.advance(0.000_1).len(), 1);
    }

    #[test]
    fn test_fires_exactly_once_with_jitter() {
        let mut timeline = ExpiryTimeline::new();
        timeline.schedule_once(1.0, 7u32);

        let mut fired = Vec::new();
        for dt in [0.3, 0.01, 0.9, 0.0, 1.7, 0.2] {
            fired.extend(timeline.advance(dt));
        }

        assert_eq!(fired, vec![7]);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn test_due_keys_in_deadline_order() {
        let mut timeline = ExpiryTimeline::new();
        timeline.schedule_once(2.0, 'b');
        timeline.schedule_once(1.0, 'a');
        timeline.schedule_once(2.0, 'c');

        assert_eq!(timeline.advance(5.0), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_cancelled_entry_never_fires() {
        let mut timeline = ExpiryTimeline::new();
        let id = timeline.schedule_once(1.0, 1);
        timeline.schedule_once(1.0, 2);

        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        assert_eq!(timeline.advance(1.0), vec![2]);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut timeline: ExpiryTimeline<()> = ExpiryTimeline::new();
        timeline.advance_to(3.0);
        timeline.advance_to(1.0);
        timeline.advance(-2.0);
        assert_eq!(timeline.now(), 3.0);
    }

    #[test]
    fn test_deadline_relative_to_now() {
        let mut timeline = ExpiryTimeline::new();
        timeline.advance(1.5);
        let id = timeline.schedule_once(1.0, ());
        assert_eq!(timeline.deadline(id), Some(2.5));
        assert_eq!(timeline.clear(), 1);
        assert_eq!(timeline.deadline(id), None);
    }
}
