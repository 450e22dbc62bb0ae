//! Edge detection with a shared quiet interval.
//!
//! A direction is reported when its bit is set in the current sample and
//! clear in the previous one, and only if no action was accepted during
//! the last `interval` ticks. Edges arriving inside the interval are lost,
//! not deferred. The previous sample is updated on every poll.

use greenhouse_common::hal::types::Buttons;

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: u64,
    previous: Buttons,
    last_action: Option<u64>,
}

impl Debouncer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: interval_ms,
            previous: Buttons::empty(),
            last_action: None,
        }
    }

    /// Start over for a new screen. `held` is the sample that caused the
    /// screen change; directions still held in it are not edges.
    pub fn reset(&mut self, held: Buttons) {
        self.previous = held;
        self.last_action = None;
    }

    /// Process one sample taken at tick `now`. Only directions in
    /// `relevant` are reported or start the quiet interval.
    pub fn poll(&mut self, sample: Buttons, now: u64, relevant: Buttons) -> Buttons {
        let quiet = match self.last_action {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        let edges = sample.rising_since(self.previous) & relevant;
        self.previous = sample;
        if !quiet || edges.is_empty() {
            return Buttons::empty();
        }
        self.last_action = Some(now);
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: Buttons = Buttons::all();

    #[test]
    fn held_button_fires_once() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::UP, 0, ALL), Buttons::UP);
        assert_eq!(d.poll(Buttons::UP, 200, ALL), Buttons::empty());
        assert_eq!(d.poll(Buttons::UP, 400, ALL), Buttons::empty());
    }

    #[test]
    fn edges_closer_than_interval_collapse() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::DOWN, 1000, ALL), Buttons::DOWN);
        assert_eq!(d.poll(Buttons::empty(), 1020, ALL), Buttons::empty());
        // Second edge 40 ticks after the first accepted one.
        assert_eq!(d.poll(Buttons::DOWN, 1040, ALL), Buttons::empty());
        assert_eq!(d.poll(Buttons::empty(), 1060, ALL), Buttons::empty());
        // Still held at the end of the interval: no new edge.
        assert_eq!(d.poll(Buttons::empty(), 1100, ALL), Buttons::empty());
    }

    #[test]
    fn edges_at_interval_are_both_accepted() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::DOWN, 1000, ALL), Buttons::DOWN);
        assert_eq!(d.poll(Buttons::empty(), 1050, ALL), Buttons::empty());
        assert_eq!(d.poll(Buttons::DOWN, 1100, ALL), Buttons::DOWN);
    }

    #[test]
    fn interval_is_shared_across_directions() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::UP, 0, ALL), Buttons::UP);
        assert_eq!(d.poll(Buttons::CENTER, 20, ALL), Buttons::empty());
        assert_eq!(d.poll(Buttons::empty(), 40, ALL), Buttons::empty());
        assert_eq!(d.poll(Buttons::CENTER, 120, ALL), Buttons::CENTER);
    }

    #[test]
    fn irrelevant_edges_do_not_start_interval() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::LEFT, 0, Buttons::CENTER), Buttons::empty());
        assert_eq!(d.poll(Buttons::CENTER, 20, Buttons::CENTER), Buttons::CENTER);
    }

    #[test]
    fn simultaneous_edges_are_reported_together() {
        let mut d = Debouncer::new(100);
        let both = Buttons::UP | Buttons::LEFT;
        assert_eq!(d.poll(both, 0, ALL), both);
    }

    #[test]
    fn reset_clears_interval_but_keeps_held_directions() {
        let mut d = Debouncer::new(100);
        assert_eq!(d.poll(Buttons::CENTER, 500, ALL), Buttons::CENTER);
        d.reset(Buttons::CENTER);
        // Held through the reset: not an edge.
        assert_eq!(d.poll(Buttons::CENTER, 510, ALL), Buttons::empty());
        // Interval restarted: a new edge right away is accepted.
        assert_eq!(d.poll(Buttons::CENTER | Buttons::UP, 530, ALL), Buttons::UP);
        d.reset(Buttons::empty());
        assert_eq!(d.poll(Buttons::CENTER, 540, ALL), Buttons::CENTER);
    }
}
