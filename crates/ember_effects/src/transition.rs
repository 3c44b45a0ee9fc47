//! Linear position transitions.
//!
//! Implosion particles do not integrate a velocity; their position is a
//! straight-line interpolation from the scatter point to the origin.

use ember_shared::Vec2;

/// A 2D value moving linearly from `from` to `to` over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTransition {
    from: Vec2,
    to: Vec2,
    duration: f32,
    elapsed: f32,
}

impl LinearTransition {
    /// Creates a transition at its start point.
    #[must_use]
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Progress in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        }
    }

    /// Current value. Snaps exactly to `to` when complete.
    #[must_use]
    pub fn value(&self) -> Vec2 {
        if self.is_complete() {
            self.to
        } else {
            self.from.lerp(self.to, self.progress())
        }
    }

    /// Returns true if the transition has reached its destination.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advances by `dt` and returns the new value.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        if !self.is_complete() {
            self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        }
        self.value()
    }

    /// Jumps to an absolute elapsed time, clamped to `0..=duration`.
    pub fn seek(&mut self, elapsed: f32) -> Vec2 {
        self.elapsed = elapsed.clamp(0.0, self.duration);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halfway_is_midpoint() {
        let mut t = LinearTransition::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0), 1.0);
        assert_eq!(t.advance(0.5), Vec2::new(5.0, 5.0));
        assert!(!t.is_complete());
    }

    #[test]
    fn test_snaps_to_target() {
        let target = Vec2::new(5.0, 5.0);
        let mut t = LinearTransition::new(Vec2::new(-3.3, 12.7), target, 1.0);

        // ~60fps for more than the duration
        for _ in 0..70 {
            t.advance(0.016);
        }

        assert!(t.is_complete());
        assert_eq!(t.value(), target);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let t = LinearTransition::new(Vec2::ZERO, Vec2::X, 0.0);
        assert!(t.is_complete());
        assert_eq!(t.value(), Vec2::X);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut t = LinearTransition::new(Vec2::ZERO, Vec2::new(4.0, 0.0), 1.0);
        t.advance(0.25);
        t.advance(-1.0);
        assert_eq!(t.value(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_seek_clamps() {
        let mut t = LinearTransition::new(Vec2::ZERO, Vec2::new(4.0, 0.0), 1.0);
        assert_eq!(t.seek(0.75), Vec2::new(3.0, 0.0));
        assert_eq!(t.seek(3.0), Vec2::new(4.0, 0.0));
        assert!(t.is_complete());
    }
}
