//! Exponential smoothing of per-block pitch estimates, combined with a change
//! detector so that a steady pitch does not re-trigger note evaluation on
//! every block.
use crate::float::Float;
use crate::note::cents_between;

/// Weight given to the previous smoothed value.
pub const DEFAULT_SMOOTHING: f64 = 0.8;
/// Smallest movement, in cents, that counts as a pitch change.
pub const DEFAULT_CHANGE_THRESHOLD_CENTS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct PitchSmoother<T> {
    smoothing: T,
    change_threshold_cents: f64,
    current: T,
    accepted: T,
}

impl<T: Float> PitchSmoother<T> {
    /// `smoothing` is the weight of the running value; `1 - smoothing` goes to
    /// each new estimate.
    pub fn new(smoothing: T, change_threshold_cents: f64) -> Self {
        PitchSmoother {
            smoothing,
            change_threshold_cents,
            current: T::zero(),
            accepted: T::zero(),
        }
    }

    /// Current smoothed frequency, zero when there is no pitch.
    pub fn current(&self) -> T {
        self.current
    }

    /// Frequency last handed to the note state machine.
    pub fn accepted(&self) -> T {
        self.accepted
    }

    /// Fold a raw estimate into the running value. Returns the new smoothed
    /// frequency when it moved far enough from the accepted one to warrant a
    /// note re-evaluation, otherwise `None`.
    ///
    /// With no history the smoother seeds itself from `raw`, so a note onset
    /// does not sweep up from 0 Hz through every intermediate note.
    pub fn update(&mut self, raw: T) -> Option<T> {
        self.current = if self.current > T::zero() {
            self.smoothing * self.current + (T::one() - self.smoothing) * raw
        } else {
            raw
        };

        if self.has_changed() {
            self.accepted = self.current;
            Some(self.current)
        } else {
            None
        }
    }

    /// Forget all history. Called when a block has no pitch.
    pub fn reset(&mut self) {
        self.current = T::zero();
        self.accepted = T::zero();
    }

    fn has_changed(&self) -> bool {
        if self.current == self.accepted {
            return false;
        }
        if self.accepted <= T::zero() {
            return true;
        }
        match (self.accepted.to_f64(), self.current.to_f64()) {
            (Some(from), Some(to)) => cents_between(from, to).abs() >= self.change_threshold_cents,
            _ => true,
        }
    }
}

impl<T: Float> Default for PitchSmoother<T> {
    fn default() -> Self {
        PitchSmoother::new(
            T::from_f64(DEFAULT_SMOOTHING).unwrap(),
            DEFAULT_CHANGE_THRESHOLD_CENTS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_estimate_seeds_the_smoother() {
        let mut smoother = PitchSmoother::<f64>::default();
        assert_eq!(smoother.update(440.0), Some(440.0));
        assert_eq!(smoother.current(), 440.0);
        assert_eq!(smoother.accepted(), 440.0);
    }

    #[test]
    fn later_estimates_are_smoothed() {
        let mut smoother = PitchSmoother::<f64>::new(0.8, 0.0);
        smoother.update(400.0);
        let next = smoother.update(500.0).unwrap();
        assert!((next - 420.0).abs() < 1e-9);
    }

    #[test]
    fn jitter_below_threshold_is_suppressed() {
        let mut smoother = PitchSmoother::<f64>::new(0.8, 5.0);
        smoother.update(440.0);
        // 441 Hz is ~3.9 cents above 440; after smoothing the move is under 1 cent.
        assert_eq!(smoother.update(441.0), None);
        assert_eq!(smoother.update(439.0), None);
        assert_eq!(smoother.accepted(), 440.0);
        assert!(smoother.current() != 440.0);
    }

    #[test]
    fn steady_input_is_accepted_once() {
        let mut smoother = PitchSmoother::<f32>::default();
        let changes = (0..20).filter_map(|_| smoother.update(261.63)).count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn slow_drift_is_eventually_accepted() {
        let mut smoother = PitchSmoother::<f64>::new(0.0, 10.0);
        smoother.update(440.0);
        // Each step is ~3.9 cents; the third one crosses 10 cents from 440.
        assert_eq!(smoother.update(441.0), None);
        assert_eq!(smoother.update(442.0), None);
        assert_eq!(smoother.update(443.0), Some(443.0));
    }

    #[test]
    fn reset_clears_history() {
        let mut smoother = PitchSmoother::<f64>::default();
        smoother.update(440.0);
        smoother.reset();
        assert_eq!(smoother.current(), 0.0);
        assert_eq!(smoother.update(220.0), Some(220.0));
    }
}
