//! RMS silence gate.
use crate::float::Float;
use crate::utils::buffer::mean_square;

/// The RMS level below which a block counts as silence.
pub const DEFAULT_SILENCE_THRESHOLD: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Silent,
    Active,
}

/// Classifies blocks as silent or active by comparing their RMS level with a
/// threshold. The comparison is done on the mean square against the squared
/// threshold, which avoids a square root per block.
#[derive(Debug, Clone, Copy)]
pub struct SignalGate<T> {
    threshold: T,
    threshold_squared: T,
}

impl<T: Float> SignalGate<T> {
    pub fn new(threshold: T) -> Self {
        SignalGate {
            threshold,
            threshold_squared: threshold * threshold,
        }
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    /// An empty block is silent.
    pub fn classify(&self, block: &[T]) -> GateState {
        if block.is_empty() || mean_square(block) < self.threshold_squared {
            GateState::Silent
        } else {
            GateState::Active
        }
    }
}

impl<T: Float> Default for SignalGate<T> {
    fn default() -> Self {
        SignalGate::new(T::from_f64(DEFAULT_SILENCE_THRESHOLD).unwrap())
    }
}
