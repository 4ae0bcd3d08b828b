use crate::detector::internals::Pitch;
use crate::error::EstimateError;
use crate::float::Float;

pub mod internals;
pub mod yin;

pub trait PitchDetector<T>
where
    T: Float,
{
    /// Estimate the fundamental frequency of `signal`, reporting why no pitch
    /// was found when the estimate fails.
    fn try_get_pitch(&mut self, signal: &[T], sample_rate: T) -> Result<Pitch<T>, EstimateError>;

    fn get_pitch(&mut self, signal: &[T], sample_rate: T) -> Option<Pitch<T>> {
        self.try_get_pitch(signal, sample_rate).ok()
    }
}
