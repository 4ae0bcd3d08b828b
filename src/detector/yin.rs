//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//! It is efficient and offers an improvement over basic autocorrelation.
//!
//! Let $S=(s_0,s_1,\ldots,s_N)$ be a discrete signal and $W = N/2$. The *square difference function*
//! at lag $\tau$ is defined by
//! $$ d(\tau) = \sum_{j=0}^{W-1} (s_j-s_{j+\tau})^2. $$
//! This function is close to zero when the signal "lines up" with itself. However, *close* is a relative term,
//! and the value of $d(\tau)$ depends on volume, which should not affect the pitch of the signal. For this
//! reason, the signal is normalized. The YIN algorithm computes the *cumulative mean normalized difference function*,
//! $$ d\'(\tau) = \begin{cases}1&\text{if }\tau=0\\\\ d(\tau) / \left[ \tfrac{1}{\tau}\sum_{k=1}^\tau d(k) \right] & \text{otherwise}\end{cases}. $$
//! Then, it searches for the first lag where $d\'$ drops below an absolute threshold and follows
//! that dip down to its local minimum.
//!
//! ## Implementation
//! Rather than compute the square difference function directly,
//! an [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform) is used. The FFT plans and all
//! scratch buffers are created by [YINDetector::new], so [PitchDetector::try_get_pitch]
//! performs a bounded amount of work and never allocates.
//!
//! After a candidate lag is found, quadratic interpolation is applied to further refine the estimate.
//!
//! The current implementation does not perform *Step 6* of the algorithm specified in the YIN paper.

use crate::detector::internals::Pitch;
use crate::detector::PitchDetector;
use crate::error::EstimateError;
use crate::float::Float;
use crate::utils::buffer::new_real_buffer;
use crate::utils::peak::{correct_dip, find_dip};

use super::internals::{windowed_square_error, yin_normalize_square_error, DetectorInternals};

/// The threshold used in the YIN paper.
pub const DEFAULT_THRESHOLD: f64 = 0.10;

/// Interpolation needs lags `τ-1`, `τ` and `τ+1`, so the window must hold at least three lags.
const MIN_WINDOW_SIZE: usize = 3;

pub struct YINDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    difference: Vec<T>,
    threshold: T,
}

impl<T> YINDetector<T>
where
    T: Float,
{
    /// Create a detector for blocks of `size` samples using [DEFAULT_THRESHOLD].
    pub fn new(size: usize) -> Self {
        Self::with_threshold(size, T::from_f64(DEFAULT_THRESHOLD).unwrap())
    }

    pub fn with_threshold(size: usize, threshold: T) -> Self {
        let internals = DetectorInternals::<T>::new(size);
        YINDetector {
            internals,
            difference: new_real_buffer(size / 2),
            threshold,
        }
    }

    pub fn size(&self) -> usize {
        self.internals.size
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
///
/// Blocks longer than the detector size are analysed over their most recent
/// `size` samples. Shorter blocks are zero padded inside the FFT, which leaves
/// the difference function over the shorter window exact.
impl<T> PitchDetector<T> for YINDetector<T>
where
    T: Float,
{
    fn try_get_pitch(&mut self, signal: &[T], sample_rate: T) -> Result<Pitch<T>, EstimateError> {
        let size = self.internals.size;
        let signal = if signal.len() > size {
            &signal[signal.len() - size..]
        } else {
            signal
        };
        let window_size = signal.len() / 2;

        if window_size < MIN_WINDOW_SIZE {
            return Err(EstimateError::InsufficientSamples);
        }

        let result = &mut self.difference[..window_size];

        // STEP 1: Calculate the difference function, d_t.
        windowed_square_error(signal, window_size, &mut self.internals, result);

        // STEP 2: Calculate the cumulative mean normalized difference function, d_t'.
        if !yin_normalize_square_error(result) {
            return Err(EstimateError::DegenerateNormalization);
        }

        // STEP 3: The absolute threshold. We want the first dip below `threshold`,
        // followed down to its bottom.
        let tau = find_dip(result, self.threshold).ok_or(EstimateError::NoDip)?;

        // STEP 4: Use quadratic interpolation to fine-tune the lag.
        let (lag, minimum) = correct_dip(tau, result);

        // A `clarity` is not given by the YIN algorithm. However, we can say a pitch
        // has higher clarity if its normalized square error is closer to zero.
        let clarity = (T::one() - minimum).max(T::zero()).min(T::one());

        // STEP 5: Convert the lag to a frequency.
        Ok(Pitch {
            frequency: sample_rate / lag,
            clarity,
        })

        // STEP 6: TODO. Step 6 of the YIN paper can eek out a little more accuracy/consistency, but
        // it also involves computing over a much larger window.
    }
}
