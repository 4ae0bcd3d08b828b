use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::float::Float;
use crate::utils::buffer::square_sum;
use crate::utils::buffer::ScratchBuffers;
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex};

/// Values of the difference function within this many machine epsilons of the
/// window power are rounding noise from the FFT and are clamped to zero.
const ROUNDING_FLOOR_ULPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    pub clarity: T,
}

/// FFT plans and scratch buffers needed for pitch computation. Everything is
/// created once in [DetectorInternals::new] and reused for every block.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
    pub buffers: ScratchBuffers<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let inv_fft = planner.plan_fft_inverse(size);
        let scratch_size = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());
        let buffers = ScratchBuffers::new(size, scratch_size);

        DetectorInternals {
            size,
            fft,
            inv_fft,
            buffers,
        }
    }
}

/// Compute the windowed autocorrelation of `signal` and put the result in `result`.
/// For a signal _x=(x_0,x_1,...)_, the windowed autocorrelation with window size _w_ is
/// the function
///
/// > r(t) = sum_{i=0}^{w-1} x_i*x_{i+t}
///
/// This function assumes `window_size` is at most half of the length of `signal`
/// and that `signal` fits in the FFT length of `internals`.
pub fn windowed_autocorrelation<T>(
    signal: &[T],
    window_size: usize,
    internals: &mut DetectorInternals<T>,
    result: &mut [T],
) where
    T: Float,
{
    assert!(
        internals.size >= signal.len(),
        "The FFT length must be at least the length of `signal`."
    );

    let size = internals.size;
    let ScratchBuffers {
        signal: signal_complex,
        window: truncated_signal_complex,
        fft_scratch: scratch,
        ..
    } = &mut internals.buffers;

    // To achieve the windowed autocorrelation, we compute the cross correlation between
    // the original signal and the signal truncated to lie in `0..window_size`.
    // Both are zero padded to the FFT length; since t + i < 2 * window_size <= signal.len(),
    // the circular correlation never wraps around.
    copy_real_to_complex(signal, signal_complex);
    copy_real_to_complex(&signal[..window_size], truncated_signal_complex);
    internals
        .fft
        .process_with_scratch(&mut signal_complex[..size], scratch);
    internals
        .fft
        .process_with_scratch(&mut truncated_signal_complex[..size], scratch);
    // rustfft doesn't normalize, so fft -> inverse fft scales by `size`.
    let normalization_const = T::one() / T::from_usize(size).unwrap();
    signal_complex
        .iter_mut()
        .zip(truncated_signal_complex.iter())
        .for_each(|(a, b)| {
            *a = *a * normalization_const * b.conj();
        });
    internals
        .inv_fft
        .process_with_scratch(&mut signal_complex[..size], scratch);

    // The result is valid only for `0..window_size`
    copy_complex_to_real(&signal_complex[..window_size], result);
}

/// Compute the windowed square error, _d(t)_, of `signal`. For a window size of _w_ and a signal
/// _x=(x_0,x_1,...)_, this is defined by
///
///  > d(t) = sum_{i=0}^{w-1} (x_i - x_{i+t})^2
///
/// This function is computed efficiently using an FFT. It is assumed that `window_size` is at most half
/// the length of `signal`.
pub fn windowed_square_error<T>(
    signal: &[T],
    window_size: usize,
    internals: &mut DetectorInternals<T>,
    result: &mut [T],
) where
    T: Float,
{
    assert!(
        2 * window_size <= signal.len(),
        "The window size cannot be more than half the signal length"
    );

    let two = T::from_f64(2.).unwrap();
    let floor_ulps = T::epsilon() * T::from_usize(ROUNDING_FLOOR_ULPS).unwrap();

    // d(t) = pow_0^w + pow_t^{t+w} - 2*windowed_autocorrelation(t)
    // where pow_a^b is the sum of the square of `signal` on the window `a..b`.
    windowed_autocorrelation(signal, window_size, internals, result);
    let mut windowed_power = square_sum(&signal[..window_size]);
    let power = windowed_power;

    result[..window_size]
        .iter_mut()
        .enumerate()
        .for_each(|(i, a)| {
            let diff = power + windowed_power - two * *a;
            let floor = floor_ulps * (power + windowed_power);
            *a = if diff > floor { diff } else { T::zero() };
            // Slide the window: pow_{t+1}^{t+1+w} from pow_t^{t+w}.
            windowed_power = windowed_power - signal[i] * signal[i]
                + signal[i + window_size] * signal[i + window_size];
        })
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the square error function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) * t / sum_{i=1}^t d(i)
///
/// Lags whose running sum is still zero get _d'(t) = 1_. Returns `false` when
/// the running sum never became positive, i.e. the normalization is degenerate.
pub fn yin_normalize_square_error<T: Float>(square_error: &mut [T]) -> bool {
    if square_error.is_empty() {
        return false;
    }
    let mut sum = T::zero();
    square_error[0] = T::one();
    square_error
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(tau, a)| {
            sum = sum + *a;
            *a = if sum > T::zero() {
                *a * T::from_usize(tau).unwrap() / sum
            } else {
                T::one()
            };
        });
    sum > T::zero()
}
