use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output`, zeroing the imaginary part.
/// Any remaining entries of `output` are zero padded.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Copy the real part of `input` to `output`. Any remaining entries of
/// `output` are set to zero.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    assert!(input.len() <= output.len());
    input
        .iter()
        .map(|c| c.re)
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i);

    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = T::zero());
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Mean of the squared samples of `arr`, or zero for an empty slice.
pub fn mean_square<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    square_sum(arr) / T::from_usize(arr.len()).unwrap()
}

/// FFT scratch space for the YIN estimator. Every buffer is allocated once, up
/// front, so that analysing a block never touches the allocator.
pub struct ScratchBuffers<T> {
    pub signal: Vec<Complex<T>>,
    pub window: Vec<Complex<T>>,
    pub fft_scratch: Vec<Complex<T>>,
}

impl<T: Float> ScratchBuffers<T> {
    /// `buffer_size` is the FFT length; `fft_scratch_size` is the largest
    /// in-place scratch length requested by the FFT plans.
    pub fn new(buffer_size: usize, fft_scratch_size: usize) -> Self {
        ScratchBuffers {
            signal: new_complex_buffer(buffer_size),
            window: new_complex_buffer(buffer_size),
            fft_scratch: new_complex_buffer(fft_scratch_size.max(1)),
        }
    }
}
