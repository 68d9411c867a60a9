//! Welch-style spectrum accumulation.
//!
//! A buffer of `M` samples is cut into `2F - 1` Hamming-tapered windows of
//! `M / F` samples each, stepping by half a window, and the magnitude spectra
//! of all windows are summed bin by bin. The result is a sum, not a mean: the
//! noise-floor multipliers in [NoiseSensitivity][crate::config::NoiseSensitivity]
//! are calibrated against the summed spectrum's own mean, so the scaling
//! cancels in the gate but not in absolute magnitudes.

use crate::error::TransformError;
use crate::float::Float;
use crate::utils::fft::SpectrumTransform;
use crate::utils::window::hamming;

/// Accumulated magnitude spectrum, bin `i` at `i * sample_rate / window_len` Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum<T>
where
    T: Float,
{
    bins: Vec<T>,
    window_len: usize,
}

impl<T> PowerSpectrum<T>
where
    T: Float,
{
    pub fn new(bins: Vec<T>, window_len: usize) -> Self {
        PowerSpectrum { bins, window_len }
    }

    pub fn bins(&self) -> &[T] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Length of the windows the spectrum was built from.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn mean(&self) -> T {
        if self.bins.is_empty() {
            return T::zero();
        }
        self.bins.iter().copied().sum::<T>() / T::from_len(self.bins.len())
    }

    /// Width of one bin in Hz.
    pub fn bin_width(&self, sample_rate: usize) -> T {
        T::from_len(sample_rate) / T::from_len(self.window_len)
    }
}

impl<T: Float> std::ops::Index<usize> for PowerSpectrum<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.bins[idx]
    }
}

pub struct WelchAverager<T>
where
    T: Float,
{
    factor: usize,
    window_len: usize,
    window: Vec<T>,
    transform: SpectrumTransform<T>,
    windowed: Vec<T>,
    magnitudes: Vec<T>,
}

impl<T> WelchAverager<T>
where
    T: Float,
{
    /// Prepares an averager for buffers of `buffer_len` samples split with
    /// windowing factor `factor`. Fails when `buffer_len / factor` is not a
    /// valid transform length.
    pub fn new(buffer_len: usize, factor: usize) -> Result<Self, TransformError> {
        let window_len = buffer_len.checked_div(factor).unwrap_or(0);
        let transform = SpectrumTransform::new(window_len)?;
        let bins = transform.output_len();

        Ok(WelchAverager {
            factor,
            window_len,
            window: hamming(window_len),
            transform,
            windowed: vec![T::zero(); window_len],
            magnitudes: vec![T::zero(); bins],
        })
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Number of overlapping windows summed per call.
    pub fn window_count(&self) -> usize {
        2 * self.factor - 1
    }

    /// Builds the summed magnitude spectrum of `signal`.
    pub fn power_spectrum(&mut self, signal: &[T]) -> Result<PowerSpectrum<T>, TransformError> {
        let needed = self.window_len * self.factor;
        if signal.len() < needed {
            return Err(TransformError::LengthMismatch {
                expected: needed,
                actual: signal.len(),
            });
        }

        let step = self.window_len / 2;
        let mut powers = vec![T::zero(); self.transform.output_len()];

        for start in (0..self.window_count()).map(|w| w * step) {
            let slice = &signal[start..start + self.window_len];
            for ((out, &s), &w) in self.windowed.iter_mut().zip(slice).zip(&self.window) {
                *out = s * w;
            }
            self.transform
                .magnitudes(&self.windowed, &mut self.magnitudes)?;
            for (p, &m) in powers.iter_mut().zip(&self.magnitudes) {
                *p = *p + m;
            }
        }

        Ok(PowerSpectrum::new(powers, self.window_len))
    }
}
