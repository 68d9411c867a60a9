//! One-sided discrete Fourier transform of real windows.
//!
//! [SpectrumTransform] is an iterative radix-2 decimation-in-time FFT. The
//! bit-reversal permutation and the twiddle factors are computed once when the
//! transform is built, and the butterflies run in a scratch buffer owned by the
//! transform, so repeated calls on the audio thread do not allocate.
//!
//! A `rustfft` plan driven through `process_with_scratch` would also avoid
//! per-call allocation, but it computes the full complex spectrum of a
//! complex input. Real windows only need the one-sided half, and a single
//! fixed radix-2 kernel keeps every window size on the same code path and
//! numerically reproducible across targets. `rustfft` remains the reference
//! the tests check this transform against.
//!
//! Only bins `0..=N/2` (DC through Nyquist) are returned; the remaining bins
//! of a real signal's spectrum are their complex conjugates.

use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::error::TransformError;
use crate::float::Float;

pub struct SpectrumTransform<T>
where
    T: Float,
{
    len: usize,
    bit_reversed: Vec<usize>,
    twiddles: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T> SpectrumTransform<T>
where
    T: Float,
{
    /// Prepares a transform for windows of `len` samples. `len` must be a
    /// power of two and at least 2.
    pub fn new(len: usize) -> Result<Self, TransformError> {
        if len < 2 || !len.is_power_of_two() {
            return Err(TransformError::InvalidLength { len });
        }

        let bits = len.trailing_zeros();
        let bit_reversed = (0..len)
            .map(|i| i.reverse_bits() >> (usize::BITS - bits))
            .collect();

        let two_pi = T::real(2.0 * std::f64::consts::PI);
        let n = T::from_len(len);
        let twiddles = (0..len / 2)
            .map(|k| {
                let angle = -two_pi * T::from_len(k) / n;
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();

        Ok(SpectrumTransform {
            len,
            bit_reversed,
            twiddles,
            scratch: vec![Complex::zero(); len],
        })
    }

    /// Number of input samples per window.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of bins produced: `len / 2 + 1`.
    pub fn output_len(&self) -> usize {
        self.len / 2 + 1
    }

    /// Writes the one-sided complex spectrum of `input` to `output`.
    pub fn process(
        &mut self,
        input: &[T],
        output: &mut [Complex<T>],
    ) -> Result<(), TransformError> {
        self.check_output(output.len())?;
        self.transform(input)?;
        let bins = self.output_len();
        output[..bins].copy_from_slice(&self.scratch[..bins]);
        Ok(())
    }

    /// Writes the magnitude (Euclidean norm) of each one-sided bin of `input`
    /// to `output`.
    pub fn magnitudes(&mut self, input: &[T], output: &mut [T]) -> Result<(), TransformError> {
        self.check_output(output.len())?;
        self.transform(input)?;
        self.scratch
            .iter()
            .zip(output.iter_mut())
            .take(self.len / 2 + 1)
            .for_each(|(bin, o)| *o = bin.norm());
        Ok(())
    }

    fn check_output(&self, actual: usize) -> Result<(), TransformError> {
        let expected = self.output_len();
        if actual < expected {
            return Err(TransformError::LengthMismatch { expected, actual });
        }
        Ok(())
    }

    fn transform(&mut self, input: &[T]) -> Result<(), TransformError> {
        if input.len() != self.len {
            return Err(TransformError::LengthMismatch {
                expected: self.len,
                actual: input.len(),
            });
        }

        for (slot, &src) in self.scratch.iter_mut().zip(self.bit_reversed.iter()) {
            *slot = Complex::new(input[src], T::zero());
        }

        let mut size = 2;
        while size <= self.len {
            let half = size / 2;
            let stride = self.len / size;
            for start in (0..self.len).step_by(size) {
                for k in 0..half {
                    let t = self.twiddles[k * stride] * self.scratch[start + k + half];
                    let e = self.scratch[start + k];
                    self.scratch[start + k] = e + t;
                    self.scratch[start + k + half] = e - t;
                }
            }
            size *= 2;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    #[test]
    fn rejects_invalid_lengths() {
        for len in [0, 1, 3, 12, 1000] {
            assert_eq!(
                SpectrumTransform::<f64>::new(len).err(),
                Some(TransformError::InvalidLength { len })
            );
        }
        assert!(SpectrumTransform::<f64>::new(2).is_ok());
    }

    #[test]
    fn rejects_mismatched_input() {
        let mut transform = SpectrumTransform::<f64>::new(8).unwrap();
        let mut output = vec![0.0; 5];
        let err = transform.magnitudes(&[0.0; 4], &mut output).unwrap_err();
        assert_eq!(
            err,
            TransformError::LengthMismatch {
                expected: 8,
                actual: 4
            }
        );
    }

    #[test]
    fn impulse_has_flat_magnitude() {
        let mut signal = vec![0.0f64; 64];
        signal[0] = 1.0;
        let mut transform = SpectrumTransform::new(64).unwrap();
        let mut mags = vec![0.0; transform.output_len()];
        transform.magnitudes(&signal, &mut mags).unwrap();

        assert_eq!(mags.len(), 33);
        for m in mags {
            assert!((m - 1.0).abs() < 1e-12, "magnitude {}", m);
        }
    }

    #[test]
    fn matches_rustfft() {
        const N: usize = 256;
        let signal: Vec<f64> = (0..N)
            .map(|i| {
                let x = i as f64;
                (0.3 * x).sin() + 0.5 * (1.7 * x).cos() - 0.25 * (0.05 * x * x).sin()
            })
            .collect();

        let mut expected: Vec<Complex<f64>> =
            signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(N).process(&mut expected);

        let mut transform = SpectrumTransform::new(N).unwrap();
        let mut output = vec![Complex::zero(); transform.output_len()];
        transform.process(&signal, &mut output).unwrap();

        for (ours, theirs) in output.iter().zip(expected.iter()) {
            assert!((ours - theirs).norm() < 1e-9);
        }
    }

    #[test]
    fn sine_lands_in_its_bin() {
        const N: usize = 128;
        let signal: Vec<f32> = (0..N)
            .map(|i| (2.0 * std::f32::consts::PI * 10.0 * i as f32 / N as f32).sin())
            .collect();
        let mut transform = SpectrumTransform::new(N).unwrap();
        let mut mags = vec![0.0; transform.output_len()];
        transform.magnitudes(&signal, &mut mags).unwrap();

        let peak = mags
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(peak.0, 10);
        assert!((peak.1 - N as f32 / 2.0).abs() < 1e-2);
    }
}
