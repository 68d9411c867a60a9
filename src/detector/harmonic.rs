//! Fourier-domain detection with harmonic disambiguation.
//!
//! The buffer is reduced to a Welch-style summed magnitude spectrum (see
//! [welch][crate::utils::welch]). The five loudest bins above DC become
//! candidates; if none of them rises above `noise_floor` times the spectrum's
//! mean the buffer is reported as [Estimate::TooQuiet]. Otherwise every
//! candidate is scored by the energy at its 2nd, 3rd and 4th harmonics
//! ([harmonic][crate::utils::harmonic]), which keeps a loud overtone from being
//! reported in place of its fundamental. The winning bin is refined with a
//! parabola through the log-power of its neighbours.
//!
//! The analysis window is `signal.len() / factor` and must be a power of two;
//! any other length is a configuration error and yields [Estimate::NoSignal].

use log::{debug, warn};

use crate::detector::internals::Estimate;
use crate::detector::PitchDetector;
use crate::error::TransformError;
use crate::float::Float;
use crate::utils::harmonic::score_harmonics;
use crate::utils::peak::{
    bin_to_frequency, find_peaks, interpolate_bin, passes_noise_gate, NUM_PEAKS, START_BIN,
};
use crate::utils::welch::{PowerSpectrum, WelchAverager};

pub struct HarmonicDetector<T>
where
    T: Float,
{
    size: usize,
    factor: usize,
    noise_floor: T,
    averager: Option<WelchAverager<T>>,
    last_spectrum: Option<PowerSpectrum<T>>,
}

impl<T> HarmonicDetector<T>
where
    T: Float,
{
    /// `size` is the minimum buffer length. A buffer is analysed as
    /// `2 * factor - 1` half-overlapping windows of `len / factor` samples.
    pub fn new(size: usize, factor: usize, noise_floor: T) -> Self {
        HarmonicDetector {
            size,
            factor,
            noise_floor,
            averager: WelchAverager::new(size, factor).ok(),
            last_spectrum: None,
        }
    }

    /// Spectrum computed by the most recent call that got far enough to build one.
    pub fn last_spectrum(&self) -> Option<&PowerSpectrum<T>> {
        self.last_spectrum.as_ref()
    }

    fn spectrum(&mut self, signal: &[T]) -> Result<PowerSpectrum<T>, TransformError> {
        let window_len = signal.len().checked_div(self.factor).unwrap_or(0);
        let cached = match self.averager.take() {
            Some(averager) if averager.window_len() == window_len => averager,
            _ => WelchAverager::new(signal.len(), self.factor)?,
        };
        self.averager.insert(cached).power_spectrum(signal)
    }
}

impl<T> PitchDetector<T> for HarmonicDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Estimate<T> {
        if signal.len() < self.size {
            warn!(
                "not enough samples: expected at least {}, got {}",
                self.size,
                signal.len()
            );
            return Estimate::NoSignal;
        }

        let spectrum = match self.spectrum(signal) {
            Ok(spectrum) => spectrum,
            Err(e) => {
                warn!("cannot build spectrum: {}", e);
                return Estimate::NoSignal;
            }
        };

        let peaks = find_peaks(spectrum.bins(), NUM_PEAKS, START_BIN);
        let estimate = if peaks.is_empty() {
            Estimate::NoSignal
        } else if !passes_noise_gate(&spectrum, &peaks, self.noise_floor) {
            debug!("too quiet: mean power {}", spectrum.mean());
            Estimate::TooQuiet
        } else {
            match score_harmonics(spectrum.bins(), &peaks) {
                Some(best) => {
                    let bin = interpolate_bin(spectrum.bins(), peaks[best]);
                    Estimate::from_frequency(bin_to_frequency(
                        bin,
                        sample_rate,
                        spectrum.window_len(),
                    ))
                }
                None => Estimate::NoSignal,
            }
        };

        self.last_spectrum = Some(spectrum);
        estimate
    }

    fn min_signal_len(&self, _sample_rate: usize) -> usize {
        self.size
    }
}
