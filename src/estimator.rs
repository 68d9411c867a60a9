use log::warn;

use crate::config::{Config, DetectionStrategy};
use crate::debounce::DebounceState;
use crate::detector::autocorrelation::AutocorrelationDetector;
use crate::detector::harmonic::HarmonicDetector;
use crate::detector::internals::Estimate;
use crate::detector::PitchDetector;
use crate::error::ConfigError;
use crate::float::Float;
use crate::utils::buffer::SampleBuffer;

/// Builds the detector selected by `config`.
pub fn detector_for<T: Float>(config: &Config) -> Box<dyn PitchDetector<T>> {
    match config.strategy {
        DetectionStrategy::Harmonic => Box::new(HarmonicDetector::new(
            config.buffer_size,
            config.window_factor,
            T::real(config.noise_floor),
        )),
        DetectionStrategy::Autocorrelation => Box::new(AutocorrelationDetector::new()),
    }
}

/// Runs one detector over successive buffers and debounces its valid
/// estimates.
///
/// Buffers must be fed in capture order: the smoothing assumes each call
/// follows the previous one.
pub struct PitchEstimator<T>
where
    T: Float,
{
    config: Config,
    detector: Box<dyn PitchDetector<T>>,
    debounce: DebounceState<T>,
}

impl<T> PitchEstimator<T>
where
    T: Float,
{
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let detector = detector_for(&config);
        let required = detector.min_signal_len(config.sample_rate);
        if config.buffer_size < required {
            return Err(ConfigError::BufferTooShort {
                buffer_size: config.buffer_size,
                required,
            });
        }
        Ok(PitchEstimator {
            config,
            detector,
            debounce: DebounceState::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shortest buffer accepted at the configured sample rate.
    pub fn min_buffer_len(&self) -> usize {
        self.detector.min_signal_len(self.config.sample_rate)
    }

    pub fn debounce_state(&self) -> &DebounceState<T> {
        &self.debounce
    }

    pub fn estimate(&mut self, buffer: &SampleBuffer<T>) -> Estimate<T> {
        let min_len = self.detector.min_signal_len(buffer.sample_rate());
        if buffer.sample_rate() == 0 || buffer.len() < min_len {
            warn!(
                "rejecting buffer of {} samples at {} Hz (need {})",
                buffer.len(),
                buffer.sample_rate(),
                min_len
            );
            return Estimate::NoSignal;
        }

        match self
            .detector
            .get_pitch(buffer.samples(), buffer.sample_rate())
        {
            Estimate::Valid(frequency) => Estimate::Valid(self.debounce.push(frequency)),
            other => other,
        }
    }

    /// Forgets the debounce history.
    pub fn reset(&mut self) {
        self.debounce.reset();
    }
}
