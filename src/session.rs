//! Start/stop control over a [PitchEstimator].

use log::info;

use crate::config::Config;
use crate::detector::internals::Estimate;
use crate::error::ConfigError;
use crate::estimator::PitchEstimator;
use crate::float::Float;
use crate::utils::buffer::SampleBuffer;

/// A tuner that is either stopped or running one estimation session.
///
/// Starting a running tuner and stopping a stopped one are no-ops. Every
/// session starts with empty debounce history.
pub struct Tuner<T>
where
    T: Float,
{
    session: Option<PitchEstimator<T>>,
}

impl<T> Tuner<T>
where
    T: Float,
{
    pub fn new() -> Self {
        Tuner { session: None }
    }

    pub fn start(&mut self, sample_rate: usize, config: Config) -> Result<(), ConfigError> {
        if self.session.is_some() {
            return Ok(());
        }
        let config = Config {
            sample_rate,
            ..config
        };
        info!(
            "starting tuner: {:?} at {} Hz, {} samples per buffer",
            config.strategy, config.sample_rate, config.buffer_size
        );
        self.session = Some(PitchEstimator::new(config)?);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            info!("stopping tuner");
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> Option<&Config> {
        self.session.as_ref().map(PitchEstimator::config)
    }

    /// Estimates the pitch of `buffer`, or [Estimate::NoSignal] when stopped.
    pub fn estimate(&mut self, buffer: &SampleBuffer<T>) -> Estimate<T> {
        match self.session.as_mut() {
            Some(session) => session.estimate(buffer),
            None => Estimate::NoSignal,
        }
    }
}

impl<T> Default for Tuner<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionStrategy;

    fn sine(freq: f64) -> SampleBuffer<f64> {
        let samples = (0..4096)
            .map(|i| 8000.0 * (2.0 * std::f64::consts::PI * freq * i as f64 / 16000.0).sin())
            .collect();
        SampleBuffer::new(samples, 16000)
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut tuner = Tuner::<f64>::new();
        tuner.stop();
        assert!(!tuner.is_running());

        tuner.start(16000, Config::default()).unwrap();
        let autocorrelation = Config::default().with_strategy(DetectionStrategy::Autocorrelation);
        tuner.start(44100, autocorrelation).unwrap();
        assert_eq!(tuner.config().map(|c| c.sample_rate), Some(16000));
        assert_eq!(
            tuner.config().map(|c| c.strategy),
            Some(DetectionStrategy::Harmonic)
        );

        tuner.stop();
        tuner.stop();
        assert!(!tuner.is_running());
    }

    #[test]
    fn stopped_tuner_reports_no_signal() {
        let mut tuner = Tuner::<f64>::new();
        assert_eq!(tuner.estimate(&sine(440.0)), Estimate::NoSignal);
    }

    #[test]
    fn restart_clears_history() {
        let mut tuner = Tuner::<f64>::new();
        tuner.start(16000, Config::default()).unwrap();
        for _ in 0..3 {
            tuner.estimate(&sine(440.0));
        }
        tuner.stop();
        tuner.start(16000, Config::default()).unwrap();

        // With history cleared the first estimate is not held back at 440.
        let f = tuner.estimate(&sine(1000.0)).frequency().unwrap();
        assert!((f - 1000.0).abs() < 16000.0 / 1024.0, "got {}", f);
    }

    #[test]
    fn invalid_config_does_not_start() {
        let mut tuner = Tuner::<f32>::new();
        assert!(tuner.start(0, Config::default()).is_err());
        assert!(!tuner.is_running());
    }
}
