//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SAMPLE_RATE: usize = 16000;
/// Enough samples at 16 kHz to resolve low strings.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_WINDOW_FACTOR: usize = 4;

/// Which detector a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Welch spectrum with harmonic scoring.
    #[default]
    Harmonic,
    /// Legacy time-domain autocorrelation.
    Autocorrelation,
}

/// Named noise-floor multipliers for the harmonic detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseSensitivity {
    Low,
    Medium,
    High,
    #[default]
    VeryHigh,
}

impl NoiseSensitivity {
    pub fn multiplier(self) -> f64 {
        match self {
            NoiseSensitivity::Low => 5.0,
            NoiseSensitivity::Medium => 10.0,
            NoiseSensitivity::High => 15.0,
            NoiseSensitivity::VeryHigh => 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sample_rate: usize,
    /// Minimum samples per buffer for the harmonic detector.
    pub buffer_size: usize,
    /// A spectral peak must exceed the spectrum's mean times this to count as signal.
    pub noise_floor: f64,
    pub strategy: DetectionStrategy,
    /// Buffers are analysed as `2 * window_factor - 1` overlapping windows.
    pub window_factor: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            noise_floor: NoiseSensitivity::default().multiplier(),
            strategy: DetectionStrategy::default(),
            window_factor: DEFAULT_WINDOW_FACTOR,
        }
    }
}

impl Config {
    pub fn with_sensitivity(mut self, sensitivity: NoiseSensitivity) -> Self {
        self.noise_floor = sensitivity.multiplier();
        self
    }

    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Length of each analysis window of the harmonic detector.
    pub fn window_len(&self) -> usize {
        self.buffer_size.checked_div(self.window_factor).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.window_factor == 0 {
            return Err(ConfigError::ZeroWindowFactor);
        }
        if !(self.noise_floor.is_finite() && self.noise_floor > 0.0) {
            return Err(ConfigError::InvalidNoiseFloor(self.noise_floor));
        }
        // Only the harmonic detector transforms the buffer.
        let window = self.window_len();
        if self.strategy == DetectionStrategy::Harmonic && (window < 2 || !window.is_power_of_two())
        {
            return Err(ConfigError::InvalidWindow {
                buffer_size: self.buffer_size,
                factor: self.window_factor,
                window,
            });
        }
        Ok(())
    }
}
