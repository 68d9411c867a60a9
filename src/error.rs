//! Error types for the fallible parts of the engine.
//!
//! None of these cross the estimation boundary: a detector that hits one of
//! them logs it and reports [Estimate::NoSignal][crate::Estimate::NoSignal].

use thiserror::Error;

/// Failure to build or run a [SpectrumTransform][crate::utils::fft::SpectrumTransform].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("transform length {len} is not a power of two >= 2")]
    InvalidLength { len: usize },
    #[error("expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Rejected session [Config][crate::config::Config].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,
    #[error("window factor must be positive")]
    ZeroWindowFactor,
    #[error("analysis window of {window} samples (buffer {buffer_size} / factor {factor}) is not a power of two >= 2")]
    InvalidWindow {
        buffer_size: usize,
        factor: usize,
        window: usize,
    },
    #[error("noise floor multiplier must be positive and finite, got {0}")]
    InvalidNoiseFloor(f64),
    #[error("buffer of {buffer_size} samples is shorter than the {required} the detector needs")]
    BufferTooShort { buffer_size: usize, required: usize },
}

/// Failure to hand a buffer to a [TunerWorker][crate::worker::TunerWorker].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("tuner worker has stopped")]
    Stopped,
    #[error("failed to spawn tuner worker thread: {0}")]
    Spawn(String),
}
