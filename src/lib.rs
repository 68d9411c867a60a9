//! # Pitch Tuner
//! *pitch_tuner* is the estimation engine of an instrument tuner: it turns
//! short buffers of monophonic audio into a fundamental frequency, one buffer
//! at a time.
//!
//! # Detectors
//! Two interchangeable strategies implement [PitchDetector][detector::PitchDetector]:
//!
//!   * [HarmonicDetector][detector::harmonic] (default): Welch-averaged
//!     spectrum, noise gate, harmonic scoring of candidate peaks and
//!     parabolic sub-bin refinement.
//!   * [AutocorrelationDetector][detector::autocorrelation]: legacy
//!     time-domain correlation with adaptive-precision lag refinement.
//!
//! A [PitchEstimator][estimator::PitchEstimator] runs the configured detector
//! and smooths successive valid estimates with a three-point
//! [debounce][debounce]. [Tuner][session::Tuner] adds start/stop control and
//! [TunerWorker][worker::TunerWorker] runs estimation on its own thread.
//!
//! # Examples
//! ```
//! use pitch_tuner::config::Config;
//! use pitch_tuner::estimator::PitchEstimator;
//! use pitch_tuner::utils::buffer::SampleBuffer;
//!
//! const SAMPLE_RATE: usize = 16000;
//! const SIZE: usize = 4096;
//!
//! // Signal coming from some source (microphone, generated, etc...)
//! let dt = 1.0 / SAMPLE_RATE as f32;
//! let freq = 440.0;
//! let signal: Vec<f32> = (0..SIZE)
//!     .map(|x| 0.5 * (2.0 * std::f32::consts::PI * x as f32 * dt * freq).sin())
//!     .collect();
//!
//! let mut estimator = PitchEstimator::<f64>::new(Config::default()).unwrap();
//! let buffer = SampleBuffer::from_normalized(&signal, SAMPLE_RATE);
//!
//! let estimate = estimator.estimate(&buffer);
//! let frequency = estimate.frequency().unwrap();
//! assert!((frequency - 440.0).abs() < 16.0);
//! println!("Frequency: {}", frequency);
//! ```

pub use detector::internals::Estimate;

pub mod config;
pub mod debounce;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod float;
pub mod session;
pub mod utils;
pub mod worker;
