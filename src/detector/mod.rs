use crate::detector::internals::Estimate;
use crate::float::Float;

pub mod autocorrelation;
pub mod harmonic;
pub mod internals;

/// A pitch detection strategy. Detectors may keep scratch buffers between
/// calls but never history: smoothing across buffers belongs to the
/// [PitchEstimator][crate::estimator::PitchEstimator].
pub trait PitchDetector<T>: Send
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Estimate<T>;

    /// Shortest signal the detector will analyse at `sample_rate`.
    fn min_signal_len(&self, sample_rate: usize) -> usize;
}
