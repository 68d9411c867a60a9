use crate::float::Float;

/// Full-scale value of 16-bit PCM. Normalized samples are scaled by this so
/// both input formats reach the detectors on the same scale.
pub const PCM16_SCALE: f64 = 32768.0;

/// Sum of the squares of `signal`.
pub fn square_sum<T: Float>(signal: &[T]) -> T {
    signal.iter().map(|&s| s * s).sum()
}

/// One captured frame of mono audio and the rate it was captured at.
///
/// Samples are stored on the 16-bit PCM scale regardless of how they were
/// captured.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T>
where
    T: Float,
{
    samples: Vec<T>,
    sample_rate: usize,
}

impl<T> SampleBuffer<T>
where
    T: Float,
{
    /// Wraps samples that are already on the 16-bit PCM scale.
    pub fn new(samples: Vec<T>, sample_rate: usize) -> Self {
        SampleBuffer {
            samples,
            sample_rate,
        }
    }

    /// Widens 16-bit PCM samples.
    pub fn from_i16(samples: &[i16], sample_rate: usize) -> Self {
        let samples = samples.iter().map(|&s| T::real(f64::from(s))).collect();
        SampleBuffer::new(samples, sample_rate)
    }

    /// Rescales samples in `[-1.0, 1.0]` to the 16-bit PCM scale.
    pub fn from_normalized(samples: &[f32], sample_rate: usize) -> Self {
        let samples = samples
            .iter()
            .map(|&s| T::real(f64::from(s) * PCM16_SCALE))
            .collect();
        SampleBuffer::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_share_a_scale() {
        let pcm = SampleBuffer::<f64>::from_i16(&[0, 16384, -32768], 16000);
        let normalized = SampleBuffer::<f64>::from_normalized(&[0.0, 0.5, -1.0], 16000);
        assert_eq!(pcm, normalized);
        assert_eq!(pcm.samples(), &[0.0, 16384.0, -32768.0]);
        assert_eq!(pcm.sample_rate(), 16000);
        assert_eq!(pcm.len(), 3);
    }

    #[test]
    fn squares() {
        assert_eq!(square_sum(&[1.0f32, -2.0, 3.0]), 14.0);
        assert_eq!(square_sum::<f64>(&[0.0; 8]), 0.0);
    }
}
