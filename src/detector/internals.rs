use crate::float::Float;

/// Sentinel streamed for [Estimate::NoSignal].
pub const ERROR_FREQUENCY: f64 = -1.0;
/// Sentinel streamed for [Estimate::TooQuiet].
pub const TOO_QUIET_FREQUENCY: f64 = -2.0;

/// Outcome of analysing one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate<T>
where
    T: Float,
{
    /// Fundamental frequency in Hz.
    Valid(T),
    /// A candidate was found but did not clear the noise gate.
    TooQuiet,
    /// No usable buffer or peak could be formed.
    NoSignal,
}

impl<T> Estimate<T>
where
    T: Float,
{
    pub fn is_valid(&self) -> bool {
        matches!(self, Estimate::Valid(_))
    }

    pub fn frequency(&self) -> Option<T> {
        match *self {
            Estimate::Valid(f) => Some(f),
            _ => None,
        }
    }

    /// Plain-number form for consumers that stream doubles: the frequency, or
    /// `-2.0` for [Estimate::TooQuiet] and `-1.0` for [Estimate::NoSignal].
    pub fn to_sentinel(&self) -> T {
        match *self {
            Estimate::Valid(f) => f,
            Estimate::TooQuiet => T::real(TOO_QUIET_FREQUENCY),
            Estimate::NoSignal => T::real(ERROR_FREQUENCY),
        }
    }

    /// Wraps a raw frequency, mapping negative or non-finite values to
    /// [Estimate::NoSignal].
    pub fn from_frequency(frequency: T) -> Self {
        if frequency.is_finite() && frequency >= T::zero() {
            Estimate::Valid(frequency)
        } else {
            Estimate::NoSignal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels() {
        assert_eq!(Estimate::Valid(440.0f64).to_sentinel(), 440.0);
        assert_eq!(Estimate::<f64>::TooQuiet.to_sentinel(), -2.0);
        assert_eq!(Estimate::<f32>::NoSignal.to_sentinel(), -1.0);
    }

    #[test]
    fn invalid_frequencies_are_no_signal() {
        assert_eq!(Estimate::from_frequency(-3.0f64), Estimate::NoSignal);
        assert_eq!(Estimate::from_frequency(f64::NAN), Estimate::NoSignal);
        assert_eq!(Estimate::from_frequency(82.4f64), Estimate::Valid(82.4));
        assert_eq!(Estimate::Valid(82.4f64).frequency(), Some(82.4));
        assert!(!Estimate::<f64>::TooQuiet.is_valid());
    }
}
