//! Three-point smoothing of consecutive raw estimates.
//!
//! Each new frequency is compared with the two before it and whichever of the
//! three lies closest to their mean is reported. A single-frame spike is
//! therefore masked, at the cost of reporting a genuine jump one call late.
//! History always advances with the raw value, never the reported one.
//!
//! Before two frequencies have been seen, the missing history slots stand in
//! for the incoming value, so a fresh session reports its first estimates
//! unchanged.

use crate::float::Float;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebounceState<T>
where
    T: Float,
{
    prev: Option<T>,
    prev2: Option<T>,
}

impl<T> DebounceState<T>
where
    T: Float,
{
    pub fn new() -> Self {
        DebounceState {
            prev: None,
            prev2: None,
        }
    }

    /// Records `frequency` and returns the smoothed value for this call.
    pub fn push(&mut self, frequency: T) -> T {
        let prev = self.prev.unwrap_or(frequency);
        let prev2 = self.prev2.unwrap_or(frequency);

        let average = (prev + prev2 + frequency) / T::real(3.0);
        let diff_prev = (prev - average).magnitude();
        let diff_prev2 = (prev2 - average).magnitude();
        let diff_freq = (frequency - average).magnitude();

        let smoothed = if diff_prev <= diff_prev2 && diff_prev <= diff_freq {
            prev
        } else if diff_prev2 <= diff_prev && diff_prev2 <= diff_freq {
            prev2
        } else {
            frequency
        };

        self.prev2 = self.prev;
        self.prev = Some(frequency);
        smoothed
    }

    /// Most recent raw frequencies, newest first.
    pub fn history(&self) -> (Option<T>, Option<T>) {
        (self.prev, self.prev2)
    }

    pub fn reset(&mut self) {
        self.prev = None;
        self.prev2 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_input_is_unchanged() {
        let mut state = DebounceState::new();
        for _ in 0..3 {
            assert_eq!(state.push(440.0f64), 440.0);
        }
    }

    #[test]
    fn single_spike_is_masked() {
        let mut state = DebounceState::new();
        for _ in 0..3 {
            state.push(440.0f64);
        }
        assert_eq!(state.push(1000.0), 440.0);
    }

    #[test]
    fn sustained_change_comes_through() {
        let mut state = DebounceState::new();
        for _ in 0..3 {
            state.push(440.0f64);
        }
        state.push(1000.0);
        // History is now (1000, 440): ties go to the most recent raw value.
        assert_eq!(state.push(1000.0), 1000.0);
        assert_eq!(state.push(1000.0), 1000.0);
    }

    #[test]
    fn median_of_three() {
        let mut state = DebounceState::new();
        state.push(100.0f64);
        state.push(110.0);
        assert_eq!(state.push(104.0), 104.0);
        assert_eq!(state.history(), (Some(104.0), Some(110.0)));
    }

    #[test]
    fn history_advances_with_raw_values() {
        let mut state = DebounceState::new();
        state.push(440.0f32);
        state.push(440.0);
        state.push(900.0);
        assert_eq!(state.history(), (Some(900.0), Some(440.0)));
        state.reset();
        assert_eq!(state.history(), (None, None));
    }
}
