//! Legacy time-domain detector.
//!
//! The detector looks at a fixed analysis window of the buffer
//! (samples `1000..2200`) and correlates it against lagged copies of the
//! signal,
//! $$ r(k) = \sum_{j=0}^{W-1} s_{o+j}\, s_{o+j+k}. $$
//! Lags are scanned upwards from 30 samples, one at a time up to lag 400 and
//! every other lag beyond. The first lag whose correlation exceeds `0.8 r(0)`
//! is accepted and then climbed while the correlation keeps increasing. This
//! is a greedy ascent and can stop on a local maximum.
//!
//! The coarse lag only has whole-sample resolution, which is poor for short
//! periods. It is refined by rescaling it by a precision factor (20 for the
//! shortest lags down to 1 for the longest) and searching `2 + precision`
//! scaled steps either side of it. Correlation at a fractional lag is a
//! Catmull-Rom interpolation of the four surrounding integer-lag
//! correlations, which equals correlating against a cubic resampling of the
//! signal.
//!
//! The energy gate assumes samples on the 16-bit PCM scale.
//!
//! Low notes alias. A pure tone whose period exceeds about 293 samples keeps
//! `r(30)` above `0.8 r(0)`, so lag 30 is accepted at once and the detector
//! reports `sample_rate / 30`. That puts the floor near 55 Hz at 16 kHz and
//! 150 Hz at 44.1 kHz. Tones with strong overtones decorrelate sooner and
//! track lower. Refinement never searches below lag 30.

use std::marker::PhantomData;

use log::{debug, warn};

use crate::detector::internals::Estimate;
use crate::detector::PitchDetector;
use crate::float::Float;
use crate::utils::buffer::square_sum;

pub const ANALYSIS_OFFSET: usize = 1000;
pub const ANALYSIS_WINDOW: usize = 1200;
pub const MIN_LAG: usize = 30;
pub const MAX_LAG: usize = 1102;
/// Past this lag the coarse scan only visits every other lag.
pub const STRIDE_LAG: usize = 400;
/// Fraction of `r(0)` a lag must reach to be accepted as a peak.
pub const ATTENUATION: f64 = 0.80;
/// Minimum mean energy per analysed sample.
pub const ENERGY_PER_SAMPLE: f64 = 4.0;
const REFINE_HEADROOM: usize = 64;

pub struct AutocorrelationDetector<T>
where
    T: Float,
{
    _sample: PhantomData<T>,
}

impl<T> AutocorrelationDetector<T>
where
    T: Float,
{
    pub fn new() -> Self {
        AutocorrelationDetector {
            _sample: PhantomData,
        }
    }
}

impl<T> Default for AutocorrelationDetector<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PitchDetector<T> for AutocorrelationDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T], sample_rate: usize) -> Estimate<T> {
        let min_len = self.min_signal_len(sample_rate);
        if signal.len() < min_len {
            warn!(
                "not enough samples: expected at least {}, got {}",
                min_len,
                signal.len()
            );
            return Estimate::NoSignal;
        }
        let max_lag = signal.len() - ANALYSIS_OFFSET - ANALYSIS_WINDOW;

        let window = &signal[ANALYSIS_OFFSET..ANALYSIS_OFFSET + ANALYSIS_WINDOW];
        let auto_x_sum = square_sum(window);
        if auto_x_sum <= T::real(ENERGY_PER_SAMPLE) * T::from_len(ANALYSIS_WINDOW) {
            debug!("too quiet: windowed energy {}", auto_x_sum);
            return Estimate::TooQuiet;
        }

        let lag = match coarse_peak(signal, auto_x_sum * T::real(ATTENUATION), max_lag) {
            Some(lag) => lag,
            None => {
                debug!("no correlation peak above {}", ATTENUATION);
                return Estimate::NoSignal;
            }
        };

        let precision = precision_for_lag(lag);
        let refined = refine_lag(signal, lag, precision, max_lag);
        Estimate::from_frequency(
            T::from_len(sample_rate) * T::from_len(precision) / T::from_len(refined),
        )
    }

    /// A quarter second of audio, and never less than the analysis window
    /// plus the longest lag.
    fn min_signal_len(&self, sample_rate: usize) -> usize {
        (sample_rate / 4).max(ANALYSIS_OFFSET + ANALYSIS_WINDOW + MAX_LAG + REFINE_HEADROOM)
    }
}

fn correlation<T: Float>(signal: &[T], lag: usize) -> T {
    let window = &signal[ANALYSIS_OFFSET..ANALYSIS_OFFSET + ANALYSIS_WINDOW];
    let lagged = &signal[ANALYSIS_OFFSET + lag..ANALYSIS_OFFSET + lag + ANALYSIS_WINDOW];
    window.iter().zip(lagged).map(|(&a, &b)| a * b).sum()
}

/// Correlation at lag `scaled_lag / precision`.
fn scaled_correlation<T: Float>(signal: &[T], scaled_lag: usize, precision: usize) -> T {
    let whole = scaled_lag / precision;
    let rem = scaled_lag % precision;
    if rem == 0 {
        return correlation(signal, whole);
    }

    let t = T::from_len(rem) / T::from_len(precision);
    let p0 = correlation(signal, whole - 1);
    let p1 = correlation(signal, whole);
    let p2 = correlation(signal, whole + 1);
    let p3 = correlation(signal, whole + 2);

    let two = T::real(2.0);
    let three = T::real(3.0);
    let a = two * p1;
    let b = p2 - p0;
    let c = two * p0 - T::real(5.0) * p1 + T::real(4.0) * p2 - p3;
    let d = three * p1 - p0 - three * p2 + p3;
    T::real(0.5) * (a + t * (b + t * (c + t * d)))
}

fn lag_stride(lag: usize) -> usize {
    if lag > STRIDE_LAG {
        2
    } else {
        1
    }
}

/// First lag whose correlation exceeds `threshold`, climbed to the top of its
/// slope.
fn coarse_peak<T: Float>(signal: &[T], threshold: T, max_lag: usize) -> Option<usize> {
    let mut lag = MIN_LAG;
    while lag <= MAX_LAG {
        let mut current = correlation(signal, lag);
        if current > threshold {
            loop {
                let next = lag + lag_stride(lag);
                if next > max_lag {
                    break;
                }
                let candidate = correlation(signal, next);
                if candidate <= current {
                    break;
                }
                lag = next;
                current = candidate;
            }
            return Some(lag);
        }
        lag += lag_stride(lag);
    }
    None
}

pub fn precision_for_lag(lag: usize) -> usize {
    match lag {
        0..=49 => 20,
        50..=99 => 10,
        100..=199 => 5,
        200..=399 => 2,
        _ => 1,
    }
}

/// Best lag, in units of `1 / precision` samples, within `2 + precision`
/// scaled steps of `lag * precision`.
fn refine_lag<T: Float>(signal: &[T], lag: usize, precision: usize, max_lag: usize) -> usize {
    let center = lag * precision;
    let radius = 2 + precision;
    let lowest = center.saturating_sub(radius).max(MIN_LAG * precision);

    let mut best = (center, correlation(signal, lag));
    for scaled in lowest..=center + radius {
        if scaled / precision + 2 > max_lag {
            break;
        }
        let value = scaled_correlation(signal, scaled, precision);
        if value > best.1 {
            best = (scaled, value);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, size: usize, sample_rate: usize) -> Vec<f64> {
        (0..size)
            .map(|i| 16000.0 * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn precision_tiers() {
        assert_eq!(precision_for_lag(36), 20);
        assert_eq!(precision_for_lag(72), 10);
        assert_eq!(precision_for_lag(160), 5);
        assert_eq!(precision_for_lag(300), 2);
        assert_eq!(precision_for_lag(800), 1);
    }

    #[test]
    fn min_len_is_a_quarter_second() {
        let detector = AutocorrelationDetector::<f64>::new();
        assert_eq!(detector.min_signal_len(16000), 4000);
        assert_eq!(detector.min_signal_len(44100), 11025);
        assert_eq!(detector.min_signal_len(8000), 3366);
    }

    #[test]
    fn scaled_correlation_matches_integer_lags() {
        let signal = sine(440.0, 4096, 16000);
        for lag in [35, 36, 37] {
            assert_eq!(scaled_correlation(&signal, lag * 20, 20), correlation(&signal, lag));
        }
    }

    #[test]
    fn sine_within_one_hertz() {
        let mut detector = AutocorrelationDetector::new();
        for freq in [110.0, 196.0, 440.0] {
            let signal = sine(freq, 4096, 16000);
            let f = detector.get_pitch(&signal, 16000).frequency().unwrap();
            assert!((f - freq).abs() <= 1.0, "{} Hz detected as {}", freq, f);
        }
    }

    #[test]
    fn low_sines_use_coarse_precision() {
        let mut detector = AutocorrelationDetector::new();
        for freq in [55.0, 73.42] {
            let lag = (16000.0 / freq) as usize;
            assert_eq!(precision_for_lag(lag), 2);
            let signal = sine(freq, 4096, 16000);
            let f = detector.get_pitch(&signal, 16000).frequency().unwrap();
            assert!((f - freq).abs() <= 1.0, "{} Hz detected as {}", freq, f);
        }
    }

    #[test]
    fn long_lags_are_scanned_every_other_sample() {
        // Sawtooth with a period of 457 samples: its correlation stays below
        // 0.8 r(0) until the lag is past 400.
        let period = 457;
        let signal: Vec<f64> = (0..4096)
            .map(|i| 10000.0 * ((i % period) as f64 / period as f64 - 0.5))
            .collect();
        let window = &signal[ANALYSIS_OFFSET..ANALYSIS_OFFSET + ANALYSIS_WINDOW];
        let threshold = square_sum(window) * ATTENUATION;

        let lag = coarse_peak(&signal, threshold, 4096 - 2200).unwrap();
        assert!(lag > STRIDE_LAG);
        assert_eq!(lag % 2, 0);
        assert!((lag as i64 - period as i64).abs() <= 1, "coarse lag {}", lag);

        let mut detector = AutocorrelationDetector::new();
        let f = detector.get_pitch(&signal, 16000).frequency().unwrap();
        assert!((f - 16000.0 / period as f64).abs() < 0.1, "got {}", f);
    }

    #[test]
    fn ascent_stops_at_first_local_maximum() {
        // Period 200 with a dominant component of period 100: r(100) is a
        // local maximum above the threshold, r(200) is higher.
        let signal: Vec<f64> = (0..4096)
            .map(|i| {
                let x = 2.0 * std::f64::consts::PI * i as f64;
                1000.0 * (x / 200.0).sin() + 4000.0 * (x / 100.0).sin()
            })
            .collect();
        let window = &signal[ANALYSIS_OFFSET..ANALYSIS_OFFSET + ANALYSIS_WINDOW];
        let threshold = square_sum(window) * ATTENUATION;

        assert!(correlation(&signal, 200) > correlation(&signal, 100));
        assert_eq!(coarse_peak(&signal, threshold, 4096 - 2200), Some(100));

        let mut detector = AutocorrelationDetector::new();
        let f = detector.get_pitch(&signal, 16000).frequency().unwrap();
        assert!((f - 160.0).abs() < 0.01, "got {}", f);
    }

    #[test]
    fn long_periods_alias_to_the_shortest_lag() {
        let mut detector = AutocorrelationDetector::new();
        let signal = sine(41.2, 4096, 16000);
        let f = detector.get_pitch(&signal, 16000).frequency().unwrap();
        assert!((f - 16000.0 / MIN_LAG as f64).abs() < 1e-6, "got {}", f);
    }

    #[test]
    fn silence_is_too_quiet() {
        let mut detector = AutocorrelationDetector::new();
        assert_eq!(
            detector.get_pitch(&vec![0.0f64; 4096], 16000),
            Estimate::TooQuiet
        );
    }

    #[test]
    fn short_signal_is_no_signal() {
        let mut detector = AutocorrelationDetector::new();
        let signal = sine(440.0, 3999, 16000);
        assert_eq!(detector.get_pitch(&signal, 16000), Estimate::NoSignal);
    }
}
