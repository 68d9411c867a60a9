use crate::float::Float;
use crate::utils::welch::PowerSpectrum;

/// Number of candidate peaks taken from a spectrum.
pub const NUM_PEAKS: usize = 5;
/// Bins below this index hold DC and rumble and are never candidates.
pub const START_BIN: usize = 2;
/// Floor applied before taking the log of a bin.
pub const LOG_FLOOR: f64 = 1e-9;
/// Parabola denominators smaller than this are treated as flat.
pub const DEGENERATE_CURVATURE: f64 = 1e-6;

/// Candidate bins, most significant first.
pub type PeakSet = Vec<usize>;

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Picks up to `count` distinct bins at or above `start`, greedily taking the
/// loudest remaining bin each round. Ties go to the lower bin.
pub fn find_peaks<T: Float>(spectrum: &[T], count: usize, start: usize) -> PeakSet {
    let mut peaks = PeakSet::with_capacity(count);
    for _ in 0..count {
        let mut best: Option<(usize, T)> = None;
        for (idx, &power) in spectrum.iter().enumerate().skip(start) {
            if peaks.contains(&idx) {
                continue;
            }
            match best {
                Some((_, max)) if power <= max => {}
                _ => best = Some((idx, power)),
            }
        }
        match best {
            Some((idx, _)) => peaks.push(idx),
            None => break,
        }
    }
    peaks
}

/// True when any peak rises above `noise_floor` times the spectrum's mean.
pub fn passes_noise_gate<T: Float>(
    spectrum: &PowerSpectrum<T>,
    peaks: &[usize],
    noise_floor: T,
) -> bool {
    let threshold = spectrum.mean() * noise_floor;
    peaks.iter().any(|&p| spectrum[p] > threshold)
}

/// Refines integer bin `bin` to a fractional bin by fitting a parabola through
/// the log-power of it and its two neighbours. `bin` is clamped so both
/// neighbours exist.
pub fn interpolate_bin<T: Float>(spectrum: &[T], bin: usize) -> T {
    if spectrum.len() < 3 {
        return T::from_len(bin);
    }
    let idx = bin.clamp(1, spectrum.len() - 2);
    let floor = T::real(LOG_FLOOR);
    let log = |i: usize| spectrum[i].max(floor).ln();

    let point = quadratic_interpolation(
        Point {
            x: T::from_len(idx - 1),
            y: log(idx - 1),
        },
        Point {
            x: T::from_len(idx),
            y: log(idx),
        },
        Point {
            x: T::from_len(idx + 1),
            y: log(idx + 1),
        },
    );
    point.x
}

/// Frequency in Hz of a (fractional) bin of a `window_len`-point transform.
pub fn bin_to_frequency<T: Float>(bin: T, sample_rate: usize, window_len: usize) -> T {
    bin * T::from_len(sample_rate) / T::from_len(window_len)
}

fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Point<T> {
    let curvature = T::real(2.0) * center.y - left.y - right.y;
    if curvature.magnitude() < T::real(DEGENERATE_CURVATURE) {
        return center;
    }
    let shift = T::real(0.5) * (right.y - left.y) / curvature;
    let x = center.x + shift;
    let y = center.y + T::real(0.25) * (right.y - left.y) * shift;
    Point { x, y }
}
