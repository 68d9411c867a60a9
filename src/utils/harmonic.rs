//! Harmonic scoring of candidate peaks.
//!
//! A plucked or sung note puts energy at its fundamental and at integer
//! multiples of it. Each candidate bin `p` is scored by the energy found
//! around `2p`, `3p` and `4p`, weighted by the candidate's own power so a weak
//! bin that happens to sit under a strong harmonic series does not win.

use crate::float::Float;

/// Harmonic multiples checked for each candidate.
pub const HARMONIC_FACTORS: [f64; 3] = [2.0, 3.0, 4.0];

/// Score of a single candidate bin.
pub fn harmonic_score<T: Float>(spectrum: &[T], peak: usize) -> T {
    let len = spectrum.len();
    if peak == 0 || peak >= len || len < 5 {
        return T::zero();
    }
    let own = spectrum[peak];

    HARMONIC_FACTORS
        .iter()
        .map(|factor| {
            let idx = ((peak as f64) * factor).round() as usize;
            let idx = idx.clamp(2, len - 3);
            spectrum[idx - 1] * own + spectrum[idx] * own + spectrum[idx + 1] * own
        })
        .sum()
}

/// Index into `peaks` of the best-supported fundamental. The first candidate
/// wins ties; an empty peak list yields `None`.
pub fn score_harmonics<T: Float>(spectrum: &[T], peaks: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, &peak) in peaks.iter().enumerate() {
        let score = harmonic_score(spectrum, peak);
        match best {
            Some((_, max)) if score <= max => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
