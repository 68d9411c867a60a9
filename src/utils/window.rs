use crate::float::Float;

/// Symmetric Hamming taper of `length` coefficients,
/// `w[n] = 0.54 - 0.46 cos(2 pi n / (length - 1))`.
pub fn hamming<T: Float>(length: usize) -> Vec<T> {
    if length < 2 {
        return vec![T::one(); length];
    }
    let two_pi = T::real(2.0 * std::f64::consts::PI);
    let denom = T::from_len(length - 1);
    let (a0, a1) = (T::real(0.54), T::real(0.46));

    (0..length)
        .map(|n| a0 - a1 * (two_pi * T::from_len(n) / denom).cos())
        .collect()
}
