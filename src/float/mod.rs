//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FftNum + Sum {
    /// Converts an `f64` constant into `Self`.
    fn real(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }

    /// Converts an index or length into `Self`.
    fn from_len(value: usize) -> Self {
        Self::from_usize(value).unwrap_or_else(Self::nan)
    }

    /// Absolute value. `num_traits::Float` and `Signed` both provide `abs`,
    /// so method syntax is ambiguous for this trait.
    fn magnitude(self) -> Self {
        if self < Self::zero() {
            -self
        } else {
            self
        }
    }
}

impl Float for f64 {}
impl Float for f32 {}
