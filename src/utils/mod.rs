pub mod buffer;
pub mod fft;
pub mod harmonic;
pub mod peak;
pub mod welch;
pub mod window;
