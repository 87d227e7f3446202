//! Windowing and per-window spectral transforms

pub mod analysis;
pub mod fft;
pub mod windowing;

pub use analysis::{SpectralTransformer, WindowSpectra};
pub use fft::{frequency_axis, passband_bins, FftEngine};
pub use windowing::{WindowScheduler, WindowStarts};
