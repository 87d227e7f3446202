//! FK Spectra - Frequency-Wavenumber Beamforming Core
//!
//! Delay-and-sum slowness spectra, F-statistics and quality codes for
//! seismic array waveforms.

pub mod definition;
pub mod error;
pub mod fk;
pub mod geometry;
pub mod logging;
pub mod spectrum;
pub mod waveform;

#[cfg(test)]
mod test_fixtures;

pub use definition::SpectrumDefinition;
pub use error::FkError;
pub use fk::{generate_fk, AlgorithmRegistry, DelayAndSumFk, FkSpectra, FkSpectraAlgorithm, FkSpectrum};
pub use geometry::RelativePosition;
pub use logging::init_logging;
pub use waveform::{ChannelId, ChannelSegment, Waveform};
