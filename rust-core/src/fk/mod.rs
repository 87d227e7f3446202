//! Frequency-wavenumber (FK) spectra over a slowness grid

pub mod algorithm;
pub mod attributes;
pub mod beamformer;
pub mod grid;
pub mod quality;
pub mod registry;
pub mod spectra;

pub use algorithm::{generate_fk, CancellationToken, DelayAndSumFk, FkInputs, FkSpectraAlgorithm, ProcessingOptions};
pub use attributes::FkAttributes;
pub use beamformer::{BeamGrids, Beamformer};
pub use grid::SlownessGrid;
pub use quality::fk_quality;
pub use registry::AlgorithmRegistry;
pub use spectra::{FkSpectra, FkSpectraMetadata, FkSpectrum};
