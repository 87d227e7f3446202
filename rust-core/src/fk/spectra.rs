//! FK spectrum results

use super::attributes::FkAttributes;
use super::grid::SlownessGrid;
use crate::definition::SpectrumDefinition;
use ndarray::Array2;
use time::{Duration, OffsetDateTime};

/// One analysis window's slowness spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct FkSpectrum {
    /// Start of the analysis window
    pub window_start: OffsetDateTime,
    /// Nominal time of the spectrum (`window_start + window_lead`)
    pub center_time: OffsetDateTime,
    /// Beam power, `[slow_count_y, slow_count_x]`; NaN marks evanescent cells
    pub power: Array2<f64>,
    /// F-statistic, same shape as `power`
    pub fstat: Array2<f64>,
    /// 1 (best) ..= 4 (worst)
    pub quality: u8,
    pub attributes: Option<FkAttributes>,
}

/// Parameters needed to interpret a sequence of spectra
#[derive(Debug, Clone, PartialEq)]
pub struct FkSpectraMetadata {
    pub phase_type: String,
    pub grid: SlownessGrid,
    pub low_frequency_hz: f64,
    pub high_frequency_hz: f64,
    pub output_sample_rate_hz: f64,
    pub window_length: Duration,
    pub window_lead: Duration,
}

impl FkSpectraMetadata {
    pub fn from_definition(definition: &SpectrumDefinition) -> Self {
        Self {
            phase_type: definition.phase_type.clone(),
            grid: SlownessGrid::from_definition(definition),
            low_frequency_hz: definition.low_frequency_hz,
            high_frequency_hz: definition.high_frequency_hz,
            output_sample_rate_hz: definition.output_sample_rate_hz,
            window_length: definition.window_length,
            window_lead: definition.window_lead,
        }
    }
}

/// Ordered spectra of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct FkSpectra {
    pub metadata: FkSpectraMetadata,
    /// Increasing window start time; skipped windows are absent
    pub values: Vec<FkSpectrum>,
}

impl FkSpectra {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nominal time of the first spectrum
    pub fn start_time(&self) -> Option<OffsetDateTime> {
        self.values.first().map(|spectrum| spectrum.center_time)
    }
}
