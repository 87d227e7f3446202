//! FK spectra generation pipeline
//!
//! conditioning → alignment → window scheduling, then per window (in
//! parallel): spectral transform → beamforming → quality scoring.

use super::attributes::peak_attributes;
use super::beamformer::Beamformer;
use super::grid::SlownessGrid;
use super::quality::fk_quality;
use super::spectra::{FkSpectra, FkSpectraMetadata, FkSpectrum};
use crate::definition::SpectrumDefinition;
use crate::error::FkError;
use crate::geometry::RelativePosition;
use crate::spectrum::{SpectralTransformer, WindowScheduler};
use crate::waveform::{AlignedChannel, ChannelId, ChannelSegment, TemporalAligner, WaveformConditioner};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;

/// Inputs of one FK spectra invocation
#[derive(Debug, Clone, Copy)]
pub struct FkInputs<'a> {
    pub channel_segments: &'a [ChannelSegment],
    pub definition: &'a SpectrumDefinition,
    pub medium_velocity_km_per_sec: f64,
    pub relative_positions: &'a HashMap<ChannelId, RelativePosition>,
}

/// Shared flag a caller can trip to stop an invocation between windows
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Execution options; none of them affect the computed values
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Dedicated pool size; `None` uses rayon's global pool
    pub worker_threads: Option<usize>,
    pub deadline: Option<Instant>,
    pub cancellation: Option<CancellationToken>,
}

impl ProcessingOptions {
    fn check(&self) -> Result<(), FkError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(FkError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(FkError::DeadlineExceeded);
        }
        Ok(())
    }
}

/// A pluggable FK spectra estimator
pub trait FkSpectraAlgorithm: Send + Sync {
    /// Registry key
    fn name(&self) -> &str;

    fn generate_fk(&self, inputs: &FkInputs<'_>, options: &ProcessingOptions) -> Result<FkSpectra, FkError>;
}

/// Conventional delay-and-sum beamformer over the slowness grid
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayAndSumFk;

impl DelayAndSumFk {
    pub const NAME: &'static str = "delay-and-sum";
}

impl FkSpectraAlgorithm for DelayAndSumFk {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate_fk(&self, inputs: &FkInputs<'_>, options: &ProcessingOptions) -> Result<FkSpectra, FkError> {
        validate_inputs(inputs)?;

        match options.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(|| run(inputs, options))
            }
            None => run(inputs, options),
        }
    }
}

/// Generate FK spectra with the default algorithm and options
pub fn generate_fk(
    channel_segments: &[ChannelSegment],
    definition: &SpectrumDefinition,
    medium_velocity_km_per_sec: f64,
    relative_positions: &HashMap<ChannelId, RelativePosition>,
) -> Result<Vec<FkSpectrum>, FkError> {
    let inputs = FkInputs {
        channel_segments,
        definition,
        medium_velocity_km_per_sec,
        relative_positions,
    };
    DelayAndSumFk
        .generate_fk(&inputs, &ProcessingOptions::default())
        .map(|spectra| spectra.values)
}

fn validate_inputs(inputs: &FkInputs<'_>) -> Result<(), FkError> {
    inputs.definition.validate()?;

    if inputs.channel_segments.is_empty() {
        return Err(FkError::EmptyChannelSegments);
    }

    let mut seen = HashSet::with_capacity(inputs.channel_segments.len());
    for segment in inputs.channel_segments {
        if !seen.insert(&segment.id) {
            return Err(FkError::DuplicateChannel(segment.id.clone()));
        }
        if !inputs.relative_positions.contains_key(&segment.id) {
            return Err(FkError::MissingRelativePosition(segment.id.clone()));
        }
    }

    let velocity = inputs.medium_velocity_km_per_sec;
    if inputs.definition.use_channel_vertical_offsets && !(velocity.is_finite() && velocity > 0.0) {
        return Err(FkError::InvalidMediumVelocity(velocity));
    }

    Ok(())
}

fn run(inputs: &FkInputs<'_>, options: &ProcessingOptions) -> Result<FkSpectra, FkError> {
    let definition = inputs.definition;
    let metadata = FkSpectraMetadata::from_definition(definition);

    let conditioned =
        WaveformConditioner::new(definition.normalize_waveforms).condition(inputs.channel_segments);

    let Some(alignment) = TemporalAligner::new(definition).align(&conditioned) else {
        tracing::info!("No waveform matches the expected sample rate; no FK spectra generated");
        return Ok(FkSpectra {
            metadata,
            values: Vec::new(),
        });
    };

    let window_starts: Vec<OffsetDateTime> =
        WindowScheduler::new(alignment.reference, definition).windows().collect();

    tracing::info!(
        channels = inputs.channel_segments.len(),
        windows = window_starts.len(),
        reference_start = ?alignment.reference.start,
        reference_end = ?alignment.reference.end,
        "Generating FK spectra"
    );

    let processor = WindowProcessor {
        transformer: SpectralTransformer::new(definition),
        beamformer: Beamformer::new(
            SlownessGrid::from_definition(definition),
            definition.use_channel_vertical_offsets,
            inputs.medium_velocity_km_per_sec,
        ),
        channels: &alignment.channels,
        positions: inputs.relative_positions,
        window_lead: definition.window_lead,
    };

    // indexed parallel collect keeps window order
    let results: Vec<Option<FkSpectrum>> = window_starts
        .par_iter()
        .map(|&window_start| {
            options.check()?;
            processor.process(window_start)
        })
        .collect::<Result<_, FkError>>()?;

    let values: Vec<FkSpectrum> = results.into_iter().flatten().collect();
    tracing::info!(
        spectra = values.len(),
        skipped = window_starts.len() - values.len(),
        "FK spectra generation complete"
    );

    Ok(FkSpectra { metadata, values })
}

/// Immutable per-invocation state shared by all window computations
struct WindowProcessor<'a> {
    transformer: SpectralTransformer,
    beamformer: Beamformer,
    channels: &'a [AlignedChannel],
    positions: &'a HashMap<ChannelId, RelativePosition>,
    window_lead: time::Duration,
}

impl WindowProcessor<'_> {
    fn process(&self, window_start: OffsetDateTime) -> Result<Option<FkSpectrum>, FkError> {
        let Some(spectra) = self.transformer.transform(self.channels, window_start)? else {
            tracing::debug!(?window_start, "Skipping window with too few usable channels");
            return Ok(None);
        };

        let positions = spectra
            .channel_ids
            .iter()
            .map(|id| {
                self.positions
                    .get(id)
                    .copied()
                    .ok_or_else(|| FkError::MissingRelativePosition(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let grids = self.beamformer.beamform(&spectra, &positions);
        let quality = fk_quality(&grids.power.view());
        let attributes = peak_attributes(self.beamformer.grid(), &grids.power.view(), &grids.fstat.view());

        tracing::trace!(
            ?window_start,
            channels = spectra.num_channels(),
            bins = spectra.frequencies.len(),
            quality,
            "Computed FK spectrum"
        );

        Ok(Some(FkSpectrum {
            window_start,
            center_time: window_start + self.window_lead,
            power: grids.power,
            fstat: grids.fstat,
            quality,
            attributes,
        }))
    }
}
