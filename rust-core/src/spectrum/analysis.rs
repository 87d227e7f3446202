//! Per-window spectral analysis
//!
//! Trims every channel to the analysis window, transforms it and keeps the
//! passband bins as a `channels × bins` complex matrix.

use super::fft::{frequency_axis, passband_bins, FftEngine};
use crate::definition::SpectrumDefinition;
use crate::error::FkError;
use crate::waveform::{AlignedChannel, ChannelId, Waveform};
use ndarray::Array2;
use num_complex::Complex64;
use time::{Duration, OffsetDateTime};

/// Passband spectra of the channels usable in one window
#[derive(Debug, Clone)]
pub struct WindowSpectra {
    /// Channels in row order of `passband`
    pub channel_ids: Vec<ChannelId>,

    /// Row per channel, column per passband bin
    pub passband: Array2<Complex64>,

    /// Frequency (Hz, signed) of each passband column
    pub frequencies: Vec<f64>,

    /// Trimmed sample count (the DFT length)
    pub num_samples: usize,
}

impl WindowSpectra {
    pub fn num_channels(&self) -> usize {
        self.channel_ids.len()
    }

    /// `Σ|X|² / channels / N²` over every passband entry
    pub fn average_power(&self) -> f64 {
        let total: f64 = self.passband.iter().map(|x| x.norm_sqr()).sum();
        let n = self.num_samples as f64;
        total / self.num_channels() as f64 / (n * n)
    }
}

/// Turns aligned waveforms into passband spectra, one window at a time
#[derive(Debug, Clone)]
pub struct SpectralTransformer {
    window_length: Duration,
    waveform_sample_rate_hz: f64,
    low_frequency_hz: f64,
    high_frequency_hz: f64,
    minimum_waveforms: usize,
}

impl SpectralTransformer {
    pub fn new(definition: &SpectrumDefinition) -> Self {
        Self {
            window_length: definition.window_length,
            waveform_sample_rate_hz: definition.waveform_sample_rate_hz,
            low_frequency_hz: definition.low_frequency_hz,
            high_frequency_hz: definition.high_frequency_hz,
            minimum_waveforms: definition.minimum_waveforms_for_spectra,
        }
    }

    /// Trimmed waveform per usable channel.
    ///
    /// A channel contributes its first waveform covering the whole window.
    /// Channels whose trimmed length differs from the first usable channel
    /// are left out.
    pub fn windowed_waveforms(
        &self,
        channels: &[AlignedChannel],
        window_start: OffsetDateTime,
    ) -> Vec<(ChannelId, Waveform)> {
        let window_end = window_start + self.window_length;

        let mut windowed: Vec<(ChannelId, Waveform)> = Vec::with_capacity(channels.len());
        for channel in channels {
            let trimmed = channel
                .waveforms
                .iter()
                .find(|waveform| waveform.contains(window_start) && waveform.contains(window_end))
                .and_then(|waveform| waveform.trim(window_start, window_end));

            let Some(trimmed) = trimmed else {
                continue;
            };

            if let Some((_, first)) = windowed.first() {
                if first.sample_count() != trimmed.sample_count() {
                    tracing::trace!(
                        channel = %channel.id,
                        expected = first.sample_count(),
                        found = trimmed.sample_count(),
                        "Dropping channel with mismatched sample count"
                    );
                    continue;
                }
            }
            windowed.push((channel.id.clone(), trimmed));
        }
        windowed
    }

    /// Passband spectra for the window starting at `window_start`.
    ///
    /// `Ok(None)` when fewer than the minimum number of channels cover the
    /// window.
    pub fn transform(
        &self,
        channels: &[AlignedChannel],
        window_start: OffsetDateTime,
    ) -> Result<Option<WindowSpectra>, FkError> {
        let windowed = self.windowed_waveforms(channels, window_start);
        if windowed.is_empty() || windowed.len() < self.minimum_waveforms {
            return Ok(None);
        }

        let num_samples = windowed[0].1.sample_count();
        let delta_frequency = self.waveform_sample_rate_hz / num_samples as f64;
        let axis = frequency_axis(num_samples, delta_frequency);
        let bins = passband_bins(&axis, self.low_frequency_hz, self.high_frequency_hz);

        let mut engine = FftEngine::new(num_samples);
        let mut passband = Array2::<Complex64>::zeros((windowed.len(), bins.len()));
        for (row, (_, waveform)) in windowed.iter().enumerate() {
            let spectrum = engine.compute_spectrum(waveform.samples())?;
            for (col, &bin) in bins.iter().enumerate() {
                passband[[row, col]] = spectrum[bin];
            }
        }

        Ok(Some(WindowSpectra {
            channel_ids: windowed.into_iter().map(|(id, _)| id).collect(),
            passband,
            frequencies: bins.iter().map(|&bin| axis[bin]).collect(),
            num_samples,
        }))
    }
}
