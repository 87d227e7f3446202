//! Per-waveform demeaning and max-amplitude normalization

use super::{ChannelSegment, Waveform};

/// Subtract the arithmetic mean of `samples` from every sample
pub fn demean(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|&s| s - mean).collect()
}

/// Divide every sample by the largest absolute sample.
///
/// An all-zero signal is returned unchanged.
pub fn normalize_max_amplitude(samples: &[f64]) -> Vec<f64> {
    let max_abs = samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
    if max_abs == 0.0 {
        return samples.to_vec();
    }
    samples.iter().map(|&s| s / max_abs).collect()
}

/// Conditions every waveform of every channel before FK processing
#[derive(Debug, Clone, Copy)]
pub struct WaveformConditioner {
    normalize: bool,
}

impl WaveformConditioner {
    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    /// Demean (and optionally normalize) each waveform independently
    pub fn condition(&self, channel_segments: &[ChannelSegment]) -> Vec<ChannelSegment> {
        channel_segments
            .iter()
            .map(|segment| ChannelSegment {
                id: segment.id.clone(),
                waveforms: segment
                    .waveforms
                    .iter()
                    .map(|waveform| self.condition_waveform(waveform))
                    .collect(),
            })
            .collect()
    }

    fn condition_waveform(&self, waveform: &Waveform) -> Waveform {
        let demeaned = demean(waveform.samples());
        if self.normalize {
            waveform.with_samples(normalize_max_amplitude(&demeaned))
        } else {
            waveform.with_samples(demeaned)
        }
    }
}
