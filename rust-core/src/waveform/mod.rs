//! Waveform data model
//!
//! Waveforms are immutable values. Conditioning, snapping and trimming all
//! produce new instances; sample storage is shared through `Arc` so that a
//! snapped waveform does not copy its samples.

pub mod alignment;
pub mod conditioning;

pub use alignment::{AlignedChannel, Alignment, ReferenceTimes, TemporalAligner};
pub use conditioning::WaveformConditioner;

use std::fmt;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

const NANOS_PER_SEC: f64 = 1.0e9;

/// Tolerance (in samples) when mapping an instant onto a sample index
const SAMPLE_INDEX_EPSILON: f64 = 1.0e-3;

/// Identity of a single array element channel (e.g. `"ASAR.AS01.SHZ"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChannelId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Sample period for `sample_rate_hz`, truncated to whole nanoseconds
pub fn sample_period(sample_rate_hz: f64) -> Duration {
    Duration::nanoseconds((NANOS_PER_SEC / sample_rate_hz) as i64)
}

/// Uniformly sampled time series
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    start_time: OffsetDateTime,
    sample_rate_hz: f64,
    samples: Arc<[f64]>,
}

impl Waveform {
    pub fn new(
        start_time: OffsetDateTime,
        sample_rate_hz: f64,
        samples: impl Into<Arc<[f64]>>,
    ) -> Self {
        Self {
            start_time,
            sample_rate_hz,
            samples: samples.into(),
        }
    }

    pub fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Time of the last sample
    pub fn end_time(&self) -> OffsetDateTime {
        let last = self.samples.len().saturating_sub(1) as f64;
        let nanos = (last / self.sample_rate_hz * NANOS_PER_SEC).round() as i64;
        self.start_time + Duration::nanoseconds(nanos)
    }

    /// Whether `instant` lies in the closed interval `[start_time, end_time]`
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        !self.samples.is_empty() && self.start_time <= instant && instant <= self.end_time()
    }

    /// Same samples, new start time
    pub fn with_start_time(&self, start_time: OffsetDateTime) -> Self {
        Self {
            start_time,
            sample_rate_hz: self.sample_rate_hz,
            samples: Arc::clone(&self.samples),
        }
    }

    /// Same timing, new samples
    pub fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self::new(self.start_time, self.sample_rate_hz, samples)
    }

    /// Keep only the samples falling in `[start, end]`.
    ///
    /// Returns `None` when no sample lies inside the interval.
    pub fn trim(&self, start: OffsetDateTime, end: OffsetDateTime) -> Option<Self> {
        if self.samples.is_empty() || end < start {
            return None;
        }

        let first = self.fractional_index(start).max(0.0);
        let last = self.fractional_index(end);

        let first = (first - SAMPLE_INDEX_EPSILON).ceil().max(0.0) as usize;
        if last + SAMPLE_INDEX_EPSILON < 0.0 {
            return None;
        }
        let last = ((last + SAMPLE_INDEX_EPSILON).floor() as usize).min(self.samples.len() - 1);
        if first > last {
            return None;
        }

        let offset = (first as f64 / self.sample_rate_hz * NANOS_PER_SEC).round() as i64;
        Some(Self::new(
            self.start_time + Duration::nanoseconds(offset),
            self.sample_rate_hz,
            &self.samples[first..=last],
        ))
    }

    fn fractional_index(&self, instant: OffsetDateTime) -> f64 {
        let nanos = (instant - self.start_time).whole_nanoseconds() as f64;
        nanos * self.sample_rate_hz / NANOS_PER_SEC
    }
}

/// All waveform pieces recorded on one channel, possibly with gaps
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSegment {
    pub id: ChannelId,
    pub waveforms: Vec<Waveform>,
}

impl ChannelSegment {
    pub fn new(id: impl Into<ChannelId>, waveforms: Vec<Waveform>) -> Self {
        Self {
            id: id.into(),
            waveforms,
        }
    }
}
