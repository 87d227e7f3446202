//! Array-wide time reference and sample-lattice snapping
//!
//! All channels are put onto the sampling lattice defined by the modal start
//! time. A waveform whose samples fall between lattice points is moved to the
//! nearest lattice point without resampling; the resulting timing error is
//! bounded by half a sample period.

use super::{sample_period, ChannelId, ChannelSegment, Waveform};
use crate::definition::SpectrumDefinition;
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// Modal start and end instants shared by every window of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTimes {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

/// Waveforms of one channel that are eligible and lattice-aligned
#[derive(Debug, Clone)]
pub struct AlignedChannel {
    pub id: ChannelId,
    pub waveforms: Vec<Waveform>,
}

/// Output of [`TemporalAligner::align`]
#[derive(Debug, Clone)]
pub struct Alignment {
    pub reference: ReferenceTimes,
    pub channels: Vec<AlignedChannel>,
}

/// Which neighbouring lattice point a jitter is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterDirection {
    /// Lattice point reached by moving the waveform earlier
    Positive,
    /// Lattice point reached by moving the waveform later
    Negative,
}

/// Computes the reference instants and snaps waveforms onto their lattice
#[derive(Debug, Clone)]
pub struct TemporalAligner<'a> {
    definition: &'a SpectrumDefinition,
    period: Duration,
}

impl<'a> TemporalAligner<'a> {
    pub fn new(definition: &'a SpectrumDefinition) -> Self {
        Self {
            definition,
            period: sample_period(definition.waveform_sample_rate_hz),
        }
    }

    /// Nominal waveform sample period
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_eligible(&self, waveform: &Waveform) -> bool {
        self.definition.accepts_sample_rate(waveform.sample_rate_hz())
    }

    /// Most frequent instant among eligible waveforms; ties go to the earliest.
    pub fn modal_time<F>(&self, channel_segments: &[ChannelSegment], instant: F) -> Option<OffsetDateTime>
    where
        F: Fn(&Waveform) -> OffsetDateTime,
    {
        let mut counts: BTreeMap<OffsetDateTime, usize> = BTreeMap::new();
        for waveform in channel_segments
            .iter()
            .flat_map(|segment| segment.waveforms.iter())
            .filter(|waveform| self.is_eligible(waveform))
        {
            *counts.entry(instant(waveform)).or_insert(0) += 1;
        }

        // ascending iteration + strict comparison keeps the earliest tie
        let mut modal: Option<(OffsetDateTime, usize)> = None;
        for (time, count) in counts {
            match modal {
                Some((_, best)) if count <= best => {}
                _ => modal = Some((time, count)),
            }
        }
        modal.map(|(time, _)| time)
    }

    pub fn reference_times(&self, channel_segments: &[ChannelSegment]) -> Option<ReferenceTimes> {
        let start = self.modal_time(channel_segments, Waveform::start_time)?;
        let end = self.modal_time(channel_segments, Waveform::end_time)?;
        Some(ReferenceTimes { start, end })
    }

    /// Distance from `reference` to the lattice point next to `actual` in
    /// the given direction.
    pub fn jitter(
        &self,
        actual: OffsetDateTime,
        reference: OffsetDateTime,
        direction: JitterDirection,
    ) -> Duration {
        if actual == reference {
            return Duration::ZERO;
        }

        let period_ns = self.period.whole_nanoseconds();
        let unfilled_ns = (actual - reference).whole_nanoseconds().abs();
        let unfilled_samples = unfilled_ns / period_ns;
        let early = actual < reference;

        let steps = match (direction, early) {
            (JitterDirection::Positive, true) | (JitterDirection::Negative, false) => {
                unfilled_samples + 1
            }
            _ => unfilled_samples,
        };
        let shift = nanos(steps * period_ns);
        let interpolated = if early { actual + shift } else { actual - shift };

        match direction {
            JitterDirection::Positive => interpolated - reference,
            JitterDirection::Negative => reference - interpolated,
        }
    }

    /// A waveform passes when either neighbouring lattice point is less than
    /// one sample period away.
    pub fn passes_jitter_check(&self, waveform: &Waveform, reference: OffsetDateTime) -> bool {
        let start = waveform.start_time();
        if start == reference {
            return true;
        }
        self.jitter(start, reference, JitterDirection::Positive) < self.period
            || self.jitter(start, reference, JitterDirection::Negative) < self.period
    }

    /// Move the waveform onto the nearest lattice point; samples are untouched.
    pub fn snap(&self, waveform: &Waveform, reference: OffsetDateTime) -> Waveform {
        let start = waveform.start_time();
        if start == reference {
            return waveform.clone();
        }

        let half_period = nanos(self.period.whole_nanoseconds() / 2);
        let positive = self.jitter(start, reference, JitterDirection::Positive);
        if positive < half_period {
            waveform.with_start_time(start - positive)
        } else {
            let negative = self.jitter(start, reference, JitterDirection::Negative);
            waveform.with_start_time(start + negative)
        }
    }

    /// Compute the reference instants and the usable, snapped waveforms of
    /// every channel. `None` when no waveform has an acceptable sample rate.
    pub fn align(&self, channel_segments: &[ChannelSegment]) -> Option<Alignment> {
        let reference = self.reference_times(channel_segments)?;

        let channels = channel_segments
            .iter()
            .map(|segment| AlignedChannel {
                id: segment.id.clone(),
                waveforms: segment
                    .waveforms
                    .iter()
                    .filter(|waveform| self.is_eligible(waveform))
                    .filter(|waveform| self.passes_jitter_check(waveform, reference.start))
                    .map(|waveform| self.snap(waveform, reference.start))
                    .collect(),
            })
            .collect();

        Some(Alignment {
            reference,
            channels,
        })
    }
}

fn nanos(value: i128) -> Duration {
    Duration::nanoseconds(value as i64)
}
