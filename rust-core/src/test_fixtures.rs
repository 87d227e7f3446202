//! Shared builders for unit tests

use crate::definition::SpectrumDefinition;
use crate::geometry::RelativePosition;
use crate::waveform::{ChannelId, ChannelSegment, Waveform};
use std::collections::HashMap;
use std::f64::consts::PI;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const T0: OffsetDateTime = datetime!(2010-05-20 22:30:00 UTC);

/// 4 s windows every second, 1-3 Hz, 9×9 grid of ±0.2 s/km, 40 Hz waveforms
pub fn definition() -> SpectrumDefinition {
    SpectrumDefinition {
        output_sample_rate_hz: 1.0,
        window_lead: Duration::seconds(1),
        window_length: Duration::seconds(4),
        low_frequency_hz: 1.0,
        high_frequency_hz: 3.0,
        use_channel_vertical_offsets: false,
        normalize_waveforms: false,
        phase_type: "P".to_string(),
        slow_start_x_sec_per_km: -0.2,
        slow_delta_x_sec_per_km: 0.05,
        slow_count_x: 9,
        slow_start_y_sec_per_km: -0.2,
        slow_delta_y_sec_per_km: 0.05,
        slow_count_y: 9,
        waveform_sample_rate_hz: 40.0,
        waveform_sample_rate_tolerance_hz: 0.001,
        minimum_waveforms_for_spectra: 2,
    }
}

/// `sin(2πf(t - delay))` sampled at `t = n / rate`
pub fn sinusoid(frequency_hz: f64, sample_rate_hz: f64, count: usize, delay_secs: f64) -> Vec<f64> {
    (0..count)
        .map(|n| (2.0 * PI * frequency_hz * (n as f64 / sample_rate_hz - delay_secs)).sin())
        .collect()
}

/// Channel names and positions (km) of a three-element L-shaped array
const ARRAY: [(&str, f64, f64); 3] = [("ARR.C0.SHZ", 0.0, 0.0), ("ARR.E1.SHZ", 1.0, 0.0), ("ARR.N1.SHZ", 0.0, 1.0)];

pub fn tripartite_positions() -> HashMap<ChannelId, RelativePosition> {
    ARRAY
        .iter()
        .map(|&(name, east, north)| (ChannelId::new(name), RelativePosition::new(east, north, 0.0)))
        .collect()
}

/// A 2 Hz plane wave with horizontal slowness `(east, north)` crossing the
/// array, `count` samples at 40 Hz from `T0`.
pub fn array_segments(slowness: (f64, f64), count: usize) -> Vec<ChannelSegment> {
    ARRAY
        .iter()
        .map(|&(name, east, north)| {
            let delay = east * slowness.0 + north * slowness.1;
            let waveform = Waveform::new(T0, 40.0, sinusoid(2.0, 40.0, count, delay));
            ChannelSegment::new(name, vec![waveform])
        })
        .collect()
}
