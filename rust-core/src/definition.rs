//! FK spectrum definition (window, passband and slowness grid parameters)

use crate::error::FkError;
use serde::{Deserialize, Serialize};
use time::Duration;

/// Shortest representable sample period
const MIN_PERIOD_SECS: f64 = 1.0e-9;

/// Static configuration of one FK spectra computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumDefinition {
    /// Cadence of the emitted spectra in Hz
    pub output_sample_rate_hz: f64,

    /// Offset from window start to the spectrum's nominal time
    #[serde(rename = "window_lead_secs", with = "duration_secs")]
    pub window_lead: Duration,

    /// Analysis window length
    #[serde(rename = "window_length_secs", with = "duration_secs")]
    pub window_length: Duration,

    /// Passband, inclusive on both ends
    pub low_frequency_hz: f64,
    pub high_frequency_hz: f64,

    /// 3-D (vertical offsets used) or planar beamforming
    pub use_channel_vertical_offsets: bool,

    /// Divide each waveform by its max amplitude after demeaning
    pub normalize_waveforms: bool,

    /// Seismic phase the grid is tuned for (e.g. "P")
    #[serde(default = "default_phase_type")]
    pub phase_type: String,

    pub slow_start_x_sec_per_km: f64,
    pub slow_delta_x_sec_per_km: f64,
    pub slow_count_x: usize,

    pub slow_start_y_sec_per_km: f64,
    pub slow_delta_y_sec_per_km: f64,
    pub slow_count_y: usize,

    /// Expected per-channel sample rate and allowed deviation
    pub waveform_sample_rate_hz: f64,
    pub waveform_sample_rate_tolerance_hz: f64,

    /// Windows with fewer usable channels are skipped
    pub minimum_waveforms_for_spectra: usize,
}

fn default_phase_type() -> String {
    "P".to_string()
}

impl SpectrumDefinition {
    /// Parse a definition from TOML and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, FkError> {
        let definition: Self = toml::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), FkError> {
        fn check(condition: bool, message: &str) -> Result<(), FkError> {
            if condition {
                Ok(())
            } else {
                Err(FkError::InvalidDefinition(message.to_string()))
            }
        }

        check(
            self.window_length > Duration::ZERO,
            "window_length must be > 0",
        )?;
        check(
            self.window_lead >= Duration::ZERO,
            "window_lead must be >= 0",
        )?;
        check(
            self.output_sample_rate_hz.is_finite() && self.output_sample_rate_hz > 0.0,
            "output_sample_rate_hz must be > 0",
        )?;
        check(
            1.0 / self.output_sample_rate_hz >= MIN_PERIOD_SECS,
            "output_sample_rate_hz period must be at least 1 ns",
        )?;
        check(
            self.low_frequency_hz.is_finite() && self.low_frequency_hz >= 0.0,
            "low_frequency_hz must be >= 0",
        )?;
        check(
            self.high_frequency_hz.is_finite() && self.high_frequency_hz > self.low_frequency_hz,
            "high_frequency_hz must be > low_frequency_hz",
        )?;
        check(self.slow_count_x > 0, "slow_count_x must be > 0")?;
        check(self.slow_count_y > 0, "slow_count_y must be > 0")?;
        check(
            [
                self.slow_start_x_sec_per_km,
                self.slow_delta_x_sec_per_km,
                self.slow_start_y_sec_per_km,
                self.slow_delta_y_sec_per_km,
            ]
            .iter()
            .all(|v| v.is_finite()),
            "slowness grid start and delta values must be finite",
        )?;
        check(
            self.waveform_sample_rate_hz.is_finite() && self.waveform_sample_rate_hz > 0.0,
            "waveform_sample_rate_hz must be > 0",
        )?;
        check(
            1.0 / self.waveform_sample_rate_hz >= MIN_PERIOD_SECS,
            "waveform_sample_rate_hz period must be at least 1 ns",
        )?;
        check(
            self.waveform_sample_rate_tolerance_hz >= 0.0,
            "waveform_sample_rate_tolerance_hz must be >= 0",
        )?;
        check(
            self.minimum_waveforms_for_spectra >= 1,
            "minimum_waveforms_for_spectra must be >= 1",
        )?;

        Ok(())
    }

    /// Whether a waveform sampled at `sample_rate_hz` may be used
    pub fn accepts_sample_rate(&self, sample_rate_hz: f64) -> bool {
        (sample_rate_hz - self.waveform_sample_rate_hz).abs()
            <= self.waveform_sample_rate_tolerance_hz
    }
}

/// `time::Duration` as floating-point seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_seconds_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() {
            return Err(serde::de::Error::custom("duration must be finite"));
        }
        Ok(Duration::seconds_f64(secs))
    }
}
