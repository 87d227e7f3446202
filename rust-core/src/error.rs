//! Error types for FK spectrum generation

use crate::waveform::ChannelId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FkError {
    #[error("Cannot generate FK spectra with zero channel segments")]
    EmptyChannelSegments,

    #[error("Cannot generate FK spectra from duplicate channel segments (channel {0})")]
    DuplicateChannel(ChannelId),

    #[error("No relative position supplied for channel {0}")]
    MissingRelativePosition(ChannelId),

    #[error("Invalid spectrum definition: {0}")]
    InvalidDefinition(String),

    #[error("Medium velocity must be finite and > 0 km/s for 3-D beamforming (found: {0})")]
    InvalidMediumVelocity(f64),

    #[error("No FK spectra algorithm registered under '{0}'")]
    UnknownAlgorithm(String),

    #[error("FK spectra generation was cancelled")]
    Cancelled,

    #[error("FK spectra generation exceeded its deadline")]
    DeadlineExceeded,

    #[error("FFT processing failed: {0}")]
    Fft(#[from] realfft::FftError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to parse spectrum definition: {0}")]
    Config(#[from] toml::de::Error),
}
