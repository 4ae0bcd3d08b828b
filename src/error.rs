//! Error types. Only [ConfigError] is fatal; the other two describe
//! conditions the per-block path recovers from.
use std::error::Error;
use std::fmt;

/// Rejects a session before any block is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidSampleRate(f64),
    InvalidBlockSize(usize),
    InvalidSilenceThreshold(f64),
    InvalidYinThreshold(f64),
    InvalidSmoothing(f64),
    InvalidChangeThreshold(f64),
    InvalidVelocity(u8),
    InvalidChannel(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be finite and positive, got {}", rate)
            }
            ConfigError::InvalidBlockSize(size) => {
                write!(f, "block size must be greater than 0, got {}", size)
            }
            ConfigError::InvalidSilenceThreshold(threshold) => write!(
                f,
                "silence threshold must be finite and non-negative, got {}",
                threshold
            ),
            ConfigError::InvalidYinThreshold(threshold) => {
                write!(f, "YIN threshold must lie in (0, 1], got {}", threshold)
            }
            ConfigError::InvalidSmoothing(smoothing) => {
                write!(f, "smoothing factor must lie in [0, 1), got {}", smoothing)
            }
            ConfigError::InvalidChangeThreshold(cents) => write!(
                f,
                "change threshold must be finite and non-negative, got {} cents",
                cents
            ),
            ConfigError::InvalidVelocity(velocity) => {
                write!(f, "velocity must be at most 127, got {}", velocity)
            }
            ConfigError::InvalidChannel(channel) => {
                write!(f, "MIDI channel must be at most 15, got {}", channel)
            }
        }
    }
}

impl Error for ConfigError {}

/// Why the estimator produced no pitch for a block. Every variant degrades to
/// "no pitch" in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// Fewer than six samples: not enough lags for interpolation.
    InsufficientSamples,
    /// The difference function was zero everywhere (e.g. a DC block).
    DegenerateNormalization,
    /// No lag fell below the absolute threshold.
    NoDip,
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::InsufficientSamples => write!(f, "insufficient samples"),
            EstimateError::DegenerateNormalization => {
                write!(f, "cumulative difference sum is zero")
            }
            EstimateError::NoDip => write!(f, "no lag below the absolute threshold"),
        }
    }
}

impl Error for EstimateError {}

/// A sink could not take a batch of events. The batch is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The transport is not connected or has gone away.
    Unavailable(String),
    /// The transport refused a message.
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Unavailable(reason) => write!(f, "event sink unavailable: {}", reason),
            SinkError::Rejected(reason) => write!(f, "event sink rejected event: {}", reason),
        }
    }
}

impl Error for SinkError {}
