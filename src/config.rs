//! Session configuration. Every tuning constant of the pipeline is a field
//! here with its empirical default.
use crate::clock::Timebase;
use crate::detector::yin::DEFAULT_THRESHOLD;
use crate::error::ConfigError;
use crate::gate::DEFAULT_SILENCE_THRESHOLD;
use crate::note::state::DEFAULT_VELOCITY;
use crate::smoother::{DEFAULT_CHANGE_THRESHOLD_CENTS, DEFAULT_SMOOTHING};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// RMS level below which a block is silent.
    pub silence_threshold: f64,
    /// Absolute threshold on the normalized YIN difference.
    pub yin_threshold: f64,
    /// Weight of the previous smoothed pitch.
    pub smoothing: f64,
    /// Smallest smoothed pitch movement that re-evaluates the note.
    pub change_threshold_cents: f64,
    pub velocity: u8,
    /// Zero based MIDI channel.
    pub channel: u8,
    pub timebase: Timebase,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            yin_threshold: DEFAULT_THRESHOLD,
            smoothing: DEFAULT_SMOOTHING,
            change_threshold_cents: DEFAULT_CHANGE_THRESHOLD_CENTS,
            velocity: DEFAULT_VELOCITY,
            channel: 0,
            timebase: Timebase::Wall,
        }
    }
}

impl SessionConfig {
    pub fn with_silence_threshold(mut self, threshold: f64) -> Self {
        self.silence_threshold = threshold;
        self
    }

    pub fn with_yin_threshold(mut self, threshold: f64) -> Self {
        self.yin_threshold = threshold;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_change_threshold_cents(mut self, cents: f64) -> Self {
        self.change_threshold_cents = cents;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_timebase(mut self, timebase: Timebase) -> Self {
        self.timebase = timebase;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.silence_threshold.is_finite() || self.silence_threshold < 0.0 {
            return Err(ConfigError::InvalidSilenceThreshold(self.silence_threshold));
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold <= 1.0) {
            return Err(ConfigError::InvalidYinThreshold(self.yin_threshold));
        }
        if !(self.smoothing >= 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing));
        }
        if !self.change_threshold_cents.is_finite() || self.change_threshold_cents < 0.0 {
            return Err(ConfigError::InvalidChangeThreshold(
                self.change_threshold_cents,
            ));
        }
        if self.velocity > 127 {
            return Err(ConfigError::InvalidVelocity(self.velocity));
        }
        if self.channel > 15 {
            return Err(ConfigError::InvalidChannel(self.channel));
        }
        Ok(())
    }
}

/// Checks the arguments of a `prepare` call.
pub fn validate_stream(sample_rate: f64, block_size: usize) -> Result<(), ConfigError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ConfigError::InvalidSampleRate(sample_rate));
    }
    if block_size == 0 {
        return Err(ConfigError::InvalidBlockSize(block_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.silence_threshold, 0.001);
        assert_eq!(config.yin_threshold, 0.10);
        assert_eq!(config.smoothing, 0.8);
        assert_eq!(config.velocity, 127);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = SessionConfig::default();
        assert_eq!(
            config.clone().with_yin_threshold(0.0).validate(),
            Err(ConfigError::InvalidYinThreshold(0.0))
        );
        assert_eq!(
            config.clone().with_smoothing(1.0).validate(),
            Err(ConfigError::InvalidSmoothing(1.0))
        );
        assert_eq!(
            config.clone().with_velocity(128).validate(),
            Err(ConfigError::InvalidVelocity(128))
        );
        assert_eq!(
            config.clone().with_channel(16).validate(),
            Err(ConfigError::InvalidChannel(16))
        );
        assert!(config.clone().with_silence_threshold(-1.0).validate().is_err());
        assert!(config.with_change_threshold_cents(f64::NAN).validate().is_err());
    }

    #[test]
    fn stream_parameters() {
        assert_eq!(validate_stream(44100.0, 1024), Ok(()));
        assert_eq!(
            validate_stream(0.0, 1024),
            Err(ConfigError::InvalidSampleRate(0.0))
        );
        assert!(validate_stream(f64::NAN, 1024).is_err());
        assert_eq!(
            validate_stream(48000.0, 0),
            Err(ConfigError::InvalidBlockSize(0))
        );
    }
}
