//! Formatting of the current pitch for a display collaborator.
use std::fmt;

use crate::note::{note_number, NoteName};

/// Shown in place of a note name when there is no pitch.
pub const NOT_AVAILABLE: &str = "N/A";

/// What a display shows for one block: the nearest note and the smoothed
/// frequency rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayReading {
    pub note: Option<NoteName>,
    pub frequency: f64,
}

impl DisplayReading {
    /// A frequency of zero or below reads as "N/A" at 0.00 Hz.
    pub fn from_frequency(frequency: f64) -> Self {
        if !frequency.is_finite() || frequency <= 0.0 {
            return DisplayReading::unavailable();
        }
        DisplayReading {
            note: note_number(frequency).map(NoteName::of),
            frequency: (frequency * 100.0).round() / 100.0,
        }
    }

    pub fn unavailable() -> Self {
        DisplayReading {
            note: None,
            frequency: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.note.is_some()
    }
}

impl fmt::Display for DisplayReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note {
            Some(note) => write!(f, "{} {:.2} Hz", note, self.frequency),
            None => write!(f, "{} {:.2} Hz", NOT_AVAILABLE, self.frequency),
        }
    }
}

/// Receives one [DisplayReading] per processed block. Implementations are
/// called from the audio path and must not block.
pub trait PitchDisplay {
    fn show(&mut self, reading: &DisplayReading);
}

impl<F> PitchDisplay for F
where
    F: FnMut(&DisplayReading),
{
    fn show(&mut self, reading: &DisplayReading) {
        self(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_note_and_frequency() {
        let reading = DisplayReading::from_frequency(440.004);
        assert_eq!(reading.frequency, 440.0);
        assert_eq!(reading.to_string(), "A4 440.00 Hz");
        assert_eq!(
            DisplayReading::from_frequency(261.6256).to_string(),
            "C4 261.63 Hz"
        );
    }

    #[test]
    fn no_pitch_is_not_available() {
        assert_eq!(DisplayReading::from_frequency(0.0).to_string(), "N/A 0.00 Hz");
        assert_eq!(
            DisplayReading::from_frequency(-3.0),
            DisplayReading::unavailable()
        );
        assert!(!DisplayReading::unavailable().is_available());
    }

    #[test]
    fn closures_are_displays() {
        let mut shown = vec![];
        {
            let mut display = |reading: &DisplayReading| shown.push(reading.to_string());
            display.show(&DisplayReading::from_frequency(880.0));
        }
        assert_eq!(shown, vec!["A5 880.00 Hz".to_string()]);
    }
}
