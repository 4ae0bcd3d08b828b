//! Equal-tempered note numbers, names, and the note event state machine.
use std::fmt;

pub mod event;
pub mod state;

pub use event::{NoteEvent, NoteEventKind};
pub use state::{NoteState, NoteStateMachine};

/// Note number of A4.
pub const A4_NOTE: u8 = 69;
/// Reference frequency of A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;
/// Highest valid note number.
pub const MAX_NOTE: u8 = 127;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Fractional note number of `frequency`, with A4 = 69.
pub fn fractional_note(frequency: f64) -> f64 {
    A4_NOTE as f64 + 12.0 * (frequency / A4_FREQUENCY).log2()
}

/// Map `frequency` to the nearest equal-tempered note number. A frequency
/// exactly halfway between two notes maps to the upper one. Returns `None`
/// for non-positive or non-finite frequencies and for frequencies whose note
/// falls outside `0..=127`.
pub fn note_number(frequency: f64) -> Option<u8> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return None;
    }
    let note = fractional_note(frequency).round();
    if note < 0.0 || note > MAX_NOTE as f64 {
        return None;
    }
    Some(note as u8)
}

/// Frequency in Hz of an equal-tempered note number.
pub fn note_frequency(note: u8) -> f64 {
    A4_FREQUENCY * 2f64.powf((note as f64 - A4_NOTE as f64) / 12.0)
}

/// Signed distance from `from` to `to` in cents.
pub fn cents_between(from: f64, to: f64) -> f64 {
    1200.0 * (to / from).log2()
}

/// The name of a note, e.g. `C#4`. Middle C (note 60) is `C4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    pub pitch_class: &'static str,
    pub octave: i8,
}

impl NoteName {
    pub fn of(note: u8) -> Self {
        NoteName {
            pitch_class: PITCH_CLASSES[(note % 12) as usize],
            octave: (note / 12) as i8 - 1,
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}
