/// Status nibble of a MIDI note-on message.
const NOTE_ON_STATUS: u8 = 0x90;
/// Status nibble of a MIDI note-off message.
const NOTE_OFF_STATUS: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEventKind {
    On { velocity: u8 },
    Off,
}

/// A single note transition. `timestamp` is in seconds since the session was
/// prepared and never decreases within a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    pub note: u8,
    pub channel: u8,
    pub timestamp: f64,
}

impl NoteEvent {
    pub fn note_on(note: u8, velocity: u8, channel: u8, timestamp: f64) -> Self {
        NoteEvent {
            kind: NoteEventKind::On { velocity },
            note,
            channel,
            timestamp,
        }
    }

    pub fn note_off(note: u8, channel: u8, timestamp: f64) -> Self {
        NoteEvent {
            kind: NoteEventKind::Off,
            note,
            channel,
            timestamp,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self.kind, NoteEventKind::On { .. })
    }

    pub fn is_off(&self) -> bool {
        self.kind == NoteEventKind::Off
    }

    /// Velocity of a note-on, zero for a note-off.
    pub fn velocity(&self) -> u8 {
        match self.kind {
            NoteEventKind::On { velocity } => velocity,
            NoteEventKind::Off => 0,
        }
    }

    /// Encode as a three byte MIDI channel voice message.
    pub fn to_midi_bytes(&self) -> [u8; 3] {
        let status = match self.kind {
            NoteEventKind::On { .. } => NOTE_ON_STATUS,
            NoteEventKind::Off => NOTE_OFF_STATUS,
        };
        [
            status | (self.channel & 0x0F),
            self.note & 0x7F,
            self.velocity() & 0x7F,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midi_encoding() {
        assert_eq!(
            NoteEvent::note_on(69, 127, 0, 0.0).to_midi_bytes(),
            [0x90, 69, 127]
        );
        assert_eq!(NoteEvent::note_off(60, 9, 1.5).to_midi_bytes(), [0x89, 60, 0]);
    }

    #[test]
    fn accessors() {
        let on = NoteEvent::note_on(64, 100, 0, 0.25);
        assert!(on.is_on() && !on.is_off());
        assert_eq!(on.velocity(), 100);
        let off = NoteEvent::note_off(64, 0, 0.5);
        assert!(off.is_off() && !off.is_on());
        assert_eq!(off.velocity(), 0);
    }
}
