use log::debug;

use crate::note::event::NoteEvent;
use crate::note::note_number;

/// Default note-on velocity.
pub const DEFAULT_VELOCITY: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Silent,
    Sounding(u8),
}

/// Tracks the single sounding note and emits the transitions between notes.
/// At most one note is on at any time, and when a note changes its note-off
/// is pushed before the new note-on.
#[derive(Debug, Clone)]
pub struct NoteStateMachine {
    state: NoteState,
    velocity: u8,
    channel: u8,
}

impl NoteStateMachine {
    pub fn new(velocity: u8, channel: u8) -> Self {
        NoteStateMachine {
            state: NoteState::Silent,
            velocity,
            channel,
        }
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn sounding_note(&self) -> Option<u8> {
        match self.state {
            NoteState::Sounding(note) => Some(note),
            NoteState::Silent => None,
        }
    }

    /// Handle a stabilized pitch. A frequency without a valid note number is
    /// handled like silence.
    pub fn on_pitch(&mut self, frequency: f64, timestamp: f64, events: &mut Vec<NoteEvent>) {
        let note = match note_number(frequency) {
            Some(note) => note,
            None => return self.on_silence(timestamp, events),
        };

        match self.state {
            NoteState::Sounding(current) if current == note => {}
            NoteState::Sounding(current) => {
                debug!("note change {} -> {} ({:.2} Hz)", current, note, frequency);
                events.push(NoteEvent::note_off(current, self.channel, timestamp));
                events.push(NoteEvent::note_on(note, self.velocity, self.channel, timestamp));
                self.state = NoteState::Sounding(note);
            }
            NoteState::Silent => {
                debug!("note on {} ({:.2} Hz)", note, frequency);
                events.push(NoteEvent::note_on(note, self.velocity, self.channel, timestamp));
                self.state = NoteState::Sounding(note);
            }
        }
    }

    /// Handle silence or a failed detection.
    pub fn on_silence(&mut self, timestamp: f64, events: &mut Vec<NoteEvent>) {
        if let NoteState::Sounding(current) = self.state {
            debug!("note off {}", current);
            events.push(NoteEvent::note_off(current, self.channel, timestamp));
            self.state = NoteState::Silent;
        }
    }
}

impl Default for NoteStateMachine {
    fn default() -> Self {
        NoteStateMachine::new(DEFAULT_VELOCITY, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteEventKind;

    #[test]
    fn silent_to_sounding() {
        let mut machine = NoteStateMachine::default();
        let mut events = vec![];
        machine.on_pitch(440.0, 0.5, &mut events);
        assert_eq!(events, vec![NoteEvent::note_on(69, 127, 0, 0.5)]);
        assert_eq!(machine.state(), NoteState::Sounding(69));
    }

    #[test]
    fn same_note_is_a_no_op() {
        let mut machine = NoteStateMachine::default();
        let mut events = vec![];
        machine.on_pitch(440.0, 0.0, &mut events);
        machine.on_pitch(442.0, 0.1, &mut events);
        machine.on_pitch(438.5, 0.2, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn change_emits_off_before_on() {
        let mut machine = NoteStateMachine::new(90, 2);
        let mut events = vec![];
        machine.on_pitch(440.0, 0.0, &mut events);
        events.clear();
        machine.on_pitch(220.0, 1.0, &mut events);
        assert_eq!(
            events,
            vec![
                NoteEvent::note_off(69, 2, 1.0),
                NoteEvent::note_on(57, 90, 2, 1.0)
            ]
        );
        assert_eq!(machine.sounding_note(), Some(57));
    }

    #[test]
    fn silence_turns_note_off_once() {
        let mut machine = NoteStateMachine::default();
        let mut events = vec![];
        machine.on_pitch(261.63, 0.0, &mut events);
        machine.on_silence(1.0, &mut events);
        machine.on_silence(2.0, &mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, NoteEventKind::Off);
        assert_eq!(events[1].note, 60);
        assert_eq!(machine.state(), NoteState::Silent);
    }

    #[test]
    fn unmappable_pitch_is_silence() {
        let mut machine = NoteStateMachine::default();
        let mut events = vec![];
        machine.on_pitch(440.0, 0.0, &mut events);
        machine.on_pitch(30000.0, 0.1, &mut events);
        assert_eq!(events.last(), Some(&NoteEvent::note_off(69, 0, 0.1)));
        assert_eq!(machine.sounding_note(), None);
    }
}
