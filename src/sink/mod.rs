//! Delivery of note events to an external transport.
//!
//! The session hands every non-empty batch of events to an [EventSink]. A
//! failed delivery is reported but never retried: the batch is dropped and the
//! session keeps going with its internal note state intact.
use crate::error::SinkError;
use crate::note::NoteEvent;

#[cfg(feature = "midi")]
pub mod midi;

pub trait EventSink {
    /// Deliver `events` in order.
    fn deliver(&mut self, events: &[NoteEvent]) -> Result<(), SinkError>;
}

impl<S> EventSink for &mut S
where
    S: EventSink + ?Sized,
{
    fn deliver(&mut self, events: &[NoteEvent]) -> Result<(), SinkError> {
        (**self).deliver(events)
    }
}

impl<S> EventSink for Box<S>
where
    S: EventSink + ?Sized,
{
    fn deliver(&mut self, events: &[NoteEvent]) -> Result<(), SinkError> {
        (**self).deliver(events)
    }
}

/// Records every delivered event in memory. Useful for offline rendering and
/// tests; unlike a port sink it grows without bound.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<NoteEvent>,
    available: bool,
    rejected_batches: usize,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            events: Vec::new(),
            available: true,
            rejected_batches: 0,
        }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// While unavailable, every delivery fails with [SinkError::Unavailable].
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn rejected_batches(&self) -> usize {
        self.rejected_batches
    }
}

impl Default for EventLog {
    fn default() -> Self {
        EventLog::new()
    }
}

impl EventSink for EventLog {
    fn deliver(&mut self, events: &[NoteEvent]) -> Result<(), SinkError> {
        if !self.available {
            self.rejected_batches += 1;
            return Err(SinkError::Unavailable("event log is switched off".into()));
        }
        self.events.extend_from_slice(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_in_order() {
        let mut log = EventLog::new();
        let batch = [
            NoteEvent::note_off(60, 0, 1.0),
            NoteEvent::note_on(62, 127, 0, 1.0),
        ];
        log.deliver(&batch).unwrap();
        assert_eq!(log.events(), &batch);
    }

    #[test]
    fn unavailable_log_drops_batches() {
        let mut log = EventLog::new();
        log.set_available(false);
        let result = log.deliver(&[NoteEvent::note_on(60, 127, 0, 0.0)]);
        assert!(matches!(result, Err(SinkError::Unavailable(_))));
        assert!(log.events().is_empty());
        assert_eq!(log.rejected_batches(), 1);

        log.set_available(true);
        log.deliver(&[NoteEvent::note_off(60, 0, 0.1)]).unwrap();
        assert_eq!(log.events().len(), 1);
    }

    fn deliver_one<S: EventSink>(mut sink: S, event: NoteEvent) -> Result<(), SinkError> {
        sink.deliver(&[event])
    }

    #[test]
    fn borrowed_and_boxed_sinks_forward() {
        let mut log = EventLog::new();
        deliver_one(&mut log, NoteEvent::note_on(60, 1, 0, 0.0)).unwrap();
        assert_eq!(log.events().len(), 1);

        let boxed: Box<dyn EventSink> = Box::new(EventLog::new());
        deliver_one(boxed, NoteEvent::note_off(60, 0, 0.0)).unwrap();

        log.set_available(false);
        assert!(deliver_one(&mut log, NoteEvent::note_off(60, 0, 0.0)).is_err());
    }
}
