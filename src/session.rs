//! The per-block pipeline: gate, estimate, smooth, emit note events.
//!
//! A [Session] owns all state that lives across blocks. It is driven by a
//! single caller: [Session::process_block] takes `&mut self`, so only one
//! block can be in flight at a time. Separate sessions share nothing.
use log::{debug, trace, warn};

use crate::clock::Clock;
use crate::config::{validate_stream, SessionConfig};
use crate::detector::yin::YINDetector;
use crate::detector::PitchDetector;
use crate::display::{DisplayReading, PitchDisplay};
use crate::error::{ConfigError, SinkError};
use crate::float::Float;
use crate::gate::{GateState, SignalGate};
use crate::note::{NoteEvent, NoteState, NoteStateMachine};
use crate::smoother::PitchSmoother;
use crate::sink::EventSink;

/// A block produces at most a note-off and a note-on.
const EVENTS_PER_BLOCK: usize = 2;

/// The result of processing one block.
#[derive(Debug)]
pub struct BlockOutput<'a> {
    /// Events emitted for this block, in delivery order.
    pub events: &'a [NoteEvent],
    pub gate: GateState,
    /// Smoothed frequency after this block, zero when there is no pitch.
    pub frequency: f64,
    /// Set when the sink failed to take this block's events. They are not resent.
    pub sink_error: Option<SinkError>,
}

pub struct Session<T, S>
where
    T: Float,
    S: EventSink,
{
    config: SessionConfig,
    sample_rate: f64,
    block_size: usize,
    gate: SignalGate<T>,
    detector: YINDetector<T>,
    smoother: PitchSmoother<T>,
    notes: NoteStateMachine,
    clock: Clock,
    events: Vec<NoteEvent>,
    sink: S,
    display: Option<Box<dyn PitchDisplay + Send>>,
    dropped_batches: u64,
}

impl<T, S> Session<T, S>
where
    T: Float,
    S: EventSink,
{
    /// Validate the configuration and stream parameters and allocate
    /// everything the per-block path needs.
    pub fn prepare(
        config: SessionConfig,
        sample_rate: f64,
        block_size: usize,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_stream(sample_rate, block_size)?;
        let silence_threshold = cast(config.silence_threshold)
            .ok_or(ConfigError::InvalidSilenceThreshold(config.silence_threshold))?;
        let yin_threshold = cast(config.yin_threshold)
            .ok_or(ConfigError::InvalidYinThreshold(config.yin_threshold))?;
        let smoothing =
            cast(config.smoothing).ok_or(ConfigError::InvalidSmoothing(config.smoothing))?;
        debug!(
            "preparing session: {} Hz, {} samples per block",
            sample_rate, block_size
        );

        Ok(Session {
            gate: SignalGate::new(silence_threshold),
            detector: YINDetector::with_threshold(block_size, yin_threshold),
            smoother: PitchSmoother::new(smoothing, config.change_threshold_cents),
            notes: NoteStateMachine::new(config.velocity, config.channel),
            clock: Clock::new(config.timebase, sample_rate),
            events: Vec::with_capacity(EVENTS_PER_BLOCK),
            sink,
            display: None,
            dropped_batches: 0,
            config,
            sample_rate,
            block_size,
        })
    }

    /// Start a new session on the same sink with new stream parameters. A
    /// sounding note is turned off first; all pitch and note state is reset.
    /// If the sink rejects that note-off it is logged and counted in
    /// [Session::dropped_batches], and the reset still succeeds.
    /// On error the session is left untouched.
    pub fn reset(&mut self, sample_rate: f64, block_size: usize) -> Result<(), ConfigError> {
        validate_stream(sample_rate, block_size)?;
        if let Err(err) = self.release() {
            warn!("note-off before reset was not delivered: {}", err);
        }

        if block_size != self.block_size {
            self.detector = YINDetector::with_threshold(block_size, self.detector.threshold());
        }
        self.smoother.reset();
        self.notes = NoteStateMachine::new(self.config.velocity, self.config.channel);
        self.clock = Clock::new(self.config.timebase, sample_rate);
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        debug!(
            "session reset: {} Hz, {} samples per block",
            sample_rate, block_size
        );
        Ok(())
    }

    /// Run one block through the pipeline. Never fails: estimator failures
    /// read as "no pitch" and sink failures are reported in the output.
    pub fn process_block(&mut self, samples: &[T]) -> BlockOutput<'_> {
        self.events.clear();
        let timestamp = self.clock.now();
        self.clock.advance(samples.len());
        if samples.len() > self.block_size {
            trace!(
                "block of {} samples exceeds {}, analysing the most recent ones",
                samples.len(),
                self.block_size
            );
        }

        let gate = self.gate.classify(samples);
        let estimate = match gate {
            GateState::Silent => None,
            GateState::Active => {
                let sample_rate = cast(self.sample_rate).unwrap_or_else(T::zero);
                match self.detector.try_get_pitch(samples, sample_rate) {
                    Ok(pitch) => Some(pitch),
                    Err(reason) => {
                        trace!("no pitch at {:.3} s: {}", timestamp, reason);
                        None
                    }
                }
            }
        };

        match estimate {
            Some(pitch) => {
                if let Some(frequency) = self.smoother.update(pitch.frequency) {
                    let frequency = frequency.to_f64().unwrap_or(0.0);
                    self.notes.on_pitch(frequency, timestamp, &mut self.events);
                }
            }
            None => {
                self.smoother.reset();
                self.notes.on_silence(timestamp, &mut self.events);
            }
        }

        let frequency = self.smoother.current().to_f64().unwrap_or(0.0);
        if let Some(display) = self.display.as_mut() {
            (**display).show(&DisplayReading::from_frequency(frequency));
        }

        let sink_error = self.flush();
        BlockOutput {
            events: &self.events,
            gate,
            frequency,
            sink_error,
        }
    }

    /// End the session: a sounding note is turned off and delivered. Calling
    /// this while silent does nothing. Also runs on drop.
    pub fn release(&mut self) -> Result<(), SinkError> {
        self.events.clear();
        let timestamp = self.clock.now();
        self.notes.on_silence(timestamp, &mut self.events);
        self.smoother.reset();
        match self.flush() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Attach a display, replacing and returning any previous one.
    pub fn attach_display(
        &mut self,
        display: Box<dyn PitchDisplay + Send>,
    ) -> Option<Box<dyn PitchDisplay + Send>> {
        self.display.replace(display)
    }

    pub fn detach_display(&mut self) -> Option<Box<dyn PitchDisplay + Send>> {
        self.display.take()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn note_state(&self) -> NoteState {
        self.notes.state()
    }

    /// Current smoothed frequency, zero when there is no pitch.
    pub fn smoothed_frequency(&self) -> T {
        self.smoother.current()
    }

    /// Number of event batches the sink failed to take.
    pub fn dropped_batches(&self) -> u64 {
        self.dropped_batches
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn flush(&mut self) -> Option<SinkError> {
        if self.events.is_empty() {
            return None;
        }
        match self.sink.deliver(&self.events) {
            Ok(()) => None,
            Err(err) => {
                self.dropped_batches += 1;
                warn!("dropping {} note event(s): {}", self.events.len(), err);
                Some(err)
            }
        }
    }
}

impl<T, S> Drop for Session<T, S>
where
    T: Float,
    S: EventSink,
{
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("final note-off was not delivered: {}", err);
        }
    }
}

fn cast<T: Float>(value: f64) -> Option<T> {
    T::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Timebase;
    use crate::sink::EventLog;
    use std::sync::{Arc, Mutex};

    const SAMPLE_RATE: f64 = 44100.0;
    const BLOCK: usize = 1024;

    fn tone(freq: f64, block: usize) -> Vec<f32> {
        (0..BLOCK)
            .map(|i| {
                let t = (block * BLOCK + i) as f64 / SAMPLE_RATE;
                (0.5 * (2.0 * std::f64::consts::PI * freq * t).sin()) as f32
            })
            .collect()
    }

    fn config() -> SessionConfig {
        SessionConfig::default().with_timebase(Timebase::Samples)
    }

    #[test]
    fn invalid_sample_rate_is_fatal() {
        let result = Session::<f32, _>::prepare(config(), -1.0, BLOCK, EventLog::new());
        assert!(matches!(result, Err(ConfigError::InvalidSampleRate(_))));
    }

    #[test]
    fn onset_and_release() {
        let mut log = EventLog::new();
        {
            let mut session =
                Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, &mut log).unwrap();
            let output = session.process_block(&tone(440.0, 0));
            assert_eq!(output.gate, GateState::Active);
            assert_eq!(output.events.len(), 1);
            assert_eq!(output.events[0].note, 69);
            assert!(output.sink_error.is_none());
            assert_eq!(session.note_state(), NoteState::Sounding(69));
        }
        // Dropping the session turns the note off.
        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_off());
        assert_eq!(events[1].note, 69);
    }

    #[test]
    fn release_is_idempotent() {
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        session.process_block(&tone(440.0, 0));
        session.release().unwrap();
        session.release().unwrap();
        assert_eq!(session.sink().events().len(), 2);
        assert_eq!(session.note_state(), NoteState::Silent);
    }

    #[test]
    fn sink_failure_does_not_stop_the_pipeline() {
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        session.sink_mut().set_available(false);
        let output = session.process_block(&tone(440.0, 0));
        assert_eq!(output.events.len(), 1);
        assert!(matches!(output.sink_error, Some(SinkError::Unavailable(_))));
        // The note is on internally even though the sink missed it.
        assert_eq!(session.note_state(), NoteState::Sounding(69));
        assert_eq!(session.dropped_batches(), 1);

        session.sink_mut().set_available(true);
        let output = session.process_block(&vec![0.0; BLOCK]);
        assert!(output.sink_error.is_none());
        // Only the note-off arrives; the missed note-on is not replayed.
        assert_eq!(session.sink().events().len(), 1);
        assert!(session.sink().events()[0].is_off());
    }

    #[test]
    fn display_gets_one_reading_per_block() {
        let readings = Arc::new(Mutex::new(Vec::new()));
        let shared = Arc::clone(&readings);
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        session.attach_display(Box::new(move |reading: &DisplayReading| {
            shared.lock().unwrap().push(reading.to_string());
        }));

        session.process_block(&vec![0.0; BLOCK]);
        session.process_block(&tone(440.0, 1));
        assert!(session.detach_display().is_some());
        session.process_block(&tone(440.0, 2));

        let readings = readings.lock().unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0], "N/A 0.00 Hz");
        assert!(readings[1].starts_with("A4 "));
    }

    #[test]
    fn reset_turns_note_off_and_clears_state() {
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        session.process_block(&tone(440.0, 0));
        session.reset(48000.0, 2048).unwrap();
        assert_eq!(session.note_state(), NoteState::Silent);
        assert_eq!(session.smoothed_frequency(), 0.0);
        assert_eq!(session.block_size(), 2048);
        assert_eq!(session.sink().events().len(), 2);

        assert!(session.reset(0.0, 2048).is_err());
        assert_eq!(session.sample_rate(), 48000.0);
    }

    #[test]
    fn reset_reports_an_undelivered_note_off() {
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        session.process_block(&tone(440.0, 0));
        session.sink_mut().set_available(false);
        assert_eq!(session.reset(SAMPLE_RATE, BLOCK), Ok(()));
        assert_eq!(session.dropped_batches(), 1);
        assert_eq!(session.note_state(), NoteState::Silent);
        // Only the note-on made it; the note-off was not queued for later.
        session.sink_mut().set_available(true);
        session.release().unwrap();
        assert_eq!(session.sink().events().len(), 1);
    }

    #[test]
    fn tiny_blocks_read_as_no_pitch() {
        let mut session =
            Session::<f32, _>::prepare(config(), SAMPLE_RATE, BLOCK, EventLog::new()).unwrap();
        let output = session.process_block(&[0.5, -0.5, 0.5]);
        assert_eq!(output.gate, GateState::Active);
        assert!(output.events.is_empty());
        assert_eq!(output.frequency, 0.0);
    }
}
