//! # Audio to MIDI
//! *audio_to_midi* turns a monophonic audio stream into MIDI-style note events
//! in real time. Each incoming block goes through four stages:
//!
//!   * an RMS [gate][gate::SignalGate] that tells silence from sound,
//!   * the [YIN pitch estimator][detector::yin::YINDetector],
//!   * a [smoother][smoother::PitchSmoother] that low-pass filters the estimates and
//!     only reports meaningful pitch changes,
//!   * a [note state machine][note::NoteStateMachine] that emits note-off/note-on
//!     transitions, never more than one note at a time.
//!
//! Events go to an [EventSink][sink::EventSink]; the current note and frequency can be
//! shown on an optional [PitchDisplay][display::PitchDisplay]. A [Session][session::Session]
//! owns all of it.
//!
//! The per-block path does not allocate, lock, or block once a session is prepared.
//! It takes `&mut self`, so a session is only ever driven by one caller at a time.
//!
//! # Examples
//! ```
//! use audio_to_midi::clock::Timebase;
//! use audio_to_midi::config::SessionConfig;
//! use audio_to_midi::session::Session;
//! use audio_to_midi::sink::EventLog;
//!
//! const SAMPLE_RATE: f64 = 44100.0;
//! const BLOCK_SIZE: usize = 1024;
//!
//! let config = SessionConfig::default().with_timebase(Timebase::Samples);
//! let mut events = EventLog::new();
//! {
//!     let mut session = Session::<f32, _>::prepare(config, SAMPLE_RATE, BLOCK_SIZE, &mut events).unwrap();
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     for block in 0..10 {
//!         let samples: Vec<f32> = (0..BLOCK_SIZE)
//!             .map(|i| {
//!                 let t = (block * BLOCK_SIZE + i) as f64 / SAMPLE_RATE;
//!                 (0.5 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()) as f32
//!             })
//!             .collect();
//!         session.process_block(&samples);
//!     }
//!     session.process_block(&[0.0; BLOCK_SIZE]);
//! }
//!
//! let notes: Vec<_> = events.events().iter().map(|e| (e.is_on(), e.note)).collect();
//! assert_eq!(notes, vec![(true, 69), (false, 69)]);
//! ```

pub use detector::internals::Pitch;
pub use error::{ConfigError, EstimateError, SinkError};

pub mod clock;
pub mod config;
pub mod detector;
pub mod display;
pub mod error;
pub mod float;
pub mod gate;
pub mod note;
pub mod session;
pub mod sink;
pub mod smoother;
pub mod utils;
