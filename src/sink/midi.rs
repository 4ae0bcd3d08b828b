//! Delivers note events to an OS MIDI output port through `midir`.
use log::{debug, info};
use midir::{MidiOutput, MidiOutputConnection};

use crate::error::SinkError;
use crate::note::NoteEvent;
use crate::sink::EventSink;

const CLIENT_NAME: &str = "audio-to-midi";

pub struct MidiPortSink {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidiPortSink {
    /// List the names of all available MIDI output ports.
    pub fn list_ports() -> Result<Vec<String>, SinkError> {
        let midi_out = open_client()?;
        Ok(midi_out
            .ports()
            .iter()
            .filter_map(|port| midi_out.port_name(port).ok())
            .collect())
    }

    /// Connect to the output port called `port_name`.
    pub fn connect(port_name: &str) -> Result<Self, SinkError> {
        let midi_out = open_client()?;
        let port = midi_out
            .ports()
            .into_iter()
            .find(|port| {
                midi_out
                    .port_name(port)
                    .map(|name| name == port_name)
                    .unwrap_or(false)
            })
            .ok_or_else(|| SinkError::Unavailable(format!("MIDI port '{}' not found", port_name)))?;

        let connection = midi_out
            .connect(&port, "audio-to-midi-output")
            .map_err(|err| SinkError::Unavailable(format!("failed to connect: {}", err)))?;
        info!("connected to MIDI port '{}'", port_name);

        Ok(MidiPortSink {
            connection,
            port_name: port_name.to_string(),
        })
    }

    /// Create a virtual output port that other applications can read from.
    #[cfg(unix)]
    pub fn create_virtual(port_name: &str) -> Result<Self, SinkError> {
        use midir::os::unix::VirtualOutput;

        let connection = open_client()?
            .create_virtual(port_name)
            .map_err(|err| SinkError::Unavailable(format!("failed to create port: {}", err)))?;
        info!("created virtual MIDI port '{}'", port_name);

        Ok(MidiPortSink {
            connection,
            port_name: port_name.to_string(),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl EventSink for MidiPortSink {
    fn deliver(&mut self, events: &[NoteEvent]) -> Result<(), SinkError> {
        for event in events {
            debug!("sending {:?} to '{}'", event, self.port_name);
            self.connection
                .send(&event.to_midi_bytes())
                .map_err(|err| SinkError::Rejected(err.to_string()))?;
        }
        Ok(())
    }
}

fn open_client() -> Result<MidiOutput, SinkError> {
    MidiOutput::new(CLIENT_NAME)
        .map_err(|err| SinkError::Unavailable(format!("failed to create MIDI client: {}", err)))
}
