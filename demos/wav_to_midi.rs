//! Converts a mono or multichannel `.wav` file to note events and prints them.
//!
//! ```text
//! cargo run --example wav_to_midi -- input.wav [block_size]
//! cargo run --example wav_to_midi --features midi -- input.wav 1024 "MIDI port"
//! ```
use std::env;
use std::error::Error;

use audio_to_midi::clock::Timebase;
use audio_to_midi::config::SessionConfig;
use audio_to_midi::display::DisplayReading;
use audio_to_midi::session::Session;
use audio_to_midi::sink::{EventLog, EventSink};
use log::info;

const DEFAULT_BLOCK_SIZE: usize = 1024;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .ok_or("usage: wav_to_midi <input.wav> [block_size] [midi port]")?;
    let block_size = match args.get(2) {
        Some(size) => size.parse()?,
        None => DEFAULT_BLOCK_SIZE,
    };

    let (sample_rate, signal) = read_mono(path)?;
    info!(
        "read {} samples at {} Hz from {}",
        signal.len(),
        sample_rate,
        path
    );

    let sink = open_sink(args.get(3))?;
    let config = SessionConfig::default().with_timebase(Timebase::Samples);
    let mut session = Session::prepare(config, sample_rate as f64, block_size, sink)?;

    let mut last_reading = DisplayReading::unavailable();
    session.attach_display(Box::new(move |reading: &DisplayReading| {
        if *reading != last_reading {
            println!("  {}", reading);
            last_reading = *reading;
        }
    }));

    for block in signal.chunks(block_size) {
        let output = session.process_block(block);
        for event in output.events {
            println!(
                "{:>9.3} s  {:<4} note {:>3}  velocity {:>3}",
                event.timestamp,
                if event.is_on() { "on" } else { "off" },
                event.note,
                event.velocity()
            );
        }
    }
    session.release()?;

    if session.dropped_batches() > 0 {
        println!("{} event batch(es) were dropped", session.dropped_batches());
    }
    Ok(())
}

/// Read a wav file and average its channels into one normalized signal.
fn read_mono(path: &str) -> Result<(u32, Vec<f32>), Box<dyn Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok((spec.sample_rate, mono))
}

#[cfg(feature = "midi")]
fn open_sink(port: Option<&String>) -> Result<Box<dyn EventSink>, Box<dyn Error>> {
    use audio_to_midi::sink::midi::MidiPortSink;

    match port {
        Some(name) => Ok(Box::new(MidiPortSink::connect(name)?)),
        None => Ok(Box::new(EventLog::new())),
    }
}

#[cfg(not(feature = "midi"))]
fn open_sink(port: Option<&String>) -> Result<Box<dyn EventSink>, Box<dyn Error>> {
    if port.is_some() {
        return Err("built without the `midi` feature".into());
    }
    Ok(Box::new(EventLog::new()))
}
