//! Audio output
//!
//! The client owns exactly one [`AudioElement`]. [`RodioPlayer`] decodes the
//! fetched song in memory and plays it through a `rodio` sink on the default
//! output device.

use std::io::{self, Cursor};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

/// A single audio output that plays one source at a time
pub trait AudioElement {
    /// Replace the current source with `bytes` (fetched from `url`); the new
    /// source starts paused
    fn load(&mut self, url: &str, bytes: Vec<u8>) -> io::Result<()>;

    /// Start or resume the loaded source; restarts it if it already ended
    fn play(&mut self) -> io::Result<()>;

    fn pause(&mut self) -> io::Result<()>;

    /// Stop and forget the loaded source
    fn stop(&mut self) -> io::Result<()>;

    /// True once after playback ran to completion
    fn has_ended(&mut self) -> bool;
}

type Source = Decoder<Cursor<Arc<[u8]>>>;

fn decode(bytes: Arc<[u8]>) -> io::Result<Source> {
    Decoder::new(Cursor::new(bytes)).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn output_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("Audio output error: {}", e))
}

/// Sink-backed player
///
/// Pause and resume keep the playback position. The decoded bytes are kept
/// so a finished song can be started again.
pub struct RodioPlayer {
    // Output stops when the stream is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source: Option<Arc<[u8]>>,
    end_reported: bool,
}

impl RodioPlayer {
    /// Open the default output device
    pub fn new() -> io::Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(output_error)?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            source: None,
            end_reported: false,
        })
    }

    fn append_source(&self, sink: &Sink) -> io::Result<()> {
        let bytes = self
            .source
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no source loaded"))?;
        sink.append(decode(bytes)?);
        Ok(())
    }
}

impl AudioElement for RodioPlayer {
    fn load(&mut self, url: &str, bytes: Vec<u8>) -> io::Result<()> {
        let bytes: Arc<[u8]> = bytes.into();
        // Reject undecodable data before touching the current song
        let source = decode(bytes.clone())?;

        let sink = Sink::try_new(&self.handle).map_err(output_error)?;
        sink.pause();
        sink.append(source);

        debug!(url, bytes = bytes.len(), "Loaded source");
        // Dropping the previous sink silences it
        self.sink = Some(sink);
        self.source = Some(bytes);
        self.end_reported = false;
        Ok(())
    }

    fn play(&mut self) -> io::Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no source loaded"))?;
        if sink.empty() {
            self.append_source(sink)?;
        }
        sink.play();
        self.end_reported = false;
        Ok(())
    }

    fn pause(&mut self) -> io::Result<()> {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.source = None;
        self.end_reported = false;
        Ok(())
    }

    fn has_ended(&mut self) -> bool {
        let ended = match &self.sink {
            Some(sink) => !sink.is_paused() && sink.empty(),
            None => false,
        };
        if ended && !self.end_reported {
            self.end_reported = true;
            true
        } else {
            false
        }
    }
}
