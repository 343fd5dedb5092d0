//! rodio-backed sound player.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::embedded::chime_sources;
use super::error::SoundError;
use super::source::SoundSource;

/// Plays sounds through the default audio output.
///
/// Playback is detached: `play` returns as soon as the sound is queued.
/// The output stream is not `Send`, so the player lives on the thread that
/// created it.
pub struct RodioSoundPlayer {
    /// Keeps the output device open.
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if there is no output device.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("audio output opened");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound, falling back to the chime if the file is unusable.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the chime could be queued.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::System { name, path } => match self.play_file(path) {
                Ok(()) => {
                    debug!(sound = %name, "playing system sound");
                    Ok(())
                }
                Err(e) if e.should_fallback_to_chime() => {
                    warn!(sound = %name, error = %e, "system sound unusable, playing chime");
                    self.play_chime()
                }
                Err(e) => Err(e),
            },
            SoundSource::Embedded { name } => {
                debug!(sound = %name, "playing built-in chime");
                self.play_chime()
            }
        }
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {e}", path.display())))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_chime(&self) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        for note in chime_sources() {
            sink.append(note);
        }
        sink.detach();
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
