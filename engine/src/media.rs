//! Media element seam.
//!
//! Playback controllers are written against these traits so the same state
//! machines run over real file/device-backed elements in the headful binary
//! and over scripted elements under test. Elements report progress through
//! polled events rather than callbacks: the owning widget drains them once
//! per frame on its own thread.

use std::collections::HashMap;
use std::fmt;

/// Progress reported by a video element, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// Enough data is buffered to start playback.
    Loaded,
    /// The source could not be fetched or decoded.
    LoadFailed,
    /// Playback actually started.
    Started,
    /// Playback was requested but could not start.
    StartFailed,
    /// Playback reached the natural end of the clip.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Play was requested before any source was assigned.
    MissingSource,
    /// The assigned source does not exist or could not be read.
    Unavailable(String),
    /// The audio output device rejected the request.
    Output(String),
    /// The source bytes could not be decoded.
    Decode(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::MissingSource => write!(f, "no media source assigned"),
            MediaError::Unavailable(msg) => write!(f, "media source unavailable: {msg}"),
            MediaError::Output(msg) => write!(f, "audio output error: {msg}"),
            MediaError::Decode(msg) => write!(f, "media decode error: {msg}"),
        }
    }
}

impl std::error::Error for MediaError {}

/// A one-shot video element: assign a source, load it, play it once.
pub trait VideoElement {
    fn set_source(&mut self, path: &str);
    fn source(&self) -> Option<&str>;

    /// Resets the playback position to the start of the current source.
    fn rewind(&mut self);

    /// Begins fetching/decoding the current source; completion arrives as
    /// `Loaded` or `LoadFailed`.
    fn load(&mut self);

    /// Requests playback; the outcome arrives as `Started` or `StartFailed`,
    /// and `Ended` follows when the clip finishes.
    fn play(&mut self);

    /// Drains events accumulated since the last poll, oldest first.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

/// A looping-capable audio element for ambient playback.
pub trait AudioElement {
    /// Assigns a source, resetting the playback position to the start.
    fn set_source(&mut self, path: &str);
    fn set_looping(&mut self, looping: bool);
    /// Volume in `0.0..=1.0`; implementations clamp.
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    /// Resets the playback position to the start.
    fn rewind(&mut self);
}

// ── Scripted elements (headless execution and tests) ────────────────

/// Per-source outcome for `ScriptedVideo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedOutcome {
    pub load_ok: bool,
    pub play_ok: bool,
}

impl Default for ScriptedOutcome {
    fn default() -> Self {
        Self {
            load_ok: true,
            play_ok: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoCall {
    SetSource(String),
    Rewind,
    Load,
    Play,
}

/// A video element whose load/play outcomes are scripted per source path.
///
/// Events become visible on the next `poll_events`, mirroring how a real
/// element completes asynchronously rather than inside the `load()` call.
#[derive(Debug, Default)]
pub struct ScriptedVideo {
    outcomes: HashMap<String, ScriptedOutcome>,
    source: Option<String>,
    loaded: bool,
    playing: bool,
    pending: Vec<MediaEvent>,
    calls: Vec<VideoCall>,
}

impl ScriptedVideo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome for `path`; unscripted paths load and play fine.
    pub fn script(mut self, path: &str, outcome: ScriptedOutcome) -> Self {
        self.outcomes.insert(path.to_string(), outcome);
        self
    }

    fn outcome(&self, path: &str) -> ScriptedOutcome {
        self.outcomes.get(path).copied().unwrap_or_default()
    }

    /// Simulates the clip reaching its natural end.
    pub fn finish_playback(&mut self) {
        if self.playing {
            self.playing = false;
            self.pending.push(MediaEvent::Ended);
        }
    }

    pub fn calls(&self) -> &[VideoCall] {
        &self.calls
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, VideoCall::Load))
            .count()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl VideoElement for ScriptedVideo {
    fn set_source(&mut self, path: &str) {
        self.calls.push(VideoCall::SetSource(path.to_string()));
        self.source = Some(path.to_string());
        self.loaded = false;
        self.playing = false;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn rewind(&mut self) {
        self.calls.push(VideoCall::Rewind);
    }

    fn load(&mut self) {
        self.calls.push(VideoCall::Load);
        let event = match self.source.as_deref() {
            Some(path) if self.outcome(path).load_ok => {
                self.loaded = true;
                MediaEvent::Loaded
            }
            _ => MediaEvent::LoadFailed,
        };
        self.pending.push(event);
    }

    fn play(&mut self) {
        self.calls.push(VideoCall::Play);
        let ok = self.loaded
            && self
                .source
                .as_deref()
                .map(|path| self.outcome(path).play_ok)
                .unwrap_or(false);
        if ok {
            self.playing = true;
            self.pending.push(MediaEvent::Started);
        } else {
            self.pending.push(MediaEvent::StartFailed);
        }
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    SetSource(String),
    SetLooping(bool),
    SetVolume(f32),
    Play,
    Pause,
    Rewind,
}

/// An audio element that records every call, for asserting ambient behavior.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    source: Option<String>,
    looping: bool,
    volume: f32,
    playing: bool,
    fail_play: bool,
    calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `play()` fail, e.g. a missing output device.
    pub fn failing() -> Self {
        Self {
            fail_play: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[AudioCall] {
        &self.calls
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioElement for RecordingAudio {
    fn set_source(&mut self, path: &str) {
        self.calls.push(AudioCall::SetSource(path.to_string()));
        self.source = Some(path.to_string());
    }

    fn set_looping(&mut self, looping: bool) {
        self.calls.push(AudioCall::SetLooping(looping));
        self.looping = looping;
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.calls.push(AudioCall::SetVolume(volume));
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.calls.push(AudioCall::Play);
        if self.source.is_none() {
            return Err(MediaError::MissingSource);
        }
        if self.fail_play {
            return Err(MediaError::Output("playback rejected".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(AudioCall::Pause);
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.calls.push(AudioCall::Rewind);
    }
}
