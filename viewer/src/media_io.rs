//! File- and device-backed media implementations.
//!
//! These are the headful counterparts of the `engine::media` traits:
//! `FsVideo` resolves sources against the asset root on disk, `RodioAudio`
//! plays ambient tracks through the default output device, `FsFetch` warms
//! the OS page cache from worker threads, and `ImageCache` decodes room
//! photos on first use.
//!
//! The workspace ships no video codec, so `FsVideo` validates and times the
//! transition instead of decoding frames: load checks the real file, play
//! holds the overlay for a configured duration, then reports `Ended`. The
//! state machine sees exactly the event sequence a decoding element would
//! produce.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use engine::graphics::RgbaImage;
use engine::media::{AudioElement, MediaError, MediaEvent, VideoElement};
use engine::preload::FetchBackend;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

// ── Video ───────────────────────────────────────────────────────────

pub struct FsVideo {
    root: PathBuf,
    hold: Duration,
    source: Option<String>,
    loaded: bool,
    ends_at: Option<Instant>,
    pending: Vec<MediaEvent>,
}

impl FsVideo {
    /// `hold` is how long a clip "plays" before reporting `Ended`.
    pub fn new(root: impl Into<PathBuf>, hold: Duration) -> Self {
        Self {
            root: root.into(),
            hold,
            source: None,
            loaded: false,
            ends_at: None,
            pending: Vec::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ends_at.is_some()
    }

    fn source_ok(&self) -> bool {
        let Some(source) = self.source.as_deref() else {
            return false;
        };
        fs::metadata(self.root.join(source))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }
}

impl VideoElement for FsVideo {
    fn set_source(&mut self, path: &str) {
        self.source = Some(path.to_string());
        self.loaded = false;
        self.ends_at = None;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn rewind(&mut self) {
        self.ends_at = None;
    }

    fn load(&mut self) {
        if self.source_ok() {
            self.loaded = true;
            self.pending.push(MediaEvent::Loaded);
        } else {
            self.loaded = false;
            self.pending.push(MediaEvent::LoadFailed);
        }
    }

    fn play(&mut self) {
        if self.loaded {
            self.ends_at = Some(Instant::now() + self.hold);
            self.pending.push(MediaEvent::Started);
        } else {
            self.pending.push(MediaEvent::StartFailed);
        }
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if let Some(ends_at) = self.ends_at {
            if Instant::now() >= ends_at {
                self.ends_at = None;
                self.pending.push(MediaEvent::Ended);
            }
        }
        std::mem::take(&mut self.pending)
    }
}

// ── Audio ───────────────────────────────────────────────────────────

/// Ambient playback through rodio.
///
/// The sink is rebuilt on every `play`, which doubles as the position
/// reset: a source or panel swap always restarts the track from zero.
pub struct RodioAudio {
    root: PathBuf,
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source: Option<String>,
    looping: bool,
    volume: f32,
}

impl RodioAudio {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| MediaError::Output(e.to_string()))?;
        Ok(Self {
            root: root.into(),
            _stream: stream,
            handle,
            sink: None,
            source: None,
            looping: false,
            volume: 1.0,
        })
    }

    fn stop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl AudioElement for RodioAudio {
    fn set_source(&mut self, path: &str) {
        self.stop_sink();
        self.source = Some(path.to_string());
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume);
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let source = self.source.clone().ok_or(MediaError::MissingSource)?;
        let path = self.root.join(&source);
        let bytes = fs::read(&path)
            .map_err(|e| MediaError::Unavailable(format!("{}: {e}", path.display())))?;
        let decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| MediaError::Decode(format!("{source}: {e}")))?;

        self.stop_sink();
        let sink = Sink::try_new(&self.handle).map_err(|e| MediaError::Output(e.to_string()))?;
        sink.set_volume(self.volume);
        if self.looping {
            sink.append(decoder.repeat_infinite());
        } else {
            sink.append(decoder);
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn rewind(&mut self) {
        // Position resets when the sink is rebuilt on the next play.
        self.stop_sink();
    }
}

// ── Cache warming ───────────────────────────────────────────────────

/// Preload backend that reads files on detached worker threads.
///
/// Reading pulls the bytes through the OS page cache, which is all the
/// warming the media elements need. Completions queue up on a channel and
/// are drained by the UI thread each frame.
pub struct FsFetch {
    root: PathBuf,
    tx: mpsc::Sender<(String, bool)>,
    rx: mpsc::Receiver<(String, bool)>,
}

impl FsFetch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx,
        }
    }

    /// Completions received since the last drain, as `(path, ok)` pairs.
    pub fn drain_completions(&mut self) -> Vec<(String, bool)> {
        let mut done = Vec::new();
        while let Ok(entry) = self.rx.try_recv() {
            done.push(entry);
        }
        done
    }
}

impl FetchBackend for FsFetch {
    fn begin(&mut self, path: &str) {
        let full = self.root.join(path);
        let relative = path.to_string();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let ok = fs::read(&full).map(|bytes| !bytes.is_empty()).unwrap_or(false);
            let _ = tx.send((relative, ok));
        });
    }
}

// ── Image decoding ──────────────────────────────────────────────────

/// Decoded room photos, keyed by their relative asset path.
///
/// Decoding happens lazily on first request; failures are cached as `None`
/// so a missing file is only probed once.
pub struct ImageCache {
    root: PathBuf,
    entries: HashMap<String, Option<RgbaImage>>,
}

impl ImageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    /// Decodes `path` if it has not been probed yet.
    pub fn ensure(&mut self, path: &str) {
        if !self.entries.contains_key(path) {
            let decoded = decode_image(&self.root.join(path));
            self.entries.insert(path.to_string(), decoded);
        }
    }

    /// The decoded image, if `ensure` found one.
    pub fn get(&self, path: &str) -> Option<&RgbaImage> {
        self.entries.get(path).and_then(|entry| entry.as_ref())
    }
}

fn decode_image(path: &std::path::Path) -> Option<RgbaImage> {
    let bytes = fs::read(path).ok()?;
    // Sniff the format from the bytes, not the extension.
    let decoded = image::load_from_memory(&bytes).ok()?;
    let rgba = decoded.to_rgba8();
    RgbaImage::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("viewer_media_io_{tag}"));
        fs::create_dir_all(&dir).expect("create temp asset root");
        dir
    }

    #[test]
    fn fs_video_load_fails_for_missing_files() {
        let mut video = FsVideo::new(temp_root("missing"), Duration::ZERO);
        video.set_source("transitions/absent.mp4");
        video.load();
        assert_eq!(video.poll_events(), vec![MediaEvent::LoadFailed]);

        video.play();
        assert_eq!(video.poll_events(), vec![MediaEvent::StartFailed]);
    }

    #[test]
    fn fs_video_plays_real_files_and_ends_after_hold() {
        let root = temp_root("plays");
        fs::create_dir_all(root.join("transitions")).expect("create transitions dir");
        fs::write(root.join("transitions/clip.mp4"), b"not really mp4").expect("write clip");

        let mut video = FsVideo::new(&root, Duration::ZERO);
        video.set_source("transitions/clip.mp4");
        video.load();
        assert_eq!(video.poll_events(), vec![MediaEvent::Loaded]);

        video.play();
        // Zero hold: Started and Ended arrive on the same poll.
        assert_eq!(
            video.poll_events(),
            vec![MediaEvent::Started, MediaEvent::Ended]
        );
        assert!(!video.is_playing());
    }

    #[test]
    fn fs_video_rejects_empty_files() {
        let root = temp_root("empty");
        fs::create_dir_all(root.join("transitions")).expect("create transitions dir");
        fs::write(root.join("transitions/empty.mp4"), b"").expect("write empty clip");

        let mut video = FsVideo::new(&root, Duration::ZERO);
        video.set_source("transitions/empty.mp4");
        video.load();
        assert_eq!(video.poll_events(), vec![MediaEvent::LoadFailed]);
    }

    #[test]
    fn fs_fetch_reports_success_and_failure() {
        let root = temp_root("fetch");
        fs::write(root.join("present.bin"), b"data").expect("write present file");

        let mut fetch = FsFetch::new(&root);
        fetch.begin("present.bin");
        fetch.begin("absent.bin");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut done = Vec::new();
        while done.len() < 2 && Instant::now() < deadline {
            done.extend(fetch.drain_completions());
            thread::sleep(Duration::from_millis(5));
        }
        done.sort();
        assert_eq!(
            done,
            vec![
                ("absent.bin".to_string(), false),
                ("present.bin".to_string(), true)
            ]
        );
    }

    #[test]
    fn image_cache_decodes_by_content_and_caches_misses() {
        let root = temp_root("images");
        fs::create_dir_all(root.join("rooms")).expect("create rooms dir");

        // A 2x1 PNG stored under a .jpg name; decoding sniffs the content.
        let path = root.join("rooms/Office.jpg");
        let file = fs::File::create(&path).expect("create png fixture");
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        writer
            .write_image_data(&[255, 0, 0, 255, 0, 255, 0, 255])
            .expect("png data");
        writer.finish().expect("png finish");

        let mut cache = ImageCache::new(&root);
        cache.ensure("rooms/Office.jpg");
        let image = cache.get("rooms/Office.jpg").expect("fixture decodes");
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(&image.data()[0..4], &[255, 0, 0, 255]);

        cache.ensure("rooms/Absent.jpg");
        cache.ensure("rooms/Absent.jpg");
        assert!(cache.get("rooms/Absent.jpg").is_none(), "miss is cached");
    }
}
