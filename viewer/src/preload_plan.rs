//! The viewer's asset-warming plan.
//!
//! Three phases, all funneled through one [`FetchBackend`]:
//! - room images: all 16 at mount, with a readiness latch once every one
//!   has arrived;
//! - ambient tracks: all 16 at mount, fire-and-forget;
//! - transition videos: 32 large files in batches of 6, two seconds apart,
//!   starting a second after mount so the images get the wire first.
//!
//! Dropping the preloader cancels everything not yet issued.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use engine::preload::{BatchConfig, BatchPreloader, FetchBackend};

use crate::assets;

pub const PRELOAD_START_DELAY: Duration = Duration::from_millis(1000);
pub const VIDEO_BATCH_SIZE: usize = 6;
pub const VIDEO_BATCH_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug)]
pub struct ViewerPreloader {
    image_paths: Vec<String>,
    images_done: HashSet<String>,
    images_ready: bool,
    immediates_issued: bool,
    videos: BatchPreloader,
}

impl ViewerPreloader {
    /// `now` is the mount instant; the video phase is timed from it.
    pub fn new(now: Instant) -> Self {
        Self {
            image_paths: assets::all_room_images(),
            images_done: HashSet::new(),
            images_ready: false,
            immediates_issued: false,
            videos: BatchPreloader::new(
                assets::all_transition_videos(),
                BatchConfig {
                    batch_size: VIDEO_BATCH_SIZE,
                    batch_delay: VIDEO_BATCH_DELAY,
                    start_delay: PRELOAD_START_DELAY,
                },
                now,
            ),
        }
    }

    /// Issues whatever is due. Call once per tick.
    pub fn poll(&mut self, now: Instant, backend: &mut impl FetchBackend) {
        if !self.immediates_issued {
            self.immediates_issued = true;
            for path in &self.image_paths {
                backend.begin(path);
            }
            for path in assets::all_ambient_tracks() {
                backend.begin(&path);
            }
        }
        for path in self.videos.poll(now) {
            backend.begin(&path);
        }
    }

    /// Records a fetch completion for any phase.
    ///
    /// Image failures are tolerated silently but keep `images_ready` from
    /// ever latching; audio completions are ignored entirely.
    pub fn mark_done(&mut self, path: &str, ok: bool, now: Instant) {
        if self.image_paths.iter().any(|p| p == path) {
            if ok && self.images_done.insert(path.to_string()) {
                self.images_ready = self.images_done.len() == self.image_paths.len();
            }
            return;
        }
        self.videos.mark_done(path, ok, now);
    }

    /// All 16 room images have arrived.
    pub fn images_ready(&self) -> bool {
        self.images_ready
    }

    /// Every video batch has been issued and completed.
    pub fn videos_ready(&self) -> bool {
        self.videos.is_finished()
    }
}
