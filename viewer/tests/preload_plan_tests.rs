use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use engine::preload::FnFetch;
use viewer::assets;
use viewer::preload_plan::{
    PRELOAD_START_DELAY, VIDEO_BATCH_DELAY, VIDEO_BATCH_SIZE, ViewerPreloader,
};

struct Harness {
    preloader: ViewerPreloader,
    issued: Rc<RefCell<Vec<String>>>,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        let t0 = Instant::now();
        Self {
            preloader: ViewerPreloader::new(t0),
            issued: Rc::new(RefCell::new(Vec::new())),
            t0,
        }
    }

    fn poll_at(&mut self, offset: Duration) {
        let issued = Rc::clone(&self.issued);
        let mut backend = FnFetch(move |path: &str| issued.borrow_mut().push(path.to_string()));
        self.preloader.poll(self.t0 + offset, &mut backend);
    }

    fn take_issued(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.issued.borrow_mut())
    }

    fn complete_all(&mut self, paths: &[String], ok: bool, offset: Duration) {
        for path in paths {
            self.preloader.mark_done(path, ok, self.t0 + offset);
        }
    }
}

#[test]
fn mount_issues_images_and_audio_immediately_but_no_videos() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);

    let issued = h.take_issued();
    assert_eq!(issued.len(), 32, "16 images + 16 ambient tracks");
    assert!(issued.iter().all(|p| !p.starts_with("transitions/")));
    for path in assets::all_room_images() {
        assert!(issued.contains(&path), "missing image {path}");
    }
    for path in assets::all_ambient_tracks() {
        assert!(issued.contains(&path), "missing track {path}");
    }
}

#[test]
fn videos_start_one_second_after_mount_in_batches_of_six() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);
    h.take_issued();

    h.poll_at(PRELOAD_START_DELAY - Duration::from_millis(1));
    assert!(h.take_issued().is_empty(), "start delay not elapsed yet");

    h.poll_at(PRELOAD_START_DELAY);
    let batch = h.take_issued();
    assert_eq!(batch.len(), VIDEO_BATCH_SIZE);
    assert!(batch.iter().all(|p| p.starts_with("transitions/")));
    assert_eq!(batch, assets::all_transition_videos()[..VIDEO_BATCH_SIZE].to_vec());
}

#[test]
fn the_full_video_plan_runs_in_six_batches() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);
    h.take_issued();

    let mut offset = PRELOAD_START_DELAY;
    let mut batch_sizes = Vec::new();
    for _ in 0..6 {
        h.poll_at(offset);
        let batch = h.take_issued();
        batch_sizes.push(batch.len());
        // A failure in the batch still counts toward completion.
        if let Some((first, rest)) = batch.split_first() {
            h.preloader.mark_done(first, false, h.t0 + offset);
            h.complete_all(&rest.to_vec(), true, offset);
        }
        offset += VIDEO_BATCH_DELAY;
    }

    assert_eq!(batch_sizes, vec![6, 6, 6, 6, 6, 2]);
    assert!(h.preloader.videos_ready());

    // Nothing more to issue afterwards.
    h.poll_at(offset + Duration::from_secs(60));
    assert!(h.take_issued().is_empty());
}

#[test]
fn batch_waits_for_stragglers_before_the_delay_starts() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);
    h.take_issued();

    h.poll_at(PRELOAD_START_DELAY);
    let batch = h.take_issued();

    // All but one complete; the next batch must not issue.
    h.complete_all(&batch[1..].to_vec(), true, PRELOAD_START_DELAY);
    h.poll_at(PRELOAD_START_DELAY + Duration::from_secs(30));
    assert!(h.take_issued().is_empty(), "straggler still outstanding");

    // Straggler lands; the delay counts from now.
    let straggler_done = Duration::from_secs(31);
    h.preloader.mark_done(&batch[0], true, h.t0 + straggler_done);
    h.poll_at(straggler_done + VIDEO_BATCH_DELAY - Duration::from_millis(1));
    assert!(h.take_issued().is_empty());
    h.poll_at(straggler_done + VIDEO_BATCH_DELAY);
    assert_eq!(h.take_issued().len(), VIDEO_BATCH_SIZE);
}

#[test]
fn images_ready_latches_only_when_all_sixteen_arrive() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);

    let images = assets::all_room_images();
    h.complete_all(&images[1..].to_vec(), true, Duration::ZERO);
    assert!(!h.preloader.images_ready(), "one image still missing");

    h.preloader.mark_done(&images[0], true, h.t0);
    assert!(h.preloader.images_ready());
}

#[test]
fn a_failed_image_blocks_readiness_silently() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);

    let images = assets::all_room_images();
    h.preloader.mark_done(&images[0], false, h.t0);
    h.complete_all(&images[1..].to_vec(), true, Duration::ZERO);
    assert!(!h.preloader.images_ready());
}

#[test]
fn audio_completions_are_fire_and_forget() {
    let mut h = Harness::new();
    h.poll_at(Duration::ZERO);

    for track in assets::all_ambient_tracks() {
        h.preloader.mark_done(&track, false, h.t0);
    }
    // No readiness flag involves audio; the plan is unaffected.
    assert!(!h.preloader.videos_ready());
    h.poll_at(PRELOAD_START_DELAY);
    assert!(!h.take_issued().is_empty());
}
