//! Binds the view state machine to concrete media elements.
//!
//! The controller owns one video element per presentation (desktop and
//! mobile share the machine, not the element), the ambient audio element,
//! and the `ViewerState` itself. User intents and polled media events both
//! funnel through [`PlaybackController::apply`]/[`pump`], which run the
//! machine's commands against whichever element is active.

use engine::media::{AudioElement, MediaEvent, VideoElement};

use crate::ambient;
use crate::layout;
use crate::state::{ViewerCommand, ViewerEvent, ViewerState};

/// Which presentation's video element drives the current transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSurface {
    Desktop,
    Mobile,
}

pub struct PlaybackController<V: VideoElement, A: AudioElement> {
    state: ViewerState,
    desktop: V,
    mobile: V,
    audio: A,
    active: ActiveSurface,
    mobile_breakpoint: u32,
}

impl<V: VideoElement, A: AudioElement> PlaybackController<V, A> {
    pub fn new(state: ViewerState, desktop: V, mobile: V, audio: A) -> Self {
        Self {
            state,
            desktop,
            mobile,
            audio,
            active: ActiveSurface::Desktop,
            mobile_breakpoint: layout::MOBILE_BREAKPOINT,
        }
    }

    pub fn with_mobile_breakpoint(mut self, width: u32) -> Self {
        self.mobile_breakpoint = width.max(1);
        self
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn active(&self) -> ActiveSurface {
        self.active
    }

    pub fn desktop(&self) -> &V {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut V {
        &mut self.desktop
    }

    pub fn mobile(&self) -> &V {
        &self.mobile
    }

    pub fn mobile_mut(&mut self) -> &mut V {
        &mut self.mobile
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Applies a user intent.
    ///
    /// Navigation picks the driving element from the viewport width at the
    /// moment the transition starts; it stays picked until the transition
    /// resolves, however the window is resized meanwhile.
    pub fn apply(&mut self, event: ViewerEvent, viewport_width: u32) {
        let starts_navigation =
            matches!(event, ViewerEvent::NextRoom | ViewerEvent::PrevRoom);
        if starts_navigation && !self.state.is_transitioning() {
            self.active = if viewport_width < self.mobile_breakpoint {
                ActiveSurface::Mobile
            } else {
                ActiveSurface::Desktop
            };
        }
        let commands = self.state.handle(event);
        self.run(commands);
    }

    /// Drains media-element events into the state machine.
    ///
    /// Only the active element feeds the machine; events from the inactive
    /// one are dropped so a stale `Ended` cannot close a fresh transition.
    pub fn pump(&mut self) {
        let events = match self.active {
            ActiveSurface::Desktop => {
                self.mobile.poll_events();
                self.desktop.poll_events()
            }
            ActiveSurface::Mobile => {
                self.desktop.poll_events();
                self.mobile.poll_events()
            }
        };
        for event in events {
            let commands = self.state.handle(viewer_event(event));
            self.run(commands);
        }
    }

    fn active_video(&mut self) -> &mut V {
        match self.active {
            ActiveSurface::Desktop => &mut self.desktop,
            ActiveSurface::Mobile => &mut self.mobile,
        }
    }

    fn run(&mut self, commands: Vec<ViewerCommand>) {
        for command in commands {
            match command {
                ViewerCommand::LoadVideo { path } => {
                    let video = self.active_video();
                    video.rewind();
                    video.set_source(&path);
                    video.load();
                }
                ViewerCommand::PlayVideo => self.active_video().play(),
                ViewerCommand::PlayAmbient { path, volume } => {
                    if let Err(err) = ambient::start(&mut self.audio, &path, volume) {
                        // The toggle stays on; the next state change retries.
                        eprintln!("warning: ambient playback failed: {err}");
                    }
                }
                ViewerCommand::StopAmbient => ambient::stop(&mut self.audio),
                ViewerCommand::ReportFailure { error } => {
                    eprintln!("warning: transition aborted: {error}");
                }
            }
        }
    }
}

fn viewer_event(event: MediaEvent) -> ViewerEvent {
    match event {
        MediaEvent::Loaded => ViewerEvent::VideoLoaded,
        MediaEvent::LoadFailed => ViewerEvent::VideoLoadFailed,
        MediaEvent::Started => ViewerEvent::VideoStarted,
        MediaEvent::StartFailed => ViewerEvent::VideoStartFailed,
        MediaEvent::Ended => ViewerEvent::VideoEnded,
    }
}
