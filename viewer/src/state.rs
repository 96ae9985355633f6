use serde::{Deserialize, Serialize};

use crate::ambient::AMBIENT_VOLUME;
use crate::assets::{self, AssetError};
use crate::room::{PanelConfig, Room};

/// Where the room-switch machinery currently is.
///
/// `Loading` holds the room the viewer is heading to; the index only commits
/// once footage actually starts playing, so a failed load leaves the viewer
/// exactly where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionPhase {
    Idle,
    Loading { target: Room },
    Playing,
}

/// Everything that can happen to the widget: user intents and media-element
/// progress, queued and applied one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    NextRoom,
    PrevRoom,
    ToggleWalls,
    ToggleCeiling,
    ToggleAmbient,
    VideoLoaded,
    VideoLoadFailed,
    VideoStarted,
    VideoStartFailed,
    VideoEnded,
}

/// Side effects requested by the state machine, to be applied to the
/// active media elements by whoever owns them.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    /// Rewind the video element, assign `path`, and begin loading.
    LoadVideo { path: String },
    /// Start playback of the already-loaded video.
    PlayVideo,
    /// Loop `path` on the ambient element at `volume`, from the start.
    PlayAmbient { path: String, volume: f32 },
    /// Pause the ambient element and rewind it.
    StopAmbient,
    /// Surface a resolver failure in the diagnostics log.
    ReportFailure { error: AssetError },
}

/// The single per-widget state instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    room: Room,
    panels: PanelConfig,
    phase: TransitionPhase,
    ambient_enabled: bool,
    show_video: bool,
    ambient_volume: f32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            room: Room::default(),
            panels: PanelConfig::NONE,
            phase: TransitionPhase::Idle,
            ambient_enabled: false,
            show_video: false,
            ambient_volume: AMBIENT_VOLUME,
        }
    }

    pub fn with_ambient_volume(mut self, volume: f32) -> Self {
        self.ambient_volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn room(&self) -> Room {
        self.room
    }

    pub fn room_index(&self) -> usize {
        self.room.index()
    }

    pub fn panels(&self) -> PanelConfig {
        self.panels
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    pub fn show_video(&self) -> bool {
        self.show_video
    }

    pub fn ambient_enabled(&self) -> bool {
        self.ambient_enabled
    }

    /// Applies one event and returns the side effects it requires.
    pub fn handle(&mut self, event: ViewerEvent) -> Vec<ViewerCommand> {
        match event {
            ViewerEvent::NextRoom => self.start_transition_to(self.room.next()),
            ViewerEvent::PrevRoom => self.start_transition_to(self.room.prev()),

            ViewerEvent::ToggleWalls => {
                self.panels = self.panels.with_walls_toggled();
                self.ambient_refresh()
            }
            ViewerEvent::ToggleCeiling => {
                self.panels = self.panels.with_ceiling_toggled();
                self.ambient_refresh()
            }
            ViewerEvent::ToggleAmbient => {
                self.ambient_enabled = !self.ambient_enabled;
                if self.ambient_enabled {
                    self.ambient_refresh()
                } else {
                    vec![ViewerCommand::StopAmbient]
                }
            }

            ViewerEvent::VideoLoaded => match self.phase {
                TransitionPhase::Loading { .. } => vec![ViewerCommand::PlayVideo],
                _ => Vec::new(),
            },

            ViewerEvent::VideoStarted => match self.phase {
                TransitionPhase::Loading { target } => {
                    // Only now does the room change: the footage is on
                    // screen, so the static layers may swap underneath it.
                    self.room = target;
                    self.phase = TransitionPhase::Playing;
                    self.show_video = true;
                    self.ambient_refresh()
                }
                _ => Vec::new(),
            },

            ViewerEvent::VideoLoadFailed | ViewerEvent::VideoStartFailed => match self.phase {
                TransitionPhase::Loading { .. } => {
                    self.abort_transition();
                    Vec::new()
                }
                _ => Vec::new(),
            },

            ViewerEvent::VideoEnded => match self.phase {
                TransitionPhase::Playing => {
                    self.phase = TransitionPhase::Idle;
                    self.show_video = false;
                    Vec::new()
                }
                _ => Vec::new(),
            },
        }
    }

    /// Begins a transition toward `target`.
    ///
    /// A no-op while another transition is in flight. An unmapped pair
    /// aborts up front: the viewer stays idle on the current room and the
    /// failure is only reported, never shown.
    pub fn start_transition_to(&mut self, target: Room) -> Vec<ViewerCommand> {
        if self.phase != TransitionPhase::Idle {
            return Vec::new();
        }
        match assets::transition_video(self.room, target, self.panels) {
            Ok(path) => {
                self.phase = TransitionPhase::Loading { target };
                vec![ViewerCommand::LoadVideo { path }]
            }
            Err(error) => vec![ViewerCommand::ReportFailure { error }],
        }
    }

    fn abort_transition(&mut self) {
        self.phase = TransitionPhase::Idle;
        self.show_video = false;
    }

    /// The ambient track tracks (room, panels) whenever playback is on.
    fn ambient_refresh(&self) -> Vec<ViewerCommand> {
        if !self.ambient_enabled {
            return Vec::new();
        }
        vec![ViewerCommand::PlayAmbient {
            path: assets::ambient_audio(self.room, self.panels),
            volume: self.ambient_volume,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading_state() -> (ViewerState, Room) {
        let mut state = ViewerState::new();
        let commands = state.handle(ViewerEvent::NextRoom);
        assert_eq!(commands.len(), 1);
        (state, Room::Classroom)
    }

    #[test]
    fn next_room_requests_the_right_footage() {
        let mut state = ViewerState::new();
        let commands = state.handle(ViewerEvent::NextRoom);
        assert_eq!(
            commands,
            vec![ViewerCommand::LoadVideo {
                path: "transitions/Office to Classroom (No Panels).mp4".to_string()
            }]
        );
        assert_eq!(
            state.phase(),
            TransitionPhase::Loading {
                target: Room::Classroom
            }
        );
        assert_eq!(state.room(), Room::Office, "room commits only on playback");
    }

    #[test]
    fn prev_room_wraps_to_the_cinema() {
        let mut state = ViewerState::new();
        let commands = state.handle(ViewerEvent::PrevRoom);
        assert_eq!(
            commands,
            vec![ViewerCommand::LoadVideo {
                path: "transitions/Office to Cinema (No Panels).mp4".to_string()
            }]
        );
    }

    #[test]
    fn panel_config_picks_the_video_variant() {
        let mut state = ViewerState::new();
        state.handle(ViewerEvent::ToggleWalls);
        let commands = state.handle(ViewerEvent::PrevRoom);
        assert_eq!(
            commands,
            vec![ViewerCommand::LoadVideo {
                path: "transitions/Office to Cinema (No Ceiling).mp4".to_string()
            }]
        );
    }

    #[test]
    fn second_trigger_during_transition_is_dropped() {
        let (mut state, target) = loading_state();
        assert!(state.handle(ViewerEvent::NextRoom).is_empty());
        assert!(state.handle(ViewerEvent::PrevRoom).is_empty());
        assert_eq!(state.phase(), TransitionPhase::Loading { target });
    }

    #[test]
    fn load_success_requests_playback() {
        let (mut state, _) = loading_state();
        assert_eq!(
            state.handle(ViewerEvent::VideoLoaded),
            vec![ViewerCommand::PlayVideo]
        );
    }

    #[test]
    fn playback_start_commits_room_and_reveals_video() {
        let (mut state, target) = loading_state();
        state.handle(ViewerEvent::VideoLoaded);
        state.handle(ViewerEvent::VideoStarted);
        assert_eq!(state.room(), target);
        assert_eq!(state.phase(), TransitionPhase::Playing);
        assert!(state.show_video());
    }

    #[test]
    fn load_failure_aborts_without_moving() {
        let (mut state, _) = loading_state();
        assert!(state.handle(ViewerEvent::VideoLoadFailed).is_empty());
        assert_eq!(state.room(), Room::Office);
        assert!(!state.is_transitioning());
        assert!(!state.show_video());
    }

    #[test]
    fn play_failure_aborts_without_moving() {
        let (mut state, _) = loading_state();
        state.handle(ViewerEvent::VideoLoaded);
        assert!(state.handle(ViewerEvent::VideoStartFailed).is_empty());
        assert_eq!(state.room(), Room::Office);
        assert!(!state.is_transitioning());
    }

    #[test]
    fn video_end_returns_to_idle_on_the_new_room() {
        let (mut state, target) = loading_state();
        state.handle(ViewerEvent::VideoLoaded);
        state.handle(ViewerEvent::VideoStarted);
        state.handle(ViewerEvent::VideoEnded);
        assert_eq!(state.room(), target);
        assert_eq!(state.phase(), TransitionPhase::Idle);
        assert!(!state.show_video());
    }

    #[test]
    fn unmapped_target_reports_and_stays_idle() {
        let mut state = ViewerState::new();
        let commands = state.start_transition_to(Room::Hospital);
        assert!(matches!(
            commands.as_slice(),
            [ViewerCommand::ReportFailure { .. }]
        ));
        assert_eq!(state.phase(), TransitionPhase::Idle);
        assert_eq!(state.room(), Room::Office);
    }

    #[test]
    fn ambient_toggle_starts_looping_playback_at_fixed_volume() {
        let mut state = ViewerState::new();
        state.handle(ViewerEvent::ToggleWalls);
        state.handle(ViewerEvent::ToggleCeiling);
        // Move to the hospital: office -> classroom -> hospital.
        for _ in 0..2 {
            state.handle(ViewerEvent::NextRoom);
            state.handle(ViewerEvent::VideoLoaded);
            state.handle(ViewerEvent::VideoStarted);
            state.handle(ViewerEvent::VideoEnded);
        }
        assert_eq!(state.room(), Room::Hospital);

        let commands = state.handle(ViewerEvent::ToggleAmbient);
        assert_eq!(
            commands,
            vec![ViewerCommand::PlayAmbient {
                path: "audio/Hospital(no-echo+lowdB).mp3".to_string(),
                volume: 0.7,
            }]
        );
    }

    #[test]
    fn ambient_toggle_off_stops_playback() {
        let mut state = ViewerState::new();
        state.handle(ViewerEvent::ToggleAmbient);
        let commands = state.handle(ViewerEvent::ToggleAmbient);
        assert_eq!(commands, vec![ViewerCommand::StopAmbient]);
        assert!(!state.ambient_enabled());
    }

    #[test]
    fn panel_toggle_while_ambient_swaps_the_track() {
        let mut state = ViewerState::new();
        state.handle(ViewerEvent::ToggleAmbient);
        let commands = state.handle(ViewerEvent::ToggleCeiling);
        assert_eq!(
            commands,
            vec![ViewerCommand::PlayAmbient {
                path: "audio/Office(echo+lowdB).mp3".to_string(),
                volume: 0.7,
            }]
        );
    }

    #[test]
    fn panel_toggle_without_ambient_is_silent() {
        let mut state = ViewerState::new();
        assert!(state.handle(ViewerEvent::ToggleWalls).is_empty());
        assert!(state.panels().walls);
    }

    #[test]
    fn room_commit_retargets_ambient_playback() {
        let mut state = ViewerState::new();
        state.handle(ViewerEvent::ToggleAmbient);
        state.handle(ViewerEvent::NextRoom);
        state.handle(ViewerEvent::VideoLoaded);
        let commands = state.handle(ViewerEvent::VideoStarted);
        assert_eq!(
            commands,
            vec![ViewerCommand::PlayAmbient {
                path: "audio/Classroom(echo+highdB).mp3".to_string(),
                volume: 0.7,
            }]
        );
    }

    #[test]
    fn stray_media_events_are_ignored_when_idle() {
        let mut state = ViewerState::new();
        for event in [
            ViewerEvent::VideoLoaded,
            ViewerEvent::VideoLoadFailed,
            ViewerEvent::VideoStarted,
            ViewerEvent::VideoStartFailed,
            ViewerEvent::VideoEnded,
        ] {
            assert!(state.handle(event).is_empty());
            assert_eq!(state.phase(), TransitionPhase::Idle);
        }
    }
}
