//! Wire types for the remote-control API.

use serde::{Deserialize, Serialize};

use crate::room::Room;
use crate::state::{ViewerEvent, ViewerState};

pub const ACTION_NEXT_ROOM: &str = "nextRoom";
pub const ACTION_PREV_ROOM: &str = "prevRoom";
pub const ACTION_TOGGLE_WALLS: &str = "toggleWalls";
pub const ACTION_TOGGLE_CEILING: &str = "toggleCeiling";
pub const ACTION_TOGGLE_AMBIENT: &str = "toggleAmbient";

pub fn action_from_id(id: &str) -> Option<ViewerEvent> {
    match id {
        ACTION_NEXT_ROOM => Some(ViewerEvent::NextRoom),
        ACTION_PREV_ROOM => Some(ViewerEvent::PrevRoom),
        ACTION_TOGGLE_WALLS => Some(ViewerEvent::ToggleWalls),
        ACTION_TOGGLE_CEILING => Some(ViewerEvent::ToggleCeiling),
        ACTION_TOGGLE_AMBIENT => Some(ViewerEvent::ToggleAmbient),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAction {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteManifest {
    pub title: String,
    pub actions: Vec<RemoteAction>,
}

pub fn manifest() -> RemoteManifest {
    let action = |id: &str, label: &str| RemoteAction {
        id: id.to_string(),
        label: label.to_string(),
    };
    RemoteManifest {
        title: "Acoustic Room Viewer".to_string(),
        actions: vec![
            action(ACTION_PREV_ROOM, "Previous room"),
            action(ACTION_NEXT_ROOM, "Next room"),
            action(ACTION_TOGGLE_WALLS, "Wall panels"),
            action(ACTION_TOGGLE_CEILING, "Ceiling panels"),
            action(ACTION_TOGGLE_AMBIENT, "Soundscape"),
        ],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub action_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSnapshot {
    pub room: Room,
    pub room_label: String,
    pub room_index: usize,
    pub walls_enabled: bool,
    pub ceiling_enabled: bool,
    pub is_transitioning: bool,
    pub show_video: bool,
    pub ambient_enabled: bool,
    pub images_ready: bool,
    pub videos_ready: bool,
}

pub fn snapshot(state: &ViewerState, images_ready: bool, videos_ready: bool) -> ViewerSnapshot {
    ViewerSnapshot {
        room: state.room(),
        room_label: state.room().label().to_string(),
        room_index: state.room_index(),
        walls_enabled: state.panels().walls,
        ceiling_enabled: state.panels().ceiling,
        is_transitioning: state.is_transitioning(),
        show_video: state.show_video(),
        ambient_enabled: state.ambient_enabled(),
        images_ready,
        videos_ready,
    }
}
