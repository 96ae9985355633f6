//! Static asset path tables.
//!
//! Every path the viewer ever touches is enumerated here: 16 room images
//! (4 rooms x 4 layers), 16 ambient tracks (4 rooms x 4 panel configs), and
//! 32 transition videos (8 directed room pairs x 4 panel configs). The file
//! layout is a contract with the asset pipeline; the strings must match the
//! shipped files exactly, spaces and parentheses included.

use std::fmt;

use crate::room::{PanelConfig, Room};

/// The four photo layers for one room.
///
/// `wall_layer` is the shot with wall panels installed (ceiling bare), and
/// `ceiling_layer` the shot with ceiling panels installed (walls bare); the
/// compositor reveals them as the matching toggles turn on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomImageSet {
    pub base: String,
    pub wall_layer: String,
    pub ceiling_layer: String,
    pub full: String,
}

impl RoomImageSet {
    pub fn layers(&self) -> [&str; 4] {
        [&self.base, &self.wall_layer, &self.ceiling_layer, &self.full]
    }
}

pub fn room_images(room: Room) -> RoomImageSet {
    let name = room.name();
    RoomImageSet {
        base: format!("rooms/{name} - no panels.jpg"),
        wall_layer: format!("rooms/{name} - no ceiling.jpg"),
        ceiling_layer: format!("rooms/{name} - no wall.jpg"),
        full: format!("rooms/{name}.jpg"),
    }
}

/// Acoustic suffix: panels on the walls kill the echo, panels on the
/// ceiling drop the level.
fn audio_suffix(panels: PanelConfig) -> &'static str {
    match (panels.walls, panels.ceiling) {
        (false, false) => "(echo+highdB)",
        (false, true) => "(echo+lowdB)",
        (true, false) => "(no-echo+highdB)",
        (true, true) => "(no-echo+lowdB)",
    }
}

pub fn ambient_audio(room: Room, panels: PanelConfig) -> String {
    format!("audio/{}{}.mp3", room.name(), audio_suffix(panels))
}

/// Video suffix names the treatment that is *missing* from the shot.
fn video_suffix(panels: PanelConfig) -> &'static str {
    match (panels.walls, panels.ceiling) {
        (false, false) => " (No Panels)",
        (true, false) => " (No Ceiling)",
        (false, true) => " (No Wall)",
        (true, true) => "",
    }
}

/// The eight directed room pairs with pre-rendered transition footage.
/// Exactly the pairs reachable through next/prev navigation.
pub const TRANSITION_PAIRS: [(Room, Room); 8] = [
    (Room::Office, Room::Classroom),
    (Room::Office, Room::Cinema),
    (Room::Classroom, Room::Office),
    (Room::Classroom, Room::Hospital),
    (Room::Hospital, Room::Classroom),
    (Room::Hospital, Room::Cinema),
    (Room::Cinema, Room::Hospital),
    (Room::Cinema, Room::Office),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    /// No footage exists for this directed pair. Callers must abort the
    /// transition exactly as they would a load failure.
    UnmappedTransition { from: Room, to: Room },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::UnmappedTransition { from, to } => write!(
                f,
                "no transition footage for {} -> {}",
                from.name(),
                to.name()
            ),
        }
    }
}

impl std::error::Error for AssetError {}

pub fn transition_video(
    from: Room,
    to: Room,
    panels: PanelConfig,
) -> Result<String, AssetError> {
    if !TRANSITION_PAIRS.contains(&(from, to)) {
        return Err(AssetError::UnmappedTransition { from, to });
    }
    Ok(format!(
        "transitions/{} to {}{}.mp4",
        from.name(),
        to.name(),
        video_suffix(panels)
    ))
}

/// All 16 room image paths, room-major in tour order.
pub fn all_room_images() -> Vec<String> {
    Room::ALL
        .iter()
        .flat_map(|room| {
            let set = room_images(*room);
            [set.base, set.wall_layer, set.ceiling_layer, set.full]
        })
        .collect()
}

/// All 16 ambient tracks, room-major in tour order.
pub fn all_ambient_tracks() -> Vec<String> {
    Room::ALL
        .iter()
        .flat_map(|room| PanelConfig::ALL.map(|panels| ambient_audio(*room, panels)))
        .collect()
}

/// All 32 transition videos, pair-major, in the order the preloader warms
/// them.
pub fn all_transition_videos() -> Vec<String> {
    TRANSITION_PAIRS
        .iter()
        .flat_map(|(from, to)| {
            PanelConfig::ALL.map(|panels| {
                transition_video(*from, *to, panels)
                    .expect("every listed pair resolves")
            })
        })
        .collect()
}
