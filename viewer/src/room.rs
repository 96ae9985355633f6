use serde::{Deserialize, Serialize};

/// The four showcased rooms, in tour order.
///
/// Navigation is cyclic: advancing past the cinema wraps back to the office,
/// and stepping back from the office lands on the cinema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Room {
    Office,
    Classroom,
    Hospital,
    Cinema,
}

impl Default for Room {
    fn default() -> Self {
        Self::Office
    }
}

impl Room {
    pub const ALL: [Room; 4] = [Room::Office, Room::Classroom, Room::Hospital, Room::Cinema];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Room {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Room {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Room {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }

    /// Capitalized name as used in asset file names.
    pub fn name(self) -> &'static str {
        match self {
            Room::Office => "Office",
            Room::Classroom => "Classroom",
            Room::Hospital => "Hospital",
            Room::Cinema => "Cinema",
        }
    }

    /// Display label for the sign board.
    pub fn label(self) -> &'static str {
        match self {
            Room::Office => "OFFICE",
            Room::Classroom => "CLASSROOM",
            Room::Hospital => "HOSPITAL",
            Room::Cinema => "CINEMA HALL",
        }
    }
}

/// Which acoustic treatments are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelConfig {
    pub walls: bool,
    pub ceiling: bool,
}

impl PanelConfig {
    pub const NONE: PanelConfig = PanelConfig {
        walls: false,
        ceiling: false,
    };

    /// All four combinations, in the order the preloader enumerates them.
    pub const ALL: [PanelConfig; 4] = [
        PanelConfig {
            walls: false,
            ceiling: false,
        },
        PanelConfig {
            walls: true,
            ceiling: false,
        },
        PanelConfig {
            walls: false,
            ceiling: true,
        },
        PanelConfig {
            walls: true,
            ceiling: true,
        },
    ];

    pub fn with_walls_toggled(self) -> Self {
        Self {
            walls: !self.walls,
            ..self
        }
    }

    pub fn with_ceiling_toggled(self) -> Self {
        Self {
            ceiling: !self.ceiling,
            ..self
        }
    }
}
