use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ambient::AMBIENT_VOLUME;
use crate::layout::MOBILE_BREAKPOINT;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AudioSettings {
    pub ambient_volume: f32,
    pub mute_all: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            ambient_volume: AMBIENT_VOLUME,
            mute_all: false,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.ambient_volume = self.ambient_volume.clamp(0.0, 1.0);
        self
    }

    pub fn effective_ambient_volume(self) -> f32 {
        if self.mute_all { 0.0 } else { self.ambient_volume }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Viewport widths below this use the mobile presentation.
    pub mobile_breakpoint: u32,
    /// How long the file-backed video element holds the transition overlay.
    pub transition_hold_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            transition_hold_ms: 2500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory the relative asset paths resolve against.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            asset_root: default_asset_root(),
            audio: AudioSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl ViewerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.audio = self.audio.clamp();
        self.display.mobile_breakpoint = self.display.mobile_breakpoint.max(1);
        self.display.transition_hold_ms = self.display.transition_hold_ms.max(1);
        self
    }
}

fn default_version() -> u32 {
    1
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("ROOMVIEW_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("roomview");
        path.push("settings.json");
        Self { path }
    }

    pub fn load(&self) -> ViewerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return ViewerSettings::default();
        };
        serde_json::from_slice::<ViewerSettings>(&bytes)
            .map(ViewerSettings::sanitized)
            .unwrap_or_else(|_| ViewerSettings::default())
    }

    pub fn save(&self, settings: &ViewerSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_fixed_ambient_volume_and_breakpoint() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.audio.ambient_volume, 0.7);
        assert_eq!(settings.display.mobile_breakpoint, 768);
        assert_eq!(settings.asset_root, PathBuf::from("assets"));
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let settings = ViewerSettings {
            version: 9,
            audio: AudioSettings {
                ambient_volume: 3.0,
                mute_all: false,
            },
            display: DisplaySettings {
                mobile_breakpoint: 0,
                transition_hold_ms: 0,
            },
            ..ViewerSettings::default()
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.audio.ambient_volume, 1.0);
        assert_eq!(settings.display.mobile_breakpoint, 1);
        assert_eq!(settings.display.transition_hold_ms, 1);
    }

    #[test]
    fn mute_all_zeroes_the_effective_volume() {
        let mut audio = AudioSettings::default();
        assert!((audio.effective_ambient_volume() - 0.7).abs() < 1e-6);
        audio.mute_all = true;
        assert_eq!(audio.effective_ambient_volume(), 0.0);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: ViewerSettings =
            serde_json::from_str(r#"{"version":1}"#).expect("settings JSON should parse");
        assert_eq!(parsed.audio, AudioSettings::default());
        assert_eq!(parsed.display, DisplaySettings::default());
    }

    #[test]
    fn store_round_trips_through_disk() {
        let path = std::env::temp_dir()
            .join("roomview_settings_tests")
            .join("settings.json");
        let _ = fs::remove_file(&path);
        let store = SettingsStore::at(&path);

        let mut settings = ViewerSettings::default();
        settings.audio.ambient_volume = 0.4;
        settings.display.transition_hold_ms = 1800;
        store.save(&settings).expect("save creates parent dirs");

        assert_eq!(store.load(), settings);
    }

    #[test]
    fn corrupt_or_missing_files_fall_back_to_defaults() {
        let dir = std::env::temp_dir().join("roomview_settings_tests");
        fs::create_dir_all(&dir).expect("create temp dir");

        let missing = SettingsStore::at(dir.join("nope.json"));
        assert_eq!(missing.load(), ViewerSettings::default());

        let corrupt_path = dir.join("corrupt.json");
        fs::write(&corrupt_path, b"{not json").expect("write corrupt file");
        let corrupt = SettingsStore::at(&corrupt_path);
        assert_eq!(corrupt.load(), ViewerSettings::default());
    }
}
