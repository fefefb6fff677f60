//! Session settings and their persistence
//!
//! A typed bag of the fixed, enumerated option set the shell exposes, plus
//! JSON persistence under the platform config directory. Load falls back to
//! defaults when the file is missing or invalid; save failures are logged
//! but never interrupt gameplay.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::SessionResult;

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Animation speed for planned move playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl MoveSpeed {
    /// Suggested per-instruction duration in milliseconds
    pub fn duration_ms(self) -> u64 {
        match self {
            MoveSpeed::Slow => 600,
            MoveSpeed::Normal => 300,
            MoveSpeed::Fast => 120,
        }
    }
}

/// Board colour themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoardColour {
    #[default]
    Brown,
    Green,
    Blue,
    Grey,
}

/// The complete enumerated option set for one session
///
/// Every field has a serde default so settings files written by older
/// versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Whether the computer plays one side
    pub computer_player: bool,
    /// Computer plays White and moves first on a new game
    pub computer_moves_first: bool,
    /// Skill-level index into the strength table
    pub skill_index: usize,
    /// Use the advanced overrides below instead of the strength table
    pub advanced_mode: bool,
    pub advanced_depth: u32,
    pub advanced_time_ms: u64,
    pub advanced_nodes: u64,
    pub advanced_threads: u32,
    /// Let the engine vary its opening play
    pub randomise_opening: bool,
    /// Bump the skill index after the player beats the computer
    pub auto_level_up: bool,
    /// Commit hint moves instead of only highlighting them
    pub auto_play_hint: bool,
    /// Highlight legal destinations for the selected piece
    pub move_highlight: bool,
    pub move_speed: MoveSpeed,
    /// Promote to queen without prompting
    pub auto_promote: bool,
    pub clock_enabled: bool,
    /// Starting clock offsets in seconds for a new game
    pub clock_default_seconds: i64,
    /// Fischer increment in seconds, 0 to disable
    pub clock_increment_seconds: i64,
    pub board_colour: BoardColour,
    /// Draw pawns oversized for small screens
    pub large_pawn: bool,
    pub sound_enabled: bool,
    pub voice_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            computer_player: true,
            computer_moves_first: false,
            skill_index: 0,
            advanced_mode: false,
            advanced_depth: 0,
            advanced_time_ms: 0,
            advanced_nodes: 0,
            advanced_threads: 1,
            randomise_opening: true,
            auto_level_up: false,
            auto_play_hint: false,
            move_highlight: true,
            move_speed: MoveSpeed::Normal,
            auto_promote: false,
            clock_enabled: false,
            clock_default_seconds: 0,
            clock_increment_seconds: 0,
            board_colour: BoardColour::Brown,
            large_pawn: false,
            sound_enabled: true,
            voice_enabled: false,
        }
    }
}

/// Resolve the settings file path
///
/// Under the user's configuration directory, falling back to the working
/// directory if the system config dir cannot be found.
fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "chess-session", "ChessSession") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings, falling back to defaults on any failure
pub fn load_settings() -> GameSettings {
    load_settings_from(&settings_path())
}

/// Load settings from an explicit path, falling back to defaults
pub fn load_settings_from(path: &PathBuf) -> GameSettings {
    if !path.exists() {
        info!("[SETTINGS] no settings file at {path:?}, using defaults");
        return GameSettings::default();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<GameSettings>(&contents) {
            Ok(settings) => {
                info!("[SETTINGS] loaded settings from {path:?}");
                settings
            }
            Err(e) => {
                warn!("[SETTINGS] failed to parse {path:?}: {e}, using defaults");
                GameSettings::default()
            }
        },
        Err(e) => {
            warn!("[SETTINGS] failed to read {path:?}: {e}, using defaults");
            GameSettings::default()
        }
    }
}

/// Save settings; failures are logged and returned but must not interrupt
/// the session
pub fn save_settings(settings: &GameSettings) -> SessionResult<()> {
    let path = settings_path();
    save_settings_to(settings, &path)
}

/// Save settings to an explicit path
pub fn save_settings_to(settings: &GameSettings, path: &PathBuf) -> SessionResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("[SETTINGS] failed to create {parent:?}: {e}");
                return Err(e.into());
            }
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    match fs::write(path, json) {
        Ok(()) => {
            info!("[SETTINGS] saved settings to {path:?}");
            Ok(())
        }
        Err(e) => {
            error!("[SETTINGS] failed to write {path:?}: {e}");
            Err(e.into())
        }
    }
}
