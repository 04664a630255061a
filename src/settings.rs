//! User settings persistence — save/load config to JSON file.
//!
//! Every field carries a serde default so a partial or older file merges
//! with the defaults instead of replacing them wholesale.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_XP_PER_EDIT, DEFAULT_XP_PER_LEVEL, MIN_XP_SETTING};
use crate::messages::SettingChangedMsg;
use crate::progression::QuestProgress;

/// Persisted user settings. Saved to `Documents\ThoughtQuest\settings.json`.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuestSettings {
    #[serde(default = "default_xp_per_edit")]
    pub xp_per_edit: u32,
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
    #[serde(default = "default_true")]
    pub show_progress_bar: bool,
    #[serde(default = "default_true")]
    pub show_floating_panel: bool,
}

fn default_true() -> bool { true }
fn default_xp_per_edit() -> u32 { DEFAULT_XP_PER_EDIT }
fn default_xp_per_level() -> u32 { DEFAULT_XP_PER_LEVEL }

impl Default for QuestSettings {
    fn default() -> Self {
        Self {
            xp_per_edit: DEFAULT_XP_PER_EDIT,
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            show_progress_bar: true,
            show_floating_panel: true,
        }
    }
}

impl QuestSettings {
    /// Clamp loaded values into the valid range. A zero XP setting would
    /// break the level formula, so it falls back to the default.
    fn sanitize(mut self) -> Self {
        if self.xp_per_edit < MIN_XP_SETTING {
            warn!("xp_per_edit {} below minimum, using default", self.xp_per_edit);
            self.xp_per_edit = DEFAULT_XP_PER_EDIT;
        }
        if self.xp_per_level < MIN_XP_SETTING {
            warn!("xp_per_level {} below minimum, using default", self.xp_per_level);
            self.xp_per_level = DEFAULT_XP_PER_LEVEL;
        }
        self
    }
}

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .ok()?;
    let dir = PathBuf::from(home).join("Documents").join("ThoughtQuest");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("settings.json"))
}

pub fn save_settings_to(settings: &QuestSettings, path: &Path) {
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                warn!("Failed to save settings: {}", e);
            }
        }
        Err(e) => warn!("Failed to serialize settings: {}", e),
    }
}

pub fn save_settings(settings: &QuestSettings) {
    let Some(path) = settings_path() else { return };
    save_settings_to(settings, &path);
}

pub fn load_settings_from(path: &Path) -> QuestSettings {
    match std::fs::read_to_string(path) {
        Ok(json) => serde_json::from_str::<QuestSettings>(&json)
            .unwrap_or_default()
            .sanitize(),
        Err(_) => QuestSettings::default(),
    }
}

pub fn load_settings() -> QuestSettings {
    let Some(path) = settings_path() else { return QuestSettings::default() };
    load_settings_from(&path)
}

// ============================================================================
// SETTINGS REDUCER
// ============================================================================

/// The only writer of `QuestSettings`. Applies host setting changes,
/// rejects out-of-range values, and re-derives the level when the
/// divisor changes. Disk writes are [`persist_settings_system`]'s job.
pub fn apply_setting_changes(
    mut changes: MessageReader<SettingChangedMsg>,
    mut settings: ResMut<QuestSettings>,
    mut progress: ResMut<QuestProgress>,
) {
    for change in changes.read() {
        match *change {
            SettingChangedMsg::XpPerEdit(value) => {
                if value < MIN_XP_SETTING {
                    warn!("rejected xp_per_edit {}: below minimum {}", value, MIN_XP_SETTING);
                    continue;
                }
                settings.xp_per_edit = value;
            }
            SettingChangedMsg::XpPerLevel(value) => {
                if value < MIN_XP_SETTING {
                    warn!("rejected xp_per_level {}: below minimum {}", value, MIN_XP_SETTING);
                    continue;
                }
                settings.xp_per_level = value;
                progress.recompute_level(&settings);
            }
            SettingChangedMsg::ShowProgressBar(on) => settings.show_progress_bar = on,
            SettingChangedMsg::ShowFloatingPanel(on) => settings.show_floating_panel = on,
        }
    }
}

/// Writes `settings.json` at the end of any frame in which the reducer
/// changed something. The initial resource insert does not count, so
/// startup never echoes the loaded file straight back to disk.
pub fn persist_settings_system(settings: Res<QuestSettings>) {
    if settings.is_changed() && !settings.is_added() {
        save_settings(&settings);
    }
}
