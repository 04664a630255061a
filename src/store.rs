//! Progress persistence — JSON record under the user data directory.
//! The record is self-contained: dedicated serde structs decouple the file
//! format from runtime types, and every field defaults individually so a
//! partial or hand-edited file still loads.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{ACHIEVEMENT_COUNT, ACHIEVEMENTS, PANEL_DEFAULT_RIGHT, PANEL_DEFAULT_TOP, achievement_slot};
use crate::progression::QuestProgress;
use crate::settings::QuestSettings;
use crate::ui::quest_panel::{PanelPosition, PanelState};

// ============================================================================
// RECORD FORMAT STRUCTS
// ============================================================================

const PROGRESS_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProgressRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub xp: u32,
    /// Unlock flag per achievement id. Ids not in the catalog are ignored
    /// on load; catalog ids missing here stay locked.
    #[serde(default)]
    pub achievements: BTreeMap<String, bool>,
    #[serde(default)]
    pub panel_position: PanelPositionRecord,
}

fn default_version() -> u32 { PROGRESS_VERSION }

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            xp: 0,
            achievements: BTreeMap::new(),
            panel_position: PanelPositionRecord::default(),
        }
    }
}

/// Flat on-disk form of the panel position. A present `left` means the
/// panel was dragged to an absolute spot; otherwise it hangs off the
/// right edge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PanelPositionRecord {
    #[serde(default = "default_panel_top")]
    pub top: f32,
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default = "default_panel_right")]
    pub right: f32,
}

fn default_panel_top() -> f32 { PANEL_DEFAULT_TOP }
fn default_panel_right() -> f32 { PANEL_DEFAULT_RIGHT }

impl Default for PanelPositionRecord {
    fn default() -> Self {
        Self {
            top: PANEL_DEFAULT_TOP,
            left: None,
            right: PANEL_DEFAULT_RIGHT,
        }
    }
}

impl PanelPositionRecord {
    pub fn from_position(p: &PanelPosition) -> Self {
        match *p {
            PanelPosition::Anchored { top, right } => Self { top, left: None, right },
            PanelPosition::Absolute { top, left } => Self {
                top,
                left: Some(left),
                right: PANEL_DEFAULT_RIGHT,
            },
        }
    }

    pub fn to_position(&self) -> PanelPosition {
        match self.left {
            Some(left) => PanelPosition::Absolute { top: self.top, left },
            None => PanelPosition::Anchored { top: self.top, right: self.right },
        }
    }
}

impl ProgressRecord {
    /// Snapshot the live state into record form. All catalog ids are
    /// written explicitly so the file reads as a checklist.
    pub fn from_state(progress: &QuestProgress, panel_position: &PanelPosition) -> Self {
        let achievements = ACHIEVEMENTS
            .iter()
            .enumerate()
            .map(|(slot, def)| (def.id.to_string(), progress.unlocked[slot]))
            .collect();
        Self {
            version: PROGRESS_VERSION,
            xp: progress.xp,
            achievements,
            panel_position: PanelPositionRecord::from_position(panel_position),
        }
    }

    /// Copy the record into runtime state. Flags only flip to unlocked;
    /// the caller runs `rebuild` afterwards to restore derived fields.
    pub fn apply_to(&self, progress: &mut QuestProgress) {
        progress.xp = self.xp;
        for (id, &on) in &self.achievements {
            if !on {
                continue;
            }
            match achievement_slot(id) {
                Some(slot) => progress.unlocked[slot] = true,
                None => debug!("ignoring unknown achievement id '{}' in save", id),
            }
        }
    }
}

// ============================================================================
// PATHS
// ============================================================================

fn progress_path() -> Option<PathBuf> {
    let home = std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .ok()?;
    let dir = PathBuf::from(home).join("Documents").join("ThoughtQuest");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("progress.json"))
}

// ============================================================================
// READ / WRITE
// ============================================================================

/// Write the record to a specific path.
pub fn write_progress_to(record: &ProgressRecord, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(record).map_err(|e| format!("serialize: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("write {}: {e}", path.display()))?;
    debug!("Progress saved to {}", path.display());
    Ok(())
}

/// Read a record from a specific path, refusing files from a newer build.
pub fn read_progress_from(path: &Path) -> Result<ProgressRecord, String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    let record: ProgressRecord =
        serde_json::from_str(&json).map_err(|e| format!("deserialize: {e}"))?;
    if record.version > PROGRESS_VERSION {
        return Err(format!(
            "progress version {} > supported {}",
            record.version, PROGRESS_VERSION
        ));
    }
    Ok(record)
}

/// Load the progress record, falling back to defaults on any failure.
/// A missing file is the normal first run, not an error.
pub fn load_progress() -> ProgressRecord {
    let Some(path) = progress_path() else {
        return ProgressRecord::default();
    };
    if !path.exists() {
        info!("No saved progress, starting fresh");
        return ProgressRecord::default();
    }
    match read_progress_from(&path) {
        Ok(record) => record,
        Err(e) => {
            warn!("Failed to load progress ({e}), starting fresh");
            ProgressRecord::default()
        }
    }
}

/// Serialize and write the record on the IO task pool, fire-and-forget.
/// In-memory state stays authoritative whether or not the write lands.
pub fn spawn_save(record: ProgressRecord) {
    let Some(path) = progress_path() else { return };
    IoTaskPool::get()
        .spawn(async move {
            if let Err(e) = write_progress_to(&record, &path) {
                warn!("Background progress save failed: {e}");
            }
        })
        .detach();
}

// ============================================================================
// BEVY SYSTEMS
// ============================================================================

/// Last persisted (or loaded) values, used to detect when a new write is due.
#[derive(Resource, Default)]
pub struct StoreState {
    last_saved: (u32, [bool; ACHIEVEMENT_COUNT], PanelPosition),
}

/// Startup: read the record once, restore runtime state, and seed the
/// dirty-tracking baseline so the freshly loaded state is not re-written.
pub fn load_progress_system(
    mut progress: ResMut<QuestProgress>,
    settings: Res<QuestSettings>,
    mut panel: ResMut<PanelState>,
    mut store: ResMut<StoreState>,
) {
    let record = load_progress();
    record.apply_to(&mut progress);
    progress.rebuild(&settings);
    panel.saved_position = record.panel_position.to_position();

    store.last_saved = (progress.xp, progress.unlocked, panel.saved_position);
    info!(
        "Progress loaded: {} XP, Lv.{}, {}/{} achievements",
        progress.xp,
        progress.level,
        progress.snapshot().unlocked_count(),
        ACHIEVEMENT_COUNT
    );
}

/// Schedules a background write whenever a persisted field has changed
/// since the last write. Runs at the end of the update step so one edit
/// never produces more than one write.
pub fn persist_progress_system(
    progress: Res<QuestProgress>,
    panel: Res<PanelState>,
    mut store: ResMut<StoreState>,
) {
    let current = (progress.xp, progress.unlocked, panel.saved_position);
    if store.last_saved != current {
        store.last_saved = current;
        spawn_save(ProgressRecord::from_state(&progress, &panel.saved_position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_xp(xp: u32) -> ProgressRecord {
        ProgressRecord { xp, ..ProgressRecord::default() }
    }

    #[test]
    fn record_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let mut record = record_with_xp(340);
        record.achievements.insert("first-edit".into(), true);
        record.panel_position = PanelPositionRecord { top: 50.0, left: Some(200.0), right: 24.0 };

        write_progress_to(&record, &path).unwrap();
        assert_eq!(read_progress_from(&path).unwrap(), record);
    }

    #[test]
    fn newer_version_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, r#"{ "version": 99, "xp": 10 }"#).unwrap();

        let err = read_progress_from(&path).unwrap_err();
        assert!(err.contains("version"), "unexpected error: {err}");
    }

    #[test]
    fn partial_record_defaults_field_by_field() {
        let record: ProgressRecord = serde_json::from_str(r#"{ "xp": 50 }"#).unwrap();
        assert_eq!(record.xp, 50);
        assert!(record.achievements.is_empty());
        assert_eq!(record.panel_position, PanelPositionRecord::default());
    }

    #[test]
    fn unknown_achievement_ids_are_skipped() {
        let mut record = record_with_xp(0);
        record.achievements.insert("legacy-badge".into(), true);
        record.achievements.insert("deep-thinker".into(), true);

        let mut progress = QuestProgress::default();
        record.apply_to(&mut progress);
        assert!(!progress.unlocked[0]);
        assert!(progress.unlocked[1]);
        assert!(!progress.unlocked[2] && !progress.unlocked[3]);
    }

    #[test]
    fn anchored_and_absolute_positions_round_trip() {
        let anchored = PanelPosition::Anchored { top: 24.0, right: 24.0 };
        assert_eq!(PanelPositionRecord::from_position(&anchored).to_position(), anchored);

        let dragged = PanelPosition::Absolute { top: 50.0, left: 200.0 };
        assert_eq!(PanelPositionRecord::from_position(&dragged).to_position(), dragged);
    }

    #[test]
    fn save_load_rebuild_reproduces_the_same_state() {
        let settings = QuestSettings::default();
        let mut original = QuestProgress::default();
        for _ in 0..55 {
            original.apply_edit(&settings);
        }
        let record = ProgressRecord::from_state(&original, &PanelPosition::default());

        let mut restored = QuestProgress::default();
        record.apply_to(&mut restored);
        restored.rebuild(&settings);
        assert_eq!(restored.snapshot(), original.snapshot());

        // Loading the same record again changes nothing.
        record.apply_to(&mut restored);
        restored.rebuild(&settings);
        assert_eq!(restored.snapshot(), original.snapshot());
    }
}
