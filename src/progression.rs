//! Progression engine - XP accumulation, level derivation, achievement unlocks.
//!
//! `QuestProgress` is the single runtime owner of progression state. Level is
//! never stored as ground truth anywhere: it is re-derived from XP after every
//! mutation, so a settings change or a hand-edited save can never leave it
//! stale.

use bevy::prelude::*;

use crate::constants::{ACHIEVEMENT_COUNT, ACHIEVEMENTS};
use crate::messages::{NoteEditedMsg, NoticeMsg, ProgressChangedMsg};
use crate::settings::QuestSettings;

// ============================================================================
// HELPERS
// ============================================================================

/// Derive level from XP: level = floor(xp / xp_per_level).
/// A zero divisor yields level 0 rather than panicking.
pub fn level_from_xp(xp: u32, xp_per_level: u32) -> u32 {
    if xp_per_level == 0 {
        return 0;
    }
    xp / xp_per_level
}

// ============================================================================
// PROGRESSION STATE
// ============================================================================

/// Outcome of one applied edit. Broadcast as `ProgressChangedMsg` so the
/// quest log and the host can react without re-deriving anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditResult {
    pub xp: u32,
    pub level: u32,
    pub leveled_up: bool,
    /// Catalog slots unlocked by this edit, in catalog order.
    pub newly_unlocked: Vec<usize>,
}

/// Read-only view of the current progression state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestSnapshot {
    pub xp: u32,
    pub level: u32,
    pub unlocked: [bool; ACHIEVEMENT_COUNT],
}

impl QuestSnapshot {
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.iter().filter(|u| **u).count()
    }
}

/// Lifetime progression state. XP only ever grows; unlock flags only ever
/// flip to true; level is a pure function of (xp, xp_per_level).
#[derive(Resource, Default, Clone, Debug, PartialEq, Eq)]
pub struct QuestProgress {
    pub xp: u32,
    pub level: u32,
    pub unlocked: [bool; ACHIEVEMENT_COUNT],
}

impl QuestProgress {
    /// Apply one qualifying edit: grant XP, re-derive the level, and flip
    /// any catalog entry whose threshold the new total has reached.
    /// Infallible; persistence is the caller's follow-up.
    pub fn apply_edit(&mut self, settings: &QuestSettings) -> EditResult {
        let old_level = self.level;
        self.xp = self.xp.saturating_add(settings.xp_per_edit);
        self.level = level_from_xp(self.xp, settings.xp_per_level);
        let newly_unlocked = self.sweep_unlocks();

        EditResult {
            xp: self.xp,
            level: self.level,
            leveled_up: self.level > old_level,
            newly_unlocked,
        }
    }

    pub fn snapshot(&self) -> QuestSnapshot {
        QuestSnapshot {
            xp: self.xp,
            level: self.level,
            unlocked: self.unlocked,
        }
    }

    /// Re-derive the level after a settings change. Does not touch XP or
    /// unlock flags: thresholds are absolute XP, so no settings value can
    /// change an unlock outcome, and flags never revert regardless.
    pub fn recompute_level(&mut self, settings: &QuestSettings) {
        self.level = level_from_xp(self.xp, settings.xp_per_level);
    }

    /// Restore invariants after loading persisted state: derive the level
    /// and run one unlock sweep. The sweep only flips flags to true, so
    /// loading the same record twice is a no-op the second time.
    pub fn rebuild(&mut self, settings: &QuestSettings) {
        self.recompute_level(settings);
        self.sweep_unlocks();
    }

    /// Flip every still-locked entry whose threshold the current XP meets.
    /// Returns the flipped slots in catalog order.
    fn sweep_unlocks(&mut self) -> Vec<usize> {
        let mut flipped = Vec::new();
        for (slot, def) in ACHIEVEMENTS.iter().enumerate() {
            if !self.unlocked[slot] && self.xp >= def.threshold_xp {
                self.unlocked[slot] = true;
                flipped.push(slot);
            }
        }
        flipped
    }
}

// ============================================================================
// XP GRANT SYSTEM
// ============================================================================

/// Drains edit notifications from the host, applies each as one XP grant,
/// and fans the outcome out as progress broadcasts plus notices.
pub fn grant_xp_system(
    mut edits: MessageReader<NoteEditedMsg>,
    mut progress: ResMut<QuestProgress>,
    settings: Res<QuestSettings>,
    mut changed: MessageWriter<ProgressChangedMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for _ in edits.read() {
        let result = progress.apply_edit(&settings);

        if result.leveled_up {
            info!("level up: Lv.{} at {} XP", result.level, result.xp);
            notices.write(NoticeMsg::new(format!("Level up! Reached Lv.{}", result.level)));
        }
        for &slot in &result.newly_unlocked {
            let def = &ACHIEVEMENTS[slot];
            info!("achievement unlocked: {} ({})", def.title, def.id);
            notices.write(NoticeMsg::new(format!("Achievement unlocked: {}", def.title)));
        }

        changed.write(ProgressChangedMsg { result });
    }
}
