//! Constants - Tuning parameters for progression and the overlay UI

/// XP granted per edit notification when no saved setting exists.
pub const DEFAULT_XP_PER_EDIT: u32 = 10;

/// XP required per level when no saved setting exists.
pub const DEFAULT_XP_PER_LEVEL: u32 = 100;

/// Lower bound for both XP settings. Zero would break the level formula.
pub const MIN_XP_SETTING: u32 = 1;

// ============================================================================
// ACHIEVEMENT CATALOG
// ============================================================================

pub const ACHIEVEMENT_COUNT: usize = 4;

/// One catalog entry. Thresholds are absolute XP, not level-relative.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub threshold_xp: u32,
}

/// The full catalog, in unlock-evaluation order. Index doubles as the
/// unlock-flag slot, so order is part of the persisted format.
pub const ACHIEVEMENTS: [AchievementDef; ACHIEVEMENT_COUNT] = [
    AchievementDef {
        id: "first-edit",
        title: "First Thought",
        description: "Record your first edit.",
        threshold_xp: 0,
    },
    AchievementDef {
        id: "deep-thinker",
        title: "Deep Thinker",
        description: "Accumulate 500 XP.",
        threshold_xp: 500,
    },
    AchievementDef {
        id: "wordsmith",
        title: "Wordsmith",
        description: "Accumulate 1,000 XP.",
        threshold_xp: 1000,
    },
    AchievementDef {
        id: "grand-archive",
        title: "Grand Archive",
        description: "Accumulate 2,500 XP.",
        threshold_xp: 2500,
    },
];

/// Catalog slot for an achievement id, None for ids from foreign saves.
pub fn achievement_slot(id: &str) -> Option<usize> {
    ACHIEVEMENTS.iter().position(|def| def.id == id)
}

// ============================================================================
// FLOATING PANEL
// ============================================================================

/// Default panel offset from the top edge, in logical pixels.
pub const PANEL_DEFAULT_TOP: f32 = 24.0;

/// Default panel offset from the right edge, in logical pixels.
pub const PANEL_DEFAULT_RIGHT: f32 = 24.0;

// ============================================================================
// NOTICES
// ============================================================================

/// Seconds a transient notice stays on screen.
pub const NOTICE_LIFETIME_SECS: f64 = 3.5;

/// Most notices shown at once; older ones drop first.
pub const NOTICE_MAX_VISIBLE: usize = 5;
