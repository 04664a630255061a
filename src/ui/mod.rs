//! UI module — progress bar, floating quest panel, quest log, and notices.

pub mod notices;
pub mod progress_bar;
pub mod quest_log;
pub mod quest_panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::Step;
use crate::settings::QuestSettings;
use quest_panel::PanelState;

/// Open/closed flags for toggleable panels.
#[derive(Resource, Default)]
pub struct UiState {
    pub quest_log_open: bool,
}

/// Register all view resources and systems.
pub fn register_ui(app: &mut App) {
    app.init_resource::<UiState>()
        .init_resource::<PanelState>()
        .init_resource::<quest_log::QuestLog>()
        .init_resource::<notices::NoticeQueue>();

    // View bookkeeping runs after progression and settings so a mount or a
    // feed entry lands in the same frame as the change that caused it.
    app.add_systems(Update, (
        panel_visibility_system,
        quest_log::quest_feed_system,
        notices::notice_update_system,
    ).in_set(Step::View));

    // Egui panels — bottom strips claim their height first, then the
    // floating panel, then notices on top of everything.
    app.add_systems(EguiPrimaryContextPass, (
        progress_bar::progress_bar_system,
        quest_log::quest_log_system,
        quest_panel::quest_panel_system,
        notices::notices_system,
    ).chain());
}

/// Mount or unmount the floating panel to match the setting. Mutates only
/// on an actual transition, never on a steady state.
pub fn panel_visibility_system(settings: Res<QuestSettings>, mut panel: ResMut<PanelState>) {
    if settings.show_floating_panel != panel.is_mounted() {
        if settings.show_floating_panel {
            panel.mount();
        } else {
            panel.unmount();
        }
    }
}
