//! ThoughtQuest - note-taking gamification as a Bevy plugin: XP per saved
//! note, levels, one-shot achievements, and live progress views. Ships with
//! a demo notes host that stands in for the editor application.

// ============================================================================
// MODULES
// ============================================================================

pub mod constants;
pub mod host;
pub mod messages;
pub mod progression;
pub mod settings;
pub mod store;
pub mod ui;

// ============================================================================
// IMPORTS
// ============================================================================

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use messages::*;
use progression::QuestProgress;
use store::StoreState;
use ui::UiState;

// ============================================================================
// SYSTEM SETS
// ============================================================================

/// System execution phases on `Update`. Chained, so each phase sees the
/// previous phase's writes within the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Ingest,   // Edits and commands become progression changes
    Settings, // Setting messages reduce into QuestSettings
    View,     // Panel mounts, quest-log feed, notice expiry
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Palette entry. The host renders these; the plugin handles the ids.
#[derive(Clone, Copy, Debug)]
pub struct CommandDef {
    pub id: &'static str,
    pub name: &'static str,
}

/// Commands offered to the host's palette.
#[derive(Resource, Default)]
pub struct CommandRegistry {
    pub commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn register(&mut self, id: &'static str, name: &'static str) {
        self.commands.push(CommandDef { id, name });
    }
}

/// Handle invoked palette commands. Unknown ids are ignored.
pub fn handle_commands_system(
    mut invoked: MessageReader<CommandMsg>,
    progress: Res<QuestProgress>,
    mut ui_state: ResMut<UiState>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for msg in invoked.read() {
        match msg.id.as_str() {
            "check-status" => {
                let snap = progress.snapshot();
                notices.write(NoticeMsg::new(format!(
                    "Lv.{} | {} XP | {}/{} achievements",
                    snap.level,
                    snap.xp,
                    snap.unlocked_count(),
                    constants::ACHIEVEMENT_COUNT
                )));
            }
            "toggle-quest-log" => {
                ui_state.quest_log_open = !ui_state.quest_log_open;
            }
            other => debug!("Ignoring unknown command '{other}'"),
        }
    }
}

// ============================================================================
// PLUGIN
// ============================================================================

/// The gamification add-on: progression engine, persistence, and views.
/// Hosts write [`NoteEditedMsg`] / [`SettingChangedMsg`] / [`CommandMsg`]
/// in or before [`Step::Ingest`] and draw whatever surfaces they own around
/// the plugin's panels.
pub struct ThoughtQuestPlugin;

impl Plugin for ThoughtQuestPlugin {
    fn build(&self, app: &mut App) {
        // Only add EguiPlugin if the host app hasn't already
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        let mut registry = CommandRegistry::default();
        registry.register("check-status", "Check quest status");
        registry.register("toggle-quest-log", "Toggle quest log");

        app.add_message::<NoteEditedMsg>()
            .add_message::<SettingChangedMsg>()
            .add_message::<CommandMsg>()
            .add_message::<ProgressChangedMsg>()
            .add_message::<NoticeMsg>()
            .insert_resource(settings::load_settings())
            .insert_resource(registry)
            .init_resource::<QuestProgress>()
            .init_resource::<StoreState>()
            .configure_sets(Update, (Step::Ingest, Step::Settings, Step::View).chain())
            .add_systems(Startup, store::load_progress_system)
            .add_systems(Update, (
                progression::grant_xp_system,
                handle_commands_system,
            ).in_set(Step::Ingest))
            .add_systems(Update, settings::apply_setting_changes.in_set(Step::Settings))
            // Disk writes run last, after every mutation has landed
            .add_systems(Update, (
                settings::persist_settings_system,
                store::persist_progress_system,
            ).after(Step::View));

        ui::register_ui(app);
    }
}

/// Wire the full demo: plugin + notes host. The caller adds DefaultPlugins.
pub fn build_app(app: &mut App) {
    app.add_plugins(ThoughtQuestPlugin);
    host::register_host(app);
}

/// Build stamp baked in by build.rs.
pub fn get_build_info() -> String {
    let timestamp = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");
    let commit = option_env!("BUILD_COMMIT").unwrap_or("unknown");
    format!("BUILD: {} ({})", timestamp, commit)
}

// ============================================================================
// INTEGRATION TESTS - headless App, no window, no egui pass
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QuestSettings;
    use crate::store::ProgressRecord;
    use crate::ui::notices::NoticeQueue;
    use crate::ui::quest_log::QuestLog;
    use crate::ui::quest_panel::{PanelPhase, PanelPosition, PanelState};

    /// Message flow and Update systems only, none of the egui draw pass.
    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<NoteEditedMsg>()
            .add_message::<SettingChangedMsg>()
            .add_message::<CommandMsg>()
            .add_message::<ProgressChangedMsg>()
            .add_message::<NoticeMsg>()
            .init_resource::<Time>()
            .init_resource::<QuestProgress>()
            .init_resource::<QuestSettings>()
            .init_resource::<UiState>()
            .init_resource::<PanelState>()
            .init_resource::<QuestLog>()
            .init_resource::<NoticeQueue>()
            .configure_sets(Update, (Step::Ingest, Step::Settings, Step::View).chain())
            .add_systems(Update, (
                progression::grant_xp_system,
                handle_commands_system,
            ).in_set(Step::Ingest))
            .add_systems(Update, settings::apply_setting_changes.in_set(Step::Settings))
            .add_systems(Update, (
                ui::panel_visibility_system,
                ui::quest_log::quest_feed_system,
                ui::notices::notice_update_system,
            ).in_set(Step::View));
        app
    }

    fn save_notes(app: &mut App, count: u32) {
        for _ in 0..count {
            app.world_mut().write_message(NoteEditedMsg);
            app.update();
        }
    }

    #[test]
    fn edits_accumulate_xp_through_the_message_flow() {
        let mut app = test_app();
        save_notes(&mut app, 3);

        let progress = app.world().resource::<QuestProgress>();
        assert_eq!(progress.xp, 30);
        assert_eq!(progress.level, 0);
    }

    #[test]
    fn ten_default_edits_reach_level_one() {
        let mut app = test_app();
        save_notes(&mut app, 10);

        let progress = app.world().resource::<QuestProgress>();
        assert_eq!(progress.xp, 100);
        assert_eq!(progress.level, 1);
        // Level-up got a quest log line through the feed
        let log = app.world().resource::<QuestLog>();
        assert!(log.entries.iter().any(|e| e.message.contains("Lv.1")));
    }

    #[test]
    fn a_single_large_edit_crosses_levels_and_unlocks_in_order() {
        let mut app = test_app();
        app.world_mut().write_message(SettingChangedMsg::XpPerEdit(550));
        app.update();

        save_notes(&mut app, 1);
        let progress = app.world().resource::<QuestProgress>();
        assert_eq!(progress.xp, 550);
        assert_eq!(progress.level, 5);
        assert_eq!(progress.unlocked, [true, true, false, false]);
    }

    #[test]
    fn reconfigure_recomputes_level_but_never_touches_unlocks() {
        let mut app = test_app();
        save_notes(&mut app, 34); // 340 XP, Lv.3, first-edit unlocked

        app.world_mut().write_message(SettingChangedMsg::XpPerLevel(200));
        app.update();

        let progress = app.world().resource::<QuestProgress>();
        assert_eq!(progress.xp, 340);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.unlocked, [true, false, false, false]);

        // Zero is invalid: the reducer keeps the last valid value
        app.world_mut().write_message(SettingChangedMsg::XpPerLevel(0));
        app.update();
        assert_eq!(app.world().resource::<QuestSettings>().xp_per_level, 200);
        assert_eq!(app.world().resource::<QuestProgress>().level, 1);
    }

    #[test]
    fn unlocks_survive_a_reload_round_trip() {
        let mut app = test_app();
        app.world_mut().write_message(SettingChangedMsg::XpPerEdit(550));
        app.update();
        save_notes(&mut app, 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        {
            let progress = app.world().resource::<QuestProgress>();
            let record = ProgressRecord::from_state(progress, &PanelPosition::default());
            store::write_progress_to(&record, &path).unwrap();
        }

        let loaded = store::read_progress_from(&path).unwrap();
        let mut restored = QuestProgress::default();
        loaded.apply_to(&mut restored);
        restored.rebuild(&QuestSettings::default());

        assert_eq!(restored.snapshot(), app.world().resource::<QuestProgress>().snapshot());

        // Reload again: rebuild is idempotent, nothing re-locks
        restored.rebuild(&QuestSettings::default());
        assert_eq!(restored.unlocked, [true, true, false, false]);
    }

    #[test]
    fn dragged_panel_position_survives_persistence() {
        let mut app = test_app();
        app.update(); // default settings mount the panel

        {
            let mut panel = app.world_mut().resource_mut::<PanelState>();
            assert!(panel.is_mounted());
            panel.pointer_down(Vec2::new(1000.0, 30.0), Vec2::new(990.0, 24.0));
            panel.pointer_move(Vec2::new(210.0, 56.0));
            assert_eq!(panel.pointer_up(), Some(PanelPosition::Absolute { top: 50.0, left: 200.0 }));
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        {
            let progress = app.world().resource::<QuestProgress>();
            let panel = app.world().resource::<PanelState>();
            let record = ProgressRecord::from_state(progress, &panel.saved_position);
            store::write_progress_to(&record, &path).unwrap();
        }

        let loaded = store::read_progress_from(&path).unwrap();
        let mut fresh = PanelState::default();
        fresh.saved_position = loaded.panel_position.to_position();
        fresh.mount();
        assert_eq!(fresh.position, PanelPosition::Absolute { top: 50.0, left: 200.0 });
    }

    #[test]
    fn panel_toggles_mount_and_unmount_without_accumulation() {
        let mut app = test_app();
        app.update();
        assert!(app.world().resource::<PanelState>().is_mounted());

        for _ in 0..3 {
            app.world_mut().write_message(SettingChangedMsg::ShowFloatingPanel(false));
            app.update();
            let panel = app.world().resource::<PanelState>();
            assert_eq!(panel.phase, PanelPhase::Unmounted);

            app.world_mut().write_message(SettingChangedMsg::ShowFloatingPanel(true));
            app.update();
            let panel = app.world().resource::<PanelState>();
            assert_eq!(panel.phase, PanelPhase::Idle);
        }
    }

    #[test]
    fn progress_bar_toggle_round_trips_through_the_reducer() {
        let mut app = test_app();
        app.world_mut().write_message(SettingChangedMsg::ShowProgressBar(false));
        app.update();
        assert!(!app.world().resource::<QuestSettings>().show_progress_bar);

        app.world_mut().write_message(SettingChangedMsg::ShowProgressBar(true));
        app.update();
        assert!(app.world().resource::<QuestSettings>().show_progress_bar);
    }

    #[test]
    fn commands_toggle_views_and_report_status() {
        let mut app = test_app();
        save_notes(&mut app, 1);

        app.world_mut().write_message(CommandMsg { id: "toggle-quest-log".into() });
        app.update();
        assert!(app.world().resource::<UiState>().quest_log_open);

        app.world_mut().write_message(CommandMsg { id: "toggle-quest-log".into() });
        app.update();
        assert!(!app.world().resource::<UiState>().quest_log_open);

        app.world_mut().write_message(CommandMsg { id: "check-status".into() });
        app.update();
        let queue = app.world().resource::<NoticeQueue>();
        assert!(queue.notices.iter().any(|n| n.text.contains("Lv.0") && n.text.contains("10 XP")));

        // Unknown ids are ignored
        app.world_mut().write_message(CommandMsg { id: "not-a-command".into() });
        app.update();
    }
}
