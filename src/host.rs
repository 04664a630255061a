//! Demo notes host — the note-taking app the quest plugin rides along with.
//! A plain text editor whose save action is the edit signal, plus the host
//! surfaces: toolbar, command palette (F1), and the settings window.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::constants::{ACHIEVEMENT_COUNT, MIN_XP_SETTING};
use crate::messages::{CommandMsg, NoteEditedMsg, SettingChangedMsg};
use crate::progression::QuestProgress;
use crate::settings::QuestSettings;
use crate::{CommandRegistry, Step, get_build_info, ui};

/// Editor buffer + host window flags.
#[derive(Resource, Default)]
pub struct NotesHost {
    pub draft: String,
    /// Saves this session; a status-line counter, not the XP counter.
    pub saves_this_session: u32,
    pub palette_open: bool,
    pub settings_open: bool,
}

/// Register the host: editor, toolbar, palette, settings, shortcuts.
pub fn register_host(app: &mut App) {
    app.init_resource::<NotesHost>();

    // Shortcuts run before ingest so Ctrl+S grants XP in the same frame
    app.add_systems(Update, host_shortcut_system.before(Step::Ingest));

    // Top toolbar and the plugin's bottom strips claim their space first,
    // then the central editor takes whatever is left.
    app.add_systems(EguiPrimaryContextPass, (
        toolbar_system,
        editor_system,
        palette_system,
        settings_window_system,
    ).chain().after(ui::quest_log::quest_log_system));
}

/// One saved note = one edit notification to the progression side.
fn save_note(host: &mut NotesHost, edits: &mut MessageWriter<NoteEditedMsg>) {
    host.saves_this_session = host.saves_this_session.saturating_add(1);
    edits.write(NoteEditedMsg);
    debug!("Note saved ({} this session)", host.saves_this_session);
}

/// Ctrl+S saves, F1 toggles the palette, ESC closes host windows.
pub fn host_shortcut_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut host: ResMut<NotesHost>,
    mut edits: MessageWriter<NoteEditedMsg>,
) {
    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    if ctrl && keys.just_pressed(KeyCode::KeyS) {
        save_note(&mut host, &mut edits);
    }
    if keys.just_pressed(KeyCode::F1) {
        host.palette_open = !host.palette_open;
    }
    if keys.just_pressed(KeyCode::Escape) && (host.palette_open || host.settings_open) {
        host.palette_open = false;
        host.settings_open = false;
    }
}

/// Top toolbar — save/commands/settings buttons plus the build stamp.
pub fn toolbar_system(
    mut contexts: EguiContexts,
    mut host: ResMut<NotesHost>,
    progress: Res<QuestProgress>,
    mut edits: MessageWriter<NoteEditedMsg>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut copy_text: Option<String> = None;

    egui::TopBottomPanel::top("host_toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("ThoughtQuest Notes").strong());
            ui.separator();
            if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                save_note(&mut host, &mut edits);
            }
            if ui.button("Commands").on_hover_text("F1").clicked() {
                host.palette_open = !host.palette_open;
            }
            if ui.button("Settings").clicked() {
                host.settings_open = !host.settings_open;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Copy Status").clicked() {
                    let snap = progress.snapshot();
                    copy_text = Some(format!(
                        "{}\nLv.{} | {} XP | {}/{} achievements | {} saves this session\n",
                        get_build_info(),
                        snap.level,
                        snap.xp,
                        snap.unlocked_count(),
                        ACHIEVEMENT_COUNT,
                        host.saves_this_session,
                    ));
                }
                ui.label(egui::RichText::new(get_build_info()).size(11.0).weak());
            });
        });
    });

    if let Some(text) = copy_text {
        info!("Copy button clicked, {} bytes", text.len());
        match arboard::Clipboard::new() {
            Ok(mut cb) => match cb.set_text(text) {
                Ok(_) => info!("Clipboard: text copied successfully"),
                Err(e) => error!("Clipboard: set_text failed: {e}"),
            },
            Err(e) => error!("Clipboard: failed to open: {e}"),
        }
    }

    Ok(())
}

/// The editor itself. Claims whatever space the panels left over.
pub fn editor_system(
    mut contexts: EguiContexts,
    mut host: ResMut<NotesHost>,
    settings: Res<QuestSettings>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Draft note").weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let words = host.draft.split_whitespace().count();
                ui.small(format!(
                    "{} words | {} saved | +{} XP per save",
                    words, host.saves_this_session, settings.xp_per_edit
                ));
            });
        });
        ui.add_space(4.0);
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.add_sized(
                ui.available_size(),
                egui::TextEdit::multiline(&mut host.draft)
                    .hint_text("Write a thought, then Ctrl+S to bank it"),
            );
        });
    });

    Ok(())
}

/// Command palette — every command the plugin registered, one button each.
pub fn palette_system(
    mut contexts: EguiContexts,
    mut host: ResMut<NotesHost>,
    registry: Res<CommandRegistry>,
    mut invoked: MessageWriter<CommandMsg>,
) -> Result {
    if !host.palette_open { return Ok(()); }

    let ctx = contexts.ctx_mut()?;
    let mut open = true;
    let mut picked: Option<&'static str> = None;

    egui::Window::new("Commands")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(280.0)
        .show(ctx, |ui| {
            for cmd in &registry.commands {
                if ui.button(cmd.name).clicked() {
                    picked = Some(cmd.id);
                }
            }
            ui.add_space(4.0);
            ui.small("F1 toggles, ESC closes");
        });

    if let Some(id) = picked {
        invoked.write(CommandMsg { id: id.to_string() });
        host.palette_open = false;
    }
    if !open {
        host.palette_open = false;
    }

    Ok(())
}

/// Host settings form. Widgets edit local copies; each change goes out as
/// a message so the reducer stays the only writer of `QuestSettings`.
pub fn settings_window_system(
    mut contexts: EguiContexts,
    mut host: ResMut<NotesHost>,
    settings: Res<QuestSettings>,
    mut changes: MessageWriter<SettingChangedMsg>,
) -> Result {
    if !host.settings_open { return Ok(()); }

    let ctx = contexts.ctx_mut()?;
    let mut open = true;

    egui::Window::new("Quest Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("XP per edit:").on_hover_text("XP granted for every saved note.");
                let mut v = settings.xp_per_edit;
                if ui.add(egui::DragValue::new(&mut v).range(MIN_XP_SETTING..=1000)).changed() {
                    changes.write(SettingChangedMsg::XpPerEdit(v));
                }
            });
            ui.horizontal(|ui| {
                ui.label("XP per level:").on_hover_text("Level = total XP divided by this.");
                let mut v = settings.xp_per_level;
                if ui.add(egui::DragValue::new(&mut v).range(MIN_XP_SETTING..=100_000)).changed() {
                    changes.write(SettingChangedMsg::XpPerLevel(v));
                }
            });
            ui.add_space(4.0);
            let mut bar = settings.show_progress_bar;
            if ui.checkbox(&mut bar, "Show progress bar").changed() {
                changes.write(SettingChangedMsg::ShowProgressBar(bar));
            }
            let mut panel = settings.show_floating_panel;
            if ui.checkbox(&mut panel, "Show floating panel").changed() {
                changes.write(SettingChangedMsg::ShowFloatingPanel(panel));
            }
        });

    if !open {
        host.settings_open = false;
    }

    Ok(())
}
