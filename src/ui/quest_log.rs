//! Quest log — scrollable feed of level-ups and unlocks. Session-only,
//! never persisted.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::ACHIEVEMENTS;
use crate::messages::ProgressChangedMsg;
use crate::ui::UiState;

/// Oldest entries are dropped past this point.
const LOG_CAP: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuestEventKind {
    LevelUp,
    Unlock,
}

#[derive(Clone, Debug)]
pub struct QuestEvent {
    pub kind: QuestEventKind,
    /// Seconds since app start.
    pub at_secs: f64,
    pub message: String,
}

#[derive(Resource, Default)]
pub struct QuestLog {
    pub entries: Vec<QuestEvent>,
}

impl QuestLog {
    pub fn push(&mut self, kind: QuestEventKind, at_secs: f64, message: String) {
        self.entries.push(QuestEvent { kind, at_secs, message });
        if self.entries.len() > LOG_CAP {
            let excess = self.entries.len() - LOG_CAP;
            self.entries.drain(0..excess);
        }
    }
}

fn format_elapsed(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

// ============================================================================
// BEVY SYSTEMS
// ============================================================================

/// Turn progression results into log lines.
pub fn quest_feed_system(
    mut changed: MessageReader<ProgressChangedMsg>,
    time: Res<Time>,
    mut log: ResMut<QuestLog>,
) {
    for msg in changed.read() {
        let now = time.elapsed_secs_f64();
        if msg.result.leveled_up {
            log.push(
                QuestEventKind::LevelUp,
                now,
                format!("Level up! Lv.{} at {} XP", msg.result.level, msg.result.xp),
            );
        }
        for &slot in &msg.result.newly_unlocked {
            let def = &ACHIEVEMENTS[slot];
            log.push(QuestEventKind::Unlock, now, format!("{}: {}", def.title, def.description));
        }
    }
}

/// Bottom feed panel, toggled from the command palette.
pub fn quest_log_system(
    mut contexts: EguiContexts,
    ui_state: Res<UiState>,
    log: Res<QuestLog>,
) -> Result {
    if !ui_state.quest_log_open { return Ok(()); }

    let ctx = contexts.ctx_mut()?;

    egui::TopBottomPanel::bottom("quest_log")
        .default_height(120.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Quest Log").strong());
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if log.entries.is_empty() {
                        ui.weak("No quest activity yet");
                        return;
                    }
                    for entry in &log.entries {
                        let color = match entry.kind {
                            QuestEventKind::LevelUp => egui::Color32::from_rgb(80, 180, 255),
                            QuestEventKind::Unlock => egui::Color32::from_rgb(220, 160, 40),
                        };
                        ui.horizontal(|ui| {
                            ui.small(format_elapsed(entry.at_secs));
                            ui.colored_label(color, &entry.message);
                        });
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_entries_in_arrival_order() {
        let mut log = QuestLog::default();
        log.push(QuestEventKind::Unlock, 1.0, "first".into());
        log.push(QuestEventKind::LevelUp, 2.0, "second".into());

        let messages: Vec<&str> = log.entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn log_drops_oldest_entries_past_the_cap() {
        let mut log = QuestLog::default();
        for i in 0..(LOG_CAP + 10) {
            log.push(QuestEventKind::LevelUp, i as f64, format!("entry {i}"));
        }
        assert_eq!(log.entries.len(), LOG_CAP);
        assert_eq!(log.entries[0].message, "entry 10");
    }

    #[test]
    fn elapsed_formats_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(0.0), "00:00");
        assert_eq!(format_elapsed(64.2), "01:04");
        assert_eq!(format_elapsed(3605.0), "60:05");
    }
}
