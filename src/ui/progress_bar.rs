//! Bottom progress strip — XP into the current level, gone entirely when off.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::progression::QuestProgress;
use crate::settings::QuestSettings;

/// Fraction of the way from the current level to the next, in `[0, 1)`.
pub fn fill_fraction(xp: u32, xp_per_level: u32) -> f32 {
    if xp_per_level == 0 { return 0.0; }
    (xp % xp_per_level) as f32 / xp_per_level as f32
}

/// Draw the bar. Immediate mode: when hidden nothing is drawn and nothing
/// lingers, so toggling the setting can never stack stale bars.
pub fn progress_bar_system(
    mut contexts: EguiContexts,
    progress: Res<QuestProgress>,
    settings: Res<QuestSettings>,
) -> Result {
    if !settings.show_progress_bar { return Ok(()); }

    let ctx = contexts.ctx_mut()?;
    let snap = progress.snapshot();
    let frac = fill_fraction(snap.xp, settings.xp_per_level);
    let into_level = if settings.xp_per_level == 0 { 0 } else { snap.xp % settings.xp_per_level };

    egui::TopBottomPanel::bottom("progress_bar")
        .exact_height(28.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(egui::RichText::new(format!("Lv.{}", snap.level))
                    .strong()
                    .color(egui::Color32::from_rgb(220, 160, 40)));
                ui.add(egui::ProgressBar::new(frac)
                    .text(format!("{}/{} XP", into_level, settings.xp_per_level))
                    .fill(egui::Color32::from_rgb(80, 180, 255)));
            });
        });

    Ok(())
}
