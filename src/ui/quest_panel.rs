//! Floating quest panel — draggable XP/level card, mounted only while enabled.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::{ACHIEVEMENT_COUNT, PANEL_DEFAULT_RIGHT, PANEL_DEFAULT_TOP};
use crate::progression::QuestProgress;

// ============================================================================
// POSITION & PHASE
// ============================================================================

/// Where the panel sits. The variants are mutually exclusive: the panel
/// hangs off the right edge until the first drag converts it to absolute
/// coordinates, and it never converts back on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelPosition {
    /// Offsets from the window's top-right corner.
    Anchored { top: f32, right: f32 },
    /// Offsets from the window's top-left corner.
    Absolute { top: f32, left: f32 },
}

impl Default for PanelPosition {
    fn default() -> Self {
        Self::Anchored { top: PANEL_DEFAULT_TOP, right: PANEL_DEFAULT_RIGHT }
    }
}

/// Panel lifecycle. Pointer input is only read while mounted, so an
/// unmounted panel cannot react to anything.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PanelPhase {
    #[default]
    Unmounted,
    Idle,
    /// Header grabbed; `grab` is the pointer's offset from the panel's
    /// top-left corner at grab time.
    Dragging { grab: Vec2 },
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Mount state and position of the floating panel. Plain methods so the
/// drag logic is testable without a window.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PanelState {
    pub phase: PanelPhase,
    /// Live position while mounted.
    pub position: PanelPosition,
    /// Last persisted position; re-applied on every mount so the panel
    /// never flashes at the default spot first.
    pub saved_position: PanelPosition,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            phase: PanelPhase::Unmounted,
            position: PanelPosition::default(),
            saved_position: PanelPosition::default(),
        }
    }
}

impl PanelState {
    pub fn is_mounted(&self) -> bool {
        !matches!(self.phase, PanelPhase::Unmounted)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, PanelPhase::Dragging { .. })
    }

    /// `Unmounted -> Idle`. Applies the saved position before the first
    /// draw. No-op while already mounted.
    pub fn mount(&mut self) {
        if matches!(self.phase, PanelPhase::Unmounted) {
            self.position = self.saved_position;
            self.phase = PanelPhase::Idle;
        }
    }

    /// Back to `Unmounted` from any phase. An in-flight drag is dropped
    /// without persisting; the next mount restores the saved position.
    pub fn unmount(&mut self) {
        self.phase = PanelPhase::Unmounted;
    }

    /// `Idle -> Dragging`. Captures the pointer's offset inside the panel
    /// so the panel does not snap its corner under the cursor.
    pub fn pointer_down(&mut self, pointer: Vec2, panel_top_left: Vec2) {
        if matches!(self.phase, PanelPhase::Idle) {
            self.phase = PanelPhase::Dragging { grab: pointer - panel_top_left };
        }
    }

    /// Repositions while dragging. The position turns absolute on the
    /// first move; the old edge anchor is gone for good.
    pub fn pointer_move(&mut self, pointer: Vec2) {
        if let PanelPhase::Dragging { grab } = self.phase {
            let origin = pointer - grab;
            self.position = PanelPosition::Absolute { top: origin.y, left: origin.x };
        }
    }

    /// `Dragging -> Idle`. Returns the position to persist, `None` when no
    /// drag was in flight.
    pub fn pointer_up(&mut self) -> Option<PanelPosition> {
        if self.is_dragging() {
            self.phase = PanelPhase::Idle;
            self.saved_position = self.position;
            Some(self.saved_position)
        } else {
            None
        }
    }
}

// ============================================================================
// BEVY SYSTEMS
// ============================================================================

/// Draw the floating panel and feed header drags into the state machine.
pub fn quest_panel_system(
    mut contexts: EguiContexts,
    mut panel: ResMut<PanelState>,
    progress: Res<QuestProgress>,
) -> Result {
    // Unmounted: nothing drawn, no input read
    if !panel.is_mounted() { return Ok(()); }

    let ctx = contexts.ctx_mut()?;
    let snap = progress.snapshot();

    let area = egui::Area::new(egui::Id::new("quest_panel"));
    let area = match panel.position {
        PanelPosition::Anchored { top, right } => {
            area.anchor(egui::Align2::RIGHT_TOP, [-right, top])
        }
        PanelPosition::Absolute { top, left } => area.fixed_pos(egui::pos2(left, top)),
    };

    let shown = area.show(ctx, |ui| {
        egui::Frame::new()
            .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 25, 220))
            .corner_radius(6.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                let header = ui.add(
                    egui::Label::new(
                        egui::RichText::new("ThoughtQuest")
                            .strong()
                            .size(13.0)
                            .color(egui::Color32::from_rgb(230, 230, 210)),
                    )
                    .sense(egui::Sense::drag()),
                );
                ui.separator();
                ui.label(egui::RichText::new(format!("Lv.{}", snap.level))
                    .size(16.0)
                    .color(egui::Color32::from_rgb(220, 160, 40)));
                ui.label(egui::RichText::new(format!("{} XP", snap.xp))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(180, 180, 180)));
                ui.label(egui::RichText::new(format!(
                        "Achievements {}/{}",
                        snap.unlocked_count(),
                        ACHIEVEMENT_COUNT
                    ))
                    .size(11.0)
                    .color(egui::Color32::from_rgb(100, 100, 120)));
                header
            })
            .inner
    });

    // Drag the whole panel by its header. The drawn rect lags the pointer
    // by one frame, which is invisible at redraw rates.
    let header = shown.inner;
    let top_left = Vec2::new(shown.response.rect.min.x, shown.response.rect.min.y);
    if header.drag_started() {
        if let Some(p) = header.interact_pointer_pos() {
            panel.pointer_down(Vec2::new(p.x, p.y), top_left);
        }
    } else if header.dragged() {
        if let Some(p) = header.interact_pointer_pos() {
            panel.pointer_move(Vec2::new(p.x, p.y));
        }
    }
    if header.drag_stopped() {
        if let Some(pos) = panel.pointer_up() {
            debug!("Quest panel dropped at {:?}", pos);
        }
    }

    Ok(())
}
