//! Transient notices — short-lived toasts stacked at the bottom-right.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::{NOTICE_LIFETIME_SECS, NOTICE_MAX_VISIBLE};
use crate::messages::NoticeMsg;

#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    /// Elapsed-time stamp past which the notice disappears.
    pub expires_at: f64,
}

#[derive(Resource, Default)]
pub struct NoticeQueue {
    pub notices: Vec<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, text: String, now: f64) {
        self.notices.push(Notice { text, expires_at: now + NOTICE_LIFETIME_SECS });
        if self.notices.len() > NOTICE_MAX_VISIBLE {
            let excess = self.notices.len() - NOTICE_MAX_VISIBLE;
            self.notices.drain(0..excess);
        }
    }

    pub fn expire(&mut self, now: f64) {
        self.notices.retain(|n| n.expires_at > now);
    }
}

// ============================================================================
// BEVY SYSTEMS
// ============================================================================

/// Collect incoming notices and drop the ones past their lifetime.
pub fn notice_update_system(
    mut messages: MessageReader<NoticeMsg>,
    time: Res<Time>,
    mut queue: ResMut<NoticeQueue>,
) {
    let now = time.elapsed_secs_f64();
    for msg in messages.read() {
        queue.push(msg.text.clone(), now);
    }
    // Mutate only when something actually expired
    if queue.notices.iter().any(|n| n.expires_at <= now) {
        queue.expire(now);
    }
}

/// Overlay in the bottom-right corner. Never takes pointer input.
pub fn notices_system(mut contexts: EguiContexts, queue: Res<NoticeQueue>) -> Result {
    if queue.notices.is_empty() { return Ok(()); }

    let ctx = contexts.ctx_mut()?;

    egui::Area::new(egui::Id::new("notices"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .interactable(false)
        .show(ctx, |ui| {
            for notice in &queue.notices {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 25, 220))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&notice.text)
                            .size(13.0)
                            .color(egui::Color32::from_rgb(230, 230, 210)));
                    });
                ui.add_space(4.0);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_their_lifetime() {
        let mut queue = NoticeQueue::default();
        queue.push("saved".into(), 0.0);

        queue.expire(NOTICE_LIFETIME_SECS - 0.5);
        assert_eq!(queue.notices.len(), 1);

        queue.expire(NOTICE_LIFETIME_SECS + 0.1);
        assert!(queue.notices.is_empty());
    }

    #[test]
    fn queue_keeps_only_the_newest_when_full() {
        let mut queue = NoticeQueue::default();
        for i in 0..(NOTICE_MAX_VISIBLE + 2) {
            queue.push(format!("notice {i}"), 0.0);
        }
        assert_eq!(queue.notices.len(), NOTICE_MAX_VISIBLE);
        assert_eq!(queue.notices[0].text, "notice 2");
    }

    #[test]
    fn expiry_preserves_arrival_order_of_survivors() {
        let mut queue = NoticeQueue::default();
        queue.push("old".into(), 0.0);
        queue.push("mid".into(), 1.0);
        queue.push("new".into(), 2.0);

        queue.expire(NOTICE_LIFETIME_SECS + 0.5);
        let texts: Vec<&str> = queue.notices.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, ["mid", "new"]);
    }
}
