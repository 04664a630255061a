//! ECS Messages - the host-facing surface of the plugin.
//!
//! The host app (the demo notes editor here, a real note-taking app in
//! production) only ever talks to the plugin by writing these messages;
//! the plugin answers by updating its resources and writing back
//! `ProgressChangedMsg` / `NoticeMsg`.

use bevy::prelude::Message;

use crate::progression::EditResult;

// ============================================================================
// HOST -> PLUGIN
// ============================================================================

/// One qualifying edit happened in the host editor. Carries no payload:
/// the XP value comes from settings at grant time.
#[derive(Message, Clone)]
pub struct NoteEditedMsg;

/// A single settings field changed in the host settings form. All settings
/// writes funnel through this message so exactly one system mutates
/// `QuestSettings`.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum SettingChangedMsg {
    XpPerEdit(u32),
    XpPerLevel(u32),
    ShowProgressBar(bool),
    ShowFloatingPanel(bool),
}

/// A palette command was invoked. Unknown ids are ignored.
#[derive(Message, Clone)]
pub struct CommandMsg {
    pub id: String,
}

// ============================================================================
// PLUGIN -> HOST (and plugin-internal fanout)
// ============================================================================

/// Broadcast after every XP grant with the full outcome of that edit.
/// The quest log feed and tests consume this; views read the resource
/// directly each frame.
#[derive(Message, Clone)]
pub struct ProgressChangedMsg {
    pub result: EditResult,
}

/// Request a transient on-screen notice (level-ups, unlocks, command
/// output). Drained into the notice queue once per frame.
#[derive(Message, Clone)]
pub struct NoticeMsg {
    pub text: String,
}

impl NoticeMsg {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
