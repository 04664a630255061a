//! ThoughtQuest - gamified note taking with Bevy ECS and egui.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::prelude::*;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "ThoughtQuest Notes".into(),
            resolution: (1280, 720).into(),
            ..default()
        }),
        ..default()
    }));

    // Cap the redraw rate; a notes window has no business rendering faster
    app.add_plugins(bevy_framepace::FramepacePlugin);
    app.insert_resource(bevy_framepace::FramepaceSettings {
        limiter: bevy_framepace::Limiter::from_framerate(60.0),
    });

    // Wire up the quest plugin and its demo host
    thoughtquest::build_app(&mut app);

    // Maximize window on startup
    app.add_systems(Startup, |mut windows: Query<&mut Window>| {
        if let Ok(mut window) = windows.single_mut() {
            window.set_maximized(true);
        }
    });

    app.run();
}
