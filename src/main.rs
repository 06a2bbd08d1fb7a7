use bevy::prelude::*;

mod audio;
mod components;
mod game;
mod settings;
mod shooting;
mod target;
mod visual_effects;

use audio::GameAudioPlugin;
use game::{GamePlugin, SCREEN_WIDTH, SCREEN_HEIGHT};
use settings::SettingsPlugin;
use shooting::ShootingPlugin;
use target::TargetPlugin;
use visual_effects::VisualEffectsPlugin;

#[derive(Component)]
pub struct MainCamera;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Target Practice".into(),
                resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            GamePlugin,
            SettingsPlugin,
            TargetPlugin,
            ShootingPlugin,
            VisualEffectsPlugin,
            GameAudioPlugin,
        ))
        .add_systems(Startup, setup_global_camera)
        .run();
}

fn setup_global_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.transform.translation.z = 999.0;
    commands.spawn((camera_bundle, MainCamera));
}
