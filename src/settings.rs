use bevy::prelude::*;
use crate::game::AppState;

// Presentation preference for targets: textured image card when true,
// plain silhouette model when false.
#[derive(Resource)]
pub struct GameSettings {
    pub show_target_images: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            show_target_images: true,
        }
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<GameSettings>()
            .add_systems(Update,
                toggle_presentation_mode.run_if(in_state(AppState::InGame))
            );
    }
}

fn toggle_presentation_mode(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<GameSettings>,
) {
    if keyboard_input.just_pressed(KeyCode::Tab) {
        settings.show_target_images = !settings.show_target_images;
        info!(
            "target presentation: {}",
            if settings.show_target_images { "images" } else { "models" }
        );
    }
}
