use bevy::prelude::*;
use crate::components::{Lifetime, Velocity};

const DAMAGE_TEXT_LIFETIME_SECONDS: f32 = 0.8;
const DAMAGE_TEXT_RISE_SPEED: f32 = 40.0;

#[derive(Component)]
pub struct DamageText;

pub struct VisualEffectsPlugin;

impl Plugin for VisualEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            damage_text_movement_system,
            damage_text_fade_system,
        ).chain());
    }
}

pub fn spawn_damage_text(
    commands: &mut Commands,
    asset_server: &Res<AssetServer>,
    position: Vec3,
    amount: i32,
) {
    commands.spawn((
        Text2dBundle {
            text: Text::from_section(
                format!("{}", amount),
                TextStyle {
                    font: asset_server.load("fonts/FiraSans-Bold.ttf"),
                    font_size: 24.0,
                    color: Color::YELLOW,
                },
            ),
            transform: Transform::from_translation(position),
            ..default()
        },
        DamageText,
        Velocity(Vec2::Y * DAMAGE_TEXT_RISE_SPEED),
        Lifetime { timer: Timer::from_seconds(DAMAGE_TEXT_LIFETIME_SECONDS, TimerMode::Once) },
        Name::new("DamageText"),
    ));
}

fn damage_text_movement_system(
    mut query: Query<(&mut Transform, &Velocity), With<DamageText>>,
    time: Res<Time>,
) {
    for (mut transform, velocity) in query.iter_mut() {
        transform.translation.x += velocity.0.x * time.delta_seconds();
        transform.translation.y += velocity.0.y * time.delta_seconds();
    }
}

fn damage_text_fade_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime, &mut Text), With<DamageText>>,
) {
    for (entity, mut lifetime, mut text) in query.iter_mut() {
        lifetime.timer.tick(time.delta());
        if lifetime.timer.just_finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let remaining = lifetime.timer.fraction_remaining();
        for section in text.sections.iter_mut() {
            section.style.color.set_a(remaining);
        }
    }
}
