use bevy::{prelude::*, window::PrimaryWindow};
use crate::{
    components::Health,
    game::{AppState, GameState},
    target::{
        BodyPart, HitOutcome, RespawnTimer, Target, TargetDamagedEvent, TargetDestroyedEvent,
        RESPAWN_DELAY_SECONDS,
    },
    visual_effects::spawn_damage_text,
    audio::{PlaySoundEvent, SoundEffect},
    MainCamera,
};

const CROSSHAIR_SIZE: Vec2 = Vec2::new(32.0, 32.0);
const CROSSHAIR_Z: f32 = 10.0;
const DESTROY_SCORE_BONUS: u32 = 50;

#[derive(Event)]
pub struct ShotFired {
    pub aim_point: Vec2,
}

#[derive(Component)]
pub struct Crosshair;

pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<ShotFired>()
            .add_systems(OnEnter(AppState::InGame),
                spawn_crosshair.run_if(no_crosshair_exists)
            )
            .add_systems(Update, (
                update_crosshair,
                fire_weapon,
                resolve_shots,
            ).chain().run_if(in_state(AppState::InGame)))
            .add_systems(OnExit(AppState::InGame), despawn_crosshair);
    }
}

fn no_crosshair_exists(crosshair_query: Query<(), With<Crosshair>>) -> bool {
    crosshair_query.is_empty()
}

fn spawn_crosshair(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        SpriteBundle {
            texture: asset_server.load("sprites/crosshair.png"),
            sprite: Sprite { custom_size: Some(CROSSHAIR_SIZE), ..default() },
            transform: Transform::from_xyz(0.0, 0.0, CROSSHAIR_Z),
            ..default()
        },
        Crosshair,
        Name::new("Crosshair"),
    ));
}

fn despawn_crosshair(mut commands: Commands, crosshair_query: Query<Entity, With<Crosshair>>) {
    for entity in crosshair_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn cursor_world_position(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Vec2> {
    let window = window_query.get_single().ok()?;
    let (camera, camera_transform) = camera_query.get_single().ok()?;
    let cursor_position = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor_position)
}

fn update_crosshair(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut crosshair_query: Query<&mut Transform, With<Crosshair>>,
) {
    let Some(world_position) = cursor_world_position(&window_query, &camera_query) else { return };
    for mut transform in crosshair_query.iter_mut() {
        transform.translation = world_position.extend(CROSSHAIR_Z);
    }
}

fn fire_weapon(
    mouse_input: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut game_state: ResMut<GameState>,
    mut shot_event_writer: EventWriter<ShotFired>,
    mut sound_event_writer: EventWriter<PlaySoundEvent>,
) {
    if !mouse_input.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(aim_point) = cursor_world_position(&window_query, &camera_query) else { return };

    game_state.shots_fired += 1;
    sound_event_writer.send(PlaySoundEvent(SoundEffect::Shoot));
    shot_event_writer.send(ShotFired { aim_point });
}

// The collision query: each shot resolves to at most one (target, part)
// pair, picking the nearest active target whose zone contains the point.
pub fn resolve_shots(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut shot_events: EventReader<ShotFired>,
    mut target_query: Query<(Entity, &Transform, &mut Target, &mut Health)>,
    mut game_state: ResMut<GameState>,
    mut sound_event_writer: EventWriter<PlaySoundEvent>,
    mut damaged_event_writer: EventWriter<TargetDamagedEvent>,
    mut destroyed_event_writer: EventWriter<TargetDestroyedEvent>,
) {
    for shot in shot_events.read() {
        let mut nearest: Option<(Entity, BodyPart, f32)> = None;
        for (entity, transform, target, _health) in target_query.iter() {
            if !target.is_active {
                continue;
            }
            let local_point = shot.aim_point - transform.translation.truncate();
            let Some(part) = BodyPart::hit_test(local_point) else { continue };
            let distance_sq = local_point.length_squared();
            if nearest.map_or(true, |(_, _, best)| distance_sq < best) {
                nearest = Some((entity, part, distance_sq));
            }
        }

        let Some((entity, part, _)) = nearest else { continue };
        let Ok((_, _, mut target, mut health)) = target_query.get_mut(entity) else { continue };

        match target.resolve_hit(&mut health, part, shot.aim_point) {
            HitOutcome::Ignored => {}
            HitOutcome::Damaged { damage, impact_point, remaining_health_fraction } => {
                game_state.hits += 1;
                game_state.score += damage as u32;
                sound_event_writer.send(PlaySoundEvent(SoundEffect::TargetHit));
                spawn_damage_text(&mut commands, &asset_server, impact_point.extend(5.0), damage);
                damaged_event_writer.send(TargetDamagedEvent {
                    target: entity,
                    health_fraction: remaining_health_fraction,
                });
            }
            HitOutcome::Lethal { damage, impact_point } => {
                game_state.hits += 1;
                game_state.targets_destroyed += 1;
                game_state.score += damage as u32 + DESTROY_SCORE_BONUS;
                info!("target destroyed by a {} hit", part.zone_name());
                sound_event_writer.send(PlaySoundEvent(SoundEffect::TargetDestroyed));
                spawn_damage_text(&mut commands, &asset_server, impact_point.extend(5.0), damage);
                commands.entity(entity).insert(RespawnTimer(Timer::from_seconds(
                    RESPAWN_DELAY_SECONDS,
                    TimerMode::Once,
                )));
                destroyed_event_writer.send(TargetDestroyedEvent { target: entity });
            }
        }
    }
}
