use bevy::prelude::*;
use rand::seq::SliceRandom;
use crate::{
    components::Health,
    game::AppState,
    settings::GameSettings,
    audio::{PlaySoundEvent, SoundEffect},
    shooting::resolve_shots,
};

pub const TARGET_MAX_HEALTH: i32 = 100;
pub const RESPAWN_DELAY_SECONDS: f32 = 3.0;

const TARGET_POSITIONS: [Vec2; 3] = [
    Vec2::new(-350.0, -150.0),
    Vec2::new(0.0, -150.0),
    Vec2::new(350.0, -150.0),
];

const TARGET_IMAGE_TEXTURES: [&str; 5] = [
    "sprites/target1.png",
    "sprites/target2.png",
    "sprites/target3.png",
    "sprites/target4.png",
    "sprites/target5.png",
];

const TARGET_MODEL_TEXTURE: &str = "sprites/target_model.png";
const IMAGE_VISUAL_SIZE: Vec2 = Vec2::new(64.0, 120.0);
const MODEL_VISUAL_SIZE: Vec2 = Vec2::new(80.0, 128.0);
const VISUAL_CENTER_Y: f32 = 60.0;

/// The five named hit regions of a practice dummy, each with a fixed
/// damage value. The table is policy, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    Body,
    LeftArm,
    RightArm,
    Legs,
}

#[derive(Debug, Clone, Copy)]
pub enum ZoneShape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

#[derive(Debug, Clone, Copy)]
pub struct HitZone {
    pub offset: Vec2,
    pub shape: ZoneShape,
}

impl HitZone {
    pub fn contains(&self, local_point: Vec2) -> bool {
        let p = local_point - self.offset;
        match self.shape {
            ZoneShape::Circle { radius } => p.length_squared() <= radius * radius,
            ZoneShape::Rect { half_extents } => {
                p.x.abs() <= half_extents.x && p.y.abs() <= half_extents.y
            }
        }
    }
}

impl BodyPart {
    pub fn all() -> [BodyPart; 5] {
        [
            BodyPart::Head,
            BodyPart::Body,
            BodyPart::LeftArm,
            BodyPart::RightArm,
            BodyPart::Legs,
        ]
    }

    /// Headshots are instantly lethal; body shots take two, limb shots three.
    pub fn damage(self) -> i32 {
        match self {
            BodyPart::Head => 100,
            BodyPart::Body => 60,
            BodyPart::LeftArm => 40,
            BodyPart::RightArm => 40,
            BodyPart::Legs => 40,
        }
    }

    pub fn zone_name(self) -> &'static str {
        match self {
            BodyPart::Head => "target_head",
            BodyPart::Body => "target_body",
            BodyPart::LeftArm => "target_left_arm",
            BodyPart::RightArm => "target_right_arm",
            BodyPart::Legs => "target_legs",
        }
    }

    pub fn from_zone_name(name: &str) -> Option<BodyPart> {
        match name {
            "target_head" => Some(BodyPart::Head),
            "target_body" => Some(BodyPart::Body),
            "target_left_arm" => Some(BodyPart::LeftArm),
            "target_right_arm" => Some(BodyPart::RightArm),
            "target_legs" => Some(BodyPart::Legs),
            _ => None,
        }
    }

    // Zone layout mirrors the dummy silhouette: head circle on top, torso
    // and arm boxes at chest height, legs box reaching the ground.
    pub fn hit_zone(self) -> HitZone {
        match self {
            BodyPart::Head => HitZone {
                offset: Vec2::new(0.0, 104.0),
                shape: ZoneShape::Circle { radius: 24.0 },
            },
            BodyPart::Body => HitZone {
                offset: Vec2::new(0.0, 60.0),
                shape: ZoneShape::Rect { half_extents: Vec2::new(28.0, 24.0) },
            },
            BodyPart::LeftArm => HitZone {
                offset: Vec2::new(-40.0, 60.0),
                shape: ZoneShape::Rect { half_extents: Vec2::new(12.0, 24.0) },
            },
            BodyPart::RightArm => HitZone {
                offset: Vec2::new(40.0, 60.0),
                shape: ZoneShape::Rect { half_extents: Vec2::new(12.0, 24.0) },
            },
            BodyPart::Legs => HitZone {
                offset: Vec2::new(0.0, 24.0),
                shape: ZoneShape::Rect { half_extents: Vec2::new(28.0, 40.0) },
            },
        }
    }

    /// Resolves a point in target-local space to the part it lands on.
    /// Narrow zones are tested before the wide ones so an arm graze is
    /// not swallowed by the torso box.
    pub fn hit_test(local_point: Vec2) -> Option<BodyPart> {
        const PRIORITY: [BodyPart; 5] = [
            BodyPart::Head,
            BodyPart::LeftArm,
            BodyPart::RightArm,
            BodyPart::Body,
            BodyPart::Legs,
        ];
        PRIORITY
            .into_iter()
            .find(|part| part.hit_zone().contains(local_point))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Ignored,
    Damaged {
        damage: i32,
        impact_point: Vec2,
        remaining_health_fraction: f32,
    },
    Lethal {
        damage: i32,
        impact_point: Vec2,
    },
}

#[derive(Component)]
pub struct Target {
    pub max_health: i32,
    pub is_active: bool,
}

impl Target {
    pub fn new() -> Self {
        Self {
            max_health: TARGET_MAX_HEALTH,
            is_active: true,
        }
    }

    // Stored health may dip below zero between a lethal hit and the
    // respawn reset; anything shown to the player uses this clamped value.
    pub fn health_fraction(&self, health: &Health) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (health.0 as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn resolve_hit(
        &mut self,
        health: &mut Health,
        part: BodyPart,
        impact_point: Vec2,
    ) -> HitOutcome {
        if !self.is_active {
            return HitOutcome::Ignored;
        }
        let damage = part.damage();
        if damage <= 0 {
            return HitOutcome::Ignored;
        }

        health.0 -= damage;
        if health.0 <= 0 {
            self.is_active = false;
            HitOutcome::Lethal { damage, impact_point }
        } else {
            HitOutcome::Damaged {
                damage,
                impact_point,
                remaining_health_fraction: self.health_fraction(health),
            }
        }
    }

    /// Safe to call on an already-active target: it just tops health up.
    pub fn respawn(&mut self, health: &mut Health) {
        health.0 = self.max_health;
        self.is_active = true;
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new()
    }
}

// Both visuals always exist; the presentation mode decides which one shows.
#[derive(Component)]
pub struct TargetVisuals {
    pub image: Entity,
    pub model: Entity,
}

// The pending-respawn handle. Lives on the target entity, so despawning
// the target cancels the respawn with it.
#[derive(Component)]
pub struct RespawnTimer(pub Timer);

#[derive(Event)]
pub struct TargetDamagedEvent {
    pub target: Entity,
    pub health_fraction: f32,
}

#[derive(Event)]
pub struct TargetDestroyedEvent {
    pub target: Entity,
}

pub struct TargetPlugin;

impl Plugin for TargetPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<TargetDamagedEvent>()
            .add_event::<TargetDestroyedEvent>()
            .add_systems(OnEnter(AppState::InGame),
                spawn_targets.run_if(no_targets_exist)
            )
            .add_systems(Update, (
                apply_damage_tint,
                hide_destroyed_targets,
                respawn_targets,
                apply_presentation_mode,
            ).chain().after(resolve_shots).run_if(in_state(AppState::InGame)))
            .add_systems(OnExit(AppState::InGame), despawn_all_targets);
    }
}

fn no_targets_exist(target_query: Query<(), With<Target>>) -> bool {
    target_query.is_empty()
}

fn visual_visibility(settings: &GameSettings) -> (Visibility, Visibility) {
    if settings.show_target_images {
        (Visibility::Visible, Visibility::Hidden)
    } else {
        (Visibility::Hidden, Visibility::Visible)
    }
}

fn pick_image_texture() -> &'static str {
    let mut rng = rand::thread_rng();
    TARGET_IMAGE_TEXTURES
        .choose(&mut rng)
        .copied()
        .unwrap_or(TARGET_IMAGE_TEXTURES[0])
}

fn spawn_targets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<GameSettings>,
) {
    let (image_visibility, model_visibility) = visual_visibility(&settings);

    for (index, position) in TARGET_POSITIONS.iter().enumerate() {
        let image = commands.spawn((
            SpriteBundle {
                texture: asset_server.load(pick_image_texture()),
                sprite: Sprite { custom_size: Some(IMAGE_VISUAL_SIZE), ..default() },
                transform: Transform::from_xyz(0.0, VISUAL_CENTER_Y, 0.1),
                visibility: image_visibility,
                ..default()
            },
            Name::new("TargetImage"),
        )).id();

        let model = commands.spawn((
            SpriteBundle {
                texture: asset_server.load(TARGET_MODEL_TEXTURE),
                sprite: Sprite { custom_size: Some(MODEL_VISUAL_SIZE), ..default() },
                transform: Transform::from_xyz(0.0, VISUAL_CENTER_Y, 0.0),
                visibility: model_visibility,
                ..default()
            },
            Name::new("TargetModel"),
        )).id();

        let root = commands.spawn((
            SpatialBundle::from_transform(Transform::from_translation(position.extend(0.5))),
            Target::new(),
            Health(TARGET_MAX_HEALTH),
            TargetVisuals { image, model },
            Name::new(format!("Target_{}", index)),
        )).id();
        commands.entity(root).push_children(&[image, model]);
    }
}

fn despawn_all_targets(mut commands: Commands, target_query: Query<Entity, With<Target>>) {
    for entity in target_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// Tint slides from white at full health toward red as the fraction drops.
fn apply_damage_tint(
    mut damaged_events: EventReader<TargetDamagedEvent>,
    visuals_query: Query<&TargetVisuals>,
    mut sprite_query: Query<&mut Sprite>,
) {
    for event in damaged_events.read() {
        let Ok(visuals) = visuals_query.get(event.target) else { continue };
        let fraction = event.health_fraction.clamp(0.0, 1.0);
        for visual_entity in [visuals.image, visuals.model] {
            if let Ok(mut sprite) = sprite_query.get_mut(visual_entity) {
                sprite.color = Color::rgb(1.0, fraction, fraction);
            }
        }
    }
}

fn hide_destroyed_targets(
    mut destroyed_events: EventReader<TargetDestroyedEvent>,
    visuals_query: Query<&TargetVisuals>,
    mut visibility_query: Query<&mut Visibility>,
) {
    for event in destroyed_events.read() {
        let Ok(visuals) = visuals_query.get(event.target) else { continue };
        for visual_entity in [visuals.image, visuals.model] {
            if let Ok(mut visibility) = visibility_query.get_mut(visual_entity) {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

fn respawn_targets(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    settings: Res<GameSettings>,
    mut target_query: Query<(Entity, &mut Target, &mut Health, &mut RespawnTimer, &TargetVisuals)>,
    mut visual_query: Query<(&mut Visibility, &mut Sprite, &mut Handle<Image>)>,
    mut sound_event_writer: EventWriter<PlaySoundEvent>,
) {
    for (entity, mut target, mut health, mut respawn_timer, visuals) in target_query.iter_mut() {
        respawn_timer.0.tick(time.delta());
        if !respawn_timer.0.just_finished() {
            continue;
        }

        target.respawn(&mut health);
        commands.entity(entity).remove::<RespawnTimer>();
        sound_event_writer.send(PlaySoundEvent(SoundEffect::TargetRespawn));

        let (image_visibility, model_visibility) = visual_visibility(&settings);

        // A respawned target comes back with a fresh image and no tint.
        if let Ok((mut visibility, mut sprite, mut texture)) = visual_query.get_mut(visuals.image) {
            *texture = asset_server.load(pick_image_texture());
            sprite.color = Color::WHITE;
            *visibility = image_visibility;
        }
        if let Ok((mut visibility, mut sprite, _)) = visual_query.get_mut(visuals.model) {
            sprite.color = Color::WHITE;
            *visibility = model_visibility;
        }
    }
}

fn apply_presentation_mode(
    settings: Res<GameSettings>,
    target_query: Query<(&Target, &TargetVisuals)>,
    mut visibility_query: Query<&mut Visibility>,
) {
    if !settings.is_changed() {
        return;
    }
    let (image_visibility, model_visibility) = visual_visibility(&settings);

    for (target, visuals) in target_query.iter() {
        // Destroyed targets stay hidden; the respawn reset re-applies the mode.
        if !target.is_active {
            continue;
        }
        if let Ok(mut visibility) = visibility_query.get_mut(visuals.image) {
            *visibility = image_visibility;
        }
        if let Ok(mut visibility) = visibility_query.get_mut(visuals.model) {
            *visibility = model_visibility;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_target() -> (Target, Health) {
        (Target::new(), Health(TARGET_MAX_HEALTH))
    }

    #[test]
    fn damage_table_values() {
        assert_eq!(BodyPart::Head.damage(), 100);
        assert_eq!(BodyPart::Body.damage(), 60);
        assert_eq!(BodyPart::LeftArm.damage(), 40);
        assert_eq!(BodyPart::RightArm.damage(), 40);
        assert_eq!(BodyPart::Legs.damage(), 40);
    }

    #[test]
    fn every_part_reduces_health_by_its_damage() {
        for part in BodyPart::all() {
            let (mut target, mut health) = fresh_target();
            target.resolve_hit(&mut health, part, Vec2::ZERO);
            assert_eq!(health.0, TARGET_MAX_HEALTH - part.damage(), "{:?}", part);
        }
    }

    #[test]
    fn headshot_destroys_fresh_target_in_one_hit() {
        let (mut target, mut health) = fresh_target();
        let outcome = target.resolve_hit(&mut health, BodyPart::Head, Vec2::ZERO);
        assert_eq!(
            outcome,
            HitOutcome::Lethal { damage: 100, impact_point: Vec2::ZERO }
        );
        assert!(!target.is_active);
    }

    #[test]
    fn two_body_shots_destroy_a_fresh_target() {
        let (mut target, mut health) = fresh_target();

        let first = target.resolve_hit(&mut health, BodyPart::Body, Vec2::ZERO);
        assert_eq!(health.0, 40);
        assert!(target.is_active);
        assert!(matches!(first, HitOutcome::Damaged { damage: 60, .. }));

        let second = target.resolve_hit(&mut health, BodyPart::Body, Vec2::ZERO);
        assert!(matches!(second, HitOutcome::Lethal { damage: 60, .. }));
        assert!(!target.is_active);
    }

    #[test]
    fn hits_on_inactive_target_are_ignored() {
        let (mut target, mut health) = fresh_target();
        target.resolve_hit(&mut health, BodyPart::Head, Vec2::ZERO);
        assert!(!target.is_active);

        let stored = health.0;
        for part in BodyPart::all() {
            assert_eq!(target.resolve_hit(&mut health, part, Vec2::ZERO), HitOutcome::Ignored);
            assert_eq!(health.0, stored);
        }
    }

    #[test]
    fn respawn_restores_full_health_and_activity() {
        let (mut target, mut health) = fresh_target();
        target.resolve_hit(&mut health, BodyPart::Head, Vec2::ZERO);

        target.respawn(&mut health);
        assert_eq!(health.0, TARGET_MAX_HEALTH);
        assert!(target.is_active);
    }

    #[test]
    fn respawn_on_active_target_is_a_harmless_no_op() {
        let (mut target, mut health) = fresh_target();
        target.resolve_hit(&mut health, BodyPart::LeftArm, Vec2::ZERO);
        assert!(target.is_active);

        target.respawn(&mut health);
        assert_eq!(health.0, TARGET_MAX_HEALTH);
        assert!(target.is_active);
    }

    #[test]
    fn damaged_outcome_fraction_is_in_unit_interval() {
        for part in [BodyPart::Body, BodyPart::LeftArm, BodyPart::RightArm, BodyPart::Legs] {
            let (mut target, mut health) = fresh_target();
            match target.resolve_hit(&mut health, part, Vec2::ZERO) {
                HitOutcome::Damaged { remaining_health_fraction, .. } => {
                    assert!(remaining_health_fraction > 0.0);
                    assert!(remaining_health_fraction <= 1.0);
                }
                other => panic!("expected Damaged, got {:?}", other),
            }
        }
    }

    #[test]
    fn displayed_fraction_is_clamped_when_stored_health_is_negative() {
        let (mut target, mut health) = fresh_target();
        health.0 = 20;
        target.resolve_hit(&mut health, BodyPart::Legs, Vec2::ZERO);
        assert_eq!(health.0, -20);
        assert_eq!(target.health_fraction(&health), 0.0);

        health.0 = TARGET_MAX_HEALTH + 50;
        assert_eq!(target.health_fraction(&health), 1.0);
    }

    #[test]
    fn zone_names_round_trip_and_unknown_names_are_rejected() {
        for part in BodyPart::all() {
            assert_eq!(BodyPart::from_zone_name(part.zone_name()), Some(part));
        }
        assert_eq!(BodyPart::from_zone_name("target_torso"), None);
        assert_eq!(BodyPart::from_zone_name(""), None);
        assert_eq!(BodyPart::from_zone_name("head"), None);
    }

    #[test]
    fn hit_test_resolves_points_to_the_expected_part() {
        assert_eq!(BodyPart::hit_test(Vec2::new(0.0, 104.0)), Some(BodyPart::Head));
        assert_eq!(BodyPart::hit_test(Vec2::new(0.0, 60.0)), Some(BodyPart::Body));
        assert_eq!(BodyPart::hit_test(Vec2::new(-40.0, 60.0)), Some(BodyPart::LeftArm));
        assert_eq!(BodyPart::hit_test(Vec2::new(40.0, 60.0)), Some(BodyPart::RightArm));
        assert_eq!(BodyPart::hit_test(Vec2::new(0.0, 10.0)), Some(BodyPart::Legs));
        assert_eq!(BodyPart::hit_test(Vec2::new(200.0, 200.0)), None);
        assert_eq!(BodyPart::hit_test(Vec2::new(0.0, 180.0)), None);
    }

    #[test]
    fn limb_shots_whittle_a_target_down_then_it_respawns() {
        let (mut target, mut health) = fresh_target();
        let impact = Vec2::new(12.0, 48.0);

        let first = target.resolve_hit(&mut health, BodyPart::LeftArm, impact);
        assert_eq!(health.0, 60);
        assert!(target.is_active);
        assert!(matches!(first, HitOutcome::Damaged { damage: 40, .. }));

        let second = target.resolve_hit(&mut health, BodyPart::RightArm, impact);
        assert_eq!(health.0, 20);
        assert!(target.is_active);

        let third = target.resolve_hit(&mut health, BodyPart::Legs, impact);
        assert_eq!(health.0, -20);
        assert!(!target.is_active);
        assert_eq!(
            third,
            HitOutcome::Lethal { damage: 40, impact_point: impact }
        );

        // What the respawn timer does once the 3 second delay elapses.
        target.respawn(&mut health);
        assert_eq!(health.0, TARGET_MAX_HEALTH);
        assert!(target.is_active);
    }

    #[test]
    fn impact_point_is_carried_through_the_outcome() {
        let (mut target, mut health) = fresh_target();
        let impact = Vec2::new(-3.5, 77.0);
        match target.resolve_hit(&mut health, BodyPart::Body, impact) {
            HitOutcome::Damaged { impact_point, .. } => assert_eq!(impact_point, impact),
            other => panic!("expected Damaged, got {:?}", other),
        }
    }
}
