use bevy::prelude::*;
use crate::game::AppState;

#[derive(Event)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Shoot,
    TargetHit,
    TargetDestroyed,
    TargetRespawn,
}

#[derive(Resource)]
pub struct GameAudioHandles {
    pub shoot: Handle<AudioSource>,
    pub target_hit: Handle<AudioSource>,
    pub target_destroyed: Handle<AudioSource>,
    pub target_respawn: Handle<AudioSource>,
    pub background_music: Handle<AudioSource>,
}

#[derive(Component)]
struct BackgroundMusicController;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<PlaySoundEvent>()
            .add_systems(Startup, setup_audio_handles)
            .add_systems(Update, play_sound_system)
            .add_systems(OnEnter(AppState::InGame), start_background_music)
            .add_systems(OnExit(AppState::InGame), stop_background_music);
    }
}

fn setup_audio_handles(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAudioHandles {
        shoot: asset_server.load("audio/shoot.ogg"),
        target_hit: asset_server.load("audio/target_hit.ogg"),
        target_destroyed: asset_server.load("audio/target_destroyed.ogg"),
        target_respawn: asset_server.load("audio/target_respawn.ogg"),
        background_music: asset_server.load("audio/background_music.ogg"),
    });
}

fn play_sound_system(
    mut commands: Commands,
    mut sound_events: EventReader<PlaySoundEvent>,
    audio_handles: Res<GameAudioHandles>,
) {
    for event in sound_events.read() {
        let source = match event.0 {
            SoundEffect::Shoot => audio_handles.shoot.clone(),
            SoundEffect::TargetHit => audio_handles.target_hit.clone(),
            SoundEffect::TargetDestroyed => audio_handles.target_destroyed.clone(),
            SoundEffect::TargetRespawn => audio_handles.target_respawn.clone(),
        };
        commands.spawn(AudioBundle {
            source,
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

fn start_background_music(
    mut commands: Commands,
    audio_handles: Res<GameAudioHandles>,
    music_controller_query: Query<Entity, With<BackgroundMusicController>>,
) {
    if !music_controller_query.is_empty() {
        return;
    }
    commands.spawn((
        AudioBundle {
            source: audio_handles.background_music.clone(),
            settings: PlaybackSettings {
                mode: bevy::audio::PlaybackMode::Loop,
                volume: bevy::audio::Volume::new(0.3),
                ..default()
            },
        },
        BackgroundMusicController,
    ));
}

fn stop_background_music(
    mut commands: Commands,
    music_controller_query: Query<Entity, With<BackgroundMusicController>>,
) {
    for entity in music_controller_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
