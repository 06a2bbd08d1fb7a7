use bevy::prelude::*;
use crate::{
    settings::GameSettings,
    visual_effects::DamageText,
};

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    InGame,
}

#[derive(Resource, Default)]
pub struct GameState {
    pub score: u32,
    pub shots_fired: u32,
    pub hits: u32,
    pub targets_destroyed: u32,
}

impl GameState {
    pub fn accuracy_percent(&self) -> f32 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        self.hits as f32 / self.shots_fired as f32 * 100.0
    }
}

pub struct GamePlugin;

#[derive(Component)]
struct MainMenuUI;

#[derive(Component)]
struct InGameUI;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct AccuracyText;

#[derive(Component)]
struct DestroyedText;

#[derive(Component)]
struct ModeText;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<AppState>()
            .init_resource::<GameState>()

            .add_systems(OnEnter(AppState::MainMenu), setup_main_menu_ui)
            .add_systems(Update,
                main_menu_input_system
                    .run_if(in_state(AppState::MainMenu))
            )
            .add_systems(OnExit(AppState::MainMenu), despawn_ui_by_marker::<MainMenuUI>)

            .add_systems(OnEnter(AppState::InGame), setup_ingame_ui)
            .add_systems(Update, (
                update_ingame_ui,
                ingame_input_system,
            ).run_if(in_state(AppState::InGame)))
            .add_systems(OnExit(AppState::InGame), (
                cleanup_session_entities,
                despawn_ui_by_marker::<InGameUI>,
            ));
    }
}

fn despawn_ui_by_marker<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn setup_main_menu_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(20.0),
                ..default()
            },
            ..default()
        },
        MainMenuUI,
    )).with_children(|parent| {
        parent.spawn(
            TextBundle::from_section(
                "Target Practice",
                TextStyle {
                    font: asset_server.load("fonts/FiraSans-Bold.ttf"),
                    font_size: 70.0,
                    color: Color::WHITE,
                },
            ).with_text_justify(JustifyText::Center)
        );
        parent.spawn(
            TextBundle::from_section(
                "Press SPACE to Start",
                TextStyle {
                    font: asset_server.load("fonts/FiraSans-Bold.ttf"),
                    font_size: 40.0,
                    color: Color::rgba(0.8, 0.8, 0.8, 1.0),
                },
            ).with_text_justify(JustifyText::Center)
        );
        parent.spawn(
            TextBundle::from_section(
                "LMB: fire   TAB: image/model targets   R: back to menu",
                TextStyle {
                    font: asset_server.load("fonts/FiraSans-Bold.ttf"),
                    font_size: 24.0,
                    color: Color::rgba(0.6, 0.6, 0.6, 1.0),
                },
            ).with_text_justify(JustifyText::Center)
        );
    });
}

fn main_menu_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut next_app_state: ResMut<NextState<AppState>>,
    mut game_state: ResMut<GameState>,
) {
    if keyboard_input.just_pressed(KeyCode::Space) {
        *game_state = GameState::default();
        next_app_state.set(AppState::InGame);
    }
}

fn setup_ingame_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexStart,
                padding: UiRect::all(Val::Px(10.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            z_index: ZIndex::Global(1),
            ..default()
        },
        InGameUI,
    )).with_children(|parent| {
        parent.spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceAround,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(5.0)),
                ..default()
            },
            background_color: Color::rgba(0.0, 0.0, 0.0, 0.3).into(),
            ..default()
        }).with_children(|top_bar| {
            top_bar.spawn((TextBundle::from_section(
                "Score: 0",
                TextStyle { font: asset_server.load("fonts/FiraSans-Bold.ttf"), font_size: 20.0, color: Color::WHITE, },
            ), ScoreText));
            top_bar.spawn((TextBundle::from_section(
                "Accuracy: --",
                TextStyle { font: asset_server.load("fonts/FiraSans-Bold.ttf"), font_size: 20.0, color: Color::CYAN, },
            ), AccuracyText));
            top_bar.spawn((TextBundle::from_section(
                "Destroyed: 0",
                TextStyle { font: asset_server.load("fonts/FiraSans-Bold.ttf"), font_size: 20.0, color: Color::ORANGE_RED, },
            ), DestroyedText));
            top_bar.spawn((TextBundle::from_section(
                "Targets: images",
                TextStyle { font: asset_server.load("fonts/FiraSans-Bold.ttf"), font_size: 20.0, color: Color::YELLOW, },
            ), ModeText));
        });
    });
}

fn update_ingame_ui(
    game_state: Res<GameState>,
    settings: Res<GameSettings>,
    mut ui_texts: ParamSet<(
        Query<&mut Text, With<ScoreText>>,
        Query<&mut Text, With<AccuracyText>>,
        Query<&mut Text, With<DestroyedText>>,
        Query<&mut Text, With<ModeText>>,
    )>,
) {
    if let Ok(mut text) = ui_texts.p0().get_single_mut() {
        text.sections[0].value = format!("Score: {}", game_state.score);
    }
    if let Ok(mut text) = ui_texts.p1().get_single_mut() {
        text.sections[0].value = if game_state.shots_fired == 0 {
            "Accuracy: --".to_string()
        } else {
            format!(
                "Accuracy: {:.0}% ({}/{})",
                game_state.accuracy_percent(),
                game_state.hits,
                game_state.shots_fired
            )
        };
    }
    if let Ok(mut text) = ui_texts.p2().get_single_mut() {
        text.sections[0].value = format!("Destroyed: {}", game_state.targets_destroyed);
    }
    if let Ok(mut text) = ui_texts.p3().get_single_mut() {
        text.sections[0].value = format!(
            "Targets: {}",
            if settings.show_target_images { "images" } else { "models" }
        );
    }
}

fn ingame_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut next_app_state: ResMut<NextState<AppState>>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        next_app_state.set(AppState::MainMenu);
    }
}

fn cleanup_session_entities(
    mut commands: Commands,
    damage_text_query: Query<Entity, With<DamageText>>,
) {
    for entity in damage_text_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
