mod shared;
mod config;
mod data;
mod input;
mod flow;
mod setup;
mod dialogue;
mod player;
mod world;
mod celebration;
mod ui;

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: format!("{GAME_TITLE} - {GAME_SUBTITLE}"),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<DialogueView>()
        .init_resource::<UiFontHandle>()
        // Events
        .add_event::<SceneRequestEvent>()
        .add_event::<SceneTransitionEvent>()
        .add_event::<GameStartEvent>()
        .add_event::<DialogueStartEvent>()
        .add_event::<DialogueEndEvent>()
        .add_event::<SpawnPlayerEvent>()
        .add_event::<ToastEvent>()
        // Domain plugins
        .add_plugins(config::ConfigPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(flow::FlowPlugin)
        .add_plugins(setup::SetupPlugin)
        .add_plugins(dialogue::DialoguePlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(celebration::CelebrationPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

/// Fixed 390x844 logical view scaled to fit the window.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: SCREEN_WIDTH,
                min_height: SCREEN_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0, 0.0),
    ));
}
