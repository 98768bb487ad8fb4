mod camera;
mod effects;
mod movement;
mod spawn;

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapBounds>();

        // -- Spawning is requested by the scenes --
        app.add_systems(Update, spawn::spawn_requested_player);

        // -- Systems that run every frame while a scene is explorable --
        app.add_systems(
            Update,
            (
                movement::player_movement,
                movement::animate_player_sprite,
                effects::punch_and_pray,
                effects::tick_punch_squash,
                effects::drift_floating_effects,
            )
                .chain()
                .after(spawn::spawn_requested_player)
                .run_if(in_explorable_scene),
        );

        app.add_systems(PostUpdate, camera::camera_follow_player.before(TransformSystem::TransformPropagate));
    }
}

pub fn in_explorable_scene(state: Res<State<GameState>>) -> bool {
    matches!(
        state.get(),
        GameState::World | GameState::Church | GameState::Celebration
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Local components (player-domain only)
// ═══════════════════════════════════════════════════════════════════════════

/// Walk-cycle frame driver. Sheet rows: down 0..8, up 8..16, side 16..24.
#[derive(Component, Debug)]
pub struct WalkAnimation {
    pub timer: Timer,
    pub frame: usize,
}

impl Default for WalkAnimation {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0 / 8.0, TimerMode::Repeating),
            frame: 0,
        }
    }
}

pub const WALK_FRAMES: usize = 8;
pub const IDLE_FRAMES: usize = 4;

/// On-screen size of the player sprite.
pub const PLAYER_SIZE: f32 = 48.0;
