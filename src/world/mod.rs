//! World domain: the two walkable maps.
//!
//! - The village (`GameState::World`): grass, trees, the church at the
//!   top, six biblical villagers to talk to, and the church door.
//! - The church interior (`GameState::Church`), see `church`.
//!
//! Everything spawned here is `StateScoped`, so a scene left and entered
//! again is rebuilt from scratch.

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::data::{ArtCatalog, ArtKey, NpcId, VILLAGE_NPCS};
use crate::dialogue::ActiveDialogue;
use crate::shared::*;

pub mod church;
pub mod layout;
pub mod trigger;

use layout::{nearest_within, CHURCH_BUILDING, VILLAGE_SPAWN, VILLAGE_TREES};
use trigger::Region;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::World), spawn_village)
            .add_systems(
                Update,
                (check_church_entrance, request_church_entry, talk_to_nearest_npc)
                    .chain()
                    .run_if(in_state(GameState::World)),
            )
            .add_systems(Update, bob_idle);

        church::register(app);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VillageNpc(pub NpcId);

/// Region in front of the church door.
#[derive(Component, Debug, Clone, Copy)]
pub struct ChurchDoor(pub Region);

const GRASS: Color = Color::srgb(0.298, 0.553, 0.235);
const GROUND: Color = Color::srgb(0.545, 0.431, 0.294);
const TREE: Color = Color::srgb(0.133, 0.400, 0.165);
const CHURCH_FALLBACK: Color = Color::srgb(0.878, 0.831, 0.749);
const LABEL_BACKDROP: Color = Color::srgba(0.173, 0.094, 0.063, 0.67);

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

fn spawn_village(
    mut commands: Commands,
    catalog: Res<ArtCatalog>,
    config: Res<GameConfig>,
    font: Res<UiFontHandle>,
    mut guards: ResMut<SceneGuards>,
    mut spawn_player: EventWriter<SpawnPlayerEvent>,
) {
    guards.at_church_entrance = false;
    let scene = GameState::World;
    let at = |x: f32, y: f32| screen_to_world(x, y, VILLAGE_HEIGHT);

    // Ground: mostly grass with patches of dirt.
    let mut rng = rand::thread_rng();
    let cols = (SCREEN_WIDTH / TILE_SIZE).ceil() as usize;
    let rows = (VILLAGE_HEIGHT / TILE_SIZE).ceil() as usize;
    for row in 0..rows {
        for col in 0..cols {
            let color = if rng.gen_bool(0.7) { GRASS } else { GROUND };
            let pos = at(
                col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            );
            commands.spawn((
                Sprite::from_color(color, Vec2::splat(TILE_SIZE)),
                Transform::from_translation(pos.extend(0.0)),
                StateScoped(scene),
            ));
        }
    }

    for (x, y) in VILLAGE_TREES {
        commands.spawn((
            Sprite::from_color(TREE, Vec2::new(38.0, 52.0)),
            Transform::from_translation(at(x, y).extend(2.0)),
            StateScoped(scene),
        ));
    }

    // Church building and its sign.
    let (cx, cy) = CHURCH_BUILDING;
    commands.spawn((
        catalog.image_or_color(ArtKey::ChurchExterior, Vec2::new(154.0, 154.0), CHURCH_FALLBACK),
        Transform::from_translation(at(cx, cy).extend(3.0)),
        StateScoped(scene),
    ));
    spawn_world_label(&mut commands, &font, scene, CHURCH_NAME, at(cx, 160.0), 14.0);

    match config.church_entrance.to_region(VILLAGE_HEIGHT) {
        Ok(region) => {
            commands.spawn((ChurchDoor(region), StateScoped(scene)));
        }
        Err(err) => error!("[World] church entrance disabled: {}", err),
    }

    // Villagers.
    for npc in VILLAGE_NPCS.iter() {
        let pos = at(npc.layout.0, npc.layout.1);
        let mut bob = IdleBob::new(pos.y, 5.0, 3.0 + rng.gen_range(0.0..1.0));
        bob.phase = rng.gen_range(0.0..1.0);
        commands.spawn((
            VillageNpc(npc.id),
            catalog.npc_sprite(npc, 48.0),
            Transform::from_translation(pos.extend(5.0)),
            bob,
            StateScoped(scene),
        ));
        spawn_world_label(&mut commands, &font, scene, npc.korean_name, pos - Vec2::new(0.0, 30.0), 11.0);
    }

    let (px, py) = VILLAGE_SPAWN;
    spawn_player.send(SpawnPlayerEvent {
        scene,
        position: at(px, py),
        speed: config.player_speed_world,
        bounds: MapBounds::village(),
    });
    info!("[World] village ready");
}

/// Small caption on a dark backdrop, drawn in world space.
pub fn spawn_world_label(
    commands: &mut Commands,
    font: &UiFontHandle,
    scene: GameState,
    text: &str,
    position: Vec2,
    font_size: f32,
) {
    let backdrop_width = text.chars().count() as f32 * font_size + 12.0;
    commands
        .spawn((
            Sprite::from_color(LABEL_BACKDROP, Vec2::new(backdrop_width, font_size + 8.0)),
            Transform::from_translation(position.extend(9.0)),
            StateScoped(scene),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new(text),
                text_font(font, font_size),
                TextColor(COLOR_CREAM),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

/// Keep `SceneGuards::at_church_entrance` in step with the player.
pub fn check_church_entrance(
    door: Query<&ChurchDoor>,
    player: Query<&Transform, With<Player>>,
    mut guards: ResMut<SceneGuards>,
) {
    let (Ok(door), Ok(player_tf)) = (door.get_single(), player.get_single()) else {
        return;
    };
    let inside = door.0.contains(player_tf.translation.truncate());
    if guards.at_church_entrance != inside {
        guards.at_church_entrance = inside;
        debug!("[World] at church door: {}", inside);
    }
}

/// The enter action asks for the church; the scene graph checks the door.
pub fn request_church_entry(
    input: Res<PlayerInput>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    if input.enter {
        requests.send(SceneRequestEvent {
            trigger: SceneTrigger::EnterChurch,
        });
    }
}

pub fn talk_to_nearest_npc(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    active: Res<ActiveDialogue>,
    player: Query<&Transform, With<Player>>,
    npcs: Query<(&VillageNpc, &Transform)>,
    mut dialogue: EventWriter<DialogueStartEvent>,
) {
    if !input.talk || active.is_open() {
        return;
    }
    let Ok(player_tf) = player.get_single() else {
        return;
    };
    let from = player_tf.translation.truncate();
    let candidates: Vec<(NpcId, Vec2)> = npcs
        .iter()
        .map(|(npc, tf)| (npc.0, tf.translation.truncate()))
        .collect();

    let Some(idx) = nearest_within(from, candidates.iter().map(|(_, p)| *p), config.talk_range) else {
        return;
    };
    let npc = crate::data::npcs::npc(candidates[idx].0);
    dialogue.send(DialogueStartEvent {
        speaker: npc.korean_name.to_string(),
        lines: npc.lines(),
    });
}

pub fn bob_idle(time: Res<Time>, mut query: Query<(&IdleBob, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (bob, mut transform) in &mut query {
        transform.translation.y = bob.base_y + bob.offset_at(elapsed);
    }
}
