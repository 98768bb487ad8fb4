//! The church interior: the family waits in their seats, and walking up
//! to the altar starts the celebration.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::data::{ArtCatalog, ArtKey};
use crate::shared::*;
use super::layout::{seat_positions, CHURCH_BALLOONS, CHURCH_SEAT_Y, CHURCH_SPAWN};
use super::spawn_world_label;
use super::trigger::{ProximityTrigger, TriggerCheck};

pub(super) fn register(app: &mut App) {
    app.add_systems(OnEnter(GameState::Church), spawn_church)
        .add_systems(
            Update,
            (check_altar_trigger, request_church_exit)
                .chain()
                .run_if(in_state(GameState::Church)),
        );
}

/// The altar latch. One per Church instance.
#[derive(Component, Debug)]
pub struct Altar;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilySeat(pub usize);

const FLOOR: Color = Color::srgb(0.420, 0.286, 0.173);
const ALTAR_BAND: Color = Color::srgb(0.290, 0.173, 0.102);
const CROSS: Color = Color::srgb(1.0, 0.843, 0.0);
const PEW: Color = Color::srgb(0.396, 0.263, 0.129);
const BANNER: Color = Color::srgba(0.545, 0.0, 0.0, 0.67);
const CAKE_FALLBACK: Color = Color::srgb(1.0, 0.894, 0.882);
const BALLOONS: [Color; 5] = [
    Color::srgb(1.0, 0.412, 0.706),
    Color::srgb(0.529, 0.808, 0.922),
    Color::srgb(1.0, 0.843, 0.0),
    Color::srgb(0.596, 0.984, 0.596),
    Color::srgb(0.867, 0.627, 0.867),
];

fn spawn_church(
    mut commands: Commands,
    catalog: Res<ArtCatalog>,
    config: Res<GameConfig>,
    font: Res<UiFontHandle>,
    profile: Option<Res<PlayerProfile>>,
    mut guards: ResMut<SceneGuards>,
    mut spawn_player: EventWriter<SpawnPlayerEvent>,
) {
    guards.altar_fired = false;
    let scene = GameState::Church;
    let at = |x: f32, y: f32| screen_to_world(x, y, SCREEN_HEIGHT);
    let scoped = StateScoped(scene);

    // Room.
    if catalog.get(ArtKey::ChurchInterior).is_some() {
        commands.spawn((
            catalog.image_or_color(ArtKey::ChurchInterior, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT), FLOOR),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0).extend(0.0)),
            scoped.clone(),
        ));
    } else {
        commands.spawn((
            Sprite::from_color(FLOOR, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0).extend(0.0)),
            scoped.clone(),
        ));
        commands.spawn((
            Sprite::from_color(ALTAR_BAND, Vec2::new(SCREEN_WIDTH, 120.0)),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, 60.0).extend(0.5)),
            scoped.clone(),
        ));
        commands.spawn((
            Sprite::from_color(CROSS, Vec2::new(12.0, 80.0)),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, 60.0).extend(1.0)),
            scoped.clone(),
        ));
        commands.spawn((
            Sprite::from_color(CROSS, Vec2::new(50.0, 12.0)),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, 41.0).extend(1.0)),
            scoped.clone(),
        ));
        for row in 0..3 {
            for col in 0..3 {
                let pos = at(60.0 + col as f32 * 120.0, 210.0 + row as f32 * 80.0);
                commands.spawn((
                    Sprite::from_color(PEW, Vec2::new(80.0, 20.0)),
                    Transform::from_translation(pos.extend(1.0)),
                    scoped.clone(),
                ));
            }
        }
    }
    spawn_world_label(&mut commands, &font, scene, CHURCH_NAME, at(SCREEN_WIDTH / 2.0, 110.0), 12.0);

    // Birthday decorations.
    for (i, (x, y)) in CHURCH_BALLOONS.iter().enumerate() {
        let pos = at(*x, *y);
        commands.spawn((
            Sprite::from_color(BALLOONS[i % BALLOONS.len()], Vec2::new(30.0, 34.0)),
            Transform::from_translation(pos.extend(5.0)),
            IdleBob::new(pos.y, 10.0, 3.0 + i as f32 * 0.4),
            scoped.clone(),
        ));
    }
    commands
        .spawn((
            Sprite::from_color(BANNER, Vec2::new(210.0, 26.0)),
            Transform::from_translation(at(SCREEN_WIDTH / 2.0, 60.0).extend(10.0)),
            scoped.clone(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new("🎂 생일 축하합니다! 🎂"),
                text_font(&font, 14.0),
                TextColor(CROSS),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });
    commands.spawn((
        catalog.image_or_color(ArtKey::Cake, Vec2::splat(64.0), CAKE_FALLBACK),
        Transform::from_translation(at(SCREEN_WIDTH / 2.0, 95.0).extend(5.0)),
        scoped.clone(),
    ));

    // Family, seated left to right in roster order.
    let family = profile.as_deref().map(PlayerProfile::family).unwrap_or_default();
    if family.is_empty() {
        warn!("[Church] no family to seat");
    }
    for (i, (member, seat)) in family
        .iter()
        .zip(seat_positions(family.len(), SCREEN_WIDTH, CHURCH_SEAT_Y))
        .enumerate()
    {
        let pos = at(seat.x, seat.y);
        commands.spawn((
            FamilySeat(i),
            catalog.family_sprite(member.role, 48.0),
            Transform::from_translation(pos.extend(8.0)),
            IdleBob::new(pos.y, 3.0, 2.0 + i as f32 * 0.2),
            scoped.clone(),
        ));
        spawn_world_label(&mut commands, &font, scene, &member.label, pos - Vec2::new(0.0, 35.0), 11.0);
    }

    match config.altar.to_region(SCREEN_HEIGHT) {
        Ok(region) => {
            commands.spawn((Altar, ProximityTrigger::new(region), scoped.clone()));
        }
        Err(err) => error!("[Church] altar disabled: {}", err),
    }

    let (px, py) = CHURCH_SPAWN;
    spawn_player.send(SpawnPlayerEvent {
        scene,
        position: at(px, py),
        speed: config.player_speed_indoor,
        bounds: MapBounds::screen(),
    });
    info!("[Church] {} family members seated", family.len());
}

/// Feed the player's position to the altar latch once per tick. On the
/// first fire the player stops and the celebration is requested.
pub fn check_altar_trigger(
    mut commands: Commands,
    mut altars: Query<&mut ProximityTrigger, With<Altar>>,
    player: Query<(Entity, &Transform), With<Player>>,
    mut guards: ResMut<SceneGuards>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    let Ok((entity, player_tf)) = player.get_single() else {
        return;
    };
    let position = player_tf.translation.truncate();
    for mut altar in altars.iter_mut().filter(|altar| !altar.has_fired()) {
        if altar.check(position) == TriggerCheck::Fire {
            info!("[Church] altar reached at {:?}", position);
            guards.altar_fired = true;
            commands.entity(entity).insert(Frozen);
            requests.send(SceneRequestEvent {
                trigger: SceneTrigger::AltarReached,
            });
        }
    }
}

pub fn request_church_exit(
    input: Res<PlayerInput>,
    guards: Res<SceneGuards>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    if !input.exit {
        return;
    }
    if guards.altar_fired {
        debug!("[Church] exit ignored, the celebration has begun");
        return;
    }
    requests.send(SceneRequestEvent {
        trigger: SceneTrigger::ExitChurch,
    });
}
