//! Headless integration tests for Blessings Day.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! logic plugins (no UI, no asset loading), and drive them by writing
//! `PlayerInput` directly.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use blessings_day::celebration::{CelebrationPlugin, CelebrationRun, CelebrationStage};
use blessings_day::config::GameConfig;
use blessings_day::data::{family_lines, ArtCatalog, ArtKey, DataPlugin, LoadProgress};
use blessings_day::data::family::closing_line;
use blessings_day::dialogue::DialoguePlugin;
use blessings_day::flow::{FlowPlugin, SceneTransition};
use blessings_day::player::PlayerPlugin;
use blessings_day::setup::{ProfileDraft, SetupForm, SetupPlugin};
use blessings_day::shared::*;
use blessings_day::world::church::Altar;
use blessings_day::world::trigger::ProximityTrigger;
use blessings_day::world::{VillageNpc, WorldPlugin};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with the shared resources, events and logic
/// plugins, with every timed delay set to zero.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.insert_resource(GameConfig::instant())
        .init_resource::<ArtCatalog>()
        .init_resource::<PlayerInput>()
        .init_resource::<DialogueView>()
        .insert_resource(UiFontHandle(test_font()));

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<SceneRequestEvent>()
        .add_event::<SceneTransitionEvent>()
        .add_event::<GameStartEvent>()
        .add_event::<DialogueStartEvent>()
        .add_event::<DialogueEndEvent>()
        .add_event::<SpawnPlayerEvent>()
        .add_event::<ToastEvent>();

    // Name typing reads raw keyboard and IME events.
    app.add_event::<KeyboardInput>().add_event::<Ime>();

    app.add_plugins((
        FlowPlugin,
        SetupPlugin,
        DialoguePlugin,
        PlayerPlugin,
        WorldPlugin,
        CelebrationPlugin,
    ));
    app
}

/// Stand-in for the bundled font; no asset server is needed to compare it.
fn test_font() -> Handle<Font> {
    Handle::weak_from_u128(0x5eed_f047)
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// Jumps straight to `state` and lets its OnEnter systems and first
/// Update run.
fn enter_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    run_frames(app, 2);
}

/// Holds the given input for exactly one frame.
fn press(app: &mut App, set: impl FnOnce(&mut PlayerInput)) {
    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        set(&mut input);
    }
    app.update();
    *app.world_mut().resource_mut::<PlayerInput>() = PlayerInput::default();
}

fn insert_profile(app: &mut App, name: &str, roles: &[FamilyRole]) {
    let mut draft = ProfileDraft {
        name: name.to_string(),
        ..default()
    };
    for role in roles {
        draft.toggle_member(*role);
    }
    let profile = draft.validate().expect("draft should be valid");
    app.insert_resource(profile);
}

fn player_entity(app: &mut App) -> Option<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<Player>>();
    query.iter(world).next()
}

fn move_player(app: &mut App, position: Vec2) {
    let entity = player_entity(app).expect("player should be spawned");
    let mut entity = app.world_mut().entity_mut(entity);
    let mut transform = entity.get_mut::<Transform>().expect("player has a transform");
    transform.translation.x = position.x;
    transform.translation.y = position.y;
}

fn count<C: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<C>>();
    query.iter(world).count()
}

fn key(app: &mut App, key_code: KeyCode, logical_key: Key, state: ButtonState) {
    app.world_mut().send_event(KeyboardInput {
        key_code,
        logical_key,
        state,
        repeat: false,
        window: Entity::PLACEHOLDER,
    });
}

fn text_fonts(app: &mut App) -> Vec<Handle<Font>> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&TextFont, With<Text2d>>();
    query.iter(world).map(|font| font.font.clone()).collect()
}

#[derive(Resource, Default)]
struct StartCount(usize);

fn count_starts(mut events: EventReader<GameStartEvent>, mut starts: ResMut<StartCount>) {
    starts.0 += events.read().count();
}

fn church_door_center() -> Vec2 {
    screen_to_world(195.0, 140.0, VILLAGE_HEIGHT)
}

fn altar_center() -> Vec2 {
    screen_to_world(195.0, 170.0, SCREEN_HEIGHT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot and setup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_moves_on_to_preload() {
    let mut app = build_test_app();
    assert_eq!(current_state(&app), GameState::Boot);

    run_frames(&mut app, 5);
    assert_eq!(current_state(&app), GameState::Preload);
}

#[test]
fn test_preload_waits_for_every_image_then_opens_setup() {
    let mut app = build_test_app();
    app.add_plugins(AssetPlugin::default())
        .init_asset::<Image>()
        .init_asset::<TextureAtlasLayout>()
        .add_plugins(DataPlugin);

    for _ in 0..10 {
        if current_state(&app) == GameState::Preload {
            break;
        }
        app.update();
    }
    assert_eq!(current_state(&app), GameState::Preload);
    assert_eq!(app.world().resource::<LoadProgress>().total, ArtKey::ALL.len());

    // No image has a loader here, so every request settles as failed.
    for _ in 0..400 {
        if current_state(&app) == GameState::Setup {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
        app.update();
    }
    assert_eq!(current_state(&app), GameState::Setup);
    let progress = *app.world().resource::<LoadProgress>();
    assert_eq!(progress.settled, progress.total);
    assert!(app.world().resource::<ArtCatalog>().is_empty());
}

#[test]
fn test_name_is_typed_from_keys_and_ime() {
    let mut app = build_test_app();
    enter_state(&mut app, GameState::Setup);

    key(&mut app, KeyCode::KeyJ, Key::Character("J".into()), ButtonState::Pressed);
    key(&mut app, KeyCode::KeyJ, Key::Character("J".into()), ButtonState::Released);
    key(&mut app, KeyCode::KeyO, Key::Character("o".into()), ButtonState::Pressed);
    key(&mut app, KeyCode::Backspace, Key::Backspace, ButtonState::Pressed);
    key(&mut app, KeyCode::Space, Key::Space, ButtonState::Pressed);
    key(&mut app, KeyCode::Tab, Key::Tab, ButtonState::Pressed);
    app.world_mut().send_event(Ime::Preedit {
        window: Entity::PLACEHOLDER,
        value: "민".to_string(),
        cursor: None,
    });
    app.world_mut().send_event(Ime::Commit {
        window: Entity::PLACEHOLDER,
        value: "민수".to_string(),
    });
    app.update();
    assert_eq!(app.world().resource::<SetupForm>().draft.name, "J 민수");

    app.world_mut()
        .resource_mut::<SetupForm>()
        .draft
        .toggle_member(FamilyRole::Dad);
    press(&mut app, |i| i.submit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::World);
    assert_eq!(app.world().resource::<PlayerProfile>().name(), "J 민수");
}

#[test]
fn test_repeated_submits_emit_one_start_event() {
    let mut app = build_test_app();
    // Keep the fade running so setup stays on screen while submit is held.
    app.insert_resource(GameConfig {
        fade_secs: 60.0,
        ..GameConfig::instant()
    })
    .init_resource::<StartCount>()
    .add_systems(Update, count_starts);
    enter_state(&mut app, GameState::Setup);

    {
        let mut form = app.world_mut().resource_mut::<SetupForm>();
        form.draft.name = "Jamie".to_string();
        form.draft.toggle_member(FamilyRole::Mom);
    }
    for _ in 0..4 {
        press(&mut app, |i| i.submit = true);
    }
    app.update();

    assert_eq!(current_state(&app), GameState::Setup);
    assert!(app.world().resource::<SetupForm>().submitted);
    assert!(app.world().resource::<SceneTransition>().is_pending());
    assert_eq!(app.world().resource::<StartCount>().0, 1);
}

#[test]
fn test_setup_rejects_missing_name_then_family() {
    let mut app = build_test_app();
    enter_state(&mut app, GameState::Setup);

    press(&mut app, |i| i.submit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Setup);
    assert_eq!(
        app.world().resource::<SetupForm>().error.as_deref(),
        Some(ProfileError::EmptyName.to_string().as_str())
    );

    app.world_mut().resource_mut::<SetupForm>().draft.name = "Jamie".to_string();
    press(&mut app, |i| i.submit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Setup);
    assert_eq!(
        app.world().resource::<SetupForm>().error.as_deref(),
        Some(ProfileError::EmptyFamily.to_string().as_str())
    );
    assert!(app.world().get_resource::<PlayerProfile>().is_none());
}

#[test]
fn test_setup_accepts_valid_profile_and_enters_village() {
    let mut app = build_test_app();
    enter_state(&mut app, GameState::Setup);

    {
        let mut form = app.world_mut().resource_mut::<SetupForm>();
        form.draft.name = "  Jamie ".to_string();
        form.draft.toggle_member(FamilyRole::Mom);
    }
    press(&mut app, |i| i.submit = true);
    run_frames(&mut app, 4);

    assert_eq!(current_state(&app), GameState::World);
    let profile = app.world().resource::<PlayerProfile>();
    assert_eq!(profile.name(), "Jamie");
    assert_eq!(profile.family().len(), 1);
    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<VillageNpc>(&mut app), 6);
}

// ─────────────────────────────────────────────────────────────────────────────
// Village and church
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_church_entry_requires_the_door() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom]);
    enter_state(&mut app, GameState::World);

    // Spawn point is far from the door.
    press(&mut app, |i| i.enter = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::World);

    move_player(&mut app, church_door_center());
    app.update();
    assert!(app.world().resource::<SceneGuards>().at_church_entrance);

    press(&mut app, |i| i.enter = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Church);
    assert_eq!(count::<Player>(&mut app), 1);
}

#[test]
fn test_altar_fires_once_and_resets_on_reentry() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom]);
    enter_state(&mut app, GameState::Church);
    assert!(!app.world().resource::<SceneGuards>().altar_fired);

    // Leaving before the altar is allowed.
    press(&mut app, |i| i.exit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::World);

    enter_state(&mut app, GameState::Church);
    assert_eq!(count::<Altar>(&mut app), 1);
    {
        let world = app.world_mut();
        let mut altars = world.query_filtered::<&ProximityTrigger, With<Altar>>();
        let altar = altars.single(world);
        assert!(!altar.has_fired(), "a fresh church has a fresh altar");
    }

    move_player(&mut app, altar_center());
    app.update();
    assert!(app.world().resource::<SceneGuards>().altar_fired);

    let player = player_entity(&mut app).expect("player in church");
    assert!(app.world().entity(player).contains::<Frozen>());

    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Celebration);
}

#[test]
fn test_church_exit_is_ignored_after_altar() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom]);
    enter_state(&mut app, GameState::Church);

    move_player(&mut app, altar_center());
    // Exit pressed on the same frame the altar fires.
    press(&mut app, |i| i.exit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Celebration);
}

#[test]
fn test_world_text_uses_the_game_font() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom, FamilyRole::Sister]);

    for scene in [GameState::World, GameState::Church, GameState::Celebration] {
        enter_state(&mut app, scene);
        press(&mut app, |i| i.punch = true);
        let fonts = text_fonts(&mut app);
        assert!(!fonts.is_empty(), "{scene:?} draws captions");
        assert!(
            fonts.iter().all(|font| *font == test_font()),
            "{scene:?} has text outside the game font"
        );
    }
}

#[test]
fn test_talking_to_a_villager_opens_and_closes_dialogue() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom]);
    enter_state(&mut app, GameState::World);

    let npc_pos = {
        let world = app.world_mut();
        let mut npcs = world.query_filtered::<&Transform, With<VillageNpc>>();
        npcs.iter(world).next().expect("villagers spawned").translation.truncate()
    };
    move_player(&mut app, npc_pos + Vec2::new(10.0, 0.0));
    press(&mut app, |i| i.talk = true);
    app.update();
    assert!(app.world().resource::<DialogueView>().is_open());

    for _ in 0..10 {
        if !app.world().resource::<DialogueView>().is_open() {
            break;
        }
        press(&mut app, |i| i.advance = true);
    }
    assert!(!app.world().resource::<DialogueView>().is_open());
}

#[test]
fn test_single_line_dialogue_closes_on_first_advance() {
    let mut app = build_test_app();
    enter_state(&mut app, GameState::World);

    app.world_mut().send_event(DialogueStartEvent {
        speaker: "Tester".to_string(),
        lines: vec!["hi".to_string()],
    });
    app.update();

    let line = app.world().resource::<DialogueView>().0.clone().expect("dialogue open");
    assert_eq!(line.text, "hi");
    assert_eq!(line.advance, AdvanceLabel::Close);

    press(&mut app, |i| i.advance = true);
    assert!(!app.world().resource::<DialogueView>().is_open());

    let events = app.world().resource::<Events<DialogueEndEvent>>();
    let mut cursor = events.get_cursor();
    let ended: Vec<String> = cursor.read(events).map(|e| e.speaker.clone()).collect();
    assert_eq!(ended, ["Tester"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Celebration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_celebration_runs_mom_then_dad_then_free_play() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Mom, FamilyRole::Dad]);
    enter_state(&mut app, GameState::Celebration);

    let mut shown = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..20 {
        let Some(line) = app.world().resource::<DialogueView>().0.clone() else {
            break;
        };
        shown.push(line.text);
        labels.push(line.advance);
        press(&mut app, |i| i.advance = true);
    }

    let mut expected = family_lines(FamilyRole::Mom, "Jamie");
    expected.extend(family_lines(FamilyRole::Dad, "Jamie"));
    expected.push(closing_line("Jamie"));
    assert_eq!(shown, expected);
    assert!(shown[1].starts_with("Jamie아, "));
    assert!(shown[4].starts_with("Jamie아, "));
    assert_eq!(
        labels,
        [
            AdvanceLabel::Next,
            AdvanceLabel::Next,
            AdvanceLabel::NextMember,
            AdvanceLabel::Next,
            AdvanceLabel::Next,
            AdvanceLabel::Finish,
            AdvanceLabel::FreePlay,
        ]
    );

    app.update();
    assert_eq!(
        app.world().resource::<CelebrationRun>().stage,
        CelebrationStage::FreePlay
    );
    assert!(app.world().resource::<SceneGuards>().free_play);
    assert_eq!(count::<Player>(&mut app), 1);

    press(&mut app, |i| i.exit = true);
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::World);
}

#[test]
fn test_celebration_exit_is_refused_before_free_play() {
    let mut app = build_test_app();
    insert_profile(&mut app, "Jamie", &[FamilyRole::Grandma]);
    enter_state(&mut app, GameState::Celebration);

    app.world_mut().send_event(SceneRequestEvent {
        trigger: SceneTrigger::LeaveCelebration,
    });
    run_frames(&mut app, 3);
    assert_eq!(current_state(&app), GameState::Celebration);
    assert_eq!(
        app.world().resource::<CelebrationRun>().stage,
        CelebrationStage::Speaking
    );
}
