use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudPlayerName;

#[derive(Component)]
pub struct HudLocationText;

/// World-space "enter the church" prompt above the village church.
#[derive(Component)]
pub struct HudEnterPrompt;

/// Church hint at the bottom of the screen until the altar fires.
#[derive(Component)]
pub struct HudChurchHint;

const HEADER_HEIGHT: f32 = 50.0;
const HEADER_BG: Color = Color::srgba(0.173, 0.094, 0.063, 0.8);
const ENTER_PROMPT_Y: f32 = 180.0;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

/// Top bar: player name on the left, location on the right.
pub fn spawn_header(
    mut commands: Commands,
    font: Res<UiFontHandle>,
    state: Res<State<GameState>>,
    profile: Option<Res<PlayerProfile>>,
) {
    let scene = *state.get();
    let name = profile
        .as_deref()
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| FALLBACK_PLAYER_NAME.to_string());
    let location = scene.location_label().unwrap_or_default();

    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(HEADER_HEIGHT),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::horizontal(Val::Px(16.0)),
                border: UiRect::bottom(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(HEADER_BG),
            BorderColor(COLOR_GOLD),
            GlobalZIndex(10),
            PickingBehavior::IGNORE,
            StateScoped(scene),
        ))
        .with_children(|bar| {
            bar.spawn((
                HudPlayerName,
                Text::new(format!("🧑 {name}")),
                text_font(&font, 16.0),
                TextColor(COLOR_CREAM),
                PickingBehavior::IGNORE,
            ));
            bar.spawn((
                HudLocationText,
                Text::new(location),
                text_font(&font, 14.0),
                TextColor(COLOR_GOLD),
                PickingBehavior::IGNORE,
            ));
        });
}

pub fn spawn_enter_prompt(mut commands: Commands, font: Res<UiFontHandle>) {
    let pos = screen_to_world(SCREEN_WIDTH / 2.0, ENTER_PROMPT_Y, VILLAGE_HEIGHT);
    commands.spawn((
        HudEnterPrompt,
        Text2d::new("⛪ 교회 입장하기"),
        text_font(&font, 16.0),
        TextColor(COLOR_GOLD),
        Transform::from_xyz(pos.x, pos.y, 20.0),
        Visibility::Hidden,
        StateScoped(GameState::World),
    ));
}

pub fn spawn_church_hint(mut commands: Commands, font: Res<UiFontHandle>) {
    commands
        .spawn((
            HudChurchHint,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(20.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            PickingBehavior::IGNORE,
            StateScoped(GameState::Church),
        ))
        .with_children(|row| {
            row.spawn((
                Text::new("💡 앞으로 이동하여 가족을 만나세요!"),
                text_font(&font, 14.0),
                TextColor(COLOR_CREAM),
                PickingBehavior::IGNORE,
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

/// The enter prompt follows the door region; the church hint goes away
/// once the altar has been reached.
pub fn update_church_prompts(
    guards: Res<SceneGuards>,
    mut prompts: Query<&mut Visibility, (With<HudEnterPrompt>, Without<HudChurchHint>)>,
    mut hints: Query<&mut Visibility, (With<HudChurchHint>, Without<HudEnterPrompt>)>,
) {
    let show = |on: bool| if on { Visibility::Inherited } else { Visibility::Hidden };
    for mut vis in &mut prompts {
        *vis = show(guards.at_church_entrance);
    }
    for mut vis in &mut hints {
        *vis = show(!guards.altar_fired);
    }
}
