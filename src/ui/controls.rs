//! On-screen controls for touch play: action buttons in the bottom-right
//! corner and the virtual joystick on the left.
//!
//! Buttons only carry `ActionButton`; the input domain turns presses into
//! `PlayerInput` flags. Visibility follows `SceneGuards` and the dialog box.

use bevy::prelude::*;
use crate::input::VirtualJoystick;
use crate::shared::*;

const BUTTON_SIZE: f32 = 60.0;
const JOYSTICK_BASE_SIZE: f32 = 100.0;
const JOYSTICK_THUMB_SIZE: f32 = 40.0;
/// Resting centre of the stick, measured from the bottom-left corner.
const JOYSTICK_HOME: Vec2 = Vec2::new(80.0, 100.0);

const BUTTON_IDLE: Color = Color::srgba(0.290, 0.192, 0.118, 0.85);
const BUTTON_PRESSED: Color = Color::srgba(0.831, 0.647, 0.455, 0.95);

/// When a control button is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowWhen {
    Always,
    AtChurchDoor,
    BeforeAltar,
    FreePlay,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ControlButton {
    pub show: ShowWhen,
}

#[derive(Component)]
pub struct JoystickBase;

#[derive(Component)]
pub struct JoystickThumb;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

/// Spawn one round action button whose centre sits `right`/`bottom`
/// pixels from the bottom-right corner.
#[allow(clippy::too_many_arguments)]
fn spawn_action_button(
    commands: &mut Commands,
    font: &UiFontHandle,
    scene: GameState,
    action: Action,
    icon: &str,
    right: f32,
    bottom: f32,
    show: ShowWhen,
) {
    let half = BUTTON_SIZE / 2.0;
    commands
        .spawn((
            ActionButton(action),
            ControlButton { show },
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(right - half),
                bottom: Val::Px(bottom - half),
                width: Val::Px(BUTTON_SIZE),
                height: Val::Px(BUTTON_SIZE),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            BorderColor(COLOR_GOLD),
            BorderRadius::MAX,
            GlobalZIndex(15),
            StateScoped(scene),
        ))
        .with_children(|b| {
            b.spawn((
                Text::new(icon),
                text_font(font, 26.0),
                TextColor(COLOR_CREAM),
                PickingBehavior::IGNORE,
            ));
        });
}

pub fn spawn_world_controls(mut commands: Commands, font: Res<UiFontHandle>) {
    let scene = GameState::World;
    spawn_action_button(&mut commands, &font, scene, Action::Talk, "💬", 80.0, 130.0, ShowWhen::Always);
    spawn_action_button(&mut commands, &font, scene, Action::Punch, "👊", 80.0, 60.0, ShowWhen::Always);
    spawn_action_button(&mut commands, &font, scene, Action::Enter, "⛪", 150.0, 95.0, ShowWhen::AtChurchDoor);
}

pub fn spawn_church_controls(mut commands: Commands, font: Res<UiFontHandle>) {
    spawn_action_button(
        &mut commands,
        &font,
        GameState::Church,
        Action::Exit,
        "🚪",
        80.0,
        60.0,
        ShowWhen::BeforeAltar,
    );
}

pub fn spawn_free_play_controls(mut commands: Commands, font: Res<UiFontHandle>) {
    let scene = GameState::Celebration;
    spawn_action_button(&mut commands, &font, scene, Action::Punch, "👊", 80.0, 60.0, ShowWhen::FreePlay);
    spawn_action_button(&mut commands, &font, scene, Action::Pray, "🙏", 80.0, 130.0, ShowWhen::FreePlay);
    spawn_action_button(&mut commands, &font, scene, Action::Exit, "🚪", 150.0, 95.0, ShowWhen::FreePlay);
}

pub fn spawn_joystick(mut commands: Commands, state: Res<State<GameState>>) {
    let half_base = JOYSTICK_BASE_SIZE / 2.0;
    let thumb_offset = (JOYSTICK_BASE_SIZE - JOYSTICK_THUMB_SIZE) / 2.0;
    commands
        .spawn((
            JoystickBase,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(JOYSTICK_HOME.x - half_base),
                bottom: Val::Px(JOYSTICK_HOME.y - half_base),
                width: Val::Px(JOYSTICK_BASE_SIZE),
                height: Val::Px(JOYSTICK_BASE_SIZE),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
            BorderColor(COLOR_GOLD.with_alpha(0.6)),
            BorderRadius::MAX,
            GlobalZIndex(14),
            PickingBehavior::IGNORE,
            StateScoped(*state.get()),
        ))
        .with_children(|base| {
            base.spawn((
                JoystickThumb,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(thumb_offset),
                    top: Val::Px(thumb_offset),
                    width: Val::Px(JOYSTICK_THUMB_SIZE),
                    height: Val::Px(JOYSTICK_THUMB_SIZE),
                    ..default()
                },
                BackgroundColor(COLOR_GOLD.with_alpha(0.8)),
                BorderRadius::MAX,
                PickingBehavior::IGNORE,
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

fn is_shown(show: ShowWhen, guards: &SceneGuards) -> bool {
    match show {
        ShowWhen::Always => true,
        ShowWhen::AtChurchDoor => guards.at_church_entrance,
        ShowWhen::BeforeAltar => !guards.altar_fired,
        ShowWhen::FreePlay => guards.free_play,
    }
}

/// Controls are hidden while a line is on screen.
pub fn update_control_visibility(
    guards: Res<SceneGuards>,
    view: Res<DialogueView>,
    mut buttons: Query<(&ControlButton, &mut Visibility)>,
) {
    for (button, mut vis) in &mut buttons {
        let shown = !view.is_open() && is_shown(button.show, &guards);
        let next = if shown { Visibility::Inherited } else { Visibility::Hidden };
        if *vis != next {
            *vis = next;
        }
    }
}

/// Move the stick to where the drag started and offset the thumb.
/// `VirtualJoystick` positions are window coordinates, which match UI pixels.
pub fn update_joystick_visuals(
    stick: Res<VirtualJoystick>,
    mut bases: Query<&mut Node, (With<JoystickBase>, Without<JoystickThumb>)>,
    mut thumbs: Query<&mut Node, (With<JoystickThumb>, Without<JoystickBase>)>,
) {
    if !stick.is_changed() {
        return;
    }
    let half_base = JOYSTICK_BASE_SIZE / 2.0;
    let thumb_offset = (JOYSTICK_BASE_SIZE - JOYSTICK_THUMB_SIZE) / 2.0;

    for mut node in &mut bases {
        match stick.base {
            Some(base) => {
                node.left = Val::Px(base.x - half_base);
                node.top = Val::Px(base.y - half_base);
                node.bottom = Val::Auto;
            }
            None => {
                node.left = Val::Px(JOYSTICK_HOME.x - half_base);
                node.top = Val::Auto;
                node.bottom = Val::Px(JOYSTICK_HOME.y - half_base);
            }
        }
    }
    for mut node in &mut thumbs {
        node.left = Val::Px(thumb_offset + stick.thumb.x);
        node.top = Val::Px(thumb_offset + stick.thumb.y);
    }
}

pub fn button_press_feedback(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<ControlButton>)>,
) {
    for (interaction, mut bg) in &mut buttons {
        bg.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            _ => BUTTON_IDLE,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_button_follows_entrance_guard() {
        let mut guards = SceneGuards::default();
        assert!(!is_shown(ShowWhen::AtChurchDoor, &guards));
        guards.at_church_entrance = true;
        assert!(is_shown(ShowWhen::AtChurchDoor, &guards));
    }

    #[test]
    fn test_church_exit_hidden_after_altar() {
        let mut guards = SceneGuards::default();
        assert!(is_shown(ShowWhen::BeforeAltar, &guards));
        guards.altar_fired = true;
        assert!(!is_shown(ShowWhen::BeforeAltar, &guards));
    }

    #[test]
    fn test_free_play_buttons_wait_for_free_play() {
        let mut guards = SceneGuards::default();
        assert!(!is_shown(ShowWhen::FreePlay, &guards));
        guards.free_play = true;
        assert!(is_shown(ShowWhen::FreePlay, &guards));
    }
}
