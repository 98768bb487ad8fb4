use bevy::prelude::*;
use bevy::ui::UiSystem;
use bevy::window::PrimaryWindow;

use crate::config::GameConfig;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<InputContext>()
            .init_resource::<VirtualJoystick>();

        app.add_systems(
            PreUpdate,
            (
                manage_input_context,
                reset_and_read_input,
                read_action_buttons,
                track_virtual_joystick,
            )
                .chain()
                .after(UiSystem::Focus),
        );
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    match *context {
        InputContext::Disabled => {}

        InputContext::Form => {
            input.submit =
                keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::NumpadEnter);
        }

        InputContext::Explore => {
            let mut axis = Vec2::ZERO;
            if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
                axis.y += 1.0;
            }
            if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
                axis.y -= 1.0;
            }
            if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
                axis.x -= 1.0;
            }
            if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
                axis.x += 1.0;
            }
            input.move_axis = axis.normalize_or_zero();

            input.talk = keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::KeyF);
            input.punch = keys.just_pressed(KeyCode::KeyJ);
            input.pray = keys.just_pressed(KeyCode::KeyP);
            input.enter = keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::KeyE);
            input.exit = keys.just_pressed(KeyCode::Escape) || keys.just_pressed(KeyCode::KeyQ);
        }

        InputContext::Dialogue => {
            input.advance = keys.just_pressed(KeyCode::Space)
                || keys.just_pressed(KeyCode::KeyF)
                || keys.just_pressed(KeyCode::Enter);
        }
    }
}

/// Derives InputContext from GameState and the dialog box. Movement and
/// scene actions are off while a line is on screen.
fn manage_input_context(
    game_state: Res<State<GameState>>,
    view: Res<DialogueView>,
    mut context: ResMut<InputContext>,
) {
    let next = match *game_state.get() {
        GameState::Boot | GameState::Preload => InputContext::Disabled,
        GameState::Setup => InputContext::Form,
        GameState::World | GameState::Church | GameState::Celebration => {
            if view.is_open() {
                InputContext::Dialogue
            } else {
                InputContext::Explore
            }
        }
    };
    if *context != next {
        *context = next;
    }
}

/// On-screen buttons feed the same flags as their keys.
fn read_action_buttons(
    buttons: Query<(&Interaction, &ActionButton), Changed<Interaction>>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match (*context, button.0) {
            (InputContext::Form, Action::Submit) => input.submit = true,
            (InputContext::Dialogue, Action::Advance) => input.advance = true,
            (InputContext::Explore, Action::Talk) => input.talk = true,
            (InputContext::Explore, Action::Punch) => input.punch = true,
            (InputContext::Explore, Action::Pray) => input.pray = true,
            (InputContext::Explore, Action::Enter) => input.enter = true,
            (InputContext::Explore, Action::Exit) => input.exit = true,
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// VIRTUAL JOYSTICK
// ═══════════════════════════════════════════════════════════════════════

/// Touch/drag stick anchored wherever the pointer first lands on the left
/// half of the screen. Positions are window coordinates (y down).
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct VirtualJoystick {
    pub base: Option<Vec2>,
    /// Thumb offset from the base, clamped to the radius.
    pub thumb: Vec2,
    /// World-space direction, length <= 1.
    pub vector: Vec2,
    touch: Option<u64>,
}

impl VirtualJoystick {
    pub fn is_active(&self) -> bool {
        self.base.is_some()
    }

    fn release(&mut self) {
        *self = Self::default();
    }
}

/// Thumb offset (window space) and movement vector (world space, y up)
/// for a pointer dragged from `base` to `pointer`.
pub fn joystick_vector(base: Vec2, pointer: Vec2, radius: f32) -> (Vec2, Vec2) {
    if radius <= 0.0 {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    let delta = pointer - base;
    let thumb = delta.clamp_length_max(radius);
    let vector = Vec2::new(thumb.x, -thumb.y) / radius;
    (thumb, vector)
}

fn track_virtual_joystick(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    context: Res<InputContext>,
    config: Res<GameConfig>,
    mut stick: ResMut<VirtualJoystick>,
    mut input: ResMut<PlayerInput>,
) {
    if *context != InputContext::Explore {
        if stick.is_active() {
            stick.release();
        }
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let half_width = window.width() / 2.0;

    // Current pointer: the tracked touch, or the held mouse.
    let mut pointer = None;
    if let Some(touches) = touches.as_deref() {
        match stick.touch {
            Some(id) => pointer = touches.get_pressed(id).map(|t| t.position()),
            None if stick.base.is_none() => {
                if let Some(touch) = touches
                    .iter_just_pressed()
                    .find(|t| t.position().x < half_width)
                {
                    stick.touch = Some(touch.id());
                    stick.base = Some(touch.position());
                    pointer = Some(touch.position());
                }
            }
            None => {}
        }
    }
    if stick.touch.is_none() {
        if let Some(mouse) = mouse.as_deref() {
            let cursor = window.cursor_position();
            if mouse.just_pressed(MouseButton::Left) && stick.base.is_none() {
                if let Some(pos) = cursor.filter(|p| p.x < half_width) {
                    stick.base = Some(pos);
                }
            }
            if mouse.pressed(MouseButton::Left) && stick.base.is_some() {
                pointer = cursor;
            }
        }
    }

    match (stick.base, pointer) {
        (Some(base), Some(pointer)) => {
            let (thumb, vector) = joystick_vector(base, pointer, config.joystick_radius);
            stick.thumb = thumb;
            stick.vector = vector;
            if vector != Vec2::ZERO {
                input.move_axis = vector;
            }
        }
        (Some(_), None) => stick.release(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joystick_inside_radius_is_proportional() {
        let (thumb, v) = joystick_vector(Vec2::new(100.0, 700.0), Vec2::new(120.0, 700.0), 40.0);
        assert_eq!(thumb, Vec2::new(20.0, 0.0));
        assert_eq!(v, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_joystick_clamps_to_unit_disc() {
        let (thumb, v) = joystick_vector(Vec2::ZERO, Vec2::new(300.0, 400.0), 40.0);
        assert!((thumb.length() - 40.0).abs() < 1e-4);
        assert!((v.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_joystick_flips_y_to_world_space() {
        // Dragging down the screen moves the player down the map.
        let (_, v) = joystick_vector(Vec2::ZERO, Vec2::new(0.0, 40.0), 40.0);
        assert_eq!(v, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_joystick_zero_radius_is_inert() {
        assert_eq!(joystick_vector(Vec2::ZERO, Vec2::ONE, 0.0), (Vec2::ZERO, Vec2::ZERO));
    }
}
