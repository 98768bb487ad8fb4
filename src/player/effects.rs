//! Punch and pray flourishes: a squash on the avatar plus a floating
//! emoji that drifts up and fades.

use bevy::prelude::*;
use crate::shared::*;

/// Horizontal squash on the avatar; `peak` is the widest x scale.
#[derive(Component, Debug)]
pub struct PunchSquash {
    pub timer: Timer,
    pub peak: f32,
}

#[derive(Component, Debug)]
pub struct FloatingEffect {
    pub timer: Timer,
    pub rise: f32,
    pub grow: f32,
    pub origin: Vec2,
}

const PUNCH_HALF_SECS: f32 = 0.1;

fn punch_peak(scene: GameState) -> f32 {
    match scene {
        GameState::Celebration => 1.3,
        _ => 1.8,
    }
}

pub fn punch_and_pray(
    mut commands: Commands,
    input: Res<PlayerInput>,
    state: Res<State<GameState>>,
    font: Res<UiFontHandle>,
    players: Query<(Entity, &Transform), (With<Player>, Without<PunchSquash>)>,
) {
    if !input.punch && !input.pray {
        return;
    }
    let Ok((entity, transform)) = players.get_single() else {
        return;
    };
    let scene = *state.get();
    let at = transform.translation.truncate();

    if input.punch {
        commands.entity(entity).insert(PunchSquash {
            timer: Timer::from_seconds(PUNCH_HALF_SECS * 2.0, TimerMode::Once),
            peak: punch_peak(scene),
        });
        spawn_floating(&mut commands, &font, scene, "💥", at + Vec2::new(30.0, 20.0), 30.0, 1.0, 0.4);
    }
    // Prayer only exists once the celebration is over.
    if input.pray && scene == GameState::Celebration {
        spawn_floating(&mut commands, &font, scene, "✨", at + Vec2::new(0.0, 30.0), 40.0, 2.0, 0.8);
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_floating(
    commands: &mut Commands,
    font: &UiFontHandle,
    scene: GameState,
    glyph: &str,
    origin: Vec2,
    rise: f32,
    grow: f32,
    secs: f32,
) {
    commands.spawn((
        FloatingEffect {
            timer: Timer::from_seconds(secs, TimerMode::Once),
            rise,
            grow,
            origin,
        },
        Text2d::new(glyph),
        text_font(font, 22.0),
        TextColor(Color::WHITE),
        Transform::from_translation(origin.extend(50.0)),
        StateScoped(scene),
    ));
}

pub fn tick_punch_squash(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut PunchSquash, &mut Transform)>,
) {
    for (entity, mut squash, mut transform) in &mut query {
        squash.timer.tick(time.delta());
        // Out and back: 0 -> 1 -> 0 over the timer.
        let f = squash.timer.fraction();
        let k = 1.0 - (2.0 * f - 1.0).abs();
        transform.scale.x = 1.0 + (squash.peak - 1.0) * k;
        if squash.timer.finished() {
            transform.scale.x = 1.0;
            commands.entity(entity).remove::<PunchSquash>();
        }
    }
}

pub fn drift_floating_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FloatingEffect, &mut Transform, &mut TextColor)>,
) {
    for (entity, mut effect, mut transform, mut color) in &mut query {
        effect.timer.tick(time.delta());
        let f = effect.timer.fraction();
        transform.translation.y = effect.origin.y + effect.rise * f;
        transform.scale = Vec3::splat(1.0 + (effect.grow - 1.0) * f);
        color.0.set_alpha(1.0 - f);
        if effect.timer.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
