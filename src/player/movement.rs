use bevy::prelude::*;
use crate::shared::*;
use super::{WalkAnimation, IDLE_FRAMES, WALK_FRAMES};

/// Facing for a movement direction. Vertical wins on exact diagonals.
pub fn facing_for(dir: Vec2) -> Option<Facing> {
    if dir == Vec2::ZERO {
        return None;
    }
    Some(if dir.y.abs() >= dir.x.abs() {
        if dir.y > 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    } else if dir.x > 0.0 {
        Facing::Right
    } else {
        Facing::Left
    })
}

/// Move the avatar along `PlayerInput::move_axis`, kept inside the scene's
/// walkable bounds. Frozen avatars and open dialogues stop movement.
pub fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    view: Res<DialogueView>,
    bounds: Res<MapBounds>,
    mut query: Query<(&mut Transform, &mut PlayerMovement, Has<Frozen>), With<Player>>,
) {
    let Ok((mut transform, mut movement, frozen)) = query.get_single_mut() else {
        return;
    };

    let dir = input.move_axis.clamp_length_max(1.0);
    if frozen || view.is_open() || dir == Vec2::ZERO {
        movement.is_moving = false;
        return;
    }

    movement.is_moving = true;
    if let Some(facing) = facing_for(dir) {
        movement.facing = facing;
    }

    let delta = dir * movement.speed * time.delta_secs();
    let next = bounds.clamp(transform.translation.truncate() + delta);
    transform.translation.x = next.x;
    transform.translation.y = next.y;
}

pub fn animate_player_sprite(
    time: Res<Time>,
    mut query: Query<(&PlayerMovement, &mut WalkAnimation, &mut Sprite), With<Player>>,
) {
    for (movement, mut anim, mut sprite) in &mut query {
        anim.timer.tick(time.delta());
        if anim.timer.just_finished() {
            anim.frame = anim.frame.wrapping_add(1);
        }

        let (row_start, frames) = match (movement.is_moving, movement.facing) {
            (false, _) => (0, IDLE_FRAMES),
            (true, Facing::Down) => (0, WALK_FRAMES),
            (true, Facing::Up) => (WALK_FRAMES, WALK_FRAMES),
            (true, Facing::Left | Facing::Right) => (WALK_FRAMES * 2, WALK_FRAMES),
        };
        sprite.flip_x = movement.facing == Facing::Left;

        // Placeholder avatars have no atlas.
        if let Some(atlas) = sprite.texture_atlas.as_mut() {
            atlas.index = row_start + anim.frame % frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_prefers_vertical_on_diagonal() {
        assert_eq!(facing_for(Vec2::new(1.0, 1.0)), Some(Facing::Up));
        assert_eq!(facing_for(Vec2::new(-1.0, -1.0)), Some(Facing::Down));
        assert_eq!(facing_for(Vec2::new(-1.0, 0.2)), Some(Facing::Left));
        assert_eq!(facing_for(Vec2::new(0.9, 0.0)), Some(Facing::Right));
        assert_eq!(facing_for(Vec2::ZERO), None);
    }
}
