use bevy::prelude::*;
use crate::shared::*;

/// Follow the player with a short lag, clamped so the viewport never shows
/// past the map edge. With no player in the scene the camera rests on the
/// centre of the first screen.
pub fn camera_follow_player(
    time: Res<Time>,
    bounds: Res<MapBounds>,
    player_query: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut camera_query: Query<(&mut Transform, &OrthographicProjection), (With<Camera2d>, Without<Player>)>,
) {
    let Ok((mut cam_tf, projection)) = camera_query.get_single_mut() else {
        return;
    };

    let Ok(player_tf) = player_query.get_single() else {
        cam_tf.translation.x = SCREEN_WIDTH / 2.0;
        cam_tf.translation.y = SCREEN_HEIGHT / 2.0;
        return;
    };

    let target = player_tf.translation.truncate();
    let current = cam_tf.translation.truncate();

    // Teleports (scene entry) snap instead of sweeping across the map.
    let smooth = if current.distance(target) > SCREEN_HEIGHT {
        target
    } else {
        let t = (6.0 * time.delta_secs()).min(1.0);
        current.lerp(target, t)
    };

    let half_view = Vec2::new(projection.area.width(), projection.area.height()) / 2.0;
    let min = bounds.min + half_view;
    let max = (bounds.max - half_view).max(min);
    let clamped = Vec2::new(
        if bounds.max.x - bounds.min.x <= half_view.x * 2.0 {
            (bounds.min.x + bounds.max.x) / 2.0
        } else {
            smooth.x.clamp(min.x, max.x)
        },
        if bounds.height() <= half_view.y * 2.0 {
            (bounds.min.y + bounds.max.y) / 2.0
        } else {
            smooth.y.clamp(min.y, max.y)
        },
    );

    cam_tf.translation.x = clamped.x;
    cam_tf.translation.y = clamped.y;
}
