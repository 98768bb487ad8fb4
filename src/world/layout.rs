//! Where things stand on each map, in layout coordinates (top-left
//! origin, y down). Callers convert with `screen_to_world`.

use bevy::prelude::*;

/// Church pews and seats are laid out across this row.
pub const CHURCH_SEAT_Y: f32 = 160.0;

pub const VILLAGE_SPAWN: (f32, f32) = (195.0, 1266.0);
pub const CHURCH_SPAWN: (f32, f32) = (195.0, 744.0);
pub const FREE_PLAY_SPAWN: (f32, f32) = (195.0, 764.0);
pub const CHURCH_BUILDING: (f32, f32) = (195.0, 80.0);

pub const VILLAGE_TREES: [(f32, f32); 6] = [
    (40.0, 100.0),
    (350.0, 150.0),
    (60.0, 300.0),
    (330.0, 350.0),
    (100.0, 500.0),
    (290.0, 550.0),
];

pub const CHURCH_BALLOONS: [(f32, f32); 6] = [
    (30.0, 80.0),
    (360.0, 80.0),
    (60.0, 150.0),
    (330.0, 150.0),
    (115.0, 130.0),
    (275.0, 130.0),
];

/// `n` members spread evenly across a row of the given width, in roster
/// order from left to right.
pub fn seat_positions(n: usize, width: f32, y: f32) -> Vec<Vec2> {
    let spacing = width / (n as f32 + 1.0);
    (0..n).map(|i| Vec2::new(spacing * (i as f32 + 1.0), y)).collect()
}

/// `n` members on a flattened half-ring above the cake, left to right.
/// A single member stands at the left end.
pub fn arc_positions(n: usize, center: Vec2, radius: f32) -> Vec<Vec2> {
    let start = std::f32::consts::PI;
    let step = if n > 1 { -start / (n as f32 - 1.0) } else { 0.0 };
    (0..n)
        .map(|i| {
            let angle = start + step * i as f32;
            Vec2::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius * 0.5 + 50.0,
            )
        })
        .collect()
}

/// Index of the closest point strictly within `range` of `from`.
pub fn nearest_within(from: Vec2, points: impl IntoIterator<Item = Vec2>, range: f32) -> Option<usize> {
    points
        .into_iter()
        .enumerate()
        .map(|(i, p)| (i, from.distance(p)))
        .filter(|(_, d)| *d < range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
