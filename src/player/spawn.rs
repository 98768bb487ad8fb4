use bevy::prelude::*;
use crate::data::ArtCatalog;
use crate::shared::*;
use super::{WalkAnimation, PLAYER_SIZE};

/// Spawn the avatar for each `SpawnPlayerEvent`. The entity is scoped to
/// the requesting scene, so leaving that scene removes it.
pub fn spawn_requested_player(
    mut commands: Commands,
    mut events: EventReader<SpawnPlayerEvent>,
    catalog: Res<ArtCatalog>,
    profile: Option<Res<PlayerProfile>>,
    existing: Query<&StateScoped<GameState>, With<Player>>,
    mut bounds: ResMut<MapBounds>,
) {
    for event in events.read() {
        // Guard: one avatar per scene instance.
        if existing.iter().any(|scoped| scoped.0 == event.scene) {
            debug!("[Player] already spawned in {:?}", event.scene);
            continue;
        }

        let gender = profile.as_deref().map(PlayerProfile::gender).unwrap_or_default();
        let position = event.bounds.clamp(event.position);
        *bounds = event.bounds;

        commands.spawn((
            Player,
            PlayerMovement::with_speed(event.speed),
            WalkAnimation::default(),
            catalog.player_sprite(gender, PLAYER_SIZE),
            // Z = 10 so the player draws above props and NPCs.
            Transform::from_translation(position.extend(10.0)),
            StateScoped(event.scene),
        ));
        info!("[Player] spawned in {:?} at {:?}", event.scene, position);
    }
}
