//! Data layer: static content tables and art resolution.
//!
//! The content tables (family birthday templates, village NPCs, form
//! labels) are plain lookups compiled into the binary. Art is loaded when
//! the Preload scene starts; once every handle has either loaded or failed,
//! the loaded ones go into `ArtCatalog` and the scene asks to move on to
//! Setup. Characters whose image failed are drawn with their placeholder.

pub mod art;
pub mod family;
pub mod npcs;

use bevy::asset::LoadState;
use bevy::prelude::*;
use crate::shared::*;

pub use art::{ArtCatalog, ArtKey};
pub use family::{family_lines, family_member, CLOSING_SPEAKER};
pub use npcs::{NpcId, VILLAGE_NPCS};

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArtCatalog>()
            .init_resource::<LoadProgress>();

        app.add_systems(OnEnter(GameState::Boot), check_content_tables);
        app.add_systems(OnEnter(GameState::Preload), begin_art_loading);
        app.add_systems(
            Update,
            track_art_loading.run_if(in_state(GameState::Preload)),
        );
        app.add_systems(OnExit(GameState::Preload), |mut commands: Commands| {
            commands.remove_resource::<PendingArt>();
        });
    }
}

/// Handles requested in Preload that have not been sorted yet.
#[derive(Resource, Debug, Default)]
pub struct PendingArt {
    pub handles: Vec<(ArtKey, Handle<Image>)>,
}

/// Preload progress for the loading bar.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LoadProgress {
    pub settled: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.settled as f32 / self.total as f32
        }
    }
}

/// Every family role and village NPC must say three non-empty lines.
pub fn validate_content() -> Result<usize, SequenceError> {
    let mut checked = 0;
    for role in FamilyRole::ALL {
        let lines = family_lines(role, FALLBACK_PLAYER_NAME);
        if lines.len() != 3 || lines.iter().any(|l| l.trim().is_empty()) {
            return Err(SequenceError::Configuration(format!(
                "family template for {role:?} is incomplete"
            )));
        }
        checked += 1;
    }
    for npc in VILLAGE_NPCS.iter() {
        if npc.lines().iter().any(|l| l.trim().is_empty()) {
            return Err(SequenceError::Configuration(format!(
                "npc template for {} is incomplete",
                npc.name
            )));
        }
        checked += 1;
    }
    Ok(checked)
}

fn check_content_tables() {
    match validate_content() {
        Ok(count) => info!("[Data] {} dialogue templates checked", count),
        Err(err) => error!("[Data] {}", err),
    }
}

fn begin_art_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut catalog: ResMut<ArtCatalog>,
    mut progress: ResMut<LoadProgress>,
) {
    let handles: Vec<(ArtKey, Handle<Image>)> = ArtKey::ALL
        .iter()
        .map(|key| (*key, asset_server.load(key.path())))
        .collect();

    catalog.set_player_layout(layouts.add(TextureAtlasLayout::from_grid(
        art::PLAYER_FRAME,
        art::PLAYER_SHEET_COLUMNS,
        art::PLAYER_SHEET_ROWS,
        None,
        None,
    )));

    *progress = LoadProgress {
        settled: 0,
        total: handles.len(),
    };
    info!("[Data] loading {} images", handles.len());
    commands.insert_resource(PendingArt { handles });
}

fn track_art_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    pending: Option<ResMut<PendingArt>>,
    mut catalog: ResMut<ArtCatalog>,
    mut progress: ResMut<LoadProgress>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    let Some(mut pending) = pending else { return };

    let mut failed = 0;
    pending.handles.retain(|(key, handle)| {
        match asset_server.load_state(handle.id()) {
            LoadState::Loaded => {
                catalog.insert(*key, handle.clone());
                false
            }
            LoadState::Failed(_) => {
                failed += 1;
                warn!("[Data] {} unavailable, using placeholder", key.path());
                false
            }
            _ => true,
        }
    });
    progress.settled = progress.total - pending.handles.len();

    if failed > 0 {
        debug!("[Data] {} images failed this frame", failed);
    }

    if pending.handles.is_empty() {
        info!(
            "[Data] art resolved: {} loaded, {} placeholders",
            catalog.len(),
            progress.total - catalog.len()
        );
        commands.remove_resource::<PendingArt>();
        requests.send(SceneRequestEvent {
            trigger: SceneTrigger::AssetsReady,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tables_are_complete() {
        assert_eq!(validate_content(), Ok(12 + 6));
    }

    #[test]
    fn test_family_lines_address_player() {
        let lines = family_lines(FamilyRole::Mom, "Jamie");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "사랑하는 우리 아이야~");
        assert!(lines[1].starts_with("Jamie아, "));
        assert_eq!(lines[2], "엄마가 항상 기도할게. 사랑해! 💕");
    }

    #[test]
    fn test_npc_lookup_matches_id() {
        for npc in VILLAGE_NPCS.iter() {
            assert_eq!(npcs::npc(npc.id).id, npc.id);
        }
    }

    #[test]
    fn test_load_progress_fraction() {
        assert_eq!(LoadProgress::default().fraction(), 1.0);
        let p = LoadProgress { settled: 3, total: 12 };
        assert!((p.fraction() - 0.25).abs() < f32::EPSILON);
    }
}
