//! Art descriptors: which image (and which pose inside it) represents each
//! character, plus the typed placeholder used when the image is missing.
//! Resolved once in the Preload scene into `ArtCatalog`.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;
use super::npcs::{BiblicalNpc, NpcId};

/// Player sheets: 8 columns x 4 rows of 352x384 frames.
pub const PLAYER_FRAME: UVec2 = UVec2::new(352, 384);
pub const PLAYER_SHEET_COLUMNS: u32 = 8;
pub const PLAYER_SHEET_ROWS: u32 = 4;

/// Family images hold several 640x768 poses side by side; the sibling
/// image has the brother on the left and the sister on the right.
pub const FAMILY_POSE: UVec2 = UVec2::new(640, 768);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtKey {
    PlayerMale,
    PlayerFemale,
    FamilyMom,
    FamilyDad,
    FamilyGrandma,
    FamilySibling,
    Npc(NpcId),
    ChurchExterior,
    ChurchInterior,
    Cake,
}

impl ArtKey {
    pub const ALL: [ArtKey; 15] = [
        ArtKey::PlayerMale,
        ArtKey::PlayerFemale,
        ArtKey::FamilyMom,
        ArtKey::FamilyDad,
        ArtKey::FamilyGrandma,
        ArtKey::FamilySibling,
        ArtKey::Npc(NpcId::David),
        ArtKey::Npc(NpcId::Moses),
        ArtKey::Npc(NpcId::Mary),
        ArtKey::Npc(NpcId::Abraham),
        ArtKey::Npc(NpcId::Joseph),
        ArtKey::Npc(NpcId::Peter),
        ArtKey::ChurchExterior,
        ArtKey::ChurchInterior,
        ArtKey::Cake,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ArtKey::PlayerMale => "images/player_male.png",
            ArtKey::PlayerFemale => "images/player_female.png",
            ArtKey::FamilyMom => "images/family_mom.png",
            ArtKey::FamilyDad => "images/family_dad.png",
            ArtKey::FamilyGrandma => "images/family_grandma.png",
            ArtKey::FamilySibling => "images/family_sibling.png",
            ArtKey::Npc(NpcId::David) => "images/biblical_david.png",
            ArtKey::Npc(NpcId::Moses) => "images/biblical_moses.png",
            ArtKey::Npc(NpcId::Mary) => "images/biblical_mary.png",
            ArtKey::Npc(NpcId::Abraham) => "images/biblical_abraham.png",
            ArtKey::Npc(NpcId::Joseph) => "images/biblical_joseph.png",
            ArtKey::Npc(NpcId::Peter) => "images/biblical_peter.png",
            ArtKey::ChurchExterior => "images/church_exterior.png",
            ArtKey::ChurchInterior => "images/church_interior.png",
            ArtKey::Cake => "images/cake.png",
        }
    }
}

/// Where a family role's portrait comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortraitSource {
    pub art: ArtKey,
    /// Column of the pose inside the image.
    pub pose: u32,
    pub placeholder: Color,
}

pub fn family_portrait(role: FamilyRole) -> PortraitSource {
    let (art, pose, placeholder) = match role {
        FamilyRole::Mom => (ArtKey::FamilyMom, 0, Color::srgb(1.0, 0.412, 0.706)),
        FamilyRole::Dad => (ArtKey::FamilyDad, 0, Color::srgb(0.255, 0.412, 0.882)),
        FamilyRole::Grandma => (ArtKey::FamilyGrandma, 0, Color::srgb(0.867, 0.627, 0.867)),
        FamilyRole::Grandpa => (ArtKey::FamilyDad, 0, Color::srgb(0.545, 0.271, 0.075)),
        FamilyRole::Brother => (ArtKey::FamilySibling, 0, Color::srgb(0.196, 0.804, 0.196)),
        FamilyRole::Sister => (ArtKey::FamilySibling, 1, Color::srgb(1.0, 0.843, 0.0)),
        FamilyRole::OlderBrother => (ArtKey::FamilySibling, 0, Color::srgb(0.125, 0.698, 0.667)),
        FamilyRole::OlderSister => (ArtKey::FamilySibling, 1, Color::srgb(1.0, 0.388, 0.278)),
        FamilyRole::Husband => (ArtKey::FamilyDad, 0, Color::srgb(0.392, 0.584, 0.929)),
        FamilyRole::Wife => (ArtKey::FamilyMom, 0, Color::srgb(0.859, 0.439, 0.576)),
        FamilyRole::Son => (ArtKey::FamilySibling, 0, Color::srgb(0.0, 0.808, 0.820)),
        FamilyRole::Daughter => (ArtKey::FamilySibling, 1, Color::srgb(0.941, 0.902, 0.549)),
    };
    PortraitSource {
        art,
        pose,
        placeholder,
    }
}

pub const PLAYER_PLACEHOLDER: Color = Color::srgb(0.290, 0.565, 0.851);

/// Images that finished loading, keyed by descriptor. Anything absent is
/// drawn with its placeholder.
#[derive(Resource, Debug, Default, Clone)]
pub struct ArtCatalog {
    images: HashMap<ArtKey, Handle<Image>>,
    player_layout: Option<Handle<TextureAtlasLayout>>,
}

impl ArtCatalog {
    pub fn insert(&mut self, key: ArtKey, handle: Handle<Image>) {
        self.images.insert(key, handle);
    }

    pub fn set_player_layout(&mut self, layout: Handle<TextureAtlasLayout>) {
        self.player_layout = Some(layout);
    }

    pub fn get(&self, key: ArtKey) -> Option<&Handle<Image>> {
        self.images.get(&key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Family member cropped to one pose, scaled to `height` world pixels.
    pub fn family_sprite(&self, role: FamilyRole, height: f32) -> Sprite {
        let source = family_portrait(role);
        match self.get(source.art) {
            Some(image) => {
                let x0 = (source.pose * FAMILY_POSE.x) as f32;
                let aspect = FAMILY_POSE.x as f32 / FAMILY_POSE.y as f32;
                Sprite {
                    image: image.clone(),
                    rect: Some(Rect::new(x0, 0.0, x0 + FAMILY_POSE.x as f32, FAMILY_POSE.y as f32)),
                    custom_size: Some(Vec2::new(height * aspect, height)),
                    ..default()
                }
            }
            None => Sprite::from_color(source.placeholder, Vec2::splat(height * 0.6)),
        }
    }

    pub fn player_sprite(&self, gender: Gender, size: f32) -> Sprite {
        let key = match gender {
            Gender::Male => ArtKey::PlayerMale,
            Gender::Female => ArtKey::PlayerFemale,
        };
        match (self.get(key), &self.player_layout) {
            (Some(image), Some(layout)) => Sprite {
                image: image.clone(),
                texture_atlas: Some(TextureAtlas {
                    layout: layout.clone(),
                    index: 0,
                }),
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            _ => Sprite::from_color(PLAYER_PLACEHOLDER, Vec2::splat(size * 0.66)),
        }
    }

    pub fn npc_sprite(&self, npc: &BiblicalNpc, size: f32) -> Sprite {
        self.image_or_color(ArtKey::Npc(npc.id), Vec2::splat(size), npc.placeholder)
    }

    pub fn image_or_color(&self, key: ArtKey, size: Vec2, fallback: Color) -> Sprite {
        match self.get(key) {
            Some(image) => Sprite {
                image: image.clone(),
                custom_size: Some(size),
                ..default()
            },
            None => Sprite::from_color(fallback, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_portrait_source() {
        for role in FamilyRole::ALL {
            let source = family_portrait(role);
            assert!(matches!(
                source.art,
                ArtKey::FamilyMom | ArtKey::FamilyDad | ArtKey::FamilyGrandma | ArtKey::FamilySibling
            ));
        }
    }

    #[test]
    fn test_sibling_pose_follows_gender() {
        let is_male = |role: FamilyRole| {
            matches!(
                role,
                FamilyRole::Brother | FamilyRole::OlderBrother | FamilyRole::Son
            )
        };
        for role in FamilyRole::ALL {
            let source = family_portrait(role);
            if source.art == ArtKey::FamilySibling {
                assert_eq!(source.pose, if is_male(role) { 0 } else { 1 }, "{role:?}");
            } else {
                assert_eq!(source.pose, 0);
            }
        }
    }

    #[test]
    fn test_empty_catalog_falls_back_to_placeholder() {
        let catalog = ArtCatalog::default();
        let sprite = catalog.family_sprite(FamilyRole::Grandpa, 60.0);
        assert!(sprite.rect.is_none());
        assert_eq!(sprite.color, family_portrait(FamilyRole::Grandpa).placeholder);

        let player = catalog.player_sprite(Gender::Female, 48.0);
        assert!(player.texture_atlas.is_none());
        assert_eq!(player.color, PLAYER_PLACEHOLDER);
    }

    #[test]
    fn test_loaded_family_image_is_cropped_to_pose() {
        let mut catalog = ArtCatalog::default();
        catalog.insert(ArtKey::FamilySibling, Handle::default());
        let sprite = catalog.family_sprite(FamilyRole::Daughter, 60.0);
        assert_eq!(sprite.rect, Some(Rect::new(640.0, 0.0, 1280.0, 768.0)));
        assert_eq!(sprite.custom_size, Some(Vec2::new(50.0, 60.0)));
    }

    #[test]
    fn test_art_paths_are_unique() {
        let mut paths: Vec<&str> = ArtKey::ALL.iter().map(|k| k.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), ArtKey::ALL.len());
    }
}
