//! Shared components, resources, events, and states for Blessings Day.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, except for the pure
//! sequencing types (`dialogue`, `world::trigger`) that several scenes reuse.

mod errors;

pub use errors::*;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE
// ═══════════════════════════════════════════════════════════════════════

/// One state per scene. Transitions are only ever requested through
/// `SceneRequestEvent` and routed by the flow domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Boot,
    Preload,
    Setup,
    World,
    Church,
    Celebration,
}

impl GameState {
    /// Location label shown in the header bar of the explorable scenes.
    pub fn location_label(self) -> Option<&'static str> {
        match self {
            GameState::World => Some("📍 성경 마을"),
            GameState::Church => Some("⛪ 서울중앙교회"),
            GameState::Celebration => Some("🎂 생일 잔치"),
            _ => None,
        }
    }
}

/// What caused a scene change request. The flow domain decides whether
/// the current scene has an edge for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneTrigger {
    BootFinished,
    AssetsReady,
    ProfileAccepted,
    EnterChurch,
    AltarReached,
    ExitChurch,
    LeaveCelebration,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER PROFILE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeGroup {
    Child,
    Teen,
    #[default]
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Child,
        AgeGroup::Teen,
        AgeGroup::YoungAdult,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    /// Next bracket in the setup form's cycle, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyRole {
    Mom,
    Dad,
    Grandma,
    Grandpa,
    Brother,
    Sister,
    OlderBrother,
    OlderSister,
    Husband,
    Wife,
    Son,
    Daughter,
}

impl FamilyRole {
    /// Setup form order.
    pub const ALL: [FamilyRole; 12] = [
        FamilyRole::Mom,
        FamilyRole::Dad,
        FamilyRole::Grandma,
        FamilyRole::Grandpa,
        FamilyRole::Brother,
        FamilyRole::Sister,
        FamilyRole::OlderBrother,
        FamilyRole::OlderSister,
        FamilyRole::Husband,
        FamilyRole::Wife,
        FamilyRole::Son,
        FamilyRole::Daughter,
    ];

}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub role: FamilyRole,
    /// Localized display name.
    pub label: String,
}

/// The player's choices from the setup screen.
///
/// Only the setup domain can build one (through `ProfileDraft::validate`),
/// after which it is inserted as a resource and never mutated. Every scene
/// reads it with `Res<PlayerProfile>`.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProfile {
    name: String,
    gender: Gender,
    age_group: AgeGroup,
    family: Vec<FamilyMember>,
}

impl PlayerProfile {
    pub(crate) fn new_validated(
        name: String,
        gender: Gender,
        age_group: AgeGroup,
        family: Vec<FamilyMember>,
    ) -> Self {
        Self {
            name,
            gender,
            age_group,
            family,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    /// Roster in selection order: seating order and speaking order.
    pub fn family(&self) -> &[FamilyMember] {
        &self.family
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER ENTITY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Gentle vertical sway for idle characters and props. `base_y` is the
/// rest height in world space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct IdleBob {
    pub base_y: f32,
    pub amplitude: f32,
    /// Seconds for one up-and-back cycle.
    pub period: f32,
    pub phase: f32,
}

impl IdleBob {
    pub fn new(base_y: f32, amplitude: f32, period: f32) -> Self {
        Self {
            base_y,
            amplitude,
            period,
            phase: 0.0,
        }
    }

    /// Height at `elapsed` seconds; never below the rest height.
    pub fn offset_at(&self, elapsed: f32) -> f32 {
        if self.period <= 0.0 {
            return 0.0;
        }
        let t = (elapsed / self.period + self.phase) * std::f32::consts::TAU;
        self.amplitude * 0.5 * (1.0 - t.cos())
    }
}

/// Player ignores movement input (altar reached, scene leaving).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Frozen;

#[derive(Component, Debug, Clone)]
pub struct PlayerMovement {
    pub facing: Facing,
    pub is_moving: bool,
    /// World pixels per second.
    pub speed: f32,
}

impl PlayerMovement {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            facing: Facing::Down,
            is_moving: false,
            speed,
        }
    }
}

/// Walkable rectangle of the current scene, in world coordinates.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::screen()
    }
}

impl MapBounds {
    /// A single portrait screen.
    pub fn screen() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }

    /// The village: one screen wide, two screens tall.
    pub fn village() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(SCREEN_WIDTH, VILLAGE_HEIGHT),
        }
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Game actions for the current frame. Rebuilt every frame in PreUpdate.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub advance: bool,
    pub talk: bool,
    pub punch: bool,
    pub pray: bool,
    pub enter: bool,
    pub exit: bool,
    pub submit: bool,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Form,
    Explore,
    Dialogue,
}

/// Tappable on-screen controls. The input domain turns presses into
/// `PlayerInput` flags; scenes spawn the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Talk,
    Punch,
    Pray,
    Enter,
    Exit,
    Advance,
    Submit,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton(pub Action);

// ═══════════════════════════════════════════════════════════════════════
// SCENE GUARDS & DIALOGUE VIEW
// ═══════════════════════════════════════════════════════════════════════

/// Facts the scene graph's guard conditions depend on. Each scene resets
/// its own fields when entered.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneGuards {
    /// Player stands inside the church-entrance region (village).
    pub at_church_entrance: bool,
    /// Altar trigger already fired in this Church instance.
    pub altar_fired: bool,
    /// Celebration has reached free play.
    pub free_play: bool,
}

/// Label of the dialog box's advance control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceLabel {
    Next,
    Close,
    NextMember,
    Finish,
    FreePlay,
}

impl AdvanceLabel {
    pub fn text(self) -> &'static str {
        match self {
            AdvanceLabel::Next => "▶ 다음",
            AdvanceLabel::Close => "▶ 닫기",
            AdvanceLabel::NextMember => "▶ 다음 가족",
            AdvanceLabel::Finish => "▶ 완료",
            AdvanceLabel::FreePlay => "▶ 자유 활동",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    pub advance: AdvanceLabel,
}

/// What the dialog box should show right now. `None` hides the box.
/// Written by whichever scene owns the conversation, read by the UI.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueView(pub Option<DialogueLine>);

impl DialogueView {
    pub fn is_open(&self) -> bool {
        self.0.is_some()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FONT
// ═══════════════════════════════════════════════════════════════════════

/// Korean-capable font used by every text entity, UI nodes and `Text2d`
/// captions alike. Holds the default font until the bundled one loads, or
/// after it fails to.
#[derive(Resource, Debug, Clone, Default)]
pub struct UiFontHandle(pub Handle<Font>);

/// Text styling shortcut used wherever text is spawned.
pub fn text_font(font: &UiFontHandle, size: f32) -> TextFont {
    TextFont {
        font: font.0.clone(),
        font_size: size,
        ..default()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneRequestEvent {
    pub trigger: SceneTrigger,
}

/// Sent by the flow domain when a request has been routed; the state
/// switch follows after the fade-out.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTransitionEvent {
    pub from: GameState,
    pub to: GameState,
}

/// Ask the player domain to spawn the avatar into `scene`. The entity is
/// scoped to that scene.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlayerEvent {
    pub scene: GameState,
    pub position: Vec2,
    pub speed: f32,
    pub bounds: MapBounds,
}

/// Emitted exactly once by the setup screen, after the profile resource
/// has been inserted.
#[derive(Event, Debug, Clone)]
pub struct GameStartEvent {
    pub player_name: String,
}

/// Short message that fades out on its own.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueStartEvent {
    pub speaker: String,
    pub lines: Vec<String>,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueEndEvent {
    pub speaker: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 390.0;
pub const SCREEN_HEIGHT: f32 = 844.0;
pub const VILLAGE_HEIGHT: f32 = SCREEN_HEIGHT * 2.0;
pub const TILE_SIZE: f32 = 32.0;

pub const GAME_TITLE: &str = "축복의 날";
pub const GAME_SUBTITLE: &str = "Blessings Day";
pub const CHURCH_NAME: &str = "서울중앙교회";
/// Used wherever a name is needed before setup has produced a profile.
pub const FALLBACK_PLAYER_NAME: &str = "친구";

pub const COLOR_BACKGROUND: Color = Color::srgb(0.173, 0.094, 0.063);
pub const COLOR_PANEL: Color = Color::srgba(0.239, 0.157, 0.090, 0.95);
pub const COLOR_GOLD: Color = Color::srgb(0.831, 0.647, 0.455);
pub const COLOR_CREAM: Color = Color::srgb(0.961, 0.902, 0.827);
pub const COLOR_MUTED: Color = Color::srgb(0.627, 0.502, 0.376);

/// Convert a top-left-origin, y-down layout coordinate (how the scenes are
/// designed) into a world position on a map of the given height.
pub fn screen_to_world(x: f32, y: f32, map_height: f32) -> Vec2 {
    Vec2::new(x, map_height - y)
}
