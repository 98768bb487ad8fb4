//! Celebration domain: the birthday party at the end of the church aisle.
//!
//! After a short intro the family speaks one member at a time (see
//! `sequencer`), then everyone says the closing line together, and the
//! next advance hands control back to the player for free play.

pub mod sequencer;

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::data::family::{celebration_title, closing_line};
use crate::data::{ArtCatalog, ArtKey, CLOSING_SPEAKER};
use crate::shared::*;
use crate::world::layout::{arc_positions, FREE_PLAY_SPAWN};

pub use sequencer::{CelebrationSequencer, CelebrationStep};

pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CelebrationRun>()
            .init_resource::<ConfettiEmitter>();

        app.add_systems(
            OnEnter(GameState::Celebration),
            (reset_celebration, spawn_celebration).chain(),
        );
        app.add_systems(
            Update,
            (
                start_after_intro,
                advance_celebration,
                publish_celebration_view,
                highlight_speaker,
                hop_speaker,
                leave_celebration,
            )
                .chain()
                .run_if(in_state(GameState::Celebration)),
        );
        app.add_systems(
            Update,
            (emit_confetti, fall_confetti).run_if(in_state(GameState::Celebration)),
        );
        app.add_systems(OnExit(GameState::Celebration), close_celebration);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES & COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CelebrationStage {
    /// Waiting for the first member to speak.
    #[default]
    Intro,
    Speaking,
    /// Everyone has spoken; the closing line is on screen.
    Closing,
    FreePlay,
}

/// One celebration run. Rebuilt every time the scene is entered.
#[derive(Resource, Debug, Default)]
pub struct CelebrationRun {
    pub intro: Timer,
    pub stage: CelebrationStage,
    pub sequencer: Option<CelebrationSequencer>,
}

impl CelebrationRun {
    /// Roster index of the member currently speaking.
    pub fn speaking_index(&self) -> Option<usize> {
        match self.stage {
            CelebrationStage::Speaking => self
                .sequencer
                .as_ref()
                .filter(|seq| !seq.is_complete())
                .map(CelebrationSequencer::member_index),
            _ => None,
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct FamilyPortrait {
    pub index: usize,
    pub base_y: f32,
}

/// Three short hops when a member starts speaking.
#[derive(Component, Debug)]
pub struct Hop(pub Timer);

const HOP_SECS: f32 = 0.6;
const HOP_HEIGHT: f32 = 10.0;

#[derive(Component, Debug)]
pub struct Confetti {
    pub velocity: Vec2,
    pub spin: f32,
    pub life: Timer,
}

/// Spawns one piece per colour every `interval`; `stop_after` shuts it
/// off for good once it runs out.
#[derive(Resource, Debug)]
pub struct ConfettiEmitter {
    pub interval: Timer,
    pub stop_after: Option<Timer>,
    pub active: bool,
}

impl Default for ConfettiEmitter {
    fn default() -> Self {
        Self {
            interval: Timer::from_seconds(0.2, TimerMode::Repeating),
            stop_after: None,
            active: true,
        }
    }
}

impl ConfettiEmitter {
    fn set_frequency(&mut self, secs: f32) {
        self.interval = Timer::from_seconds(secs, TimerMode::Repeating);
    }
}

const CONFETTI: [Color; 3] = [
    Color::srgb(1.0, 0.412, 0.706),
    Color::srgb(1.0, 0.843, 0.0),
    Color::srgb(0.529, 0.808, 0.922),
];
const BACKDROP: Color = Color::srgb(0.235, 0.137, 0.082);
const FAIRY_LIGHT: Color = Color::srgba(1.0, 0.843, 0.0, 0.6);
const CAKE_FALLBACK: Color = Color::srgb(1.0, 0.894, 0.882);

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

fn reset_celebration(
    config: Res<GameConfig>,
    mut run: ResMut<CelebrationRun>,
    mut confetti: ResMut<ConfettiEmitter>,
    mut guards: ResMut<SceneGuards>,
) {
    *run = CelebrationRun {
        intro: Timer::from_seconds(config.celebration_intro_secs, TimerMode::Once),
        ..default()
    };
    *confetti = ConfettiEmitter::default();
    guards.free_play = false;
}

fn spawn_celebration(
    mut commands: Commands,
    catalog: Res<ArtCatalog>,
    font: Res<UiFontHandle>,
    profile: Option<Res<PlayerProfile>>,
) {
    let scene = GameState::Celebration;
    let at = |x: f32, y: f32| screen_to_world(x, y, SCREEN_HEIGHT);
    let name = profile.as_deref().map(PlayerProfile::name).unwrap_or(FALLBACK_PLAYER_NAME);
    let family = profile.as_deref().map(PlayerProfile::family).unwrap_or_default();

    commands.spawn((
        Sprite::from_color(BACKDROP, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
        Transform::from_translation(at(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0).extend(0.0)),
        StateScoped(scene),
    ));

    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let pos = at(
            rng.gen_range(20.0..SCREEN_WIDTH - 20.0),
            rng.gen_range(20.0..SCREEN_HEIGHT / 3.0),
        );
        let mut twinkle = IdleBob::new(pos.y, 2.0, rng.gen_range(1.0..2.0));
        twinkle.phase = rng.gen_range(0.0..1.0);
        commands.spawn((
            Sprite::from_color(FAIRY_LIGHT, Vec2::splat(6.0)),
            Transform::from_translation(pos.extend(1.0)),
            twinkle,
            StateScoped(scene),
        ));
    }

    commands.spawn((
        Text2d::new(celebration_title(name)),
        text_font(&font, 16.0),
        TextColor(COLOR_GOLD),
        TextLayout::new_with_justify(JustifyText::Center),
        bevy::text::TextBounds::new_horizontal(SCREEN_WIDTH - 40.0),
        Transform::from_translation(at(SCREEN_WIDTH / 2.0, 50.0).extend(100.0)),
        StateScoped(scene),
    ));

    commands.spawn((
        catalog.image_or_color(ArtKey::Cake, Vec2::new(90.0, 120.0), CAKE_FALLBACK),
        Transform::from_translation(at(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 30.0).extend(5.0)),
        StateScoped(scene),
    ));

    let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 100.0);
    for (index, (member, spot)) in family
        .iter()
        .zip(arc_positions(family.len(), center, 120.0))
        .enumerate()
    {
        let pos = at(spot.x, spot.y);
        commands.spawn((
            FamilyPortrait {
                index,
                base_y: pos.y,
            },
            catalog.family_sprite(member.role, 60.0),
            Transform::from_translation(pos.extend(10.0)),
            StateScoped(scene),
        ));
        crate::world::spawn_world_label(
            &mut commands,
            &font,
            scene,
            &member.label,
            pos - Vec2::new(0.0, 40.0),
            11.0,
        );
    }
    info!("[Celebration] party for {} with {} family members", name, family.len());
}

// ═══════════════════════════════════════════════════════════════════════
// SEQUENCING
// ═══════════════════════════════════════════════════════════════════════

pub fn start_after_intro(
    time: Res<Time>,
    profile: Option<Res<PlayerProfile>>,
    mut run: ResMut<CelebrationRun>,
) {
    if run.stage != CelebrationStage::Intro {
        return;
    }
    run.intro.tick(time.delta());
    if !run.intro.finished() {
        return;
    }

    let name = profile.as_deref().map(PlayerProfile::name).unwrap_or(FALLBACK_PLAYER_NAME);
    let family = profile.as_deref().map(PlayerProfile::family).unwrap_or_default();
    match CelebrationSequencer::start(family, name) {
        Ok(seq) => {
            info!("[Celebration] {} speaks first", seq.roster()[0].label);
            run.sequencer = Some(seq);
            run.stage = CelebrationStage::Speaking;
        }
        Err(err) => {
            error!("[Celebration] cannot start: {}", err);
            run.stage = CelebrationStage::Closing;
        }
    }
}

pub fn advance_celebration(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    mut run: ResMut<CelebrationRun>,
    mut confetti: ResMut<ConfettiEmitter>,
    mut guards: ResMut<SceneGuards>,
    mut spawn_player: EventWriter<SpawnPlayerEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.advance {
        return;
    }
    match run.stage {
        CelebrationStage::Intro | CelebrationStage::FreePlay => {}
        CelebrationStage::Speaking => {
            let Some(seq) = run.sequencer.as_mut() else {
                return;
            };
            let roster_len = seq.roster().len();
            match seq.advance() {
                Ok(CelebrationStep::Line) => {}
                Ok(CelebrationStep::NextMember(index)) => {
                    info!("[Celebration] member {} of {} speaks", index + 1, roster_len);
                }
                Ok(CelebrationStep::Complete) => {
                    info!("[Celebration] every family member has spoken");
                    run.stage = CelebrationStage::Closing;
                    confetti.set_frequency(0.05);
                }
                Err(err) => error!("[Celebration] advance failed: {}", err),
            }
        }
        CelebrationStage::Closing => {
            info!("[Celebration] free play");
            run.stage = CelebrationStage::FreePlay;
            guards.free_play = true;
            confetti.set_frequency(0.5);
            confetti.stop_after = Some(Timer::from_seconds(3.0, TimerMode::Once));

            let (x, y) = FREE_PLAY_SPAWN;
            spawn_player.send(SpawnPlayerEvent {
                scene: GameState::Celebration,
                position: screen_to_world(x, y, SCREEN_HEIGHT),
                speed: config.player_speed_indoor,
                bounds: MapBounds::screen(),
            });
            toasts.send(ToastEvent {
                message: "🎮 자유롭게 돌아다녀보세요!".to_string(),
                duration_secs: 3.0,
            });
        }
    }
}

/// What the dialog box shows for the current stage.
pub fn celebration_line(run: &CelebrationRun, player_name: &str) -> Option<DialogueLine> {
    match run.stage {
        CelebrationStage::Intro | CelebrationStage::FreePlay => None,
        CelebrationStage::Speaking => {
            let seq = run.sequencer.as_ref()?;
            let member = seq.current_member()?;
            Some(DialogueLine {
                speaker: format!("💬 {}", member.label),
                text: seq.current_line().ok()?.to_string(),
                advance: seq.advance_label(),
            })
        }
        CelebrationStage::Closing => Some(DialogueLine {
            speaker: CLOSING_SPEAKER.to_string(),
            text: closing_line(player_name),
            advance: AdvanceLabel::FreePlay,
        }),
    }
}

pub fn publish_celebration_view(
    run: Res<CelebrationRun>,
    profile: Option<Res<PlayerProfile>>,
    mut view: ResMut<DialogueView>,
) {
    if !run.is_changed() {
        return;
    }
    let name = profile.as_deref().map(PlayerProfile::name).unwrap_or(FALLBACK_PLAYER_NAME);
    let next = celebration_line(&run, name);
    if view.0 != next {
        view.0 = next;
    }
}

/// The speaking member is fully opaque, everyone else dimmed.
fn highlight_speaker(
    mut commands: Commands,
    run: Res<CelebrationRun>,
    mut portraits: Query<(Entity, &FamilyPortrait, &mut Sprite)>,
    mut last: Local<Option<usize>>,
) {
    if !run.is_changed() {
        return;
    }
    let speaking = run.speaking_index();
    for (entity, portrait, mut sprite) in &mut portraits {
        let alpha = match speaking {
            Some(i) if i != portrait.index => 0.5,
            _ => 1.0,
        };
        sprite.color.set_alpha(alpha);
        if speaking == Some(portrait.index) && *last != speaking {
            commands
                .entity(entity)
                .insert(Hop(Timer::from_seconds(HOP_SECS * 3.0, TimerMode::Once)));
        }
    }
    *last = speaking;
}

fn hop_speaker(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &FamilyPortrait, &mut Hop, &mut Transform)>,
) {
    for (entity, portrait, mut hop, mut transform) in &mut query {
        hop.0.tick(time.delta());
        let t = hop.0.elapsed_secs() / HOP_SECS;
        transform.translation.y = portrait.base_y + HOP_HEIGHT * (t * std::f32::consts::PI).sin().abs();
        if hop.0.finished() {
            transform.translation.y = portrait.base_y;
            commands.entity(entity).remove::<Hop>();
        }
    }
}

pub fn leave_celebration(
    input: Res<PlayerInput>,
    run: Res<CelebrationRun>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    if input.exit && run.stage == CelebrationStage::FreePlay {
        requests.send(SceneRequestEvent {
            trigger: SceneTrigger::LeaveCelebration,
        });
    }
}

fn close_celebration(
    mut run: ResMut<CelebrationRun>,
    mut view: ResMut<DialogueView>,
) {
    *run = CelebrationRun::default();
    view.0 = None;
}

// ═══════════════════════════════════════════════════════════════════════
// CONFETTI
// ═══════════════════════════════════════════════════════════════════════

fn emit_confetti(
    mut commands: Commands,
    time: Res<Time>,
    mut emitter: ResMut<ConfettiEmitter>,
) {
    if !emitter.active {
        return;
    }
    if let Some(stop) = emitter.stop_after.as_mut() {
        if stop.tick(time.delta()).just_finished() {
            emitter.active = false;
            debug!("[Celebration] confetti stopped");
            return;
        }
    }

    emitter.interval.tick(time.delta());
    let bursts = emitter.interval.times_finished_this_tick();
    let mut rng = rand::thread_rng();
    for _ in 0..bursts {
        for color in CONFETTI {
            let x = rng.gen_range(0.0..SCREEN_WIDTH);
            commands.spawn((
                Confetti {
                    velocity: Vec2::new(rng.gen_range(-30.0..30.0), -rng.gen_range(50.0..100.0)),
                    spin: rng.gen_range(-6.0..6.0),
                    life: Timer::from_seconds(4.0, TimerMode::Once),
                },
                Sprite::from_color(color, Vec2::new(8.0, 5.0)),
                Transform::from_xyz(x, SCREEN_HEIGHT + 10.0, 60.0)
                    .with_rotation(Quat::from_rotation_z(rng.gen_range(0.0..std::f32::consts::TAU))),
                StateScoped(GameState::Celebration),
            ));
        }
    }
}

fn fall_confetti(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Confetti, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut piece, mut transform) in &mut query {
        piece.life.tick(time.delta());
        if piece.life.finished() {
            commands.entity(entity).despawn();
            continue;
        }
        piece.velocity.y -= 50.0 * dt;
        transform.translation.x += piece.velocity.x * dt;
        transform.translation.y += piece.velocity.y * dt;
        transform.rotate_z(piece.spin * dt);
        transform.scale = Vec3::splat(1.0 - 0.5 * piece.life.fraction());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::family_member;

    fn speaking_run(roles: &[FamilyRole]) -> CelebrationRun {
        let roster: Vec<FamilyMember> = roles.iter().map(|r| family_member(*r)).collect();
        CelebrationRun {
            stage: CelebrationStage::Speaking,
            sequencer: Some(CelebrationSequencer::start(&roster, "Jamie").unwrap()),
            ..default()
        }
    }

    #[test]
    fn test_intro_shows_nothing() {
        assert_eq!(celebration_line(&CelebrationRun::default(), "Jamie"), None);
    }

    #[test]
    fn test_speaking_line_names_member() {
        let run = speaking_run(&[FamilyRole::Grandma]);
        let line = celebration_line(&run, "Jamie").unwrap();
        assert_eq!(line.speaker, "💬 할머니");
        assert_eq!(line.advance, AdvanceLabel::Next);
        assert_eq!(run.speaking_index(), Some(0));
    }

    #[test]
    fn test_closing_line_addresses_player() {
        let run = CelebrationRun {
            stage: CelebrationStage::Closing,
            ..default()
        };
        let line = celebration_line(&run, "Jamie").unwrap();
        assert_eq!(line.speaker, CLOSING_SPEAKER);
        assert!(line.text.starts_with("Jamie님, 생일 축하합니다!"));
        assert_eq!(line.advance, AdvanceLabel::FreePlay);
        assert_eq!(run.speaking_index(), None);
    }
}
