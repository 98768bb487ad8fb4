//! Scene flow: the fixed scene graph and the one place that changes
//! `GameState`.
//!
//! ```text
//! Boot -> Preload -> Setup -> World
//! World -> Church          (at the church door, on "enter")
//! Church -> Celebration    (altar trigger, once per Church instance)
//! Church -> World          (on "exit", unless the altar has fired)
//! Celebration -> World     (on "exit", free play only)
//! ```
//!
//! Scenes send `SceneRequestEvent`, and setup's `GameStartEvent` counts as
//! the `ProfileAccepted` request. `route` checks the edge and its guard.
//! An accepted request fades out for `GameConfig::fade_secs` before the
//! state switch. Requests arriving while a switch is pending are dropped.

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::shared::*;

pub struct FlowPlugin;

impl Plugin for FlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneGuards>()
            .init_resource::<SceneTransition>()
            .enable_state_scoped_entities::<GameState>();

        app.add_systems(OnEnter(GameState::Boot), start_boot_timer);
        app.add_systems(Update, tick_boot_timer.run_if(in_state(GameState::Boot)));

        // Route after scene systems so commands they issued (profile
        // insertion, guard updates) are visible.
        app.add_systems(PostUpdate, route_scene_requests);
        app.add_systems(Update, advance_pending_scene);
    }
}

/// Guard inputs for `route`, snapshotted from resources when a request
/// is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteContext {
    pub profile_ready: bool,
    pub guards: SceneGuards,
}

/// The scene graph. Returns the target scene for `trigger` fired in
/// `from`, or why the request is refused.
pub fn route(
    from: GameState,
    trigger: SceneTrigger,
    ctx: &RouteContext,
) -> Result<GameState, TransitionError> {
    let guard = |ok: bool, to: GameState, reason: &'static str| {
        if ok {
            Ok(to)
        } else {
            Err(TransitionError::GuardFailed {
                from,
                trigger,
                reason,
            })
        }
    };

    match (from, trigger) {
        (GameState::Boot, SceneTrigger::BootFinished) => Ok(GameState::Preload),
        (GameState::Preload, SceneTrigger::AssetsReady) => Ok(GameState::Setup),
        (GameState::Setup, SceneTrigger::ProfileAccepted) => guard(
            ctx.profile_ready,
            GameState::World,
            "no validated player profile",
        ),
        (GameState::World, SceneTrigger::EnterChurch) => guard(
            ctx.guards.at_church_entrance,
            GameState::Church,
            "player is not at the church entrance",
        ),
        (GameState::Church, SceneTrigger::AltarReached) => guard(
            ctx.guards.altar_fired,
            GameState::Celebration,
            "altar trigger has not fired",
        ),
        (GameState::Church, SceneTrigger::ExitChurch) => guard(
            !ctx.guards.altar_fired,
            GameState::World,
            "the celebration has already begun",
        ),
        (GameState::Celebration, SceneTrigger::LeaveCelebration) => guard(
            ctx.guards.free_play,
            GameState::World,
            "the celebration is still running",
        ),
        _ => Err(TransitionError::Unroutable { from, trigger }),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PENDING TRANSITION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct PendingScene {
    pub to: GameState,
    pub timer: Timer,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SceneTransition {
    pub pending: Option<PendingScene>,
}

impl SceneTransition {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn route_scene_requests(
    mut starts: EventReader<GameStartEvent>,
    mut requests: EventReader<SceneRequestEvent>,
    state: Res<State<GameState>>,
    profile: Option<Res<PlayerProfile>>,
    guards: Res<SceneGuards>,
    config: Res<GameConfig>,
    mut transition: ResMut<SceneTransition>,
    mut announce: EventWriter<SceneTransitionEvent>,
) {
    let from = *state.get();
    let ctx = RouteContext {
        profile_ready: profile.is_some(),
        guards: *guards,
    };

    let started = starts.read().map(|start| {
        info!("[Flow] game start for {}", start.player_name);
        SceneTrigger::ProfileAccepted
    });
    let triggers: Vec<SceneTrigger> = started
        .chain(requests.read().map(|request| request.trigger))
        .collect();

    for trigger in triggers {
        if transition.is_pending() {
            debug!("[Flow] {:?} dropped, a transition is in progress", trigger);
            continue;
        }
        match route(from, trigger, &ctx) {
            Ok(to) => {
                info!("[Flow] {:?} -> {:?} ({:?})", from, to, trigger);
                transition.pending = Some(PendingScene {
                    to,
                    timer: Timer::from_seconds(config.fade_secs, TimerMode::Once),
                });
                announce.send(SceneTransitionEvent { from, to });
            }
            Err(err) => warn!("[Flow] {}", err),
        }
    }
}

pub fn advance_pending_scene(
    time: Res<Time>,
    mut transition: ResMut<SceneTransition>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(pending) = transition.pending.as_mut() else {
        return;
    };
    pending.timer.tick(time.delta());
    if pending.timer.finished() {
        next_state.set(pending.to);
        transition.pending = None;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BOOT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug)]
pub struct BootTimer(pub Timer);

fn start_boot_timer(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(BootTimer(Timer::from_seconds(config.boot_secs, TimerMode::Once)));
}

pub fn tick_boot_timer(
    time: Res<Time>,
    timer: Option<ResMut<BootTimer>>,
    mut requests: EventWriter<SceneRequestEvent>,
) {
    let Some(mut timer) = timer else { return };
    if timer.0.tick(time.delta()).just_finished() {
        requests.send(SceneRequestEvent {
            trigger: SceneTrigger::BootFinished,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RouteContext {
        RouteContext::default()
    }

    #[test]
    fn test_linear_startup_edges() {
        assert_eq!(route(GameState::Boot, SceneTrigger::BootFinished, &ctx()), Ok(GameState::Preload));
        assert_eq!(route(GameState::Preload, SceneTrigger::AssetsReady, &ctx()), Ok(GameState::Setup));
    }

    #[test]
    fn test_setup_requires_profile() {
        let rejected = route(GameState::Setup, SceneTrigger::ProfileAccepted, &ctx());
        assert!(matches!(rejected, Err(TransitionError::GuardFailed { .. })));

        let ready = RouteContext {
            profile_ready: true,
            ..ctx()
        };
        assert_eq!(route(GameState::Setup, SceneTrigger::ProfileAccepted, &ready), Ok(GameState::World));
    }

    #[test]
    fn test_church_entry_requires_entrance() {
        let mut c = ctx();
        assert!(route(GameState::World, SceneTrigger::EnterChurch, &c).is_err());
        c.guards.at_church_entrance = true;
        assert_eq!(route(GameState::World, SceneTrigger::EnterChurch, &c), Ok(GameState::Church));
    }

    #[test]
    fn test_church_exit_and_altar_are_exclusive() {
        let mut c = ctx();
        assert_eq!(route(GameState::Church, SceneTrigger::ExitChurch, &c), Ok(GameState::World));
        assert!(route(GameState::Church, SceneTrigger::AltarReached, &c).is_err());

        c.guards.altar_fired = true;
        assert_eq!(route(GameState::Church, SceneTrigger::AltarReached, &c), Ok(GameState::Celebration));
        assert!(route(GameState::Church, SceneTrigger::ExitChurch, &c).is_err());
    }

    #[test]
    fn test_celebration_exit_only_in_free_play() {
        let mut c = ctx();
        assert!(route(GameState::Celebration, SceneTrigger::LeaveCelebration, &c).is_err());
        c.guards.free_play = true;
        assert_eq!(route(GameState::Celebration, SceneTrigger::LeaveCelebration, &c), Ok(GameState::World));
    }

    #[test]
    fn test_unknown_edges_are_unroutable() {
        let mut c = ctx();
        c.profile_ready = true;
        c.guards = SceneGuards {
            at_church_entrance: true,
            altar_fired: true,
            free_play: true,
        };
        for (from, trigger) in [
            (GameState::Boot, SceneTrigger::AssetsReady),
            (GameState::Setup, SceneTrigger::EnterChurch),
            (GameState::World, SceneTrigger::AltarReached),
            (GameState::World, SceneTrigger::ProfileAccepted),
            (GameState::Celebration, SceneTrigger::ExitChurch),
        ] {
            assert_eq!(
                route(from, trigger, &c),
                Err(TransitionError::Unroutable { from, trigger })
            );
        }
    }
}
