use super::{GameState, SceneTrigger};

/// Misuse of a sequencer or a bad content/geometry table. These are
/// defects, never user-facing: the offending call is aborted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("dialogue session is not open")]
    NotOpen,

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Setup-form validation failures. The display text is what the setup
/// screen shows the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("이름을 입력해주세요!")]
    EmptyName,

    #[error("최소 한 명의 가족을 선택해주세요!")]
    EmptyFamily,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("no edge from {from:?} on {trigger:?}")]
    Unroutable { from: GameState, trigger: SceneTrigger },

    #[error("{from:?} on {trigger:?} rejected: {reason}")]
    GuardFailed {
        from: GameState,
        trigger: SceneTrigger,
        reason: &'static str,
    },
}
