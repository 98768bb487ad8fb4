//! Paged dialogue: a cursor over a fixed list of lines, advanced one line
//! per player action and closed after the last one.
//!
//! `DialogueSession` is the pure sequencer (also driven by the celebration
//! scene). The plugin wires one session per village conversation to
//! `DialogueStartEvent` / `PlayerInput::advance` / `DialogueEndEvent`.

use bevy::prelude::*;
use crate::shared::*;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveDialogue>();

        app.add_systems(
            Update,
            (open_dialogue_on_start, advance_dialogue, publish_dialogue_view)
                .chain()
                .run_if(in_state(GameState::World)),
        );

        // A torn-down village takes its conversation with it.
        app.add_systems(OnExit(GameState::World), close_dialogue);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SEQUENCER
// ═══════════════════════════════════════════════════════════════════════

/// Result of `DialogueSession::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A new line is current.
    Line,
    /// The last line was dismissed; the session is now closed.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueSession {
    speaker: String,
    lines: Vec<String>,
    cursor: usize,
    open: bool,
}

impl DialogueSession {
    /// Start a conversation on its first line.
    pub fn open(speaker: impl Into<String>, lines: Vec<String>) -> Result<Self, SequenceError> {
        if lines.is_empty() {
            return Err(SequenceError::InvalidArgument(
                "a dialogue needs at least one line",
            ));
        }
        Ok(Self {
            speaker: speaker.into(),
            lines,
            cursor: 0,
            open: true,
        })
    }

    /// Move to the next line, or close the session if the current line
    /// was the last one.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SequenceError> {
        if !self.open {
            return Err(SequenceError::NotOpen);
        }
        self.cursor += 1;
        if self.cursor == self.lines.len() {
            self.open = false;
            self.cursor = 0;
            return Ok(AdvanceOutcome::Finished);
        }
        Ok(AdvanceOutcome::Line)
    }

    pub fn current_line(&self) -> Result<&str, SequenceError> {
        if !self.open {
            return Err(SequenceError::NotOpen);
        }
        Ok(&self.lines[self.cursor])
    }

    /// True while the current line is the final one, so the advance
    /// control can read "close" instead of "next".
    pub fn is_last_line(&self) -> bool {
        self.open && self.cursor + 1 == self.lines.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// VILLAGE CONVERSATIONS
// ═══════════════════════════════════════════════════════════════════════

/// The conversation currently on screen in the village, if any.
#[derive(Resource, Debug, Default)]
pub struct ActiveDialogue {
    pub session: Option<DialogueSession>,
}

impl ActiveDialogue {
    pub fn is_open(&self) -> bool {
        self.session.as_ref().is_some_and(DialogueSession::is_open)
    }
}

pub fn open_dialogue_on_start(
    mut events: EventReader<DialogueStartEvent>,
    mut active: ResMut<ActiveDialogue>,
) {
    for event in events.read() {
        if active.is_open() {
            debug!("[Dialogue] {} ignored, a conversation is already open", event.speaker);
            continue;
        }
        match DialogueSession::open(event.speaker.clone(), event.lines.clone()) {
            Ok(session) => {
                info!(
                    "[Dialogue] opened for {} ({} lines)",
                    session.speaker(),
                    session.line_count()
                );
                active.session = Some(session);
            }
            Err(err) => error!("[Dialogue] cannot open for {}: {}", event.speaker, err),
        }
    }
}

pub fn advance_dialogue(
    input: Res<PlayerInput>,
    mut active: ResMut<ActiveDialogue>,
    mut end_events: EventWriter<DialogueEndEvent>,
) {
    if !input.advance {
        return;
    }
    let Some(session) = active.session.as_mut() else {
        return;
    };

    match session.advance() {
        Ok(AdvanceOutcome::Line) => {}
        Ok(AdvanceOutcome::Finished) => {
            let speaker = session.speaker().to_string();
            info!("[Dialogue] closed for {}", speaker);
            active.session = None;
            end_events.send(DialogueEndEvent { speaker });
        }
        Err(err) => {
            error!("[Dialogue] advance failed: {}", err);
            active.session = None;
        }
    }
}

/// Mirror the session into the shared view the dialog box renders.
pub fn publish_dialogue_view(active: Res<ActiveDialogue>, mut view: ResMut<DialogueView>) {
    if !active.is_changed() {
        return;
    }
    let next = active.session.as_ref().and_then(|session| {
        let text = session.current_line().ok()?.to_string();
        Some(DialogueLine {
            speaker: session.speaker().to_string(),
            text,
            advance: if session.is_last_line() {
                AdvanceLabel::Close
            } else {
                AdvanceLabel::Next
            },
        })
    });
    if view.0 != next {
        view.0 = next;
    }
}

fn close_dialogue(mut active: ResMut<ActiveDialogue>, mut view: ResMut<DialogueView>) {
    active.session = None;
    view.0 = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_open_rejects_empty_lines() {
        let err = DialogueSession::open("다윗", Vec::new()).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidArgument(_)));
    }

    #[test]
    fn test_open_shows_first_line() {
        let session = DialogueSession::open("다윗", lines(&["a", "b", "c"])).unwrap();
        assert!(session.is_open());
        assert_eq!(session.current_line().unwrap(), "a");
        assert_eq!(session.line_count(), 3);
        assert!(!session.is_last_line());
    }

    #[test]
    fn test_advance_len_minus_one_times_stays_on_last_line() {
        for n in 1..=5 {
            let texts: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
            let mut session = DialogueSession::open("npc", texts.clone()).unwrap();
            for _ in 0..n - 1 {
                assert_eq!(session.advance().unwrap(), AdvanceOutcome::Line);
            }
            assert!(session.is_open());
            assert!(session.is_last_line());
            assert_eq!(session.current_line().unwrap(), texts[n - 1]);

            assert_eq!(session.advance().unwrap(), AdvanceOutcome::Finished);
            assert!(!session.is_open());
        }
    }

    #[test]
    fn test_single_line_closes_on_first_advance() {
        let mut session = DialogueSession::open("npc", lines(&["hi"])).unwrap();
        assert!(session.is_last_line());
        assert_eq!(session.advance().unwrap(), AdvanceOutcome::Finished);
        assert!(!session.is_open());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_closed_session_reports_not_open() {
        let mut session = DialogueSession::open("npc", lines(&["hi"])).unwrap();
        session.advance().unwrap();
        assert_eq!(session.advance(), Err(SequenceError::NotOpen));
        assert_eq!(session.current_line(), Err(SequenceError::NotOpen));
        assert!(!session.is_last_line());
    }
}
