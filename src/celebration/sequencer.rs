//! Walks the family roster in order, one three-line conversation per
//! member, then settles in `CelebrationPhase::Complete`.

use crate::data::family_lines;
use crate::dialogue::{AdvanceOutcome, DialogueSession};
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationPhase {
    Greeting,
    Complete,
}

/// What one `advance` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationStep {
    /// Same member, next line.
    Line,
    /// The previous member finished; the member at this index now speaks.
    NextMember(usize),
    /// The last member finished.
    Complete,
}

#[derive(Debug, Clone)]
pub struct CelebrationSequencer {
    roster: Vec<FamilyMember>,
    player_name: String,
    member_index: usize,
    session: Option<DialogueSession>,
    phase: CelebrationPhase,
}

impl CelebrationSequencer {
    /// Begin with the first member of `roster` speaking.
    pub fn start(roster: &[FamilyMember], player_name: &str) -> Result<Self, SequenceError> {
        let Some(first) = roster.first() else {
            return Err(SequenceError::InvalidArgument(
                "a celebration needs at least one family member",
            ));
        };
        let session = Self::session_for(first, player_name)?;
        Ok(Self {
            roster: roster.to_vec(),
            player_name: player_name.to_string(),
            member_index: 0,
            session: Some(session),
            phase: CelebrationPhase::Greeting,
        })
    }

    fn session_for(member: &FamilyMember, player_name: &str) -> Result<DialogueSession, SequenceError> {
        DialogueSession::open(member.label.clone(), family_lines(member.role, player_name))
    }

    pub fn advance(&mut self) -> Result<CelebrationStep, SequenceError> {
        let Some(session) = self.session.as_mut() else {
            return Err(SequenceError::NotOpen);
        };

        match session.advance()? {
            AdvanceOutcome::Line => Ok(CelebrationStep::Line),
            AdvanceOutcome::Finished if self.member_index + 1 < self.roster.len() => {
                self.member_index += 1;
                let member = &self.roster[self.member_index];
                self.session = Some(Self::session_for(member, &self.player_name)?);
                Ok(CelebrationStep::NextMember(self.member_index))
            }
            AdvanceOutcome::Finished => {
                self.member_index = self.roster.len();
                self.session = None;
                self.phase = CelebrationPhase::Complete;
                Ok(CelebrationStep::Complete)
            }
        }
    }

    pub fn phase(&self) -> CelebrationPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == CelebrationPhase::Complete
    }

    /// Equals the roster length once complete.
    pub fn member_index(&self) -> usize {
        self.member_index
    }

    pub fn current_member(&self) -> Option<&FamilyMember> {
        match self.phase {
            CelebrationPhase::Greeting => self.roster.get(self.member_index),
            CelebrationPhase::Complete => None,
        }
    }

    pub fn current_line(&self) -> Result<&str, SequenceError> {
        self.session
            .as_ref()
            .ok_or(SequenceError::NotOpen)?
            .current_line()
    }

    pub fn roster(&self) -> &[FamilyMember] {
        &self.roster
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Label for the advance control given where the cursor stands.
    pub fn advance_label(&self) -> AdvanceLabel {
        match &self.session {
            None => AdvanceLabel::FreePlay,
            Some(session) if !session.is_last_line() => AdvanceLabel::Next,
            Some(_) if self.member_index + 1 < self.roster.len() => AdvanceLabel::NextMember,
            Some(_) => AdvanceLabel::Finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::family_member;

    fn roster(roles: &[FamilyRole]) -> Vec<FamilyMember> {
        roles.iter().map(|r| family_member(*r)).collect()
    }

    /// Drive to completion, collecting (speaker, line) pairs.
    fn run(seq: &mut CelebrationSequencer) -> Vec<(String, String)> {
        let mut shown = Vec::new();
        while !seq.is_complete() {
            let speaker = seq.current_member().unwrap().label.clone();
            shown.push((speaker, seq.current_line().unwrap().to_string()));
            seq.advance().unwrap();
        }
        shown
    }

    #[test]
    fn test_start_rejects_empty_roster() {
        let err = CelebrationSequencer::start(&[], "Jamie").unwrap_err();
        assert!(matches!(err, SequenceError::InvalidArgument(_)));
    }

    #[test]
    fn test_mom_dad_scenario_line_sequence() {
        let mut seq =
            CelebrationSequencer::start(&roster(&[FamilyRole::Mom, FamilyRole::Dad]), "Jamie").unwrap();
        let shown = run(&mut seq);

        let mut expected = family_lines(FamilyRole::Mom, "Jamie");
        expected.extend(family_lines(FamilyRole::Dad, "Jamie"));
        let texts: Vec<String> = shown.iter().map(|(_, t)| t.clone()).collect();
        assert_eq!(texts, expected);
        assert!(texts[1].starts_with("Jamie아, "));
        assert!(texts[4].starts_with("Jamie아, "));

        let speakers: Vec<&str> = shown.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(speakers, ["엄마", "엄마", "엄마", "아빠", "아빠", "아빠"]);
    }

    #[test]
    fn test_every_roster_yields_three_lines_per_member() {
        for n in 1..=FamilyRole::ALL.len() {
            let members = roster(&FamilyRole::ALL[..n]);
            let mut seq = CelebrationSequencer::start(&members, "민수").unwrap();
            let shown = run(&mut seq);
            assert_eq!(shown.len(), 3 * n);
            assert_eq!(seq.member_index(), n);
            assert_eq!(seq.phase(), CelebrationPhase::Complete);
            for (i, member) in members.iter().enumerate() {
                assert!(shown[i * 3..i * 3 + 3].iter().all(|(s, _)| *s == member.label));
            }
        }
    }

    #[test]
    fn test_steps_report_member_changes() {
        let mut seq =
            CelebrationSequencer::start(&roster(&[FamilyRole::Son, FamilyRole::Wife]), "A").unwrap();
        assert_eq!(seq.advance().unwrap(), CelebrationStep::Line);
        assert_eq!(seq.advance().unwrap(), CelebrationStep::Line);
        assert_eq!(seq.advance().unwrap(), CelebrationStep::NextMember(1));
        assert_eq!(seq.advance().unwrap(), CelebrationStep::Line);
        assert_eq!(seq.advance().unwrap(), CelebrationStep::Line);
        assert_eq!(seq.advance().unwrap(), CelebrationStep::Complete);
        assert_eq!(seq.advance(), Err(SequenceError::NotOpen));
        assert!(seq.is_complete());
    }

    #[test]
    fn test_advance_labels() {
        let mut seq =
            CelebrationSequencer::start(&roster(&[FamilyRole::Mom, FamilyRole::Dad]), "A").unwrap();
        let mut labels = vec![seq.advance_label()];
        while !seq.is_complete() {
            seq.advance().unwrap();
            labels.push(seq.advance_label());
        }
        use AdvanceLabel::*;
        assert_eq!(labels, [Next, Next, NextMember, Next, Next, Finish, FreePlay]);
    }

    #[test]
    fn test_duplicate_roles_are_visited_twice() {
        let members = roster(&[FamilyRole::Sister, FamilyRole::Sister]);
        let mut seq = CelebrationSequencer::start(&members, "A").unwrap();
        assert_eq!(run(&mut seq).len(), 6);
    }
}
