//! Setup domain: the character form and the only producer of
//! `PlayerProfile`.
//!
//! The form itself is drawn by `ui::setup_form`; this module owns the
//! draft being edited, name typing, validation and the single start
//! event.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use crate::data::family_member;
use crate::shared::*;

pub struct SetupPlugin;

impl Plugin for SetupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SetupForm>();

        app.add_systems(OnEnter(GameState::Setup), reset_setup_form);
        app.add_systems(
            Update,
            (type_player_name, submit_profile)
                .chain()
                .run_if(in_state(GameState::Setup)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DRAFT
// ═══════════════════════════════════════════════════════════════════════

/// Unvalidated form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub gender: Gender,
    pub age_group: AgeGroup,
    /// Selection order, which later fixes seating and speaking order.
    pub family: Vec<FamilyMember>,
}

impl ProfileDraft {
    /// Deselect `role` if it is selected, otherwise append it.
    pub fn toggle_member(&mut self, role: FamilyRole) {
        if let Some(idx) = self.family.iter().position(|m| m.role == role) {
            self.family.remove(idx);
        } else {
            self.family.push(family_member(role));
        }
    }

    pub fn is_selected(&self, role: FamilyRole) -> bool {
        self.family.iter().any(|m| m.role == role)
    }

    pub fn push_name_text(&mut self, text: &str) {
        self.name.extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn pop_name_char(&mut self) {
        self.name.pop();
    }

    /// Build the immutable profile, or say what is missing. The name is
    /// checked first. The roster is taken as-is; repeated roles are kept.
    pub fn validate(&self) -> Result<PlayerProfile, ProfileError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.family.is_empty() {
            return Err(ProfileError::EmptyFamily);
        }
        Ok(PlayerProfile::new_validated(
            name.to_string(),
            self.gender,
            self.age_group,
            self.family.clone(),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FORM STATE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct SetupForm {
    pub draft: ProfileDraft,
    /// Last validation message, shown under the start button.
    pub error: Option<String>,
    /// Set once the profile has been accepted; further submits are ignored.
    pub submitted: bool,
}

fn reset_setup_form(mut form: ResMut<SetupForm>) {
    *form = SetupForm::default();
}

/// Feed keyboard characters and IME commits into the name field.
pub fn type_player_name(
    mut keys: EventReader<KeyboardInput>,
    mut ime: EventReader<Ime>,
    mut form: ResMut<SetupForm>,
) {
    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match &event.logical_key {
            Key::Character(text) => form.draft.push_name_text(text),
            Key::Space => form.draft.push_name_text(" "),
            Key::Backspace => form.draft.pop_name_char(),
            _ => {}
        }
    }
    for event in ime.read() {
        if let Ime::Commit { value, .. } = event {
            form.draft.push_name_text(value);
        }
    }
}

pub fn submit_profile(
    mut commands: Commands,
    input: Res<PlayerInput>,
    mut form: ResMut<SetupForm>,
    mut start_events: EventWriter<GameStartEvent>,
) {
    if !input.submit || form.submitted {
        return;
    }

    match form.draft.validate() {
        Ok(profile) => {
            info!(
                "[Setup] profile accepted: {} ({} family members)",
                profile.name(),
                profile.family().len()
            );
            start_events.send(GameStartEvent {
                player_name: profile.name().to_string(),
            });
            commands.insert_resource(profile);
            form.error = None;
            form.submitted = true;
        }
        Err(err) => {
            info!("[Setup] rejected: {}", err);
            form.error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, roles: &[FamilyRole]) -> ProfileDraft {
        let mut d = ProfileDraft {
            name: name.to_string(),
            ..default()
        };
        for role in roles {
            d.toggle_member(*role);
        }
        d
    }

    #[test]
    fn test_empty_name_is_rejected_first() {
        assert_eq!(draft("", &[]).validate(), Err(ProfileError::EmptyName));
        assert_eq!(draft("   ", &[FamilyRole::Mom]).validate(), Err(ProfileError::EmptyName));
    }

    #[test]
    fn test_empty_family_is_rejected() {
        assert_eq!(draft("Jamie", &[]).validate(), Err(ProfileError::EmptyFamily));
    }

    #[test]
    fn test_valid_draft_builds_trimmed_profile() {
        let profile = draft("  Jamie ", &[FamilyRole::Dad, FamilyRole::Mom]).validate().unwrap();
        assert_eq!(profile.name(), "Jamie");
        let roles: Vec<FamilyRole> = profile.family().iter().map(|m| m.role).collect();
        assert_eq!(roles, [FamilyRole::Dad, FamilyRole::Mom]);
    }

    #[test]
    fn test_toggle_removes_and_reappends() {
        let mut d = draft("A", &[FamilyRole::Mom, FamilyRole::Dad, FamilyRole::Son]);
        d.toggle_member(FamilyRole::Mom);
        assert!(!d.is_selected(FamilyRole::Mom));
        d.toggle_member(FamilyRole::Mom);
        let roles: Vec<FamilyRole> = d.family.iter().map(|m| m.role).collect();
        assert_eq!(roles, [FamilyRole::Dad, FamilyRole::Son, FamilyRole::Mom]);
    }

    #[test]
    fn test_long_names_are_kept_whole() {
        let mut d = ProfileDraft::default();
        d.push_name_text("Christopher Columbus");
        assert_eq!(d.name, "Christopher Columbus");
        d.push_name_text("가나다라마바사아자차카타");
        assert_eq!(d.name.chars().count(), 32);
        d.pop_name_char();
        assert!(d.name.ends_with("가나다라마바사아자차카"));
        d.push_name_text("\u{8}x");
        assert!(d.name.ends_with("카x"));
        let profile = ProfileDraft {
            family: vec![family_member(FamilyRole::Mom)],
            ..d.clone()
        }
        .validate()
        .unwrap();
        assert_eq!(profile.name(), d.name);
    }
}
