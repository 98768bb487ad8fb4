use bevy::prelude::*;
use crate::data::family::{age_label, family_label, gender_label};
use crate::setup::SetupForm;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct SetupNameText;

#[derive(Component, Clone, Copy)]
pub struct SetupGenderButton(pub Gender);

#[derive(Component)]
pub struct SetupAgeButton;

#[derive(Component)]
pub struct SetupAgeText;

#[derive(Component, Clone, Copy)]
pub struct SetupFamilyButton(pub FamilyRole);

#[derive(Component)]
pub struct SetupErrorText;

const NAME_PLACEHOLDER: &str = "이름을 입력하세요";
const BUTTON_IDLE: Color = Color::srgb(0.290, 0.192, 0.118);
const BUTTON_SELECTED: Color = Color::srgb(0.831, 0.647, 0.455);
const ERROR_RED: Color = Color::srgb(1.0, 0.420, 0.420);

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

fn section_label(parent: &mut ChildBuilder, font: &UiFontHandle, label: &str) {
    parent.spawn((
        Text::new(label),
        text_font(font, 14.0),
        TextColor(COLOR_GOLD),
    ));
}

fn toggle_button_node(width: Val) -> Node {
    Node {
        width,
        height: Val::Px(36.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        border: UiRect::all(Val::Px(2.0)),
        ..default()
    }
}

pub fn spawn_setup_form(mut commands: Commands, font: Res<UiFontHandle>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::axes(Val::Px(20.0), Val::Px(24.0)),
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(COLOR_BACKGROUND),
            StateScoped(GameState::Setup),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("✨ {GAME_TITLE} ✨")),
                text_font(&font, 28.0),
                TextColor(COLOR_GOLD),
            ));
            parent.spawn((
                Text::new("당신의 정보를 입력해주세요"),
                text_font(&font, 14.0),
                TextColor(COLOR_CREAM),
            ));

            // ─── NAME ───
            section_label(parent, &font, "이름");
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(40.0),
                        padding: UiRect::horizontal(Val::Px(12.0)),
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(COLOR_PANEL),
                    BorderColor(COLOR_GOLD),
                    BorderRadius::all(Val::Px(8.0)),
                ))
                .with_children(|field| {
                    field.spawn((
                        SetupNameText,
                        Text::new(NAME_PLACEHOLDER),
                        text_font(&font, 16.0),
                        TextColor(COLOR_MUTED),
                    ));
                });

            // ─── GENDER ───
            section_label(parent, &font, "성별");
            parent
                .spawn(Node {
                    column_gap: Val::Px(10.0),
                    ..default()
                })
                .with_children(|row| {
                    for gender in [Gender::Male, Gender::Female] {
                        row.spawn((
                            SetupGenderButton(gender),
                            Button,
                            toggle_button_node(Val::Px(120.0)),
                            BackgroundColor(BUTTON_IDLE),
                            BorderColor(COLOR_GOLD),
                            BorderRadius::all(Val::Px(8.0)),
                        ))
                        .with_children(|b| {
                            b.spawn((
                                Text::new(gender_label(gender)),
                                text_font(&font, 14.0),
                                TextColor(COLOR_CREAM),
                            ));
                        });
                    }
                });

            // ─── AGE ───
            section_label(parent, &font, "연령대");
            parent
                .spawn((
                    SetupAgeButton,
                    Button,
                    toggle_button_node(Val::Px(250.0)),
                    BackgroundColor(BUTTON_IDLE),
                    BorderColor(COLOR_GOLD),
                    BorderRadius::all(Val::Px(8.0)),
                ))
                .with_children(|b| {
                    b.spawn((
                        SetupAgeText,
                        Text::new(age_label(AgeGroup::default())),
                        text_font(&font, 14.0),
                        TextColor(COLOR_CREAM),
                    ));
                });

            // ─── FAMILY ───
            section_label(parent, &font, "가족 구성 (복수 선택)");
            parent
                .spawn(Node {
                    width: Val::Percent(100.0),
                    flex_wrap: FlexWrap::Wrap,
                    justify_content: JustifyContent::Center,
                    column_gap: Val::Px(8.0),
                    row_gap: Val::Px(8.0),
                    ..default()
                })
                .with_children(|grid| {
                    for role in FamilyRole::ALL {
                        grid.spawn((
                            SetupFamilyButton(role),
                            Button,
                            toggle_button_node(Val::Px(100.0)),
                            BackgroundColor(BUTTON_IDLE),
                            BorderColor(COLOR_GOLD),
                            BorderRadius::all(Val::Px(8.0)),
                        ))
                        .with_children(|b| {
                            b.spawn((
                                Text::new(family_label(role)),
                                text_font(&font, 13.0),
                                TextColor(COLOR_CREAM),
                            ));
                        });
                    }
                });

            // ─── START ───
            parent
                .spawn((
                    ActionButton(Action::Submit),
                    Button,
                    Node {
                        width: Val::Px(220.0),
                        height: Val::Px(48.0),
                        margin: UiRect::top(Val::Px(12.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(COLOR_GOLD),
                    BorderRadius::all(Val::Px(12.0)),
                ))
                .with_children(|b| {
                    b.spawn((
                        Text::new("🎮 게임 시작"),
                        text_font(&font, 18.0),
                        TextColor(COLOR_BACKGROUND),
                    ));
                });

            parent.spawn((
                SetupErrorText,
                Text::new(""),
                text_font(&font, 13.0),
                TextColor(ERROR_RED),
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// INTERACTION
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_form_buttons(
    buttons: Query<
        (
            &Interaction,
            Option<&SetupGenderButton>,
            Option<&SetupAgeButton>,
            Option<&SetupFamilyButton>,
        ),
        (Changed<Interaction>, With<Button>),
    >,
    mut form: ResMut<SetupForm>,
) {
    for (interaction, gender, age, family) in &buttons {
        if *interaction != Interaction::Pressed || form.submitted {
            continue;
        }
        if let Some(SetupGenderButton(g)) = gender {
            form.draft.gender = *g;
        }
        if age.is_some() {
            form.draft.age_group = form.draft.age_group.next();
        }
        if let Some(SetupFamilyButton(role)) = family {
            form.draft.toggle_member(*role);
            form.error = None;
        }
    }
}

pub fn refresh_setup_form(
    form: Res<SetupForm>,
    mut name_text: Query<(&mut Text, &mut TextColor), (With<SetupNameText>, Without<SetupErrorText>, Without<SetupAgeText>)>,
    mut age_text: Query<&mut Text, (With<SetupAgeText>, Without<SetupNameText>, Without<SetupErrorText>)>,
    mut error_text: Query<&mut Text, (With<SetupErrorText>, Without<SetupNameText>, Without<SetupAgeText>)>,
    mut genders: Query<(&SetupGenderButton, &mut BackgroundColor), Without<SetupFamilyButton>>,
    mut families: Query<(&SetupFamilyButton, &mut BackgroundColor), Without<SetupGenderButton>>,
) {
    if !form.is_changed() {
        return;
    }
    let draft = &form.draft;

    for (mut text, mut color) in &mut name_text {
        if draft.name.is_empty() {
            text.0 = NAME_PLACEHOLDER.to_string();
            color.0 = COLOR_MUTED;
        } else {
            text.0 = format!("{}|", draft.name);
            color.0 = COLOR_CREAM;
        }
    }
    for mut text in &mut age_text {
        text.0 = age_label(draft.age_group).to_string();
    }
    for mut text in &mut error_text {
        text.0 = form.error.clone().unwrap_or_default();
    }
    for (button, mut bg) in &mut genders {
        bg.0 = if button.0 == draft.gender { BUTTON_SELECTED } else { BUTTON_IDLE };
    }
    for (button, mut bg) in &mut families {
        bg.0 = if draft.is_selected(button.0) { BUTTON_SELECTED } else { BUTTON_IDLE };
    }
}
