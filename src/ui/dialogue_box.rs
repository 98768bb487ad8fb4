use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct DialogueBoxRoot;

#[derive(Component)]
pub struct DialogueSpeaker;

#[derive(Component)]
pub struct DialogueText;

#[derive(Component)]
pub struct DialoguePrompt;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

/// Bottom panel, hidden until a scene publishes a `DialogueView`.
pub fn spawn_dialogue_box(
    mut commands: Commands,
    font: Res<UiFontHandle>,
    state: Res<State<GameState>>,
) {
    commands
        .spawn((
            DialogueBoxRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                right: Val::Px(12.0),
                bottom: Val::Px(20.0),
                min_height: Val::Px(140.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(8.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            BorderColor(COLOR_GOLD),
            BorderRadius::all(Val::Px(12.0)),
            GlobalZIndex(20),
            Visibility::Hidden,
            StateScoped(*state.get()),
        ))
        .with_children(|panel| {
            panel.spawn((
                DialogueSpeaker,
                Text::new(""),
                text_font(&font, 16.0),
                TextColor(COLOR_GOLD),
            ));
            panel.spawn((
                DialogueText,
                Text::new(""),
                text_font(&font, 15.0),
                TextColor(COLOR_CREAM),
            ));
            panel
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::FlexEnd,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        ActionButton(Action::Advance),
                        Button,
                        Node {
                            padding: UiRect::axes(Val::Px(14.0), Val::Px(6.0)),
                            ..default()
                        },
                        BackgroundColor(COLOR_GOLD),
                        BorderRadius::all(Val::Px(8.0)),
                    ))
                    .with_children(|b| {
                        b.spawn((
                            DialoguePrompt,
                            Text::new(AdvanceLabel::Next.text()),
                            text_font(&font, 14.0),
                            TextColor(COLOR_BACKGROUND),
                        ));
                    });
                });
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

/// Mirror `DialogueView` into the panel.
pub fn update_dialogue_box(
    view: Res<DialogueView>,
    mut roots: Query<&mut Visibility, With<DialogueBoxRoot>>,
    mut speakers: Query<&mut Text, (With<DialogueSpeaker>, Without<DialogueText>, Without<DialoguePrompt>)>,
    mut bodies: Query<&mut Text, (With<DialogueText>, Without<DialogueSpeaker>, Without<DialoguePrompt>)>,
    mut prompts: Query<&mut Text, (With<DialoguePrompt>, Without<DialogueSpeaker>, Without<DialogueText>)>,
    added: Query<(), Added<DialogueBoxRoot>>,
) {
    if !view.is_changed() && added.is_empty() {
        return;
    }

    let Some(line) = view.0.as_ref() else {
        for mut vis in &mut roots {
            *vis = Visibility::Hidden;
        }
        return;
    };

    for mut vis in &mut roots {
        *vis = Visibility::Inherited;
    }
    for mut text in &mut speakers {
        **text = line.speaker.clone();
    }
    for mut text in &mut bodies {
        **text = line.text.clone();
    }
    for mut text in &mut prompts {
        **text = line.advance.text().to_string();
    }
}

/// Wipe the panel once a village conversation closes so the next one never
/// opens on stale text.
pub fn clear_dialogue_box_on_end(
    mut events: EventReader<DialogueEndEvent>,
    mut roots: Query<&mut Visibility, With<DialogueBoxRoot>>,
    mut texts: Query<&mut Text, Or<(With<DialogueSpeaker>, With<DialogueText>)>>,
) {
    let Some(ended) = events.read().last() else {
        return;
    };
    info!("[UI/Dialogue] conversation with {} closed", ended.speaker);
    for mut vis in &mut roots {
        *vis = Visibility::Hidden;
    }
    for mut text in &mut texts {
        text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_is_wiped_when_conversation_ends() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<DialogueEndEvent>()
            .add_systems(Update, clear_dialogue_box_on_end);
        let root = app.world_mut().spawn((DialogueBoxRoot, Visibility::Inherited)).id();
        let body = app.world_mut().spawn((DialogueText, Text::new("평안하세요"))).id();

        app.update();
        assert_eq!(app.world().get::<Visibility>(root), Some(&Visibility::Inherited));

        app.world_mut().send_event(DialogueEndEvent {
            speaker: "모세".to_string(),
        });
        app.update();
        assert_eq!(app.world().get::<Visibility>(root), Some(&Visibility::Hidden));
        assert_eq!(app.world().get::<Text>(body).map(|t| t.0.as_str()), Some(""));
    }
}
