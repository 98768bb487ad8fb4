use bevy::prelude::*;
use crate::data::LoadProgress;
use crate::shared::*;

#[derive(Component)]
pub struct LoadingBarFill;

#[derive(Component)]
pub struct LoadingPercentText;

fn full_screen_column() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        flex_direction: FlexDirection::Column,
        row_gap: Val::Px(16.0),
        ..default()
    }
}

pub fn spawn_title_card(mut commands: Commands, font: Res<UiFontHandle>) {
    commands
        .spawn((
            full_screen_column(),
            BackgroundColor(COLOR_BACKGROUND),
            StateScoped(GameState::Boot),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(GAME_TITLE),
                text_font(&font, 40.0),
                TextColor(COLOR_GOLD),
            ));
            parent.spawn((
                Text::new(GAME_SUBTITLE),
                text_font(&font, 18.0),
                TextColor(COLOR_CREAM),
            ));
        });
}

pub fn spawn_loading_screen(mut commands: Commands, font: Res<UiFontHandle>) {
    commands
        .spawn((
            full_screen_column(),
            BackgroundColor(COLOR_BACKGROUND),
            StateScoped(GameState::Preload),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("로딩 중..."),
                text_font(&font, 18.0),
                TextColor(COLOR_CREAM),
            ));

            // Bar track
            parent
                .spawn((
                    Node {
                        width: Val::Px(240.0),
                        height: Val::Px(14.0),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(COLOR_PANEL),
                    BorderColor(COLOR_GOLD),
                    BorderRadius::all(Val::Px(7.0)),
                ))
                .with_children(|track| {
                    track.spawn((
                        LoadingBarFill,
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(COLOR_GOLD),
                        BorderRadius::all(Val::Px(5.0)),
                    ));
                });

            parent.spawn((
                LoadingPercentText,
                Text::new("0%"),
                text_font(&font, 14.0),
                TextColor(COLOR_MUTED),
            ));
        });
}

pub fn update_loading_bar(
    progress: Res<LoadProgress>,
    mut fill: Query<&mut Node, With<LoadingBarFill>>,
    mut label: Query<&mut Text, With<LoadingPercentText>>,
) {
    if !progress.is_changed() {
        return;
    }
    let pct = (progress.fraction() * 100.0).round();
    for mut node in &mut fill {
        node.width = Val::Percent(pct);
    }
    for mut text in &mut label {
        text.0 = format!("{pct}%");
    }
}
