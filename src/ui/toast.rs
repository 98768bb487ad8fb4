use bevy::prelude::*;
use crate::shared::*;

const MAX_TOASTS: usize = 3;
const TOAST_FADE_SECS: f32 = 0.5;
const TOAST_BG_ALPHA: f32 = 0.8;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Column under the header that holds the visible toasts.
#[derive(Component)]
pub struct ToastContainer;

#[derive(Component)]
pub struct ToastItem {
    pub timer: Timer,
    pub fade_timer: Option<Timer>,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN CONTAINER
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_toast_container(mut commands: Commands, state: Res<State<GameState>>) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(64.0),
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
        GlobalZIndex(30),
        PickingBehavior::IGNORE,
        StateScoped(*state.get()),
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// HANDLE TOAST EVENTS
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_toast_events(
    mut commands: Commands,
    mut events: EventReader<ToastEvent>,
    font: Res<UiFontHandle>,
    container_query: Query<Entity, With<ToastContainer>>,
    existing_toasts: Query<Entity, With<ToastItem>>,
) {
    let Ok(container) = container_query.get_single() else {
        return;
    };

    let mut visible: Vec<Entity> = existing_toasts.iter().collect();
    for event in events.read() {
        debug!("[UI] toast: {}", event.message);
        if visible.len() >= MAX_TOASTS {
            let oldest = visible.remove(0);
            commands.entity(oldest).despawn_recursive();
        }

        let toast = commands
            .spawn((
                ToastItem {
                    timer: Timer::from_seconds(event.duration_secs, TimerMode::Once),
                    fade_timer: None,
                },
                Node {
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(COLOR_BACKGROUND.with_alpha(TOAST_BG_ALPHA)),
                BorderColor(COLOR_GOLD),
                BorderRadius::all(Val::Px(10.0)),
                PickingBehavior::IGNORE,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(event.message.clone()),
                    text_font(&font, 14.0),
                    TextColor(COLOR_CREAM),
                    PickingBehavior::IGNORE,
                ));
            })
            .id();

        commands.entity(container).add_child(toast);
        visible.push(toast);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE TOASTS
// ═══════════════════════════════════════════════════════════════════════

pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toast_query: Query<(Entity, &mut ToastItem, &mut BackgroundColor, &Children)>,
    mut text_color_query: Query<&mut TextColor>,
) {
    for (entity, mut toast, mut bg_color, children) in &mut toast_query {
        let toast = &mut *toast;
        let Some(fade) = toast.fade_timer.as_mut() else {
            if toast.timer.tick(time.delta()).just_finished() {
                toast.fade_timer = Some(Timer::from_seconds(TOAST_FADE_SECS, TimerMode::Once));
            }
            continue;
        };

        if fade.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let alpha = 1.0 - fade.fraction();
        bg_color.0.set_alpha(TOAST_BG_ALPHA * alpha);
        for &child in children.iter() {
            if let Ok(mut text_color) = text_color_query.get_mut(child) {
                text_color.0.set_alpha(alpha);
            }
        }
    }
}
