mod boot_screen;
mod controls;
mod dialogue_box;
mod hud;
mod setup_form;
mod toast;
mod transitions;

use bevy::asset::LoadState;
use bevy::prelude::*;
use crate::shared::*;

pub const UI_FONT_PATH: &str = "fonts/GowunBatang-Regular.ttf";

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_ui_font);
        app.add_systems(Update, fall_back_on_missing_font);

        // ─── FADE OVERLAY (always present) ───
        app.add_systems(Startup, transitions::spawn_fade_overlay);
        app.add_systems(
            Update,
            (
                transitions::trigger_fade_on_transition,
                transitions::update_fade,
            )
                .chain(),
        );

        // ─── BOOT / PRELOAD ───
        app.add_systems(OnEnter(GameState::Boot), boot_screen::spawn_title_card);
        app.add_systems(OnEnter(GameState::Preload), boot_screen::spawn_loading_screen);
        app.add_systems(
            Update,
            boot_screen::update_loading_bar.run_if(in_state(GameState::Preload)),
        );

        // ─── SETUP FORM ───
        app.add_systems(OnEnter(GameState::Setup), setup_form::spawn_setup_form);
        app.add_systems(
            Update,
            (
                setup_form::handle_form_buttons,
                setup_form::refresh_setup_form,
            )
                .chain()
                .run_if(in_state(GameState::Setup)),
        );

        // ─── HUD, CONTROLS, DIALOGUE BOX ───
        for scene in [GameState::World, GameState::Church, GameState::Celebration] {
            app.add_systems(
                OnEnter(scene),
                (
                    hud::spawn_header,
                    dialogue_box::spawn_dialogue_box,
                    controls::spawn_joystick,
                    toast::spawn_toast_container,
                ),
            );
        }
        app.add_systems(
            OnEnter(GameState::World),
            (controls::spawn_world_controls, hud::spawn_enter_prompt),
        );
        app.add_systems(
            OnEnter(GameState::Celebration),
            controls::spawn_free_play_controls,
        );
        app.add_systems(
            OnEnter(GameState::Church),
            (controls::spawn_church_controls, hud::spawn_church_hint),
        );
        app.add_systems(
            Update,
            (
                dialogue_box::update_dialogue_box,
                dialogue_box::clear_dialogue_box_on_end,
                controls::update_control_visibility,
                controls::update_joystick_visuals,
                controls::button_press_feedback,
                hud::update_church_prompts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .run_if(crate::player::in_explorable_scene),
        );
    }
}

fn load_ui_font(asset_server: Res<AssetServer>, mut font: ResMut<UiFontHandle>) {
    font.0 = asset_server.load(UI_FONT_PATH);
}

/// Without the bundled font, text falls back to Bevy's default font.
/// Text spawned while the font was still loading is pointed back at the
/// default font as well.
fn fall_back_on_missing_font(
    asset_server: Res<AssetServer>,
    mut font: ResMut<UiFontHandle>,
    mut texts: Query<&mut TextFont>,
) {
    if font.0 == Handle::default() {
        return;
    }
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&font.0) {
        warn!("[UI] {} unavailable ({}), using the default font", UI_FONT_PATH, err);
        let failed = std::mem::take(&mut font.0);
        let moved = retarget_text(&failed, texts.iter_mut());
        debug!("[UI] {} text entities moved to the default font", moved);
    }
}

/// Point every text using `failed` at the default font. Returns how many
/// were changed.
fn retarget_text<'a>(
    failed: &Handle<Font>,
    texts: impl IntoIterator<Item = Mut<'a, TextFont>>,
) -> usize {
    let mut moved = 0;
    for mut text in texts {
        if text.font == *failed {
            text.font = Handle::default();
            moved += 1;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retarget_text_only_touches_failed_font() {
        let failed = Handle::<Font>::weak_from_u128(0x0b1e_5517);
        let other = Handle::<Font>::weak_from_u128(0x0b1e_5518);
        let mut world = World::new();
        let stale = world.spawn(text_font(&UiFontHandle(failed.clone()), 16.0)).id();
        let kept = world.spawn(text_font(&UiFontHandle(other.clone()), 16.0)).id();

        let mut query = world.query::<&mut TextFont>();
        let moved = retarget_text(&failed, query.iter_mut(&mut world));

        assert_eq!(moved, 1);
        assert_eq!(world.get::<TextFont>(stale).map(|t| t.font.clone()), Some(Handle::default()));
        assert_eq!(world.get::<TextFont>(kept).map(|t| t.font.clone()), Some(other));
        assert_eq!(world.get::<TextFont>(stale).map(|t| t.font_size), Some(16.0));
    }
}
