//! Headless tests for the start screen and the in-run keys.
//!
//! These tests use [`MinimalPlugins`] (no window, rendering or physics).
//! UI nodes are still spawned as plain entities, so the menu's own spawn and
//! cleanup can be checked by marker.
//!
//! Covered scenarios:
//! 1. The start screen is built on launch and torn down when a run starts.
//! 2. Space starts a run; R requests a level reset; Escape returns to the menu.
//! 3. Escape on the start screen quits the app.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use boostfall::flow::{flow_keys_system, LevelReset};
use boostfall::menu::{GameState, MainMenuPlugin, MainMenuRoot};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Counts `LevelReset` requests seen by the app.
#[derive(Resource, Default)]
struct ResetCount(u32);

fn count_resets(mut resets: MessageReader<LevelReset>, mut count: ResMut<ResetCount>) {
    count.0 += resets.read().count() as u32;
}

/// Start screen plus the in-run key handler, without the gameplay core.
fn menu_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ResetCount>()
        .add_message::<LevelReset>()
        .add_plugins(MainMenuPlugin)
        .add_systems(
            Update,
            (flow_keys_system, count_resets)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    app.update();
    app
}

/// Press `key` for one frame, then release it and run one more frame.
fn tap(app: &mut App, key: KeyCode) {
    {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.clear();
        keys.press(key);
    }
    app.update();
    {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release_all();
        keys.clear();
    }
    app.update();
}

fn state(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

fn menu_roots(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<MainMenuRoot>>()
        .iter(app.world())
        .count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn start_screen_is_built_then_torn_down() {
    let mut app = menu_app();
    assert_eq!(state(&app), GameState::MainMenu);
    assert_eq!(menu_roots(&mut app), 1);

    tap(&mut app, KeyCode::Space);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(menu_roots(&mut app), 0);
}

#[test]
fn run_keys_reset_level_and_return_to_menu() {
    let mut app = menu_app();

    tap(&mut app, KeyCode::Space);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<ResetCount>().0, 0);

    tap(&mut app, KeyCode::KeyR);
    assert_eq!(app.world().resource::<ResetCount>().0, 1);
    assert_eq!(state(&app), GameState::Playing, "R restarts in place");

    tap(&mut app, KeyCode::Escape);
    assert_eq!(state(&app), GameState::MainMenu);
    assert_eq!(menu_roots(&mut app), 1);
    assert!(app.should_exit().is_none(), "Escape in a run must not quit");
}

#[test]
fn escape_on_start_screen_quits() {
    let mut app = menu_app();
    tap(&mut app, KeyCode::Escape);
    assert_eq!(app.should_exit(), Some(AppExit::Success));
    assert_eq!(state(&app), GameState::MainMenu);
}
