//! Start screen, end screens and the top-level `GameState`.
//!
//! ## States
//!
//! | State      | Description                                  |
//! |------------|----------------------------------------------|
//! | `MainMenu` | Initial state; start screen shown            |
//! | `Playing`  | A run is active; all gameplay systems active |
//!
//! ## Systems
//!
//! | System                     | Schedule              | Purpose                              |
//! |----------------------------|-----------------------|--------------------------------------|
//! | `setup_main_menu`          | `OnEnter(MainMenu)`   | Spawn the start screen               |
//! | `cleanup_main_menu`        | `OnExit(MainMenu)`    | Despawn the start screen             |
//! | `menu_button_system`       | Update / MainMenu     | Start / Quit clicks                  |
//! | `menu_keys_system`         | Update / MainMenu     | Space starts, Escape quits           |
//! | `setup_game_over_overlay`  | `OnEnter(Playing)`    | Spawn the (transparent) game-over UI |
//! | `setup_finish_overlay`     | `OnEnter(Playing)`    | Spawn the (transparent) finish UI    |
//! | `end_screen_fade_system`   | Update / Playing      | Copy `GameFlow` alphas into the UI   |
//! | `finish_time_text_system`  | Update / Playing      | Show the final run time              |

use crate::flow::GameFlow;
use crate::player::RunClock;
use bevy::prelude::*;

mod common;
mod finish;
mod game_over;
mod main_menu;

use common::*;
use finish::*;
use game_over::*;
use main_menu::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
///
/// Every gameplay plugin runs its systems under
/// `.run_if(in_state(GameState::Playing))`.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    MainMenu,
    Playing,
}

// ── Component markers ─────────────────────────────────────────────────────────

#[derive(Component)]
pub struct MainMenuRoot;

#[derive(Component)]
pub struct MenuStartButton;

#[derive(Component)]
pub struct MenuQuitButton;

/// Root of one end-screen overlay; despawned on `OnExit(Playing)`.
#[derive(Component)]
pub struct EndScreenRoot;

#[derive(Component)]
pub struct FinishTimeText;

/// Which `GameFlow` alpha an end-screen element follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeChannel {
    Veil,
    GameOverPanel,
    FinishPanel,
}

/// A UI element whose opacity tracks a [`FadeChannel`].  `base` (and
/// `border`, for bordered nodes) are the colours at full opacity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Fade {
    pub channel: FadeChannel,
    pub base: Color,
    pub border: Option<Color>,
}

impl Fade {
    pub fn new(channel: FadeChannel, base: Color) -> Self {
        Self {
            channel,
            base,
            border: None,
        }
    }

    pub fn with_border(mut self, border: Color) -> Self {
        self.border = Some(border);
        self
    }
}

/// Scale a colour's alpha by `factor`.
fn faded(color: Color, factor: f32) -> Color {
    color.with_alpha(color.alpha() * factor)
}

impl FadeChannel {
    /// Current opacity factor for this channel.
    pub fn factor(self, flow: &GameFlow) -> f32 {
        match self {
            FadeChannel::Veil => flow.veil_alpha,
            FadeChannel::GameOverPanel if flow.is_down() => flow.panel_alpha,
            FadeChannel::FinishPanel if flow.is_finished() => flow.panel_alpha,
            FadeChannel::GameOverPanel | FadeChannel::FinishPanel => 0.0,
        }
    }
}

// ── Plugins ───────────────────────────────────────────────────────────────────

/// Registers `GameState` and the start screen.
///
/// Must be added before any plugin that uses `in_state(GameState::…)`.
pub struct MainMenuPlugin;

impl Plugin for MainMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), cleanup_main_menu)
            .add_systems(
                Update,
                (menu_button_system, menu_keys_system).run_if(in_state(GameState::MainMenu)),
            );
    }
}

/// Game-over and finish overlays, faded in by [`GameFlow`].
pub struct EndScreenPlugin;

impl Plugin for EndScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Playing),
            (setup_game_over_overlay, setup_finish_overlay),
        )
        .add_systems(OnExit(GameState::Playing), cleanup_end_screens)
        .add_systems(
            Update,
            (end_screen_fade_system, finish_time_text_system)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ── End-screen systems ────────────────────────────────────────────────────────

pub fn cleanup_end_screens(mut commands: Commands, query: Query<Entity, With<EndScreenRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Apply the current fade factors to every [`Fade`] element.
#[allow(clippy::type_complexity)]
pub fn end_screen_fade_system(
    flow: Res<GameFlow>,
    mut query: Query<(
        &Fade,
        Option<&mut BackgroundColor>,
        Option<&mut BorderColor>,
        Option<&mut TextColor>,
    )>,
) {
    if !flow.is_changed() {
        return;
    }
    for (fade, background, border, text) in query.iter_mut() {
        let factor = fade.channel.factor(&flow);
        let color = faded(fade.base, factor);
        if let Some(mut background) = background {
            background.0 = color;
        }
        if let (Some(mut border), Some(base)) = (border, fade.border) {
            *border = BorderColor::all(faded(base, factor));
        }
        if let Some(mut text) = text {
            text.0 = color;
        }
    }
}

pub fn finish_time_text_system(
    flow: Res<GameFlow>,
    clock: Res<RunClock>,
    mut query: Query<&mut Text, With<FinishTimeText>>,
) {
    if !flow.is_changed() || !flow.is_finished() {
        return;
    }
    for mut text in query.iter_mut() {
        *text = Text::new(format!(
            "Time: {}",
            crate::hud::format_run_time(clock.secs)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_follow_only_their_outcome() {
        let mut flow = GameFlow::default();
        flow.player_down();
        flow.advance(5.0);

        assert_eq!(FadeChannel::Veil.factor(&flow), 1.0);
        assert_eq!(FadeChannel::GameOverPanel.factor(&flow), 1.0);
        assert_eq!(FadeChannel::FinishPanel.factor(&flow), 0.0);
    }

    #[test]
    fn everything_transparent_while_running() {
        let flow = GameFlow::default();
        for channel in [
            FadeChannel::Veil,
            FadeChannel::GameOverPanel,
            FadeChannel::FinishPanel,
        ] {
            assert_eq!(channel.factor(&flow), 0.0);
        }
    }
}
