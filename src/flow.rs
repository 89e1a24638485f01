//! Run outcome and end-screen sequencing.
//!
//! [`GameFlow`] tracks whether the current run is still going, ended on the
//! ground, or reached the finish gate, and drives the end-screen fades for
//! both outcomes.  Everything time-based is a pure function of
//! [`GameFlow::advance`] so the sequences are testable without a window.
//!
//! ## Phases
//!
//! | Phase             | Entered when                       | Leaves when                     |
//! |-------------------|------------------------------------|---------------------------------|
//! | `Running`         | level spawned / reset              | ground or finish contact        |
//! | `VeilFadeIn`      | ground contact (player hidden)     | veil alpha reaches 1            |
//! | `GameOverFadeIn`  | veil opaque                        | panel alpha reaches 1           |
//! | `FinishLiftoff`   | finish contact (impulse applied)   | `finish_liftoff_secs` elapsed   |
//! | `FinishFadeIn`    | lift-off over (player hidden)      | panel alpha reaches 1           |
//! | `Complete`        | a panel is fully opaque            | level reset                     |
//!
//! ## Keys
//!
//! - **R** writes [`LevelReset`]; the level module rebuilds the run.
//! - **Escape** returns to [`GameState::MainMenu`].

use crate::config::GameConfig;
use crate::contact::{route_player_contacts_system, ContactTag, PlayerContact};
use crate::menu::GameState;
use crate::player::{Player, PlayerBody};
use bevy::prelude::*;

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Down,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowPhase {
    Running,
    VeilFadeIn,
    GameOverFadeIn,
    FinishLiftoff,
    FinishFadeIn,
    Complete,
}

/// Fade timings, copied out of [`GameConfig`].
#[derive(Debug, Clone, Copy)]
struct FadeTimings {
    interval: f32,
    veil_step: f32,
    panel_step: f32,
    liftoff_secs: f32,
}

/// Current run outcome and end-screen fade state.
#[derive(Resource, Debug, Clone)]
pub struct GameFlow {
    phase: FlowPhase,
    outcome: Option<RunOutcome>,
    elapsed: f32,
    veil_steps: u32,
    panel_steps: u32,
    /// Opacity of the full-screen veil behind the game-over panel.
    pub veil_alpha: f32,
    /// Opacity of whichever end panel matches the outcome.
    pub panel_alpha: f32,
    /// The player sprite and halo should not be drawn.
    pub player_hidden: bool,
    timings: FadeTimings,
}

impl Default for GameFlow {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Number of `step` increments needed to reach full opacity.
fn steps_to_opaque(step: f32) -> u32 {
    (1.0 / step - 1e-4).ceil().max(1.0) as u32
}

impl GameFlow {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: FlowPhase::Running,
            outcome: None,
            elapsed: 0.0,
            veil_steps: 0,
            panel_steps: 0,
            veil_alpha: 0.0,
            panel_alpha: 0.0,
            player_hidden: false,
            timings: FadeTimings {
                interval: config.fade_interval,
                veil_step: config.veil_fade_step,
                panel_step: config.panel_fade_step,
                liftoff_secs: config.finish_liftoff_secs,
            },
        }
    }

    /// Back to `Running` with every overlay cleared.
    pub fn reset(&mut self) {
        let timings = self.timings;
        *self = Self {
            timings,
            ..Self::default()
        };
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Gameplay input and motion are live.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        self.outcome == Some(RunOutcome::Down)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome == Some(RunOutcome::Finished)
    }

    /// The player hit the ground.  Returns `false` if the run had already ended.
    pub fn player_down(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.outcome = Some(RunOutcome::Down);
        self.phase = FlowPhase::VeilFadeIn;
        self.player_hidden = true;
        self.elapsed = 0.0;
        true
    }

    /// The player reached the finish gate.  Returns `false` if the run had
    /// already ended.
    pub fn player_finished(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.outcome = Some(RunOutcome::Finished);
        self.phase = FlowPhase::FinishLiftoff;
        self.elapsed = 0.0;
        true
    }

    /// Advance the end-screen sequence by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let t = self.timings;
        self.elapsed += dt;

        loop {
            match self.phase {
                FlowPhase::Running | FlowPhase::Complete => return,
                FlowPhase::FinishLiftoff => {
                    if self.elapsed < t.liftoff_secs {
                        return;
                    }
                    self.elapsed -= t.liftoff_secs;
                    self.player_hidden = true;
                    self.phase = FlowPhase::FinishFadeIn;
                }
                FlowPhase::VeilFadeIn => {
                    if self.elapsed < t.interval {
                        return;
                    }
                    self.elapsed -= t.interval;
                    self.veil_steps += 1;
                    if self.veil_steps >= steps_to_opaque(t.veil_step) {
                        self.veil_alpha = 1.0;
                        self.phase = FlowPhase::GameOverFadeIn;
                    } else {
                        self.veil_alpha = self.veil_steps as f32 * t.veil_step;
                    }
                }
                FlowPhase::GameOverFadeIn | FlowPhase::FinishFadeIn => {
                    if self.elapsed < t.interval {
                        return;
                    }
                    self.elapsed -= t.interval;
                    self.panel_steps += 1;
                    if self.panel_steps >= steps_to_opaque(t.panel_step) {
                        self.panel_alpha = 1.0;
                        self.phase = FlowPhase::Complete;
                    } else {
                        self.panel_alpha = self.panel_steps as f32 * t.panel_step;
                    }
                }
            }
        }
    }
}

/// Request to tear down and rebuild the current level.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct LevelReset;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct FlowPlugin;

impl Plugin for FlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameFlow>()
            .add_message::<LevelReset>()
            .add_systems(OnEnter(GameState::Playing), reset_flow_system)
            .add_systems(
                Update,
                (flow_advance_system, player_visibility_system, flow_keys_system)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                PostUpdate,
                player_outcome_system
                    .after(route_player_contacts_system)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

pub fn reset_flow_system(mut flow: ResMut<GameFlow>, config: Res<GameConfig>) {
    *flow = GameFlow::new(&config);
}

/// PostUpdate: end the run on ground or finish contact.
///
/// Finishing launches the player upward with collisions off so it leaves the
/// shaft through the gate; the camera stops following at this point.
pub fn player_outcome_system(
    mut contacts: MessageReader<PlayerContact>,
    mut q_player: Query<&mut PlayerBody, With<Player>>,
    mut flow: ResMut<GameFlow>,
    config: Res<GameConfig>,
) {
    for contact in contacts.read() {
        match contact.tag {
            ContactTag::Ground => {
                if flow.player_down() {
                    info!("[flow] Player down");
                }
            }
            ContactTag::Finish => {
                if !flow.player_finished() {
                    continue;
                }
                if let Ok(mut body) = q_player.single_mut() {
                    body.gravity_scale = 0.0;
                    body.apply_impulse(Vec2::new(0.0, config.finish_impulse));
                    body.collisions_enabled = false;
                }
                info!("[flow] Finish reached");
            }
            ContactTag::Pickup | ContactTag::Obstacle => {}
        }
    }
}

pub fn flow_advance_system(mut flow: ResMut<GameFlow>, time: Res<Time>) {
    flow.advance(time.delta_secs());
}

pub fn player_visibility_system(
    flow: Res<GameFlow>,
    mut q: Query<&mut Visibility, With<Player>>,
) {
    if !flow.is_changed() {
        return;
    }
    let wanted = if flow.player_hidden {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
    for mut visibility in q.iter_mut() {
        visibility.set_if_neq(wanted);
    }
}

/// **R** restarts the level, **Escape** leaves to the main menu.
pub fn flow_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut resets: MessageWriter<LevelReset>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        info!("[flow] Level reset requested");
        resets.write(LevelReset);
    }
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::MainMenu);
    }
}
