//! Player module: the falling player entity, its input, and the boost mechanics.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Player`, `PlayerBody`) and resources (`PlayerIntent`, `RunClock`) |
//! | [`control`] | Keyboard → `PlayerIntent` |
//! | [`fall`] | `FallController`: fall cap, horizontal movement, gravity latch |
//! | [`boost`] | `BoostAccumulator`: pickups, boost curve, obstacle knockback |
//! | [`maneuver`] | `BoostManeuver`: halt → launch → settle state machine |
//! | [`rendering`] | Halo gizmo and transform sync |
//!
//! ## Fixed-step pipeline (`FixedUpdate`, chained)
//!
//! 1. [`fall::fall_control_system`]
//! 2. [`maneuver::boost_activation_system`]
//! 3. [`maneuver::maneuver_tick_system`]
//! 4. [`integrate_player_system`]
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod boost;
pub mod control;
pub mod fall;
pub mod maneuver;
pub mod rendering;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use boost::{boost_contact_system, halo_size, BoostAccumulator};
pub use control::keyboard_to_intent_system;
pub use fall::{fall_control_system, FallController};
pub use maneuver::{boost_activation_system, maneuver_tick_system, BoostManeuver, ManeuverPhase};
pub use rendering::{halo_gizmo_system, sync_player_transform_system};
pub use state::{Player, PlayerBody, PlayerIntent, RunClock};

use crate::config::GameConfig;
use crate::constants::PLAYER_SIZE;
use crate::flow::GameFlow;
use crate::level::LevelEntity;
use crate::menu::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// `render: false` leaves out the halo gizmo for apps without `GizmoPlugin`.
pub struct PlayerPlugin {
    pub render: bool,
}

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        if self.render {
            app.add_systems(
                Update,
                halo_gizmo_system.run_if(in_state(GameState::Playing)),
            );
        }
        app.init_resource::<PlayerIntent>()
            .init_resource::<RunClock>()
            .add_systems(
                Update,
                (keyboard_to_intent_system, run_clock_system)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                (
                    fall_control_system,
                    boost_activation_system,
                    maneuver_tick_system,
                    integrate_player_system,
                    sync_player_transform_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                PostUpdate,
                boost_contact_system
                    .after(crate::contact::route_player_contacts_system)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Spawn the player at `position` with fresh boost and fall state.
///
/// The Rapier body is kinematic and position-based: motion comes from
/// [`PlayerBody::integrate`], Rapier only reports overlaps.  The player is not
/// a sensor so that it registers against sensor pickups and obstacles.
pub fn spawn_player(commands: &mut Commands, position: Vec2, config: &GameConfig) -> Entity {
    commands
        .spawn((
            Player,
            LevelEntity,
            PlayerBody::at(position),
            FallController::from_config(config),
            BoostAccumulator::from_config(config),
            BoostManeuver::from_config(config),
            // Physics
            RigidBody::KinematicPositionBased,
            Collider::cuboid(PLAYER_SIZE * 0.5, PLAYER_SIZE * 0.5),
            crate::contact::player_groups(),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            // Transform / visibility
            Sprite::from_color(Color::srgb(0.92, 0.95, 1.0), Vec2::splat(PLAYER_SIZE)),
            Transform::from_translation(position.extend(1.0)),
            Visibility::default(),
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// FixedUpdate: integrate the player body under gravity, then hold it inside
/// the track walls.
///
/// Stops once the player is down; keeps running after a finish so the
/// lift-off impulse carries the player off screen.
pub fn integrate_player_system(
    mut q: Query<(&mut PlayerBody, &FallController), With<Player>>,
    flow: Res<GameFlow>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    if flow.is_down() {
        return;
    }
    let Ok((mut body, fall)) = q.single_mut() else {
        return;
    };
    body.integrate(time.delta_secs(), config.gravity);
    fall.keep_on_track(&mut body);
}

/// Update: advance the run clock while the player is playing.
pub fn run_clock_system(
    mut clock: ResMut<RunClock>,
    flow: Res<GameFlow>,
    q: Query<&FallController, With<Player>>,
    time: Res<Time>,
) {
    if !flow.is_running() {
        return;
    }
    if q.single().is_ok_and(FallController::started) {
        clock.secs += time.delta_secs();
    }
}
