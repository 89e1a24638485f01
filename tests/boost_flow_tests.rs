//! Headless end-to-end tests for a run of the shaft.
//!
//! The app uses [`MinimalPlugins`] with a manual 20 ms time step, so every
//! `app.update()` runs exactly one 50 Hz `FixedUpdate`.  Rapier is not added:
//! tests write `CollisionEvent`s themselves, which is exactly what the contact
//! router consumes.
//!
//! Covered scenarios:
//! 1. Entering `Playing` spawns a hanging player; the first input starts the fall.
//! 2. Collected pickups launch the player at least the boost distance upward.
//! 3. An obstacle hit empties the boost.
//! 4. Ground contact ends the run and hides the player.
//! 5. Reaching the finish lifts the player off; `R` rebuilds the level.
//! 6. A level without a camera rig is a fatal wiring fault.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::CollisionEvent;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use std::time::Duration;

use boostfall::camera::CameraRig;
use boostfall::config::GameConfig;
use boostfall::constants::PHYSICS_HZ;
use boostfall::contact::ContactTag;
use boostfall::flow::GameFlow;
use boostfall::menu::GameState;
use boostfall::player::{BoostAccumulator, BoostManeuver, ManeuverPhase, Player, PlayerBody};
use boostfall::GameplayPlugin;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn headless_app(with_camera: bool) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        .insert_resource(GameConfig::default())
        .init_resource::<ButtonInput<KeyCode>>()
        .add_message::<CollisionEvent>()
        .init_state::<GameState>()
        .add_plugins(GameplayPlugin { render: false });

    if with_camera {
        let rig = CameraRig::from_config(&GameConfig::default());
        app.world_mut().spawn(rig);
    }

    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    app
}

fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .expect("exactly one player")
}

fn body(app: &mut App) -> PlayerBody {
    let e = player(app);
    app.world().get::<PlayerBody>(e).unwrap().clone()
}

fn tagged(app: &mut App, tag: ContactTag) -> Vec<Entity> {
    app.world_mut()
        .query::<(Entity, &ContactTag)>()
        .iter(app.world())
        .filter(|(_, t)| **t == tag)
        .map(|(e, _)| e)
        .collect()
}

fn touch(app: &mut App, other: Entity) {
    let p = player(app);
    app.world_mut()
        .write_message(CollisionEvent::Started(p, other, CollisionEventFlags::empty()));
}

fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

/// Hold D for a few frames so the gravity latch fires.
fn start_falling(app: &mut App) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyD);
    for _ in 0..5 {
        app.update();
    }
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release_all();
    keys.clear();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn player_hangs_until_first_input() {
    let mut app = headless_app(true);
    for _ in 0..10 {
        app.update();
    }
    let hanging = body(&mut app);
    assert_eq!(hanging.position, Vec2::ZERO);
    assert_eq!(hanging.gravity_scale, 0.0);

    start_falling(&mut app);
    for _ in 0..20 {
        app.update();
    }
    let falling = body(&mut app);
    assert_eq!(falling.gravity_scale, 1.0);
    assert!(falling.position.y < 0.0);
    assert!(falling.position.x > 0.0);
    assert!(falling.velocity.y >= GameConfig::default().max_falling_velocity);
}

#[test]
fn collected_pickups_launch_player_past_boost_distance() {
    let mut app = headless_app(true);
    start_falling(&mut app);

    let pickups = tagged(&mut app, ContactTag::Pickup);
    for &pickup in pickups.iter().take(3) {
        touch(&mut app, pickup);
    }
    app.update();

    let e = player(&mut app);
    let boost = app.world().get::<BoostAccumulator>(e).unwrap();
    assert_eq!(boost.collected(), 3);
    assert_eq!(boost.boost_distance(), 32.5);
    assert_eq!(
        tagged(&mut app, ContactTag::Pickup).len(),
        pickups.len() - 3,
        "counted pickups are despawned"
    );

    tap(&mut app, KeyCode::Space);

    let mut start_y = None;
    let mut arrival_y = None;
    for _ in 0..2_000 {
        let y_before = body(&mut app).position.y;
        app.update();
        let maneuver = app.world().get::<BoostManeuver>(e).unwrap().clone();
        match maneuver.phase() {
            ManeuverPhase::Launching { target_y, .. } if start_y.is_none() => {
                // The launch fires before this step's integration.
                assert_eq!(target_y, y_before + 32.5);
                start_y = Some(y_before);
            }
            ManeuverPhase::Settling { .. } if arrival_y.is_none() => {
                arrival_y = Some(body(&mut app).position.y);
            }
            _ => {}
        }
        if arrival_y.is_some() && maneuver.is_idle() {
            break;
        }
    }

    let start_y = start_y.expect("maneuver reached the launch phase");
    let arrival_y = arrival_y.expect("maneuver reached the settle phase");
    assert!(arrival_y >= start_y + 32.5, "{arrival_y} < {start_y} + 32.5");

    let after = body(&mut app);
    assert!(!after.busy);
    assert!(after.collisions_enabled);
    assert_eq!(after.gravity_scale, 1.0);
    assert_eq!(
        app.world().get::<BoostAccumulator>(e).unwrap().collected(),
        0
    );
}

#[test]
fn obstacle_hit_empties_boost() {
    let mut app = headless_app(true);
    start_falling(&mut app);

    let pickups = tagged(&mut app, ContactTag::Pickup);
    touch(&mut app, pickups[0]);
    touch(&mut app, pickups[1]);
    app.update();

    let obstacle = tagged(&mut app, ContactTag::Obstacle)[0];
    touch(&mut app, obstacle);
    app.update();

    let e = player(&mut app);
    assert_eq!(
        app.world().get::<BoostAccumulator>(e).unwrap().collected(),
        0
    );
    // Obstacles are not consumed.
    assert!(app.world().get_entity(obstacle).is_ok());
}

#[test]
fn ground_contact_ends_run() {
    let mut app = headless_app(true);
    start_falling(&mut app);

    let ground = tagged(&mut app, ContactTag::Ground)[0];
    touch(&mut app, ground);
    app.update();
    app.update();

    let flow = app.world().resource::<GameFlow>();
    assert!(flow.is_down());
    assert!(flow.player_hidden);

    let e = player(&mut app);
    assert_eq!(
        *app.world().get::<Visibility>(e).unwrap(),
        Visibility::Hidden
    );

    let frozen = body(&mut app).position;
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(body(&mut app).position, frozen, "motion stops once down");
}

#[test]
fn finish_lifts_off_and_reset_rebuilds_level() {
    let mut app = headless_app(true);
    start_falling(&mut app);

    let gate = tagged(&mut app, ContactTag::Finish)[0];
    touch(&mut app, gate);
    app.update();

    assert!(app.world().resource::<GameFlow>().is_finished());
    let lifted = body(&mut app);
    assert!(!lifted.collisions_enabled);
    assert_eq!(lifted.gravity_scale, 0.0);
    assert!(lifted.velocity.y > 0.0);

    let old_player = player(&mut app);
    tap(&mut app, KeyCode::KeyR);
    app.update();

    let flow = app.world().resource::<GameFlow>();
    assert!(flow.is_running());
    assert!(!flow.player_hidden);

    let new_player = player(&mut app);
    assert_ne!(old_player, new_player);
    assert_eq!(body(&mut app).position, Vec2::ZERO);
    assert_eq!(tagged(&mut app, ContactTag::Finish).len(), 1);
}

#[test]
fn missing_camera_rig_is_fatal() {
    let mut app = headless_app(false);
    app.update();
    assert!(matches!(app.should_exit(), Some(AppExit::Error(_))));
}
