//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] is built from these values, and
//! `assets/game.toml` can override any of them at startup.
//!
//! World units are roughly "player widths": the player is 0.8 u across and the
//! track is 8.4 u wide.

// ── Physics ───────────────────────────────────────────────────────────────────

/// Fixed physics rate (Hz) for `FixedUpdate`.
pub const PHYSICS_HZ: f64 = 50.0;

/// Downward gravitational acceleration applied at `gravity_scale == 1` (u/s²).
pub const GRAVITY: f32 = -9.81;

/// Gravity scale restored after the first input and after each boost maneuver.
pub const DEFAULT_GRAVITY_SCALE: f32 = 1.0;

// ── Fall control ──────────────────────────────────────────────────────────────

/// Terminal fall velocity (u/s).  Must be negative.
///
/// The camera's widest zoom is `|MAX_FALLING_VELOCITY|`, so changing this also
/// changes how far the camera pulls back at full speed.
pub const MAX_FALLING_VELOCITY: f32 = -10.0;

/// Horizontal speed at full stick / key deflection (u/s).  Tested range 1–10.
pub const HORIZONTAL_MOVE_SPEED: f32 = 5.0;

/// Half width of the playable track; the player's x is clamped to ±this.
pub const TRACK_HALF_WIDTH: f32 = 4.2;

// ── Boost ─────────────────────────────────────────────────────────────────────

/// Maximum boost pickups the player can hold.
pub const MAX_BOOST_CAPACITY: u32 = 8;

/// Base strength of the boost curve (`y` in `y + x·y·(x/d)`).
pub const BOOST_POWER: f32 = 10.0;

/// Divisor `d` of the boost curve; larger values flatten the curve.
pub const BOOST_CURVE_DIVISOR: f32 = 4.0;

/// Knockback impulse applied when the player hits an obstacle.
pub const KNOCKBACK_IMPULSE: f32 = 3.0;

// ── Boost maneuver ────────────────────────────────────────────────────────────

/// Sub-interval between halting damping steps (s).
pub const HALT_INTERVAL: f32 = 0.05;

/// Lerp factor toward zero applied to vertical velocity per halting step.
pub const HALT_LERP: f32 = 0.5;

/// Vertical speed below which halting is considered complete (u/s).
pub const HALT_EPSILON: f32 = 0.005;

/// Upward velocity given to the player when the launch begins (u/s).
///
/// At 30 u/s a full 8-pickup boost (170 u) takes a little under 6 s.
pub const LAUNCH_IMPULSE: f32 = 30.0;

/// Poll interval while ascending toward the boost target (s).
pub const ASCENT_POLL_INTERVAL: f32 = 0.025;

/// Cool-down after arrival before gravity returns (s).
pub const SETTLE_COOLDOWN: f32 = 1.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Smallest orthographic half-height (u); the view when standing still.
pub const MIN_ZOOM: f32 = 5.0;

/// Zoom smoothing rate used when the target is wider than the current view.
pub const ZOOM_IN_SMOOTHING: f32 = 2.0;

/// Zoom smoothing rate used when the target is narrower than the current view.
pub const ZOOM_OUT_SMOOTHING: f32 = 6.0;

/// Camera position smoothing rate when horizontal follow is enabled.
pub const CAMERA_FOLLOW_SMOOTHING: f32 = 5.0;

/// Vertical distance the camera sits below the player (u).
pub const CAMERA_OFFSET_Y: f32 = 2.5;

/// Horizontal band the camera may drift within when horizontal follow is on.
pub const CAMERA_HORIZONTAL_CLAMP: f32 = 1.5;

// ── Halo ──────────────────────────────────────────────────────────────────────

pub const HALO_START_SIZE: f32 = 1.0;
pub const HALO_START_SIZE_MULTIPLIER: f32 = 1.2;
pub const HALO_MAX_SIZE: f32 = 8.0;

// ── Game flow ─────────────────────────────────────────────────────────────────

/// Upward impulse applied to the player on reaching the finish gate.
pub const FINISH_IMPULSE: f32 = 50.0;

/// Delay between touching the finish gate and hiding the player (s).
pub const FINISH_LIFTOFF_SECS: f32 = 1.0;

/// Interval between fade steps on the end screens (s).
pub const FADE_INTERVAL: f32 = 0.1;

/// Alpha added to the game-over veil per fade step.
pub const VEIL_FADE_STEP: f32 = 0.2;

/// Alpha added to the game-over / finish panels per fade step.
pub const PANEL_FADE_STEP: f32 = 0.1;

/// Duration of the boost-meter smoothstep animation (s).
pub const BOOST_METER_ANIM_SECS: f32 = 0.5;

// ── Level layout ──────────────────────────────────────────────────────────────

/// Depth of the shaft from the spawn point to the ground (u).
pub const LEVEL_DEPTH: f32 = 320.0;

/// Vertical spacing between generated rows of pickups/obstacles (u).
pub const ROW_SPACING: f32 = 7.0;

/// Rows closer than this to the spawn point are left empty (u).
pub const SPAWN_CLEARANCE: f32 = 12.0;

/// Width of the opening in the ground that acts as the finish gate (u).
pub const FINISH_GATE_WIDTH: f32 = 2.4;

/// Seed used for the level layout when none is configured.
pub const LEVEL_SEED: u64 = 0xB005_7FA1;

pub const PLAYER_SIZE: f32 = 0.8;
pub const PICKUP_RADIUS: f32 = 0.45;
pub const OBSTACLE_HALF_HEIGHT: f32 = 0.3;
