//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  Before the app is built, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! The loaded config is then checked with [`GameConfig::validate`]; an invalid
//! value is a wiring fault and aborts startup.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{GameError, GameResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Physics ───────────────────────────────────────────────────────────────
    pub gravity: f32,
    pub default_gravity_scale: f32,

    // ── Fall control ──────────────────────────────────────────────────────────
    pub max_falling_velocity: f32,
    pub horizontal_move_speed: f32,
    pub track_half_width: f32,

    // ── Boost ─────────────────────────────────────────────────────────────────
    pub max_boost_capacity: u32,
    pub boost_power: f32,
    pub boost_curve_divisor: f32,
    pub knockback_impulse: f32,

    // ── Boost maneuver ────────────────────────────────────────────────────────
    pub halt_interval: f32,
    pub halt_lerp: f32,
    pub halt_epsilon: f32,
    pub launch_impulse: f32,
    pub ascent_poll_interval: f32,
    pub settle_cooldown: f32,

    // ── Camera ────────────────────────────────────────────────────────────────
    pub min_zoom: f32,
    pub zoom_in_smoothing: f32,
    pub zoom_out_smoothing: f32,
    pub camera_follow_smoothing: f32,
    pub camera_offset_y: f32,
    pub camera_horizontal_clamp: f32,
    /// Follow the player horizontally (smoothed, clamped) instead of staying centred.
    pub camera_clamp_follow: bool,

    // ── Halo ──────────────────────────────────────────────────────────────────
    pub halo_start_size: f32,
    pub halo_start_size_multiplier: f32,
    pub halo_max_size: f32,

    // ── Game flow ─────────────────────────────────────────────────────────────
    pub finish_impulse: f32,
    pub finish_liftoff_secs: f32,
    pub fade_interval: f32,
    pub veil_fade_step: f32,
    pub panel_fade_step: f32,
    pub boost_meter_anim_secs: f32,

    // ── Level layout ──────────────────────────────────────────────────────────
    pub level_depth: f32,
    pub row_spacing: f32,
    pub spawn_clearance: f32,
    pub finish_gate_width: f32,
    pub level_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            default_gravity_scale: DEFAULT_GRAVITY_SCALE,
            max_falling_velocity: MAX_FALLING_VELOCITY,
            horizontal_move_speed: HORIZONTAL_MOVE_SPEED,
            track_half_width: TRACK_HALF_WIDTH,
            max_boost_capacity: MAX_BOOST_CAPACITY,
            boost_power: BOOST_POWER,
            boost_curve_divisor: BOOST_CURVE_DIVISOR,
            knockback_impulse: KNOCKBACK_IMPULSE,
            halt_interval: HALT_INTERVAL,
            halt_lerp: HALT_LERP,
            halt_epsilon: HALT_EPSILON,
            launch_impulse: LAUNCH_IMPULSE,
            ascent_poll_interval: ASCENT_POLL_INTERVAL,
            settle_cooldown: SETTLE_COOLDOWN,
            min_zoom: MIN_ZOOM,
            zoom_in_smoothing: ZOOM_IN_SMOOTHING,
            zoom_out_smoothing: ZOOM_OUT_SMOOTHING,
            camera_follow_smoothing: CAMERA_FOLLOW_SMOOTHING,
            camera_offset_y: CAMERA_OFFSET_Y,
            camera_horizontal_clamp: CAMERA_HORIZONTAL_CLAMP,
            camera_clamp_follow: false,
            halo_start_size: HALO_START_SIZE,
            halo_start_size_multiplier: HALO_START_SIZE_MULTIPLIER,
            halo_max_size: HALO_MAX_SIZE,
            finish_impulse: FINISH_IMPULSE,
            finish_liftoff_secs: FINISH_LIFTOFF_SECS,
            fade_interval: FADE_INTERVAL,
            veil_fade_step: VEIL_FADE_STEP,
            panel_fade_step: PANEL_FADE_STEP,
            boost_meter_anim_secs: BOOST_METER_ANIM_SECS,
            level_depth: LEVEL_DEPTH,
            row_spacing: ROW_SPACING,
            spawn_clearance: SPAWN_CLEARANCE,
            finish_gate_width: FINISH_GATE_WIDTH,
            level_seed: LEVEL_SEED,
        }
    }
}

impl GameConfig {
    /// Widest zoom the camera reaches, equal to the terminal fall speed.
    #[inline]
    pub fn max_fall_zoom(&self) -> f32 {
        self.max_falling_velocity.abs()
    }

    /// Reject values that would make the game misbehave rather than merely
    /// feel different.
    pub fn validate(&self) -> GameResult<()> {
        if self.max_falling_velocity >= 0.0 {
            return Err(invalid(
                "max_falling_velocity",
                self.max_falling_velocity,
                "< 0.0",
            ));
        }
        if self.max_boost_capacity == 0 {
            return Err(invalid(
                "max_boost_capacity",
                self.max_boost_capacity as f32,
                ">= 1",
            ));
        }
        if self.boost_curve_divisor == 0.0 {
            return Err(invalid(
                "boost_curve_divisor",
                self.boost_curve_divisor,
                "!= 0.0",
            ));
        }
        if self.boost_power <= 0.0 {
            return Err(invalid("boost_power", self.boost_power, "> 0.0"));
        }
        if self.launch_impulse <= 0.0 {
            return Err(invalid("launch_impulse", self.launch_impulse, "> 0.0"));
        }
        if !(self.halt_lerp > 0.0 && self.halt_lerp <= 1.0) {
            return Err(invalid("halt_lerp", self.halt_lerp, "(0.0, 1.0]"));
        }
        for (name, value) in [
            ("halt_interval", self.halt_interval),
            ("halt_epsilon", self.halt_epsilon),
            ("ascent_poll_interval", self.ascent_poll_interval),
            ("fade_interval", self.fade_interval),
            ("veil_fade_step", self.veil_fade_step),
            ("panel_fade_step", self.panel_fade_step),
            ("row_spacing", self.row_spacing),
            ("track_half_width", self.track_half_width),
        ] {
            if value <= 0.0 {
                return Err(invalid(name, value, "> 0.0"));
            }
        }
        // Zero pins the camera to the shaft centre; negative bounds would panic in clamp.
        if self.camera_horizontal_clamp < 0.0 {
            return Err(invalid(
                "camera_horizontal_clamp",
                self.camera_horizontal_clamp,
                ">= 0.0",
            ));
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_fall_zoom() {
            return Err(invalid(
                "min_zoom",
                self.min_zoom,
                "(0.0, |max_falling_velocity|]",
            ));
        }
        if self.finish_gate_width >= self.track_half_width * 2.0 {
            return Err(invalid(
                "finish_gate_width",
                self.finish_gate_width,
                "< track width",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f32, expected: &'static str) -> GameError {
    GameError::InvalidConfig {
        name,
        value,
        expected,
    }
}

/// Read `path` and overlay its values on the compiled defaults.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are printed
/// to stderr but do not abort the game.  A missing file is silently ignored.
pub fn load_game_config(path: impl AsRef<Path>) -> GameConfig {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                println!("✓ Loaded game config from {}", path.display());
                loaded
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {}: {e}; using defaults", path.display());
                GameConfig::default()
            }
        },
        Err(_) => {
            println!("ℹ No {} found; using compiled defaults", path.display());
            GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: GameConfig = toml::from_str("boost_power = 12.0\nmax_boost_capacity = 5\n")
            .expect("partial config should parse");
        assert_eq!(cfg.boost_power, 12.0);
        assert_eq!(cfg.max_boost_capacity, 5);
        assert_eq!(cfg.boost_curve_divisor, BOOST_CURVE_DIVISOR);
        assert_eq!(cfg.max_falling_velocity, MAX_FALLING_VELOCITY);
    }

    #[test]
    fn positive_fall_cap_is_rejected() {
        let cfg = GameConfig {
            max_falling_velocity: 4.0,
            ..Default::default()
        };
        match cfg.validate() {
            Err(GameError::InvalidConfig { name, .. }) => {
                assert_eq!(name, "max_falling_velocity")
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn zero_curve_divisor_is_rejected() {
        let cfg = GameConfig {
            boost_curve_divisor: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn min_zoom_wider_than_fall_zoom_is_rejected() {
        let cfg = GameConfig {
            min_zoom: 12.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_camera_clamp_is_rejected() {
        let cfg = GameConfig {
            camera_horizontal_clamp: -1.0,
            camera_clamp_follow: true,
            ..Default::default()
        };
        match cfg.validate() {
            Err(GameError::InvalidConfig { name, .. }) => {
                assert_eq!(name, "camera_horizontal_clamp")
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }

        let pinned = GameConfig {
            camera_horizontal_clamp: 0.0,
            ..Default::default()
        };
        assert!(pinned.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_game_config("definitely/not/here/game.toml");
        assert_eq!(cfg.max_boost_capacity, MAX_BOOST_CAPACITY);
    }
}
