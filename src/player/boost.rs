//! Boost accumulation: pickups, the boost power curve, and obstacle knockback.
//!
//! ## Boost curve
//!
//! With `x` collected pickups, power `y` and curve divisor `d`:
//!
//! ```text
//! base     = y * 0.5   if x == 1
//!          = y         otherwise
//! distance = base + x * base * (x / d)      (0 when x == 0)
//! ```
//!
//! | x | distance (y = 10, d = 4) |
//! |---|--------------------------|
//! | 0 | 0                        |
//! | 1 | 6.25                     |
//! | 2 | 20                       |
//! | 3 | 32.5                     |
//! | 8 | 170                      |
//!
//! A single pickup uses half power as its base, so the jump from 1 to 2 is the
//! biggest relative step on the curve.

use super::state::{Player, PlayerBody};
use crate::config::GameConfig;
use crate::contact::{ContactTag, PlayerContact};
use crate::feedback::{AudioCue, Feedback, FeedbackSink};
use bevy::prelude::*;
use rand::Rng;

/// Boost pickups held by the player.
///
/// `collected` is always within `0..=max_capacity`.
#[derive(Component, Debug, Clone)]
pub struct BoostAccumulator {
    collected: u32,
    pub max_capacity: u32,
    pub power: f32,
    pub curve_divisor: f32,
    pub knockback_impulse: f32,
}

impl BoostAccumulator {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            collected: 0,
            max_capacity: config.max_boost_capacity,
            power: config.boost_power,
            curve_divisor: config.boost_curve_divisor,
            knockback_impulse: config.knockback_impulse,
        }
    }

    #[inline]
    pub fn collected(&self) -> u32 {
        self.collected
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.collected >= self.max_capacity
    }

    /// Boost distance for `count` pickups on this accumulator's curve.
    pub fn distance_for(&self, count: u32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let x = count as f32;
        let base = if count == 1 {
            self.power * 0.5
        } else {
            self.power
        };
        base + x * base * (x / self.curve_divisor)
    }

    /// Distance the held pickups are currently worth.
    #[inline]
    pub fn boost_distance(&self) -> f32 {
        self.distance_for(self.collected)
    }

    /// Distance of a full accumulator; the HUD meter's 100% mark.
    #[inline]
    pub fn max_distance(&self) -> f32 {
        self.distance_for(self.max_capacity)
    }

    /// Collect one pickup.  Returns `false` (and does nothing) when full.
    pub fn on_pickup<F: FeedbackSink + ?Sized>(&mut self, feedback: &mut F) -> bool {
        if self.is_full() {
            return false;
        }
        self.collected += 1;
        feedback.play(AudioCue::Pickup);
        feedback.report_boost_magnitude(self.boost_distance());
        true
    }

    /// Obstacle contact: drop all boost, stop dead, and knock the body in a
    /// random direction.
    pub fn on_obstacle_hit<F, R>(&mut self, body: &mut PlayerBody, rng: &mut R, feedback: &mut F)
    where
        F: FeedbackSink + ?Sized,
        R: Rng,
    {
        self.collected = 0;
        body.velocity = Vec2::ZERO;
        let direction = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        body.apply_impulse(direction * self.knockback_impulse);
        feedback.play(AudioCue::Damage);
        feedback.reset_boost_display();
    }

    /// Consume all held pickups and return the distance they were worth.
    pub fn spend<F: FeedbackSink + ?Sized>(&mut self, feedback: &mut F) -> f32 {
        let distance = self.boost_distance();
        self.reset(feedback);
        distance
    }

    /// Drop all held pickups.
    pub fn reset<F: FeedbackSink + ?Sized>(&mut self, feedback: &mut F) {
        self.collected = 0;
        feedback.reset_boost_display();
    }
}

/// Diameter of the halo drawn around the player for `collected` pickups.
pub fn halo_size(collected: u32, config: &GameConfig) -> f32 {
    (collected as f32 + config.halo_start_size * config.halo_start_size_multiplier)
        .min(config.halo_max_size)
}

/// PostUpdate: apply pickup and obstacle contacts to the player's boost.
///
/// Counted pickups are despawned; a pickup touched while already full stays
/// in the world.
pub fn boost_contact_system(
    mut commands: Commands,
    mut contacts: MessageReader<PlayerContact>,
    mut q_player: Query<(&mut BoostAccumulator, &mut PlayerBody), With<Player>>,
    mut feedback: MessageWriter<Feedback>,
) {
    let Ok((mut boost, mut body)) = q_player.single_mut() else {
        return;
    };
    let mut rng = rand::thread_rng();

    for contact in contacts.read() {
        match contact.tag {
            ContactTag::Pickup => {
                if boost.on_pickup(&mut feedback) {
                    commands.entity(contact.other).despawn();
                    debug!("[boost] Pickup collected ({})", boost.collected());
                }
            }
            ContactTag::Obstacle => {
                boost.on_obstacle_hit(&mut body, &mut rng, &mut feedback);
                info!("[boost] Obstacle hit; boost lost");
            }
            ContactTag::Ground | ContactTag::Finish => {}
        }
    }
}
