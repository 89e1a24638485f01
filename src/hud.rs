//! In-run HUD: boost meter and run timer.
//!
//! The boost meter never reads the player directly.  It listens to
//! [`Feedback`] messages: each `BoostMagnitude` retargets the bar, each
//! `BoostReset` sends it back to zero, and the bar eases toward its target
//! over `boost_meter_anim_secs` with a smoothstep curve.
//!
//! | System                        | Schedule          | Purpose                          |
//! |-------------------------------|-------------------|----------------------------------|
//! | `setup_hud`                   | `OnEnter(Playing)`| Spawn the HUD nodes              |
//! | `cleanup_hud`                 | `OnExit(Playing)` | Despawn the HUD                  |
//! | `boost_meter_feedback_system` | Update            | Retarget on boost feedback       |
//! | `boost_meter_display_system`  | Update            | Animate and resize the fill bar  |
//! | `run_timer_display_system`    | Update            | Refresh the timer text           |

use crate::config::GameConfig;
use crate::feedback::Feedback;
use crate::menu::GameState;
use crate::player::{BoostAccumulator, RunClock};
use bevy::prelude::*;

// ── Boost meter animation ─────────────────────────────────────────────────────

#[inline]
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Displayed boost magnitude, easing toward the last reported value.
#[derive(Resource, Debug, Clone)]
pub struct BoostMeter {
    from: f32,
    to: f32,
    value: f32,
    elapsed: f32,
    duration: f32,
}

impl BoostMeter {
    pub fn new(duration: f32) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            value: 0.0,
            elapsed: 0.0,
            duration,
        }
    }

    /// Start a new animation from the current value toward `target`.
    pub fn retarget(&mut self, target: f32) {
        self.from = self.value;
        self.to = target;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        self.value = self.from + (self.to - self.from) * smoothstep(t);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

impl Default for BoostMeter {
    fn default() -> Self {
        Self::new(crate::constants::BOOST_METER_ANIM_SECS)
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct BoostMeterFill;

#[derive(Component)]
pub struct RunTimerText;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoostMeter>()
            .add_systems(OnEnter(GameState::Playing), setup_hud)
            .add_systems(OnExit(GameState::Playing), cleanup_hud)
            .add_systems(
                Update,
                (
                    boost_meter_feedback_system,
                    boost_meter_display_system,
                    run_timer_display_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Setup / teardown ──────────────────────────────────────────────────────────

/// Spawn the boost bar (bottom-left) and the run timer (top-left).
pub fn setup_hud(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(BoostMeter::new(config.boost_meter_anim_secs));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("0.00 s"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
                RunTimerText,
            ));

            root.spawn((
                Node {
                    width: Val::Px(220.0),
                    height: Val::Px(14.0),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.06, 0.08, 0.14)),
                BorderColor::all(Color::srgb(0.22, 0.38, 0.72)),
            ))
            .with_children(|bar| {
                bar.spawn((
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.45, 0.85, 1.0)),
                    BoostMeterFill,
                ));
            });
        });
}

pub fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Update ────────────────────────────────────────────────────────────────────

pub fn boost_meter_feedback_system(
    mut feedback: MessageReader<Feedback>,
    mut meter: ResMut<BoostMeter>,
) {
    for message in feedback.read() {
        match *message {
            Feedback::BoostMagnitude(magnitude) => meter.retarget(magnitude),
            Feedback::BoostReset => meter.retarget(0.0),
            Feedback::Cue(_) => {}
        }
    }
}

/// Advance the meter animation and size the fill relative to a full boost.
pub fn boost_meter_display_system(
    mut meter: ResMut<BoostMeter>,
    q_boost: Query<&BoostAccumulator>,
    mut q_fill: Query<&mut Node, With<BoostMeterFill>>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    meter.advance(time.delta_secs());

    let full = q_boost
        .iter()
        .next()
        .map(BoostAccumulator::max_distance)
        .unwrap_or_else(|| BoostAccumulator::from_config(&config).max_distance());
    let fraction = if full > 0.0 {
        (meter.value() / full).clamp(0.0, 1.0)
    } else {
        0.0
    };

    for mut node in q_fill.iter_mut() {
        node.width = Val::Percent(fraction * 100.0);
    }
}

pub fn run_timer_display_system(
    clock: Res<RunClock>,
    mut q_text: Query<&mut Text, With<RunTimerText>>,
) {
    if !clock.is_changed() {
        return;
    }
    for mut text in q_text.iter_mut() {
        *text = Text::new(format_run_time(clock.secs));
    }
}

pub fn format_run_time(secs: f32) -> String {
    format!("{:.2} s", secs.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_follows_smoothstep() {
        let mut meter = BoostMeter::new(0.5);
        meter.retarget(10.0);

        meter.advance(0.25);
        assert!((meter.value() - 5.0).abs() < 1e-4);

        meter.advance(0.125);
        // t = 0.75 → 0.84375
        assert!((meter.value() - 8.4375).abs() < 1e-4);

        meter.advance(1.0);
        assert_eq!(meter.value(), 10.0);
    }

    #[test]
    fn retarget_mid_animation_starts_from_current_value() {
        let mut meter = BoostMeter::new(0.5);
        meter.retarget(10.0);
        meter.advance(0.25);
        let midway = meter.value();

        meter.retarget(0.0);
        meter.advance(0.0);
        assert!((meter.value() - midway).abs() < 1e-5);
        meter.advance(0.5);
        assert_eq!(meter.value(), 0.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut meter = BoostMeter::new(0.0);
        meter.retarget(3.0);
        meter.advance(0.0);
        assert_eq!(meter.value(), 3.0);
    }

    #[test]
    fn feedback_messages_retarget_meter() {
        let mut app = App::new();
        app.add_message::<Feedback>()
            .init_resource::<BoostMeter>()
            .add_systems(Update, boost_meter_feedback_system);

        app.world_mut().write_message(Feedback::BoostMagnitude(6.25));
        app.update();
        assert_eq!(app.world().resource::<BoostMeter>().target(), 6.25);

        app.world_mut().write_message(Feedback::BoostMagnitude(32.5));
        app.world_mut().write_message(Feedback::BoostReset);
        app.update();
        assert_eq!(app.world().resource::<BoostMeter>().target(), 0.0);
    }

    #[test]
    fn run_time_formatting() {
        assert_eq!(format_run_time(12.5), "12.50 s");
        assert_eq!(format_run_time(-1.0), "0.00 s");
    }
}
