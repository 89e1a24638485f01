//! Player input sampling.
//!
//! Input is translated into [`PlayerIntent`] once per rendered frame; the
//! fixed-step systems in [`super::fall`] and [`super::maneuver`] only ever read
//! the intent, never the keyboard.  Tests populate `PlayerIntent` directly.

use super::state::PlayerIntent;
use bevy::prelude::*;

/// Horizontal axis from a pair of "left" / "right" button states.
pub fn axis_from_buttons(left: bool, right: bool) -> f32 {
    match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Translate A/D, ←/→ and Space into [`PlayerIntent`].
///
/// - **A / ←** and **D / →** → `horizontal_axis` (both held cancels out)
/// - **Space** (just pressed) → latches `boost_pressed` until a fixed step takes it
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    let left = keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
    let right = keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
    intent.horizontal_axis = axis_from_buttons(left, right);

    if keys.just_pressed(KeyCode::Space) {
        intent.boost_pressed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_buttons_cancel() {
        assert_eq!(axis_from_buttons(true, true), 0.0);
        assert_eq!(axis_from_buttons(false, false), 0.0);
        assert_eq!(axis_from_buttons(true, false), -1.0);
        assert_eq!(axis_from_buttons(false, true), 1.0);
    }

    #[test]
    fn space_press_latches_boost() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<PlayerIntent>()
            .add_systems(Update, keyboard_to_intent_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        app.update();

        let intent = *app.world().resource::<PlayerIntent>();
        assert!(intent.boost_pressed);
        assert_eq!(intent.horizontal_axis, 1.0);

        // Next frame: Space no longer "just pressed", but the latch holds.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();
        assert!(app.world().resource::<PlayerIntent>().boost_pressed);
    }
}
