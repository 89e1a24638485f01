//! Player visuals: transform sync and the boost halo.

use super::boost::{halo_size, BoostAccumulator};
use super::state::{Player, PlayerBody};
use crate::config::GameConfig;
use bevy::prelude::*;

/// Copy the integrated body position into the `Transform`.
///
/// Rapier reads this transform for the kinematic body, so overlap detection
/// sees the same position the gameplay does.
pub fn sync_player_transform_system(mut q: Query<(&PlayerBody, &mut Transform), With<Player>>) {
    for (body, mut transform) in q.iter_mut() {
        transform.translation.x = body.position.x;
        transform.translation.y = body.position.y;
    }
}

/// Draw the halo ring around the player, sized by held boost.
///
/// Brightens while the player holds boost so a full halo reads at a glance.
pub fn halo_gizmo_system(
    mut gizmos: Gizmos,
    q: Query<(&Transform, &BoostAccumulator, &Visibility), With<Player>>,
    config: Res<GameConfig>,
) {
    let Ok((transform, boost, visibility)) = q.single() else {
        return;
    };
    if *visibility == Visibility::Hidden {
        return;
    }
    let radius = halo_size(boost.collected(), &config) * 0.5;
    let alpha = if boost.collected() == 0 { 0.25 } else { 0.7 };
    gizmos.circle_2d(
        transform.translation.truncate(),
        radius,
        Color::srgba(0.55, 0.85, 1.0, alpha),
    );
}
