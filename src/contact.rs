//! Contact routing: turns Rapier collision events into typed player contacts.
//!
//! Level entities carry a [`ContactTag`].  [`route_player_contacts_system`]
//! reads `CollisionEvent::Started`, keeps the pairs that involve the player
//! and a tagged entity, and writes one [`PlayerContact`] per pair.  Consumers
//! (`player::boost_contact_system`, `flow::player_outcome_system`) match on the
//! tag and never look at colliders directly.
//!
//! While the player's `collisions_enabled` flag is off (mid-maneuver), contacts
//! are dropped here, so no consumer has to check it.
//!
//! ## Collision groups
//!
//! | Layer    | Group   | Collides with |
//! |----------|---------|---------------|
//! | Player   | GROUP_2 | GROUP_1       |
//! | Level    | GROUP_1 | GROUP_2       |

use crate::menu::GameState;
use crate::player::{Player, PlayerBody};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// What a level entity is, as far as the player is concerned.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactTag {
    Ground,
    Pickup,
    Obstacle,
    Finish,
}

/// The player started touching a tagged entity.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerContact {
    pub tag: ContactTag,
    /// The tagged entity that was touched.
    pub other: Entity,
}

/// Registers [`PlayerContact`] and the routing system.
pub struct ContactPlugin;

impl Plugin for ContactPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlayerContact>().add_systems(
            PostUpdate,
            route_player_contacts_system.run_if(in_state(GameState::Playing)),
        );
    }
}

pub fn player_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_2, Group::GROUP_1)
}

pub fn level_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::GROUP_2)
}

/// PostUpdate: resolve collision events into [`PlayerContact`] messages.
pub fn route_player_contacts_system(
    mut collision_events: MessageReader<CollisionEvent>,
    q_player: Query<(Entity, &PlayerBody), With<Player>>,
    q_tagged: Query<&ContactTag>,
    mut contacts: MessageWriter<PlayerContact>,
) {
    let Ok((player, body)) = q_player.single() else {
        return;
    };

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let other = if e1 == player {
            e2
        } else if e2 == player {
            e1
        } else {
            continue;
        };

        let Ok(tag) = q_tagged.get(other) else {
            continue;
        };

        if !body.collisions_enabled {
            continue;
        }

        contacts.write(PlayerContact { tag: *tag, other });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    #[derive(Resource, Default)]
    struct SeenContacts(Vec<PlayerContact>);

    fn collect_contacts(mut contacts: MessageReader<PlayerContact>, mut seen: ResMut<SeenContacts>) {
        seen.0.extend(contacts.read().copied());
    }

    fn contact_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.add_message::<PlayerContact>();
        app.init_resource::<SeenContacts>();
        app.add_systems(
            PostUpdate,
            (route_player_contacts_system, collect_contacts).chain(),
        );
        app
    }

    fn read_contacts(app: &App) -> Vec<PlayerContact> {
        app.world().resource::<SeenContacts>().0.clone()
    }

    fn started(a: Entity, b: Entity) -> CollisionEvent {
        CollisionEvent::Started(a, b, CollisionEventFlags::empty())
    }

    #[test]
    fn player_pickup_contact_is_routed_either_order() {
        let mut app = contact_test_app();
        let player = app
            .world_mut()
            .spawn((Player, PlayerBody::at(Vec2::ZERO)))
            .id();
        let pickup = app.world_mut().spawn(ContactTag::Pickup).id();
        let obstacle = app.world_mut().spawn(ContactTag::Obstacle).id();

        app.world_mut().write_message(started(pickup, player));
        app.world_mut().write_message(started(player, obstacle));
        app.update();

        assert_eq!(
            read_contacts(&app),
            vec![
                PlayerContact {
                    tag: ContactTag::Pickup,
                    other: pickup
                },
                PlayerContact {
                    tag: ContactTag::Obstacle,
                    other: obstacle
                },
            ]
        );
    }

    #[test]
    fn untagged_and_foreign_pairs_are_ignored() {
        let mut app = contact_test_app();
        let player = app
            .world_mut()
            .spawn((Player, PlayerBody::at(Vec2::ZERO)))
            .id();
        let untagged = app.world_mut().spawn_empty().id();
        let a = app.world_mut().spawn(ContactTag::Ground).id();
        let b = app.world_mut().spawn(ContactTag::Pickup).id();

        app.world_mut().write_message(started(player, untagged));
        app.world_mut().write_message(started(a, b));
        app.world_mut().write_message(CollisionEvent::Stopped(
            player,
            a,
            CollisionEventFlags::empty(),
        ));
        app.update();

        assert!(read_contacts(&app).is_empty());
    }

    #[test]
    fn contacts_are_dropped_while_collisions_disabled() {
        let mut app = contact_test_app();
        let mut body = PlayerBody::at(Vec2::ZERO);
        body.collisions_enabled = false;
        let player = app.world_mut().spawn((Player, body)).id();
        let obstacle = app.world_mut().spawn(ContactTag::Obstacle).id();

        app.world_mut().write_message(started(obstacle, player));
        app.update();

        assert!(read_contacts(&app).is_empty());
    }
}
