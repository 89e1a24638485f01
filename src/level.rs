//! Level layout and spawning.
//!
//! A level is a vertical shaft: the player spawns at the origin and falls
//! toward a ground line `level_depth` below.  Between the two, rows of boost
//! pickups and obstacle bars are placed by a seeded RNG, so the same seed
//! always produces the same shaft.  A gap in the ground acts as the finish
//! gate.
//!
//! [`LevelLayout::generate`] is pure; [`spawn_level`] turns a layout into
//! entities.  Every level entity (player included) carries [`LevelEntity`] so
//! a reset can clear the whole run in one query.
//!
//! ## Collision setup
//!
//! | Piece     | Body  | Sensor | Tag                    |
//! |-----------|-------|--------|------------------------|
//! | Pickup    | Fixed | yes    | `ContactTag::Pickup`   |
//! | Obstacle  | Fixed | yes    | `ContactTag::Obstacle` |
//! | Ground    | Fixed | no     | `ContactTag::Ground`   |
//! | Finish    | Fixed | yes    | `ContactTag::Finish`   |

use crate::camera::CameraRig;
use crate::config::GameConfig;
use crate::constants::{OBSTACLE_HALF_HEIGHT, PICKUP_RADIUS, PLAYER_SIZE};
use crate::contact::{level_groups, ContactTag};
use crate::error::{require_count, GameResult};
use crate::feedback::{Feedback, FeedbackSink};
use crate::flow::{GameFlow, LevelReset};
use crate::menu::GameState;
use crate::player::{spawn_player, Player, PlayerIntent, RunClock};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier2d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GROUND_HALF_HEIGHT: f32 = 0.5;
/// Narrowest ground segment left beside the finish gate.
const MIN_GROUND_SEGMENT: f32 = 0.5;
const PICKUP_CHANCE: f32 = 0.7;
const OBSTACLE_CHANCE: f32 = 0.45;
const PICKUP_SPIN_RANGE: std::ops::Range<f32> = 1.0..10.0;

// ── Layout ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelPiece {
    Pickup { position: Vec2, spin: f32 },
    Obstacle { position: Vec2, half_width: f32 },
    Ground { position: Vec2, half_width: f32 },
    FinishGate { position: Vec2, half_width: f32 },
}

impl LevelPiece {
    pub fn tag(&self) -> ContactTag {
        match self {
            LevelPiece::Pickup { .. } => ContactTag::Pickup,
            LevelPiece::Obstacle { .. } => ContactTag::Obstacle,
            LevelPiece::Ground { .. } => ContactTag::Ground,
            LevelPiece::FinishGate { .. } => ContactTag::Finish,
        }
    }

    pub fn position(&self) -> Vec2 {
        match *self {
            LevelPiece::Pickup { position, .. }
            | LevelPiece::Obstacle { position, .. }
            | LevelPiece::Ground { position, .. }
            | LevelPiece::FinishGate { position, .. } => position,
        }
    }
}

/// Everything needed to build one run of the shaft.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub spawn: Vec2,
    pub pieces: Vec<LevelPiece>,
}

impl LevelLayout {
    /// Generate the shaft for `seed`.
    pub fn generate(seed: u64, config: &GameConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = config.track_half_width;
        let floor = -config.level_depth;
        let mut pieces = Vec::new();

        let mut y = -config.spawn_clearance;
        while y > floor + config.row_spacing * 0.5 {
            let wants_pickup = rng.gen::<f32>() < PICKUP_CHANCE;
            let wants_obstacle = rng.gen::<f32>() < OBSTACLE_CHANCE;

            match (wants_pickup, wants_obstacle) {
                (true, true) => {
                    // Obstacle against one wall, pickup in the other half.
                    let side = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                    let half_width = rng.gen_range(0.8..(half * 0.45).max(0.9));
                    let obstacle_x = side * (half - half_width);
                    let pickup_x = -side * rng.gen_range(0.5..(half - PICKUP_RADIUS).max(0.6));
                    pieces.push(LevelPiece::Obstacle {
                        position: Vec2::new(obstacle_x, y),
                        half_width,
                    });
                    pieces.push(LevelPiece::Pickup {
                        position: Vec2::new(pickup_x, y),
                        spin: rng.gen_range(PICKUP_SPIN_RANGE),
                    });
                }
                (true, false) => {
                    let limit = half - PICKUP_RADIUS;
                    pieces.push(LevelPiece::Pickup {
                        position: Vec2::new(rng.gen_range(-limit..limit), y),
                        spin: rng.gen_range(PICKUP_SPIN_RANGE),
                    });
                }
                (false, true) => {
                    let half_width = rng.gen_range(0.8..(half * 0.6).max(0.9));
                    let limit = half - half_width;
                    pieces.push(LevelPiece::Obstacle {
                        position: Vec2::new(rng.gen_range(-limit..limit), y),
                        half_width,
                    });
                }
                (false, false) => {}
            }

            y -= config.row_spacing;
        }

        // Ground with a gap for the finish gate.  The ground reaches past the
        // track edge so a player clamped to the wall still lands on it.
        let gate_half = config.finish_gate_width * 0.5;
        let max_centre = (half - gate_half - MIN_GROUND_SEGMENT).max(0.0);
        let gate_x = if max_centre > 0.0 {
            rng.gen_range(-max_centre..max_centre)
        } else {
            0.0
        };
        let ground_y = floor - GROUND_HALF_HEIGHT;
        let outer = half + PLAYER_SIZE;

        pieces.push(LevelPiece::FinishGate {
            position: Vec2::new(gate_x, ground_y),
            half_width: gate_half,
        });
        for (from, to) in [(-outer, gate_x - gate_half), (gate_x + gate_half, outer)] {
            if to - from > 0.0 {
                pieces.push(LevelPiece::Ground {
                    position: Vec2::new((from + to) * 0.5, ground_y),
                    half_width: (to - from) * 0.5,
                });
            }
        }

        Self {
            spawn: Vec2::ZERO,
            pieces,
        }
    }

    pub fn count(&self, tag: ContactTag) -> usize {
        self.pieces.iter().filter(|p| p.tag() == tag).count()
    }
}

// ── Components & Resources ────────────────────────────────────────────────────

/// Everything that belongs to the current run and is despawned on reset.
#[derive(Component)]
pub struct LevelEntity;

/// Constant rotation in rad/s.
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin(pub f32);

/// Marker for boost pickups so their mesh can be attached after spawn.
#[derive(Component)]
pub struct BoostPickup;

/// Shared diamond mesh for pickups.
#[derive(Resource)]
struct PickupMesh(Handle<Mesh>);

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Spawns the shaft on entering `Playing` and rebuilds it on [`LevelReset`].
///
/// `render: false` skips mesh creation, for headless apps without the render
/// asset plugins.
pub struct LevelPlugin {
    pub render: bool,
}

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_level_system)
            .add_systems(OnExit(GameState::Playing), despawn_level_system)
            .add_systems(
                Update,
                (level_reset_system, spin_system, verify_level_wiring_system)
                    .run_if(in_state(GameState::Playing)),
            );

        if self.render {
            app.add_systems(Startup, setup_pickup_mesh).add_systems(
                Update,
                attach_pickup_mesh_system.run_if(in_state(GameState::Playing)),
            );
        }
    }
}

// ── Spawn helpers ─────────────────────────────────────────────────────────────

/// Spawn every piece of `layout` plus the player.  Returns the player entity.
pub fn spawn_level(commands: &mut Commands, layout: &LevelLayout, config: &GameConfig) -> Entity {
    for piece in &layout.pieces {
        spawn_piece(commands, piece);
    }

    let wall_height = config.level_depth + config.spawn_clearance * 2.0;
    for side in [-1.0, 1.0] {
        let x = side * (config.track_half_width + PLAYER_SIZE * 0.5 + 0.1);
        commands.spawn((
            LevelEntity,
            Sprite::from_color(Color::srgb(0.16, 0.18, 0.26), Vec2::new(0.2, wall_height)),
            Transform::from_xyz(x, -config.level_depth * 0.5, -1.0),
        ));
    }

    spawn_player(commands, layout.spawn, config)
}

fn spawn_piece(commands: &mut Commands, piece: &LevelPiece) {
    let base = (
        LevelEntity,
        piece.tag(),
        RigidBody::Fixed,
        level_groups(),
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        Transform::from_translation(piece.position().extend(0.0)),
        Visibility::default(),
    );

    match *piece {
        LevelPiece::Pickup { spin, .. } => {
            commands.spawn((
                base,
                BoostPickup,
                Spin(spin),
                Collider::ball(PICKUP_RADIUS),
                Sensor,
            ));
        }
        LevelPiece::Obstacle { half_width, .. } => {
            commands.spawn((
                base,
                Collider::cuboid(half_width, OBSTACLE_HALF_HEIGHT),
                Sensor,
                Sprite::from_color(
                    Color::srgb(0.85, 0.22, 0.25),
                    Vec2::new(half_width * 2.0, OBSTACLE_HALF_HEIGHT * 2.0),
                ),
            ));
        }
        LevelPiece::Ground { half_width, .. } => {
            commands.spawn((
                base,
                Collider::cuboid(half_width, GROUND_HALF_HEIGHT),
                Sprite::from_color(
                    Color::srgb(0.35, 0.32, 0.30),
                    Vec2::new(half_width * 2.0, GROUND_HALF_HEIGHT * 2.0),
                ),
            ));
        }
        LevelPiece::FinishGate { half_width, .. } => {
            commands.spawn((
                base,
                Collider::cuboid(half_width, GROUND_HALF_HEIGHT),
                Sensor,
                Sprite::from_color(
                    Color::srgba(0.30, 0.95, 0.55, 0.6),
                    Vec2::new(half_width * 2.0, GROUND_HALF_HEIGHT * 2.0),
                ),
            ));
        }
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

fn setup_pickup_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(diamond_mesh(PICKUP_RADIUS * 0.8, PICKUP_RADIUS));
    commands.insert_resource(PickupMesh(handle));
}

/// OnEnter(Playing): build the shaft from the configured seed.
pub fn spawn_level_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut clock: ResMut<RunClock>,
) {
    let layout = LevelLayout::generate(config.level_seed, &config);
    spawn_level(&mut commands, &layout, &config);
    *clock = RunClock::default();
    info!(
        "[level] Spawned shaft: {} pickups, {} obstacles (seed {:#x})",
        layout.count(ContactTag::Pickup),
        layout.count(ContactTag::Obstacle),
        config.level_seed
    );
}

pub fn despawn_level_system(mut commands: Commands, q: Query<Entity, With<LevelEntity>>) {
    for entity in q.iter() {
        commands.entity(entity).despawn();
    }
}

/// Update: tear down and rebuild the run on [`LevelReset`].
///
/// The player entity is replaced, so any in-flight boost maneuver ends with it.
#[allow(clippy::too_many_arguments)]
pub fn level_reset_system(
    mut commands: Commands,
    mut resets: MessageReader<LevelReset>,
    q: Query<Entity, With<LevelEntity>>,
    config: Res<GameConfig>,
    mut flow: ResMut<GameFlow>,
    mut clock: ResMut<RunClock>,
    mut intent: ResMut<PlayerIntent>,
    mut feedback: MessageWriter<Feedback>,
) {
    if resets.read().count() == 0 {
        return;
    }
    for entity in q.iter() {
        commands.entity(entity).despawn();
    }
    let layout = LevelLayout::generate(config.level_seed, &config);
    spawn_level(&mut commands, &layout, &config);

    flow.reset();
    *clock = RunClock::default();
    *intent = PlayerIntent::default();
    feedback.reset_boost_display();
    info!("[level] Level reset");
}

pub fn spin_system(mut q: Query<(&Spin, &mut Transform)>, time: Res<Time>) {
    let dt = time.delta_secs();
    for (spin, mut transform) in q.iter_mut() {
        transform.rotate_z(spin.0 * dt);
    }
}

fn attach_pickup_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<BoostPickup>>,
    mesh: Option<Res<PickupMesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Some(mesh) = mesh else {
        return;
    };
    for entity in query.iter() {
        let mat = materials.add(ColorMaterial::from_color(Color::srgb(0.45, 0.85, 1.0)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh.0.clone()), MeshMaterial2d(mat)));
    }
}

/// Check the collaborators a freshly spawned level needs.
pub fn check_level_wiring(players: usize, cameras: usize, gates: usize) -> GameResult<()> {
    require_count("player", players, 1)?;
    require_count("camera rig", cameras, 1)?;
    require_count("finish gate", gates, 1)
}

/// Update: whenever a new player appears, verify the level is wired up.
/// A missing collaborator is fatal.
pub fn verify_level_wiring_system(
    q_new: Query<(), Added<Player>>,
    q_players: Query<(), With<Player>>,
    q_cameras: Query<(), With<CameraRig>>,
    q_tags: Query<&ContactTag>,
    mut exit: MessageWriter<AppExit>,
) {
    if q_new.is_empty() {
        return;
    }
    let gates = q_tags.iter().filter(|t| **t == ContactTag::Finish).count();
    if let Err(err) = check_level_wiring(q_players.iter().count(), q_cameras.iter().count(), gates)
    {
        error!("[level] {err}");
        exit.write(AppExit::error());
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Filled diamond (rhombus) mesh with the given half-extents.
fn diamond_mesh(half_w: f32, half_h: f32) -> Mesh {
    let positions: Vec<[f32; 3]> = vec![
        [0.0, half_h, 0.0],
        [half_w, 0.0, 0.0],
        [0.0, -half_h, 0.0],
        [-half_w, 0.0, 0.0],
    ];
    let indices = Indices::U32(vec![0, 1, 3, 1, 2, 3]);
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(indices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    fn layout(seed: u64) -> LevelLayout {
        LevelLayout::generate(seed, &GameConfig::default())
    }

    #[test]
    fn same_seed_same_shaft() {
        assert_eq!(layout(42), layout(42));
        assert_ne!(layout(42).pieces, layout(43).pieces);
    }

    #[test]
    fn one_gate_flanked_by_ground() {
        let config = GameConfig::default();
        for seed in 0..50 {
            let l = layout(seed);
            assert_eq!(l.count(ContactTag::Finish), 1);
            assert_eq!(l.count(ContactTag::Ground), 2, "seed {seed}");

            let gate = l
                .pieces
                .iter()
                .find_map(|p| match p {
                    LevelPiece::FinishGate {
                        position,
                        half_width,
                    } => Some((*position, *half_width)),
                    _ => None,
                })
                .unwrap();
            assert_eq!(gate.1 * 2.0, config.finish_gate_width);
            assert!(gate.0.x.abs() + gate.1 <= config.track_half_width);
        }
    }

    #[test]
    fn rows_stay_in_track_and_clear_of_spawn() {
        let config = GameConfig::default();
        for seed in 0..50 {
            for piece in layout(seed).pieces {
                match piece {
                    LevelPiece::Pickup { position, spin } => {
                        assert!(position.x.abs() <= config.track_half_width);
                        assert!(position.y <= -config.spawn_clearance);
                        assert!(position.y > -config.level_depth);
                        assert!(PICKUP_SPIN_RANGE.contains(&spin));
                    }
                    LevelPiece::Obstacle {
                        position,
                        half_width,
                    } => {
                        assert!(position.x.abs() + half_width <= config.track_half_width + 1e-4);
                        assert!(position.y <= -config.spawn_clearance);
                    }
                    LevelPiece::Ground { .. } | LevelPiece::FinishGate { .. } => {}
                }
            }
        }
    }

    #[test]
    fn shaft_has_enough_pickups_to_fill_boost() {
        let config = GameConfig::default();
        let l = layout(config.level_seed);
        assert!(l.count(ContactTag::Pickup) >= config.max_boost_capacity as usize);
    }

    #[test]
    fn wiring_check_names_missing_piece() {
        assert!(check_level_wiring(1, 1, 1).is_ok());
        assert_eq!(
            check_level_wiring(1, 0, 1),
            Err(GameError::MissingCollaborator { name: "camera rig" })
        );
        assert_eq!(
            check_level_wiring(0, 1, 1),
            Err(GameError::MissingCollaborator { name: "player" })
        );
    }
}
