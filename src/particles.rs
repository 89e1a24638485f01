//! Boost trail particles.
//!
//! While a boost maneuver is launching, the player sheds short-lived sparks
//! that drift downward and fade out.  Particles are plain ECS entities with a
//! [`Particle`] component:
//!
//! | System                        | Schedule | Purpose                                      |
//! |-------------------------------|----------|----------------------------------------------|
//! | `boost_trail_emit_system`     | Update   | Spawn sparks behind a launching player       |
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles |
//! | `particle_update_system`      | Update   | Move, fade, and despawn expired particles    |
//!
//! Spawning only needs `&mut Commands`; the mesh and a per-particle
//! [`ColorMaterial`] are attached a frame later so each spark fades on its own.

use crate::level::LevelEntity;
use crate::menu::GameState;
use crate::player::{BoostManeuver, Player, PlayerBody};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

/// Sparks emitted per second while launching.
const TRAIL_RATE: f32 = 60.0;
const TRAIL_RADIUS: f32 = 0.08;

// ── Resources ────────────────────────────────────────────────────────────────

#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

/// Carries fractional spark counts across frames so emission stays at
/// `rate` regardless of frame time.
#[derive(Resource, Debug, Clone)]
pub struct TrailEmitter {
    pub rate: f32,
    pending: f32,
}

impl Default for TrailEmitter {
    fn default() -> Self {
        Self {
            rate: TRAIL_RATE,
            pending: 0.0,
        }
    }
}

impl TrailEmitter {
    /// Number of sparks due after `dt` seconds of emission.
    pub fn due(&mut self, dt: f32) -> u32 {
        self.pending += self.rate * dt;
        let whole = self.pending.floor();
        self.pending -= whole;
        whole as u32
    }

    pub fn stop(&mut self) {
        self.pending = 0.0;
    }
}

// ── Component ────────────────────────────────────────────────────────────────

/// Short-lived visual particle.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub color: [f32; 3],
    /// `None` until `attach_particle_mesh_system` runs.
    pub material: Option<Handle<ColorMaterial>>,
}

impl Particle {
    /// Age the particle by `dt`.  Returns `false` once it has expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.age < self.lifetime
    }

    /// Quadratic ease-out: bright at birth, rapid fade at the end.
    pub fn alpha(&self) -> f32 {
        let t = (self.age / self.lifetime).clamp(0.0, 1.0);
        (1.0 - t).powi(2)
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin {
    pub render: bool,
}

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrailEmitter>().add_systems(
            Update,
            (boost_trail_emit_system, particle_update_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
        if self.render {
            app.add_systems(Startup, init_particle_mesh).add_systems(
                Update,
                attach_particle_mesh_system.before(particle_update_system),
            );
        }
    }
}

fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(TRAIL_RADIUS, 6));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Spawn sparks at the player's feet while the boost is carrying it upward.
pub fn boost_trail_emit_system(
    mut commands: Commands,
    mut emitter: ResMut<TrailEmitter>,
    q_player: Query<(&PlayerBody, &BoostManeuver), With<Player>>,
    time: Res<Time>,
) {
    let Ok((body, maneuver)) = q_player.single() else {
        return;
    };
    if !maneuver.is_launching() {
        emitter.stop();
        return;
    }

    let mut rng = rand::thread_rng();
    let origin = body.position - Vec2::new(0.0, crate::constants::PLAYER_SIZE * 0.5);
    for _ in 0..emitter.due(time.delta_secs()) {
        let velocity = Vec2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-6.0..-2.0));
        let offset = Vec2::new(rng.gen_range(-0.2..0.2), 0.0);
        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime: rng.gen_range(0.25..0.5),
                color: [
                    rng.gen_range(0.4..0.6),
                    rng.gen_range(0.8..0.95),
                    1.0,
                ],
                material: None,
            },
            LevelEntity,
            Transform::from_translation((origin + offset).extend(0.5)),
            Visibility::default(),
        ));
    }
}

pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Option<Res<ParticleMesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Particle), Added<Particle>>,
) {
    let Some(particle_mesh) = particle_mesh else {
        return;
    };
    for (entity, mut particle) in query.iter_mut() {
        let [r, g, b] = particle.color;
        let handle = materials.add(ColorMaterial::from_color(Color::srgba(r, g, b, 1.0)));
        particle.material = Some(handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(handle)));
    }
}

/// Move, fade and despawn particles.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: Option<ResMut<Assets<ColorMaterial>>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        if !particle.tick(dt) {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;

        let (Some(handle), Some(materials)) = (particle.material.as_ref(), materials.as_mut())
        else {
            continue;
        };
        if let Some(mat) = materials.get_mut(handle) {
            let [r, g, b] = particle.color;
            mat.color = Color::srgba(r, g, b, particle.alpha());
        }
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Filled circle as a triangle fan.
fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    positions.push([0.0, 0.0, 0.0]);
    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        positions.push([radius * angle.cos(), radius * angle.sin(), 0.0]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        indices.extend_from_slice(&[0, i + 1, (i + 1) % n as u32 + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark(lifetime: f32) -> Particle {
        Particle {
            velocity: Vec2::ZERO,
            age: 0.0,
            lifetime,
            color: [1.0, 1.0, 1.0],
            material: None,
        }
    }

    #[test]
    fn particle_expires_at_lifetime() {
        let mut p = spark(0.3);
        assert!(p.tick(0.1));
        assert!(p.tick(0.1));
        assert!(!p.tick(0.2));
    }

    #[test]
    fn alpha_fades_monotonically() {
        let mut p = spark(1.0);
        let mut last = p.alpha();
        assert_eq!(last, 1.0);
        for _ in 0..10 {
            p.tick(0.1);
            let a = p.alpha();
            assert!(a <= last);
            last = a;
        }
        assert!(last < 1e-4);
    }

    #[test]
    fn emitter_carries_fractions() {
        let mut emitter = TrailEmitter::default();
        // 60/s at 1/120 s per frame: one spark every other frame.
        let total: u32 = (0..120).map(|_| emitter.due(1.0 / 120.0)).sum();
        assert!((59..=60).contains(&total));

        emitter.stop();
        assert_eq!(emitter.due(0.0), 0);
    }
}
