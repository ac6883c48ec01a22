use super::points_material::{GalaxyPointsMaterial, build_points_mesh};
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use galaxy_generator::{
    GalaxyError, GalaxyParams, GalaxyState, ParticleBuffer, generate, generate_par,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Instant;

/// Above this many particles generation is spread over the rayon pool.
const PARALLEL_THRESHOLD: usize = 50_000;

/// Live parameters of one galaxy. Any mutation triggers a full rebuild.
#[derive(Component, Clone, Debug)]
#[require(Transform, Visibility, GalaxyPoints)]
pub struct Galaxy {
    pub id: usize,
    pub params: GalaxyParams,
    /// Fixed seed for repeatable particles, fresh randomness on every rebuild if `None`.
    pub seed: Option<u64>,
}

impl Galaxy {
    pub fn new(id: usize, params: GalaxyParams) -> Self {
        Self {
            id,
            params,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn sample_particles(&self) -> Result<ParticleBuffer, GalaxyError> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        if self.params.count > PARALLEL_THRESHOLD {
            generate_par(&self.params, seed)
        } else {
            generate(&self.params, &mut StdRng::seed_from_u64(seed))
        }
    }
}

/// GPU side of a galaxy. Owns its mesh and material exclusively.
#[derive(Component, Default)]
pub struct GalaxyPoints {
    pub state: GalaxyState,
    pub generation: u32,
    mesh: Option<Handle<Mesh>>,
    material: Option<Handle<GalaxyPointsMaterial>>,
}

impl GalaxyPoints {
    fn release(
        &mut self,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<GalaxyPointsMaterial>,
    ) {
        if let Some(mesh) = self.mesh.take() {
            meshes.remove(&mesh);
        }
        if let Some(material) = self.material.take() {
            materials.remove(&material);
        }
    }
}

/// Adds a galaxy to the scene and hands back its entity. Particles are built on the
/// next `Update`.
pub fn spawn_galaxy(commands: &mut Commands, galaxy: Galaxy) -> Entity {
    commands.spawn(galaxy).id()
}

/// Rebuilds every galaxy whose parameters changed (or that was just spawned).
///
/// Particles are generated before anything is torn down, so a rejected parameter set
/// leaves the previous galaxy on screen.
pub fn regenerate_galaxies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
    mut galaxies: Query<(Entity, &Galaxy, &mut GalaxyPoints), Changed<Galaxy>>,
) {
    for (entity, galaxy, mut points) in &mut galaxies {
        let started = Instant::now();
        let buffer = match galaxy.sample_particles() {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!("Galaxy {}: keeping previous particles, {}", galaxy.id, err);
                continue;
            }
        };

        let had_resources = points.state.owns_resources();
        points.state = points.state.begin_regeneration();
        if had_resources {
            points.release(&mut meshes, &mut materials);
        }

        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<(Mesh3d, MeshMaterial3d<GalaxyPointsMaterial>)>();
        if !buffer.is_empty() {
            let mesh = meshes.add(build_points_mesh(&buffer));
            let material = materials.add(GalaxyPointsMaterial {
                size: galaxy.params.size,
            });
            entity_commands.insert((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                NoFrustumCulling,
            ));
            points.mesh = Some(mesh);
            points.material = Some(material);
        }
        entity_commands.insert(galaxy.params.transform());

        points.state = points.state.finish_regeneration();
        points.generation += 1;
        info!(
            "Galaxy {}: generation {} with {} particles in {:.1?}",
            galaxy.id,
            points.generation,
            buffer.len(),
            started.elapsed()
        );
    }
}
