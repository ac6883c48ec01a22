use super::galaxy_points::{Galaxy, spawn_galaxy};
use bevy::prelude::*;
use galaxy_generator::GalaxyParams;
use rand::{Rng, SeedableRng, rngs::StdRng};

pub struct GalaxyFieldPlugin;

impl Plugin for GalaxyFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyFieldConfig>()
            .add_systems(Startup, spawn_galaxy_field);
    }
}

/// The scene: how many randomly scattered galaxies to start with.
#[derive(Resource, Clone, Debug)]
pub struct GalaxyFieldConfig {
    pub galaxy_count: usize,
    /// Seeds both the scattering and every galaxy's particles.
    pub seed: Option<u64>,
    pub debug_panel: bool,
}

impl Default for GalaxyFieldConfig {
    fn default() -> Self {
        Self {
            galaxy_count: 10,
            seed: None,
            debug_panel: true,
        }
    }
}

fn spawn_galaxy_field(mut commands: Commands, config: Res<GalaxyFieldConfig>) {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    // numbered from 1, the way the panel labels them
    for id in 1..=config.galaxy_count {
        let mut galaxy = Galaxy::new(id, GalaxyParams::random(&mut rng));
        if config.seed.is_some() {
            galaxy = galaxy.with_seed(rng.random());
        }
        spawn_galaxy(&mut commands, galaxy);
    }
    info!("Spawned {} galaxies", config.galaxy_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(config: GalaxyFieldConfig) -> Vec<Galaxy> {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(config)
            .add_plugins(GalaxyFieldPlugin);
        app.update();

        let mut query = app.world_mut().query::<&Galaxy>();
        let mut galaxies: Vec<Galaxy> = query.iter(app.world()).cloned().collect();
        galaxies.sort_by_key(|galaxy| galaxy.id);
        galaxies
    }

    #[test]
    fn test_spawns_configured_count() {
        let galaxies = field(GalaxyFieldConfig {
            galaxy_count: 4,
            ..default()
        });
        let ids: Vec<usize> = galaxies.iter().map(|galaxy| galaxy.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(galaxies.iter().all(|galaxy| galaxy.seed.is_none()));
    }

    #[test]
    fn test_seeded_field_is_repeatable() {
        let config = GalaxyFieldConfig {
            galaxy_count: 3,
            seed: Some(2024),
            ..default()
        };
        let a = field(config.clone());
        let b = field(config);
        for (a, b) in a.iter().zip(&b) {
            assert_eq!(a.params, b.params);
            assert_eq!(a.seed, b.seed);
            assert!(a.seed.is_some());
        }
    }

    #[test]
    fn test_empty_field() {
        let galaxies = field(GalaxyFieldConfig {
            galaxy_count: 0,
            ..default()
        });
        assert!(galaxies.is_empty());
    }
}
