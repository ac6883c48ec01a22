mod error;
mod galaxy_params;
mod generator;
mod random_source;
mod state;

pub use error::GalaxyError;
pub use galaxy_params::GalaxyParams;
pub use generator::{
    ParticleBuffer, branch_angle, color_mix_factor, generate, generate_par, particle_position,
    spin_angle,
};
pub use random_source::RandomSource;
pub use state::GalaxyState;
