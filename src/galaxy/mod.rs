use bevy::prelude::*;

mod galaxy_field;
mod galaxy_points;
mod points_material;

pub use galaxy_field::{GalaxyFieldConfig, GalaxyFieldPlugin};
pub use galaxy_points::Galaxy;

use galaxy_points::regenerate_galaxies;
use points_material::GalaxyPointsMaterial;

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default())
            .add_systems(Update, regenerate_galaxies);
    }
}
