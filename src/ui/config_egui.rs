use bevy::color::ColorToPacked;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use galaxy_generator::GalaxyParams;

use crate::galaxy::{Galaxy, GalaxyFieldConfig};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_visuals_system).add_systems(
            Update,
            (attach_drafts_system, ui_system)
                .chain()
                .run_if(debug_panel_enabled),
        );
    }
}

/// Parameters as currently shown in the panel, ahead of the live ones while an edit
/// is in progress.
#[derive(Component, Clone, Debug)]
pub struct GalaxyDraft(pub GalaxyParams);

fn debug_panel_enabled(config: Res<GalaxyFieldConfig>) -> bool {
    config.debug_panel
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// Decides whether an edited draft becomes the live parameter set.
///
/// Nothing is committed while a slider is being dragged or a value is being typed,
/// so one finished edit means one rebuild.
pub fn commit_draft(
    live: &GalaxyParams,
    draft: &GalaxyParams,
    interacting: bool,
) -> Option<GalaxyParams> {
    if interacting || live == draft || draft.validate().is_err() {
        return None;
    }
    Some(*draft)
}

fn attach_drafts_system(
    mut commands: Commands,
    query: Query<(Entity, &Galaxy), Without<GalaxyDraft>>,
) {
    for (entity, galaxy) in &query {
        commands.entity(entity).insert(GalaxyDraft(galaxy.params));
    }
}

fn slider<'a, N: egui::emath::Numeric>(
    value: &'a mut N,
    min: N,
    max: N,
    step: N,
    label: &str,
) -> egui::Slider<'a> {
    egui::Slider::new(value, min..=max)
        .step_by(step.to_f64())
        .text(label)
}

fn color_row(ui: &mut egui::Ui, color: &mut Srgba, label: &str) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_u8_array_no_alpha();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(label);
    });
}

fn galaxy_params_ui(id: usize, params: &mut GalaxyParams, ui: &mut egui::Ui) {
    let min = GalaxyParams::MIN;
    let max = GalaxyParams::MAX;
    let step = GalaxyParams::STEP;

    egui::CollapsingHeader::new(format!("Galaxy {}", id)).show(ui, |ui| {
        for (axis, label) in ["X", "Y", "Z"].into_iter().enumerate() {
            ui.add(slider(
                &mut params.position[axis],
                min.position[axis],
                max.position[axis],
                step.position[axis],
                label,
            ));
        }
        ui.add(slider(
            &mut params.rotation,
            min.rotation,
            max.rotation,
            step.rotation,
            "Rotation",
        ));
        ui.add(slider(
            &mut params.count,
            min.count,
            max.count,
            step.count,
            "Count",
        ));
        ui.add(slider(&mut params.size, min.size, max.size, step.size, "Size"));
        ui.add(slider(
            &mut params.radius,
            min.radius,
            max.radius,
            step.radius,
            "Radius",
        ));
        ui.add(slider(
            &mut params.branches,
            min.branches,
            max.branches,
            step.branches,
            "Branches",
        ));
        ui.add(slider(&mut params.spin, min.spin, max.spin, step.spin, "Spin"));
        ui.add(slider(
            &mut params.randomness,
            min.randomness,
            max.randomness,
            step.randomness,
            "Randomness",
        ));
        ui.add(slider(
            &mut params.randomness_power,
            min.randomness_power,
            max.randomness_power,
            step.randomness_power,
            "Randomness Power",
        ));
        color_row(ui, &mut params.inside_color, "Inside Color");
        color_row(ui, &mut params.outside_color, "Outside Color");
    });
    ui.separator();
}

fn ui_system(mut contexts: EguiContexts, mut galaxies: Query<(&mut Galaxy, &mut GalaxyDraft)>) {
    let ctx = contexts.ctx_mut();

    egui::SidePanel::left("side_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Galaxies");
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut rows: Vec<_> = galaxies.iter_mut().collect();
                rows.sort_by_key(|(galaxy, _)| galaxy.id);
                for (galaxy, mut draft) in rows {
                    galaxy_params_ui(galaxy.id, &mut draft.0, ui);
                }
            });
        });

    let interacting = ctx.is_using_pointer() || ctx.wants_keyboard_input();
    for (mut galaxy, draft) in &mut galaxies {
        if let Some(params) = commit_draft(&galaxy.params, &draft.0, interacting) {
            debug!("Galaxy {}: committing edited parameters", galaxy.id);
            galaxy.params = params;
        }
    }
}
