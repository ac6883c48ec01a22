use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;
use std::f32::consts::FRAC_PI_2;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

/// Share of the pending rotation and zoom applied each frame.
const DAMPING_FACTOR: f32 = 0.005;
const ROTATE_SPEED: f32 = 0.01;
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);
    let orbit = CameraOrbit::default();
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Orbit controls around `target`, with damped rotation and smoothed zoom.
#[derive(Component, Clone, Debug)]
pub struct CameraOrbit {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    smooth_zoom_buffer: f32,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 6.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }
}

/// Camera position for the given angles, relative to the orbit target.
/// Yaw 0 and pitch 0 look down -Z from +Z.
pub fn orbit_translation(yaw: f32, pitch: f32, distance: f32) -> Vec3 {
    Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        pitch.cos() * yaw.cos(),
    ) * distance
}

impl CameraOrbit {
    fn translation(&self) -> Vec3 {
        self.target + orbit_translation(self.yaw, self.pitch, self.distance)
    }

    fn rotate(&mut self, drag: Vec2) {
        self.pending_yaw -= drag.x * ROTATE_SPEED;
        self.pending_pitch += drag.y * ROTATE_SPEED;
    }

    fn zoom(&mut self, amount: f32) {
        self.smooth_zoom_buffer += amount;
    }

    /// Moves a slice of the pending input into the actual orbit.
    fn step(&mut self) {
        self.yaw += self.pending_yaw * DAMPING_FACTOR;
        self.pitch = (self.pitch + self.pending_pitch * DAMPING_FACTOR).clamp(-MAX_PITCH, MAX_PITCH);
        self.pending_yaw *= 1.0 - DAMPING_FACTOR;
        self.pending_pitch *= 1.0 - DAMPING_FACTOR;

        let smooth_zoom_amount = self.smooth_zoom_buffer * 0.2;
        self.distance = (self.distance * (1.0 - smooth_zoom_amount)).clamp(0.5, 50.0);
        self.smooth_zoom_buffer -= smooth_zoom_amount;
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut CameraOrbit)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    // the panel keeps the mouse while it is hovered or dragged
    let ctx = contexts.ctx_mut();
    let pointer_free = !(ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    if pointer_free && mouse_buttons.pressed(MouseButton::Left) {
        orbit.rotate(drag);
    }

    for ev in scroll_evr.read() {
        if !pointer_free {
            continue;
        }
        match ev.unit {
            MouseScrollUnit::Line => orbit.zoom(ev.y * 0.05),
            MouseScrollUnit::Pixel => orbit.zoom(ev.y * 0.005),
        }
    }

    orbit.step();
    transform.translation = orbit.translation();
    transform.look_at(orbit.target, Vec3::Y);
}
