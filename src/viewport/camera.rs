use crate::push_pull::view::{CameraState, ViewKind};
use crate::scene::Scene;
use crate::viewport::preview::PreviewCamera;
use crate::viewport::{DEFAULT_CAMERA_PITCH_DEG, DEFAULT_CAMERA_YAW_DEG};
use bevy::camera::{ScalingMode, Viewport};
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, Window};

#[derive(Resource)]
pub struct OrbitCameraState {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub view: ViewKind,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 0.0, 0.5),
            distance: 9.0,
            yaw: DEFAULT_CAMERA_YAW_DEG.to_radians(),
            pitch: DEFAULT_CAMERA_PITCH_DEG.to_radians(),
            min_distance: 0.5,
            max_distance: 80.0,
            view: ViewKind::Perspective,
        }
    }
}

impl OrbitCameraState {
    /// Unit vector from the eye towards the target, Z up.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_yaw * cos_pitch, sin_pitch).normalize_or_zero()
    }

    pub fn eye(&self) -> Vec3 {
        self.target - self.forward() * self.distance
    }
}

#[derive(Resource, Default)]
pub struct UiInteractionState {
    pub wants_pointer_input: bool,
    pub wants_keyboard_input: bool,
    pub side_panel_width: f32,
}

#[derive(Resource, Default)]
pub struct MouseCaptureState {
    pub active: bool,
    pub restore_position: Option<Vec2>,
}

/// Physical position and size of the 3D viewport right of the side panel.
pub fn viewport_beside_panel(
    window_size: UVec2,
    panel_width: f32,
    scale_factor: f32,
) -> Option<(UVec2, UVec2)> {
    if window_size.x == 0 {
        return None;
    }
    let panel_px = (panel_width.max(0.0) * scale_factor) as u32;
    let left = panel_px.min(window_size.x - 1);
    let size = UVec2::new(window_size.x - left, window_size.y.max(1));
    Some((UVec2::new(left, 0), size))
}

pub fn update_camera_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut cameras: Query<&mut Camera, With<PreviewCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some((physical_position, physical_size)) = viewport_beside_panel(
        window.physical_size(),
        ui_state.side_panel_width,
        window.scale_factor(),
    ) else {
        return;
    };

    for mut camera in &mut cameras {
        camera.viewport = Some(Viewport {
            physical_position,
            physical_size,
            depth: 0.0..1.0,
        });
    }
}

pub fn orbit_camera_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut orbit: ResMut<OrbitCameraState>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<PreviewCamera>>,
) {
    let mouse_delta = Vec2::new(mouse_motion.delta.x, -mouse_motion.delta.y);
    let scroll_delta = mouse_scroll.delta.y;

    let pointer_in_window = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some();
    let can_capture_mouse = pointer_in_window && !ui_state.wants_pointer_input;

    if can_capture_mouse {
        if mouse_buttons.pressed(MouseButton::Right) && mouse_delta.length_squared() > 0.0 {
            orbit.yaw -= mouse_delta.x * 0.006;
            orbit.pitch = (orbit.pitch + mouse_delta.y * 0.006).clamp(-1.45, 1.45);
        }

        if mouse_buttons.pressed(MouseButton::Middle) && mouse_delta.length_squared() > 0.0 {
            let forward = orbit.forward();
            let mut right = forward.cross(Vec3::Z);
            if right.length_squared() < 1e-6 {
                right = Vec3::X;
            }
            right = right.normalize();
            let up = right.cross(forward).normalize_or_zero();

            let pan_scale = orbit.distance * 0.0018;
            orbit.target += (-mouse_delta.x * right + mouse_delta.y * up) * pan_scale;
        }

        if scroll_delta.abs() > f32::EPSILON {
            let zoom_factor = (1.0 - scroll_delta * 0.10).clamp(0.2, 5.0);
            orbit.distance =
                (orbit.distance * zoom_factor).clamp(orbit.min_distance, orbit.max_distance);
        }
    }

    let camera_position = orbit.eye();

    for (mut transform, mut projection) in &mut camera_query {
        *transform = Transform::from_translation(camera_position).looking_at(orbit.target, Vec3::Z);
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scaling_mode = ScalingMode::FixedVertical {
                viewport_height: orbit.distance,
            };
        }
    }
}

pub fn toggle_projection_system(
    keys: Res<ButtonInput<KeyCode>>,
    ui_state: Res<UiInteractionState>,
    mut orbit: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Projection, With<PreviewCamera>>,
) {
    if ui_state.wants_keyboard_input || !keys.just_pressed(KeyCode::KeyO) {
        return;
    }

    orbit.view = match orbit.view {
        ViewKind::Perspective => ViewKind::Orthographic,
        ViewKind::Orthographic => ViewKind::Perspective,
    };

    for mut projection in &mut camera_query {
        *projection = projection_for(orbit.view, orbit.distance);
    }
    info!("Viewport projection: {}", orbit.view.label());
}

fn projection_for(view: ViewKind, distance: f32) -> Projection {
    match view {
        ViewKind::Perspective => Projection::Perspective(PerspectiveProjection::default()),
        ViewKind::Orthographic => Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: distance,
            },
            ..OrthographicProjection::default_3d()
        }),
    }
}

/// Hands the focused viewport camera to the scene. Focus means the pointer
/// is inside the 3D viewport and not over the side panel.
pub fn publish_viewport_camera(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    orbit: Res<OrbitCameraState>,
    camera_query: Query<&Transform, With<PreviewCamera>>,
    mut scene: ResMut<Scene>,
) {
    let pointer_in_viewport = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some_and(|pos| pos.x > ui_state.side_panel_width);
    let focused = pointer_in_viewport && !ui_state.wants_pointer_input;

    let camera = camera_query
        .single()
        .ok()
        .filter(|_| focused)
        .map(|transform| CameraState {
            projection: orbit.view,
            transform: *transform,
        });
    scene.set_viewport_camera(camera);
}

/// Hides and locks the cursor while RMB/MMB orbit or pan, then puts it back
/// where the drag started.
pub fn sync_mouse_capture(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    ui_state: Res<UiInteractionState>,
    mut capture: ResMut<MouseCaptureState>,
    mut windows: Query<(&mut Window, &mut CursorOptions), With<PrimaryWindow>>,
) {
    let Ok((mut window, mut cursor)) = windows.single_mut() else {
        return;
    };

    let navigating = mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]);
    let wanted = navigating
        && window.focused
        && window.cursor_position().is_some()
        && !ui_state.wants_pointer_input;

    match (wanted, capture.active) {
        (true, false) => {
            capture.restore_position = window.cursor_position();
            capture.active = true;
        }
        (false, true) => {
            if let Some(pos) = capture.restore_position.take() {
                window.set_cursor_position(Some(pos));
            }
            capture.active = false;
        }
        _ => {}
    }

    cursor.visible = !capture.active;
    cursor.grab_mode = if capture.active {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_is_unit_and_pitched_down_by_default() {
        let orbit = OrbitCameraState::default();
        let forward = orbit.forward();
        assert_relative_eq!(forward.length(), 1.0, epsilon = 1e-5);
        assert!(forward.z < 0.0);
    }

    #[test]
    fn orthographic_projection_tracks_orbit_distance() {
        match projection_for(ViewKind::Orthographic, 7.5) {
            Projection::Orthographic(ortho) => assert!(matches!(
                ortho.scaling_mode,
                ScalingMode::FixedVertical { viewport_height } if viewport_height == 7.5
            )),
            _ => panic!("expected an orthographic projection"),
        }
        assert!(matches!(
            projection_for(ViewKind::Perspective, 7.5),
            Projection::Perspective(_)
        ));
    }

    #[test]
    fn eye_sits_distance_behind_target() {
        let orbit = OrbitCameraState::default();
        assert_relative_eq!(orbit.eye().distance(orbit.target), orbit.distance, epsilon = 1e-4);
    }

    #[test]
    fn viewport_starts_after_the_scaled_panel() {
        let (position, size) = viewport_beside_panel(UVec2::new(1000, 600), 300.0, 2.0).unwrap();
        assert_eq!(position, UVec2::new(600, 0));
        assert_eq!(size, UVec2::new(400, 600));

        let (position, size) = viewport_beside_panel(UVec2::new(100, 0), 500.0, 1.0).unwrap();
        assert_eq!(position.x, 99);
        assert_eq!(size, UVec2::new(1, 1));

        assert!(viewport_beside_panel(UVec2::new(0, 600), 0.0, 1.0).is_none());
    }
}
