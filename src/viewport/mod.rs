pub mod camera;
pub mod input;
pub mod keys;
pub mod preview;
pub mod ui;

use crate::push_pull::SETTINGS_PATH;
use crate::push_pull::activation::PushPullTool;
use crate::push_pull::settings::load_or_default;
use crate::scene::Scene;
use crate::scene::file::{SCENE_PATH, SceneFile, demo_scene_file};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use camera::{
    MouseCaptureState, OrbitCameraState, UiInteractionState, orbit_camera_system,
    publish_viewport_camera, sync_mouse_capture, toggle_projection_system, update_camera_viewport,
};
use input::{PushPullBindings, ToolStatus, push_pull_input_system};
use preview::{draw_grid_system, draw_selection_system, setup_preview_scene, sync_scene_entities};
use std::path::Path;
use ui::ui_system;

pub const GRID_EXTENT_METERS: i32 = 20;
pub const GRID_MAJOR_STEP_METERS: i32 = 5;
pub const DEFAULT_CAMERA_YAW_DEG: f32 = 45.0;
pub const DEFAULT_CAMERA_PITCH_DEG: f32 = -30.0;

/// Scene from `config/scene.ron`, or the built-in demo scene.
pub fn load_initial_scene() -> Scene {
    let path = Path::new(SCENE_PATH);
    if path.exists() {
        match SceneFile::load(path).and_then(SceneFile::into_scene) {
            Ok(scene) => return scene,
            Err(err) => warn!("Falling back to demo scene: {err}"),
        }
    }
    // The demo file is static and always has objects.
    demo_scene_file().into_scene().unwrap_or_default()
}

pub fn run() {
    let settings = load_or_default(Path::new(SETTINGS_PATH));
    let bindings = PushPullBindings::from_settings(&settings);

    App::new()
        .insert_resource(load_initial_scene())
        .insert_resource(PushPullTool::new(settings))
        .insert_resource(bindings)
        .insert_resource(ToolStatus::default())
        .insert_resource(OrbitCameraState::default())
        .insert_resource(UiInteractionState::default())
        .insert_resource(MouseCaptureState::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Push/Pull".to_string(),
                resolution: (1400, 900).into(),
                present_mode: PresentMode::AutoVsync,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, setup_preview_scene)
        .add_systems(
            Update,
            (
                update_camera_viewport,
                toggle_projection_system,
                orbit_camera_system,
                sync_mouse_capture,
                publish_viewport_camera,
                push_pull_input_system,
                sync_scene_entities,
            )
                .chain(),
        )
        .add_systems(Update, (draw_grid_system, draw_selection_system))
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();
}
