use crate::push_pull::host::SceneHost;
use crate::push_pull::selection::{Element, SelectionItem};
use crate::scene::Scene;
use crate::viewport::{GRID_EXTENT_METERS, GRID_MAJOR_STEP_METERS};
use bevy::camera::ClearColorConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy_egui::PrimaryEguiContext;

#[derive(Component)]
pub struct PreviewCamera;

/// Links a rendered entity to the scene object it mirrors.
#[derive(Component)]
pub struct SceneObjectLink {
    pub name: String,
    pub mesh: Option<Handle<Mesh>>,
}

pub fn setup_preview_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut scene: ResMut<Scene>,
) {
    commands.spawn((Camera3d::default(), Transform::default(), PreviewCamera));
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(31),
        PrimaryEguiContext,
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.95, 0.84),
            shadows_enabled: true,
            illuminance: 14_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, -5.0, 7.0).looking_at(Vec3::new(0.0, 0.0, 0.45), Vec3::Z),
    ));

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.62, 0.58, 0.52),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    for object in scene.objects() {
        if !object.is_transform {
            continue;
        }
        let Some(edit_mesh) = &object.mesh else {
            commands.spawn((
                object.transform,
                SceneObjectLink {
                    name: object.name.clone(),
                    mesh: None,
                },
            ));
            continue;
        };

        let handle = meshes.add(edit_mesh.to_render_mesh());
        commands.spawn((
            Mesh3d(handle.clone()),
            MeshMaterial3d(material.clone()),
            object.transform,
            SceneObjectLink {
                name: object.name.clone(),
                mesh: Some(handle),
            },
        ));
    }

    // Meshes were just built from current positions.
    scene.take_dirty_meshes();
}

/// Copies scene transforms onto entities and rebuilds edited meshes.
pub fn sync_scene_entities(
    mut scene: ResMut<Scene>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut links: Query<(&SceneObjectLink, &mut Transform)>,
) {
    let dirty = scene.take_dirty_meshes();

    for (link, mut transform) in &mut links {
        let Some(object) = scene.object(&link.name) else {
            continue;
        };
        if *transform != object.transform {
            *transform = object.transform;
        }

        if !dirty.contains(&link.name) {
            continue;
        }
        if let (Some(handle), Some(edit_mesh)) = (&link.mesh, &object.mesh) {
            if let Some(mesh) = meshes.get_mut(handle) {
                *mesh = edit_mesh.to_render_mesh();
            }
        }
    }
}

pub fn draw_selection_system(mut gizmos: Gizmos, scene: Res<Scene>) {
    let object_color = Color::srgb(0.95, 0.75, 0.2);
    let vertex_color = Color::srgb(0.2, 0.85, 0.95);

    for item in scene.selected() {
        match item {
            SelectionItem::Object(name) => {
                let Some(bounds) = scene.world_bounds(&[Element::Object(name.clone())]) else {
                    continue;
                };
                let size = (bounds.max - bounds.min).max(Vec3::splat(0.05));
                gizmos.cube(
                    Transform::from_translation(bounds.center()).with_scale(size * 1.02),
                    object_color,
                );
            }
            SelectionItem::Vertex { object, index } => {
                draw_vertex_marker(&mut gizmos, &scene, object, *index, vertex_color);
            }
            SelectionItem::Edge { object, .. } | SelectionItem::Face { object, .. } => {
                for index in scene.component_vertices(item) {
                    draw_vertex_marker(&mut gizmos, &scene, object, index, vertex_color);
                }
            }
        }
    }

    for object in scene.objects() {
        if object.is_transform && object.mesh.is_none() {
            let origin = object.transform.translation;
            gizmos.line(origin, origin + Vec3::X * 0.4, Color::srgb(0.85, 0.25, 0.25));
            gizmos.line(origin, origin + Vec3::Y * 0.4, Color::srgb(0.25, 0.85, 0.25));
            gizmos.line(origin, origin + Vec3::Z * 0.4, Color::srgb(0.25, 0.45, 0.9));
        }
    }
}

fn draw_vertex_marker(gizmos: &mut Gizmos, scene: &Scene, object: &str, index: u32, color: Color) {
    let element = Element::Vertex {
        object: object.to_string(),
        index,
    };
    let Some(position) = scene.world_position(&element) else {
        return;
    };
    let r = 0.06;
    gizmos.line(position - Vec3::X * r, position + Vec3::X * r, color);
    gizmos.line(position - Vec3::Y * r, position + Vec3::Y * r, color);
    gizmos.line(position - Vec3::Z * r, position + Vec3::Z * r, color);
}

pub fn draw_grid_system(mut gizmos: Gizmos) {
    let extent = GRID_EXTENT_METERS as f32;
    let z = -0.001;

    for i in -GRID_EXTENT_METERS..=GRID_EXTENT_METERS {
        let f = i as f32;
        let is_major = i % GRID_MAJOR_STEP_METERS == 0;
        let color = if is_major {
            Color::srgba(0.55, 0.55, 0.55, 0.55)
        } else {
            Color::srgba(0.32, 0.32, 0.32, 0.35)
        };

        gizmos.line(Vec3::new(-extent, f, z), Vec3::new(extent, f, z), color);
        gizmos.line(Vec3::new(f, -extent, z), Vec3::new(f, extent, z), color);
    }

    gizmos.line(
        Vec3::new(-extent, 0.0, z + 0.0005),
        Vec3::new(extent, 0.0, z + 0.0005),
        Color::srgb(0.85, 0.25, 0.25),
    );
    gizmos.line(
        Vec3::new(0.0, -extent, z + 0.0005),
        Vec3::new(0.0, extent, z + 0.0005),
        Color::srgb(0.25, 0.85, 0.25),
    );
}
