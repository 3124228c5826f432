use crate::push_pull::selection::{SelectionParseError, expand_selection_path};
use crate::push_pull::view::{CameraState, ViewKind};
use crate::scene::Scene;
use crate::scene::mesh::EditMesh;
use bevy::prelude::{EulerRot, Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCENE_PATH: &str = "config/scene.ron";

#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("bad selection entry: {0}")]
    Selection(#[from] SelectionParseError),
    #[error("scene has no objects")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeEntry {
    Empty,
    Cube { size: f32 },
    Grid { size: f32, cells: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectEntry {
    pub name: String,
    pub translation: [f32; 3],
    /// XYZ euler angles in degrees.
    pub rotation_deg: [f32; 3],
    pub scale: [f32; 3],
    pub shape: ShapeEntry,
    pub is_transform: bool,
}

impl Default for ObjectEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: [1.0; 3],
            shape: ShapeEntry::Cube { size: 1.0 },
            is_transform: true,
        }
    }
}

impl ObjectEntry {
    fn transform(&self) -> Transform {
        let [rx, ry, rz] = self.rotation_deg.map(f32::to_radians);
        Transform::from_translation(Vec3::from_array(self.translation))
            .with_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz))
            .with_scale(Vec3::from_array(self.scale))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraEntry {
    pub projection: ViewKind,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
}

fn default_up() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

impl CameraEntry {
    pub fn to_state(&self) -> CameraState {
        let transform = Transform::from_translation(Vec3::from_array(self.position))
            .looking_at(Vec3::from_array(self.look_at), Vec3::from_array(self.up));
        CameraState {
            projection: self.projection,
            transform,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub tool: Option<String>,
    pub objects: Vec<ObjectEntry>,
    /// Selection paths such as `"crate.f[0:1]"`.
    pub selection: Vec<String>,
    pub camera: Option<CameraEntry>,
}

impl SceneFile {
    pub fn from_ron(text: &str, path: &Path) -> Result<Self, SceneFileError> {
        ron::de::from_str::<Self>(text).map_err(|source| SceneFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SceneFileError> {
        let text = fs::read_to_string(path).map_err(|source| SceneFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text, path)
    }

    pub fn into_scene(self) -> Result<Scene, SceneFileError> {
        if self.objects.is_empty() {
            return Err(SceneFileError::Empty);
        }

        let mut scene = Scene::default();
        for entry in &self.objects {
            if !entry.is_transform {
                scene.add_non_transform(&entry.name);
                continue;
            }
            match entry.shape {
                ShapeEntry::Empty => scene.add_object(&entry.name, entry.transform()),
                ShapeEntry::Cube { size } => {
                    scene.add_mesh_object(&entry.name, entry.transform(), EditMesh::cube(size))
                }
                ShapeEntry::Grid { size, cells } => scene.add_mesh_object(
                    &entry.name,
                    entry.transform(),
                    EditMesh::grid(size, cells),
                ),
            }
        }

        let mut selection = Vec::new();
        for path in &self.selection {
            selection.extend(expand_selection_path(path)?);
        }
        scene.set_selection(selection);

        if let Some(tool) = self.tool {
            scene.tool = tool;
        }
        scene.set_viewport_camera(self.camera.as_ref().map(CameraEntry::to_state));
        Ok(scene)
    }
}

/// Small scene used when no scene file is available.
pub fn demo_scene_file() -> SceneFile {
    SceneFile {
        tool: None,
        objects: vec![
            ObjectEntry {
                name: "floor_tile".to_string(),
                translation: [0.0, 0.0, 0.0],
                shape: ShapeEntry::Grid {
                    size: 6.0,
                    cells: 3,
                },
                ..ObjectEntry::default()
            },
            ObjectEntry {
                name: "crate_a".to_string(),
                translation: [-1.5, 0.0, 0.5],
                ..ObjectEntry::default()
            },
            ObjectEntry {
                name: "crate_b".to_string(),
                translation: [1.5, 1.0, 0.75],
                rotation_deg: [0.0, 0.0, 30.0],
                shape: ShapeEntry::Cube { size: 1.5 },
                ..ObjectEntry::default()
            },
            ObjectEntry {
                name: "pillar".to_string(),
                translation: [0.0, 2.5, 1.5],
                scale: [0.5, 0.5, 3.0],
                ..ObjectEntry::default()
            },
        ],
        selection: vec!["crate_a".to_string()],
        camera: Some(CameraEntry {
            projection: ViewKind::Perspective,
            position: [8.0, -8.0, 6.0],
            look_at: [0.0, 0.0, 0.5],
            up: default_up(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push_pull::host::SceneHost;
    use crate::push_pull::selection::SelectionItem;

    const SCENE: &str = r#"(
        tool: Some("move"),
        objects: [
            (name: "box", translation: (1.0, 2.0, 3.0)),
            (name: "tile", shape: Grid(size: 2.0, cells: 2)),
            (name: "lambert1", is_transform: false),
        ],
        selection: ["box.f[0:1]", "tile"],
        camera: Some((projection: Orthographic, position: (0.0, -10.0, 0.0), look_at: (0.0, 0.0, 0.0))),
    )"#;

    #[test]
    fn parses_scene_with_defaults() {
        let scene = SceneFile::from_ron(SCENE, Path::new("scene.ron"))
            .unwrap()
            .into_scene()
            .unwrap();

        assert_eq!(scene.tool(), "move");
        assert_eq!(scene.objects().len(), 3);
        assert_eq!(
            scene.object("box").unwrap().transform.translation,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert!(!scene.is_transform("lambert1"));
        assert_eq!(scene.selected().len(), 3);
        assert_eq!(
            scene.selected()[1],
            SelectionItem::Face {
                object: "box".into(),
                index: 1
            }
        );
        let camera = scene.viewport_camera().unwrap();
        assert_eq!(camera.projection, ViewKind::Orthographic);
    }

    #[test]
    fn empty_scene_is_rejected() {
        let err = SceneFile::default().into_scene().unwrap_err();
        assert!(matches!(err, SceneFileError::Empty));
    }

    #[test]
    fn bad_selection_path_is_reported() {
        let mut file = demo_scene_file();
        file.selection = vec!["crate_a.q[1]".to_string()];
        assert!(matches!(
            file.into_scene(),
            Err(SceneFileError::Selection(_))
        ));
    }

    #[test]
    fn demo_scene_builds() {
        let scene = demo_scene_file().into_scene().unwrap();
        assert_eq!(scene.objects().len(), 4);
        assert_eq!(scene.selected(), &[SelectionItem::Object("crate_a".into())]);
    }
}
