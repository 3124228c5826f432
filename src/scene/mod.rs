//! In-memory scene that hosts the push/pull tool for the viewport and the
//! replay binary. Objects are flat (no parenting), so local and world
//! transforms coincide.

pub mod file;
pub mod mesh;
pub mod undo;

use crate::push_pull::error::HostError;
use crate::push_pull::host::{SceneHost, WorldBounds};
use crate::push_pull::selection::{Element, SelectionItem};
use crate::push_pull::view::CameraState;
use bevy::prelude::{Resource, Transform, Vec3};
use mesh::EditMesh;
use std::collections::HashSet;
use tracing::warn;
use undo::{UndoEntry, UndoJournal};

/// Below this the object transform cannot map world positions back into
/// mesh space.
const MIN_TRANSFORM_DETERMINANT: f32 = 1e-12;

pub const DEFAULT_TOOL: &str = "select";

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<EditMesh>,
    /// Non-transform nodes (materials, sets) can be selected but not moved.
    pub is_transform: bool,
}

impl SceneObject {
    pub fn vertex_world(&self, index: u32) -> Option<Vec3> {
        let local = self.mesh.as_ref()?.positions.get(index as usize)?;
        Some(self.transform.transform_point(*local))
    }

    fn world_points(&self) -> Vec<Vec3> {
        match &self.mesh {
            Some(mesh) if !mesh.positions.is_empty() => mesh
                .positions
                .iter()
                .map(|p| self.transform.transform_point(*p))
                .collect(),
            _ => vec![self.transform.translation],
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    tool: String,
    selection: Vec<SelectionItem>,
    camera: Option<CameraState>,
    journal: UndoJournal,
    dirty_meshes: HashSet<String>,
    refreshes: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            tool: DEFAULT_TOOL.to_string(),
            selection: Vec::new(),
            camera: None,
            journal: UndoJournal::default(),
            dirty_meshes: HashSet::new(),
            refreshes: 0,
        }
    }
}

impl Scene {
    fn insert(&mut self, object: SceneObject) {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.name == object.name) {
            *existing = object;
        } else {
            self.objects.push(object);
        }
    }

    pub fn add_object(&mut self, name: &str, transform: Transform) {
        self.insert(SceneObject {
            name: name.to_string(),
            transform,
            mesh: None,
            is_transform: true,
        });
    }

    pub fn add_mesh_object(&mut self, name: &str, transform: Transform, mesh: EditMesh) {
        self.insert(SceneObject {
            name: name.to_string(),
            transform,
            mesh: Some(mesh),
            is_transform: true,
        });
        self.dirty_meshes.insert(name.to_string());
    }

    pub fn add_non_transform(&mut self, name: &str) {
        self.insert(SceneObject {
            name: name.to_string(),
            transform: Transform::default(),
            mesh: None,
            is_transform: false,
        });
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut SceneObject, HostError> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| HostError::UnknownObject(name.to_string()))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn selected(&self) -> &[SelectionItem] {
        &self.selection
    }

    pub fn is_selected(&self, item: &SelectionItem) -> bool {
        self.selection.contains(item)
    }

    pub fn set_selection(&mut self, selection: Vec<SelectionItem>) {
        self.selection = selection;
    }

    /// Adds or removes one item, keeping selection order otherwise intact.
    pub fn toggle_selected(&mut self, item: SelectionItem) {
        if let Some(pos) = self.selection.iter().position(|s| *s == item) {
            self.selection.remove(pos);
        } else {
            self.selection.push(item);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_viewport_camera(&mut self, camera: Option<CameraState>) {
        self.camera = camera;
    }

    pub fn undo_depth(&self) -> usize {
        self.journal.len()
    }

    /// Number of `refresh` calls, i.e. applied drag frames.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub fn take_dirty_meshes(&mut self) -> Vec<String> {
        self.dirty_meshes.drain().collect()
    }

    /// Reverts the newest undo chunk. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(entries) = self.journal.pop() else {
            return false;
        };
        for entry in entries {
            if let Err(err) = self.restore(entry) {
                warn!("undo skipped an entry: {err}");
            }
        }
        true
    }

    fn restore(&mut self, entry: UndoEntry) -> Result<(), HostError> {
        match entry {
            UndoEntry::Position {
                element: Element::Object(name),
                previous,
            } => self.object_mut(&name)?.transform.translation = previous,
            UndoEntry::Position {
                element: Element::Vertex { object, index },
                previous,
            } => {
                *self.local_vertex_mut(&object, index)? = previous;
                self.dirty_meshes.insert(object);
            }
            UndoEntry::Scale { object, previous } => {
                self.object_mut(&object)?.transform.scale = previous
            }
        }
        Ok(())
    }

    fn local_vertex_mut(&mut self, object: &str, index: u32) -> Result<&mut Vec3, HostError> {
        let target = self.object_mut(object)?;
        let mesh = target
            .mesh
            .as_mut()
            .ok_or_else(|| HostError::NoMesh(object.to_string()))?;
        mesh.positions
            .get_mut(index as usize)
            .ok_or_else(|| HostError::VertexOutOfRange {
                object: object.to_string(),
                index,
            })
    }

    fn transform_mut(&mut self, object: &str) -> Result<&mut Transform, HostError> {
        let target = self.object_mut(object)?;
        if !target.is_transform {
            return Err(HostError::NotTransform(object.to_string()));
        }
        Ok(&mut target.transform)
    }
}

impl SceneHost for Scene {
    fn current_tool(&self) -> String {
        self.tool.clone()
    }

    fn set_tool(&mut self, tool: &str) {
        self.tool = tool.to_string();
    }

    fn viewport_camera(&self) -> Option<CameraState> {
        self.camera
    }

    fn selection(&self) -> Vec<SelectionItem> {
        self.selection.clone()
    }

    fn is_transform(&self, object: &str) -> bool {
        self.object(object).is_some_and(|o| o.is_transform)
    }

    fn component_vertices(&self, item: &SelectionItem) -> Vec<u32> {
        let Some(mesh) = self.object(item.object()).and_then(|o| o.mesh.as_ref()) else {
            return Vec::new();
        };
        match item {
            SelectionItem::Edge { index, .. } => mesh
                .edge_vertices(*index)
                .map(|edge| edge.to_vec())
                .unwrap_or_default(),
            SelectionItem::Face { index, .. } => mesh
                .face_vertices(*index)
                .map(<[u32]>::to_vec)
                .unwrap_or_default(),
            SelectionItem::Object(_) => (0..mesh.vertex_count() as u32).collect(),
            SelectionItem::Vertex { index, .. } => {
                if (*index as usize) < mesh.vertex_count() {
                    vec![*index]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn world_position(&self, element: &Element) -> Option<Vec3> {
        match element {
            Element::Object(name) => self.object(name).map(|o| o.transform.translation),
            Element::Vertex { object, index } => self.object(object)?.vertex_world(*index),
        }
    }

    fn world_bounds(&self, elements: &[Element]) -> Option<WorldBounds> {
        let mut points = Vec::new();
        for element in elements {
            match element {
                Element::Object(name) => points.extend(self.object(name)?.world_points()),
                Element::Vertex { .. } => points.push(self.world_position(element)?),
            }
        }
        WorldBounds::from_points(points)
    }

    fn local_scale(&self, object: &str) -> Option<Vec3> {
        self.object(object)
            .filter(|o| o.is_transform)
            .map(|o| o.transform.scale)
    }

    fn set_world_position(&mut self, element: &Element, position: Vec3) -> Result<(), HostError> {
        match element {
            Element::Object(name) => {
                let transform = self.transform_mut(name)?;
                let previous = transform.translation;
                transform.translation = position;
                self.journal.record(UndoEntry::Position {
                    element: element.clone(),
                    previous,
                });
            }
            Element::Vertex { object, index } => {
                let affine = self.object_mut(object)?.transform.compute_affine();
                if affine.matrix3.determinant().abs() < MIN_TRANSFORM_DETERMINANT {
                    return Err(HostError::DegenerateTransform(object.clone()));
                }
                let local = affine.inverse().transform_point3(position);
                let vertex = self.local_vertex_mut(object, *index)?;
                let previous = *vertex;
                *vertex = local;
                self.journal.record(UndoEntry::Position {
                    element: element.clone(),
                    previous,
                });
                self.dirty_meshes.insert(object.clone());
            }
        }
        Ok(())
    }

    fn set_local_scale(&mut self, object: &str, scale: Vec3) -> Result<(), HostError> {
        let transform = self.transform_mut(object)?;
        let previous = transform.scale;
        transform.scale = scale;
        self.journal.record(UndoEntry::Scale {
            object: object.to_string(),
            previous,
        });
        Ok(())
    }

    fn open_undo_chunk(&mut self) {
        self.journal.open();
    }

    fn close_undo_chunk(&mut self) {
        self.journal.close();
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}
