use crate::push_pull::error::HostError;
use crate::push_pull::selection::{Element, SelectionItem};
use crate::push_pull::view::CameraState;
use bevy::prelude::Vec3;

/// Axis-aligned world-space box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Everything the push/pull tool needs from the application hosting it.
///
/// Object and component names are the host's own; the tool only passes them
/// back. Positions are world space, scales are local.
pub trait SceneHost {
    fn current_tool(&self) -> String;
    fn set_tool(&mut self, tool: &str);

    /// Camera of the viewport that has focus, `None` if focus is elsewhere.
    fn viewport_camera(&self) -> Option<CameraState>;

    fn selection(&self) -> Vec<SelectionItem>;
    fn is_transform(&self, object: &str) -> bool;
    /// Vertex indices an item converts to. A whole object gives all of its
    /// vertices; objects without geometry give none.
    fn component_vertices(&self, item: &SelectionItem) -> Vec<u32>;

    fn world_position(&self, element: &Element) -> Option<Vec3>;
    /// Bounds of the visible geometry of `elements`.
    fn world_bounds(&self, elements: &[Element]) -> Option<WorldBounds>;
    fn local_scale(&self, object: &str) -> Option<Vec3>;

    fn set_world_position(&mut self, element: &Element, position: Vec3) -> Result<(), HostError>;
    fn set_local_scale(&mut self, object: &str, scale: Vec3) -> Result<(), HostError>;

    fn open_undo_chunk(&mut self);
    fn close_undo_chunk(&mut self);

    fn refresh(&mut self) {}
}
