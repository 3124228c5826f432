use bevy::prelude::{Transform, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    Perspective,
    Orthographic,
}

impl ViewKind {
    pub fn classify(camera: &CameraState) -> Self {
        camera.projection
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Perspective => "Perspective",
            Self::Orthographic => "Orthographic",
        }
    }
}

/// Snapshot of the focused viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub projection: ViewKind,
    pub transform: Transform,
}

impl CameraState {
    pub fn perspective(transform: Transform) -> Self {
        Self {
            projection: ViewKind::Perspective,
            transform,
        }
    }

    pub fn orthographic(transform: Transform) -> Self {
        Self {
            projection: ViewKind::Orthographic,
            transform,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// The camera looks down its local -Z axis.
    pub fn view_direction(&self) -> Vec3 {
        (self.transform.rotation * -Vec3::Z).normalize_or_zero()
    }
}
