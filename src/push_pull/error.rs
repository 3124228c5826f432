use crate::push_pull::selection::Element;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("unknown object '{0}'")]
    UnknownObject(String),
    #[error("object '{object}' has no vertex {index}")]
    VertexOutOfRange { object: String, index: u32 },
    #[error("object '{0}' has no mesh")]
    NoMesh(String),
    #[error("'{0}' is not a transform")]
    NotTransform(String),
    #[error("object '{0}' has a zero-scale transform")]
    DegenerateTransform(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PushPullError {
    #[error("no 3D viewport has focus")]
    NoViewport,
    #[error("nothing is selected")]
    EmptySelection,
    #[error("selection contains nothing that can be moved")]
    NothingMovable,
    #[error("no world position for {0}")]
    MissingPosition(Element),
    #[error("no local scale for '{0}'")]
    MissingScale(String),
    #[error("could not compute a bounding box for the selection")]
    NoBounds,
    #[error(transparent)]
    Host(#[from] HostError),
}
