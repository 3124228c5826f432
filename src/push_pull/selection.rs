//! Selection items and the normalisation that turns a raw host selection into
//! the flat list of elements a drag moves.
//!
//! Text form follows the usual component path convention: `name` for a whole
//! object, `name.vtx[3]`, `name.e[3]` and `name.f[3]` for components. Ranges
//! such as `name.f[0:2]` are accepted by [`expand_selection_path`].

use crate::push_pull::error::PushPullError;
use crate::push_pull::host::SceneHost;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionItem {
    Object(String),
    Vertex { object: String, index: u32 },
    Edge { object: String, index: u32 },
    Face { object: String, index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Object(String),
    Vertex { object: String, index: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Object,
    Component,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSelection {
    pub mode: SelectionMode,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionParseError {
    #[error("empty selection path")]
    Empty,
    #[error("'{0}' has no object name")]
    MissingObject(String),
    #[error("unknown component kind '{kind}' in '{path}'")]
    UnknownComponent { path: String, kind: String },
    #[error("malformed component index in '{0}'")]
    BadIndex(String),
}

impl SelectionItem {
    pub fn object(&self) -> &str {
        match self {
            Self::Object(object)
            | Self::Vertex { object, .. }
            | Self::Edge { object, .. }
            | Self::Face { object, .. } => object,
        }
    }

    pub fn is_component(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    fn with_component(
        object: &str,
        kind: &str,
        index: u32,
        path: &str,
    ) -> Result<Self, SelectionParseError> {
        let object = object.to_string();
        match kind {
            "vtx" => Ok(Self::Vertex { object, index }),
            "e" => Ok(Self::Edge { object, index }),
            "f" => Ok(Self::Face { object, index }),
            _ => Err(SelectionParseError::UnknownComponent {
                path: path.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
}

impl fmt::Display for SelectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => write!(f, "{object}"),
            Self::Vertex { object, index } => write!(f, "{object}.vtx[{index}]"),
            Self::Edge { object, index } => write!(f, "{object}.e[{index}]"),
            Self::Face { object, index } => write!(f, "{object}.f[{index}]"),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => write!(f, "{object}"),
            Self::Vertex { object, index } => write!(f, "{object}.vtx[{index}]"),
        }
    }
}

impl FromStr for SelectionItem {
    type Err = SelectionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut items = expand_selection_path(raw)?;
        match items.len() {
            1 => Ok(items.remove(0)),
            _ => Err(SelectionParseError::BadIndex(raw.trim().to_string())),
        }
    }
}

/// Parses one selection path, expanding `[a:b]` ranges into single items.
pub fn expand_selection_path(raw: &str) -> Result<Vec<SelectionItem>, SelectionParseError> {
    let path = raw.trim();
    if path.is_empty() {
        return Err(SelectionParseError::Empty);
    }

    let Some((object, component)) = path.split_once('.') else {
        return Ok(vec![SelectionItem::Object(path.to_string())]);
    };
    if object.is_empty() {
        return Err(SelectionParseError::MissingObject(path.to_string()));
    }

    let Some((kind, rest)) = component.split_once('[') else {
        return Err(SelectionParseError::BadIndex(path.to_string()));
    };
    let Some(index_text) = rest.strip_suffix(']') else {
        return Err(SelectionParseError::BadIndex(path.to_string()));
    };

    let parse_index = |text: &str| {
        text.trim()
            .parse::<u32>()
            .map_err(|_| SelectionParseError::BadIndex(path.to_string()))
    };

    let (first, last) = match index_text.split_once(':') {
        Some((a, b)) => (parse_index(a)?, parse_index(b)?),
        None => {
            let index = parse_index(index_text)?;
            (index, index)
        }
    };
    if last < first {
        return Err(SelectionParseError::BadIndex(path.to_string()));
    }

    (first..=last)
        .map(|index| SelectionItem::with_component(object, kind, index, path))
        .collect()
}

pub fn selection_mode(raw: &[SelectionItem]) -> SelectionMode {
    if raw.iter().any(SelectionItem::is_component) {
        SelectionMode::Component
    } else {
        SelectionMode::Object
    }
}

/// Flattens a raw selection into movable elements.
///
/// If the selection holds any edge or face, every item (whole objects
/// included) is converted to vertices so that mixed selections move as one
/// vertex set. A vertex-only selection is kept as is, objects in it move as
/// objects.
pub fn normalize<H: SceneHost + ?Sized>(
    host: &H,
    raw: &[SelectionItem],
) -> Result<NormalizedSelection, PushPullError> {
    if raw.is_empty() {
        return Err(PushPullError::EmptySelection);
    }

    let mode = selection_mode(raw);
    let to_vertices = raw.iter().any(|item| {
        matches!(
            item,
            SelectionItem::Edge { .. } | SelectionItem::Face { .. }
        )
    });
    let mut seen = HashSet::new();
    let mut elements = Vec::new();
    let mut push = |element: Element| {
        if seen.insert(element.clone()) {
            elements.push(element);
        }
    };

    for item in raw {
        match item {
            SelectionItem::Vertex { object, index } => push(Element::Vertex {
                object: object.clone(),
                index: *index,
            }),
            SelectionItem::Object(object) if !to_vertices => {
                if host.is_transform(object) {
                    push(Element::Object(object.clone()));
                }
            }
            _ => {
                for index in host.component_vertices(item) {
                    push(Element::Vertex {
                        object: item.object().to_string(),
                        index,
                    });
                }
            }
        }
    }

    if elements.is_empty() {
        return Err(PushPullError::NothingMovable);
    }

    Ok(NormalizedSelection { mode, elements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::scene::mesh::EditMesh;
    use bevy::prelude::{Transform, Vec3};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn vertex(object: &str, index: u32) -> Element {
        Element::Vertex {
            object: object.to_string(),
            index,
        }
    }

    fn cube_scene() -> Scene {
        let mut scene = Scene::default();
        scene.add_mesh_object("box", Transform::default(), EditMesh::cube(1.0));
        scene.add_object("locator", Transform::from_translation(Vec3::X));
        scene.add_non_transform("lambert1");
        scene
    }

    #[rstest]
    #[case("box", SelectionItem::Object("box".into()))]
    #[case("box.vtx[3]", SelectionItem::Vertex { object: "box".into(), index: 3 })]
    #[case("box.e[11]", SelectionItem::Edge { object: "box".into(), index: 11 })]
    #[case(" |root|box.f[0] ", SelectionItem::Face { object: "|root|box".into(), index: 0 })]
    fn parses_selection_paths(#[case] raw: &str, #[case] expected: SelectionItem) {
        let parsed: SelectionItem = raw.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string().parse::<SelectionItem>().unwrap(), expected);
    }

    #[rstest]
    #[case("", SelectionParseError::Empty)]
    #[case(".f[1]", SelectionParseError::MissingObject(".f[1]".into()))]
    #[case("box.f[x]", SelectionParseError::BadIndex("box.f[x]".into()))]
    #[case("box.f[3:1]", SelectionParseError::BadIndex("box.f[3:1]".into()))]
    #[case("box.uv[1]", SelectionParseError::UnknownComponent { path: "box.uv[1]".into(), kind: "uv".into() })]
    fn rejects_malformed_paths(#[case] raw: &str, #[case] expected: SelectionParseError) {
        assert_eq!(expand_selection_path(raw).unwrap_err(), expected);
    }

    #[test]
    fn expands_index_ranges() {
        let items = expand_selection_path("box.vtx[2:4]").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[2],
            SelectionItem::Vertex {
                object: "box".into(),
                index: 4
            }
        );
        assert!("box.vtx[2:4]".parse::<SelectionItem>().is_err());
    }

    #[test]
    fn vertex_only_selection_is_kept_and_deduplicated() {
        let scene = cube_scene();
        let raw = vec![
            "box.vtx[5]".parse().unwrap(),
            "box.vtx[1]".parse().unwrap(),
            "box.vtx[5]".parse().unwrap(),
        ];
        let normalized = normalize(&scene, &raw).unwrap();
        assert_eq!(normalized.mode, SelectionMode::Component);
        assert_eq!(normalized.elements, vec![vertex("box", 5), vertex("box", 1)]);
    }

    #[test]
    fn mixed_vertex_and_face_selection_converts_everything_to_vertices() {
        let scene = cube_scene();
        let face = SelectionItem::Face {
            object: "box".into(),
            index: 0,
        };
        let face_vertices = scene.component_vertices(&face);
        let raw = vec![
            SelectionItem::Vertex {
                object: "box".into(),
                index: face_vertices[1],
            },
            face,
            SelectionItem::Vertex {
                object: "box".into(),
                index: 7,
            },
        ];

        let normalized = normalize(&scene, &raw).unwrap();
        let mut expected = vec![vertex("box", face_vertices[1])];
        for index in &face_vertices {
            if *index != face_vertices[1] {
                expected.push(vertex("box", *index));
            }
        }
        if !face_vertices.contains(&7) {
            expected.push(vertex("box", 7));
        }
        assert_eq!(normalized.elements, expected);
    }

    #[test]
    fn adjacent_edges_share_vertices_once() {
        let scene = cube_scene();
        let mesh = scene.object("box").and_then(|o| o.mesh.as_ref()).unwrap();
        let [a, b] = mesh.edges[0];
        let (second, _) = mesh
            .edges
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, edge)| edge[0] == b || edge[1] == b)
            .unwrap();
        let raw = vec![
            SelectionItem::Edge {
                object: "box".into(),
                index: 0,
            },
            SelectionItem::Edge {
                object: "box".into(),
                index: second as u32,
            },
        ];
        let normalized = normalize(&scene, &raw).unwrap();
        assert_eq!(normalized.elements.len(), 3);
        assert_eq!(normalized.elements[0], vertex("box", a));
        assert_eq!(normalized.elements[1], vertex("box", b));
    }

    #[test]
    fn object_mode_drops_non_transforms() {
        let scene = cube_scene();
        let raw = vec![
            SelectionItem::Object("lambert1".into()),
            SelectionItem::Object("locator".into()),
            SelectionItem::Object("box".into()),
            SelectionItem::Object("locator".into()),
        ];
        let normalized = normalize(&scene, &raw).unwrap();
        assert_eq!(normalized.mode, SelectionMode::Object);
        assert_eq!(
            normalized.elements,
            vec![Element::Object("locator".into()), Element::Object("box".into())]
        );
    }

    #[test]
    fn objects_next_to_faces_convert_to_all_their_vertices() {
        let scene = cube_scene();
        let raw = vec![
            SelectionItem::Object("box".into()),
            SelectionItem::Face {
                object: "box".into(),
                index: 1,
            },
            SelectionItem::Object("locator".into()),
        ];
        let normalized = normalize(&scene, &raw).unwrap();
        assert_eq!(normalized.mode, SelectionMode::Component);
        assert_eq!(
            normalized.elements,
            (0..8).map(|i| vertex("box", i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn objects_next_to_vertices_move_as_objects() {
        let scene = cube_scene();
        let raw = vec![
            SelectionItem::Object("locator".into()),
            SelectionItem::Vertex {
                object: "box".into(),
                index: 0,
            },
            SelectionItem::Object("lambert1".into()),
        ];
        let normalized = normalize(&scene, &raw).unwrap();
        assert_eq!(normalized.mode, SelectionMode::Component);
        assert_eq!(
            normalized.elements,
            vec![Element::Object("locator".into()), vertex("box", 0)]
        );
    }

    #[test]
    fn empty_and_unmovable_selections_are_errors() {
        let scene = cube_scene();
        assert_eq!(normalize(&scene, &[]), Err(PushPullError::EmptySelection));
        assert_eq!(
            normalize(&scene, &[SelectionItem::Object("lambert1".into())]),
            Err(PushPullError::NothingMovable)
        );
    }
}
