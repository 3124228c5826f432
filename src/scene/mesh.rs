use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::{Mesh, Vec3};

/// Polygon mesh with explicit edges, editable per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct EditMesh {
    pub positions: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<Vec<u32>>,
}

impl EditMesh {
    /// Builds edges from the face loops, each undirected edge once.
    pub fn from_faces(positions: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        let mut edges: Vec<[u32; 2]> = Vec::new();
        for face in &faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                let key = [a.min(b), a.max(b)];
                if a != b && !edges.contains(&key) {
                    edges.push(key);
                }
            }
        }
        Self {
            positions,
            edges,
            faces,
        }
    }

    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        Self::from_faces(positions, faces)
    }

    /// Flat grid in the XY plane, `cells` quads per side.
    pub fn grid(size: f32, cells: u32) -> Self {
        let cells = cells.max(1);
        let step = size / cells as f32;
        let origin = -size * 0.5;
        let row = cells + 1;

        let mut positions = Vec::with_capacity((row * row) as usize);
        for y in 0..row {
            for x in 0..row {
                positions.push(Vec3::new(
                    origin + x as f32 * step,
                    origin + y as f32 * step,
                    0.0,
                ));
            }
        }

        let mut faces = Vec::with_capacity((cells * cells) as usize);
        for y in 0..cells {
            for x in 0..cells {
                let i = y * row + x;
                faces.push(vec![i, i + 1, i + row + 1, i + row]);
            }
        }
        Self::from_faces(positions, faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_vertices(&self, index: u32) -> Option<[u32; 2]> {
        self.edges.get(index as usize).copied()
    }

    pub fn face_vertices(&self, index: u32) -> Option<&[u32]> {
        self.faces.get(index as usize).map(Vec::as_slice)
    }

    /// Flat-shaded triangle list for rendering, one fan per face.
    pub fn to_render_mesh(&self) -> Mesh {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for face in &self.faces {
            let corners: Vec<Vec3> = face
                .iter()
                .filter_map(|&i| self.positions.get(i as usize).copied())
                .collect();
            if corners.len() < 3 {
                continue;
            }

            let mut normal = Vec3::ZERO;
            for i in 1..corners.len() - 1 {
                normal += (corners[i] - corners[0]).cross(corners[i + 1] - corners[0]);
            }
            let normal = normal.normalize_or_zero();

            let base = positions.len() as u32;
            for corner in &corners {
                positions.push([corner.x, corner.y, corner.z]);
                normals.push([normal.x, normal.y, normal.z]);
            }
            for i in 1..corners.len() as u32 - 1 {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
        }

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}
