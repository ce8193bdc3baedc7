use boundaries_core::BoundingBox;
use glam::{Mat4, Vec3};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub position: [f32; 3], // Flat lists are easier for generic loaders
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }
}

/// Indexed triangle list. Every three indices form one counter-clockwise
/// (front-facing) triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position(&self, index: u32) -> Vec3 {
        Vec3::from(self.vertices[index as usize].position)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// Appends another mesh, rebasing its indices after our vertices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Bakes a node transform into positions and normals.
    pub fn transform(&mut self, matrix: Mat4) {
        // Lighting math: Transpose(Inverse(Model)) keeps normals perpendicular
        // under non-uniform scale.
        let normal_matrix = matrix.inverse().transpose();

        for vertex in &mut self.vertices {
            let position = matrix.transform_point3(Vec3::from(vertex.position));
            let normal = normal_matrix
                .transform_vector3(Vec3::from(vertex.normal))
                .normalize_or_zero();
            *vertex = Vertex::new(position, normal);
        }

        // Mirroring transforms flip the winding; swap to keep faces outward.
        if matrix.determinant() < 0.0 {
            for triangle in self.indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }
    }

    /// True when every index names an existing vertex.
    pub fn has_valid_indices(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < count)
    }

    /// Area-weighted vertex normals from the triangle list, for sources that
    /// ship without normals.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];

        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));
            let face = (pb - pa).cross(pc - pa);
            accumulated[a as usize] += face;
            accumulated[b as usize] += face;
            accumulated[c as usize] += face;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            vertex.normal = normal.normalize_or_zero().into();
        }
    }
}
