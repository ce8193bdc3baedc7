use std::mem;

use boundaries_core::{BoundariesConfig, BoundingBox};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use serde::Serialize;

use crate::render_state::RenderState;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("grid needs at least one cell per axis, got {u_cells}x{v_cells}")]
    ZeroCells { u_cells: u32, v_cells: u32 },
    #[error("grid axes are parallel or zero-length")]
    DegenerateAxes,
    #[error("a {u_cells}x{v_cells} grid has more vertices than 32-bit indices can address")]
    TooManyVertices { u_cells: u32, v_cells: u32 },
    #[error("index {index} does not fit in 16 bits")]
    IndexOverflow { index: u32 },
}

// #[repr(C)] ensures the compiler doesn't reorder fields.
// Normal and color are bound once for the whole surface, so a vertex is
// only its position.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
}

impl GridVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GridVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0, // @location(0) in shader
                format: wgpu::VertexFormat::Float32x3, // position
            }],
        }
    }
}

/// The overall-bound attributes of a surface, laid out for a uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Serialize)]
pub struct SurfaceUniform {
    pub normal: [f32; 4], // .w = padding
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexWidth {
    /// 16-bit indices
    Narrow,
    /// 32-bit indices
    Wide,
}

impl IndexWidth {
    /// Narrow while the largest vertex id (`num_vertices - 1`) fits in 16 bits.
    pub fn for_vertex_count(num_vertices: u64) -> Self {
        if num_vertices <= 1 << 16 {
            IndexWidth::Narrow
        } else {
            IndexWidth::Wide
        }
    }

    pub fn index_format(self) -> wgpu::IndexFormat {
        match self {
            IndexWidth::Narrow => wgpu::IndexFormat::Uint16,
            IndexWidth::Wide => wgpu::IndexFormat::Uint32,
        }
    }
}

/// Triangle list indices with one width for the whole buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    pub fn with_capacity(width: IndexWidth, capacity: usize) -> Self {
        match width {
            IndexWidth::Narrow => Indices::U16(Vec::with_capacity(capacity)),
            IndexWidth::Wide => Indices::U32(Vec::with_capacity(capacity)),
        }
    }

    /// Fails when `index` is wider than the buffer's width.
    pub fn push(&mut self, index: u32) -> Result<(), MeshError> {
        match self {
            Indices::U16(indices) => {
                let narrow = u16::try_from(index).map_err(|_| MeshError::IndexOverflow { index })?;
                indices.push(narrow);
            }
            Indices::U32(indices) => indices.push(index),
        }
        Ok(())
    }

    pub fn width(&self) -> IndexWidth {
        match self {
            Indices::U16(_) => IndexWidth::Narrow,
            Indices::U32(_) => IndexWidth::Wide,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U16(indices) => indices.len(),
            Indices::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U16(indices) => indices.get(i).map(|&index| u32::from(index)),
            Indices::U32(indices) => indices.get(i).copied(),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Indices::U16(indices) => Box::new(indices.iter().map(|&index| u32::from(index))),
            Indices::U32(indices) => Box::new(indices.iter().copied()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Indices::U16(indices) => bytemuck::cast_slice(indices),
            Indices::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// The generated reference surface: a flat-shaded, evenly subdivided patch.
#[derive(Debug, Clone, Serialize)]
pub struct Surface {
    pub origin: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
    pub u_cells: u32,
    pub v_cells: u32,

    /// Row-major: id = c + r * (u_cells + 1)
    pub vertices: Vec<Vec3>,
    pub normal: Vec3,
    pub color: Vec4,
    pub indices: Indices,

    /// Conservative bound, thickened along the normal.
    pub bounds: BoundingBox,

    pub render_state: RenderState,
}

impl Surface {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_id(&self, row: u32, column: u32) -> u32 {
        column + row * (self.u_cells + 1)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let index = |k| self.indices.get(3 * t + k).unwrap_or_default();
            [index(0), index(1), index(2)]
        })
    }

    pub fn gpu_vertices(&self) -> Vec<GridVertex> {
        self.vertices
            .iter()
            .map(|v| GridVertex {
                position: v.to_array(),
            })
            .collect()
    }

    pub fn uniform(&self) -> SurfaceUniform {
        SurfaceUniform {
            normal: self.normal.extend(0.0).to_array(),
            color: self.color.to_array(),
        }
    }
}

pub struct GridMeshBuilder {
    pub origin: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
    pub u_cells: u32,
    pub v_cells: u32,
    pub color: Vec4,
}

impl GridMeshBuilder {
    pub fn new(origin: Vec3, u_axis: Vec3, v_axis: Vec3, u_cells: u32, v_cells: u32) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
            u_cells,
            v_cells,
            color: Vec4::ONE,
        }
    }

    /// The configured reference surface with the requested subdivision.
    pub fn from_config(config: &BoundariesConfig, u_cells: u32, v_cells: u32) -> Self {
        Self::new(
            config.surface_origin,
            config.surface_u_axis,
            config.surface_v_axis,
            u_cells,
            v_cells,
        )
        .with_color(config.surface_color)
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn build(&self) -> Result<Surface, MeshError> {
        let (u_cells, v_cells) = (self.u_cells, self.v_cells);

        // Zero cells would divide the axes by zero below.
        if u_cells == 0 || v_cells == 0 {
            return Err(MeshError::ZeroCells { u_cells, v_cells });
        }

        let num_vertices = (u_cells as u64 + 1) * (v_cells as u64 + 1);
        if num_vertices > u32::MAX as u64 + 1 {
            return Err(MeshError::TooManyVertices { u_cells, v_cells });
        }

        let normal = self
            .u_axis
            .cross(self.v_axis)
            .try_normalize()
            .ok_or(MeshError::DegenerateAxes)?;

        // 1. Vertices, rows outer and columns inner
        let ua = self.u_axis / u_cells as f32;
        let va = self.v_axis / v_cells as f32;

        let mut vertices = Vec::with_capacity(num_vertices as usize);
        for r in 0..=v_cells {
            for c in 0..=u_cells {
                vertices.push(self.origin + ua * c as f32 + va * r as f32);
            }
        }

        // 2. Index width is fixed before the first triangle goes in
        let width = IndexWidth::for_vertex_count(num_vertices);
        log::info!("numVertices = {}", num_vertices);
        log::info!("index width = {:?}", width);

        let index_count = 6 * u_cells as usize * v_cells as usize;
        let mut indices = Indices::with_capacity(width, index_count);

        // 3. Two triangles per cell, counter-clockwise around the normal
        for r in 0..v_cells {
            for c in 0..u_cells {
                let p0 = c + r * (u_cells + 1);
                let p1 = p0 + (u_cells + 1);
                let p2 = p0 + 1;
                let p3 = p1 + 1;

                for index in [p0, p2, p1, p2, p3, p1] {
                    indices.push(index)?;
                }
            }
        }

        // 4. Bound thickened along the normal so an edge-on patch is never culled
        let w_axis = normal * ((self.u_axis.length() + self.v_axis.length()) * 0.5);
        let corners = [
            self.origin,
            self.origin + self.u_axis,
            self.origin + self.v_axis,
            self.origin + self.u_axis + self.v_axis,
        ];
        let bounds = BoundingBox::from_points(
            corners
                .iter()
                .flat_map(|&corner| [corner, corner + w_axis]),
        );

        Ok(Surface {
            origin: self.origin,
            u_axis: self.u_axis,
            v_axis: self.v_axis,
            u_cells,
            v_cells,
            vertices,
            normal,
            color: self.color,
            indices,
            bounds,
            render_state: RenderState::default(),
        })
    }
}
