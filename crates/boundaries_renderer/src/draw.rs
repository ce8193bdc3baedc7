use std::collections::BTreeMap;

use boundaries_assets::ShaderStage;
use serde::Serialize;

use crate::camera::OffscreenCamera;
use crate::mesh::{GridVertex, Surface, SurfaceUniform};
use crate::programs::CutOffUniform;
use crate::texture::DepthTexture;

/// What a GPU backend needs to draw the surface: buffer layout, uniform
/// blocks and the shader stages with their defines applied.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceDraw {
    pub vertex_stride: u64,
    pub vertex_count: usize,
    pub vertex_bytes: usize,
    pub index_format: String,
    pub index_count: usize,
    pub index_bytes: usize,
    pub surface_uniform: SurfaceUniform,
    pub shader_uniform: CutOffUniform,
    /// wgpu stages the uniform bind group is visible to.
    pub visibility: Vec<&'static str>,
    pub stages: BTreeMap<ShaderStage, String>,
}

impl SurfaceDraw {
    pub fn new(surface: &Surface) -> Self {
        let state = &surface.render_state;
        let vertices = surface.gpu_vertices();

        let (visibility, stages) = match &state.program {
            Some(program) => (
                program
                    .visibility()
                    .iter_names()
                    .map(|(name, _)| name)
                    .collect(),
                program
                    .units
                    .keys()
                    .filter_map(|&stage| {
                        program
                            .preprocessed_source(stage, &state.defines)
                            .map(|source| (stage, source))
                    })
                    .collect(),
            ),
            None => (Vec::new(), BTreeMap::new()),
        };

        Self {
            vertex_stride: GridVertex::desc().array_stride,
            vertex_count: vertices.len(),
            vertex_bytes: bytemuck::cast_slice::<GridVertex, u8>(&vertices).len(),
            index_format: format!("{:?}", surface.indices.width().index_format()),
            index_count: surface.indices.len(),
            index_bytes: surface.indices.as_bytes().len(),
            surface_uniform: surface.uniform(),
            shader_uniform: CutOffUniform::from_render_state(state),
            visibility,
            stages,
        }
    }
}

/// Render pass state of one depth capture camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthPass {
    pub target: String,
    pub format: String,
    pub cull_mode: Option<String>,
    pub front_face: String,
    /// Depth the attachment is cleared to, if it is cleared.
    pub clear_depth: Option<f32>,
    pub address_mode: String,
    pub border_color: Option<String>,
}

impl DepthPass {
    pub fn new(camera: &OffscreenCamera, texture: &DepthTexture) -> Self {
        let primitive = camera.primitive_state();
        let texture_desc = texture.texture_descriptor();
        let sampler_desc = texture.sampler_descriptor();

        Self {
            target: texture.label.clone(),
            format: format!("{:?}", texture_desc.format),
            cull_mode: primitive.cull_mode.map(|face| format!("{face:?}")),
            front_face: format!("{:?}", primitive.front_face),
            clear_depth: match camera.depth_ops().load {
                wgpu::LoadOp::Clear(depth) => Some(depth),
                _ => None,
            },
            address_mode: format!("{:?}", sampler_desc.address_mode_u),
            border_color: sampler_desc.border_color.map(|color| format!("{color:?}")),
        }
    }
}
