use bitflags::bitflags;
use boundaries_core::{CameraView, RenderOrder};
use serde::Serialize;

use crate::texture::{DepthFace, DepthTexture};

bitflags! {
    /// Buffers a camera clears before drawing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Which faces the rasterizer discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CullFace {
    /// Discard back faces: the nearest surface wins.
    Back,
    /// Discard front faces: the farthest surface wins.
    Front,
}

impl From<CullFace> for wgpu::Face {
    fn from(face: CullFace) -> Self {
        match face {
            CullFace::Back => wgpu::Face::Back,
            CullFace::Front => wgpu::Face::Front,
        }
    }
}

/// Culling that leaves the requested side of a closed volume in the depth buffer.
impl From<DepthFace> for CullFace {
    fn from(face: DepthFace) -> Self {
        match face {
            DepthFace::Front => CullFace::Back,
            DepthFace::Back => CullFace::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderTarget {
    /// Off-screen framebuffer with texture attachments.
    FrameBuffer,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Render configuration of a camera that draws into textures instead of the
/// window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffscreenCamera {
    pub viewport: Viewport,
    pub clear_mask: ClearMask,
    pub render_order: RenderOrder,
    pub render_target: RenderTarget,
    pub view: CameraView,
    pub cull_face: CullFace,
}

impl OffscreenCamera {
    /// Depth-only pass into `texture` that sees exactly what the main camera
    /// sees and runs before it.
    pub fn depth_capture(texture: &DepthTexture, cull_face: CullFace) -> Self {
        Self {
            viewport: Viewport {
                x: 0,
                y: 0,
                width: texture.width,
                height: texture.height,
            },
            clear_mask: ClearMask::DEPTH,
            render_order: RenderOrder::PreRender,
            render_target: RenderTarget::FrameBuffer,
            view: CameraView::identity_relative(),
            cull_face,
        }
    }

    pub fn depth_ops(&self) -> wgpu::Operations<f32> {
        wgpu::Operations {
            load: if self.clear_mask.contains(ClearMask::DEPTH) {
                wgpu::LoadOp::Clear(1.0) // Clear to "Far" (1.0)
            } else {
                wgpu::LoadOp::Load
            },
            store: wgpu::StoreOp::Store,
        }
    }

    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(self.cull_face.into()),
            ..Default::default()
        }
    }
}
