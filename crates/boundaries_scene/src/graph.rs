use boundaries_core::Handle;
use boundaries_renderer::{DepthFace, DepthPass, DepthTexture, Surface, SurfaceDraw};
use serde::Serialize;

use crate::depth_capture::CaptureCamera;
use crate::registry::{Boundary, BoundaryRegistry};

/// A child of the scene's root group.
#[derive(Debug, Clone, Serialize)]
pub enum SceneNode {
    /// A boundary drawn directly in the main pass.
    Boundary(Handle<Boundary>),
    CaptureCamera(CaptureCamera),
    Surface(Box<Surface>),
}

/// GPU state of every pass, in the order the host runs them.
#[derive(Debug, Clone, Serialize)]
pub struct DrawPlan {
    pub depth_passes: Vec<DepthPass>,
    pub surface: Option<SurfaceDraw>,
}

/// Everything the host needs to render or save one frame of the scene.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedScene {
    pub registry: BoundaryRegistry,
    /// Visible boundaries, then capture cameras, then the surface.
    pub children: Vec<SceneNode>,
    pub front_textures: Vec<DepthTexture>,
    pub back_textures: Vec<DepthTexture>,
}

impl ComposedScene {
    pub fn surface(&self) -> Option<&Surface> {
        self.children.iter().find_map(|node| match node {
            SceneNode::Surface(surface) => Some(surface.as_ref()),
            _ => None,
        })
    }

    pub fn visible_boundaries(&self) -> impl Iterator<Item = Handle<Boundary>> + '_ {
        self.children.iter().filter_map(|node| match node {
            SceneNode::Boundary(handle) => Some(*handle),
            _ => None,
        })
    }

    pub fn capture_cameras(&self) -> impl Iterator<Item = &CaptureCamera> + '_ {
        self.children.iter().filter_map(|node| match node {
            SceneNode::CaptureCamera(camera) => Some(camera),
            _ => None,
        })
    }

    /// The texture `camera` renders into.
    pub fn capture_texture(&self, camera: &CaptureCamera) -> Option<&DepthTexture> {
        match camera.face {
            DepthFace::Front => self.front_textures.get(camera.boundary.index),
            DepthFace::Back => self.back_textures.get(camera.boundary.index),
        }
    }

    pub fn draw_plan(&self) -> DrawPlan {
        let depth_passes = self
            .capture_cameras()
            .filter_map(|capture| {
                self.capture_texture(capture)
                    .map(|texture| DepthPass::new(&capture.camera, texture))
            })
            .collect();

        DrawPlan {
            depth_passes,
            surface: self.surface().map(SurfaceDraw::new),
        }
    }

    /// One line per part of the scene, for reporting.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for (handle, boundary) in self.registry.iter() {
            lines.push(format!(
                "boundary {}: {} ({} triangles)",
                handle.index,
                boundary.volume.kind(),
                boundary.subgraph.triangle_count()
            ));
        }
        lines.push(format!(
            "visible boundaries: {}",
            self.visible_boundaries().count()
        ));
        lines.push(format!(
            "capture cameras: {} ({} depth texture pairs)",
            self.capture_cameras().count(),
            self.front_textures.len()
        ));
        if let Some(surface) = self.surface() {
            lines.push(format!(
                "surface: {}x{} cells, {} vertices, {} triangles",
                surface.u_cells,
                surface.v_cells,
                surface.num_vertices(),
                surface.triangle_count()
            ));
        }

        lines
    }
}
