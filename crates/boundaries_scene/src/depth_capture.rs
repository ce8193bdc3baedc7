use boundaries_core::{BoundariesConfig, Handle};
use boundaries_renderer::{CullFace, DepthFace, DepthTexture, OffscreenCamera};
use log::info;
use serde::Serialize;

use crate::registry::{Boundary, BoundaryRegistry};

/// Off-screen camera that renders one boundary into one depth texture.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureCamera {
    pub camera: OffscreenCamera,
    pub face: DepthFace,
    /// Sole child; also the index of the texture it writes.
    pub boundary: Handle<Boundary>,
}

impl CaptureCamera {
    pub fn new(texture: &DepthTexture, face: DepthFace, boundary: Handle<Boundary>) -> Self {
        Self {
            camera: OffscreenCamera::depth_capture(texture, CullFace::from(face)),
            face,
            boundary,
        }
    }
}

/// Depth textures and the cameras that fill them, index-aligned with the
/// boundary registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DepthCapture {
    pub front_textures: Vec<DepthTexture>,
    pub back_textures: Vec<DepthTexture>,
    /// Front then back camera of each boundary, in registry order.
    pub cameras: Vec<CaptureCamera>,
}

impl DepthCapture {
    pub fn len(&self) -> usize {
        self.front_textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front_textures.is_empty()
    }

    pub fn texture(&self, boundary: Handle<Boundary>, face: DepthFace) -> Option<&DepthTexture> {
        match face {
            DepthFace::Front => self.front_textures.get(boundary.index),
            DepthFace::Back => self.back_textures.get(boundary.index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthCaptureStage {
    pub width: u32,
    pub height: u32,
}

impl DepthCaptureStage {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &BoundariesConfig) -> Self {
        Self::new(config.depth_texture_width, config.depth_texture_height)
    }

    /// Texture pair and cameras for a single boundary.
    pub fn capture_boundary(
        &self,
        boundary: Handle<Boundary>,
    ) -> ([DepthTexture; 2], [CaptureCamera; 2]) {
        let front = DepthTexture::for_boundary(DepthFace::Front, boundary.index, self.width, self.height);
        let back = DepthTexture::for_boundary(DepthFace::Back, boundary.index, self.width, self.height);

        let cameras = [
            CaptureCamera::new(&front, DepthFace::Front, boundary),
            CaptureCamera::new(&back, DepthFace::Back, boundary),
        ];

        ([front, back], cameras)
    }

    pub fn capture(&self, registry: &BoundaryRegistry) -> DepthCapture {
        let mut capture = DepthCapture {
            front_textures: Vec::with_capacity(registry.len()),
            back_textures: Vec::with_capacity(registry.len()),
            cameras: Vec::with_capacity(2 * registry.len()),
        };

        for handle in registry.handles() {
            let ([front, back], cameras) = self.capture_boundary(handle);

            info!("{} {}x{}", front.label, front.width, front.height);
            info!("{} {}x{}", back.label, back.width, back.height);

            capture.front_textures.push(front);
            capture.back_textures.push(back);
            capture.cameras.extend(cameras);
        }

        capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BoundaryVolume;
    use boundaries_core::RenderOrder;
    use glam::Vec3;

    fn registry_with(n: usize) -> BoundaryRegistry {
        let mut registry = BoundaryRegistry::default();
        for i in 0..n {
            registry.add(BoundaryVolume::Sphere {
                center: Vec3::new(i as f32, 0.0, 0.0),
                radius: 0.25,
            });
        }
        registry
    }

    #[test]
    fn empty_registry_captures_nothing() {
        let capture = DepthCaptureStage::new(64, 64).capture(&BoundaryRegistry::default());
        assert!(capture.is_empty());
        assert!(capture.back_textures.is_empty());
        assert!(capture.cameras.is_empty());
    }

    #[test]
    fn one_pair_per_boundary() {
        let registry = registry_with(3);
        let capture = DepthCaptureStage::new(1280, 1024).capture(&registry);

        assert_eq!(capture.front_textures.len(), 3);
        assert_eq!(capture.back_textures.len(), 3);
        assert_eq!(capture.cameras.len(), 6);

        for (n, handle) in registry.handles().enumerate() {
            let front = capture.texture(handle, DepthFace::Front).unwrap();
            let back = capture.texture(handle, DepthFace::Back).unwrap();
            assert_eq!(front.label, format!("front depth texture {n}"));
            assert_eq!(back.label, format!("back depth texture {n}"));
            assert_eq!((front.width, front.height), (1280, 1024));
        }
    }

    #[test]
    fn cameras_reference_their_boundary() {
        let registry = registry_with(2);
        let capture = DepthCaptureStage::new(32, 16).capture(&registry);

        let summary: Vec<_> = capture
            .cameras
            .iter()
            .map(|c| (c.boundary.index, c.face, c.camera.cull_face))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, DepthFace::Front, CullFace::Back),
                (0, DepthFace::Back, CullFace::Front),
                (1, DepthFace::Front, CullFace::Back),
                (1, DepthFace::Back, CullFace::Front),
            ]
        );

        for camera in &capture.cameras {
            assert_eq!(camera.camera.render_order, RenderOrder::PreRender);
            assert_eq!(camera.camera.viewport.width, 32);
            assert_eq!(camera.camera.viewport.height, 16);
        }
    }

    #[test]
    fn uses_configured_resolution() {
        let stage = DepthCaptureStage::from_config(&BoundariesConfig::default());
        assert_eq!(stage, DepthCaptureStage::new(1280, 1024));
    }
}
