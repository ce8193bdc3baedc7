use glam::Mat4;
use serde::{Deserialize, Serialize};

/// How a camera's matrices combine with the camera above it in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Matrices are multiplied onto the parent camera's, so the camera
    /// follows the main view.
    Relative,
    /// Matrices replace the parent camera's.
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub reference_frame: ReferenceFrame,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for CameraView {
    fn default() -> Self {
        Self::identity_relative()
    }
}

impl CameraView {
    /// Identity view/projection relative to the parent: renders exactly what
    /// the main camera sees.
    pub fn identity_relative() -> Self {
        Self {
            reference_frame: ReferenceFrame::Relative,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    /// Resolves the final view-projection for a given parent camera.
    pub fn view_projection(&self, parent_view_proj: Mat4) -> Mat4 {
        let own = self.projection * self.view;
        match self.reference_frame {
            ReferenceFrame::Relative => own * parent_view_proj,
            ReferenceFrame::Absolute => own,
        }
    }
}
