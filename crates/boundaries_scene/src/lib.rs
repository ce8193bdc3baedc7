pub mod composer;
pub mod depth_capture;
pub mod graph;
pub mod host;
pub mod registry;

pub use composer::{BoundaryRequest, ComposeError, ComposerState, SceneComposer, SceneRequest};
pub use depth_capture::{CaptureCamera, DepthCapture, DepthCaptureStage};
pub use graph::{ComposedScene, DrawPlan, SceneNode};
pub use host::{HostError, SceneHost, present};
pub use registry::{Boundary, BoundaryRegistry, BoundaryVolume};
