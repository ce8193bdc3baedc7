pub mod assets;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod pipeline;

pub use assets::{Assets, Handle};
pub use bounds::BoundingBox;
pub use camera::{CameraView, ReferenceFrame};
pub use config::{BoundariesConfig, ConfigError};
pub use pipeline::RenderOrder;
