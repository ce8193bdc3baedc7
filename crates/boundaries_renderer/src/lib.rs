pub mod camera;
pub mod draw;
pub mod mesh;
pub mod programs;
pub mod render_state;
pub mod shapes;
pub mod texture;

pub use camera::{ClearMask, CullFace, OffscreenCamera, RenderTarget, Viewport};
pub use draw::{DepthPass, SurfaceDraw};
pub use mesh::{GridMeshBuilder, IndexWidth, Indices, MeshError, Surface};
pub use programs::{ShaderAssembler, ShaderProgram};
pub use render_state::{RenderState, TextureBinding, UniformValue};
pub use shapes::Tessellation;
pub use texture::{DepthFace, DepthTexture};
