pub mod asset_server;
pub mod assets;
pub mod shader;

pub use asset_server::AssetServer;
pub use assets::{MeshData, Vertex};
pub use shader::{ShaderSource, ShaderStage};

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot detect shader stage of {path}")]
    UnknownShaderStage { path: String },
    #[error("shader {path} is empty")]
    EmptyShader { path: String },
    #[error("unsupported model format: {path}")]
    UnsupportedModelFormat { path: String },
    #[error("failed to load glTF {path}: {source}")]
    Gltf {
        path: String,
        #[source]
        source: gltf::Error,
    },
    #[error("failed to load OBJ {path}: {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },
    #[error("mesh in {path} has no positions")]
    MissingPositions { path: String },
    #[error("mesh in {path} references vertices it does not have")]
    IndexOutOfRange { path: String },
    #[error("model {path} contains no triangles")]
    EmptyModel { path: String },
}
