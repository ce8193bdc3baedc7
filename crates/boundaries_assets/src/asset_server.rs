use std::path::{Path, PathBuf};

use crate::{AssetError, assets::MeshData, shader::ShaderSource};

mod gltf_parser;
mod obj_parser;

pub use gltf_parser::parse_gltf;
pub use obj_parser::parse_obj;

/// Synchronous loader for the files a scene refers to.
///
/// Relative paths resolve against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct AssetServer {
    root: Option<PathBuf>,
}

impl AssetServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn load_shader(&self, path: &Path) -> Result<ShaderSource, AssetError> {
        let path = self.resolve(path);
        log::debug!("[AssetServer] Loading shader: {}", path.display());
        ShaderSource::load(&path)
    }

    pub fn load_model(&self, path: &Path) -> Result<MeshData, AssetError> {
        let path = self.resolve(path);
        let display = path.display().to_string();
        log::debug!("[AssetServer] Loading model: {}", display);

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let mesh = match extension.as_deref() {
            Some("gltf") | Some("glb") => parse_gltf(&display)?,
            Some("obj") => parse_obj(&display)?,
            _ => return Err(AssetError::UnsupportedModelFormat { path: display }),
        };

        if mesh.is_empty() {
            return Err(AssetError::EmptyModel { path: display });
        }

        log::info!(
            "[AssetServer] Loaded {} ({} vertices, {} triangles)",
            display,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}
