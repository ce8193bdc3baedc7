use std::path::Path;

use serde::Serialize;

use crate::AssetError;

/// Programmable pipeline stage a shader unit targets.
///
/// Declared in pipeline order; a program's units iterate in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// Detects the stage from a GLSL file extension (`.vert`, `.frag`, ...).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "vert" | "vs" => Some(Self::Vertex),
            "tctrl" | "tesc" => Some(Self::TessControl),
            "teval" | "tese" => Some(Self::TessEvaluation),
            "geom" | "gs" => Some(Self::Geometry),
            "frag" | "fs" => Some(Self::Fragment),
            "comp" | "cs" => Some(Self::Compute),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// One shader source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub name: String,
    pub source: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            stage,
            name: name.into(),
            source: source.into(),
        }
    }

    /// Builds a unit from already-read text, validating stage and content.
    pub fn from_text(path: &Path, source: String) -> Result<Self, AssetError> {
        let name = path.display().to_string();

        let stage = ShaderStage::from_path(path)
            .ok_or_else(|| AssetError::UnknownShaderStage { path: name.clone() })?;

        if source.trim().is_empty() {
            return Err(AssetError::EmptyShader { path: name });
        }

        Ok(Self::new(stage, name, source))
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_text(path, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_stage_from_extension() {
        assert_eq!(
            ShaderStage::from_path(Path::new("shaders/boundary.vert")),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(
            ShaderStage::from_path(Path::new("boundary.FRAG")),
            Some(ShaderStage::Fragment)
        );
        assert_eq!(ShaderStage::from_extension("teval"), Some(ShaderStage::TessEvaluation));
        assert_eq!(ShaderStage::from_path(Path::new("boundary.glsl")), None);
        assert_eq!(ShaderStage::from_path(Path::new("boundary")), None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ShaderSource::from_text(Path::new("a.txt"), "void main() {}".into()).unwrap_err();
        assert!(matches!(err, AssetError::UnknownShaderStage { .. }));
    }

    #[test]
    fn blank_source_is_rejected() {
        let err = ShaderSource::from_text(Path::new("a.frag"), "  \n".into()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyShader { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join("boundaries_assets_shader_test.frag");
        std::fs::write(&path, "#version 330\nvoid main() {}\n").unwrap();

        let shader = ShaderSource::load(&path).unwrap();
        assert_eq!(shader.stage, ShaderStage::Fragment);
        assert!(shader.source.starts_with("#version 330"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ShaderSource::load(Path::new("/definitely/not/here.vert")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
