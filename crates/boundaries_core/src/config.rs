use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Process-wide defaults. Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundariesConfig {
    /// Resolution of every front/back depth texture.
    pub depth_texture_width: u32,
    pub depth_texture_height: u32,

    pub default_cut_off: f32,
    pub default_columns: u32,
    pub default_rows: u32,

    // The reference surface spans origin + [0,1]*u_axis + [0,1]*v_axis
    pub surface_origin: Vec3,
    pub surface_u_axis: Vec3,
    pub surface_v_axis: Vec3,
    pub surface_color: Vec4,

    /// Segments around the axis of revolved boundary shapes.
    pub shape_slices: u32,
    /// Segments along the profile of curved boundary shapes.
    pub shape_stacks: u32,
}

impl Default for BoundariesConfig {
    fn default() -> Self {
        Self {
            depth_texture_width: 1280,
            depth_texture_height: 1024,
            default_cut_off: 0.001,
            default_columns: 10,
            default_rows: 10,
            surface_origin: Vec3::ZERO,
            surface_u_axis: Vec3::X,
            surface_v_axis: Vec3::Y,
            surface_color: Vec4::ONE,
            shape_slices: 32,
            shape_stacks: 16,
        }
    }
}

impl BoundariesConfig {
    /// Missing keys fall back to `Default`.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_owned(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config = Self::from_json_str(&json, &display)?;
        log::info!("Loaded configuration from {}", display);
        Ok(config)
    }
}
