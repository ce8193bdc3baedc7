use std::path::Path;

use log::{error, info};

use crate::graph::ComposedScene;

#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("failed to write scene to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The engine that renders or saves a composed scene.
pub trait SceneHost {
    /// Runs the interactive display and returns the process exit status.
    fn display(&mut self, scene: &ComposedScene) -> i32;

    fn write(&mut self, scene: &ComposedScene, path: &Path) -> Result<(), HostError>;
}

/// A successful write exits with status 1, a failed one with 2.
pub const WRITE_SUCCESS_STATUS: i32 = 1;
pub const FAILURE_STATUS: i32 = 2;

/// Hands the scene to `host`: written to `output` when given, displayed
/// otherwise. Returns the process exit status.
pub fn present<H: SceneHost>(host: &mut H, scene: ComposedScene, output: Option<&Path>) -> i32 {
    match output {
        Some(path) => match host.write(&scene, path) {
            Ok(()) => {
                info!("Wrote scene to {}", path.display());
                WRITE_SUCCESS_STATUS
            }
            Err(e) => {
                error!("{e}");
                FAILURE_STATUS
            }
        },
        None => host.display(&scene),
    }
}
