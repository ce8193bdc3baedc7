use std::path::Path;

use boundaries_scene::{ComposedScene, DrawPlan, HostError, SceneHost};
use log::{debug, info};
use serde::Serialize;

/// On-disk layout: the scene graph with its draw plan alongside.
#[derive(Serialize)]
struct SceneFile<'a> {
    #[serde(flatten)]
    scene: &'a ComposedScene,
    draw: DrawPlan,
}

/// Reports the scene through the log and saves it as JSON.
#[derive(Debug, Default)]
pub struct JsonSceneHost;

impl SceneHost for JsonSceneHost {
    fn display(&mut self, scene: &ComposedScene) -> i32 {
        for line in scene.summary() {
            info!("{line}");
        }

        let plan = scene.draw_plan();
        for pass in &plan.depth_passes {
            debug!("depth pass {} (cull {:?})", pass.target, pass.cull_mode);
        }
        if let Some(surface) = &plan.surface {
            for (stage, source) in &surface.stages {
                debug!("{stage:?} shader:\n{source}");
            }
        }
        0
    }

    fn write(&mut self, scene: &ComposedScene, path: &Path) -> Result<(), HostError> {
        let file = SceneFile {
            scene,
            draw: scene.draw_plan(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json).map_err(|source| HostError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
