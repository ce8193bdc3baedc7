mod args;
mod host;

use boundaries_assets::AssetServer;
use boundaries_core::BoundariesConfig;
use boundaries_scene::{SceneComposer, host::FAILURE_STATUS, present};
use clap::error::ErrorKind;
use log::error;

use crate::{args::CommandLine, host::JsonSceneHost};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    std::process::exit(run(std::env::args()));
}

/// Runs the program for a full argument list, program name first, and
/// returns the exit status.
fn run<I>(args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    // 1. Command line
    let cli = match CommandLine::parse(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => FAILURE_STATUS,
            };
        }
    };

    // 2. Defaults
    let config = match &cli.config {
        Some(path) => match BoundariesConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return FAILURE_STATUS;
            }
        },
        None => BoundariesConfig::default(),
    };

    // 3. Compose
    let request = cli.scene_request(&config);
    let scene = match SceneComposer::new(config, AssetServer::new()).run(&request) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{e}");
            return FAILURE_STATUS;
        }
    };

    // 4. Hand over
    present(&mut JsonSceneHost, scene, cli.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("boundaries")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect()
    }

    #[test]
    fn display_exits_with_zero() {
        assert_eq!(run(args("--sphere 0.5 0.5 0 0.25 -d -b")), 0);
    }

    #[test]
    fn writing_the_scene_exits_with_one() {
        let path = std::env::temp_dir().join("boundaries_app_scene_test.json");
        let _ = std::fs::remove_file(&path);

        let status = run(args(&format!(
            "--box 0 0 0 1 1 1 -d --columns 3 --rows 2 -o {}",
            path.display()
        )));
        assert_eq!(status, 1);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["back_textures"][0]["label"], "back depth texture 0");
        assert_eq!(json["front_textures"][0]["width"], 1280);
        assert_eq!(json["draw"]["depth_passes"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["draw"]["surface"]["index_count"], 36);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn errors_exit_with_two() {
        assert_eq!(run(args("--rows")), 2);
        assert_eq!(run(args("--unknown")), 2);
        assert_eq!(run(args("--columns 0")), 2);

        let missing = std::env::temp_dir().join("boundaries_app_missing_config.json");
        let _ = std::fs::remove_file(&missing);
        assert_eq!(run(args(&format!("--config {}", missing.display()))), 2);
    }

    #[test]
    fn config_supplies_defaults() {
        let config = std::env::temp_dir().join("boundaries_app_config_test.json");
        let output = std::env::temp_dir().join("boundaries_app_config_scene.json");
        std::fs::write(&config, r#"{ "default_columns": 4, "depth_texture_width": 64 }"#).unwrap();

        let status = run(args(&format!(
            "--config {} --sphere 0 0 0 1 -d -o {}",
            config.display(),
            output.display()
        )));
        assert_eq!(status, 1);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["front_textures"][0]["width"], 64);
        let surface = json["children"]
            .as_array()
            .and_then(|c| c.last())
            .map(|node| node["Surface"].clone())
            .unwrap();
        assert_eq!(surface["u_cells"], 4);
        assert_eq!(surface["v_cells"], 10);

        let _ = std::fs::remove_file(&config);
        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn help_exits_with_zero() {
        assert_eq!(run(args("--help")), 0);
    }
}
