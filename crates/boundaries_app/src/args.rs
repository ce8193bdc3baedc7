use std::ffi::OsString;
use std::path::PathBuf;

use boundaries_core::BoundariesConfig;
use boundaries_scene::{BoundaryRequest, BoundaryVolume, SceneRequest};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use glam::Vec3;

#[derive(Parser, Debug)]
#[command(name = "boundaries")]
#[command(about = "Visualize where a surface crosses boundary volumes", long_about = None)]
struct Cli {
    /// Render boundary volumes directly
    #[arg(short = 'b')]
    show_boundaries: bool,

    /// Capture boundary depth for the surface shader
    #[arg(short = 'd')]
    depth_capture: bool,

    /// Add a sphere boundary
    #[arg(long, num_args = 4, value_names = ["CX", "CY", "CZ", "R"], allow_negative_numbers = true)]
    sphere: Vec<f32>,

    /// Add a box boundary with full edge lengths
    #[arg(long = "box", num_args = 6, value_names = ["CX", "CY", "CZ", "DX", "DY", "DZ"], allow_negative_numbers = true)]
    cuboid: Vec<f32>,

    /// Add a cone boundary
    #[arg(long, num_args = 5, value_names = ["CX", "CY", "CZ", "R", "H"], allow_negative_numbers = true)]
    cone: Vec<f32>,

    /// Add a capsule boundary
    #[arg(long, num_args = 5, value_names = ["CX", "CY", "CZ", "R", "H"], allow_negative_numbers = true)]
    capsule: Vec<f32>,

    /// Add a cylinder boundary
    #[arg(long, num_args = 5, value_names = ["CX", "CY", "CZ", "R", "H"], allow_negative_numbers = true)]
    cylinder: Vec<f32>,

    /// Add a boundary loaded from a model file (.gltf, .glb, .obj)
    #[arg(long)]
    model: Vec<PathBuf>,

    /// Surface cells along u (last one wins)
    #[arg(long)]
    columns: Vec<u32>,

    /// Surface cells along v (last one wins)
    #[arg(long)]
    rows: Vec<u32>,

    /// Add a shader unit, stage taken from the extension
    #[arg(long)]
    shader: Vec<PathBuf>,

    /// Set the Z_FUNCTION define
    #[arg(long = "Z_FUNCTION", value_name = "EXPR")]
    z_function: Vec<String>,

    /// Set the VISIBLE_FUNCTION define
    #[arg(long = "VISIBLE_FUNCTION", value_name = "EXPR")]
    visible_function: Vec<String>,

    /// Set the cutOff uniform
    #[arg(long = "cutOff", value_name = "VALUE", allow_negative_numbers = true)]
    cut_off: Vec<f32>,

    /// Write the scene to a file instead of displaying it
    #[arg(short = 'o')]
    output: Option<PathBuf>,

    /// Load defaults from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Parsed command line. Repeatable options keep every occurrence in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    pub show_boundaries: bool,
    pub depth_capture: bool,
    pub boundaries: Vec<BoundaryRequest>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub shaders: Vec<PathBuf>,
    pub defines: Vec<(String, String)>,
    pub cut_offs: Vec<f32>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Command line position of each occurrence of `id`.
fn positions(matches: &ArgMatches, id: &str, values_per_use: usize) -> Vec<usize> {
    matches
        .indices_of(id)
        .map(|indices| indices.step_by(values_per_use).collect())
        .unwrap_or_default()
}

fn shapes<F>(
    matches: &ArgMatches,
    id: &str,
    values: &[f32],
    arity: usize,
    volume: F,
) -> Vec<(usize, BoundaryRequest)>
where
    F: Fn(&[f32]) -> BoundaryVolume,
{
    positions(matches, id, arity)
        .into_iter()
        .zip(values.chunks_exact(arity))
        .map(|(at, v)| (at, BoundaryRequest::Shape(volume(v))))
        .collect()
}

impl CommandLine {
    /// Parses a full argument list, program name first. Help output comes back
    /// as an error of kind `DisplayHelp`.
    pub fn parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        let cli = Cli::from_arg_matches(&matches)?;

        // clap groups values per option; interleave them back into argv order
        let mut boundaries: Vec<(usize, BoundaryRequest)> = Vec::new();
        boundaries.extend(shapes(&matches, "sphere", &cli.sphere, 4, |v| {
            BoundaryVolume::Sphere {
                center: Vec3::new(v[0], v[1], v[2]),
                radius: v[3],
            }
        }));
        boundaries.extend(shapes(&matches, "cuboid", &cli.cuboid, 6, |v| {
            BoundaryVolume::Box {
                center: Vec3::new(v[0], v[1], v[2]),
                dimensions: Vec3::new(v[3], v[4], v[5]),
            }
        }));
        boundaries.extend(shapes(&matches, "cone", &cli.cone, 5, |v| {
            BoundaryVolume::Cone {
                center: Vec3::new(v[0], v[1], v[2]),
                radius: v[3],
                height: v[4],
            }
        }));
        boundaries.extend(shapes(&matches, "capsule", &cli.capsule, 5, |v| {
            BoundaryVolume::Capsule {
                center: Vec3::new(v[0], v[1], v[2]),
                radius: v[3],
                height: v[4],
            }
        }));
        boundaries.extend(shapes(&matches, "cylinder", &cli.cylinder, 5, |v| {
            BoundaryVolume::Cylinder {
                center: Vec3::new(v[0], v[1], v[2]),
                radius: v[3],
                height: v[4],
            }
        }));
        boundaries.extend(
            positions(&matches, "model", 1)
                .into_iter()
                .zip(cli.model.iter().cloned().map(BoundaryRequest::Model)),
        );
        boundaries.sort_by_key(|(at, _)| *at);

        let mut defines: Vec<(usize, (String, String))> = Vec::new();
        for (id, name, values) in [
            ("z_function", "Z_FUNCTION", &cli.z_function),
            ("visible_function", "VISIBLE_FUNCTION", &cli.visible_function),
        ] {
            defines.extend(
                positions(&matches, id, 1)
                    .into_iter()
                    .zip(values.iter().map(|expr| (name.to_string(), expr.clone()))),
            );
        }
        defines.sort_by_key(|(at, _)| *at);

        Ok(CommandLine {
            show_boundaries: cli.show_boundaries,
            depth_capture: cli.depth_capture,
            boundaries: boundaries.into_iter().map(|(_, b)| b).collect(),
            columns: cli.columns.last().copied(),
            rows: cli.rows.last().copied(),
            shaders: cli.shader,
            defines: defines.into_iter().map(|(_, d)| d).collect(),
            cut_offs: cli.cut_off,
            output: cli.output,
            config: cli.config,
        })
    }

    /// Fills in unset options from `config`.
    pub fn scene_request(&self, config: &BoundariesConfig) -> SceneRequest {
        SceneRequest {
            show_boundaries: self.show_boundaries,
            depth_capture: self.depth_capture,
            boundaries: self.boundaries.clone(),
            columns: self.columns.unwrap_or(config.default_columns),
            rows: self.rows.unwrap_or(config.default_rows),
            shaders: self.shaders.clone(),
            defines: self.defines.clone(),
            cut_offs: self.cut_offs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(line: &str) -> Result<CommandLine, clap::Error> {
        CommandLine::parse(std::iter::once("boundaries").chain(line.split_whitespace()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn empty_command_line_uses_config_defaults() {
        let cli = parse("").unwrap();
        let request = cli.scene_request(&BoundariesConfig::default());

        assert!(!request.show_boundaries);
        assert!(!request.depth_capture);
        assert!(request.boundaries.is_empty());
        assert_eq!((request.columns, request.rows), (10, 10));
        assert!(request.cut_offs.is_empty());
        assert_eq!(cli.output, None);
    }

    #[test]
    fn boundaries_keep_command_line_order() {
        let cli = parse("--box 0 0 0 1 2 3 --sphere 1 2 3 0.5 --model a.obj --cone 0 0 1 1 2 --sphere 0 0 0 2")
            .unwrap();

        assert_eq!(
            cli.boundaries,
            vec![
                BoundaryRequest::Shape(BoundaryVolume::Box {
                    center: Vec3::ZERO,
                    dimensions: Vec3::new(1.0, 2.0, 3.0),
                }),
                BoundaryRequest::Shape(BoundaryVolume::Sphere {
                    center: Vec3::new(1.0, 2.0, 3.0),
                    radius: 0.5,
                }),
                BoundaryRequest::Model(PathBuf::from("a.obj")),
                BoundaryRequest::Shape(BoundaryVolume::Cone {
                    center: Vec3::Z,
                    radius: 1.0,
                    height: 2.0,
                }),
                BoundaryRequest::Shape(BoundaryVolume::Sphere {
                    center: Vec3::ZERO,
                    radius: 2.0,
                }),
            ]
        );
    }

    #[test]
    fn flags_and_repeatable_options() {
        let cli = parse(
            "-b -d --columns 4 --rows 5 --columns 6 --shader a.vert --shader b.frag \
             --Z_FUNCTION z --VISIBLE_FUNCTION v --Z_FUNCTION w --cutOff 0.5 --cutOff 0.25 -o out.json",
        )
        .unwrap();

        assert!(cli.show_boundaries && cli.depth_capture);
        assert_eq!((cli.columns, cli.rows), (Some(6), Some(5)));
        assert_eq!(cli.shaders, vec![PathBuf::from("a.vert"), PathBuf::from("b.frag")]);
        assert_eq!(
            cli.defines,
            vec![
                ("Z_FUNCTION".to_string(), "z".to_string()),
                ("VISIBLE_FUNCTION".to_string(), "v".to_string()),
                ("Z_FUNCTION".to_string(), "w".to_string()),
            ]
        );
        assert_eq!(cli.cut_offs, vec![0.5, 0.25]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn negative_values_are_values() {
        let cli = parse("--cylinder -1 -2 -3 0.5 1 --cutOff -0.5").unwrap();
        assert_eq!(
            cli.boundaries,
            vec![BoundaryRequest::Shape(BoundaryVolume::Cylinder {
                center: Vec3::new(-1.0, -2.0, -3.0),
                radius: 0.5,
                height: 1.0,
            })]
        );
        assert_eq!(cli.cut_offs, vec![-0.5]);
    }

    #[test]
    fn malformed_command_lines_are_rejected() {
        assert!(parse("--sphere 0 0 0").is_err());
        assert_eq!(
            parse("--columns ten").unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse("--frobnicate").unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
        assert!(parse("-o").is_err());
    }

    #[test]
    fn help_is_reported_as_display_help() {
        assert_eq!(parse("-h").unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse("--help").unwrap_err().kind(), ErrorKind::DisplayHelp);
    }
}
