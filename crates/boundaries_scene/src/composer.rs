use std::path::PathBuf;

use boundaries_assets::AssetServer;
use boundaries_core::BoundariesConfig;
use boundaries_renderer::{GridMeshBuilder, MeshError, ShaderAssembler, Surface, Tessellation};
use log::{debug, info};

use crate::depth_capture::{DepthCapture, DepthCaptureStage};
use crate::graph::{ComposedScene, SceneNode};
use crate::registry::{BoundaryRegistry, BoundaryVolume};

/// A boundary as requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryRequest {
    Shape(BoundaryVolume),
    Model(PathBuf),
}

/// What to compose. Repeated settings keep every occurrence; the composer
/// applies them in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRequest {
    /// Draw boundaries in the main pass (`-b`).
    pub show_boundaries: bool,
    /// Capture boundary depth for the surface shader (`-d`).
    pub depth_capture: bool,
    pub boundaries: Vec<BoundaryRequest>,
    pub columns: u32,
    pub rows: u32,
    pub shaders: Vec<PathBuf>,
    pub defines: Vec<(String, String)>,
    pub cut_offs: Vec<f32>,
}

impl SceneRequest {
    pub fn new(config: &BoundariesConfig) -> Self {
        Self {
            show_boundaries: false,
            depth_capture: false,
            boundaries: Vec::new(),
            columns: config.default_columns,
            rows: config.default_rows,
            shaders: Vec::new(),
            defines: Vec::new(),
            cut_offs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Init,
    BoundariesCollected,
    DepthCaptured,
    SurfaceBuilt,
    ShaderAttached,
    Composed,
}

#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    #[error("cannot {step} in state {state:?}")]
    InvalidTransition {
        step: &'static str,
        state: ComposerState,
    },
    #[error("invalid surface: {0}")]
    Configuration(#[from] MeshError),
}

/// Builds a `ComposedScene` step by step. Each step is valid in exactly one
/// state (surface building in two: with or without depth capture).
pub struct SceneComposer {
    config: BoundariesConfig,
    assets: AssetServer,
    state: ComposerState,
    registry: BoundaryRegistry,
    capture: Option<DepthCapture>,
    surface: Option<Surface>,
}

impl SceneComposer {
    pub fn new(config: BoundariesConfig, assets: AssetServer) -> Self {
        let tessellation = Tessellation::new(config.shape_slices, config.shape_stacks);
        Self {
            config,
            assets,
            state: ComposerState::Init,
            registry: BoundaryRegistry::new(tessellation),
            capture: None,
            surface: None,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn registry(&self) -> &BoundaryRegistry {
        &self.registry
    }

    fn advance(&mut self, to: ComposerState) {
        debug!("SceneComposer: {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn expect_state(&self, step: &'static str, from: &[ComposerState]) -> Result<(), ComposeError> {
        if from.contains(&self.state) {
            Ok(())
        } else {
            Err(ComposeError::InvalidTransition {
                step,
                state: self.state,
            })
        }
    }

    /// Registers boundaries in request order. Models that fail to load are
    /// skipped.
    pub fn collect_boundaries(&mut self, requests: &[BoundaryRequest]) -> Result<(), ComposeError> {
        self.expect_state("collect boundaries", &[ComposerState::Init])?;

        for request in requests {
            match request {
                BoundaryRequest::Shape(volume) => {
                    self.registry.add(volume.clone());
                }
                BoundaryRequest::Model(path) => {
                    self.registry.add_model(&self.assets, path);
                }
            }
        }

        self.advance(ComposerState::BoundariesCollected);
        Ok(())
    }

    pub fn capture_depth(&mut self) -> Result<(), ComposeError> {
        self.expect_state("capture depth", &[ComposerState::BoundariesCollected])?;

        let stage = DepthCaptureStage::from_config(&self.config);
        self.capture = Some(stage.capture(&self.registry));

        self.advance(ComposerState::DepthCaptured);
        Ok(())
    }

    /// Fails on a grid the builder rejects; the composer stays in its
    /// current state.
    pub fn build_surface(&mut self, columns: u32, rows: u32) -> Result<(), ComposeError> {
        let from = [
            ComposerState::BoundariesCollected,
            ComposerState::DepthCaptured,
        ];
        self.expect_state("build surface", &from)?;

        let surface = GridMeshBuilder::from_config(&self.config, columns, rows).build()?;
        self.surface = Some(surface);

        self.advance(ComposerState::SurfaceBuilt);
        Ok(())
    }

    /// Loads shader units and attaches the program, defines, `cutOff` and
    /// depth texture bindings to the surface.
    pub fn attach_shader(
        &mut self,
        shaders: &[PathBuf],
        defines: &[(String, String)],
        cut_offs: &[f32],
    ) -> Result<(), ComposeError> {
        self.expect_state("attach shader", &[ComposerState::SurfaceBuilt])?;

        if let Some(surface) = self.surface.as_mut() {
            let units = shaders.iter().map(|path| self.assets.load_shader(path));
            ShaderAssembler::new(self.config.default_cut_off).assemble(
                &mut surface.render_state,
                units,
                defines,
                cut_offs,
            );

            if let Some(capture) = &self.capture {
                surface.render_state.bind_depth_pairs(capture.len());
            }
        }

        self.advance(ComposerState::ShaderAttached);
        Ok(())
    }

    /// Assembles the root group and hands over ownership of everything built.
    pub fn compose(&mut self, show_boundaries: bool) -> Result<ComposedScene, ComposeError> {
        self.expect_state("compose", &[ComposerState::ShaderAttached])?;

        let registry = std::mem::take(&mut self.registry);
        let capture = self.capture.take().unwrap_or_default();
        let mut children = Vec::new();

        // 1. Boundaries drawn in the main pass
        if show_boundaries {
            children.extend(registry.handles().map(SceneNode::Boundary));
        }

        // 2. Pre-render depth cameras
        children.extend(capture.cameras.into_iter().map(SceneNode::CaptureCamera));

        // 3. The surface itself
        if let Some(surface) = self.surface.take() {
            children.push(SceneNode::Surface(Box::new(surface)));
        }

        self.advance(ComposerState::Composed);

        Ok(ComposedScene {
            registry,
            children,
            front_textures: capture.front_textures,
            back_textures: capture.back_textures,
        })
    }

    /// Runs every step for `request`.
    pub fn run(mut self, request: &SceneRequest) -> Result<ComposedScene, ComposeError> {
        self.collect_boundaries(&request.boundaries)?;
        info!("Registered {} boundaries", self.registry.len());

        if request.depth_capture {
            self.capture_depth()?;
        }

        self.build_surface(request.columns, request.rows)?;
        self.attach_shader(&request.shaders, &request.defines, &request.cut_offs)?;
        self.compose(request.show_boundaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boundaries_renderer::render_state::{CUT_OFF_UNIFORM, NUM_BOUNDARIES_UNIFORM};
    use boundaries_assets::ShaderStage;
    use boundaries_renderer::{DepthFace, UniformValue};
    use glam::Vec3;

    fn composer() -> SceneComposer {
        SceneComposer::new(BoundariesConfig::default(), AssetServer::new())
    }

    fn sphere(x: f32) -> BoundaryRequest {
        BoundaryRequest::Shape(BoundaryVolume::Sphere {
            center: Vec3::new(x, 0.0, 0.0),
            radius: 0.5,
        })
    }

    fn request(boundaries: Vec<BoundaryRequest>) -> SceneRequest {
        SceneRequest {
            boundaries,
            ..SceneRequest::new(&BoundariesConfig::default())
        }
    }

    #[test]
    fn composes_surface_only_by_default() {
        let scene = composer().run(&request(vec![sphere(0.0)])).unwrap();

        assert_eq!(scene.children.len(), 1);
        let surface = scene.surface().expect("surface");
        assert_eq!((surface.u_cells, surface.v_cells), (10, 10));
        assert!(scene.front_textures.is_empty());
        assert!(surface.render_state.textures.is_empty());
        assert_eq!(
            surface.render_state.uniform(CUT_OFF_UNIFORM),
            Some(UniformValue::Float(0.001))
        );
        assert_eq!(scene.registry.len(), 1);
    }

    #[test]
    fn child_order_is_boundaries_cameras_surface() {
        let mut req = request(vec![sphere(0.0), sphere(1.0)]);
        req.show_boundaries = true;
        req.depth_capture = true;

        let scene = composer().run(&req).unwrap();
        let kinds: Vec<_> = scene
            .children
            .iter()
            .map(|node| match node {
                SceneNode::Boundary(h) => format!("b{}", h.index),
                SceneNode::CaptureCamera(c) => format!("c{}{:?}", c.boundary.index, c.face),
                SceneNode::Surface(_) => "s".to_string(),
            })
            .collect();

        assert_eq!(
            kinds,
            vec!["b0", "b1", "c0Front", "c0Back", "c1Front", "c1Back", "s"]
        );
        assert_eq!(scene.front_textures.len(), 2);
        assert_eq!(scene.back_textures.len(), 2);
    }

    #[test]
    fn depth_capture_binds_textures_on_surface() {
        let mut req = request(vec![sphere(0.0), sphere(1.0), sphere(2.0)]);
        req.depth_capture = true;

        let scene = composer().run(&req).unwrap();
        let state = &scene.surface().unwrap().render_state;

        assert_eq!(state.textures.len(), 6);
        assert_eq!(state.textures[5].face, DepthFace::Back);
        assert_eq!(state.textures[5].unit, 5);
        assert_eq!(state.uniform(NUM_BOUNDARIES_UNIFORM), Some(UniformValue::Int(3)));
    }

    #[test]
    fn depth_capture_without_boundaries_is_empty() {
        let mut req = request(Vec::new());
        req.depth_capture = true;

        let scene = composer().run(&req).unwrap();
        assert!(scene.front_textures.is_empty());
        assert_eq!(scene.capture_cameras().count(), 0);
    }

    #[test]
    fn zero_cells_abort_composition() {
        let mut req = request(Vec::new());
        req.columns = 0;

        let err = composer().run(&req).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Configuration(MeshError::ZeroCells { u_cells: 0, v_cells: 10 })
        ));
    }

    #[test]
    fn failed_model_is_omitted() {
        let missing = std::env::temp_dir().join("boundaries_composer_missing.glb");
        let _ = std::fs::remove_file(&missing);

        let scene = composer()
            .run(&request(vec![sphere(0.0), BoundaryRequest::Model(missing), sphere(1.0)]))
            .unwrap();
        assert_eq!(scene.registry.len(), 2);
    }

    #[test]
    fn shader_files_attach_to_surface() {
        let dir = std::env::temp_dir();
        let vert = dir.join("boundaries_composer_shader.vert");
        let frag = dir.join("boundaries_composer_shader.frag");
        let frag_override = dir.join("boundaries_composer_override.frag");
        let missing = dir.join("boundaries_composer_missing.frag");
        std::fs::write(&vert, "void main() { gl_Position = vec4(0.0); }\n").unwrap();
        std::fs::write(&frag, "void main() {}\n").unwrap();
        std::fs::write(&frag_override, "void main() { discard; }\n").unwrap();
        let _ = std::fs::remove_file(&missing);

        let mut req = request(vec![sphere(0.0)]);
        req.show_boundaries = true;
        req.shaders = vec![vert.clone(), frag.clone(), missing, frag_override.clone()];
        req.defines = vec![
            ("Z_FUNCTION".to_string(), "x * x".to_string()),
            ("VISIBLE_FUNCTION".to_string(), "true".to_string()),
        ];
        req.cut_offs = vec![0.02];

        let scene = composer().run(&req).unwrap();
        let state = &scene.surface().unwrap().render_state;
        let program = state.program.as_ref().expect("program attached");

        assert_eq!(program.units.len(), 2);
        assert_eq!(
            program.unit(ShaderStage::Fragment).map(|u| u.source.as_str()),
            Some("void main() { discard; }\n")
        );
        assert!(program.unit(ShaderStage::Vertex).is_some());
        assert_eq!(state.define("Z_FUNCTION"), Some("x * x"));
        assert_eq!(state.define("VISIBLE_FUNCTION"), Some("true"));
        assert_eq!(state.uniform(CUT_OFF_UNIFORM), Some(UniformValue::Float(0.02)));

        // Boundaries are bare handles; render state lives on the surface only
        assert_eq!(scene.visible_boundaries().count(), 1);
        assert_eq!(scene.children.len(), 2);

        for path in [vert, frag, frag_override] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let mut composer = composer();
        assert!(matches!(
            composer.build_surface(2, 2),
            Err(ComposeError::InvalidTransition {
                state: ComposerState::Init,
                ..
            })
        ));

        composer.collect_boundaries(&[]).unwrap();
        composer.build_surface(2, 2).unwrap();
        assert!(composer.capture_depth().is_err());
        assert_eq!(composer.state(), ComposerState::SurfaceBuilt);

        composer.attach_shader(&[], &[], &[]).unwrap();
        composer.compose(false).unwrap();
        assert_eq!(composer.state(), ComposerState::Composed);
        assert!(composer.compose(false).is_err());
    }
}
