use std::collections::BTreeMap;

use boundaries_assets::{AssetError, ShaderSource, ShaderStage};
use log::{debug, warn};
use serde::Serialize;

use crate::render_state::{CUT_OFF_UNIFORM, NUM_BOUNDARIES_UNIFORM, RenderState, UniformValue};

/// Shader units keyed by stage, at most one per stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShaderProgram {
    pub units: BTreeMap<ShaderStage, ShaderSource>,
}

impl ShaderProgram {
    /// Adds a unit, returning the one it replaced for the same stage.
    pub fn add_unit(&mut self, unit: ShaderSource) -> Option<ShaderSource> {
        self.units.insert(unit.stage, unit)
    }

    pub fn unit(&self, stage: ShaderStage) -> Option<&ShaderSource> {
        self.units.get(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Source of `stage` with one `#define` line per entry injected after the
    /// `#version` directive.
    pub fn preprocessed_source(&self, stage: ShaderStage, defines: &[(String, String)]) -> Option<String> {
        self.unit(stage).map(|unit| inject_defines(&unit.source, defines))
    }

    /// Stages a wgpu bind group must be visible to. Geometry and tessellation
    /// stages have no wgpu counterpart.
    pub fn visibility(&self) -> wgpu::ShaderStages {
        self.units
            .keys()
            .filter_map(|stage| wgpu_stage(*stage))
            .fold(wgpu::ShaderStages::NONE, |acc, stage| acc | stage)
    }
}

pub fn wgpu_stage(stage: ShaderStage) -> Option<wgpu::ShaderStages> {
    match stage {
        ShaderStage::Vertex => Some(wgpu::ShaderStages::VERTEX),
        ShaderStage::Fragment => Some(wgpu::ShaderStages::FRAGMENT),
        ShaderStage::Compute => Some(wgpu::ShaderStages::COMPUTE),
        ShaderStage::TessControl | ShaderStage::TessEvaluation | ShaderStage::Geometry => None,
    }
}

fn inject_defines(source: &str, defines: &[(String, String)]) -> String {
    if defines.is_empty() {
        return source.to_string();
    }

    let block: String = defines
        .iter()
        .map(|(key, value)| format!("#define {key} {value}\n"))
        .collect();

    // `#version` must stay the first directive
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        offset += line.len();
        if line.trim_start().starts_with("#version") {
            let mut out = String::with_capacity(source.len() + block.len() + 1);
            out.push_str(&source[..offset]);
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&block);
            out.push_str(&source[offset..]);
            return out;
        }
    }

    block + source
}

/// Builds the surface program from loaded shader units and command-line
/// settings.
#[derive(Debug, Clone, Copy)]
pub struct ShaderAssembler {
    pub default_cut_off: f32,
}

impl Default for ShaderAssembler {
    fn default() -> Self {
        Self {
            default_cut_off: 0.001,
        }
    }
}

impl ShaderAssembler {
    pub fn new(default_cut_off: f32) -> Self {
        Self { default_cut_off }
    }

    /// Attaches program, defines and `cutOff` to `state`.
    ///
    /// Units that failed to load are skipped. Defines apply in order and the
    /// last value per key wins, as does the last entry of `cut_offs`.
    pub fn assemble<I>(
        &self,
        state: &mut RenderState,
        units: I,
        defines: &[(String, String)],
        cut_offs: &[f32],
    ) where
        I: IntoIterator<Item = Result<ShaderSource, AssetError>>,
    {
        let mut program = ShaderProgram::default();
        for unit in units {
            match unit {
                Ok(unit) => {
                    debug!("Shader unit {} ({:?})", unit.name, unit.stage);
                    if let Some(replaced) = program.add_unit(unit) {
                        debug!("Replaced shader unit {}", replaced.name);
                    }
                }
                Err(e) => warn!("Skipping shader unit: {e}"),
            }
        }

        for (key, value) in defines {
            state.set_define(key.as_str(), value.as_str());
        }

        let cut_off = cut_offs.last().copied().unwrap_or(self.default_cut_off);
        state.set_uniform(CUT_OFF_UNIFORM, UniformValue::Float(cut_off));
        state.set_program(program);
    }
}

/// GPU layout of the surface shader's scalar uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize)]
pub struct CutOffUniform {
    pub cut_off: f32,
    pub num_boundaries: i32,
    #[serde(skip)]
    pub _padding: [f32; 2], // Align to 16 bytes
}

impl CutOffUniform {
    pub fn from_render_state(state: &RenderState) -> Self {
        let cut_off = match state.uniform(CUT_OFF_UNIFORM) {
            Some(UniformValue::Float(v)) => v,
            _ => 0.0,
        };
        let num_boundaries = match state.uniform(NUM_BOUNDARIES_UNIFORM) {
            Some(UniformValue::Int(n)) => n,
            _ => 0,
        };

        Self {
            cut_off,
            num_boundaries,
            _padding: [0.0; 2],
        }
    }
}
