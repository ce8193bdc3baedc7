use serde::Serialize;

use crate::programs::ShaderProgram;
use crate::texture::DepthFace;

pub const CUT_OFF_UNIFORM: &str = "cutOff";
pub const NUM_BOUNDARIES_UNIFORM: &str = "numBoundaries";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

/// A depth texture of boundary `boundary` sampled by the surface shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureBinding {
    pub unit: u32,
    pub sampler_name: String,
    pub boundary: usize,
    pub face: DepthFace,
}

impl TextureBinding {
    pub fn depth(boundary: usize, face: DepthFace) -> Self {
        Self {
            unit: face.texture_unit(boundary),
            sampler_name: face.sampler_name(boundary),
            boundary,
            face,
        }
    }
}

/// State attached to a drawable: program, defines, uniforms and textures.
///
/// Every setter replaces an existing entry with the same key in place, so
/// repeated assignments keep first-insertion order and the last value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderState {
    pub program: Option<ShaderProgram>,
    pub defines: Vec<(String, String)>,
    pub uniforms: Vec<Uniform>,
    pub textures: Vec<TextureBinding>,
}

impl RenderState {
    pub fn set_program(&mut self, program: ShaderProgram) {
        self.program = Some(program);
    }

    pub fn set_define(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.defines.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.defines.push((key, value)),
        }
    }

    pub fn define(&self, key: &str) -> Option<&str> {
        self.defines
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        let name = name.into();
        match self.uniforms.iter_mut().find(|u| u.name == name) {
            Some(uniform) => uniform.value = value,
            None => self.uniforms.push(Uniform { name, value }),
        }
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.value)
    }

    pub fn bind_texture(&mut self, binding: TextureBinding) {
        match self.textures.iter_mut().find(|t| t.unit == binding.unit) {
            Some(slot) => *slot = binding,
            None => self.textures.push(binding),
        }
    }

    /// Binds the front and back depth textures of the first `count` boundaries
    /// and records how many pairs are bound.
    pub fn bind_depth_pairs(&mut self, count: usize) {
        for boundary in 0..count {
            self.bind_texture(TextureBinding::depth(boundary, DepthFace::Front));
            self.bind_texture(TextureBinding::depth(boundary, DepthFace::Back));
        }
        self.set_uniform(NUM_BOUNDARIES_UNIFORM, UniformValue::Int(count as i32));
    }
}
