use serde::Serialize;
use wgpu::{
    AddressMode, Extent3d, FilterMode, SamplerBorderColor, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl From<TextureFilter> for FilterMode {
    fn from(filter: TextureFilter) -> Self {
        match filter {
            TextureFilter::Nearest => FilterMode::Nearest,
            TextureFilter::Linear => FilterMode::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureWrap {
    ClampToEdge,
    ClampToBorder,
    Repeat,
}

impl From<TextureWrap> for AddressMode {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::ClampToEdge => AddressMode::ClampToEdge,
            TextureWrap::ClampToBorder => AddressMode::ClampToBorder,
            TextureWrap::Repeat => AddressMode::Repeat,
        }
    }
}

/// Which side of a boundary volume a depth texture records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DepthFace {
    /// Nearest surface, captured with back faces culled.
    Front,
    /// Farthest surface, captured with front faces culled.
    Back,
}

impl DepthFace {
    pub fn name(self) -> &'static str {
        match self {
            DepthFace::Front => "front",
            DepthFace::Back => "back",
        }
    }

    /// Boundary `n` samples its front depth at unit `2n` and its back depth at `2n + 1`.
    pub fn texture_unit(self, boundary: usize) -> u32 {
        let base = 2 * boundary as u32;
        match self {
            DepthFace::Front => base,
            DepthFace::Back => base + 1,
        }
    }

    pub fn sampler_name(self, boundary: usize) -> String {
        format!("{}DepthTexture{}", self.name(), boundary)
    }
}

/// A single-channel depth image an off-screen camera renders into and the
/// surface shader samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthTexture {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub border_color: [f32; 4],
}

impl DepthTexture {
    pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float; // Standard depth format

    /// Linear filtering, clamped to a border at maximum depth: lookups outside
    /// the rendered silhouette read back as infinitely far.
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::ClampToBorder,
            wrap_t: TextureWrap::ClampToBorder,
            border_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn for_boundary(face: DepthFace, boundary: usize, width: u32, height: u32) -> Self {
        Self::new(format!("{} depth texture {}", face.name(), boundary), width, height)
    }

    pub fn size(&self) -> Extent3d {
        Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    pub fn texture_descriptor(&self) -> TextureDescriptor<'_> {
        TextureDescriptor {
            label: Some(self.label.as_str()),
            size: self.size(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        }
    }

    /// wgpu only has three fixed border colors; anything else has no equivalent.
    pub fn wgpu_border_color(&self) -> Option<SamplerBorderColor> {
        let color = self.border_color;
        if color == [1.0, 1.0, 1.0, 1.0] {
            Some(SamplerBorderColor::OpaqueWhite)
        } else if color == [0.0, 0.0, 0.0, 1.0] {
            Some(SamplerBorderColor::OpaqueBlack)
        } else if color == [0.0; 4] {
            Some(SamplerBorderColor::TransparentBlack)
        } else {
            None
        }
    }

    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: Some(self.label.as_str()),
            address_mode_u: self.wrap_s.into(),
            address_mode_v: self.wrap_t.into(),
            mag_filter: self.mag_filter.into(),
            min_filter: self.min_filter.into(),
            border_color: self.wgpu_border_color(),
            ..Default::default()
        }
    }
}
