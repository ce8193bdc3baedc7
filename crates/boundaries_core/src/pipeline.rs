use serde::{Deserialize, Serialize};

/// When an off-screen camera runs relative to the main pass.
///
/// Variants are declared in execution order, so sorting cameras by
/// `RenderOrder` yields the order a host must render them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    /// Runs before the main camera, e.g. to fill textures the main pass samples.
    PreRender,
    NestedRender,
    PostRender,
}

impl RenderOrder {
    pub fn runs_before_main(self) -> bool {
        matches!(self, RenderOrder::PreRender)
    }
}
