//! Frame buffer and shader registry
//!
//! Offscreen targets and programs are created by the engine at start-up and
//! handed to the renderer through [`RenderResourcesBuilder`]. Passes look
//! them up by semantic key; `build` guarantees every required entry exists,
//! so lookups during a frame cannot fail.

use super::api::{FontId, FrameBufferId, ShaderId};
use super::{RenderError, RenderResult};

/// Offscreen render targets used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameBufferKey {
    /// Depth-only shadow map
    Shadow,
    /// Geometry buffer: depth, normal, position, diffuse
    Ssao,
    /// Light volume accumulation
    Lighting,
    /// Alpha-blended geometry
    Transparency,
    /// SSAO output read by FXAA
    Fxaa,
    /// Input of the horizontal blur pass
    BlurFirst,
    /// Input of the vertical blur pass
    BlurSecond,
    /// Paperdoll geometry
    Paperdoll,
    /// Paperdoll composite output
    PaperdollSsao,
}

impl FrameBufferKey {
    /// Every key, in registry order
    pub const ALL: [Self; 9] = [
        Self::Shadow,
        Self::Ssao,
        Self::Lighting,
        Self::Transparency,
        Self::Fxaa,
        Self::BlurFirst,
        Self::BlurSecond,
        Self::Paperdoll,
        Self::PaperdollSsao,
    ];

    /// Slot of this key in the registry
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Shader programs used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKey {
    /// Plain lit geometry
    Default,
    /// Geometry receiving the shadow map
    Shadow,
    /// Skybox
    CubeMap,
    /// Light volumes
    Lighting,
    /// Deferred composite
    Ssao,
    /// Anti-aliasing; optional
    Fxaa,
    /// Horizontal blur
    BlurHorizontal,
    /// Vertical blur
    BlurVertical,
    /// Paperdoll geometry
    Paperdoll,
    /// Textured geometry (paperdoll face)
    Texture,
}

impl ShaderKey {
    /// Every key, in registry order
    pub const ALL: [Self; 10] = [
        Self::Default,
        Self::Shadow,
        Self::CubeMap,
        Self::Lighting,
        Self::Ssao,
        Self::Fxaa,
        Self::BlurHorizontal,
        Self::BlurVertical,
        Self::Paperdoll,
        Self::Texture,
    ];

    /// Slot of this key in the registry
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the pipeline can run without this program
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Fxaa)
    }
}

/// Validated registry of frame buffers, programs and the debug font
#[derive(Debug, Clone)]
pub struct RenderResources {
    frame_buffers: [FrameBufferId; FrameBufferKey::ALL.len()],
    shaders: [ShaderId; ShaderKey::ALL.len()],
    font: FontId,
}

impl RenderResources {
    /// Start registering resources
    pub fn builder() -> RenderResourcesBuilder {
        RenderResourcesBuilder::new()
    }

    /// Frame buffer registered for `key`
    pub const fn frame_buffer(&self, key: FrameBufferKey) -> FrameBufferId {
        self.frame_buffers[key.index()]
    }

    /// Program registered for `key`
    ///
    /// For the optional FXAA program this returns [`ShaderId::INVALID`] when
    /// none was registered; use [`Self::fxaa_shader`] instead.
    pub const fn shader(&self, key: ShaderKey) -> ShaderId {
        self.shaders[key.index()]
    }

    /// The FXAA program, if one was registered
    pub fn fxaa_shader(&self) -> Option<ShaderId> {
        Some(self.shader(ShaderKey::Fxaa)).filter(|id| id.is_valid())
    }

    /// Font used for debug text
    pub const fn font(&self) -> FontId {
        self.font
    }
}

/// Builder for [`RenderResources`]
#[derive(Debug, Clone)]
pub struct RenderResourcesBuilder {
    frame_buffers: [FrameBufferId; FrameBufferKey::ALL.len()],
    shaders: [ShaderId; ShaderKey::ALL.len()],
    font: FontId,
}

impl RenderResourcesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            frame_buffers: [FrameBufferId::INVALID; FrameBufferKey::ALL.len()],
            shaders: [ShaderId::INVALID; ShaderKey::ALL.len()],
            font: FontId(0),
        }
    }

    /// Register a frame buffer
    pub fn frame_buffer(mut self, key: FrameBufferKey, id: FrameBufferId) -> Self {
        log::debug!("Registered frame buffer {:?} -> {:?}", key, id);
        self.frame_buffers[key.index()] = id;
        self
    }

    /// Register a shader program
    pub fn shader(mut self, key: ShaderKey, id: ShaderId) -> Self {
        log::debug!("Registered shader {:?} -> {:?}", key, id);
        self.shaders[key.index()] = id;
        self
    }

    /// Set the debug text font
    pub const fn font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    /// Validate and build the registry
    pub fn build(self) -> RenderResult<RenderResources> {
        if let Some(key) = FrameBufferKey::ALL.into_iter().find(|k| !self.frame_buffers[k.index()].is_valid()) {
            return Err(RenderError::MissingFrameBuffer(key));
        }
        if let Some(key) = ShaderKey::ALL
            .into_iter()
            .find(|k| !k.is_optional() && !self.shaders[k.index()].is_valid())
        {
            return Err(RenderError::MissingShader(key));
        }
        if !self.shaders[ShaderKey::Fxaa.index()].is_valid() {
            log::warn!("No FXAA shader registered; anti-aliasing pass will be skipped");
        }

        Ok(RenderResources { frame_buffers: self.frame_buffers, shaders: self.shaders, font: self.font })
    }
}

impl Default for RenderResourcesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
