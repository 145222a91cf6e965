//! Public rendering API
//!
//! The device capability trait the sequencer drives, and the plain value
//! types that cross it.

pub mod device;
pub mod types;

pub use device::RenderDevice;
pub use types::{
    Attachment, BlendFactor, ClearFlags, ColourMask, CullMode, DepthTest, DirectionalLight,
    FontId, FrameBufferId, FrontFace, ImmediateMode, OrthographicBounds, ProjectionMode,
    RenderMode, ShaderId, TextureHandle, UniformLocation, Viewport,
};
