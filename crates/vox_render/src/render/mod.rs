//! Rendering system
//!
//! Per-frame orchestration of the deferred voxel pipeline. The
//! [`FrameSequencer`] composes the passes in [`passes`] into one frame,
//! driving a [`RenderDevice`] through the scoped guards in [`guards`].
//! Frame buffers and programs are looked up in a [`RenderResources`]
//! registry; everything the frame reads is captured in a [`FrameSnapshot`]
//! before the first command is issued.

pub mod api;
pub mod backends;
pub mod camera;
pub mod frame;
pub mod guards;
pub mod passes;
pub mod resources;
pub mod scene;
pub mod sequencer;
pub mod systems;

pub use api::*;
pub use camera::CameraPose;
pub use frame::{CameraMode, FrameSnapshot, FrameTiming, GameMode, WindowExtent};
pub use resources::{FrameBufferKey, RenderResources, RenderResourcesBuilder, ShaderKey};
pub use scene::{
    CharacterSheet, ChunkSource, ChunkStats, DynamicLight, FrontEnd, InstanceSource, InstanceStats,
    ItemSource, LightingSource, Overlay, ParticleSource, ParticleStats, PlayerSource,
    PosedManagerStats, ProjectileSource, RenderVariant, Renderable, SceneContext, SkyboxSource,
    WindowSurface,
};
pub use sequencer::{FrameOutcome, FrameSequencer};
pub use systems::lighting::{LightId, LightingManager};

use thiserror::Error;

use crate::config::ConfigError;

/// Rendering errors
///
/// Raised while assembling the pipeline or when auditing a recorded frame.
/// Issuing a frame never fails: device calls are infallible and a minimized
/// window is reported through [`FrameOutcome`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// A required frame buffer was never registered
    #[error("Frame buffer {0:?} is not registered")]
    MissingFrameBuffer(FrameBufferKey),

    /// A required shader program was never registered
    #[error("Shader {0:?} is not registered")]
    MissingShader(ShaderKey),

    /// Settings or resources that cannot drive a frame
    #[error("Invalid render configuration: {0}")]
    InvalidConfiguration(String),

    /// Nesting defects found in a recorded command stream
    #[error("{} binding violation(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    BindingViolations(Vec<BindingViolation>),

    /// Settings could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A bracket nested incorrectly on a device
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingViolation {
    /// `pop_matrix` with an empty stack
    #[error("matrix stack popped while empty")]
    MatrixUnderflow,

    /// The matrix stack was not back at zero depth
    #[error("matrix stack left at depth {depth}")]
    UnbalancedMatrix {
        /// Depth when the check ran
        depth: usize,
    },

    /// A program was bound inside another program's bracket
    #[error("shader {requested:?} bound while {bound:?} is still bound")]
    ShaderAlreadyBound {
        /// Program already bound
        bound: ShaderId,
        /// Program being bound
        requested: ShaderId,
    },

    /// `end_shader` named a program that is not bound
    #[error("end_shader({found:?}) while {expected:?} is bound")]
    ShaderMismatch {
        /// Program actually bound
        expected: Option<ShaderId>,
        /// Program being ended
        found: ShaderId,
    },

    /// A program was still bound at the end of the stream
    #[error("shader {0:?} never ended")]
    ShaderLeftBound(ShaderId),

    /// A uniform written with its program not bound
    #[error("uniform '{name}' of {shader:?} written outside its shader bracket")]
    UniformOutsideShader {
        /// Program named by the write
        shader: ShaderId,
        /// Uniform name
        name: String,
    },

    /// A texture unit prepared with no program bound
    #[error("texture unit {unit} prepared outside a shader bracket")]
    TextureOutsideShader {
        /// Texture unit
        unit: u32,
    },

    /// A texture unit still prepared when its program ended
    #[error("texture unit {unit} never emptied")]
    TextureUnitLeaked {
        /// Texture unit
        unit: u32,
    },

    /// `stop_render_to` did not match the innermost active frame buffer
    #[error("stop_render_to({found:?}) while {expected:?} is innermost")]
    FrameBufferOrder {
        /// Innermost active frame buffer
        expected: Option<FrameBufferId>,
        /// Frame buffer being stopped
        found: FrameBufferId,
    },

    /// A frame buffer still active at the end of the stream
    #[error("frame buffer {0:?} never stopped")]
    FrameBufferLeftActive(FrameBufferId),

    /// Immediate-mode call outside (or inside) a batch
    #[error("immediate mode misuse: {0}")]
    ImmediateMisuse(&'static str),

    /// Mesh render bracket misuse
    #[error("mesh render misuse: {0}")]
    MeshMisuse(&'static str),

    /// Scene bracket misuse
    #[error("scene misuse: {0}")]
    SceneMisuse(&'static str),
}

#[cfg(test)]
mod tests;
