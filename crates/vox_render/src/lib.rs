//! # Vox Render
//!
//! Per-frame render orchestration for a deferred voxel renderer.
//!
//! ## Features
//!
//! - **Pass Sequencing**: shadow map, geometry buffer, light volumes,
//!   transparency, SSAO composite, FXAA, separable blur and 2D overlays in a
//!   fixed frame order
//! - **Scoped Brackets**: matrix, frame buffer, shader and texture-unit
//!   guards that restore device state on every exit path
//! - **Resource Registry**: frame buffers and programs looked up by semantic
//!   key, validated once at start-up
//! - **Headless Recording**: a command-recording device that audits bracket
//!   nesting, for tests and frame traces
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vox_render::prelude::*;
//!
//! let resources = RenderResources::builder()
//!     .frame_buffer(FrameBufferKey::Shadow, shadow_fbo)
//!     // ...every other frame buffer and shader
//!     .build()?;
//! let settings = RenderSettings::load_or_default("vox_render.toml")?;
//! let mut sequencer = FrameSequencer::new(resources, settings)?;
//!
//! // once per frame
//! let frame = FrameSnapshot { flags, window, camera, timing, ..FrameSnapshot::default() };
//! sequencer.render_frame(&mut device, &mut scene, &frame);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RenderFlags, RenderSettings},
        foundation::math::{Colour, Vec3},
        render::{
            backends::{DeviceCommand, RecordingDevice},
            CameraMode, CameraPose, DynamicLight, FrameBufferKey, FrameOutcome, FrameSequencer,
            FrameSnapshot, FrameTiming, GameMode, LightingManager, RenderDevice, RenderError,
            RenderResources, RenderResult, RenderVariant, Renderable, SceneContext, ShaderKey,
            WindowExtent,
        },
    };
}
