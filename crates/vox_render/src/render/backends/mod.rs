//! Device backend implementations
//!
//! Only a headless recording backend lives in this crate. Hardware backends
//! implement [`RenderDevice`](crate::render::RenderDevice) in the engine
//! crate that owns the graphics context.

pub mod recording;

pub use recording::{DeviceCommand, RecordingDevice, UniformValue};
