//! Render passes
//!
//! Each pass is a free function over `&mut dyn RenderDevice` that opens its
//! brackets through [`guards`](crate::render::guards) and leaves the device
//! exactly as it found it: matrix depth, bound program, prepared texture
//! units and active frame buffers are all restored on every exit path.
//! The [`FrameSequencer`](crate::render::FrameSequencer) calls them in
//! frame order.

pub mod debug_text;
pub mod geometry;
pub mod lighting;
pub mod overlay;
pub mod paperdoll;
pub mod post;
pub mod shadow;
pub mod transparency;

use crate::config::{RenderFlags, RenderSettings};

use super::api::{DirectionalLight, FrameBufferId, ImmediateMode, ProjectionMode, RenderDevice, RenderMode, ShaderId, Viewport};
use super::camera::look_2d;
use super::frame::{FrameSnapshot, WindowExtent};
use super::guards::ImmediateScope;
use super::resources::{FrameBufferKey, RenderResources, ShaderKey};

/// Read-only state shared by every pass of a frame
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    /// This frame's snapshot
    pub frame: &'a FrameSnapshot,
    /// Frame buffers and programs
    pub resources: &'a RenderResources,
    /// Persistent render settings
    pub settings: &'a RenderSettings,
    /// Default directional light
    pub light: &'a DirectionalLight,
}

impl<'a> PassContext<'a> {
    /// This frame's toggles
    pub const fn flags(&self) -> &'a RenderFlags {
        &self.frame.flags
    }

    /// Frame buffer for `key`
    pub const fn frame_buffer(&self, key: FrameBufferKey) -> FrameBufferId {
        self.resources.frame_buffer(key)
    }

    /// Program for `key`
    pub const fn shader(&self, key: ShaderKey) -> ShaderId {
        self.resources.shader(key)
    }
}

/// Pixel-space projection and the fixed overlay camera
pub(crate) fn begin_2d(device: &mut dyn RenderDevice, viewport: Viewport) {
    device.set_projection_mode(ProjectionMode::TwoD, viewport);
    look_2d(device);
}

/// Textured quad covering `window` at depth `z`
pub(crate) fn fullscreen_quad(device: &mut dyn RenderDevice, window: WindowExtent, z: f32) {
    let (width, height) = (window.width_f32(), window.height_f32());

    device.set_render_mode(RenderMode::Textured);
    let mut quad = ImmediateScope::begin(device, ImmediateMode::Quads);
    quad.textured_vertex(0.0, 0.0, 0.0, 0.0, z);
    quad.textured_vertex(1.0, 0.0, width, 0.0, z);
    quad.textured_vertex(1.0, 1.0, width, height, z);
    quad.textured_vertex(0.0, 1.0, 0.0, height, z);
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::render::api::FontId;

    pub fn resources() -> RenderResources {
        let builder = FrameBufferKey::ALL
            .into_iter()
            .zip(1..)
            .fold(RenderResources::builder(), |b, (key, id)| b.frame_buffer(key, FrameBufferId(id)));
        ShaderKey::ALL
            .into_iter()
            .zip(100..)
            .fold(builder, |b, (key, id)| b.shader(key, ShaderId(id)))
            .font(FontId(1))
            .build()
            .unwrap()
    }

    pub fn light(settings: &RenderSettings) -> DirectionalLight {
        geometry::directional_light(&settings.default_light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::{DeviceCommand, RecordingDevice};

    #[test]
    fn test_fullscreen_quad_spans_window() {
        let mut device = RecordingDevice::new();
        fullscreen_quad(&mut device, WindowExtent { width: 640, height: 480 }, 1.0);

        let vertices: Vec<[f32; 3]> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::ImmediateVertex(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(
            vertices,
            vec![[0.0, 0.0, 1.0], [640.0, 0.0, 1.0], [640.0, 480.0, 1.0], [0.0, 480.0, 1.0]]
        );
        assert_eq!(device.commands()[0], DeviceCommand::SetRenderMode(RenderMode::Textured));
        assert!(device.audit().is_ok());
    }
}
