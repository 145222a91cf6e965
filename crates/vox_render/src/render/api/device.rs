//! Device abstraction trait for the frame sequencer
//!
//! This module defines the capability interface a graphics backend must
//! implement for the sequencer to drive it. Every method issues one command
//! into a single command stream; none of them can fail. A device that hits
//! an unrecoverable error is expected to abort rather than report it, and a
//! write to an unknown uniform is a no-op.
//!
//! The bracket pairs on this trait (`begin_scene`/`end_scene`,
//! `push_matrix`/`pop_matrix`, `start_render_to`/`stop_render_to`,
//! `begin_shader`/`end_shader`, `prepare_shader_texture`/`empty_texture`,
//! `enable_immediate`/`disable_immediate`) must nest. The sequencer never
//! calls them directly; it goes through the guards in
//! [`crate::render::guards`].

use super::types::{
    Attachment, BlendFactor, ClearFlags, ColourMask, CullMode, DepthTest, DirectionalLight,
    FontId, FrameBufferId, FrontFace, ImmediateMode, OrthographicBounds, ProjectionMode,
    RenderMode, ShaderId, TextureHandle, UniformLocation, Viewport,
};
use crate::foundation::math::{Colour, Vec3};

/// Graphics device capability interface
pub trait RenderDevice {
    // === Scene ===

    /// Begin a frame, clearing the selected back buffer channels
    fn begin_scene(&mut self, clear: ClearFlags);

    /// Finish the frame
    fn end_scene(&mut self);

    /// Clear channels of the current render target to `colour` / far depth
    fn clear_target(&mut self, clear: ClearFlags, colour: Colour);

    // === Transform stack ===

    /// Push a copy of the current world matrix
    fn push_matrix(&mut self);

    /// Restore the world matrix saved by the matching push
    fn pop_matrix(&mut self);

    /// Replace the current world matrix with identity
    fn load_identity(&mut self);

    /// Translate the current world matrix
    fn translate(&mut self, offset: Vec3);

    /// Rotate the current world matrix by Euler angles in degrees
    fn rotate(&mut self, euler_degrees: Vec3);

    /// Capture the current light-space transform into the texture matrix
    fn set_texture_matrix(&mut self);

    // === Projection and camera ===

    /// Select a projection for the given viewport
    fn set_projection_mode(&mut self, mode: ProjectionMode, viewport: Viewport);

    /// Set an explicit orthographic volume
    fn setup_orthographic_projection(&mut self, bounds: OrthographicBounds);

    /// Place the view with a look-at transform
    fn set_look_at_camera(&mut self, eye: Vec3, target: Vec3, up: Vec3);

    // === Frame buffers ===

    /// Redirect rendering into `frame_buffer`
    fn start_render_to(&mut self, frame_buffer: FrameBufferId);

    /// Stop rendering into `frame_buffer`, restoring the previous target
    fn stop_render_to(&mut self, frame_buffer: FrameBufferId);

    /// Texture backing one attachment of a frame buffer
    fn frame_buffer_texture(&self, frame_buffer: FrameBufferId, attachment: Attachment) -> TextureHandle;

    // === Shaders ===

    /// Bind a shader program
    fn begin_shader(&mut self, shader: ShaderId);

    /// Unbind a shader program
    fn end_shader(&mut self, shader: ShaderId);

    /// Look up a uniform by name
    fn uniform_location(&mut self, shader: ShaderId, name: &str) -> UniformLocation;

    /// Write an integer uniform of the bound program
    fn set_uniform_int(&mut self, shader: ShaderId, name: &str, value: i32);

    /// Write a float uniform of the bound program
    fn set_uniform_float(&mut self, shader: ShaderId, name: &str, value: f32);

    /// Write a vec4 uniform of the bound program
    fn set_uniform_vec4(&mut self, shader: ShaderId, name: &str, value: [f32; 4]);

    // === Texture units ===

    /// Activate texture `unit` and point the sampler uniform at it
    fn prepare_shader_texture(&mut self, unit: u32, location: UniformLocation);

    /// Bind a 2D texture to the active unit
    fn bind_texture(&mut self, texture: TextureHandle);

    /// Bind a cube map to the active unit
    fn bind_cube_texture(&mut self, texture: TextureHandle);

    /// Unbind the 2D texture on `unit`
    fn empty_texture(&mut self, unit: u32);

    /// Unbind the cube map on `unit`
    fn empty_cube_texture(&mut self, unit: u32);

    // === Render state ===

    /// Set face culling
    fn set_cull_mode(&mut self, mode: CullMode);

    /// Set front face winding
    fn set_front_face(&mut self, winding: FrontFace);

    /// Enable depth testing with `test`
    fn enable_depth_test(&mut self, test: DepthTest);

    /// Disable depth testing
    fn disable_depth_test(&mut self);

    /// Enable blending
    fn enable_transparency(&mut self, source: BlendFactor, destination: BlendFactor);

    /// Disable blending
    fn disable_transparency(&mut self);

    /// Enable hardware multisampling
    fn enable_multisampling(&mut self);

    /// Disable hardware multisampling
    fn disable_multisampling(&mut self);

    /// Set colour channel write mask
    fn set_colour_mask(&mut self, mask: ColourMask);

    /// Set fill/texturing mode
    fn set_render_mode(&mut self, mode: RenderMode);

    // === Lights ===

    /// Enable a fixed-function light in slot `index`
    fn enable_light(&mut self, light: &DirectionalLight, index: u32);

    /// Draw the light's marker geometry
    fn render_light(&mut self, light: &DirectionalLight);

    // === Mesh rendering ===

    /// Enable vertex/normal/colour arrays for mesh submission
    fn start_mesh_render(&mut self);

    /// Disable the mesh arrays
    fn end_mesh_render(&mut self);

    // === Immediate drawing ===

    /// Start an immediate-mode primitive batch
    fn enable_immediate(&mut self, mode: ImmediateMode);

    /// Emit a vertex
    fn immediate_vertex(&mut self, x: f32, y: f32, z: f32);

    /// Set the texture coordinate for the next vertex
    fn immediate_tex_coord(&mut self, u: f32, v: f32);

    /// Set the colour for following vertices
    fn immediate_colour(&mut self, colour: Colour);

    /// Flush the immediate-mode batch
    fn disable_immediate(&mut self);

    /// Draw a UV sphere at the current world matrix
    fn draw_sphere(&mut self, radius: f32, slices: u32, stacks: u32);

    // === Text ===

    /// Height in pixels of `sample` set in `font`
    fn text_height(&mut self, font: FontId, sample: &str) -> f32;

    /// Draw a line of text at pixel position (x, y)
    fn render_text(&mut self, font: FontId, x: f32, y: f32, scale: f32, colour: Colour, alpha: f32, text: &str);
}
