//! # Scoped Device Guards
//!
//! Every bracket on [`RenderDevice`] has a guard here. Constructing the guard
//! issues the opening command; dropping it issues the closing one, so every
//! exit path of a pass (including early returns) leaves the device balanced.
//!
//! Guards dereference to the device they wrap. Nested brackets borrow from
//! the enclosing guard, which makes the borrow checker enforce LIFO order:
//!
//! ```rust,ignore
//! let mut matrix = MatrixScope::push(device);
//! let mut target = FrameBufferScope::start(&mut *matrix, lighting_buffer);
//! let mut shader = ShaderScope::begin(&mut *target, lighting_shader);
//! shader.bind_frame_buffer_texture(0, "normals", gbuffer, Attachment::Normal);
//! // shader units emptied, shader ended, target stopped, matrix popped
//! ```

use std::ops::{Deref, DerefMut};

use super::api::{
    Attachment, BlendFactor, ClearFlags, ColourMask, CullMode, DepthTest, FrameBufferId,
    FrontFace, ImmediateMode, RenderDevice, ShaderId, TextureHandle, UniformLocation,
};

/// Implements `Deref`/`DerefMut` to the wrapped device for a guard type
macro_rules! deref_to_device {
    ($guard:ident) => {
        impl<'a, D: RenderDevice + ?Sized> Deref for $guard<'a, D> {
            type Target = D;

            fn deref(&self) -> &D {
                self.device
            }
        }

        impl<'a, D: RenderDevice + ?Sized> DerefMut for $guard<'a, D> {
            fn deref_mut(&mut self) -> &mut D {
                self.device
            }
        }
    };
}

/// `begin_scene` / `end_scene`
pub struct SceneScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> SceneScope<'a, D> {
    /// Begin the scene, clearing `clear`
    pub fn begin(device: &'a mut D, clear: ClearFlags) -> Self {
        device.begin_scene(clear);
        Self { device }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for SceneScope<'a, D> {
    fn drop(&mut self) {
        self.device.end_scene();
    }
}

deref_to_device!(SceneScope);

/// `push_matrix` / `pop_matrix`
pub struct MatrixScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> MatrixScope<'a, D> {
    /// Push the world matrix
    pub fn push(device: &'a mut D) -> Self {
        device.push_matrix();
        Self { device }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for MatrixScope<'a, D> {
    fn drop(&mut self) {
        self.device.pop_matrix();
    }
}

deref_to_device!(MatrixScope);

/// `start_render_to` / `stop_render_to`, optionally a no-op
///
/// With no target the guard issues nothing and rendering continues into
/// whatever target is already active.
pub struct FrameBufferScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
    target: Option<FrameBufferId>,
}

impl<'a, D: RenderDevice + ?Sized> FrameBufferScope<'a, D> {
    /// Redirect rendering into `frame_buffer`
    pub fn start(device: &'a mut D, frame_buffer: FrameBufferId) -> Self {
        Self::optional(device, Some(frame_buffer))
    }

    /// Redirect rendering into `target` when there is one
    pub fn optional(device: &'a mut D, target: Option<FrameBufferId>) -> Self {
        if let Some(frame_buffer) = target {
            device.start_render_to(frame_buffer);
        }
        Self { device, target }
    }

    /// The frame buffer being rendered into, if any
    pub const fn target(&self) -> Option<FrameBufferId> {
        self.target
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for FrameBufferScope<'a, D> {
    fn drop(&mut self) {
        if let Some(frame_buffer) = self.target {
            self.device.stop_render_to(frame_buffer);
        }
    }
}

deref_to_device!(FrameBufferScope);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    Flat,
    Cube,
}

/// Shader binding context: program, texture units and uniforms
///
/// Texture units prepared through the scope are emptied in reverse order
/// before the program is unbound. An optional scope with no program issues
/// nothing, which is how wireframe rendering bypasses shading.
pub struct ShaderScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
    shader: Option<ShaderId>,
    units: Vec<(u32, UnitKind)>,
}

impl<'a, D: RenderDevice + ?Sized> ShaderScope<'a, D> {
    /// Bind `shader`
    pub fn begin(device: &'a mut D, shader: ShaderId) -> Self {
        Self::optional(device, Some(shader))
    }

    /// Bind `shader` when there is one
    pub fn optional(device: &'a mut D, shader: Option<ShaderId>) -> Self {
        if let Some(shader) = shader {
            device.begin_shader(shader);
        }
        Self { device, shader, units: Vec::new() }
    }

    /// The bound program, if any
    pub const fn shader(&self) -> Option<ShaderId> {
        self.shader
    }

    /// Texture units currently prepared through this scope
    pub fn prepared_units(&self) -> impl Iterator<Item = u32> + '_ {
        self.units.iter().map(|(unit, _)| *unit)
    }

    /// Look up a uniform of the bound program
    pub fn location(&mut self, name: &str) -> UniformLocation {
        match self.shader {
            Some(shader) => self.device.uniform_location(shader, name),
            None => UniformLocation::UNKNOWN,
        }
    }

    /// Write an integer uniform
    pub fn set_int(&mut self, name: &str, value: i32) {
        if let Some(shader) = self.shader {
            self.device.set_uniform_int(shader, name, value);
        }
    }

    /// Write a boolean uniform as 0/1
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, i32::from(value));
    }

    /// Write a float uniform
    pub fn set_float(&mut self, name: &str, value: f32) {
        if let Some(shader) = self.shader {
            self.device.set_uniform_float(shader, name, value);
        }
    }

    /// Write a vec4 uniform
    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        if let Some(shader) = self.shader {
            self.device.set_uniform_vec4(shader, name, value);
        }
    }

    /// Bind a 2D texture on `unit` to the sampler `uniform`
    pub fn bind_texture(&mut self, unit: u32, uniform: &str, texture: TextureHandle) {
        if self.prepare(unit, uniform, UnitKind::Flat) {
            self.device.bind_texture(texture);
        }
    }

    /// Bind a cube map on `unit` to the sampler `uniform`
    pub fn bind_cube_texture(&mut self, unit: u32, uniform: &str, texture: TextureHandle) {
        if self.prepare(unit, uniform, UnitKind::Cube) {
            self.device.bind_cube_texture(texture);
        }
    }

    /// Bind one attachment of a frame buffer on `unit`
    pub fn bind_frame_buffer_texture(
        &mut self,
        unit: u32,
        uniform: &str,
        frame_buffer: FrameBufferId,
        attachment: Attachment,
    ) {
        let texture = self.device.frame_buffer_texture(frame_buffer, attachment);
        self.bind_texture(unit, uniform, texture);
    }

    fn prepare(&mut self, unit: u32, uniform: &str, kind: UnitKind) -> bool {
        if self.shader.is_none() {
            return false;
        }
        let location = self.location(uniform);
        self.device.prepare_shader_texture(unit, location);
        match self.units.iter_mut().find(|(prepared, _)| *prepared == unit) {
            Some(entry) => entry.1 = kind,
            None => self.units.push((unit, kind)),
        }
        true
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for ShaderScope<'a, D> {
    fn drop(&mut self) {
        for (unit, kind) in self.units.drain(..).rev() {
            match kind {
                UnitKind::Flat => self.device.empty_texture(unit),
                UnitKind::Cube => self.device.empty_cube_texture(unit),
            }
        }
        if let Some(shader) = self.shader {
            self.device.end_shader(shader);
        }
    }
}

deref_to_device!(ShaderScope);

/// `enable_immediate` / `disable_immediate`
pub struct ImmediateScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> ImmediateScope<'a, D> {
    /// Start an immediate-mode batch
    pub fn begin(device: &'a mut D, mode: ImmediateMode) -> Self {
        device.enable_immediate(mode);
        Self { device }
    }

    /// Emit a textured vertex
    pub fn textured_vertex(&mut self, u: f32, v: f32, x: f32, y: f32, z: f32) {
        self.device.immediate_tex_coord(u, v);
        self.device.immediate_vertex(x, y, z);
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for ImmediateScope<'a, D> {
    fn drop(&mut self) {
        self.device.disable_immediate();
    }
}

deref_to_device!(ImmediateScope);

/// `start_mesh_render` / `end_mesh_render`
pub struct MeshScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> MeshScope<'a, D> {
    /// Enable mesh arrays
    pub fn begin(device: &'a mut D) -> Self {
        device.start_mesh_render();
        Self { device }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for MeshScope<'a, D> {
    fn drop(&mut self) {
        self.device.end_mesh_render();
    }
}

deref_to_device!(MeshScope);

/// Colour write mask, restored to all channels on drop
pub struct ColourMaskScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> ColourMaskScope<'a, D> {
    /// Apply `mask`
    pub fn set(device: &'a mut D, mask: ColourMask) -> Self {
        device.set_colour_mask(mask);
        Self { device }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for ColourMaskScope<'a, D> {
    fn drop(&mut self) {
        self.device.set_colour_mask(ColourMask::ALL);
    }
}

deref_to_device!(ColourMaskScope);

/// Cull mode, restored to a caller-chosen mode on drop
pub struct CullScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
    restore: CullMode,
}

impl<'a, D: RenderDevice + ?Sized> CullScope<'a, D> {
    /// Apply `mode`; `restore` is applied on drop
    pub fn set(device: &'a mut D, mode: CullMode, restore: CullMode) -> Self {
        device.set_cull_mode(mode);
        Self { device, restore }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for CullScope<'a, D> {
    fn drop(&mut self) {
        self.device.set_cull_mode(self.restore);
    }
}

deref_to_device!(CullScope);

/// Additive, depth-test-free state for light volume accumulation
///
/// On drop the default opaque state is restored: counter-clockwise front
/// faces, blending off, back-face culling, `Less` depth testing.
pub struct AdditiveBlendScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: RenderDevice + ?Sized> AdditiveBlendScope<'a, D> {
    /// Switch to additive accumulation
    pub fn enter(device: &'a mut D) -> Self {
        device.set_front_face(FrontFace::Clockwise);
        device.enable_transparency(BlendFactor::One, BlendFactor::One);
        device.disable_depth_test();
        Self { device }
    }
}

impl<'a, D: RenderDevice + ?Sized> Drop for AdditiveBlendScope<'a, D> {
    fn drop(&mut self) {
        self.device.set_front_face(FrontFace::CounterClockwise);
        self.device.disable_transparency();
        self.device.set_cull_mode(CullMode::Back);
        self.device.enable_depth_test(DepthTest::Less);
    }
}

deref_to_device!(AdditiveBlendScope);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::recording::{DeviceCommand, RecordingDevice};

    fn shader_device() -> RecordingDevice {
        RecordingDevice::new()
    }

    #[test]
    fn test_nested_scopes_close_in_reverse_order() {
        let mut device = shader_device();
        {
            let mut matrix = MatrixScope::push(&mut device);
            let mut target = FrameBufferScope::start(&mut *matrix, FrameBufferId(3));
            let mut shader = ShaderScope::begin(&mut *target, ShaderId(5));
            shader.bind_texture(0, "diffuse", TextureHandle(42));
        }

        let commands = device.commands();
        let tail: Vec<_> = commands[commands.len() - 4..].to_vec();
        assert_eq!(
            tail,
            vec![
                DeviceCommand::EmptyTexture(0),
                DeviceCommand::EndShader(ShaderId(5)),
                DeviceCommand::StopRenderTo(FrameBufferId(3)),
                DeviceCommand::PopMatrix,
            ]
        );
        assert!(device.audit().is_ok());
    }

    #[test]
    fn test_early_return_still_balances() {
        fn pass(device: &mut RecordingDevice, bail: bool) -> Option<()> {
            let mut matrix = MatrixScope::push(device);
            let mut shader = ShaderScope::begin(&mut *matrix, ShaderId(1));
            shader.bind_texture(2, "positions", TextureHandle(7));
            if bail {
                return None;
            }
            shader.set_float("radius", 4.0);
            Some(())
        }

        let mut device = shader_device();
        assert!(pass(&mut device, true).is_none());
        assert_eq!(device.matrix_depth(), 0);
        assert!(device.audit().is_ok());
    }

    #[test]
    fn test_units_emptied_in_reverse_preparation_order() {
        let mut device = shader_device();
        {
            let mut shader = ShaderScope::begin(&mut device, ShaderId(1));
            assert_eq!(shader.shader(), Some(ShaderId(1)));
            shader.bind_cube_texture(0, "cubemap1", TextureHandle(1));
            shader.bind_texture(1, "a", TextureHandle(2));
            shader.bind_texture(4, "b", TextureHandle(3));
            assert_eq!(shader.prepared_units().collect::<Vec<_>>(), vec![0, 1, 4]);
        }

        let empties: Vec<_> = device
            .commands()
            .iter()
            .filter(|c| matches!(c, DeviceCommand::EmptyTexture(_) | DeviceCommand::EmptyCubeTexture(_)))
            .cloned()
            .collect();
        assert_eq!(
            empties,
            vec![
                DeviceCommand::EmptyTexture(4),
                DeviceCommand::EmptyTexture(1),
                DeviceCommand::EmptyCubeTexture(0),
            ]
        );
    }

    #[test]
    fn test_optional_scopes_without_target_issue_nothing() {
        let mut device = shader_device();
        {
            let mut target = FrameBufferScope::optional(&mut device, None);
            assert_eq!(target.target(), None);
            let mut shader = ShaderScope::optional(&mut *target, None);
            assert_eq!(shader.shader(), None);
            shader.set_int("ignored", 1);
            shader.bind_texture(0, "ignored", TextureHandle(9));
            assert_eq!(shader.location("ignored"), UniformLocation::UNKNOWN);
        }
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_additive_blend_restores_default_state() {
        let mut device = shader_device();
        drop(AdditiveBlendScope::enter(&mut device));

        assert_eq!(
            device.commands(),
            &[
                DeviceCommand::SetFrontFace(FrontFace::Clockwise),
                DeviceCommand::EnableTransparency(BlendFactor::One, BlendFactor::One),
                DeviceCommand::DisableDepthTest,
                DeviceCommand::SetFrontFace(FrontFace::CounterClockwise),
                DeviceCommand::DisableTransparency,
                DeviceCommand::SetCullMode(CullMode::Back),
                DeviceCommand::EnableDepthTest(DepthTest::Less),
            ]
        );
    }

    #[test]
    fn test_guards_work_through_trait_objects() {
        let mut device = shader_device();
        {
            let dyn_device: &mut dyn RenderDevice = &mut device;
            let mut scene = SceneScope::begin(dyn_device, ClearFlags::all());
            let mut mask = ColourMaskScope::set(&mut *scene, ColourMask::NONE);
            let _cull = CullScope::set(&mut *mask, CullMode::Front, CullMode::Back);
        }
        assert!(device.audit().is_ok());
        assert_eq!(device.commands().last(), Some(&DeviceCommand::EndScene));
    }
}
