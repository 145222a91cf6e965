//! # Recording Device
//!
//! Headless [`RenderDevice`] that appends every call to a command list and
//! checks bracket nesting as the commands arrive. Used as the oracle in
//! tests and by the trace binary to inspect a frame without a GPU.
//!
//! Queries answer deterministically: attachment textures are derived from
//! the frame buffer id, uniform locations are handed out in first-use order
//! per program, and every font reports the same line height.

use std::collections::{BTreeSet, HashMap};

use crate::foundation::math::{Colour, Vec3};
use crate::render::api::{
    Attachment, BlendFactor, ClearFlags, ColourMask, CullMode, DepthTest, DirectionalLight,
    FontId, FrameBufferId, FrontFace, ImmediateMode, OrthographicBounds, ProjectionMode,
    RenderDevice, RenderMode, ShaderId, TextureHandle, UniformLocation, Viewport,
};
use crate::render::{BindingViolation, RenderError, RenderResult};

/// Value written to a uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `int` / `bool` / sampler uniform
    Int(i32),
    /// `float` uniform
    Float(f32),
    /// `vec4` uniform
    Vec4([f32; 4]),
}

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCommand {
    BeginScene(ClearFlags),
    EndScene,
    ClearTarget(ClearFlags, Colour),
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    Translate(Vec3),
    Rotate(Vec3),
    SetTextureMatrix,
    SetProjectionMode(ProjectionMode, Viewport),
    SetupOrthographicProjection(OrthographicBounds),
    LookAt { eye: Vec3, target: Vec3, up: Vec3 },
    StartRenderTo(FrameBufferId),
    StopRenderTo(FrameBufferId),
    BeginShader(ShaderId),
    EndShader(ShaderId),
    SetUniform { shader: ShaderId, name: String, value: UniformValue },
    PrepareShaderTexture { unit: u32, location: UniformLocation },
    BindTexture(TextureHandle),
    BindCubeTexture(TextureHandle),
    EmptyTexture(u32),
    EmptyCubeTexture(u32),
    SetCullMode(CullMode),
    SetFrontFace(FrontFace),
    EnableDepthTest(DepthTest),
    DisableDepthTest,
    EnableTransparency(BlendFactor, BlendFactor),
    DisableTransparency,
    EnableMultisampling,
    DisableMultisampling,
    SetColourMask(ColourMask),
    SetRenderMode(RenderMode),
    EnableLight { light: DirectionalLight, index: u32 },
    RenderLight(DirectionalLight),
    StartMeshRender,
    EndMeshRender,
    EnableImmediate(ImmediateMode),
    ImmediateVertex([f32; 3]),
    ImmediateTexCoord([f32; 2]),
    ImmediateColour(Colour),
    DisableImmediate,
    DrawSphere { radius: f32, slices: u32, stacks: u32 },
    RenderText { font: FontId, x: f32, y: f32, colour: Colour, text: String },
}

/// Headless device that records and audits commands
#[derive(Debug)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    matrix_depth: usize,
    frame_buffers: Vec<FrameBufferId>,
    bound_shader: Option<ShaderId>,
    prepared_units: BTreeSet<u32>,
    immediate: Option<ImmediateMode>,
    scene_open: bool,
    mesh_open: bool,
    uniform_locations: HashMap<(ShaderId, String), UniformLocation>,
    text_height: f32,
    violations: Vec<BindingViolation>,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDevice {
    /// Line height reported by [`RenderDevice::text_height`] unless overridden
    pub const DEFAULT_TEXT_HEIGHT: f32 = 14.0;

    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            matrix_depth: 0,
            frame_buffers: Vec::new(),
            bound_shader: None,
            prepared_units: BTreeSet::new(),
            immediate: None,
            scene_open: false,
            mesh_open: false,
            uniform_locations: HashMap::new(),
            text_height: Self::DEFAULT_TEXT_HEIGHT,
            violations: Vec::new(),
        }
    }

    /// Report `height` for every text measurement
    #[must_use]
    pub const fn with_text_height(mut self, height: f32) -> Self {
        self.text_height = height;
        self
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving bracket state untouched
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DeviceCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Index of the first command matching `predicate`
    pub fn position(&self, predicate: impl Fn(&DeviceCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(predicate)
    }

    /// Every value written to uniform `name`, in order
    pub fn uniform_writes(&self, name: &str) -> Vec<UniformValue> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::SetUniform { name: written, value, .. } if written == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Current transform stack depth
    pub const fn matrix_depth(&self) -> usize {
        self.matrix_depth
    }

    /// Frame buffers currently being rendered into, innermost last
    pub fn active_frame_buffers(&self) -> &[FrameBufferId] {
        &self.frame_buffers
    }

    /// Program currently bound
    pub const fn bound_shader(&self) -> Option<ShaderId> {
        self.bound_shader
    }

    /// Violations detected while recording
    pub fn violations(&self) -> &[BindingViolation] {
        &self.violations
    }

    /// Check recorded violations plus any bracket still open
    pub fn audit(&self) -> RenderResult<()> {
        let mut violations = self.violations.clone();

        if self.matrix_depth != 0 {
            violations.push(BindingViolation::UnbalancedMatrix { depth: self.matrix_depth });
        }
        if let Some(shader) = self.bound_shader {
            violations.push(BindingViolation::ShaderLeftBound(shader));
        }
        violations.extend(self.prepared_units.iter().map(|&unit| BindingViolation::TextureUnitLeaked { unit }));
        violations.extend(self.frame_buffers.iter().map(|&fb| BindingViolation::FrameBufferLeftActive(fb)));
        if self.immediate.is_some() {
            violations.push(BindingViolation::ImmediateMisuse("batch never disabled"));
        }
        if self.mesh_open {
            violations.push(BindingViolation::MeshMisuse("mesh render never ended"));
        }
        if self.scene_open {
            violations.push(BindingViolation::SceneMisuse("scene never ended"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RenderError::BindingViolations(violations))
        }
    }

    fn record(&mut self, command: DeviceCommand) {
        self.commands.push(command);
    }

    fn violate(&mut self, violation: BindingViolation) {
        log::trace!("Binding violation: {}", violation);
        self.violations.push(violation);
    }

    fn check_immediate_open(&mut self, what: &'static str) {
        if self.immediate.is_none() {
            self.violate(BindingViolation::ImmediateMisuse(what));
        }
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: UniformValue) {
        if self.bound_shader != Some(shader) {
            self.violate(BindingViolation::UniformOutsideShader { shader, name: name.to_string() });
        }
        self.record(DeviceCommand::SetUniform { shader, name: name.to_string(), value });
    }
}

impl RenderDevice for RecordingDevice {
    fn begin_scene(&mut self, clear: ClearFlags) {
        if self.scene_open {
            self.violate(BindingViolation::SceneMisuse("scene begun twice"));
        }
        self.scene_open = true;
        self.record(DeviceCommand::BeginScene(clear));
    }

    fn end_scene(&mut self) {
        if !self.scene_open {
            self.violate(BindingViolation::SceneMisuse("scene ended without begin"));
        }
        if self.matrix_depth != 0 {
            self.violate(BindingViolation::UnbalancedMatrix { depth: self.matrix_depth });
        }
        self.scene_open = false;
        self.record(DeviceCommand::EndScene);
    }

    fn clear_target(&mut self, clear: ClearFlags, colour: Colour) {
        self.record(DeviceCommand::ClearTarget(clear, colour));
    }

    fn push_matrix(&mut self) {
        self.matrix_depth += 1;
        self.record(DeviceCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        if self.matrix_depth == 0 {
            self.violate(BindingViolation::MatrixUnderflow);
        } else {
            self.matrix_depth -= 1;
        }
        self.record(DeviceCommand::PopMatrix);
    }

    fn load_identity(&mut self) {
        self.record(DeviceCommand::LoadIdentity);
    }

    fn translate(&mut self, offset: Vec3) {
        self.record(DeviceCommand::Translate(offset));
    }

    fn rotate(&mut self, euler_degrees: Vec3) {
        self.record(DeviceCommand::Rotate(euler_degrees));
    }

    fn set_texture_matrix(&mut self) {
        self.record(DeviceCommand::SetTextureMatrix);
    }

    fn set_projection_mode(&mut self, mode: ProjectionMode, viewport: Viewport) {
        self.record(DeviceCommand::SetProjectionMode(mode, viewport));
    }

    fn setup_orthographic_projection(&mut self, bounds: OrthographicBounds) {
        self.record(DeviceCommand::SetupOrthographicProjection(bounds));
    }

    fn set_look_at_camera(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.record(DeviceCommand::LookAt { eye, target, up });
    }

    fn start_render_to(&mut self, frame_buffer: FrameBufferId) {
        self.frame_buffers.push(frame_buffer);
        self.record(DeviceCommand::StartRenderTo(frame_buffer));
    }

    fn stop_render_to(&mut self, frame_buffer: FrameBufferId) {
        let top = self.frame_buffers.last().copied();
        if top == Some(frame_buffer) {
            self.frame_buffers.pop();
        } else {
            self.violate(BindingViolation::FrameBufferOrder { expected: top, found: frame_buffer });
            self.frame_buffers.retain(|&fb| fb != frame_buffer);
        }
        self.record(DeviceCommand::StopRenderTo(frame_buffer));
    }

    fn frame_buffer_texture(&self, frame_buffer: FrameBufferId, attachment: Attachment) -> TextureHandle {
        TextureHandle(frame_buffer.0.wrapping_mul(16).wrapping_add(attachment.index()))
    }

    fn begin_shader(&mut self, shader: ShaderId) {
        if let Some(bound) = self.bound_shader {
            self.violate(BindingViolation::ShaderAlreadyBound { bound, requested: shader });
        }
        self.bound_shader = Some(shader);
        self.record(DeviceCommand::BeginShader(shader));
    }

    fn end_shader(&mut self, shader: ShaderId) {
        if self.bound_shader != Some(shader) {
            self.violate(BindingViolation::ShaderMismatch { expected: self.bound_shader, found: shader });
        }
        let leaked: Vec<u32> = std::mem::take(&mut self.prepared_units).into_iter().collect();
        for unit in leaked {
            self.violate(BindingViolation::TextureUnitLeaked { unit });
        }
        self.bound_shader = None;
        self.record(DeviceCommand::EndShader(shader));
    }

    fn uniform_location(&mut self, shader: ShaderId, name: &str) -> UniformLocation {
        let next = self.uniform_locations.keys().filter(|(s, _)| *s == shader).count();
        *self
            .uniform_locations
            .entry((shader, name.to_string()))
            .or_insert_with(|| UniformLocation(i32::try_from(next).unwrap_or(i32::MAX)))
    }

    fn set_uniform_int(&mut self, shader: ShaderId, name: &str, value: i32) {
        self.set_uniform(shader, name, UniformValue::Int(value));
    }

    fn set_uniform_float(&mut self, shader: ShaderId, name: &str, value: f32) {
        self.set_uniform(shader, name, UniformValue::Float(value));
    }

    fn set_uniform_vec4(&mut self, shader: ShaderId, name: &str, value: [f32; 4]) {
        self.set_uniform(shader, name, UniformValue::Vec4(value));
    }

    fn prepare_shader_texture(&mut self, unit: u32, location: UniformLocation) {
        if self.bound_shader.is_none() {
            self.violate(BindingViolation::TextureOutsideShader { unit });
        }
        self.prepared_units.insert(unit);
        self.record(DeviceCommand::PrepareShaderTexture { unit, location });
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.record(DeviceCommand::BindTexture(texture));
    }

    fn bind_cube_texture(&mut self, texture: TextureHandle) {
        self.record(DeviceCommand::BindCubeTexture(texture));
    }

    fn empty_texture(&mut self, unit: u32) {
        self.prepared_units.remove(&unit);
        self.record(DeviceCommand::EmptyTexture(unit));
    }

    fn empty_cube_texture(&mut self, unit: u32) {
        self.prepared_units.remove(&unit);
        self.record(DeviceCommand::EmptyCubeTexture(unit));
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.record(DeviceCommand::SetCullMode(mode));
    }

    fn set_front_face(&mut self, winding: FrontFace) {
        self.record(DeviceCommand::SetFrontFace(winding));
    }

    fn enable_depth_test(&mut self, test: DepthTest) {
        self.record(DeviceCommand::EnableDepthTest(test));
    }

    fn disable_depth_test(&mut self) {
        self.record(DeviceCommand::DisableDepthTest);
    }

    fn enable_transparency(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.record(DeviceCommand::EnableTransparency(source, destination));
    }

    fn disable_transparency(&mut self) {
        self.record(DeviceCommand::DisableTransparency);
    }

    fn enable_multisampling(&mut self) {
        self.record(DeviceCommand::EnableMultisampling);
    }

    fn disable_multisampling(&mut self) {
        self.record(DeviceCommand::DisableMultisampling);
    }

    fn set_colour_mask(&mut self, mask: ColourMask) {
        self.record(DeviceCommand::SetColourMask(mask));
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.record(DeviceCommand::SetRenderMode(mode));
    }

    fn enable_light(&mut self, light: &DirectionalLight, index: u32) {
        self.record(DeviceCommand::EnableLight { light: *light, index });
    }

    fn render_light(&mut self, light: &DirectionalLight) {
        self.record(DeviceCommand::RenderLight(*light));
    }

    fn start_mesh_render(&mut self) {
        if self.mesh_open {
            self.violate(BindingViolation::MeshMisuse("mesh render started twice"));
        }
        self.mesh_open = true;
        self.record(DeviceCommand::StartMeshRender);
    }

    fn end_mesh_render(&mut self) {
        if !self.mesh_open {
            self.violate(BindingViolation::MeshMisuse("mesh render ended without start"));
        }
        self.mesh_open = false;
        self.record(DeviceCommand::EndMeshRender);
    }

    fn enable_immediate(&mut self, mode: ImmediateMode) {
        if self.immediate.is_some() {
            self.violate(BindingViolation::ImmediateMisuse("batch enabled twice"));
        }
        self.immediate = Some(mode);
        self.record(DeviceCommand::EnableImmediate(mode));
    }

    fn immediate_vertex(&mut self, x: f32, y: f32, z: f32) {
        self.check_immediate_open("vertex outside a batch");
        self.record(DeviceCommand::ImmediateVertex([x, y, z]));
    }

    fn immediate_tex_coord(&mut self, u: f32, v: f32) {
        self.check_immediate_open("texture coordinate outside a batch");
        self.record(DeviceCommand::ImmediateTexCoord([u, v]));
    }

    fn immediate_colour(&mut self, colour: Colour) {
        self.check_immediate_open("colour outside a batch");
        self.record(DeviceCommand::ImmediateColour(colour));
    }

    fn disable_immediate(&mut self) {
        self.check_immediate_open("batch disabled without enable");
        self.immediate = None;
        self.record(DeviceCommand::DisableImmediate);
    }

    fn draw_sphere(&mut self, radius: f32, slices: u32, stacks: u32) {
        if self.immediate.is_some() {
            self.violate(BindingViolation::ImmediateMisuse("sphere drawn inside a batch"));
        }
        self.record(DeviceCommand::DrawSphere { radius, slices, stacks });
    }

    fn text_height(&mut self, _font: FontId, _sample: &str) -> f32 {
        self.text_height
    }

    fn render_text(&mut self, font: FontId, x: f32, y: f32, _scale: f32, colour: Colour, _alpha: f32, text: &str) {
        self.record(DeviceCommand::RenderText { font, x, y, colour, text: text.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_stream_passes_audit() {
        let mut device = RecordingDevice::new();
        device.begin_scene(ClearFlags::all());
        device.push_matrix();
        device.start_render_to(FrameBufferId(1));
        device.begin_shader(ShaderId(2));
        let location = device.uniform_location(ShaderId(2), "texture");
        device.prepare_shader_texture(0, location);
        device.empty_texture(0);
        device.end_shader(ShaderId(2));
        device.stop_render_to(FrameBufferId(1));
        device.pop_matrix();
        device.end_scene();

        assert!(device.audit().is_ok());
        assert!(device.violations().is_empty());
    }

    #[test]
    fn test_leaked_texture_unit_reported_at_end_shader() {
        let mut device = RecordingDevice::new();
        device.begin_shader(ShaderId(2));
        device.prepare_shader_texture(7, UniformLocation(0));
        device.end_shader(ShaderId(2));

        assert_eq!(device.violations(), &[BindingViolation::TextureUnitLeaked { unit: 7 }]);
    }

    #[test]
    fn test_out_of_order_frame_buffer_stop() {
        let mut device = RecordingDevice::new();
        device.start_render_to(FrameBufferId(1));
        device.start_render_to(FrameBufferId(2));
        device.stop_render_to(FrameBufferId(1));

        assert_eq!(
            device.violations(),
            &[BindingViolation::FrameBufferOrder { expected: Some(FrameBufferId(2)), found: FrameBufferId(1) }]
        );
        assert_eq!(device.active_frame_buffers(), &[FrameBufferId(2)]);
    }

    #[test]
    fn test_unbalanced_matrix_reported_by_audit() {
        let mut device = RecordingDevice::new();
        device.push_matrix();

        match device.audit() {
            Err(RenderError::BindingViolations(v)) => {
                assert_eq!(v, vec![BindingViolation::UnbalancedMatrix { depth: 1 }]);
            }
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn test_matrix_underflow() {
        let mut device = RecordingDevice::new();
        device.pop_matrix();
        assert_eq!(device.violations(), &[BindingViolation::MatrixUnderflow]);
        assert_eq!(device.matrix_depth(), 0);
    }

    #[test]
    fn test_uniform_write_outside_bracket() {
        let mut device = RecordingDevice::new();
        device.set_uniform_float(ShaderId(4), "radius", 1.0);
        assert!(matches!(
            device.violations(),
            [BindingViolation::UniformOutsideShader { shader: ShaderId(4), .. }]
        ));
    }

    #[test]
    fn test_uniform_locations_are_stable_per_program() {
        let mut device = RecordingDevice::new();
        let a = device.uniform_location(ShaderId(1), "a");
        let b = device.uniform_location(ShaderId(1), "b");
        let a_again = device.uniform_location(ShaderId(1), "a");
        let other = device.uniform_location(ShaderId(2), "a");

        assert_eq!(a, UniformLocation(0));
        assert_eq!(b, UniformLocation(1));
        assert_eq!(a_again, a);
        assert_eq!(other, UniformLocation(0));
    }

    #[test]
    fn test_attachment_textures_are_distinct() {
        let device = RecordingDevice::new();
        let depth = device.frame_buffer_texture(FrameBufferId(2), Attachment::Depth);
        let diffuse = device.frame_buffer_texture(FrameBufferId(2), Attachment::Diffuse);
        let other = device.frame_buffer_texture(FrameBufferId(3), Attachment::Depth);

        assert_ne!(depth, diffuse);
        assert_ne!(depth, other);
    }

    #[test]
    fn test_attachment_textures_for_large_frame_buffer_ids() {
        let device = RecordingDevice::new();
        let id = FrameBufferId(u32::MAX - 1);

        let depth = device.frame_buffer_texture(id, Attachment::Depth);
        let normal = device.frame_buffer_texture(id, Attachment::Normal);
        assert_ne!(depth, normal);
        assert_eq!(device.frame_buffer_texture(id, Attachment::Depth), depth);
    }

    #[test]
    fn test_text_height_override() {
        let mut device = RecordingDevice::new();
        assert_eq!(device.text_height(FontId(1), "a"), RecordingDevice::DEFAULT_TEXT_HEIGHT);

        let mut device = RecordingDevice::new().with_text_height(9.0);
        assert_eq!(device.text_height(FontId(1), "a"), 9.0);
    }

    #[test]
    fn test_take_commands_keeps_bracket_state() {
        let mut device = RecordingDevice::new();
        device.push_matrix();
        device.translate(Vec3::new(1.0, 0.0, 0.0));

        let taken = device.take_commands();
        assert_eq!(taken.len(), 2);
        assert!(device.commands().is_empty());
        assert_eq!(device.matrix_depth(), 1);

        device.pop_matrix();
        assert!(device.audit().is_ok());
    }

    #[test]
    fn test_vertex_outside_immediate_batch() {
        let mut device = RecordingDevice::new();
        device.immediate_vertex(0.0, 0.0, 0.0);
        assert_eq!(device.violations().len(), 1);
    }
}
