//! Deferred lighting pass
//!
//! Each dynamic light is drawn as a sphere into the lighting buffer with
//! additive blending. The lighting program reconstructs the lit surface
//! from the geometry buffer's normal, position and depth attachments.

use crate::foundation::math::{distance, Vec3};
use crate::render::api::{Attachment, CullMode, ProjectionMode, RenderDevice, RenderMode};
use crate::render::guards::{AdditiveBlendScope, FrameBufferScope, MatrixScope, ShaderScope};
use crate::render::resources::{FrameBufferKey, ShaderKey};
use crate::render::scene::LightingSource;

use super::PassContext;

/// Slack between a light's radius and its tessellated sphere
pub const LIGHT_VOLUME_TOLERANCE: f32 = 0.5;

/// Light spheres are raised by this much above the light position
pub const LIGHT_VOLUME_LIFT: f32 = 0.5;

/// Slices and stacks of a light volume sphere
pub const LIGHT_VOLUME_DETAIL: u32 = 30;

/// Cull mode for a light volume seen from `camera_distance`
///
/// From inside the sphere only its back faces are visible, so those must be
/// kept; from outside, the front faces are culled so the volume is shaded
/// once even when it intersects the near plane.
pub fn light_volume_cull_mode(camera_distance: f32, radius: f32) -> CullMode {
    if camera_distance < radius + LIGHT_VOLUME_TOLERANCE {
        CullMode::Back
    } else {
        CullMode::Front
    }
}

/// Accumulate every dynamic light into the lighting buffer
pub fn render_lighting_pass(device: &mut dyn RenderDevice, lights: &dyn LightingSource, ctx: PassContext<'_>) {
    log::trace!("Deferred lighting pass");

    let frame = ctx.frame;
    let depth = ctx.settings.depth;
    let geometry = ctx.frame_buffer(FrameBufferKey::Ssao);

    let mut matrix = MatrixScope::push(device);
    let mut target = FrameBufferScope::start(&mut *matrix, ctx.frame_buffer(FrameBufferKey::Lighting));
    let mut additive = AdditiveBlendScope::enter(&mut *target);

    additive.set_projection_mode(ProjectionMode::Perspective, frame.viewport());
    frame.camera.look(&mut *additive);

    let mut volumes = MatrixScope::push(&mut *additive);
    let mut shader = ShaderScope::begin(&mut *volumes, ctx.shader(ShaderKey::Lighting));
    shader.bind_frame_buffer_texture(0, "normals", geometry, Attachment::Normal);
    shader.bind_frame_buffer_texture(1, "positions", geometry, Attachment::Position);
    shader.bind_frame_buffer_texture(2, "depths", geometry, Attachment::Depth);
    shader.set_int("screenWidth", frame.window.width_i32());
    shader.set_int("screenHeight", frame.window.height_i32());
    shader.set_float("nearZ", depth.near);
    shader.set_float("farZ", depth.far);

    for light in lights.lights() {
        let camera_distance = distance(&frame.camera.position, &light.position);
        log::trace!("Light volume at {:?} r={} d={}", light.position, light.radius, camera_distance);

        shader.set_cull_mode(light_volume_cull_mode(camera_distance, light.radius));
        shader.set_float("radius", light.radius);
        shader.set_float("diffuseScale", light.diffuse_scale);
        shader.set_vec4("diffuseLightColor", light.colour.to_array());

        let mut sphere = MatrixScope::push(&mut *shader);
        sphere.set_render_mode(RenderMode::Solid);
        sphere.translate(light.position + Vec3::new(0.0, LIGHT_VOLUME_LIFT, 0.0));
        sphere.draw_sphere(light.radius, LIGHT_VOLUME_DETAIL, LIGHT_VOLUME_DETAIL);
    }
}
