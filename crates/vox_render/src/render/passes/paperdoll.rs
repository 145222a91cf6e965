//! Character paperdoll
//!
//! The player model rendered on its own for the character sheet: a
//! perspective render into the paperdoll buffer followed by a composite
//! into the paperdoll output buffer. Neither touches the main scene's
//! buffers, and both run only while the sheet is open.

use crate::foundation::math::{utils, Colour, Vec3};
use crate::render::api::{Attachment, ClearFlags, ProjectionMode, RenderDevice, Viewport};
use crate::render::guards::{FrameBufferScope, MatrixScope, MeshScope, ShaderScope};
use crate::render::resources::{FrameBufferKey, ShaderKey};
use crate::render::scene::{RenderVariant, SceneContext};

use super::{begin_2d, fullscreen_quad, PassContext};

/// Depth of the composite quad
const COMPOSITE_DEPTH: f32 = 2.0;

fn paperdoll_viewport(ctx: PassContext<'_>) -> Viewport {
    Viewport::sized(ctx.settings.paperdoll.width, ctx.settings.paperdoll.height)
}

/// Render the player model into the paperdoll buffer
pub fn render_paperdoll_viewport(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    if !scene.character_sheet.is_loaded() {
        return;
    }
    log::trace!("Paperdoll viewport");

    let settings = &ctx.settings.paperdoll;
    let rotation = scene.character_sheet.paperdoll_rotation();
    let shaded = !ctx.flags().model_wireframe;

    let mut target = FrameBufferScope::start(device, ctx.frame_buffer(FrameBufferKey::Paperdoll));
    let mut view = MatrixScope::push(&mut *target);
    view.load_identity();
    view.clear_target(ClearFlags::COLOUR | ClearFlags::DEPTH, Colour::TRANSPARENT);
    view.set_projection_mode(ProjectionMode::Perspective, paperdoll_viewport(ctx));
    view.set_look_at_camera(utils::vec3_from_array(settings.eye), utils::vec3_from_array(settings.target), Vec3::y());

    let mut model = MatrixScope::push(&mut *view);
    {
        let mut mesh = MeshScope::begin(&mut *model);
        let mut shader = ShaderScope::optional(&mut *mesh, shaded.then(|| ctx.shader(ShaderKey::Paperdoll)));
        shader.rotate(Vec3::new(0.0, rotation, 0.0));
        scene.player.render(&mut *shader, RenderVariant::Paperdoll);
    }

    model.empty_texture(0);

    let mut shader = ShaderScope::optional(&mut *model, shaded.then(|| ctx.shader(ShaderKey::Texture)));
    scene.player.render(&mut *shader, RenderVariant::PaperdollFace);
}

/// Composite the paperdoll buffer into the paperdoll output buffer
pub fn render_paperdoll_composite(device: &mut dyn RenderDevice, scene: &SceneContext<'_>, ctx: PassContext<'_>) {
    if !scene.character_sheet.is_loaded() {
        return;
    }
    log::trace!("Paperdoll composite");

    let frame = ctx.frame;
    let depth = ctx.settings.depth;
    let source = ctx.frame_buffer(FrameBufferKey::Paperdoll);

    let mut target = FrameBufferScope::start(device, ctx.frame_buffer(FrameBufferKey::PaperdollSsao));
    let mut matrix = MatrixScope::push(&mut *target);
    begin_2d(&mut *matrix, paperdoll_viewport(ctx));

    let mut shader = ShaderScope::begin(&mut *matrix, ctx.shader(ShaderKey::Ssao));
    shader.bind_frame_buffer_texture(0, "bgl_DepthTexture", source, Attachment::Depth);
    shader.bind_frame_buffer_texture(1, "bgl_RenderedTexture", source, Attachment::Diffuse);
    shader.set_int("screenWidth", frame.window.width_i32());
    shader.set_int("screenHeight", frame.window.height_i32());
    shader.set_float("nearZ", depth.near);
    shader.set_float("farZ", depth.far);
    shader.set_float("samplingMultiplier", ctx.settings.post.sampling_multiplier);
    shader.set_bool("lighting_enabled", false);

    fullscreen_quad(&mut *shader, frame.window, COMPOSITE_DEPTH);
}
