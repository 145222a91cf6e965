//! # Post-Process Chain
//!
//! Full-screen passes run after the deferred scene is complete:
//!
//! 1. SSAO composite: geometry, lighting and transparency buffers combined
//! 2. FXAA, when multisampling is on and an FXAA program exists
//! 3. Separable blur, horizontal then vertical, when blur is on
//!
//! Each stage renders into the input buffer of the next stage that will
//! actually run, and the last stage renders to the back buffer.

use crate::render::api::{Attachment, FrameBufferId, RenderDevice, ShaderId};
use crate::render::guards::{FrameBufferScope, MatrixScope, ShaderScope};
use crate::render::resources::{FrameBufferKey, ShaderKey};

use super::{begin_2d, fullscreen_quad, PassContext};

/// Depth of the full-screen quads
const QUAD_DEPTH: f32 = 1.0;

/// Blur step: the global override while it is positive, else the default
pub fn blur_size(global_blur_amount: f32, default_size: f32) -> f32 {
    if global_blur_amount > 0.0 {
        global_blur_amount
    } else {
        default_size
    }
}

/// Which post stages run this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostChain {
    /// FXAA program, when the FXAA stage runs
    pub fxaa: Option<ShaderId>,
    /// Whether both blur stages run
    pub blur: bool,
}

impl PostChain {
    /// Stages enabled by the frame's flags and the registered programs
    pub fn plan(ctx: PassContext<'_>) -> Self {
        let flags = ctx.flags();
        Self {
            fxaa: ctx.resources.fxaa_shader().filter(|_| flags.multisampling),
            blur: flags.blur,
        }
    }

    /// Output of the SSAO composite
    pub fn ssao_target(self, ctx: PassContext<'_>) -> Option<FrameBufferId> {
        if self.fxaa.is_some() {
            Some(ctx.frame_buffer(FrameBufferKey::Fxaa))
        } else {
            self.fxaa_target(ctx)
        }
    }

    /// Output of the FXAA stage
    pub fn fxaa_target(self, ctx: PassContext<'_>) -> Option<FrameBufferId> {
        self.blur.then(|| ctx.frame_buffer(FrameBufferKey::BlurFirst))
    }
}

/// Run every enabled post stage
pub fn render_post_chain(device: &mut dyn RenderDevice, ctx: PassContext<'_>) {
    let chain = PostChain::plan(ctx);

    render_ssao_composite(device, ctx, chain.ssao_target(ctx));

    if let Some(fxaa) = chain.fxaa {
        render_fxaa(device, ctx, fxaa, chain.fxaa_target(ctx));
    }

    if chain.blur {
        render_blur_horizontal(device, ctx);
        render_blur_vertical(device, ctx);
    }
}

/// Combine the deferred buffers into `target`
pub fn render_ssao_composite(device: &mut dyn RenderDevice, ctx: PassContext<'_>, target: Option<FrameBufferId>) {
    log::trace!("SSAO composite into {:?}", target);

    let frame = ctx.frame;
    let flags = ctx.flags();
    let depth = ctx.settings.depth;
    let geometry = ctx.frame_buffer(FrameBufferKey::Ssao);
    let lighting = ctx.frame_buffer(FrameBufferKey::Lighting);
    let transparency = ctx.frame_buffer(FrameBufferKey::Transparency);

    let mut matrix = MatrixScope::push(device);
    begin_2d(&mut *matrix, frame.viewport());

    let mut output = FrameBufferScope::optional(&mut *matrix, target);
    let mut shader = ShaderScope::begin(&mut *output, ctx.shader(ShaderKey::Ssao));
    shader.bind_frame_buffer_texture(0, "bgl_DepthTexture", geometry, Attachment::Depth);
    shader.bind_frame_buffer_texture(1, "bgl_RenderedTexture", geometry, Attachment::Diffuse);
    shader.bind_frame_buffer_texture(2, "light", lighting, Attachment::Diffuse);
    shader.bind_frame_buffer_texture(3, "bgl_TransparentTexture", transparency, Attachment::Diffuse);
    shader.bind_frame_buffer_texture(4, "bgl_TransparentDepthTexture", transparency, Attachment::Depth);

    shader.set_int("screenWidth", frame.window.width_i32());
    shader.set_int("screenHeight", frame.window.height_i32());
    shader.set_float("nearZ", depth.near);
    shader.set_float("farZ", depth.far);
    shader.set_float("samplingMultiplier", ctx.settings.post.sampling_multiplier);
    shader.set_bool("lighting_enabled", flags.dynamic_lighting);
    shader.set_bool("ssao_enabled", flags.ssao);

    fullscreen_quad(&mut *shader, frame.window, QUAD_DEPTH);
}

/// Anti-alias the SSAO output into `target`
pub fn render_fxaa(device: &mut dyn RenderDevice, ctx: PassContext<'_>, fxaa: ShaderId, target: Option<FrameBufferId>) {
    log::trace!("FXAA into {:?}", target);

    let frame = ctx.frame;
    let mut matrix = MatrixScope::push(device);
    begin_2d(&mut *matrix, frame.viewport());

    let mut output = FrameBufferScope::optional(&mut *matrix, target);
    let mut shader = ShaderScope::begin(&mut *output, fxaa);
    shader.set_int("screenWidth", frame.window.width_i32());
    shader.set_int("screenHeight", frame.window.height_i32());
    shader.bind_frame_buffer_texture(0, "texture", ctx.frame_buffer(FrameBufferKey::Fxaa), Attachment::Diffuse);

    fullscreen_quad(&mut *shader, frame.window, QUAD_DEPTH);
}

/// Horizontal blur: first blur buffer into the second
///
/// The global blur amount, while positive, replaces the configured step.
pub fn render_blur_horizontal(device: &mut dyn RenderDevice, ctx: PassContext<'_>) {
    render_blur(
        device,
        ctx,
        ShaderKey::BlurHorizontal,
        FrameBufferKey::BlurFirst,
        Some(ctx.frame_buffer(FrameBufferKey::BlurSecond)),
        blur_size(ctx.frame.global_blur_amount, ctx.settings.post.blur_size),
    );
}

/// Vertical blur: second blur buffer onto the back buffer, always at the configured step
pub fn render_blur_vertical(device: &mut dyn RenderDevice, ctx: PassContext<'_>) {
    render_blur(
        device,
        ctx,
        ShaderKey::BlurVertical,
        FrameBufferKey::BlurSecond,
        None,
        ctx.settings.post.blur_size,
    );
}

fn render_blur(
    device: &mut dyn RenderDevice,
    ctx: PassContext<'_>,
    program: ShaderKey,
    source: FrameBufferKey,
    target: Option<FrameBufferId>,
    size: f32,
) {
    let frame = ctx.frame;
    log::trace!("{:?} from {:?} size={}", program, source, size);

    let mut matrix = MatrixScope::push(device);
    begin_2d(&mut *matrix, frame.viewport());

    let mut output = FrameBufferScope::optional(&mut *matrix, target);
    let mut shader = ShaderScope::begin(&mut *output, ctx.shader(program));
    shader.bind_frame_buffer_texture(0, "texture", ctx.frame_buffer(source), Attachment::Diffuse);
    shader.set_float("blurSize", size);

    fullscreen_quad(&mut *shader, frame.window, QUAD_DEPTH);
}
