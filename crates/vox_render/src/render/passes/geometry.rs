//! Opaque geometry pass
//!
//! Main 3D view: projection, camera, default light, skybox and every opaque
//! manager, in the order their overdraw requires. When deferred rendering
//! is on the caller has already redirected output into the geometry
//! buffer.

use crate::config::DefaultLightSettings;
use crate::render::api::{
    Attachment, CullMode, DepthTest, DirectionalLight, ProjectionMode, RenderDevice, RenderMode,
};
use crate::render::guards::{MatrixScope, ShaderScope};
use crate::render::resources::{FrameBufferKey, ShaderKey};
use crate::render::scene::{RenderVariant, SceneContext};

use super::PassContext;

/// Texture unit of the shadow map in the world shader
pub const SHADOW_MAP_UNIT: u32 = 7;

/// Directional light described by `settings`
pub fn directional_light(settings: &DefaultLightSettings) -> DirectionalLight {
    DirectionalLight {
        position: settings.offset(),
        ambient: settings.ambient,
        diffuse: settings.diffuse,
        specular: settings.specular,
    }
}

/// Bind the program for lit world geometry
///
/// With shadows on this is the shadow-receiving program with the shadow map
/// bound; otherwise the default program.
pub fn world_shader<'a>(device: &'a mut dyn RenderDevice, ctx: PassContext<'_>) -> ShaderScope<'a, dyn RenderDevice + 'a> {
    if !ctx.flags().shadows {
        return ShaderScope::begin(device, ctx.shader(ShaderKey::Default));
    }

    let mut shader = ShaderScope::begin(device, ctx.shader(ShaderKey::Shadow));
    shader.bind_frame_buffer_texture(
        SHADOW_MAP_UNIT,
        "ShadowMap",
        ctx.frame_buffer(FrameBufferKey::Shadow),
        Attachment::Depth,
    );
    shader.set_bool("renderShadow", true);
    shader.set_bool("alwaysShadow", false);
    shader
}

/// Render the opaque 3D scene
pub fn render_geometry_pass(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    log::trace!("Geometry pass");

    let frame = ctx.frame;
    let mut view = MatrixScope::push(device);

    view.set_projection_mode(ProjectionMode::Perspective, frame.viewport());
    view.set_cull_mode(CullMode::Back);
    view.enable_depth_test(DepthTest::Less);
    frame.camera.look(&mut *view);

    MatrixScope::push(&mut *view).enable_light(ctx.light, 0);

    if ctx.flags().multisampling {
        view.enable_multisampling();
    } else {
        view.disable_multisampling();
    }

    {
        let mut marker = MatrixScope::push(&mut *view);
        marker.set_cull_mode(CullMode::Back);
        marker.set_render_mode(RenderMode::Solid);
        marker.render_light(ctx.light);
    }

    render_skybox(&mut *view, scene, ctx);

    scene.chunks.render(&mut *world_shader(&mut *view, ctx), RenderVariant::Standard);

    // Outlines and silhouettes go down before the opaque fill
    scene.items.render(&mut *view, RenderVariant::Outline);
    scene.items.render(&mut *view, RenderVariant::Silhouette);

    {
        let mut shader = world_shader(&mut *view, ctx);
        scene.scenery.render(&mut *shader, RenderVariant::Standard);
        scene.projectiles.render(&mut *shader, RenderVariant::Standard);
        scene.items.render(&mut *shader, RenderVariant::Standard);
    }

    scene.particles.render(&mut *view, RenderVariant::Standard);
    if ctx.flags().instance_render {
        scene.instances.render(&mut *view, RenderVariant::Standard);
    }

    {
        let mut shader = world_shader(&mut *view, ctx);
        if !frame.in_front_end() {
            let variant = if frame.first_person() { RenderVariant::FirstPerson } else { RenderVariant::Standard };
            scene.player.render(&mut *shader, variant);
        }
    }

    if ctx.flags().debug_render {
        render_debug_overlays(&mut *view, scene, ctx);
    }
}

/// Sky cube centred on the player
pub fn render_skybox(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    let center = scene.player.center();

    let mut matrix = MatrixScope::push(device);
    let mut shader = ShaderScope::begin(&mut *matrix, ctx.shader(ShaderKey::CubeMap));
    shader.bind_cube_texture(0, "cubemap1", scene.skybox.cube_texture());
    shader.set_float("skyboxRatio", 0.0);
    shader.translate(center);
    scene.skybox.render(&mut *shader, RenderVariant::Standard);
}

/// Debug visualisation of every manager
fn render_debug_overlays(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    let front_end = ctx.frame.in_front_end();

    scene.lighting.render_debug(device);
    scene.particles.render_debug(device);
    if !front_end {
        scene.player.render_debug(device);
    }
    scene.scenery.render_debug(device);
    scene.items.render_debug(device);
    scene.chunks.render_debug(device);
    scene.projectiles.render_debug(device);
    if front_end {
        scene.front_end.render_debug(device);
    }
}
