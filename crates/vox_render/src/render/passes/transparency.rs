//! Transparency pass
//!
//! Alpha-blended geometry drawn after every opaque pass. Under deferred
//! rendering it goes to its own buffer so the composite can blend it over
//! the lit, occluded scene.

use crate::render::api::{CullMode, ProjectionMode, RenderDevice};
use crate::render::guards::{FrameBufferScope, MatrixScope};
use crate::render::resources::FrameBufferKey;
use crate::render::scene::{RenderVariant, SceneContext};

use super::PassContext;

/// Render alpha-blended geometry
pub fn render_transparency_pass(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    log::trace!("Transparency pass");

    let frame = ctx.frame;
    let mut matrix = MatrixScope::push(device);
    matrix.set_projection_mode(ProjectionMode::Perspective, frame.viewport());
    matrix.set_cull_mode(CullMode::Back);
    frame.camera.look(&mut *matrix);

    let target = ctx.flags().deferred_rendering.then(|| ctx.frame_buffer(FrameBufferKey::Transparency));
    let mut target = FrameBufferScope::optional(&mut *matrix, target);
    let device: &mut dyn RenderDevice = &mut *target;

    if !frame.in_front_end() {
        if !frame.first_person() {
            scene.player.render(device, RenderVariant::Face);
        }
        scene.player.render(device, RenderVariant::WeaponTrails);
    }
    scene.projectiles.render(device, RenderVariant::WeaponTrails);
}
