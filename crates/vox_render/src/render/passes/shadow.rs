//! Shadow map pass
//!
//! Depth-only render of every shadow caster into the shadow frame buffer,
//! seen from the default light. The orthographic volume covers the terrain
//! streaming radius around the player and the light camera follows the
//! player at a fixed offset.

use crate::foundation::math::Vec3;
use crate::render::api::{ColourMask, CullMode, OrthographicBounds, RenderDevice};
use crate::render::guards::{ColourMaskScope, CullScope, FrameBufferScope, MatrixScope};
use crate::render::resources::FrameBufferKey;
use crate::render::scene::{RenderVariant, SceneContext};

use super::PassContext;

/// Render the shadow map
pub fn render_shadow_pass(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, ctx: PassContext<'_>) {
    log::trace!("Shadow pass");

    let center = scene.player.center();
    let radius = scene.chunks.loader_radius();
    let depth = ctx.settings.depth;

    let mut matrix = MatrixScope::push(device);
    let mut target = FrameBufferScope::start(&mut *matrix, ctx.frame_buffer(FrameBufferKey::Shadow));
    let mut depth_only = ColourMaskScope::set(&mut *target, ColourMask::NONE);

    depth_only.setup_orthographic_projection(OrthographicBounds::square(radius, depth.near, depth.far));
    let light_position = ctx.settings.default_light.offset() + center;
    depth_only.set_look_at_camera(light_position, center, Vec3::y());

    let mut casters = MatrixScope::push(&mut *depth_only);
    let mut cull = CullScope::set(&mut *casters, CullMode::Front, CullMode::Back);
    let device: &mut dyn RenderDevice = &mut *cull;

    scene.chunks.render(device, RenderVariant::Shadow);
    if !ctx.frame.in_front_end() {
        scene.player.render(device, RenderVariant::Shadow);
    }
    scene.projectiles.render(device, RenderVariant::Shadow);
    scene.scenery.render(device, RenderVariant::Shadow);
    scene.items.render(device, RenderVariant::Shadow);
    scene.particles.render(device, RenderVariant::Shadow);
    if ctx.flags().instance_render {
        scene.instances.render(device, RenderVariant::Shadow);
    }

    device.set_texture_matrix();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderFlags, RenderSettings};
    use crate::render::api::FrameBufferId;
    use crate::render::backends::{DeviceCommand, RecordingDevice};
    use crate::render::frame::{FrameSnapshot, GameMode};
    use crate::render::passes::fixtures;
    use crate::render::tests::support::{in_game, markers, World};

    fn run(world: &mut World, frame: &FrameSnapshot) -> RecordingDevice {
        let settings = RenderSettings::default();
        let resources = fixtures::resources();
        let light = fixtures::light(&settings);
        let ctx = PassContext { frame, resources: &resources, settings: &settings, light: &light };

        let mut device = RecordingDevice::new();
        render_shadow_pass(&mut device, &mut world.scene(), ctx);
        device
    }

    #[test]
    fn test_depth_only_setup_and_restore() {
        let mut world = World::new();
        let device = run(&mut world, &in_game(RenderFlags::default()));
        let commands = device.commands();

        assert_eq!(
            &commands[..7],
            &[
                DeviceCommand::PushMatrix,
                DeviceCommand::StartRenderTo(FrameBufferId(1)),
                DeviceCommand::SetColourMask(ColourMask::NONE),
                DeviceCommand::SetupOrthographicProjection(OrthographicBounds::square(64.0, 0.01, 1000.0)),
                DeviceCommand::LookAt {
                    eye: Vec3::new(310.0, 320.0, 330.0),
                    target: Vec3::new(10.0, 20.0, 30.0),
                    up: Vec3::y(),
                },
                DeviceCommand::PushMatrix,
                DeviceCommand::SetCullMode(CullMode::Front),
            ]
        );
        assert_eq!(
            &commands[commands.len() - 6..],
            &[
                DeviceCommand::SetTextureMatrix,
                DeviceCommand::SetCullMode(CullMode::Back),
                DeviceCommand::PopMatrix,
                DeviceCommand::SetColourMask(ColourMask::ALL),
                DeviceCommand::StopRenderTo(FrameBufferId(1)),
                DeviceCommand::PopMatrix,
            ]
        );
        assert_eq!(commands.len(), 13 + markers(&device).len());

        assert_eq!(device.matrix_depth(), 0);
        assert!(device.active_frame_buffers().is_empty());
        assert!(device.audit().is_ok());
    }

    #[test]
    fn test_casters_drawn_between_mask_and_texture_matrix() {
        let mut world = World::new();
        let device = run(&mut world, &in_game(RenderFlags::default()));

        let masked = device.position(|c| *c == DeviceCommand::SetColourMask(ColourMask::NONE)).unwrap();
        let texture_matrix = device.position(|c| *c == DeviceCommand::SetTextureMatrix).unwrap();
        let first_caster = device.position(|c| matches!(c, DeviceCommand::RenderText { .. })).unwrap();
        let last_caster = device
            .commands()
            .iter()
            .rposition(|c| matches!(c, DeviceCommand::RenderText { .. }))
            .unwrap();

        assert!(masked < first_caster);
        assert!(last_caster < texture_matrix);
        assert_eq!(markers(&device).len(), 7);
    }

    #[test]
    fn test_front_end_and_instance_gates() {
        let mut world = World::new();
        let frame = FrameSnapshot {
            game_mode: GameMode::FrontEnd,
            ..in_game(RenderFlags { instance_render: false, ..RenderFlags::default() })
        };
        let device = run(&mut world, &frame);

        assert_eq!(
            markers(&device),
            vec!["chunks:Shadow", "projectiles:Shadow", "scenery:Shadow", "items:Shadow", "particles:Shadow"]
        );
        assert!(device.audit().is_ok());
    }
}
