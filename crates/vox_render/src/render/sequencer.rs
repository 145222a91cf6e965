//! # Frame Sequencer
//!
//! Composes the passes into one frame, in this order:
//!
//! | Step | Work                                          | Gate                 |
//! |------|-----------------------------------------------|----------------------|
//! | 1    | world transforms of posed entities            |                      |
//! | 2    | begin scene                                   |                      |
//! | 3    | shadow map                                    | `shadows`            |
//! | 4    | redirect into the geometry buffer             | `deferred_rendering` |
//! | 5-9  | opaque 3D scene, debug overlays               |                      |
//! | 10   | light volumes                                 | `dynamic_lighting`   |
//! | 11   | close the geometry buffer                     | `deferred_rendering` |
//! | 12   | paperdoll viewport                            | sheet loaded         |
//! | 13   | transparency                                  |                      |
//! | 14   | SSAO composite, FXAA, blur                    | `deferred_rendering` |
//! | 15   | crosshair, text effects, letterbox            |                      |
//! | 16   | disable multisampling                         |                      |
//! | 17   | paperdoll composite                           | sheet loaded         |
//! | 18   | debug text                                    |                      |
//! | 19   | front-end menus                               | front end            |
//! | 20   | GUI                                           |                      |
//! | 21   | end scene, present                            |                      |
//!
//! A minimized window skips the whole frame before any device command.

use crate::config::RenderSettings;

use super::api::{ClearFlags, DirectionalLight, RenderDevice};
use super::frame::FrameSnapshot;
use super::guards::{FrameBufferScope, SceneScope};
use super::passes::{
    debug_text, geometry, lighting, overlay, paperdoll, post, shadow, transparency, PassContext,
};
use super::resources::{FrameBufferKey, RenderResources};
use super::scene::SceneContext;
use super::RenderResult;

/// What happened to a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was issued and presented
    Rendered,
    /// The window is minimized; nothing was issued
    SkippedMinimized,
}

/// Drives every pass of a frame against a [`RenderDevice`]
#[derive(Debug, Clone)]
pub struct FrameSequencer {
    resources: RenderResources,
    settings: RenderSettings,
    default_light: DirectionalLight,
    frame_count: u64,
}

impl FrameSequencer {
    /// Create a sequencer over validated resources and settings
    pub fn new(resources: RenderResources, settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;

        let default_light = geometry::directional_light(&settings.default_light);
        log::info!("Frame sequencer ready (version {})", settings.version);

        Ok(Self { resources, settings, default_light, frame_count: 0 })
    }

    /// Registered frame buffers and programs
    pub const fn resources(&self) -> &RenderResources {
        &self.resources
    }

    /// Persistent settings
    pub const fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Default directional light
    pub const fn default_light(&self) -> &DirectionalLight {
        &self.default_light
    }

    /// Frames rendered so far, not counting skipped frames
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render and present one frame
    pub fn render_frame(
        &mut self,
        device: &mut dyn RenderDevice,
        scene: &mut SceneContext<'_>,
        frame: &FrameSnapshot,
    ) -> FrameOutcome {
        if scene.window.is_minimized() {
            log::debug!("Window minimized, skipping frame");
            return FrameOutcome::SkippedMinimized;
        }

        scene.update_world_transforms();

        let ctx = PassContext {
            frame,
            resources: &self.resources,
            settings: &self.settings,
            light: &self.default_light,
        };
        let flags = ctx.flags();

        {
            let mut scene_scope = SceneScope::begin(device, ClearFlags::all());
            let device: &mut dyn RenderDevice = &mut *scene_scope;

            if flags.shadows {
                shadow::render_shadow_pass(device, scene, ctx);
            }

            {
                let geometry_buffer = flags.deferred_rendering.then(|| ctx.frame_buffer(FrameBufferKey::Ssao));
                let mut target = FrameBufferScope::optional(&mut *device, geometry_buffer);

                geometry::render_geometry_pass(&mut *target, scene, ctx);

                if flags.dynamic_lighting {
                    lighting::render_lighting_pass(&mut *target, &*scene.lighting, ctx);
                }
            }

            paperdoll::render_paperdoll_viewport(device, scene, ctx);
            transparency::render_transparency_pass(device, scene, ctx);

            if flags.deferred_rendering {
                post::render_post_chain(device, ctx);
            }

            overlay::render_2d_overlays(device, scene, frame);
            device.disable_multisampling();

            paperdoll::render_paperdoll_composite(device, scene, ctx);
            debug_text::render_debug_text(device, scene, ctx);
            overlay::render_front_end(device, scene, frame);
            overlay::render_gui(device, scene, frame);
        }

        scene.window.present();

        self.frame_count += 1;
        log::trace!("Frame {} rendered", self.frame_count);
        FrameOutcome::Rendered
    }
}
