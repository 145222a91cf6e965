//! Debug text block
//!
//! Camera pose, per-manager counts, frame timing and the build line. With
//! debug rendering off only the FPS and build lines are shown.

use crate::foundation::math::{Colour, Vec3};
use crate::render::api::{RenderDevice, RenderMode};
use crate::render::camera::CameraPose;
use crate::render::frame::FrameSnapshot;
use crate::render::guards::MatrixScope;
use crate::render::scene::{ChunkStats, InstanceStats, ParticleStats, PosedManagerStats, SceneContext};

use super::{begin_2d, PassContext};

/// `DEV` in debug builds, `RELEASE` otherwise
pub const BUILD_KIND: &str = if cfg!(debug_assertions) { "DEV" } else { "RELEASE" };

const LEFT_MARGIN: f32 = 15.0;
const TOP_MARGIN: f32 = 10.0;
const BOTTOM_ROW: f32 = 15.0;
const FPS_OFFSET_TERSE: f32 = 65.0;
const FPS_OFFSET_VERBOSE: f32 = 135.0;
const BUILD_COLOUR: Colour = Colour::rgb(0.75, 0.75, 0.75);

/// Manager counts shown in the verbose block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugStats {
    /// Terrain
    pub chunks: ChunkStats,
    /// Block particles
    pub particles: ParticleStats,
    /// Items
    pub items: PosedManagerStats,
    /// Projectiles
    pub projectiles: PosedManagerStats,
    /// Instanced scenery
    pub instances: InstanceStats,
}

impl DebugStats {
    /// Read the counts from every manager
    pub fn collect(scene: &SceneContext<'_>) -> Self {
        Self {
            chunks: scene.chunks.stats(),
            particles: scene.particles.stats(),
            items: scene.items.stats(),
            projectiles: scene.projectiles.stats(),
            instances: scene.instances.stats(),
        }
    }
}

/// One positioned line of debug text
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    /// Left edge in pixels
    pub x: f32,
    /// Baseline in pixels from the bottom of the window
    pub y: f32,
    /// Text colour
    pub colour: Colour,
    /// Text
    pub text: String,
}

fn vec(v: &Vec3) -> String {
    format!("{:.2}, {:.2}, {:.2}", v.x, v.y, v.z)
}

/// Camera pose line
pub fn camera_line(camera: &CameraPose) -> String {
    format!(
        "Pos({}), Facing({}) = {:.2}, Up({}) = {:.2}, Right({}) = {:.2}, View({}), Zoom={:.2}",
        vec(&camera.position),
        vec(&camera.facing),
        camera.facing.norm(),
        vec(&camera.up),
        camera.up.norm(),
        vec(&camera.right),
        camera.right.norm(),
        vec(&camera.view),
        camera.zoom,
    )
}

/// Lay out the debug block
///
/// Verbose rows sit `line_height * k + 10` below the top of the window for
/// k = 1 (camera) and 3..=7 (counts); row 2 is left free.
pub fn assemble(
    frame: &FrameSnapshot,
    stats: &DebugStats,
    version: &str,
    line_height: f32,
) -> Vec<DebugLine> {
    let verbose = frame.flags.debug_render;
    let height = frame.window.height_f32();
    let row = |k: f32| height - line_height * k - TOP_MARGIN;
    let white = |x: f32, y: f32, text: String| DebugLine { x, y, colour: Colour::WHITE, text };

    let mut lines = Vec::new();

    if verbose {
        let DebugStats { chunks, particles, items, projectiles, instances } = stats;
        lines.push(white(LEFT_MARGIN, row(1.0), camera_line(&frame.camera)));
        lines.push(white(
            LEFT_MARGIN,
            row(3.0),
            format!("Chunks: {}, Render: {}", chunks.loaded, chunks.rendered),
        ));
        lines.push(white(
            LEFT_MARGIN,
            row(4.0),
            format!(
                "Particles: {}, Render: {}, Emitters: {}, Effects: {}",
                particles.particles, particles.rendered, particles.emitters, particles.effects
            ),
        ));
        lines.push(white(LEFT_MARGIN, row(5.0), format!("Items: {}, Render: {}", items.total, items.rendered)));
        lines.push(white(
            LEFT_MARGIN,
            row(6.0),
            format!("Projectiles: {}, Render: {}", projectiles.total, projectiles.rendered),
        ));
        lines.push(white(
            LEFT_MARGIN,
            row(7.0),
            format!(
                "Instance Parents: {}, Instance Objects: {}, Instance Render: {}",
                instances.parents, instances.objects, instances.rendered
            ),
        ));
    }

    let timing = frame.timing;
    let (fps_text, fps_offset) = if verbose {
        (format!("Delta: {:.4}  FPS: {:.0}", timing.delta, timing.fps), FPS_OFFSET_VERBOSE)
    } else {
        (format!("FPS: {:.0}", timing.fps), FPS_OFFSET_TERSE)
    };
    lines.push(white(frame.window.width_f32() - fps_offset, BOTTOM_ROW, fps_text));
    lines.push(DebugLine {
        x: LEFT_MARGIN,
        y: BOTTOM_ROW,
        colour: BUILD_COLOUR,
        text: format!("{} {}", BUILD_KIND, version),
    });

    lines
}

/// Draw the debug block
pub fn render_debug_text(device: &mut dyn RenderDevice, scene: &SceneContext<'_>, ctx: PassContext<'_>) {
    let font = ctx.resources.font();
    let line_height = device.text_height(font, "a");
    let lines = assemble(ctx.frame, &DebugStats::collect(scene), &ctx.settings.version, line_height);

    let mut matrix = MatrixScope::push(device);
    matrix.empty_texture(0);
    matrix.set_render_mode(RenderMode::Solid);
    begin_2d(&mut *matrix, ctx.frame.viewport());

    for line in &lines {
        matrix.render_text(font, line.x, line.y, 1.0, line.colour, 1.0, &line.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderFlags;
    use crate::render::frame::{FrameTiming, WindowExtent};
    use approx::assert_relative_eq;

    fn frame(debug_render: bool) -> FrameSnapshot {
        FrameSnapshot {
            flags: RenderFlags { debug_render, ..RenderFlags::default() },
            window: WindowExtent { width: 1000, height: 700 },
            timing: FrameTiming { delta: 0.016_666, fps: 60.2 },
            ..FrameSnapshot::default()
        }
    }

    #[test]
    fn test_terse_block_has_fps_and_build_only() {
        let lines = assemble(&frame(false), &DebugStats::default(), "1.2.3", 12.0);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "FPS: 60");
        assert_relative_eq!(lines[0].x, 935.0);
        assert_relative_eq!(lines[0].y, 15.0);
        assert_eq!(lines[1].text, format!("{} 1.2.3", BUILD_KIND));
        assert_eq!(lines[1].colour, Colour::rgb(0.75, 0.75, 0.75));
    }

    #[test]
    fn test_build_kind_follows_debug_assertions() {
        let expected = if cfg!(debug_assertions) { "DEV" } else { "RELEASE" };
        assert_eq!(BUILD_KIND, expected);

        let lines = assemble(&frame(false), &DebugStats::default(), "1.2.3", 12.0);
        assert_eq!(lines[1].text, format!("{expected} 1.2.3"));
    }

    #[test]
    fn test_verbose_rows_are_distinct() {
        let stats = DebugStats {
            chunks: ChunkStats { loaded: 40, rendered: 12 },
            items: PosedManagerStats { total: 3, rendered: 2 },
            ..DebugStats::default()
        };
        let lines = assemble(&frame(true), &stats, "1.2.3", 12.0);

        assert_eq!(lines.len(), 8);
        let ys: Vec<f32> = lines[..6].iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![678.0, 654.0, 642.0, 630.0, 618.0, 606.0]);
        assert_eq!(lines[1].text, "Chunks: 40, Render: 12");
        assert_eq!(lines[3].text, "Items: 3, Render: 2");
        assert_eq!(lines[6].text, "Delta: 0.0167  FPS: 60");
        assert_relative_eq!(lines[6].x, 865.0);
    }

    #[test]
    fn test_camera_line_format() {
        let camera = CameraPose {
            position: Vec3::new(0.0, 0.0, 2.0),
            facing: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            view: Vec3::zeros(),
            zoom: 2.0,
        };
        assert_eq!(
            camera_line(&camera),
            "Pos(0.00, 0.00, 2.00), Facing(0.00, 0.00, -1.00) = 1.00, Up(0.00, 1.00, 0.00) = 1.00, \
             Right(1.00, 0.00, 0.00) = 1.00, View(0.00, 0.00, 0.00), Zoom=2.00"
        );
    }
}
