//! 2D overlays
//!
//! Crosshair, text effects, cinematic letterbox, front-end menus and the
//! GUI. Everything here draws in pixel space through the fixed overlay
//! camera.

use crate::foundation::math::{Colour, Vec3};
use crate::render::api::{CullMode, ImmediateMode, ProjectionMode, RenderDevice, RenderMode};
use crate::render::camera::look_2d;
use crate::render::frame::FrameSnapshot;
use crate::render::guards::{ImmediateScope, MatrixScope};
use crate::render::scene::SceneContext;

use super::begin_2d;

/// Letterbox bar height at a ratio of `1.0`
pub const LETTERBOX_SCALE: f32 = 100.0;

const LETTERBOX_DEPTH: f32 = 1.5;
const CROSSHAIR_DEPTH: f32 = 3.0;
const CROSSHAIR_SIZE: f32 = 1.0;
const CROSSHAIR_BORDER: f32 = 2.0;

/// Height of each letterbox bar for `ratio`
pub fn letterbox_height(ratio: f32) -> f32 {
    LETTERBOX_SCALE * ratio
}

/// Crosshair, text effects and letterbox
pub fn render_2d_overlays(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, frame: &FrameSnapshot) {
    let mut matrix = MatrixScope::push(device);
    if frame.first_person() {
        render_crosshair(&mut *matrix, frame);
    }
    scene.text_effects.render_2d(&mut *matrix);
    render_letterbox(&mut *matrix, frame);
}

/// White centre square over a black border at the middle of the screen
pub fn render_crosshair(device: &mut dyn RenderDevice, frame: &FrameSnapshot) {
    let mut matrix = MatrixScope::push(device);
    begin_2d(&mut *matrix, frame.viewport());
    matrix.translate(Vec3::new(frame.window.width_f32() * 0.5, frame.window.height_f32() * 0.5, 0.0));

    let mut quads = ImmediateScope::begin(&mut *matrix, ImmediateMode::Quads);
    for (colour, half) in [(Colour::WHITE, CROSSHAIR_SIZE), (Colour::BLACK, CROSSHAIR_BORDER)] {
        quads.immediate_colour(colour);
        quads.immediate_vertex(-half, -half, CROSSHAIR_DEPTH);
        quads.immediate_vertex(half, -half, CROSSHAIR_DEPTH);
        quads.immediate_vertex(half, half, CROSSHAIR_DEPTH);
        quads.immediate_vertex(-half, half, CROSSHAIR_DEPTH);
    }
}

/// Black bars at the top and bottom of the screen
///
/// Nothing is issued when the bars would have no height.
pub fn render_letterbox(device: &mut dyn RenderDevice, frame: &FrameSnapshot) {
    let bar = letterbox_height(frame.letterbox_ratio);
    if bar <= 0.0 {
        return;
    }

    let (width, height) = (frame.window.width_f32(), frame.window.height_f32());

    let mut matrix = MatrixScope::push(device);
    begin_2d(&mut *matrix, frame.viewport());
    matrix.set_render_mode(RenderMode::Solid);

    let mut quads = ImmediateScope::begin(&mut *matrix, ImmediateMode::Quads);
    quads.immediate_colour(Colour::BLACK);
    for (bottom, top) in [(0.0, bar), (height - bar, height)] {
        quads.immediate_vertex(0.0, bottom, LETTERBOX_DEPTH);
        quads.immediate_vertex(width, bottom, LETTERBOX_DEPTH);
        quads.immediate_vertex(width, top, LETTERBOX_DEPTH);
        quads.immediate_vertex(0.0, top, LETTERBOX_DEPTH);
    }
}

/// Front-end menus, only while in the front end
pub fn render_front_end(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, frame: &FrameSnapshot) {
    if !frame.in_front_end() {
        return;
    }

    let mut matrix = MatrixScope::push(device);
    begin_2d_culled(&mut *matrix, frame);
    scene.front_end.render_2d(&mut *matrix);
}

/// In-game GUI
pub fn render_gui(device: &mut dyn RenderDevice, scene: &mut SceneContext<'_>, frame: &FrameSnapshot) {
    device.empty_texture(0);

    let mut matrix = MatrixScope::push(device);
    begin_2d_culled(&mut *matrix, frame);
    scene.gui.render_2d(&mut *matrix);
}

fn begin_2d_culled(device: &mut dyn RenderDevice, frame: &FrameSnapshot) {
    device.set_projection_mode(ProjectionMode::TwoD, frame.viewport());
    device.set_cull_mode(CullMode::Back);
    look_2d(device);
}
