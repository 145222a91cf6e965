//! # Camera Pose
//!
//! Read-only view of the main camera for one frame. Camera movement and
//! collision live with the game; the renderer only places the device camera
//! from this pose and prints it in the debug block.
//!
//! ## Coordinate System
//! Right-handed, Y-up. `facing`, `up` and `right` form the camera basis;
//! `view` is the world-space point the camera looks at.

use crate::foundation::math::Vec3;

use super::api::RenderDevice;

/// Eye of the fixed 2D overlay camera
pub const OVERLAY_EYE: [f32; 3] = [0.0, 0.0, 250.0];

/// Camera position, basis and look-at point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Vec3,
    /// Forward basis vector
    pub facing: Vec3,
    /// Up basis vector
    pub up: Vec3,
    /// Right basis vector
    pub right: Vec3,
    /// Point the camera is looking at
    pub view: Vec3,
    /// Third-person zoom distance
    pub zoom: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 1.0, 0.0))
    }
}

impl CameraPose {
    /// Pose at `position` looking at `view`, with a Y-up basis
    pub fn looking_at(position: Vec3, view: Vec3) -> Self {
        let facing = (view - position).try_normalize(f32::EPSILON).unwrap_or_else(|| -Vec3::z());
        let right = facing.cross(&Vec3::y()).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x);
        let up = right.cross(&facing);
        Self { position, facing, up, right, view, zoom: (view - position).norm() }
    }

    /// Place the device camera at this pose
    pub fn look<D: RenderDevice + ?Sized>(&self, device: &mut D) {
        device.set_look_at_camera(self.position, self.view, self.up);
    }
}

/// Place the device camera for 2D overlays: looking down -Z at the origin
pub fn look_2d<D: RenderDevice + ?Sized>(device: &mut D) {
    device.set_look_at_camera(Vec3::from(OVERLAY_EYE), Vec3::zeros(), Vec3::y());
}
