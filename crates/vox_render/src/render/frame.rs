//! Frame Snapshot
//!
//! Everything a frame reads that the game may change between frames. The
//! game builds one [`FrameSnapshot`] before calling
//! [`FrameSequencer::render_frame`](super::FrameSequencer::render_frame) and
//! the sequencer treats it as immutable for the whole frame, so a toggle
//! flipped mid-frame cannot leave half the passes configured one way and
//! half the other.

use crate::config::RenderFlags;

use super::api::Viewport;
use super::camera::CameraPose;

/// Active camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Camera inside the player's head; draws the first-person model
    FirstPerson,
    /// Camera orbiting the player
    #[default]
    ThirdPerson,
}

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Menus; the world is a backdrop
    #[default]
    FrontEnd,
    /// Playing in the world
    InGame,
}

/// Window client area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowExtent {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowExtent {
    fn default() -> Self {
        Self { width: 800, height: 800 }
    }
}

impl WindowExtent {
    /// Viewport covering the whole window
    pub const fn viewport(self) -> Viewport {
        Viewport::sized(self.width, self.height)
    }

    /// Width as a float, for pixel-space geometry
    #[allow(clippy::cast_precision_loss)]
    pub fn width_f32(self) -> f32 {
        self.width as f32
    }

    /// Height as a float, for pixel-space geometry
    #[allow(clippy::cast_precision_loss)]
    pub fn height_f32(self) -> f32 {
        self.height as f32
    }

    /// Width as a shader int uniform
    pub fn width_i32(self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Height as a shader int uniform
    pub fn height_i32(self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// Frame timing shown in the debug text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Frames per second
    pub fps: f32,
}

/// Immutable per-frame render state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSnapshot {
    /// Pipeline toggles for this frame
    pub flags: RenderFlags,
    /// Active camera
    pub camera_mode: CameraMode,
    /// Front-end or in-game
    pub game_mode: GameMode,
    /// Cinematic letterbox amount, `0.0` for none
    pub letterbox_ratio: f32,
    /// Blur override, used while positive
    pub global_blur_amount: f32,
    /// Window size
    pub window: WindowExtent,
    /// Main camera
    pub camera: CameraPose,
    /// Frame timing
    pub timing: FrameTiming,
}

impl FrameSnapshot {
    /// Snapshot with `flags` and defaults for everything else
    pub fn with_flags(flags: RenderFlags) -> Self {
        Self { flags, ..Self::default() }
    }

    /// Viewport covering the whole window
    pub const fn viewport(&self) -> Viewport {
        self.window.viewport()
    }

    /// Whether the first-person camera is active
    pub fn first_person(&self) -> bool {
        self.camera_mode == CameraMode::FirstPerson
    }

    /// Whether the front-end menus are showing
    pub fn in_front_end(&self) -> bool {
        self.game_mode == GameMode::FrontEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_covers_window() {
        let frame = FrameSnapshot {
            window: WindowExtent { width: 1280, height: 720 },
            ..FrameSnapshot::default()
        };
        assert_eq!(frame.viewport(), Viewport { x: 0, y: 0, width: 1280, height: 720 });
    }

    #[test]
    fn test_mode_helpers() {
        let frame = FrameSnapshot {
            camera_mode: CameraMode::FirstPerson,
            game_mode: GameMode::InGame,
            ..FrameSnapshot::with_flags(RenderFlags::minimal())
        };
        assert!(frame.first_person());
        assert!(!frame.in_front_end());
        assert!(!frame.flags.shadows);
    }
}
