//! Math utilities and types
//!
//! Provides the small set of math types the frame sequencer needs.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Straight-line distance between two points
pub fn distance(a: &Vec3, b: &Vec3) -> f32 {
    (a - b).norm()
}

/// RGBA colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Colour {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Fully transparent black, used to clear offscreen targets
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create an opaque colour
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a colour with explicit alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an `[r, g, b, a]` array, the layout shader `vec4` uniforms expect
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Math utility functions
pub mod utils {
    /// Convert a `[x, y, z]` array (the serialized form) to a vector
    pub fn vec3_from_array(v: [f32; 3]) -> super::Vec3 {
        super::Vec3::new(v[0], v[1], v[2])
    }
}
