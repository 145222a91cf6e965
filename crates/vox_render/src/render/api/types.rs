//! Value types shared between the sequencer and a [`RenderDevice`](super::RenderDevice)

use bitflags::bitflags;

use crate::foundation::math::{Colour, Vec3};

/// Device-side frame buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameBufferId(pub u32);

impl FrameBufferId {
    /// Placeholder for a frame buffer that was never registered
    pub const INVALID: Self = Self(u32::MAX);

    /// Whether this id refers to a registered frame buffer
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Device-side linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);

impl ShaderId {
    /// Placeholder for a shader that was never registered
    pub const INVALID: Self = Self(u32::MAX);

    /// Whether this id refers to a registered shader
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Raw texture object, either standalone or a frame buffer attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Location of a named uniform inside a shader program
///
/// Unknown names resolve to `-1`, which every device treats as a no-op write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// Location returned for names the program does not declare
    pub const UNKNOWN: Self = Self(-1);
}

/// Loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Frame buffer attachment channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Depth attachment
    Depth,
    /// View-space normals
    Normal,
    /// View-space positions
    Position,
    /// Colour / diffuse attachment
    Diffuse,
}

impl Attachment {
    /// Stable index, handy for handle arithmetic in headless devices
    pub const fn index(self) -> u32 {
        match self {
            Self::Depth => 0,
            Self::Normal => 1,
            Self::Position => 2,
            Self::Diffuse => 3,
        }
    }
}

/// Projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Perspective projection from the camera
    Perspective,
    /// Orthographic projection
    Orthographic,
    /// Pixel-space 2D projection, origin bottom-left
    TwoD,
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Viewport covering `width` x `height` from the origin
    pub const fn sized(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Explicit orthographic volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicBounds {
    /// Left plane
    pub left: f32,
    /// Right plane
    pub right: f32,
    /// Bottom plane
    pub bottom: f32,
    /// Top plane
    pub top: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

impl OrthographicBounds {
    /// Square volume of half-extent `radius` around the view axis
    pub const fn square(radius: f32, near: f32, far: f32) -> Self {
        Self { left: -radius, right: radius, bottom: -radius, top: radius, near, far }
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Front face winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Clockwise winding is front facing
    Clockwise,
    /// Counter-clockwise winding is front facing
    CounterClockwise,
}

/// Blend factor for transparency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// Pass when closer
    Less,
    /// Pass when closer or equal
    LessEqual,
    /// Always pass
    Always,
}

/// Polygon fill / texturing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Filled, untextured
    Solid,
    /// Wireframe
    Wireframe,
    /// Filled and textured
    Textured,
}

/// Primitive assembled by immediate-mode vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateMode {
    /// Every four vertices form a quad
    Quads,
    /// Every three vertices form a triangle
    Triangles,
    /// Every two vertices form a line
    Lines,
}

bitflags! {
    /// Buffers cleared at the start of a scene or render target
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Colour buffer
        const COLOUR = 0b001;
        /// Depth buffer
        const DEPTH = 0b010;
        /// Stencil buffer
        const STENCIL = 0b100;
    }
}

/// Per-channel colour write mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourMask {
    /// Red writes
    pub r: bool,
    /// Green writes
    pub g: bool,
    /// Blue writes
    pub b: bool,
    /// Alpha writes
    pub a: bool,
}

impl ColourMask {
    /// All channels writable
    pub const ALL: Self = Self { r: true, g: true, b: true, a: true };
    /// Depth-only rendering
    pub const NONE: Self = Self { r: false, g: false, b: false, a: false };
}

/// Fixed-function directional/ambient light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Light position
    pub position: Vec3,
    /// Ambient colour
    pub ambient: Colour,
    /// Diffuse colour
    pub diffuse: Colour,
    /// Specular colour
    pub specular: Colour,
}
