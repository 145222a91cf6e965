//! # Scene Collaborators
//!
//! Contracts the frame sequencer consumes from the game's world managers.
//! Managers own their own geometry and draw it through the device they are
//! handed; the sequencer only decides when, into which target, and with
//! which [`RenderVariant`].
//!
//! A frame borrows every collaborator at once through [`SceneContext`].

use crate::foundation::math::{Colour, Vec3};

use super::api::{RenderDevice, TextureHandle};

/// Which flavour of a manager's geometry to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderVariant {
    /// Normal shaded geometry
    Standard,
    /// Depth-only geometry for the shadow map
    Shadow,
    /// Item outlines, drawn before opaque fill
    Outline,
    /// Item silhouettes, drawn before opaque fill
    Silhouette,
    /// The player's face (transparency pass)
    Face,
    /// First-person arms and held items
    FirstPerson,
    /// Alpha-blended weapon trails
    WeaponTrails,
    /// The player model in the paperdoll viewport
    Paperdoll,
    /// The player's face in the paperdoll viewport
    PaperdollFace,
}

/// Anything the sequencer can ask to draw itself
pub trait Renderable {
    /// Draw `variant` through `device`
    fn render(&mut self, device: &mut dyn RenderDevice, variant: RenderVariant);

    /// Draw debug visualisation
    fn render_debug(&mut self, _device: &mut dyn RenderDevice) {}
}

/// Chunk counts for the debug block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkStats {
    /// Chunks loaded
    pub loaded: usize,
    /// Chunks drawn last frame
    pub rendered: usize,
}

/// Counts for a manager of posed objects (items, projectiles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PosedManagerStats {
    /// Objects alive
    pub total: usize,
    /// Objects drawn last frame
    pub rendered: usize,
}

/// Block particle counts for the debug block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleStats {
    /// Particles alive
    pub particles: usize,
    /// Particles drawn last frame
    pub rendered: usize,
    /// Active emitters
    pub emitters: usize,
    /// Active effects
    pub effects: usize,
}

/// Instanced object counts for the debug block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceStats {
    /// Instance parents (one per mesh)
    pub parents: usize,
    /// Instances across every parent
    pub objects: usize,
    /// Instances drawn last frame
    pub rendered: usize,
}

/// Terrain chunks
pub trait ChunkSource: Renderable {
    /// Terrain streaming radius around the player; sizes the shadow volume
    fn loader_radius(&self) -> f32;

    /// Debug counts
    fn stats(&self) -> ChunkStats;
}

/// The local player
pub trait PlayerSource: Renderable {
    /// Centre of the player in world space
    fn center(&self) -> Vec3;

    /// Refresh the player's world transform before anything reads it
    fn calculate_world_transform(&mut self);
}

/// Dropped and held items
pub trait ItemSource: Renderable {
    /// Refresh every item's world transform
    fn calculate_world_transform(&mut self);

    /// Debug counts
    fn stats(&self) -> PosedManagerStats;
}

/// In-flight projectiles
pub trait ProjectileSource: Renderable {
    /// Refresh every projectile's world transform
    fn calculate_world_transform(&mut self);

    /// Debug counts
    fn stats(&self) -> PosedManagerStats;
}

/// Block particles
pub trait ParticleSource: Renderable {
    /// Debug counts
    fn stats(&self) -> ParticleStats;
}

/// Instanced scenery
pub trait InstanceSource: Renderable {
    /// Debug counts
    fn stats(&self) -> InstanceStats;
}

/// The sky cube
pub trait SkyboxSource: Renderable {
    /// Cube map sampled as `cubemap1`
    fn cube_texture(&self) -> TextureHandle;
}

/// Dynamic point light, drawn as a light volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicLight {
    /// Light centre in world space
    pub position: Vec3,
    /// Influence radius
    pub radius: f32,
    /// Diffuse intensity multiplier
    pub diffuse_scale: f32,
    /// Light colour
    pub colour: Colour,
}

/// Owner of the dynamic lights
pub trait LightingSource {
    /// Lights to accumulate this frame
    fn lights(&self) -> Box<dyn Iterator<Item = &DynamicLight> + '_>;

    /// Draw light debug markers
    fn render_debug(&mut self, _device: &mut dyn RenderDevice) {}
}

/// Screen-space overlay (text effects, GUI)
pub trait Overlay {
    /// Draw in 2D; the projection is already set up by the caller
    fn render_2d(&mut self, device: &mut dyn RenderDevice);
}

/// Front-end menus
pub trait FrontEnd: Overlay {
    /// Draw front-end debug visualisation in the 3D pass
    fn render_debug(&mut self, _device: &mut dyn RenderDevice) {}
}

/// Character sheet hosting the paperdoll
pub trait CharacterSheet {
    /// Whether the sheet is open and the paperdoll should be drawn
    fn is_loaded(&self) -> bool;

    /// Paperdoll yaw in degrees
    fn paperdoll_rotation(&self) -> f32;
}

/// The game window
pub trait WindowSurface {
    /// Whether the window is minimized
    fn is_minimized(&self) -> bool;

    /// Swap buffers
    fn present(&mut self);
}

/// Every collaborator a frame draws, borrowed for the frame
pub struct SceneContext<'a> {
    /// Terrain
    pub chunks: &'a mut dyn ChunkSource,
    /// Local player
    pub player: &'a mut dyn PlayerSource,
    /// Items
    pub items: &'a mut dyn ItemSource,
    /// Projectiles
    pub projectiles: &'a mut dyn ProjectileSource,
    /// Scenery
    pub scenery: &'a mut dyn Renderable,
    /// Block particles
    pub particles: &'a mut dyn ParticleSource,
    /// Instanced scenery
    pub instances: &'a mut dyn InstanceSource,
    /// Sky cube
    pub skybox: &'a mut dyn SkyboxSource,
    /// Dynamic lights
    pub lighting: &'a mut dyn LightingSource,
    /// Floating combat text and similar
    pub text_effects: &'a mut dyn Overlay,
    /// Front-end menus
    pub front_end: &'a mut dyn FrontEnd,
    /// In-game GUI
    pub gui: &'a mut dyn Overlay,
    /// Character sheet
    pub character_sheet: &'a dyn CharacterSheet,
    /// Window
    pub window: &'a mut dyn WindowSurface,
}

impl SceneContext<'_> {
    /// Refresh world transforms of every posed entity
    pub fn update_world_transforms(&mut self) {
        self.player.calculate_world_transform();
        self.items.calculate_world_transform();
        self.projectiles.calculate_world_transform();
    }
}
