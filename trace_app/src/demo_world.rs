//! Demo scene for the frame trace
//!
//! A small procedural world: a grid of terrain chunks, a player, a few items
//! and projectiles, and point lights scattered around the spawn. Each
//! collaborator issues a handful of device calls per object so the recorded
//! stream has the shape of a real frame.

use rand::Rng;

use vox_render::foundation::math::{Colour, Vec3};
use vox_render::render::guards::{MatrixScope, MeshScope};
use vox_render::render::{
    CharacterSheet, ChunkSource, ChunkStats, FontId, FrontEnd, InstanceSource, InstanceStats, ItemSource,
    LightingManager, Overlay, ParticleSource, ParticleStats, PlayerSource, PosedManagerStats,
    ProjectileSource, RenderDevice, RenderVariant, Renderable, SceneContext, SkyboxSource,
    TextureHandle, WindowSurface,
};

const CHUNK_SIZE: f32 = 16.0;

fn draw_at(device: &mut dyn RenderDevice, position: Vec3) {
    let mut matrix = MatrixScope::push(device);
    matrix.translate(position);
    let _mesh = MeshScope::begin(&mut *matrix);
}

/// Square grid of terrain chunks around the origin
pub struct Terrain {
    chunks: Vec<Vec3>,
    loader_radius: f32,
    rendered: usize,
}

impl Terrain {
    pub fn new(half_extent: i32) -> Self {
        let chunks = (-half_extent..half_extent)
            .flat_map(|x| (-half_extent..half_extent).map(move |z| (x, z)))
            .map(|(x, z)| Vec3::new(x as f32 * CHUNK_SIZE, 0.0, z as f32 * CHUNK_SIZE))
            .collect();

        Self {
            chunks,
            loader_radius: half_extent as f32 * CHUNK_SIZE,
            rendered: 0,
        }
    }
}

impl Renderable for Terrain {
    fn render(&mut self, device: &mut dyn RenderDevice, variant: RenderVariant) {
        for chunk in &self.chunks {
            draw_at(device, *chunk);
        }
        if variant == RenderVariant::Standard {
            self.rendered = self.chunks.len();
        }
    }
}

impl ChunkSource for Terrain {
    fn loader_radius(&self) -> f32 {
        self.loader_radius
    }

    fn stats(&self) -> ChunkStats {
        ChunkStats { loaded: self.chunks.len(), rendered: self.rendered }
    }
}

/// The local player
pub struct Avatar {
    pub position: Vec3,
    pub transform_updates: u64,
}

impl Renderable for Avatar {
    fn render(&mut self, device: &mut dyn RenderDevice, _variant: RenderVariant) {
        draw_at(device, self.position);
    }
}

impl PlayerSource for Avatar {
    fn center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, 1.0, 0.0)
    }

    fn calculate_world_transform(&mut self) {
        self.transform_updates += 1;
    }
}

/// Items or projectiles: posed objects with a world transform each
pub struct PosedSet {
    positions: Vec<Vec3>,
    rendered: usize,
}

impl PosedSet {
    pub fn scattered(rng: &mut impl Rng, count: usize, spread: f32) -> Self {
        let positions = (0..count)
            .map(|_| Vec3::new(rng.gen_range(-spread..spread), 1.0, rng.gen_range(-spread..spread)))
            .collect();
        Self { positions, rendered: 0 }
    }

    fn counts(&self) -> PosedManagerStats {
        PosedManagerStats { total: self.positions.len(), rendered: self.rendered }
    }
}

impl Renderable for PosedSet {
    fn render(&mut self, device: &mut dyn RenderDevice, variant: RenderVariant) {
        for position in &self.positions {
            draw_at(device, *position);
        }
        if variant == RenderVariant::Standard {
            self.rendered = self.positions.len();
        }
    }
}

impl ItemSource for PosedSet {
    fn calculate_world_transform(&mut self) {}

    fn stats(&self) -> PosedManagerStats {
        self.counts()
    }
}

impl ProjectileSource for PosedSet {
    fn calculate_world_transform(&mut self) {}

    fn stats(&self) -> PosedManagerStats {
        self.counts()
    }
}

/// Anything the trace draws as a single object
pub struct Prop {
    position: Vec3,
}

impl Renderable for Prop {
    fn render(&mut self, device: &mut dyn RenderDevice, _variant: RenderVariant) {
        draw_at(device, self.position);
    }
}

impl ParticleSource for Prop {
    fn stats(&self) -> ParticleStats {
        ParticleStats { particles: 1, rendered: 1, emitters: 1, effects: 0 }
    }
}

impl InstanceSource for Prop {
    fn stats(&self) -> InstanceStats {
        InstanceStats { parents: 1, objects: 1, rendered: 1 }
    }
}

/// Sky cube
pub struct Sky {
    texture: TextureHandle,
}

impl Renderable for Sky {
    fn render(&mut self, device: &mut dyn RenderDevice, _variant: RenderVariant) {
        let _mesh = MeshScope::begin(device);
    }
}

impl SkyboxSource for Sky {
    fn cube_texture(&self) -> TextureHandle {
        self.texture
    }
}

/// Screen text drawn with the default font
pub struct Caption {
    text: &'static str,
    y: f32,
}

impl Overlay for Caption {
    fn render_2d(&mut self, device: &mut dyn RenderDevice) {
        device.render_text(FontId(1), 20.0, self.y, 1.0, Colour::WHITE, 1.0, self.text);
    }
}

impl FrontEnd for Caption {}

/// Character sheet toggled by the frame script
pub struct Sheet {
    pub open: bool,
    pub rotation: f32,
}

impl CharacterSheet for Sheet {
    fn is_loaded(&self) -> bool {
        self.open
    }

    fn paperdoll_rotation(&self) -> f32 {
        self.rotation
    }
}

/// Window with nothing to swap
#[derive(Default)]
pub struct HeadlessWindow {
    pub minimized: bool,
    pub presented: u64,
}

impl WindowSurface for HeadlessWindow {
    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

/// Every collaborator of the trace scene
pub struct DemoWorld {
    pub terrain: Terrain,
    pub player: Avatar,
    pub items: PosedSet,
    pub projectiles: PosedSet,
    pub scenery: Prop,
    pub particles: Prop,
    pub instances: Prop,
    pub sky: Sky,
    pub lighting: LightingManager,
    pub text_effects: Caption,
    pub menu: Caption,
    pub hud: Caption,
    pub sheet: Sheet,
    pub window: HeadlessWindow,
}

impl DemoWorld {
    /// Build the scene with `light_count` random point lights
    pub fn generate(rng: &mut impl Rng, light_count: usize) -> Self {
        let mut lighting = LightingManager::new();
        for _ in 0..light_count {
            let position = Vec3::new(rng.gen_range(-48.0..48.0), rng.gen_range(2.0..8.0), rng.gen_range(-48.0..48.0));
            let colour = Colour::rgb(rng.gen(), rng.gen(), rng.gen());
            lighting.add_light(position, rng.gen_range(2.0..10.0), rng.gen_range(0.5..1.5), colour);
        }

        Self {
            terrain: Terrain::new(3),
            player: Avatar { position: Vec3::zeros(), transform_updates: 0 },
            items: PosedSet::scattered(rng, 4, 20.0),
            projectiles: PosedSet::scattered(rng, 2, 10.0),
            scenery: Prop { position: Vec3::new(8.0, 0.0, 8.0) },
            particles: Prop { position: Vec3::new(-4.0, 2.0, 0.0) },
            instances: Prop { position: Vec3::new(0.0, 0.0, -12.0) },
            sky: Sky { texture: TextureHandle(900) },
            lighting,
            text_effects: Caption { text: "+25 XP", y: 400.0 },
            menu: Caption { text: "PRESS START", y: 200.0 },
            hud: Caption { text: "HP 100", y: 20.0 },
            sheet: Sheet { open: false, rotation: 0.0 },
            window: HeadlessWindow::default(),
        }
    }

    /// Borrow every collaborator for one frame
    pub fn scene(&mut self) -> SceneContext<'_> {
        SceneContext {
            chunks: &mut self.terrain,
            player: &mut self.player,
            items: &mut self.items,
            projectiles: &mut self.projectiles,
            scenery: &mut self.scenery,
            particles: &mut self.particles,
            instances: &mut self.instances,
            skybox: &mut self.sky,
            lighting: &mut self.lighting,
            text_effects: &mut self.text_effects,
            front_end: &mut self.menu,
            gui: &mut self.hud,
            character_sheet: &self.sheet,
            window: &mut self.window,
        }
    }
}
