//! Stub world for frame tests
//!
//! Every stub collaborator draws a text marker (`"<name>:<variant>"`) in
//! [`MARKER_FONT`] when asked to render, so its position in the recorded
//! command stream shows which target and bracket it was drawn into.
//! Calls that issue no device command go to a shared call log.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{RenderFlags, RenderSettings};
use crate::foundation::math::{Colour, Vec3};
use crate::render::api::{FontId, RenderDevice, TextureHandle};
use crate::render::backends::{DeviceCommand, RecordingDevice};
use crate::render::frame::{CameraMode, FrameSnapshot, GameMode, WindowExtent};
use crate::render::passes::fixtures;
use crate::render::scene::{
    CharacterSheet, ChunkSource, ChunkStats, FrontEnd, InstanceSource, InstanceStats, ItemSource,
    Overlay, ParticleSource, ParticleStats, PlayerSource, PosedManagerStats, ProjectileSource,
    RenderVariant, Renderable, SceneContext, SkyboxSource, WindowSurface,
};
use crate::render::sequencer::{FrameOutcome, FrameSequencer};
use crate::render::systems::lighting::LightingManager;

/// Font used for collaborator markers
pub const MARKER_FONT: FontId = FontId(99);

pub type CallLog = Rc<RefCell<Vec<String>>>;

fn marker(device: &mut dyn RenderDevice, text: String) {
    device.render_text(MARKER_FONT, 0.0, 0.0, 1.0, Colour::WHITE, 1.0, &text);
}

pub struct Stub {
    name: &'static str,
    log: CallLog,
}

impl Stub {
    fn new(name: &'static str, log: &CallLog) -> Self {
        Self { name, log: Rc::clone(log) }
    }
}

impl Renderable for Stub {
    fn render(&mut self, device: &mut dyn RenderDevice, variant: RenderVariant) {
        marker(device, format!("{}:{:?}", self.name, variant));
    }

    fn render_debug(&mut self, device: &mut dyn RenderDevice) {
        marker(device, format!("{}:debug", self.name));
    }
}

impl ChunkSource for Stub {
    fn loader_radius(&self) -> f32 {
        64.0
    }

    fn stats(&self) -> ChunkStats {
        ChunkStats { loaded: 40, rendered: 12 }
    }
}

impl PlayerSource for Stub {
    fn center(&self) -> Vec3 {
        Vec3::new(10.0, 20.0, 30.0)
    }

    fn calculate_world_transform(&mut self) {
        self.log.borrow_mut().push(format!("{}:transform", self.name));
    }
}

impl ItemSource for Stub {
    fn calculate_world_transform(&mut self) {
        self.log.borrow_mut().push(format!("{}:transform", self.name));
    }

    fn stats(&self) -> PosedManagerStats {
        PosedManagerStats { total: 3, rendered: 2 }
    }
}

impl ProjectileSource for Stub {
    fn calculate_world_transform(&mut self) {
        self.log.borrow_mut().push(format!("{}:transform", self.name));
    }

    fn stats(&self) -> PosedManagerStats {
        PosedManagerStats { total: 5, rendered: 1 }
    }
}

impl ParticleSource for Stub {
    fn stats(&self) -> ParticleStats {
        ParticleStats { particles: 100, rendered: 80, emitters: 2, effects: 1 }
    }
}

impl InstanceSource for Stub {
    fn stats(&self) -> InstanceStats {
        InstanceStats { parents: 2, objects: 50, rendered: 20 }
    }
}

impl SkyboxSource for Stub {
    fn cube_texture(&self) -> TextureHandle {
        TextureHandle(500)
    }
}

impl Overlay for Stub {
    fn render_2d(&mut self, device: &mut dyn RenderDevice) {
        marker(device, format!("{}:2d", self.name));
    }
}

impl FrontEnd for Stub {
    fn render_debug(&mut self, device: &mut dyn RenderDevice) {
        marker(device, format!("{}:debug", self.name));
    }
}

pub struct Sheet {
    pub loaded: bool,
}

impl CharacterSheet for Sheet {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn paperdoll_rotation(&self) -> f32 {
        45.0
    }
}

pub struct Window {
    pub minimized: bool,
    log: CallLog,
}

impl WindowSurface for Window {
    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn present(&mut self) {
        self.log.borrow_mut().push("window:present".to_string());
    }
}

pub struct World {
    pub log: CallLog,
    pub chunks: Stub,
    pub player: Stub,
    pub items: Stub,
    pub projectiles: Stub,
    pub scenery: Stub,
    pub particles: Stub,
    pub instances: Stub,
    pub skybox: Stub,
    pub text_effects: Stub,
    pub front_end: Stub,
    pub gui: Stub,
    pub lighting: LightingManager,
    pub sheet: Sheet,
    pub window: Window,
}

impl World {
    pub fn new() -> Self {
        let log: CallLog = Rc::default();
        let mut lighting = LightingManager::new();
        lighting.add_light(Vec3::new(0.0, 5.0, 0.0), 6.0, 1.0, Colour::rgb(1.0, 0.8, 0.6));
        lighting.add_light(Vec3::new(40.0, 5.0, 0.0), 3.0, 0.5, Colour::WHITE);

        Self {
            chunks: Stub::new("chunks", &log),
            player: Stub::new("player", &log),
            items: Stub::new("items", &log),
            projectiles: Stub::new("projectiles", &log),
            scenery: Stub::new("scenery", &log),
            particles: Stub::new("particles", &log),
            instances: Stub::new("instances", &log),
            skybox: Stub::new("skybox", &log),
            text_effects: Stub::new("text_effects", &log),
            front_end: Stub::new("front_end", &log),
            gui: Stub::new("gui", &log),
            lighting,
            sheet: Sheet { loaded: false },
            window: Window { minimized: false, log: Rc::clone(&log) },
            log,
        }
    }

    pub fn scene(&mut self) -> SceneContext<'_> {
        SceneContext {
            chunks: &mut self.chunks,
            player: &mut self.player,
            items: &mut self.items,
            projectiles: &mut self.projectiles,
            scenery: &mut self.scenery,
            particles: &mut self.particles,
            instances: &mut self.instances,
            skybox: &mut self.skybox,
            lighting: &mut self.lighting,
            text_effects: &mut self.text_effects,
            front_end: &mut self.front_end,
            gui: &mut self.gui,
            character_sheet: &self.sheet,
            window: &mut self.window,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

pub fn in_game(flags: RenderFlags) -> FrameSnapshot {
    FrameSnapshot {
        flags,
        game_mode: GameMode::InGame,
        camera_mode: CameraMode::ThirdPerson,
        window: WindowExtent { width: 1024, height: 768 },
        ..FrameSnapshot::default()
    }
}

pub fn sequencer() -> FrameSequencer {
    FrameSequencer::new(fixtures::resources(), RenderSettings::default()).unwrap()
}

/// Render one frame of `world` and return the recorder
pub fn render(world: &mut World, frame: &FrameSnapshot) -> (FrameOutcome, RecordingDevice) {
    let mut device = RecordingDevice::new();
    let outcome = sequencer().render_frame(&mut device, &mut world.scene(), frame);
    (outcome, device)
}

/// Index of the first marker reading `text`
pub fn marker_position(device: &RecordingDevice, text: &str) -> Option<usize> {
    device.position(|c| matches!(c, DeviceCommand::RenderText { font, text: t, .. } if *font == MARKER_FONT && t == text))
}

/// Every marker, in draw order
pub fn markers(device: &RecordingDevice) -> Vec<String> {
    device
        .commands()
        .iter()
        .filter_map(|c| match c {
            DeviceCommand::RenderText { font, text, .. } if *font == MARKER_FONT => Some(text.clone()),
            _ => None,
        })
        .collect()
}
