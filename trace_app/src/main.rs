//! Frame trace application
//!
//! Drives the pass sequencer over a procedural demo world with the
//! recording device, audits every frame for bracket defects and logs a
//! per-frame summary of the command stream.
//!
//! ```text
//! frame_trace [settings.toml|settings.ron] [seed]
//! ```

mod demo_world;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use demo_world::DemoWorld;
use vox_render::foundation::logging;
use vox_render::prelude::*;
use vox_render::render::{FontId, FrameBufferId, ShaderId};

const DEFAULT_SETTINGS_PATH: &str = "vox_render.toml";
const DEFAULT_SEED: u64 = 7;
const LIGHT_COUNT: usize = 12;

/// Errors that end the trace
#[derive(Error, Debug)]
enum TraceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("frame '{label}': {source}")]
    Frame { label: &'static str, source: RenderError },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid seed '{0}'")]
    Seed(String),
}

/// One scripted frame
struct Step {
    label: &'static str,
    frame: FrameSnapshot,
    sheet_open: bool,
    minimized: bool,
}

fn resources() -> RenderResult<RenderResources> {
    let mut builder = RenderResources::builder().font(FontId(1));
    for (id, key) in (1..).zip(FrameBufferKey::ALL) {
        builder = builder.frame_buffer(key, FrameBufferId(id));
    }
    for (id, key) in (100..).zip(ShaderKey::ALL) {
        builder = builder.shader(key, ShaderId(id));
    }
    builder.build()
}

fn script(flags: RenderFlags) -> Vec<Step> {
    let base = FrameSnapshot {
        flags,
        game_mode: GameMode::InGame,
        window: WindowExtent { width: 1280, height: 720 },
        camera: CameraPose::looking_at(Vec3::new(0.0, 12.0, 20.0), Vec3::new(0.0, 1.0, 0.0)),
        timing: FrameTiming { delta: 1.0 / 60.0, fps: 60.0 },
        ..FrameSnapshot::default()
    };

    vec![
        Step { label: "front end", frame: FrameSnapshot { game_mode: GameMode::FrontEnd, ..base }, sheet_open: false, minimized: false },
        Step { label: "third person", frame: base, sheet_open: false, minimized: false },
        Step { label: "first person", frame: FrameSnapshot { camera_mode: CameraMode::FirstPerson, ..base }, sheet_open: false, minimized: false },
        Step { label: "character sheet", frame: base, sheet_open: true, minimized: false },
        Step { label: "cutscene", frame: FrameSnapshot { letterbox_ratio: 0.6, global_blur_amount: 0.004, ..base }, sheet_open: false, minimized: false },
        Step { label: "minimized", frame: base, sheet_open: false, minimized: true },
        Step {
            label: "debug",
            frame: FrameSnapshot { flags: RenderFlags { debug_render: true, ..flags }, ..base },
            sheet_open: false,
            minimized: false,
        },
    ]
}

fn summarize(label: &str, outcome: FrameOutcome, device: &RecordingDevice) {
    if outcome == FrameOutcome::SkippedMinimized {
        log::info!("{label:>16}: skipped (window minimized)");
        return;
    }

    let passes = device.count(|c| matches!(c, DeviceCommand::StartRenderTo(_)));
    let programs = device.count(|c| matches!(c, DeviceCommand::BeginShader(_)));
    let uniforms = device.count(|c| matches!(c, DeviceCommand::SetUniform { .. }));
    let draws = device.count(|c| {
        matches!(c, DeviceCommand::StartMeshRender | DeviceCommand::DrawSphere { .. } | DeviceCommand::EnableImmediate(_))
    });

    log::info!(
        "{label:>16}: {} commands, {passes} offscreen targets, {programs} program binds, {uniforms} uniforms, {draws} draws",
        device.commands().len(),
    );
}

fn run() -> Result<(), TraceError> {
    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let seed = match args.next() {
        Some(seed) => seed.parse().map_err(|_| TraceError::Seed(seed))?,
        None => DEFAULT_SEED,
    };

    let settings = RenderSettings::load_or_default(&settings_path)?;
    let flags = settings.flags;
    let mut sequencer = FrameSequencer::new(resources()?, settings)?;
    log::info!(
        "Tracing render settings {} (shadow map {:?}, light offset {:?})",
        sequencer.settings().version,
        sequencer.resources().frame_buffer(FrameBufferKey::Shadow),
        sequencer.default_light().position,
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = DemoWorld::generate(&mut rng, LIGHT_COUNT);
    log::info!("Demo world ready: {} lights, seed {seed}", world.lighting.len());

    for (index, step) in script(flags).into_iter().enumerate() {
        world.sheet.open = step.sheet_open;
        world.sheet.rotation = index as f32 * 30.0;
        world.window.minimized = step.minimized;

        let mut device = RecordingDevice::new();
        let outcome = sequencer.render_frame(&mut device, &mut world.scene(), &step.frame);

        device
            .audit()
            .map_err(|source| TraceError::Frame { label: step.label, source })?;
        summarize(step.label, outcome, &device);
    }

    log::info!(
        "Rendered {} frame(s), presented {}, {} transform update(s)",
        sequencer.frame_count(),
        world.window.presented,
        world.player.transform_updates,
    );
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);

    if let Err(e) = run() {
        log::error!("Frame trace failed: {e}");
        std::process::exit(1);
    }
}
