//! Sprite batch demo
//!
//! Drives a few frames of the sprite batcher against the headless backend
//! and logs what reached the device. Pass a `.toml` or `.ron` file to
//! override the batch configuration:
//!
//! ```text
//! RUST_LOG=debug cargo run -p sprite_demo -- batch.toml
//! ```

use sprite_batch::foundation::logging;
use sprite_batch::prelude::*;
use sprite_batch::render::backends::headless::{HeadlessDevice, HeadlessEffect};
use thiserror::Error;

const VIEWPORT_WIDTH: u32 = 800;
const VIEWPORT_HEIGHT: u32 = 480;
const SPRITE_SIZE: u32 = 32;

/// Demo failures
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),
}

fn load_config() -> Result<SpriteBatchConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading batch configuration from {}", path);
            Ok(SpriteBatchConfig::load_from_file(path)?)
        }
        None => Ok(SpriteBatchConfig::default()),
    }
}

/// Sprites laid out in a grid that wraps at the viewport edge
fn grid_position(index: usize) -> Vec2 {
    let columns = (VIEWPORT_WIDTH / SPRITE_SIZE) as usize;
    let column = (index % columns) as f32;
    let row = (index / columns) as f32;
    Vec2::new(column * SPRITE_SIZE as f32, row * SPRITE_SIZE as f32)
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let initial_quads = config.initial_quads;

    let mut device = HeadlessDevice::new(Viewport::new(0, 0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT));
    let image = device.create_texture(SPRITE_SIZE, SPRITE_SIZE);
    let mut batch = SpriteBatch::new(device, HeadlessEffect::new(), image, config)?;

    // Frame 1: two sprites
    batch.begin(BeginParams::default())?;
    batch.draw(Vec2::new(100.0, 100.0))?;
    batch.draw(Vec2::new(200.0, 300.0))?;
    batch.end()?;

    // Frame 2: one more sprite than the initial reservation, forcing a growth
    let sprite_count = initial_quads + 1;
    batch.begin(BeginParams::default().with_sampler(SamplerState::PointClamp))?;
    for i in 0..sprite_count {
        let tint = if i % 2 == 0 { Color::WHITE } else { Color::CORNFLOWER_BLUE };
        batch.draw_with_color(grid_position(i), tint)?;
    }
    batch.end()?;

    // Frame 3: nothing drawn, nothing submitted
    batch.begin(BeginParams::default())?;
    batch.end()?;

    for (frame, draw) in batch.device().draws().enumerate() {
        log::info!(
            "Draw {}: {} triangles, sampler {:?}, texture {:?}",
            frame + 1,
            draw.triangle_count,
            draw.sampler,
            draw.texture.map(|texture| texture.handle())
        );
    }

    let stats = batch.stats();
    log::info!(
        "{} sprites in {} draw calls ({:.1} per call), {} buffer recreation(s), capacity {} quads",
        stats.sprites_drawn,
        stats.draw_calls,
        stats.avg_sprites_per_draw_call(),
        stats.buffer_recreations,
        batch.vertex_capacity() / 4
    );

    Ok(())
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("Sprite demo failed: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
