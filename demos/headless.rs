use {
    anyhow::{anyhow, Context, Result},
    fireflies::{
        assets::MemoryAssets,
        config::{RendererConfig, SurfaceSize, DEFAULT_SPRITE_ASSET},
        graphics::software::{SoftwareBackend, SoftwareWindow},
        logging,
        render_thread::{Exit, FireflyRenderer},
    },
    image::{ImageFormat, Rgba, RgbaImage},
    std::{io::Cursor, path::PathBuf, thread, time::Duration},
};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 800;

/// Render fireflies into an offscreen window for a couple of seconds, fade
/// them out, then save the brightest frame seen along the way.
///
/// The output path can be passed as the first argument. It defaults to
/// `fireflies.png` in the working directory.
fn main() -> Result<()> {
    logging::setup()?;

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fireflies.png"));

    let window = SoftwareWindow::new(WIDTH, HEIGHT);
    let config = RendererConfig::new(SurfaceSize::new(WIDTH, HEIGHT)?);
    let assets = MemoryAssets::new().with(DEFAULT_SPRITE_ASSET, star_png()?);
    let renderer = FireflyRenderer::new(
        config,
        SoftwareBackend::new(),
        window.clone(),
        assets,
    );
    let handle = renderer
        .spawn()
        .context("Unable to start the render thread")?;

    let mut brightest = window.snapshot();
    for _ in 0..20 {
        thread::sleep(Duration::from_millis(100));
        let frame = window.snapshot();
        if brightness(&frame) > brightness(&brightest) {
            brightest = frame;
        }
    }

    handle.request_fade_out();
    thread::sleep(Duration::from_millis(500));
    handle.request_stop();

    let exit = handle
        .join()
        .map_err(|_| anyhow!("The render thread panicked"))?;
    log::info!(
        "Presented {} frames, exit: {:?}",
        window.frames_presented(),
        exit
    );
    if exit != Exit::Stopped {
        anyhow::bail!("Rendering ended early: {:?}", exit);
    }

    brightest
        .save(&output)
        .with_context(|| format!("Unable to save {}", output.display()))?;
    log::info!("Saved {}", output.display());

    Ok(())
}

/// A procedural four-pointed star with a soft core.
fn star_png() -> Result<Vec<u8>> {
    let sprite = RgbaImage::from_fn(32, 32, |x, y| {
        let dx = (x as f32 - 15.5).abs() / 16.0;
        let dy = (y as f32 - 15.5).abs() / 16.0;
        let core = 1.0 - (dx * dx + dy * dy).sqrt();
        let rays = 1.0 - (dx * dy).sqrt() * 4.0;
        let alpha = core.max(0.0) * rays.max(0.0);
        Rgba([255, 240, 160, (alpha * 255.0) as u8])
    });
    let mut bytes = vec![];
    sprite.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn brightness(frame: &RgbaImage) -> u64 {
    frame
        .pixels()
        .map(|p| p[0] as u64 + p[1] as u64 + p[2] as u64)
        .sum()
}
