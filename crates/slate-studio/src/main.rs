use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use slate_engine::coords::{Rect, Vec2};
use slate_engine::device::{GpuInit, HeadlessGpu, OffscreenTarget};
use slate_engine::geom::Polygon;
use slate_engine::logging::{LoggingConfig, init_logging};
use slate_engine::paint::{Color, GradientFill, LinearGradient, SolidFill};
use slate_engine::render::{
    ImmediateBackend, ImmediateRenderer, Image, ShapeRenderer, VertexBatch,
};

/// Renders a gallery of outlined, filled and textured shapes to a PNG.
#[derive(Parser, Debug)]
#[command(name = "slate-studio")]
#[command(about = "Headless shape gallery rendered with slate-engine", long_about = None)]
struct Args {
    /// Output PNG path
    #[arg(short, long, default_value = "gallery.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "360")]
    height: u32,

    /// Log filter (env_logger syntax); falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,

    /// Use a software adapter
    #[arg(long)]
    fallback_adapter: bool,
}

const CHECKER_SIZE: u32 = 8;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let gpu = HeadlessGpu::new_blocking(GpuInit {
        force_fallback_adapter: args.fallback_adapter,
        ..GpuInit::default()
    })?;
    let target = OffscreenTarget::new(&gpu, args.width, args.height)?;
    let ctx = target.render_ctx(&gpu);

    let mut renderer = ImmediateRenderer::new();
    let checker = renderer
        .upload_texture(&ctx, CHECKER_SIZE, CHECKER_SIZE, &checkerboard(CHECKER_SIZE))
        .context("failed to upload checkerboard texture")?;
    let checker = Image::from(checker);

    let mut batch = VertexBatch::new();
    build_gallery(&mut batch, &checker, args.width as f32, args.height as f32)?;
    log::info!(
        "gallery: {} vertices in {} batches",
        batch.vertices().len(),
        batch.batches().len()
    );

    let mut encoder = gpu.create_encoder("slate-studio encoder");
    target.clear(&mut encoder, Color::from_srgb_u8(24, 26, 32, 255));
    {
        let mut rt = target.render_target(&mut encoder);
        renderer.begin_frame();
        renderer.render(&ctx, &mut rt, &batch);
    }
    gpu.submit(encoder);

    let pixels = target.read_rgba(&gpu)?;
    let png = image::RgbaImage::from_raw(args.width, args.height, pixels)
        .context("read-back size does not match the target")?;
    png.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!("wrote {}", args.output.display());
    Ok(())
}

/// Four cells: outline, gradient fill, tiled texture, fitted texture.
fn build_gallery(
    backend: &mut dyn ImmediateBackend,
    image: &Image,
    width: f32,
    height: f32,
) -> Result<()> {
    let renderer = ShapeRenderer::new();
    let cell = Vec2::new(width / 4.0, height);
    let pad = 16.0;
    let cell_rect = |i: f32| {
        Rect::new(
            cell.x * i + pad,
            pad,
            cell.x - 2.0 * pad,
            cell.y - 2.0 * pad,
        )
    };

    // Outline: ellipse plus an open zig-zag.
    let r = cell_rect(0.0);
    let ellipse = Polygon::ellipse(r.center(), r.size * 0.45, 48)?;
    backend.color(Color::WHITE);
    renderer.draw(backend, &ellipse);
    let zigzag = Polygon::from_points(&[
        r.min(),
        Vec2::new(r.center().x, r.max().y),
        Vec2::new(r.max().x, r.min().y),
    ])?
    .with_closed(false);
    renderer.draw_with_fill(backend, &zigzag, &SolidFill::new(Color::from_srgb_u8(255, 190, 60, 255)));

    // Gradient fill, axis relative to the shape center.
    let r = cell_rect(1.0);
    let half = r.size * 0.5;
    let gradient = LinearGradient::two_stop(
        Vec2::new(0.0, -half.y),
        Color::from_srgb_u8(80, 160, 255, 255),
        Vec2::new(0.0, half.y),
        Color::from_srgb_u8(200, 40, 120, 255),
    );
    renderer.fill_with(backend, &Polygon::rect(r), &GradientFill::local(gradient));

    // Tiled texture at the default scale.
    let r = cell_rect(2.0);
    let disc = Polygon::ellipse(r.center(), Vec2::splat(r.width().min(r.height()) * 0.5), 64)?;
    backend.color(Color::WHITE);
    renderer.texture(backend, &disc, image);

    // Fitted texture: two repeats across, four down.
    let r = cell_rect(3.0);
    renderer.texture_fit_scaled(backend, &Polygon::rect(r), image, Vec2::new(2.0, 4.0));
    renderer.draw(backend, &Polygon::rect(r));

    Ok(())
}

/// Opaque two-tone checkerboard, one texel per cell.
fn checkerboard(size: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if (x + y) % 2 == 0 { 235 } else { 70 };
            out.extend_from_slice(&[v, v, v, 255]);
        }
    }
    out
}
