use std::sync::mpsc;

use anyhow::{Context, Result, ensure};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::HeadlessGpu;

/// Off-screen color target (RGBA8, sRGB) that can be read back to the CPU.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(gpu: &HeadlessGpu, width: u32, height: u32) -> Result<Self> {
        ensure!(width > 0 && height > 0, "render target has zero size ({width}x{height})");

        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("slate offscreen target"),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Renderer context whose viewport matches the target in pixels.
    pub fn render_ctx<'a>(&self, gpu: &'a HeadlessGpu) -> RenderCtx<'a> {
        RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            Self::FORMAT,
            Viewport::new(self.width as f32, self.height as f32),
        )
    }

    /// Draw target over this texture, recording into `encoder`.
    pub fn render_target<'a>(&'a self, encoder: &'a mut wgpu::CommandEncoder) -> RenderTarget<'a> {
        RenderTarget::new(encoder, &self.view)
    }

    /// Records a pass that clears the whole target to `color`.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder, color: Color) {
        let [r, g, b, a] = color.to_array();
        let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("slate clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Copies the target back and returns tightly packed RGBA8 rows, top row first.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_rgba(&self, gpu: &HeadlessGpu) -> Result<Vec<u8>> {
        let unpadded = self.width * 4;
        let padded = padded_bytes_per_row(self.width);

        let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("slate readback buffer"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = gpu.create_encoder("slate readback encoder");
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            extent(self.width, self.height),
        );
        gpu.submit(encoder);

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        gpu.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to wait for GPU read-back")?;
        rx.recv()
            .context("read-back callback was dropped")?
            .context("failed to map read-back buffer")?;

        let mapped = slice.get_mapped_range();
        let pixels = strip_row_padding(&mapped, unpadded as usize, padded as usize, self.height as usize);
        drop(mapped);
        buffer.unmap();

        Ok(pixels)
    }
}

#[inline]
fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Row pitch for texture-to-buffer copies (RGBA8).
fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

fn strip_row_padding(data: &[u8], unpadded: usize, padded: usize, rows: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(unpadded * rows);
    for row in data.chunks(padded).take(rows) {
        out.extend_from_slice(&row[..unpadded]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_pitch_is_aligned() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn padding_is_removed_per_row() {
        let data = [1, 2, 0, 0, 3, 4, 0, 0];
        assert_eq!(strip_row_padding(&data, 2, 4, 2), vec![1, 2, 3, 4]);
    }
}
