//! GPU texture handle: placeholder fill, bitmap upload, CPU readback.

use anyhow::{Context, Result};
use asset::texture::TextureData;
use wgpu::{
    Extent3d, Sampler, SamplerDescriptor, TextureDescriptor, TextureDimension, TextureUsages,
    TextureView, TextureViewDescriptor,
};

use crate::GpuContext;

/// Pixel shown until the real image arrives: opaque blue.
pub const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 255, 255];

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A 2D RGBA8 texture plus its sampler.
///
/// The sampler is created exactly once per handle with, in order: wrap-S
/// clamp, wrap-T clamp, linear minification, linear magnification.
#[derive(Debug)]
pub struct Texture2d {
    texture: wgpu::Texture,
    view: TextureView,
    sampler: Sampler,
    width: u32,
    height: u32,
}

impl Texture2d {
    /// 1x1 stand-in filled with [`PLACEHOLDER_RGBA`], renderable while the
    /// real image is still in flight.
    pub fn placeholder(gpu: &GpuContext) -> Self {
        let pixel = TextureData::solid_rgba8(1, 1, PLACEHOLDER_RGBA);
        Self::from_data(gpu, &pixel, "Placeholder")
    }

    /// Create a texture at `data`'s dimensions and fill it.
    pub fn from_data(gpu: &GpuContext, data: &TextureData, label: &str) -> Self {
        let (texture, view) = create_storage(gpu, data.width, data.height, label);
        let sampler = gpu.device.create_sampler(&SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            min_filter: wgpu::FilterMode::Linear,
            mag_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let tex = Self {
            texture,
            view,
            sampler,
            width: data.width,
            height: data.height,
        };
        tex.write(gpu, data);
        tex
    }

    /// Respecify the storage at `data`'s dimensions and upload its pixels.
    ///
    /// wgpu textures have fixed extents, so a size change replaces the inner
    /// texture and view. The handle identity and its sampler persist.
    pub fn upload(&mut self, gpu: &GpuContext, data: &TextureData, label: &str) {
        if (self.width, self.height) != (data.width, data.height) {
            let (texture, view) = create_storage(gpu, data.width, data.height, label);
            self.texture = texture;
            self.view = view;
            self.width = data.width;
            self.height = data.height;
        }
        self.write(gpu, data);
    }

    fn write(&self, gpu: &GpuContext, data: &TextureData) {
        debug_assert!(data.is_valid());
        gpu.queue.write_texture(
            self.texture.as_image_copy(),
            &data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_pixel() * data.width),
                rows_per_image: Some(data.height),
            },
            Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Copy the texture contents back to the CPU as tightly packed RGBA8.
    ///
    /// Blocks until the GPU finishes the copy.
    pub fn read_back(&self, gpu: &GpuContext) -> Result<Vec<u8>> {
        let bytes_per_row = 4 * self.width;
        // copy_texture_to_buffer rows must be 256-byte aligned.
        let padded_bytes_per_row = bytes_per_row
            .div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback"),
            size: (padded_bytes_per_row * self.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ReadbackEncoder"),
            });
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        gpu.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        gpu.device
            .poll(wgpu::PollType::Wait)
            .context("device poll failed")?;
        rx.recv()
            .context("map_async callback dropped")?
            .context("buffer mapping failed")?;

        let mapped = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((bytes_per_row * self.height) as usize);
        for row in mapped.chunks(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..bytes_per_row as usize]);
        }
        drop(mapped);
        buffer.unmap();

        Ok(pixels)
    }
}

fn create_storage(
    gpu: &GpuContext,
    width: u32,
    height: u32,
    label: &str,
) -> (wgpu::Texture, TextureView) {
    let texture = gpu.device.create_texture(&TextureDescriptor {
        label: Some(label),
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&TextureViewDescriptor::default());
    (texture, view)
}
