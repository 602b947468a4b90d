//! Renderer: headless wgpu context + texture upload.
//! wgpu = 26.x

pub mod loader;
pub mod texture;

pub use loader::{LoadError, load_texture, try_load_texture};
pub use texture::{PLACEHOLDER_RGBA, Texture2d};

use anyhow::{Context, Result};
use wgpu::{
    Device, DeviceDescriptor, Features, Instance, InstanceDescriptor, Limits, PowerPreference,
    Queue,
};

/// Headless GPU context: device + queue, no surface.
///
/// Every upload and parameter call names its target texture explicitly,
/// so there is no "currently bound" register to re-arm after a suspension
/// point.
pub struct GpuContext {
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a GPU context on any available adapter.
    pub async fn new(backends: wgpu::Backends) -> Result<Self> {
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Texfetch Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("request_device failed")?;

        Ok(Self { device, queue })
    }
}
