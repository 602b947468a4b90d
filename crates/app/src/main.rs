//! Entry point for texfetch.
//! Logging + CLI flags, then a single URL -> GPU texture load.

use anyhow::{Context, Result};
use renderer::GpuContext;

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    eprintln!("[warn] Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_url_arg() -> Option<String> {
    let mut url = None;
    for arg in std::env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--url=") {
            url = Some(val.to_string());
        } else if !arg.starts_with("--") {
            url = Some(arg);
        }
    }
    url
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let url = parse_url_arg()
        .context("Usage: app [--gpu-backend=auto|vulkan|dx12|metal|gl] <image-url>")?;
    log::info!("Starting texfetch. Backend: {:?}, url={}", backends, url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(async {
        let gpu = GpuContext::new(backends).await?;
        let http = reqwest::Client::new();
        match renderer::load_texture(&gpu, &http, &url).await {
            Some(texture) => {
                log::info!("Texture ready: {}x{}", texture.width(), texture.height());
                Ok(())
            }
            None => anyhow::bail!("Texture load failed, see log for details"),
        }
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
