//! The texture loader: placeholder first, then fetch/decode, then upload.

use asset::fetch::fetch_bytes;
use asset::texture::TextureData;
use asset::{DecodeError, FetchError};
use reqwest::Client;
use thiserror::Error;

use crate::GpuContext;
use crate::texture::Texture2d;

/// Failure while loading a texture from a URL.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Load a texture from `url`, distinguishing fetch and decode failures.
///
/// The handle starts as a 1x1 opaque-blue placeholder and is respecified
/// with the decoded image once the bytes arrive. The fetch is the only
/// suspension point; other work may interleave there.
pub async fn try_load_texture(
    gpu: &GpuContext,
    http: &Client,
    url: &str,
) -> Result<Texture2d, LoadError> {
    let mut texture = Texture2d::placeholder(gpu);

    let bytes = fetch_bytes(http, url).await?;
    let bitmap = TextureData::from_bytes(&bytes)?;

    texture.upload(gpu, &bitmap, url);
    Ok(texture)
}

/// Load a texture from `url`, collapsing all failures to `None`.
///
/// Emits exactly one diagnostic per failed load. Callers must check for
/// `None` before use.
pub async fn load_texture(gpu: &GpuContext, http: &Client, url: &str) -> Option<Texture2d> {
    match try_load_texture(gpu, http, url).await {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::error!("Error loading texture from '{}': {}", url, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_gpu() -> Option<GpuContext> {
        match pollster::block_on(GpuContext::new(wgpu::Backends::all())) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                eprintln!("skipping GPU test: {err}");
                None
            }
        }
    }

    fn png_2x2() -> (Vec<u8>, Vec<u8>) {
        let pixels: Vec<u8> = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 0, 255,
        ];
        let mut encoded = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut encoded);
        image::ImageEncoder::write_image(encoder, &pixels, 2, 2, image::ExtendedColorType::Rgba8)
            .expect("encode png");
        (encoded, pixels)
    }

    /// Serve up to `hits` canned responses, counting the requests actually
    /// answered.
    fn serve(
        status_line: &'static str,
        body: Vec<u8>,
        hits: usize,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let counter = Arc::new(AtomicUsize::new(0));
        let served = counter.clone();
        std::thread::spawn(move || {
            for _ in 0..hits {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&body);
                served.fetch_add(1, Ordering::SeqCst);
            }
        });
        (format!("http://{}/texture.png", addr), counter)
    }

    #[tokio::test]
    async fn loads_png_from_url() {
        let Some(gpu) = test_gpu() else { return };
        let (encoded, pixels) = png_2x2();
        let (url, _) = serve("200 OK", encoded, 1);

        let http = Client::new();
        let texture = load_texture(&gpu, &http, &url).await.expect("texture");
        assert_eq!((texture.width(), texture.height()), (2, 2));
        assert_eq!(texture.read_back(&gpu).expect("read back"), pixels);
    }

    #[tokio::test]
    async fn repeated_loads_fetch_independently() {
        let Some(gpu) = test_gpu() else { return };
        let (encoded, _) = png_2x2();
        let (url, served) = serve("200 OK", encoded, 2);

        let http = Client::new();
        let first = load_texture(&gpu, &http, &url).await;
        let second = load_texture(&gpu, &http, &url).await;
        assert!(first.is_some());
        assert!(second.is_some());
        // No caching: each load hits the server.
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_resource_collapses_to_none() {
        let Some(gpu) = test_gpu() else { return };
        let (url, _) = serve("404 Not Found", Vec::new(), 1);

        let http = Client::new();
        assert!(load_texture(&gpu, &http, &url).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_decode_error() {
        let Some(gpu) = test_gpu() else { return };
        let (url, _) = serve("200 OK", b"not an image at all".to_vec(), 1);

        let http = Client::new();
        let err = try_load_texture(&gpu, &http, &url)
            .await
            .expect_err("expected failure");
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let Some(gpu) = test_gpu() else { return };
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
            listener.local_addr().expect("local addr").port()
        };
        let url = format!("http://127.0.0.1:{}/texture.png", port);

        let http = Client::new();
        let err = try_load_texture(&gpu, &http, &url)
            .await
            .expect_err("expected failure");
        assert!(matches!(err, LoadError::Fetch(_)));
    }
}
