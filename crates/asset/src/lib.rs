//! Asset capability: fetch image bytes over HTTP and decode them into
//! CPU-side bitmaps ready for GPU upload.

pub mod fetch;
pub mod texture;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving bytes from a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for '{url}' failed with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure while decoding fetched bytes into a bitmap.
#[derive(Debug, Error)]
#[error("image decode failed: {0}")]
pub struct DecodeError(#[from] pub image::ImageError);
