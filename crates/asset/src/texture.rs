//! Texture bitmaps: CPU-side RGBA8 data decoded from fetched bytes.

use crate::DecodeError;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Fill `width`x`height` with a single RGBA value.
    pub fn solid_rgba8(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self::new_rgba8(width, height, data)
    }

    /// Decode fetched bytes (PNG/JPEG) into an RGBA8 bitmap.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let img = image::load_from_memory(bytes)?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!(
            "Decoded texture {}x{} with {} bytes",
            width,
            height,
            data.len()
        );

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn encode_png(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
        let mut encoded = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut encoded);
        encoder
            .write_image(pixels, width, height, image::ExtendedColorType::Rgba8)
            .expect("encode png");
        encoded
    }

    #[test]
    fn decode_preserves_pixels() {
        let pixels: Vec<u8> = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let encoded = encode_png(&pixels, 2, 2);

        let decoded = TextureData::from_bytes(&encoded).expect("decode png");
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.format, TextureFormat::Rgba8);
        assert_eq!(decoded.data, pixels);
        assert!(decoded.is_valid());
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let err = TextureData::from_bytes(b"definitely not an image");
        assert!(err.is_err());
    }

    #[test]
    fn solid_fill_repeats_the_pixel() {
        let solid = TextureData::solid_rgba8(1, 1, [0, 0, 255, 255]);
        assert_eq!(solid.data, vec![0, 0, 255, 255]);
        assert!(solid.is_valid());

        let wide = TextureData::solid_rgba8(3, 2, [9, 8, 7, 255]);
        assert_eq!(wide.data.len(), 24);
        assert_eq!(&wide.data[20..], &[9, 8, 7, 255]);
    }
}
