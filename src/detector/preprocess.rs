//! Image decoding and tensor preparation for the leaf classifier.

use image::imageops::FilterType;
use serde::Serialize;

// ---

/// Side length, in pixels, of the square frame the model expects.
pub const INPUT_SIZE: u32 = 200;

/// Normalized RGB image with a leading batch dimension of one.
///
/// Serializes as `[[[[r, g, b], ...], ...]]`, i.e. shape `[1, h, w, 3]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImageTensor {
    batch: [Vec<Vec<[f32; 3]>>; 1],
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        let rows = &self.batch[0];
        let width = rows.first().map_or(0, Vec::len);
        [1, rows.len(), width, 3]
    }

    /// Rows of pixels for the single image in the batch.
    pub fn rows(&self) -> &[Vec<[f32; 3]>] {
        &self.batch[0]
    }
}

/// Decode `bytes`, resize to `size`×`size` and scale channels to `[0, 1]`.
///
/// Nearest-neighbour sampling matches how the model's training images were
/// loaded.
pub fn image_to_tensor(bytes: &[u8], size: u32) -> Result<ImageTensor, image::ImageError> {
    // ---
    let decoded = image::load_from_memory(bytes)?;
    tracing::debug!(
        "Decoded {}x{} image, resizing to {}x{}",
        decoded.width(),
        decoded.height(),
        size,
        size
    );

    let rgb = decoded.resize_exact(size, size, FilterType::Nearest).to_rgb8();
    let rows: Vec<Vec<[f32; 3]>> = rgb
        .rows()
        .map(|row| {
            row.map(|px| {
                let [r, g, b] = px.0;
                [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
            })
            .collect()
        })
        .collect();

    Ok(ImageTensor { batch: [rows] })
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    // ---
    use std::io::Cursor;

    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_resizes_to_model_frame() {
        // ---
        let png = encode_png(64, 32, [255, 0, 51]);
        let tensor = image_to_tensor(&png, INPUT_SIZE).unwrap();
        assert_eq!(tensor.shape(), [1, 200, 200, 3]);
        assert!(tensor.rows().iter().all(|r| r.len() == 200));
    }

    #[test]
    fn test_channels_scaled_to_unit_range() {
        // ---
        let png = encode_png(8, 8, [255, 0, 51]);
        let tensor = image_to_tensor(&png, 4).unwrap();
        let px = tensor.rows()[2][3];
        assert_eq!(px[0], 1.0);
        assert_eq!(px[1], 0.0);
        assert!((px[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_serializes_with_batch_dimension() {
        // ---
        let png = encode_png(1, 1, [0, 0, 0]);
        let tensor = image_to_tensor(&png, 1).unwrap();
        assert_eq!(serde_json::to_string(&tensor).unwrap(), "[[[[0.0,0.0,0.0]]]]");
    }

    #[test]
    fn test_corrupt_bytes_fail_to_decode() {
        // ---
        assert!(image_to_tensor(b"definitely not a jpeg", INPUT_SIZE).is_err());
        assert!(image_to_tensor(&[], INPUT_SIZE).is_err());
    }
}
