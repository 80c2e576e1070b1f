//! Image preprocessing for the leaf classifier.

use image::imageops::FilterType;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;

use super::backend::ClassifyError;

/// Fixed input edge length expected by the frozen model.
pub const INPUT_SIZE: u32 = 256;

/// Decode raw upload bytes into the model's input tensor.
///
/// Any decodable image is coerced to RGB, resized to 256x256 with bilinear
/// resampling, and scaled into [0,1]. The result is NHWC `[1, 256, 256, 3]`.
/// Undecodable bytes propagate as [`ClassifyError::Decode`].
pub fn tensor_from_bytes(bytes: &[u8]) -> Result<NdTensor<f32, 4>, ClassifyError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let mut tensor = NdTensor::zeros([1, side, side, 3]);
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] = f32::from(pixel.0[channel]) / 255.0;
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 40])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_tensor_shape_and_range() {
        let png = encode_png(64, 48);
        let tensor = tensor_from_bytes(&png).unwrap();

        assert_eq!(tensor.shape(), [1, 256, 256, 3]);
        for value in tensor.iter() {
            assert!((0.0..=1.0).contains(value), "value out of range: {value}");
        }
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let png = encode_png(1024, 768);
        let tensor = tensor_from_bytes(&png).unwrap();
        assert_eq!(tensor.shape(), [1, 256, 256, 3]);
    }

    #[test]
    fn test_undecodable_bytes_error() {
        let result = tensor_from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }
}
