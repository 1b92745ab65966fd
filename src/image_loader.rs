use crate::error::Result;
use slint::{Image, Rgb8Pixel, Rgba8Pixel, SharedPixelBuffer};
use std::path::Path;

fn decode(path: &Path) -> Result<image::DynamicImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

/// Decodes an image file into RGB8 pixel data.
/// ブロッキング処理なのでrayonスレッドから呼ぶこと。
pub fn load_image_blocking(path: &Path) -> Result<(Vec<u8>, u32, u32)> {
    let rgb = decode(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width, height))
}

/// Decodes an image file and scales it down to fit within `max_edge` pixels.
pub fn load_thumbnail_blocking(path: &Path, max_edge: u32) -> Result<(Vec<u8>, u32, u32)> {
    let rgb = decode(path)?.thumbnail(max_edge, max_edge).to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width, height))
}

/// Wraps RGB8 pixel data in a Slint image. Must run on the UI thread.
pub fn create_slint_image(data: Vec<u8>, width: u32, height: u32) -> Image {
    let buffer = SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(&data, width, height);
    Image::from_rgb8(buffer)
}

/// Wraps a camera frame in a Slint image. Must run on the UI thread.
pub fn create_slint_image_rgba(frame: &image::RgbaImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        frame.as_raw(),
        frame.width(),
        frame.height(),
    );
    Image::from_rgba8(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn thumbnail_fits_within_max_edge() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::from_pixel(640, 320, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let (data, width, height) = load_thumbnail_blocking(&path, 160).unwrap();
        assert_eq!((width, height), (160, 80));
        assert_eq!(data.len(), (width * height * 3) as usize);
    }

    #[test]
    fn undecodable_file_is_an_image_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            load_image_blocking(&path),
            Err(crate::error::AppError::ImageLoad(_))
        ));
    }
}
