//! Transform applied to a captured photo before it is reviewed.

use crate::error::{AppError, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Converts the image at `input` to grayscale and writes it to `output`.
///
/// The output format follows the extension of `output`.
pub fn process_image(input: &Path, output: &Path) -> Result<PathBuf> {
    let start = std::time::Instant::now();

    let image = image::open(input)
        .map_err(|e| AppError::Processing(format!("{}: {}", input.display(), e)))?;
    // JPEG cannot store an alpha channel.
    let processed = image.to_luma8();
    processed
        .save(output)
        .map_err(|e| AppError::Processing(format!("{}: {}", output.display(), e)))?;

    debug!(
        "Processed {} -> {} in {:?}",
        input.display(),
        output.display(),
        start.elapsed()
    );
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_is_single_channel_with_same_dimensions() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("capture.png");
        let output = dir.path().join("processed_image.jpg");
        image::RgbaImage::from_pixel(32, 16, image::Rgba([200, 40, 40, 255]))
            .save(&input)
            .unwrap();

        let result = process_image(&input, &output).unwrap();
        assert_eq!(result, output);

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
        assert_eq!(decoded.color().channel_count(), 1);
    }

    #[test]
    fn missing_input_is_a_processing_error() {
        let dir = tempdir().unwrap();
        let result = process_image(&dir.path().join("nope.png"), &dir.path().join("out.jpg"));
        assert!(matches!(result, Err(AppError::Processing(_))));
    }
}
