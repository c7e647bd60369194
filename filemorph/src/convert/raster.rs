//! Raster image transcoding.

use image::{DynamicImage, ImageFormat};
use std::path::Path;

use crate::config::OutputFormat;
use crate::error::{FileMorphError, Result};

/// Source extensions treated as images.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Check whether a lower-cased extension is a supported image type.
pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&extension)
}

/// Codec used to encode `format`, if it is an image format.
pub fn codec_for(format: OutputFormat) -> Option<ImageFormat> {
    match format {
        OutputFormat::Jpg | OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
        OutputFormat::Png => Some(ImageFormat::Png),
        OutputFormat::Bmp => Some(ImageFormat::Bmp),
        OutputFormat::Gif => Some(ImageFormat::Gif),
        OutputFormat::Tiff => Some(ImageFormat::Tiff),
        OutputFormat::Pdf | OutputFormat::Txt | OutputFormat::Html => None,
    }
}

/// Drop the alpha channel of images that carry one.
///
/// Palette images are expanded by the decoder, so a palette with
/// transparency shows up here as an RGBA image and is flattened too.
pub fn normalize_color(image: DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    }
}

/// Decode `input` and re-encode it as `target` at `output`.
///
/// # Errors
///
/// Returns an error if `target` is not an image format, or if decoding or
/// encoding fails.
pub fn transcode(input: &Path, output: &Path, target: OutputFormat) -> Result<()> {
    let codec = codec_for(target).ok_or_else(|| {
        FileMorphError::other(format!("{} is not an image format", target.label()))
    })?;

    let decoded = image::open(input).map_err(|source| FileMorphError::Image {
        path: input.to_path_buf(),
        source,
    })?;

    normalize_color(decoded)
        .save_with_format(output, codec)
        .map_err(|source| FileMorphError::Image {
            path: input.to_path_buf(),
            source,
        })
}
