//! Image conversions: lossless-pixel re-encodes between container formats.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use frag_types::MediaType;

use crate::error::{ConvertError, ConvertResult};

/// The raster codec format for an image media type; `None` for text types.
fn raster_format(media: MediaType) -> Option<ImageFormat> {
    match media {
        MediaType::ImagePng => Some(ImageFormat::Png),
        MediaType::ImageJpeg => Some(ImageFormat::Jpeg),
        MediaType::ImageGif => Some(ImageFormat::Gif),
        MediaType::ImageWebp => Some(ImageFormat::WebP),
        MediaType::TextPlain
        | MediaType::TextMarkdown
        | MediaType::TextHtml
        | MediaType::ApplicationJson => None,
    }
}

/// Decode the payload strictly as the declared format and re-encode it into
/// the target container. Pixels are carried over unchanged; there is no
/// resizing, cropping, or quality negotiation.
pub fn reencode(data: &[u8], from: MediaType, to: MediaType) -> ConvertResult<Vec<u8>> {
    let (Some(source), Some(target)) = (raster_format(from), raster_format(to)) else {
        return Err(ConvertError::UnsupportedConversion { from, to });
    };

    let decoded = image::load_from_memory_with_format(data, source)?;
    // JPEG has no alpha channel.
    let decoded = if target == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    } else {
        decoded
    };

    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, target)?;
    Ok(out.into_inner())
}
