//! Page images as PDF image XObjects.
//!
//! JPEG data is checked to decode completely and then passed through untouched
//! with `DCTDecode`. Everything else is
//! decoded to raw samples at its native bit depth and stored with Flate (the
//! document is compressed as a whole before it's written), with any alpha
//! channel split into a soft mask. Pixels are never resampled.

use crate::error::AssemblyError;
use crate::sinks::Assembler;
use crate::source::{has_end_of_image, Image, ImageFormat};
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::fmt::Display;
use std::io::Cursor;

/// Add `image` to the document and return the id of its XObject.
pub fn embed(doc: &mut Document, image: &Image) -> Result<ObjectId, AssemblyError> {
    match image.format() {
        ImageFormat::Jpeg => embed_jpeg(doc, image),
        ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP => embed_raster(doc, image),
    }
}

fn decode_error<E: Display>(image: &Image, error: E) -> AssemblyError {
    AssemblyError::Decode {
        assembler: Some(Assembler::Pdf),
        index: image.sequence_index(),
        reason: error.to_string(),
    }
}

fn image_dictionary(
    width: u32,
    height: u32,
    color_space: &'static str,
    bits_per_component: i64,
) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => bits_per_component,
    }
}

fn embed_jpeg(doc: &mut Document, image: &Image) -> Result<ObjectId, AssemblyError> {
    let decoder =
        JpegDecoder::new(Cursor::new(image.bytes())).map_err(|e| decode_error(image, e))?;
    let color = decoder.original_color_type();
    if !has_end_of_image(image.bytes()) {
        return Err(decode_error(image, "JPEG data is truncated"));
    }
    // the bytes go in untouched, but they must hold a complete picture
    DynamicImage::from_decoder(decoder).map_err(|e| decode_error(image, e))?;

    let color_space = match color {
        ExtendedColorType::L8 | ExtendedColorType::L16 => "DeviceGray",
        ExtendedColorType::Cmyk8 => "DeviceCMYK",
        _ => "DeviceRGB",
    };
    log::debug!(
        "embedding page {} as {color_space} JPEG ({:?})",
        image.sequence_index(),
        color
    );

    let mut dict = image_dictionary(image.width_px(), image.height_px(), color_space, 8);
    dict.set("Filter", "DCTDecode");
    if color == ExtendedColorType::Cmyk8 {
        // CMYK JPEGs are written inverted by Adobe software, which is what
        // readers expect to find in the wild
        let decode: Vec<Object> = [1i64, 0, 1, 0, 1, 0, 1, 0]
            .into_iter()
            .map(Object::Integer)
            .collect();
        dict.set("Decode", decode);
    }

    let stream = Stream::new(dict, image.bytes().to_vec()).with_compression(false);
    Ok(doc.add_object(stream))
}

fn embed_raster(doc: &mut Document, image: &Image) -> Result<ObjectId, AssemblyError> {
    let decoded = image::load_from_memory_with_format(image.bytes(), image.format().codec())
        .map_err(|e| decode_error(image, e))?;
    let samples = RasterSamples::from_image(&decoded);
    let (width, height) = (image.width_px(), image.height_px());

    let mut dict = image_dictionary(
        width,
        height,
        samples.color_space,
        samples.bits_per_component,
    );
    if let Some(alpha) = samples.alpha {
        let mask = Stream::new(
            image_dictionary(width, height, "DeviceGray", samples.bits_per_component),
            alpha,
        );
        let mask_id = doc.add_object(mask);
        dict.set("SMask", mask_id);
    }

    Ok(doc.add_object(Stream::new(dict, samples.data)))
}

/// Decoded pixels laid out the way a PDF image stream wants them.
#[derive(Debug)]
struct RasterSamples {
    color_space: &'static str,
    bits_per_component: i64,
    data: Vec<u8>,
    /// Soft mask samples, only present when some pixel isn't fully opaque.
    alpha: Option<Vec<u8>>,
}

impl RasterSamples {
    fn from_image(image: &DynamicImage) -> RasterSamples {
        let color = image.color();
        let gray = !color.has_color();
        let has_alpha = color.has_alpha();
        let wide = color.bytes_per_pixel() / color.channel_count() > 1;
        let color_space = if gray { "DeviceGray" } else { "DeviceRGB" };

        if wide {
            let (data, alpha) = match (gray, has_alpha) {
                (true, false) => (image.to_luma16().into_raw(), None),
                (false, false) => (image.to_rgb16().into_raw(), None),
                (true, true) => split_alpha(image.to_luma_alpha16().as_raw(), 2, u16::MAX),
                (false, true) => split_alpha(image.to_rgba16().as_raw(), 4, u16::MAX),
            };
            RasterSamples {
                color_space,
                bits_per_component: 16,
                data: big_endian(&data),
                alpha: alpha.map(|a| big_endian(&a)),
            }
        } else {
            let (data, alpha) = match (gray, has_alpha) {
                (true, false) => (image.to_luma8().into_raw(), None),
                (false, false) => (image.to_rgb8().into_raw(), None),
                (true, true) => split_alpha(image.to_luma_alpha8().as_raw(), 2, u8::MAX),
                (false, true) => split_alpha(image.to_rgba8().as_raw(), 4, u8::MAX),
            };
            RasterSamples {
                color_space,
                bits_per_component: 8,
                data,
                alpha,
            }
        }
    }
}

/// Separate interleaved samples into colour and alpha. The alpha plane is
/// dropped when every pixel is opaque.
fn split_alpha<T: Copy + PartialEq>(
    samples: &[T],
    channels: usize,
    opaque: T,
) -> (Vec<T>, Option<Vec<T>>) {
    let pixels = samples.len() / channels;
    let mut color = Vec::with_capacity(pixels * (channels - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in samples.chunks_exact(channels) {
        color.extend_from_slice(&pixel[..channels - 1]);
        alpha.push(pixel[channels - 1]);
    }

    if alpha.iter().all(|&a| a == opaque) {
        (color, None)
    } else {
        (color, Some(alpha))
    }
}

fn big_endian(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}
