use crate::error::AssemblyError;
use std::fmt;

/// Encodings a page image can arrive in.
///
/// All of these can be packaged into an EPUB as-is, and all of them can be
/// drawn into a PDF without any loss beyond what the source already has.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
        }
    }

    /// Match a file extension (without the dot), ignoring case.
    pub fn from_extension(ext: &str) -> Option<ImageFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    pub(crate) fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }

    fn from_codec(format: image::ImageFormat) -> Option<ImageFormat> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::WebP => Some(ImageFormat::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::WebP => write!(f, "WebP"),
        }
    }
}

/// A single comic page.
///
/// The encoded bytes are kept untouched, but they are fully decoded once up
/// front so a truncated or corrupt download never becomes a page. An `Image`
/// can't be built with a zero width or height.
#[derive(Clone)]
pub struct Image {
    bytes: Vec<u8>,
    width_px: u32,
    height_px: u32,
    sequence_index: usize,
    format: ImageFormat,
}

impl Image {
    pub fn decode(sequence_index: usize, bytes: Vec<u8>) -> Result<Image, AssemblyError> {
        let decode_error = |reason: String| AssemblyError::Decode {
            assembler: None,
            index: sequence_index,
            reason,
        };

        let codec = image::guess_format(&bytes).map_err(|e| decode_error(e.to_string()))?;
        let format = ImageFormat::from_codec(codec)
            .ok_or_else(|| decode_error(format!("unsupported image format {codec:?}")))?;

        let (width_px, height_px) = decode_pixels(&bytes, codec).map_err(decode_error)?;
        if width_px == 0 || height_px == 0 {
            return Err(decode_error(format!(
                "image has no area ({width_px}x{height_px})"
            )));
        }

        Ok(Image {
            bytes,
            width_px,
            height_px,
            sequence_index,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Same page, different position. Used when a set is re-indexed after some
    /// pages were dropped.
    pub(crate) fn with_sequence_index(mut self, sequence_index: usize) -> Image {
        self.sequence_index = sequence_index;
        self
    }

    /// Build a page from its header alone, skipping the full decode. Lets tests
    /// hand damaged pages straight to the assemblers.
    #[cfg(test)]
    pub(crate) fn from_header(sequence_index: usize, bytes: Vec<u8>) -> Image {
        let codec = image::guess_format(&bytes).expect("recognisable header");
        let (width_px, height_px) =
            image::ImageReader::with_format(std::io::Cursor::new(&bytes), codec)
                .into_dimensions()
                .expect("readable header");
        Image {
            bytes,
            width_px,
            height_px,
            sequence_index,
            format: ImageFormat::from_codec(codec).expect("supported format"),
        }
    }
}

/// Decode `bytes` completely and return the pixel size.
fn decode_pixels(bytes: &[u8], codec: image::ImageFormat) -> Result<(u32, u32), String> {
    if codec == image::ImageFormat::Jpeg && !has_end_of_image(bytes) {
        return Err("JPEG data is truncated (no end of image marker)".to_string());
    }
    let decoded =
        image::load_from_memory_with_format(bytes, codec).map_err(|e| e.to_string())?;
    Ok((decoded.width(), decoded.height()))
}

/// Whether JPEG data ends with the EOI marker, ignoring zero padding after it.
/// The JPEG decoder fills in missing scan data rather than failing, so this is
/// the only reliable sign of a cut-off download.
pub(crate) fn has_end_of_image(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&[0xFF, 0xD9])
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("sequence_index", &self.sequence_index)
            .field("format", &self.format)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{encode, gradient_rgb};

    #[test]
    fn reads_dimensions_from_png() {
        let bytes = encode(&gradient_rgb(30, 40), image::ImageFormat::Png);
        let image = Image::decode(4, bytes).expect("can decode png");
        assert_eq!(image.format(), ImageFormat::Png);
        assert_eq!((image.width_px(), image.height_px()), (30, 40));
        assert_eq!(image.sequence_index(), 4);
    }

    #[test]
    fn keeps_jpeg_bytes_untouched() {
        let bytes = encode(&gradient_rgb(16, 8), image::ImageFormat::Jpeg);
        let image = Image::decode(0, bytes.clone()).expect("can decode jpeg");
        assert_eq!(image.format(), ImageFormat::Jpeg);
        assert_eq!(image.bytes(), bytes.as_slice());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Image::decode(7, b"definitely not an image".to_vec()).unwrap_err();
        match err {
            AssemblyError::Decode {
                assembler, index, ..
            } => {
                assert_eq!(assembler, None);
                assert_eq!(index, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let bytes = encode(&gradient_rgb(10, 10), image::ImageFormat::Png);
        let err = Image::decode(1, bytes[..12].to_vec()).unwrap_err();
        assert!(matches!(err, AssemblyError::Decode { index: 1, .. }));
    }

    #[test]
    fn truncated_jpeg_is_a_decode_error() {
        let mut bytes = encode(&gradient_rgb(64, 64), image::ImageFormat::Jpeg);
        bytes.truncate(bytes.len() / 3);
        let err = Image::decode(2, bytes).unwrap_err();
        match err {
            AssemblyError::Decode { index, reason, .. } => {
                assert_eq!(index, 2);
                assert!(reason.contains("truncated"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn padded_jpeg_still_ends_cleanly() {
        let mut bytes = encode(&gradient_rgb(8, 8), image::ImageFormat::Jpeg);
        assert!(has_end_of_image(&bytes));
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(has_end_of_image(&bytes));
        Image::decode(0, bytes).expect("padding after the end marker is fine");
        assert!(!has_end_of_image(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }
}
