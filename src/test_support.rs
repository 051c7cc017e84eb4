//! Page fixtures for unit tests.

use crate::source::{Image, ImageSet};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    DynamicImage::ImageRgb8(image)
}

pub fn translucent_rgba(width: u32, height: u32) -> DynamicImage {
    let image = RgbaImage::from_fn(width, height, |x, _| Rgba([200, 40, 40, (x % 256) as u8]));
    DynamicImage::ImageRgba8(image)
}

pub fn encode(image: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, format)
        .expect("can encode test image");
    bytes.into_inner()
}

/// A set of PNG pages with the given pixel sizes, in order.
pub fn png_set(sizes: &[(u32, u32)]) -> ImageSet {
    let images = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            Image::decode(i, encode(&gradient_rgb(w, h), image::ImageFormat::Png))
                .expect("can decode test page")
        })
        .collect();
    ImageSet::new(images).expect("can build test set")
}

/// A set of JPEG pages with the given pixel sizes, in order.
pub fn jpeg_set(sizes: &[(u32, u32)]) -> ImageSet {
    let images = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            Image::decode(i, encode(&gradient_rgb(w, h), image::ImageFormat::Jpeg))
                .expect("can decode test page")
        })
        .collect();
    ImageSet::new(images).expect("can build test set")
}
