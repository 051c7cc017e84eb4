use crate::source::Image;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// The size of the page an image is drawn on, in points.
///
/// Derived purely from the image's pixel size and the DPI, so the page always
/// has exactly the image's aspect ratio and the image fills it edge to edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageGeometry {
    pub fn for_pixels(width_px: u32, height_px: u32, dpi: u32) -> PageGeometry {
        let to_points = |px: u32| {
            (f64::from(px) * f64::from(POINTS_PER_INCH) / f64::from(dpi)) as f32
        };
        PageGeometry {
            width_pt: to_points(width_px),
            height_pt: to_points(height_px),
        }
    }

    pub fn for_image(image: &Image, dpi: u32) -> PageGeometry {
        PageGeometry::for_pixels(image.width_px(), image.height_px(), dpi)
    }

    pub fn width_in(&self) -> f32 {
        self.width_pt / POINTS_PER_INCH
    }

    pub fn height_in(&self) -> f32 {
        self.height_pt / POINTS_PER_INCH
    }
}
