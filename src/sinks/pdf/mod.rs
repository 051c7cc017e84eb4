//! PDF output.
//!
//! Each page image becomes one page whose size is the image's pixel size at the
//! configured DPI. The image covers the page completely; there are no margins
//! and no scaling beyond the page size itself.

mod config;
mod geometry;
mod rendering;

pub use config::*;
pub use geometry::*;
