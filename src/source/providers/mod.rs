mod directory;
pub use directory::*;

mod web;
pub use web::*;

use super::ImageSet;
use anyhow::Result;
use indicatif::ProgressBar;

pub trait ImageProvider {
    fn load(&self, progress: &ProgressBar) -> Result<ImageSet>;
}
