use super::ImageProvider;
use crate::file_ordering::sort_pages;
use crate::source::{ImageFormat, ImageSet};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Pages that were already downloaded into a folder, one file per page.
#[derive(Debug)]
pub struct DirectoryImages {
    root: PathBuf,
}

impl DirectoryImages {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirectoryImages {
        DirectoryImages { root: root.into() }
    }

    /// The page files in the folder, in reading order.
    pub fn page_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(anyhow!(
                "Image path {} isn't a directory!",
                self.root.display()
            ));
        }

        let mut files = Vec::new();
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", self.root.display()))?;
            let path = entry.path();
            if path.is_file() && is_page_file(&path) {
                files.push(path);
            }
        }

        sort_pages(&mut files);
        Ok(files)
    }
}

fn is_page_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .is_some()
}

impl ImageProvider for DirectoryImages {
    fn load(&self, progress: &ProgressBar) -> Result<ImageSet> {
        let files = self.page_files()?;
        if files.is_empty() {
            return Err(anyhow!(
                "No page images (jpg, png, gif, webp) found in {}",
                self.root.display()
            ));
        }
        log::info!("loading {} pages from {}", files.len(), self.root.display());

        progress.set_length(files.len() as u64);
        let mut pages = Vec::with_capacity(files.len());
        for path in &files {
            progress.set_message(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
            );
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read page {}", path.display()))?;
            pages.push(bytes);
            progress.inc(1);
        }

        ImageSet::from_encoded(pages).map_err(|e| {
            match e.image_index().and_then(|i| files.get(i)) {
                Some(path) => anyhow::Error::new(e)
                    .context(format!("Page {} isn't a usable image", path.display())),
                None => e.into(),
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::Image;
    use crate::test_support::{encode, gradient_rgb};

    fn write_page(dir: &Path, name: &str, width: u32) {
        let bytes = encode(&gradient_rgb(width, 4), image::ImageFormat::Png);
        std::fs::write(dir.join(name), bytes).expect("can write page");
    }

    #[test]
    fn loads_pages_in_natural_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        write_page(dir.path(), "10.png", 10);
        write_page(dir.path(), "2.png", 2);
        write_page(dir.path(), "1.PNG", 1);
        std::fs::write(dir.path().join("notes.txt"), "not a page").expect("can write");

        let set = DirectoryImages::new(dir.path())
            .load(&ProgressBar::hidden())
            .expect("can load directory");
        let widths: Vec<u32> = set.iter().map(Image::width_px).collect();
        assert_eq!(widths, vec![1, 2, 10]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let result = DirectoryImages::new(dir.path()).load(&ProgressBar::hidden());
        assert!(result.is_err());
    }

    #[test]
    fn broken_page_fails_the_whole_set() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        write_page(dir.path(), "1.png", 3);
        std::fs::write(dir.path().join("2.jpg"), b"not really a jpeg").expect("can write");
        let err = DirectoryImages::new(dir.path())
            .load(&ProgressBar::hidden())
            .unwrap_err();
        assert!(format!("{err:#}").contains("2.jpg"), "{err:#}");
    }
}
