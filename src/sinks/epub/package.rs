//! The structure of an EPUB before anything is written.
//!
//! Planning is kept apart from packaging so the resource names, spine order
//! and cover choice can be checked without building an archive.

use crate::error::AssemblyError;
use crate::source::ImageSet;

/// One page of the EPUB: an image resource and the XHTML document showing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubEntry {
    pub sequence_index: usize,
    /// Path of the image inside the package, e.g. `images/page0000.jpg`
    pub image_href: String,
    pub media_type: &'static str,
    /// Path of the page document inside the package, e.g. `page0000.xhtml`
    pub page_href: String,
    /// Navigation label, `Page 1` for the first page
    pub title: String,
    pub is_cover: bool,
}

/// The planned contents of an EPUB, one entry per page in reading order.
#[derive(Debug, Clone)]
pub struct EpubDocument {
    entries: Vec<EpubEntry>,
}

impl EpubDocument {
    pub fn plan(images: &ImageSet) -> Result<EpubDocument, AssemblyError> {
        if images.is_empty() {
            return Err(AssemblyError::InvalidInput(
                "cannot build an EPUB without pages".to_string(),
            ));
        }

        let entries = images
            .iter()
            .map(|image| {
                let i = image.sequence_index();
                EpubEntry {
                    sequence_index: i,
                    image_href: format!("images/page{i:04}.{}", image.format().extension()),
                    media_type: image.format().media_type(),
                    page_href: format!("page{i:04}.xhtml"),
                    title: format!("Page {}", i + 1),
                    is_cover: i == 0,
                }
            })
            .collect();
        Ok(EpubDocument { entries })
    }

    pub fn entries(&self) -> &[EpubEntry] {
        &self.entries
    }

    /// Page documents in reading order.
    pub fn spine(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.page_href.as_str())
    }

    pub fn cover(&self) -> &EpubEntry {
        &self.entries[0]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::Image;
    use crate::test_support::{encode, gradient_rgb, jpeg_set, png_set, translucent_rgba};

    #[test]
    fn plans_one_entry_per_page() {
        let plan = EpubDocument::plan(&jpeg_set(&[(30, 40), (30, 40), (40, 30)]))
            .expect("can plan");
        assert_eq!(plan.entries().len(), 3);
        assert_eq!(
            plan.spine().collect::<Vec<_>>(),
            vec!["page0000.xhtml", "page0001.xhtml", "page0002.xhtml"]
        );

        let last = &plan.entries()[2];
        assert_eq!(last.image_href, "images/page0002.jpg");
        assert_eq!(last.media_type, "image/jpeg");
        assert_eq!(last.title, "Page 3");
        assert!(!last.is_cover);
    }

    #[test]
    fn only_the_first_page_is_the_cover() {
        let plan = EpubDocument::plan(&png_set(&[(8, 8), (8, 8)])).expect("can plan");
        assert_eq!(plan.cover().sequence_index, 0);
        assert_eq!(plan.cover().image_href, "images/page0000.png");
        assert_eq!(plan.entries().iter().filter(|e| e.is_cover).count(), 1);
    }

    #[test]
    fn single_page_is_cover_and_whole_spine() {
        let plan = EpubDocument::plan(&png_set(&[(8, 8)])).expect("can plan");
        assert_eq!(plan.spine().collect::<Vec<_>>(), vec!["page0000.xhtml"]);
        assert!(plan.cover().is_cover);
    }

    #[test]
    fn mixed_formats_keep_their_media_types() {
        let set = ImageSet::new(vec![
            Image::decode(0, encode(&gradient_rgb(4, 4), image::ImageFormat::Png))
                .expect("can decode"),
            Image::decode(1, encode(&translucent_rgba(4, 4), image::ImageFormat::Gif))
                .expect("can decode"),
        ])
        .expect("valid set");
        let plan = EpubDocument::plan(&set).expect("can plan");
        assert_eq!(plan.entries()[0].media_type, "image/png");
        assert_eq!(plan.entries()[1].image_href, "images/page0001.gif");
        assert_eq!(plan.entries()[1].media_type, "image/gif");
    }
}
