//! EPUB rendering orchestration.
//!
//! Turns the [`EpubDocument`] plan into an EPUB 3 package with `epub-builder`,
//! which takes care of the OCF container, the OPF manifest and spine, and the
//! nav and NCX navigation documents. The archive is generated in one go and
//! published through [`write_atomically`].

mod page;

use super::config::{RenderStats, EPUB};
use super::package::EpubDocument;
use super::styles;
use crate::error::AssemblyError;
use crate::sinks::{write_atomically, Assembler};
use crate::source::ImageSet;
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use indicatif::ProgressBar;
use std::fmt::Display;
use std::path::Path;

fn failed<E: Display>(index: Option<usize>, error: E) -> AssemblyError {
    AssemblyError::failed(Assembler::Epub, index, error)
}

impl EPUB {
    /// Render the issue to an EPUB at `outfile`.
    ///
    /// Returns statistics about the generated EPUB.
    pub fn render(
        &self,
        images: &ImageSet,
        title: &str,
        outfile: &Path,
        progress: &ProgressBar,
    ) -> Result<RenderStats, AssemblyError> {
        let package = EpubDocument::plan(images)?;
        progress.set_length(images.len() as u64);
        progress.set_message("Generating EPUB...");

        let zip = ZipLibrary::new().map_err(|e| failed(None, e))?;
        let mut builder = EpubBuilder::new(zip).map_err(|e| failed(None, e))?;
        builder.epub_version(EpubVersion::V30);

        builder
            .metadata("title", title)
            .map_err(|e| failed(None, e))?;
        builder
            .metadata("author", self.author.as_str())
            .map_err(|e| failed(None, e))?;
        builder
            .metadata("lang", self.language.as_str())
            .map_err(|e| failed(None, e))?;
        builder
            .metadata("generator", "comic-compiler")
            .map_err(|e| failed(None, e))?;
        builder
            .stylesheet(styles::STYLESHEET.as_bytes())
            .map_err(|e| failed(None, e))?;

        let cover = package.cover();
        builder
            .add_cover_image(
                cover.image_href.as_str(),
                images.cover().bytes(),
                cover.media_type,
            )
            .map_err(|e| failed(Some(cover.sequence_index), e))?;

        for (entry, image) in package.entries().iter().zip(images) {
            let index = Some(entry.sequence_index);
            progress.set_message(format!("Page {}/{}", entry.sequence_index + 1, images.len()));

            if !entry.is_cover {
                builder
                    .add_resource(entry.image_href.as_str(), image.bytes(), entry.media_type)
                    .map_err(|e| failed(index, e))?;
            }

            let html = page::render(self, entry, title);
            let mut content = EpubContent::new(entry.page_href.as_str(), html.as_bytes())
                .title(entry.title.as_str());
            if entry.is_cover {
                content = content.reftype(ReferenceType::Cover);
            } else if entry.sequence_index == 1 {
                // where reading starts once the cover has been shown
                content = content.reftype(ReferenceType::Text);
            }
            builder.add_content(content).map_err(|e| failed(index, e))?;
            progress.inc(1);
        }
        log::debug!(
            "EPUB spine: {}",
            package.spine().collect::<Vec<&str>>().join(", ")
        );

        progress.set_message("Writing EPUB...");
        write_atomically(outfile, Assembler::Epub, |writer| {
            builder.generate(&mut *writer).map_err(|e| failed(None, e))
        })?;
        progress.finish_with_message("EPUB generated");

        Ok(RenderStats {
            document_count: package.entries().len(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{jpeg_set, png_set};
    use regex::Regex;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Read;
    use std::path::PathBuf;

    /// The parts of an OPF package document the tests look at.
    struct Package {
        /// directory of the package document inside the archive
        root: String,
        opf: String,
        /// manifest item id -> attributes
        items: HashMap<String, HashMap<String, String>>,
        /// hrefs of every spine item, in spine order
        spine: Vec<String>,
    }

    impl Package {
        fn item_with_href(&self, href: &str) -> Option<(&String, &HashMap<String, String>)> {
            self.items
                .iter()
                .find(|(_, attrs)| attrs.get("href").map(String::as_str) == Some(href))
        }
    }

    fn attributes(tag: &str) -> HashMap<String, String> {
        let attr = Regex::new(r#"([\w:-]+)="([^"]*)""#).expect("valid regex");
        attr.captures_iter(tag)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect()
    }

    fn render(set: &ImageSet) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("issue.epub");
        let stats = EPUB::default()
            .render(set, "Test Comic #01", &path, &ProgressBar::hidden())
            .expect("can render epub");
        assert_eq!(stats.document_count, set.len());
        (dir, path)
    }

    fn read_entry(archive: &mut zip::ZipArchive<File>, name: &str) -> String {
        let mut text = String::new();
        archive
            .by_name(name)
            .expect("entry exists")
            .read_to_string(&mut text)
            .expect("entry is text");
        text
    }

    fn open(path: &Path) -> (zip::ZipArchive<File>, Package) {
        let file = File::open(path).expect("can open epub");
        let mut archive = zip::ZipArchive::new(file).expect("epub is a zip");

        let container = read_entry(&mut archive, "META-INF/container.xml");
        let rootfile = Regex::new(r#"full-path="([^"]+)""#)
            .expect("valid regex")
            .captures(&container)
            .expect("container names the package document")[1]
            .to_string();
        let opf = read_entry(&mut archive, &rootfile);
        let root = Path::new(&rootfile)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let tag = |name: &str| Regex::new(&format!(r"<{name}\b[^>]*>")).expect("valid regex");
        let items: HashMap<String, HashMap<String, String>> = tag("item")
            .find_iter(&opf)
            .map(|m| attributes(m.as_str()))
            .filter_map(|attrs| attrs.get("id").cloned().map(|id| (id, attrs)))
            .collect();
        let spine = tag("itemref")
            .find_iter(&opf)
            .filter_map(|m| attributes(m.as_str()).get("idref").cloned())
            .map(|idref| {
                items
                    .get(&idref)
                    .and_then(|a| a.get("href"))
                    .cloned()
                    .unwrap_or_else(|| format!("<unknown item {idref}>"))
            })
            .collect();

        (
            archive,
            Package {
                root,
                opf,
                items,
                spine,
            },
        )
    }

    #[test]
    fn spine_follows_page_order() {
        let set = jpeg_set(&[(40, 60), (40, 60), (60, 40), (40, 60)]);
        let (_dir, path) = render(&set);
        let (_, package) = open(&path);
        assert_eq!(
            package.spine,
            vec![
                "page0000.xhtml",
                "page0001.xhtml",
                "page0002.xhtml",
                "page0003.xhtml"
            ]
        );
    }

    #[test]
    fn first_page_is_the_cover() {
        let set = png_set(&[(20, 30), (20, 30)]);
        let (_dir, path) = render(&set);
        let (mut archive, package) = open(&path);

        let (cover_id, cover) = package
            .item_with_href("images/page0000.png")
            .expect("cover image is in the manifest");
        let flagged = cover
            .get("properties")
            .is_some_and(|p| p.contains("cover-image"))
            || package.opf.contains(&format!(r#"content="{cover_id}""#));
        assert!(flagged, "first image is not marked as the cover");

        let (_, second) = package
            .item_with_href("images/page0001.png")
            .expect("second image is in the manifest");
        assert!(!second
            .get("properties")
            .is_some_and(|p| p.contains("cover-image")));

        assert_eq!(
            package.spine,
            vec!["page0000.xhtml", "page0001.xhtml"],
            "the cover page opens the book and nothing else is in the spine"
        );

        let html = read_entry(&mut archive, &format!("{}/page0000.xhtml", package.root));
        assert!(html.contains(r#"epub:type="cover""#));
        assert!(html.contains("images/page0000.png"));
    }

    #[test]
    fn package_has_navigation_and_metadata() {
        let set = png_set(&[(10, 10)]);
        let (_dir, path) = render(&set);
        let (mut archive, package) = open(&path);

        assert!(package.items.values().any(|attrs| attrs
            .get("properties")
            .is_some_and(|p| p.split_whitespace().any(|p| p == "nav"))));
        assert!(package.opf.contains("Test Comic #01"));
        assert!(package.opf.contains("Comic Compiler"));
        assert!(package.opf.contains(">en<"));
        assert_eq!(package.spine, vec!["page0000.xhtml"]);

        assert_eq!(
            read_entry(&mut archive, "mimetype").trim(),
            "application/epub+zip"
        );
    }

    #[test]
    fn rendering_twice_gives_the_same_spine() {
        let set = jpeg_set(&[(30, 30), (30, 60), (60, 30)]);
        let (_a, first) = render(&set);
        let (_b, second) = render(&set);
        assert_eq!(open(&first).1.spine, open(&second).1.spine);
    }

    #[test]
    fn existing_output_is_replaced() {
        let set = png_set(&[(10, 10)]);
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("issue.epub");
        std::fs::write(&path, b"stale").expect("can write");
        EPUB::default()
            .render(&set, "x", &path, &ProgressBar::hidden())
            .expect("can render epub");
        let (_, package) = open(&path);
        assert_eq!(package.spine.len(), 1);
    }
}
