//! PDF rendering.
//!
//! Every page of the issue becomes one PDF page sized to the page image at the
//! configured DPI, with the image drawn over the whole page. Pages keep the
//! order of the [`ImageSet`].
//!
//! The document is built in memory and then published through
//! [`write_atomically`], so a failure on any page means no file is written.

mod images;

use super::config::{RenderStats, PDF};
use super::geometry::PageGeometry;
use crate::error::AssemblyError;
use crate::sinks::{write_atomically, Assembler};
use crate::source::ImageSet;
use indicatif::ProgressBar;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat, Stream};
use std::path::Path;

/// Name the page image is registered under in each page's resources.
const IMAGE_NAME: &str = "Page";

impl PDF {
    /// Render the issue to a PDF at `outfile`.
    pub fn render(
        &self,
        images: &ImageSet,
        title: &str,
        outfile: &Path,
        progress: &ProgressBar,
    ) -> Result<RenderStats, AssemblyError> {
        if self.dpi == 0 {
            return Err(AssemblyError::InvalidInput(
                "DPI must be a positive number".to_string(),
            ));
        }

        progress.set_length(images.len() as u64);
        progress.set_message("Rendering PDF...");
        let mut doc = self.build(images, title, progress)?;

        progress.set_message("Writing PDF...");
        write_atomically(outfile, Assembler::Pdf, |writer| {
            doc.save_to(writer)
                .map(|_| ())
                .map_err(|e| AssemblyError::failed(Assembler::Pdf, None, e))
        })?;
        progress.finish_with_message("PDF generated");

        Ok(RenderStats {
            page_count: images.len(),
        })
    }

    fn build(
        &self,
        images: &ImageSet,
        title: &str,
        progress: &ProgressBar,
    ) -> Result<Document, AssemblyError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(images.len());
        for image in images {
            let index = image.sequence_index();
            progress.set_message(format!("Page {}/{}", index + 1, images.len()));

            let geometry = PageGeometry::for_image(image, self.dpi);
            log::debug!(
                "page {}: {}x{} px -> {:.2}x{:.2} in",
                index + 1,
                image.width_px(),
                image.height_px(),
                geometry.width_in(),
                geometry.height_in()
            );
            let image_id = images::embed(&mut doc, image)?;

            // scale the unit square the image occupies up to the full page
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            geometry.width_pt.into(),
                            Object::Integer(0),
                            Object::Integer(0),
                            geometry.height_pt.into(),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content = content
                .encode()
                .map_err(|e| AssemblyError::failed(Assembler::Pdf, Some(index), e))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    geometry.width_pt.into(),
                    geometry.height_pt.into(),
                ],
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        IMAGE_NAME => image_id,
                    },
                },
                "Contents" => content_id,
            });
            kids.push(page_id.into());
            progress.inc(1);
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(self.info(title));
        doc.trailer.set("Info", info_id);

        doc.compress();
        Ok(doc)
    }

    fn info(&self, title: &str) -> Dictionary {
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        dictionary! {
            "Title" => text_string(title),
            "Author" => text_string(&self.author),
            "Creator" => text_string(concat!("comic-compiler v", env!("CARGO_PKG_VERSION"))),
            "Producer" => text_string("lopdf"),
            "CreationDate" => Object::string_literal(created),
        }
    }
}

/// A PDF text string: plain bytes when ASCII, UTF-16BE with a byte order mark
/// otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}
