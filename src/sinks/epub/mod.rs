//! EPUB generation for comic issues.
//!
//! Every page image becomes its own XHTML document in the EPUB, in reading
//! order, with the first page doubling as the cover. Packaging (OCF container,
//! OPF manifest and spine, nav and NCX) is handled by `epub-builder`.

mod config;
mod package;
mod rendering;
mod styles;

pub use config::EPUB;
