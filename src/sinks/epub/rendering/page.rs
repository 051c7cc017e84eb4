//! Page documents for EPUB.
//!
//! Each page is a minimal XHTML document holding a single image. The cover
//! page is tagged with `epub:type="cover"` so reading systems can find it.

use crate::sinks::epub::config::EPUB;
use crate::sinks::epub::package::EpubEntry;

/// Render the page document for `entry` as XHTML.
pub fn render(config: &EPUB, entry: &EpubEntry, title: &str) -> String {
    let epub_type = if entry.is_cover {
        r#" epub:type="cover""#
    } else {
        ""
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>{title} - {page}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body{epub_type}>
<div class="page">
<img src="{src}" alt="{page}"/>
</div>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(&config.language),
        title = html_escape::encode_text(title),
        page = html_escape::encode_text(&entry.title),
        src = entry.image_href,
    )
}
