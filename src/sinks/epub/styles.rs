//! Stylesheet shared by every page document.

/// Pages fill the screen and keep the image's aspect ratio.
pub const STYLESHEET: &str = r#"/* Base styles */
html, body {
    margin: 0;
    padding: 0;
    height: 100%;
}

/* Comic pages */
.page {
    height: 100%;
    text-align: center;
}

.page img {
    max-width: 100%;
    max-height: 100%;
    height: auto;
    object-fit: contain;
}
"#;
