//! EPUB output configuration.

use serde::{Deserialize, Serialize};

use super::super::pdf::default_author;

/// EPUB output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct EPUB {
    /// Author written into the package metadata
    #[serde(default = "default_author")]
    pub author: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    /// Required for valid EPUB.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for EPUB {
    fn default() -> Self {
        Self {
            author: default_author(),
            language: default_language(),
        }
    }
}

/// Statistics from rendering an EPUB, used for user feedback.
pub struct RenderStats {
    /// Number of page documents in the EPUB
    pub document_count: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_epub() {
        let epub = EPUB::default();
        toml::to_string(&epub).expect("can serialize EPUB to TOML");
    }

    #[test]
    fn can_roundtrip_epub() {
        let epub = EPUB {
            author: "Someone".to_string(),
            language: "fr".to_string(),
        };
        let toml_str = toml::to_string(&epub).expect("can serialize");
        let deserialized: EPUB = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(deserialized.author, "Someone");
        assert_eq!(deserialized.language, "fr");
    }

    #[test]
    fn empty_table_uses_defaults() {
        let epub: EPUB = toml::from_str("").expect("can deserialize");
        assert_eq!(epub.author, "Comic Compiler");
        assert_eq!(epub.language, "en");
    }
}
