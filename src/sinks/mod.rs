use serde::{Deserialize, Serialize};
use std::fmt;

mod output;
pub use output::*;

mod pdf;
pub use pdf::*;

mod epub;
pub use epub::*;

/// One of the document types an issue can be compiled into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Assembler {
    Pdf,
    Epub,
}

impl Assembler {
    pub fn extension(&self) -> &'static str {
        match self {
            Assembler::Pdf => "pdf",
            Assembler::Epub => "epub",
        }
    }
}

impl fmt::Display for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assembler::Pdf => write!(f, "PDF"),
            Assembler::Epub => write!(f, "EPUB"),
        }
    }
}

/// Which documents to produce.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Epub,
    #[default]
    Both,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Epub => write!(f, "epub"),
            OutputFormat::Both => write!(f, "both"),
        }
    }
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Both, OutputFormat::Pdf, OutputFormat::Epub]
    }

    /// The assemblers to run, in the order they run.
    pub fn assemblers(&self) -> &'static [Assembler] {
        match self {
            OutputFormat::Pdf => &[Assembler::Pdf],
            OutputFormat::Epub => &[Assembler::Epub],
            OutputFormat::Both => &[Assembler::Pdf, Assembler::Epub],
        }
    }
}
