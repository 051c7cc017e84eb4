//! Errors raised while validating page images and assembling documents.
//!
//! Everything outside of document assembly (configuration, HTTP, scraping) uses
//! `anyhow`; these typed errors exist so that callers can tell which output
//! failed and on which page.

use crate::sinks::Assembler;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// The input was rejected before anything was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An image's bytes couldn't be read as a supported raster format.
    #[error("{}failed to decode image {index}: {reason}", prefix(.assembler))]
    Decode {
        assembler: Option<Assembler>,
        index: usize,
        reason: String,
    },

    /// Building or writing the document failed.
    #[error("{assembler} failed{}: {reason}", at_image(.index))]
    Failed {
        assembler: Assembler,
        index: Option<usize>,
        reason: String,
    },
}

fn prefix(assembler: &Option<Assembler>) -> String {
    assembler.map(|a| format!("{a} ")).unwrap_or_default()
}

fn at_image(index: &Option<usize>) -> String {
    index.map(|i| format!(" at image {i}")).unwrap_or_default()
}

impl AssemblyError {
    pub fn failed<E: fmt::Display>(assembler: Assembler, index: Option<usize>, error: E) -> Self {
        AssemblyError::Failed {
            assembler,
            index,
            reason: format!("{error:#}"),
        }
    }

    /// The page the error is attributed to, if any.
    pub fn image_index(&self) -> Option<usize> {
        match self {
            AssemblyError::InvalidInput(_) => None,
            AssemblyError::Decode { index, .. } => Some(*index),
            AssemblyError::Failed { index, .. } => *index,
        }
    }
}
