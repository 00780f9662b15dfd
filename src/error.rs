//! Error types
//!
//! Atlas loading is the only fallible operation in the library.
//! Injection and filtering are total and never return errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading an atlas or building the emoji table
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Atlas description could not be read
    #[error("Failed to read atlas file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atlas description is not in the packed atlas text format
    #[error("Invalid atlas syntax at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Page has no `size` field and its image could not be inspected
    #[error("Failed to read page image {path}: {source}")]
    PageImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Region name is not a hexadecimal code point
    #[error("Invalid emoji (Not valid Hex code): {name}")]
    MalformedAtlasEntry { name: String },

    /// More regions than the injected code range can hold
    #[error("Too many emoji in atlas: {count} (maximum {max})")]
    TooManyEmoji { count: usize, max: usize },
}

impl AtlasError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
