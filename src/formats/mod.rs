//! Format detection and text handlers.
//!
//! The converters work on in-memory trees. This module turns files into
//! those trees and back, and guesses which side of the conversion a file
//! belongs to.

pub mod json;
pub mod xml;

use crate::errors::ConverterError;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Result<Self, ConverterError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConverterError::InvalidInput(format!(
                    "Could not determine file extension for: {}",
                    path.display()
                ))
            })?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            // SOAP messages and WSDL-described payloads are plain XML
            "xml" | "soap" => Ok(Format::Xml),
            ext => Err(ConverterError::UnsupportedFormat(format!(
                "Unsupported file format: .{}. Supported formats: .json, .xml, .soap",
                ext
            ))),
        }
    }

    /// Detect format from the first non-whitespace byte
    pub fn from_content(content: &[u8]) -> Result<Self, ConverterError> {
        let first = content.iter().find(|b| !b.is_ascii_whitespace());

        match first {
            None => Err(ConverterError::InvalidInput("Empty file content".to_string())),
            Some(b'<') => Ok(Format::Xml),
            // any other first byte can only be a JSON value
            Some(_) => Ok(Format::Json),
        }
    }

    /// Extension used for output files of this format
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
        }
    }
}
