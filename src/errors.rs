//! Defines the custom error types for the converter.
//!
//! The converters themselves can only fail on a malformed coercion path;
//! every other variant belongs to the formats layer and the CLI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("'{0}' is not a valid JSON Pointer expression")]
    InvalidPointerExpression(String),

    #[error("I/O Error: {1} - {0}")]
    Io(#[source] std::io::Error, String),

    #[error("JSON Error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Serialization Error: {0}")]
    SerializationError(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
}

// Implement From<io::Error> for easier error handling
impl From<std::io::Error> for ConverterError {
    fn from(err: std::io::Error) -> Self {
        ConverterError::Io(err, "IO operation failed".to_string())
    }
}
