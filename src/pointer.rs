//! Pointer expressions used by the coercion lists.
//!
//! A pointer expression is a JSON Pointer (RFC 6901) split into the pointer
//! of the parent container and the key of the addressed field. `/` alone
//! addresses the document root and has no parent.

use crate::errors::ConverterError;

/// A parsed coercion target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath<'a> {
    /// The literal `/`.
    Root,
    Field {
        /// Pointer of the containing object, `""` for the document root.
        parent: &'a str,
        /// Unescaped key of the field within `parent`.
        key: String,
    },
}

impl<'a> FieldPath<'a> {
    /// Split `path` into parent pointer and final segment.
    ///
    /// The path must start with `/` and end with a non-empty segment, or be
    /// exactly `/`.
    pub fn parse(path: &'a str) -> Result<Self, ConverterError> {
        if path == "/" {
            return Ok(FieldPath::Root);
        }
        if !path.starts_with('/') {
            return Err(ConverterError::InvalidPointerExpression(path.to_string()));
        }

        let split = path.rfind('/').unwrap_or(0);
        let segment = &path[split + 1..];
        if segment.is_empty() {
            return Err(ConverterError::InvalidPointerExpression(path.to_string()));
        }

        Ok(FieldPath::Field {
            parent: &path[..split],
            key: unescape(segment),
        })
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
