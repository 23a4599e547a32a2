//! Main library for the XML/JSON converter.
//!
//! This crate contains a configurable, bidirectional structural converter
//! between XML document trees and JSON value trees:
//! - [`XmlToJsonConverter`] folds attributes, text and repeated elements into
//!   JSON objects, arrays and scalars, optionally unwraps SOAP envelopes and
//!   coerces selected fields to arrays, booleans or numbers.
//! - [`JsonToXmlConverter`] expands JSON back into elements and attributes,
//!   optionally wrapped in a SOAP envelope.
//!
//! Both are driven by an immutable policy ([`X2jPolicy`], [`J2xPolicy`]).

pub mod coercion;
pub mod converter_json_to_xml;
pub mod converter_xml_to_json;
pub mod errors;
pub mod formats;
pub mod pointer;
pub mod policy;
pub mod soap;
pub mod stats;
pub mod xml_tree;

pub use converter_json_to_xml::JsonToXmlConverter;
pub use converter_xml_to_json::XmlToJsonConverter;
pub use policy::{CoercionMode, J2xPolicy, X2jPolicy};
pub use xml_tree::{XmlDocument, XmlElement, XmlNode};

use clap::ValueEnum;
use errors::ConverterError;
use formats::Format;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Defines the conversion direction.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionDirection {
    /// Convert an XML document to JSON
    #[value(name = "x2j")]
    XmlToJson,
    /// Convert a JSON document to XML
    #[value(name = "j2x")]
    JsonToXml,
}

impl ConversionDirection {
    /// Pick the direction from the input file's extension, falling back to
    /// its content.
    pub fn detect(input: &Path, content: &[u8]) -> Result<Self, ConverterError> {
        let format = Format::from_extension(input).or_else(|_| Format::from_content(content))?;
        Ok(match format {
            Format::Xml => ConversionDirection::XmlToJson,
            Format::Json => ConversionDirection::JsonToXml,
        })
    }

    pub fn output_format(&self) -> Format {
        match self {
            ConversionDirection::XmlToJson => Format::Json,
            ConversionDirection::JsonToXml => Format::Xml,
        }
    }
}

/// Top-level configuration for a conversion run.
#[derive(Debug)]
pub struct Config {
    pub input_file: PathBuf,
    /// Defaults to the input path with the output format's extension.
    pub output_file: Option<PathBuf>,
    /// Detected from the input file when not given.
    pub direction: Option<ConversionDirection>,
    /// JSON file holding an `X2jPolicy` or `J2xPolicy`, depending on direction.
    pub policy_file: Option<PathBuf>,
    pub pretty: bool,
}

/// The main entry point for the conversion logic.
///
/// Reads the input file, loads the policy, converts, and writes the output.
/// Nothing is written when any step fails.
pub fn run(config: Config) -> Result<(), ConverterError> {
    let start_time = Instant::now();

    let content = fs::read(&config.input_file).map_err(|e| {
        ConverterError::Io(
            e,
            format!("Failed to read input file: {}", config.input_file.display()),
        )
    })?;

    let direction = match config.direction {
        Some(direction) => direction,
        None => ConversionDirection::detect(&config.input_file, &content)?,
    };
    let output_file = config.output_file.clone().unwrap_or_else(|| {
        config
            .input_file
            .with_extension(direction.output_format().extension())
    });
    if output_file == config.input_file {
        return Err(ConverterError::InvalidInput(format!(
            "Output would overwrite the input file: {}",
            output_file.display()
        )));
    }

    info!("Starting conversion: {:?}", direction);
    info!("  Input: {}", config.input_file.display());
    info!(
        "  Output: {} ({})",
        output_file.display(),
        direction.output_format().mime_type()
    );

    let mut output = Vec::new();
    match direction {
        ConversionDirection::XmlToJson => {
            let policy: X2jPolicy = load_policy(config.policy_file.as_deref())?;
            policy.validate()?;

            let doc = formats::xml::parse(content.as_slice())?;
            let converter = XmlToJsonConverter::new(policy);
            let json = converter.convert(&doc)?;
            formats::json::write(&mut output, &json, config.pretty)?;

            let stats = converter.stats();
            info!(
                "Coercions: {} applied, {} skipped, {} number parse failures",
                stats.applied(),
                stats.missed(),
                stats.parse_failures()
            );
        }
        ConversionDirection::JsonToXml => {
            let policy: J2xPolicy = load_policy(config.policy_file.as_deref())?;

            let json = formats::json::parse(content.as_slice())?;
            let doc = JsonToXmlConverter::new(policy).convert(&json);
            formats::xml::write(&mut output, &doc, config.pretty)?;
        }
    }

    fs::write(&output_file, output).map_err(|e| {
        ConverterError::Io(
            e,
            format!("Failed to write output file: {}", output_file.display()),
        )
    })?;

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}

/// Load a policy from a JSON file, or use the defaults when no file is given.
pub fn load_policy<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ConverterError> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path).map_err(|e| {
        ConverterError::Io(e, format!("Failed to read policy file: {}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        ConverterError::Config(format!("Invalid policy file {}: {}", path.display(), e))
    })
}

/// Parse XML text and convert it to JSON in one step.
pub fn xml_str_to_json(xml: &str, policy: &X2jPolicy) -> Result<Value, ConverterError> {
    let doc = formats::xml::parse_str(xml)?;
    XmlToJsonConverter::new(policy.clone()).convert(&doc)
}

/// Parse JSON text and render it as XML text in one step.
pub fn json_str_to_xml(json: &str, policy: &J2xPolicy, pretty: bool) -> Result<String, ConverterError> {
    let value = formats::json::parse(json.as_bytes())?;
    let doc = JsonToXmlConverter::new(policy.clone()).convert(&value);
    formats::xml::to_string(&doc, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_direction() {
        assert_eq!(
            ConversionDirection::detect(&PathBuf::from("in.xml"), b"").unwrap(),
            ConversionDirection::XmlToJson
        );
        assert_eq!(
            ConversionDirection::detect(&PathBuf::from("in.txt"), b"{}").unwrap(),
            ConversionDirection::JsonToXml
        );
        assert!(ConversionDirection::detect(&PathBuf::from("in"), b"").is_err());
    }

    #[test]
    fn test_load_policy_defaults_without_file() {
        let policy: J2xPolicy = load_policy(None).unwrap();
        assert_eq!(policy, J2xPolicy::default());
    }

    #[test]
    fn test_str_helpers() {
        let json = xml_str_to_json("<root><a>1</a></root>", &X2jPolicy::default()).unwrap();
        assert_eq!(json, serde_json::json!({"a": "1"}));

        let xml = json_str_to_xml(r#"{"a": 1}"#, &J2xPolicy::default(), false).unwrap();
        assert!(xml.ends_with("<root><a>1</a></root>"));
    }
}
