//! Conversion policies for both directions.
//!
//! A policy is an immutable record of switches and path lists. Converters
//! take one at construction time and never modify it. Policies deserialize
//! from JSON with camelCase option names, and missing options fall back to
//! their defaults, so a policy file only needs to list what it changes.

use crate::errors::ConverterError;
use crate::pointer::FieldPath;
use serde::Deserialize;

/// How the coercion engine treats array and number targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Wrap the addressed field in an array and parse the field's own text
    /// when coercing numbers.
    #[default]
    Corrected,
    /// Bit-for-bit behaviour of the legacy converter: array coercion stores
    /// a copy of the whole document root, number coercion parses the path
    /// string instead of the field value.
    Legacy,
}

/// Options for XML → JSON conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct X2jPolicy {
    /// Drop every XML attribute.
    pub ignore_xml_attribute: bool,
    /// Key prefix marking attributes in the JSON output.
    pub xml_attribute_prefix: String,
    /// Key holding element text when the element also has attributes or children.
    pub xml_value_field_name: String,
    /// Keep the document root element as the single top-level key.
    pub include_root: bool,
    /// Skip attributes qualified with the `xsd:` alias.
    pub ignore_xsd_type_attr: bool,
    /// Pointer expressions of fields that must always be arrays.
    pub xml_array_fields: Vec<String>,
    /// Pointer expressions of fields to parse as numbers.
    pub xml_number_fields: Vec<String>,
    /// Pointer expressions of fields to parse as booleans.
    pub xml_boolean_fields: Vec<String>,
    pub trim_whitespace: bool,
    pub trim_new_line: bool,
    /// Render elements without any text as `""` instead of `null`.
    pub null_as_empty_string: bool,
    /// Convert only the content of the SOAP `Body`.
    #[serde(rename = "tearSOAPEnvelope", alias = "tearSoapEnvelope")]
    pub tear_soap_envelope: bool,
    /// Reduce `alias:local` names to `local`.
    pub remove_namespace_alias: bool,
    pub coercion_mode: CoercionMode,
}

impl Default for X2jPolicy {
    fn default() -> Self {
        Self {
            ignore_xml_attribute: true,
            xml_attribute_prefix: "@".to_string(),
            xml_value_field_name: "_value".to_string(),
            include_root: false,
            ignore_xsd_type_attr: true,
            xml_array_fields: Vec::new(),
            xml_number_fields: Vec::new(),
            xml_boolean_fields: Vec::new(),
            trim_whitespace: true,
            trim_new_line: true,
            null_as_empty_string: false,
            tear_soap_envelope: false,
            remove_namespace_alias: true,
            coercion_mode: CoercionMode::Corrected,
        }
    }
}

impl X2jPolicy {
    /// Check every coercion path up front.
    ///
    /// Conversion reports the same error lazily; this lets callers reject a
    /// bad policy before any document is read.
    pub fn validate(&self) -> Result<(), ConverterError> {
        self.xml_array_fields
            .iter()
            .chain(&self.xml_number_fields)
            .chain(&self.xml_boolean_fields)
            .try_for_each(|path| FieldPath::parse(path).map(|_| ()))
    }

    /// The trim behaviour selected by the two trim flags.
    pub fn trim_mode(&self) -> TrimMode {
        TrimMode::from_flags(self.trim_whitespace, self.trim_new_line)
    }
}

/// Options for JSON → XML conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct J2xPolicy {
    /// Name of the generated root element.
    pub root_name: String,
    /// Element name used for array items that have no field name.
    pub unnamed_arr_xml_node_name: String,
    pub ignore_xml_attribute: bool,
    pub xml_attribute_prefix: String,
    pub xml_value_field_name: String,
    pub trim_whitespace: bool,
    /// Skip empty arrays instead of emitting one empty element.
    pub ignore_empty_array: bool,
    /// Qualify the root element with `alias` bound to `namespace`.
    pub create_namespace: bool,
    pub alias: String,
    pub namespace: Option<String>,
    pub wrap_soap_envelope: bool,
    /// "1.1" selects SOAP 1.1; any other value means SOAP 1.2.
    pub soap_version: String,
    /// Map the JSON root straight into the SOAP `Body`.
    pub soap_body_as_root: bool,
}

impl Default for J2xPolicy {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            unnamed_arr_xml_node_name: "item".to_string(),
            ignore_xml_attribute: false,
            xml_attribute_prefix: "@".to_string(),
            xml_value_field_name: "_value".to_string(),
            trim_whitespace: true,
            ignore_empty_array: false,
            create_namespace: false,
            alias: "n0".to_string(),
            namespace: None,
            wrap_soap_envelope: false,
            soap_version: "1.2".to_string(),
            soap_body_as_root: false,
        }
    }
}

/// Leading/trailing trimming applied to extracted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    None,
    /// Only `\r` and `\n`.
    NewLine,
    /// Any ASCII whitespace, line breaks included.
    Whitespace,
    Both,
}

impl TrimMode {
    pub fn from_flags(trim_whitespace: bool, trim_new_line: bool) -> Self {
        match (trim_whitespace, trim_new_line) {
            (true, true) => TrimMode::Both,
            (false, true) => TrimMode::NewLine,
            (true, false) => TrimMode::Whitespace,
            (false, false) => TrimMode::None,
        }
    }

    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            TrimMode::None => value,
            TrimMode::NewLine => value.trim_matches(is_newline),
            TrimMode::Whitespace | TrimMode::Both => value.trim_matches(is_xml_space),
        }
    }
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// `[ \t\n\x0B\f\r]`; non-ASCII spaces such as U+00A0 are content.
fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x2j_defaults() {
        let policy = X2jPolicy::default();
        assert!(policy.ignore_xml_attribute);
        assert!(policy.ignore_xsd_type_attr);
        assert!(policy.remove_namespace_alias);
        assert!(!policy.include_root);
        assert_eq!(policy.xml_attribute_prefix, "@");
        assert_eq!(policy.xml_value_field_name, "_value");
        assert_eq!(policy.trim_mode(), TrimMode::Both);
        assert_eq!(policy.coercion_mode, CoercionMode::Corrected);
    }

    #[test]
    fn test_x2j_partial_policy_file() {
        let policy: X2jPolicy = serde_json::from_str(
            r#"{
                "ignoreXmlAttribute": false,
                "tearSOAPEnvelope": true,
                "xmlBooleanFields": ["/person/active"],
                "coercionMode": "legacy"
            }"#,
        )
        .unwrap();

        assert!(!policy.ignore_xml_attribute);
        assert!(policy.tear_soap_envelope);
        assert_eq!(policy.xml_boolean_fields, vec!["/person/active"]);
        assert_eq!(policy.coercion_mode, CoercionMode::Legacy);
        // untouched options keep defaults
        assert!(policy.trim_new_line);
        assert_eq!(policy.xml_attribute_prefix, "@");
    }

    #[test]
    fn test_x2j_validate_rejects_bad_path() {
        let policy = X2jPolicy {
            xml_number_fields: vec!["/ok".to_string(), "not a pointer".to_string()],
            ..Default::default()
        };
        match policy.validate() {
            Err(ConverterError::InvalidPointerExpression(p)) => assert_eq!(p, "not a pointer"),
            other => panic!("expected pointer error, got {:?}", other),
        }
    }

    #[test]
    fn test_j2x_defaults_and_file() {
        let policy = J2xPolicy::default();
        assert_eq!(policy.root_name, "root");
        assert_eq!(policy.unnamed_arr_xml_node_name, "item");
        assert_eq!(policy.alias, "n0");
        assert_eq!(policy.soap_version, "1.2");
        assert!(policy.namespace.is_none());

        let policy: J2xPolicy = serde_json::from_str(
            r#"{"rootName": "request", "namespace": "http://example.com", "createNamespace": true}"#,
        )
        .unwrap();
        assert_eq!(policy.root_name, "request");
        assert_eq!(policy.namespace.as_deref(), Some("http://example.com"));
        assert!(policy.create_namespace);
        assert!(!policy.wrap_soap_envelope);
    }

    #[test]
    fn test_trim_modes() {
        let raw = "\n\t John \t\r\n";
        assert_eq!(TrimMode::None.apply(raw), raw);
        assert_eq!(TrimMode::NewLine.apply(raw), "\t John \t");
        assert_eq!(TrimMode::Whitespace.apply(" \tJohn\t "), "John");
        assert_eq!(TrimMode::Whitespace.apply(raw), "John");
        assert_eq!(TrimMode::Both.apply(raw), "John");
    }

    #[test]
    fn test_trim_is_ascii_only() {
        let raw = "\u{a0}\x0B John\x0C\u{2003}";
        assert_eq!(TrimMode::Both.apply(raw), raw);
        assert_eq!(TrimMode::Whitespace.apply("\x0B\x0C John \x0B"), "John");
        assert_eq!(TrimMode::Both.apply("\u{a0}John\u{a0}"), "\u{a0}John\u{a0}");
    }
}
