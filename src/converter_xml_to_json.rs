//! XML → JSON conversion.
//!
//! The mapping is a depth-first walk over the element tree:
//! - attributes become `prefix + name` keys holding strings
//! - child elements are grouped by tag name; a group of one becomes a
//!   single value, larger groups become arrays in document order
//! - text is stored under the value field name when the element also has
//!   attributes or children, otherwise the element collapses to a scalar
//!
//! After the structural pass the policy's coercion lists run in fixed
//! order: arrays, then booleans, then numbers.

use crate::coercion::{CoercionKind, coerce};
use crate::errors::ConverterError;
use crate::policy::{TrimMode, X2jPolicy};
use crate::soap;
use crate::stats::CoercionStats;
use crate::xml_tree::{XmlDocument, XmlElement, XmlNode};
use log::{debug, warn};
use serde_json::{Map, Value};

/// Attribute names starting with this alias are XML Schema type hints.
const XSD_ALIAS_PREFIX: &str = "xsd:";

/// Converts XML documents to JSON values under one [`X2jPolicy`].
///
/// The converter keeps no per-call state besides the coercion counters, so
/// one instance can convert any number of documents.
pub struct XmlToJsonConverter {
    policy: X2jPolicy,
    trim: TrimMode,
    stats: CoercionStats,
}

impl XmlToJsonConverter {
    pub fn new(policy: X2jPolicy) -> Self {
        let trim = policy.trim_mode();
        Self {
            policy,
            trim,
            stats: CoercionStats::new(),
        }
    }

    pub fn policy(&self) -> &X2jPolicy {
        &self.policy
    }

    /// Counters accumulated over every conversion made by this instance.
    pub fn stats(&self) -> &CoercionStats {
        &self.stats
    }

    /// Convert a document.
    ///
    /// Fails only when a coercion list holds a malformed pointer expression.
    pub fn convert(&self, doc: &XmlDocument) -> Result<Value, ConverterError> {
        let json = self.convert_structure(doc);

        let mode = self.policy.coercion_mode;
        let json = coerce(
            json,
            &self.policy.xml_array_fields,
            CoercionKind::Array,
            mode,
            &self.stats,
        )?;
        let json = coerce(
            json,
            &self.policy.xml_boolean_fields,
            CoercionKind::Boolean,
            mode,
            &self.stats,
        )?;
        let json = coerce(
            json,
            &self.policy.xml_number_fields,
            CoercionKind::Number,
            mode,
            &self.stats,
        )?;

        self.stats.finish();
        Ok(json)
    }

    /// Strip the namespace alias from a qualified name when the policy asks for it.
    ///
    /// Only the first colon separates alias from local name.
    pub fn trim_node_name<'a>(&self, name: &'a str) -> &'a str {
        if self.policy.remove_namespace_alias {
            if let Some((_, local)) = name.split_once(':') {
                return local;
            }
        }
        name
    }

    fn convert_structure(&self, doc: &XmlDocument) -> Value {
        let root = &doc.root;
        debug!("Converting <{}> to JSON", root.name);

        if self.policy.tear_soap_envelope {
            if self.policy.include_root {
                return self.element_to_value(&soap::strip_to_body(root));
            }
            return match soap::find_body(root) {
                Some(body) => self.element_to_value(body),
                None => {
                    warn!(
                        "No SOAP Body found under <{}>, converting the whole document",
                        root.name
                    );
                    self.element_to_value(root)
                }
            };
        }

        if self.policy.include_root {
            let mut wrapper = Map::new();
            wrapper.insert(
                self.trim_node_name(&root.name).to_string(),
                self.element_to_value(root),
            );
            Value::Object(wrapper)
        } else {
            self.element_to_value(root)
        }
    }

    fn element_to_value(&self, element: &XmlElement) -> Value {
        let mut fields = Map::new();

        if !self.policy.ignore_xml_attribute {
            for (name, value) in &element.attributes {
                if self.policy.ignore_xsd_type_attr && name.starts_with(XSD_ALIAS_PREFIX) {
                    continue;
                }
                fields.insert(
                    format!("{}{}", self.policy.xml_attribute_prefix, self.trim_node_name(name)),
                    Value::String(self.trim.apply(value).to_string()),
                );
            }
        }

        let mut text: Option<String> = None;
        let mut groups: Vec<(&str, Vec<&XmlElement>)> = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Text(t) => text.get_or_insert_with(String::new).push_str(t),
                XmlNode::Element(e) => {
                    let name = self.trim_node_name(&e.name);
                    match groups.iter_mut().find(|(n, _)| *n == name) {
                        Some((_, members)) => members.push(e),
                        None => groups.push((name, vec![e])),
                    }
                }
            }
        }

        if fields.is_empty() && groups.is_empty() {
            return match text {
                Some(t) => Value::String(self.trim.apply(&t).to_string()),
                None if self.policy.null_as_empty_string => Value::String(String::new()),
                None => Value::Null,
            };
        }

        for (name, members) in groups {
            let value = match members.as_slice() {
                [single] => self.element_to_value(single),
                many => Value::Array(many.iter().map(|e| self.element_to_value(e)).collect()),
            };
            fields.insert(name.to_string(), value);
        }

        if let Some(t) = text {
            let trimmed = self.trim.apply(&t);
            if !trimmed.is_empty() {
                fields.insert(
                    self.policy.xml_value_field_name.clone(),
                    Value::String(trimmed.to_string()),
                );
            }
        }

        Value::Object(fields)
    }
}
