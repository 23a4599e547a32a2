//! JSON → XML conversion.
//!
//! Objects expand key by key: attribute-prefixed scalars become attributes,
//! the value field becomes text, arrays become repeated elements named after
//! their key, and everything else becomes a child element. Only the document
//! root (or, with `soap_body_as_root`, the elements placed directly in the
//! SOAP body) may carry the configured namespace.

use crate::policy::{J2xPolicy, TrimMode};
use crate::soap::{self, SoapVersion};
use crate::xml_tree::{XmlDocument, XmlElement};
use log::{debug, warn};
use serde_json::Value;

/// Converts JSON values to XML documents under one [`J2xPolicy`].
pub struct JsonToXmlConverter {
    policy: J2xPolicy,
    trim: TrimMode,
}

impl JsonToXmlConverter {
    pub fn new(policy: J2xPolicy) -> Self {
        let trim = TrimMode::from_flags(policy.trim_whitespace, policy.trim_whitespace);
        Self { policy, trim }
    }

    pub fn policy(&self) -> &J2xPolicy {
        &self.policy
    }

    /// Convert a JSON value. Every value has an XML rendering, so this cannot fail.
    pub fn convert(&self, json: &Value) -> XmlDocument {
        let policy = &self.policy;

        if !policy.wrap_soap_envelope {
            let mut root = self.new_element(&policy.root_name, policy.create_namespace);
            self.map_value(&mut root, json, None, false);
            return XmlDocument::new(root);
        }

        let version = SoapVersion::from_str(&policy.soap_version);
        debug!("Wrapping output in a SOAP {} envelope", version.as_str());
        let (mut envelope, mut body) = soap::envelope(version);

        if policy.soap_body_as_root {
            self.map_value(&mut body, json, Some(policy.root_name.as_str()), policy.create_namespace);
        } else {
            let mut root = self.new_element(&policy.root_name, policy.create_namespace);
            self.map_value(&mut root, json, None, false);
            body.append_child(root);
        }

        envelope.append_child(body);
        XmlDocument::new(envelope)
    }

    fn new_element(&self, name: &str, qualify: bool) -> XmlElement {
        if qualify {
            match self.policy.namespace.as_deref() {
                Some(namespace) => {
                    return soap::qualified_element(&self.policy.alias, namespace, name);
                }
                None => warn!(
                    "createNamespace is set but no namespace is configured, <{}> stays unqualified",
                    name
                ),
            }
        }
        XmlElement::new(name)
    }

    /// Map `json` into `current`.
    ///
    /// `field_name` names the elements produced for array items; `qualify`
    /// applies to elements created directly under `current` only.
    fn map_value(&self, current: &mut XmlElement, json: &Value, field_name: Option<&str>, qualify: bool) {
        match json {
            Value::Array(items) => {
                let name = field_name.unwrap_or(self.policy.unnamed_arr_xml_node_name.as_str());
                if items.is_empty() {
                    if !self.policy.ignore_empty_array {
                        current.append_child(self.new_element(name, qualify));
                    }
                    return;
                }
                for item in items {
                    if item.is_array() {
                        // nested arrays flatten into the same parent
                        self.map_value(current, item, Some(name), qualify);
                    } else {
                        let mut child = self.new_element(name, qualify);
                        self.map_value(&mut child, item, Some(name), false);
                        current.append_child(child);
                    }
                }
            }
            Value::Object(fields) => {
                let prefix = &self.policy.xml_attribute_prefix;
                for (key, value) in fields {
                    let scalar = !value.is_array() && !value.is_object();
                    if scalar && !self.policy.ignore_xml_attribute && key.starts_with(prefix.as_str()) {
                        let name = &key[prefix.len()..];
                        if name.is_empty() {
                            warn!("Key '{}' names no attribute under <{}>, skipped", key, current.name);
                            continue;
                        }
                        current.set_attribute(name, self.text_of(value));
                    } else if scalar && *key == self.policy.xml_value_field_name {
                        current.set_text(self.text_of(value));
                    } else if value.is_array() {
                        self.map_value(current, value, Some(key.as_str()), qualify);
                    } else {
                        let mut child = self.new_element(key, qualify);
                        self.map_value(&mut child, value, Some(key.as_str()), false);
                        current.append_child(child);
                    }
                }
            }
            scalar => current.set_text(self.text_of(scalar)),
        }
    }

    fn text_of(&self, value: &Value) -> String {
        match value {
            Value::String(s) => self.trim.apply(s).to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
