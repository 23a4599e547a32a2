//! SOAP envelope and namespace helpers shared by both converters.

use crate::xml_tree::{XmlElement, XmlNode};

pub const SOAP_1_1_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP_1_2_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Alias used for generated envelopes.
pub const ENVELOPE_ALIAS: &str = "soapenv";

/// SOAP specification version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    V1_1,
    #[default]
    V1_2,
}

impl SoapVersion {
    /// Get the version string (e.g., "1.2")
    pub fn as_str(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => "1.1",
            SoapVersion::V1_2 => "1.2",
        }
    }

    /// Parse from string. Anything other than "1.1" is SOAP 1.2.
    pub fn from_str(s: &str) -> Self {
        match s {
            "1.1" => SoapVersion::V1_1,
            _ => SoapVersion::V1_2,
        }
    }

    pub fn namespace_uri(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => SOAP_1_1_NAMESPACE,
            SoapVersion::V1_2 => SOAP_1_2_NAMESPACE,
        }
    }
}

/// Build an empty `soapenv:Envelope` / `soapenv:Body` pair.
///
/// The body is returned separately so the caller can fill it before
/// attaching it with [`XmlElement::append_child`].
pub fn envelope(version: SoapVersion) -> (XmlElement, XmlElement) {
    let env = XmlElement::new(format!("{}:Envelope", ENVELOPE_ALIAS))
        .with_attribute(format!("xmlns:{}", ENVELOPE_ALIAS), version.namespace_uri());
    let body = XmlElement::new(format!("{}:Body", ENVELOPE_ALIAS));
    (env, body)
}

/// Create `alias:name` bound to `namespace` through an `xmlns:alias` declaration.
pub fn qualified_element(alias: &str, namespace: &str, name: &str) -> XmlElement {
    XmlElement::new(format!("{}:{}", alias, name))
        .with_attribute(format!("xmlns:{}", alias), namespace)
}

/// The alias bound by the last `xmlns:<alias>` attribute on `root`.
pub fn declared_alias(root: &XmlElement) -> Option<&str> {
    root.attributes
        .iter()
        .filter_map(|(name, _)| name.strip_prefix("xmlns:"))
        .last()
}

/// Locate the SOAP body under an envelope.
///
/// The body is named `<alias>:Body` with the alias declared on the envelope,
/// or plain `Body` when none is declared. Direct children are checked
/// first, then the whole subtree in document order.
pub fn find_body(root: &XmlElement) -> Option<&XmlElement> {
    let alias = declared_alias(root);
    let is_body = |e: &XmlElement| e.local_name() == "Body" && e.prefix() == alias;
    root.child_elements()
        .find(|e| is_body(*e))
        .or_else(|| find_descendant(root, &is_body))
}

fn find_descendant<'a>(
    element: &'a XmlElement,
    is_body: &dyn Fn(&XmlElement) -> bool,
) -> Option<&'a XmlElement> {
    element.child_elements().find_map(|child| {
        if is_body(child) {
            Some(child)
        } else {
            find_descendant(child, is_body)
        }
    })
}

/// Copy of `envelope` keeping only the children whose name ends in `Body`.
///
/// Text and header elements are dropped. The input is left untouched.
pub fn strip_to_body(envelope: &XmlElement) -> XmlElement {
    XmlElement {
        name: envelope.name.clone(),
        attributes: envelope.attributes.clone(),
        children: envelope
            .children
            .iter()
            .filter(|c| matches!(c, XmlNode::Element(e) if e.local_name().ends_with("Body")))
            .cloned()
            .collect(),
    }
}
