//! XML text handler
//!
//! Reads XML text into an [`XmlDocument`] and writes one back out, using
//! `quick-xml` for tokenizing and escaping. Comments, processing
//! instructions, the XML declaration and doctypes are skipped on input.

use crate::errors::ConverterError;
use crate::xml_tree::{XmlDocument, XmlElement, XmlNode};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};

/// Parse an XML document from a buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<XmlDocument, ConverterError> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(start_element(&e)?),
            Ok(Event::Empty(e)) => {
                let element = start_element(&e)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    ConverterError::ParseError("Unexpected closing tag".to_string())
                })?;
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| {
                    ConverterError::ParseError(format!("Failed to unescape XML text: {}", e))
                })?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8(e.into_inner().into_owned()).map_err(|e| {
                    ConverterError::ParseError(format!("CDATA section is not UTF-8: {}", e))
                })?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ConverterError::ParseError(format!(
                    "Failed to parse XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ConverterError::ParseError(format!(
            "Unclosed element <{}>",
            open.name
        )));
    }
    root.map(XmlDocument::new)
        .ok_or_else(|| ConverterError::ParseError("Document has no root element".to_string()))
}

/// Parse an XML document held in memory.
pub fn parse_str(xml: &str) -> Result<XmlDocument, ConverterError> {
    parse(xml.as_bytes())
}

fn start_element(e: &BytesStart) -> Result<XmlElement, ConverterError> {
    let mut element = XmlElement::new(utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| ConverterError::ParseError(format!("Malformed attribute: {}", e)))?;
        let value = attr.unescape_value().map_err(|e| {
            ConverterError::ParseError(format!("Failed to unescape attribute value: {}", e))
        })?;
        element
            .attributes
            .push((utf8(attr.key.as_ref())?, value.into_owned()));
    }
    Ok(element)
}

fn close_element(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ConverterError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_some() => {
            return Err(ConverterError::ParseError(format!(
                "Second root element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), ConverterError> {
    match stack.last_mut() {
        // quick-xml may split text around entities, merge adjacent pieces
        Some(parent) => match parent.children.last_mut() {
            Some(XmlNode::Text(existing)) => existing.push_str(text),
            _ => parent.children.push(XmlNode::Text(text.to_string())),
        },
        None if text.trim().is_empty() => {}
        None => {
            return Err(ConverterError::ParseError(
                "Text found outside the root element".to_string(),
            ));
        }
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<String, ConverterError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ConverterError::ParseError(format!("Name is not UTF-8: {}", e)))
}

/// Write an XML document, optionally indented by two spaces.
pub fn write<W: Write>(mut writer: W, doc: &XmlDocument, pretty: bool) -> Result<(), ConverterError> {
    // Add XML declaration
    writer
        .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")
        .map_err(|e| ConverterError::Io(e, "Failed to write XML declaration".to_string()))?;

    let mut xml = if pretty {
        Writer::new_with_indent(writer, b' ', 2)
    } else {
        Writer::new(writer)
    };
    write_element(&mut xml, &doc.root)
}

/// Serialize an XML document to a string.
pub fn to_string(doc: &XmlDocument, pretty: bool) -> Result<String, ConverterError> {
    let mut output = Vec::new();
    write(&mut output, doc, pretty)?;
    String::from_utf8(output)
        .map_err(|e| ConverterError::SerializationError(format!("XML output is not UTF-8: {}", e)))
}

fn write_element<W: Write>(xml: &mut Writer<W>, element: &XmlElement) -> Result<(), ConverterError> {
    check_name(&element.name, "element")?;
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        check_name(name, "attribute")?;
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return xml.write_event(Event::Empty(start)).map_err(write_error);
    }

    xml.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(xml, e)?,
            XmlNode::Text(t) => xml
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_error)?,
        }
    }
    xml.write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

/// Names that would not read back as a single XML name are refused.
fn check_name(name: &str, kind: &str) -> Result<(), ConverterError> {
    if is_xml_name(name) {
        return Ok(());
    }
    Err(ConverterError::SerializationError(format!(
        "'{}' is not a valid XML {} name",
        name, kind
    )))
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start = |c: char| c.is_alphabetic() || c == '_' || c == ':';
    start(first) && chars.all(|c| start(c) || c.is_alphanumeric() || matches!(c, '-' | '.'))
}

fn write_error(e: impl std::fmt::Display) -> ConverterError {
    ConverterError::SerializationError(format!("Failed to write XML: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elements_attributes_text() {
        let doc = parse_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- leading comment -->
<root a="1 &amp; 2"><name>John &lt;J&gt;</name><empty/><![CDATA[<raw>]]></root>"#,
        )
        .unwrap();

        assert_eq!(doc.root.name, "root");
        assert_eq!(doc.root.attribute("a"), Some("1 & 2"));
        let names: Vec<_> = doc.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["name", "empty"]);
        let name = doc.root.child_elements().next().unwrap();
        assert_eq!(name.text(), Some("John <J>".to_string()));
        assert_eq!(doc.root.text(), Some("<raw>".to_string()));
    }

    #[test]
    fn test_parse_keeps_qualified_names() {
        let doc = parse_str(r#"<s:Envelope xmlns:s="urn:x"><s:Body/></s:Envelope>"#).unwrap();
        assert_eq!(doc.root.name, "s:Envelope");
        assert_eq!(doc.root.attribute("xmlns:s"), Some("urn:x"));
        assert_eq!(doc.root.child_elements().next().unwrap().name, "s:Body");
    }

    #[test]
    fn test_parse_rejects_bad_documents() {
        assert!(parse_str("").is_err());
        assert!(parse_str("<a></b>").is_err());
        assert!(parse_str("<a>").is_err());
        assert!(parse_str("<a/><b/>").is_err());
        assert!(parse_str("stray<a/>").is_err());
    }

    #[test]
    fn test_write_compact() {
        let root = XmlElement::new("root")
            .with_attribute("id", "a\"b")
            .with_child(XmlElement::new("name").with_text("Tom & Jerry"))
            .with_child(XmlElement::new("empty"));
        let xml = to_string(&XmlDocument::new(root), false).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <root id=\"a&quot;b\"><name>Tom &amp; Jerry</name><empty/></root>"
        );
    }

    #[test]
    fn test_write_rejects_invalid_names() {
        let spaced = XmlElement::new("root").with_child(XmlElement::new("first name"));
        assert!(matches!(
            to_string(&XmlDocument::new(spaced), false),
            Err(ConverterError::SerializationError(_))
        ));

        let empty_attr = XmlElement::new("root").with_attribute("", "x");
        assert!(matches!(
            to_string(&XmlDocument::new(empty_attr), false),
            Err(ConverterError::SerializationError(_))
        ));

        let digit = XmlElement::new("1st");
        assert!(to_string(&XmlDocument::new(digit), false).is_err());
        assert!(to_string(&XmlDocument::new(XmlElement::new("ns:a-b.c_1")), false).is_ok());
    }

    #[test]
    fn test_write_then_parse() {
        let root = XmlElement::new("ex:root")
            .with_attribute("xmlns:ex", "http://example.com")
            .with_child(XmlElement::new("name").with_text("<John>"));
        let doc = XmlDocument::new(root);
        let xml = to_string(&doc, false).unwrap();
        assert_eq!(parse_str(&xml).unwrap(), doc);
    }
}
