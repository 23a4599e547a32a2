//! Round-trip tests for the plain-object subset: no attributes, no arrays,
//! no SOAP, no coercion. Element nesting and text must survive
//! XML → JSON → XML unchanged.

use pretty_assertions::assert_eq;
use xmljson_converter::formats::xml;
use xmljson_converter::{J2xPolicy, JsonToXmlConverter, X2jPolicy, XmlToJsonConverter};

fn round_trip(text: &str) -> String {
    let doc = xml::parse_str(text).unwrap();
    let json = XmlToJsonConverter::new(X2jPolicy::default())
        .convert(&doc)
        .unwrap();

    let policy = J2xPolicy {
        root_name: doc.root.name.clone(),
        ..Default::default()
    };
    let back = JsonToXmlConverter::new(policy).convert(&json);
    xml::to_string(&back, false).unwrap()
}

#[test]
fn test_nested_plain_objects() {
    let text = "<root><person><name>John</name><address><city>Oslo</city><zip>0150</zip></address></person></root>";
    assert_eq!(
        round_trip(text),
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", text)
    );
}

#[test]
fn test_empty_element_survives() {
    let text = "<root><name>John</name><middle/></root>";
    assert_eq!(
        round_trip(text),
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", text)
    );
}

#[test]
fn test_json_to_xml_to_json() {
    let json = serde_json::json!({"person": {"name": "John", "city": "Oslo"}});
    let doc = JsonToXmlConverter::new(J2xPolicy::default()).convert(&json);
    let back = XmlToJsonConverter::new(X2jPolicy::default())
        .convert(&doc)
        .unwrap();
    assert_eq!(back, json);
}
