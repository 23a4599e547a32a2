//! JSON text handler

use crate::errors::ConverterError;
use serde_json::Value;
use std::io::{Read, Write};

/// Parse a JSON value
pub fn parse<R: Read>(reader: R) -> Result<Value, ConverterError> {
    serde_json::from_reader(reader)
        .map_err(|e| ConverterError::ParseError(format!("Failed to parse JSON: {}", e)))
}

/// Write a JSON value, pretty-printed or compact
pub fn write<W: Write>(writer: W, value: &Value, pretty: bool) -> Result<(), ConverterError> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, value)
    } else {
        serde_json::to_writer(writer, value)
    };
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_keeps_key_order() {
        let value = parse(Cursor::new(r#"{"b": 1, "a": {"z": true, "y": null}}"#)).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        let inner: Vec<_> = value["a"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(inner, vec!["z", "y"]);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse(Cursor::new("{not json")),
            Err(ConverterError::ParseError(_))
        ));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_is_serde_error() {
        let err = write(ClosedPipe, &serde_json::json!({"a": 1}), false).unwrap_err();
        assert!(matches!(err, ConverterError::Serde(_)));
        assert!(err.to_string().starts_with("JSON Error"));
    }

    #[test]
    fn test_write_compact() {
        let value = parse(Cursor::new(r#"{"name": "John", "age": 30}"#)).unwrap();
        let mut out = Vec::new();
        write(&mut out, &value, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"name":"John","age":30}"#);
    }
}
