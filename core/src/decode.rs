//! Strict JSON decoding of response bodies.

use serde_json::{Map, Value};

use crate::error::ClientError;

/// Decode a response body.
///
/// Blank text is the "no content" case and yields an empty object. Anything
/// else must be a complete JSON document or the call fails with
/// `InvalidResponse`.
pub fn decode(text: &str) -> Result<Value, ClientError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text).map_err(|e| ClientError::InvalidResponse(Some(e.to_string())))
}

/// Decode a raw response body. Bytes that are not UTF-8 are
/// `InvalidResponse`, never replaced.
pub fn decode_body(body: &[u8]) -> Result<Value, ClientError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ClientError::InvalidResponse(Some(format!("body is not UTF-8: {e}"))))?;
    decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_text_is_empty_object() {
        for text in ["", " ", "\n\t  \r\n"] {
            assert_eq!(decode(text).unwrap(), json!({}), "{text:?}");
        }
    }

    #[test]
    fn valid_documents_decode() {
        assert_eq!(decode(r#"{"a":"b"}"#).unwrap(), json!({"a": "b"}));
        assert_eq!(decode("[1,2,3]").unwrap(), json!([1, 2, 3]));
        assert_eq!(decode(" 42 ").unwrap(), json!(42));
    }

    #[test]
    fn body_bytes_must_be_utf8() {
        assert_eq!(decode_body(br#"{"a":"b"}"#).unwrap(), json!({"a": "b"}));
        assert_eq!(decode_body(b"").unwrap(), json!({}));
        let err = decode_body(b"{\"a\":\"\xff\"}").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(Some(_))));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = decode(r#"{"a":"b" "c":"d"}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(Some(_))));
    }
}
