//! Record field codec: typed values to canonical bytes and back.
//!
//! Numerics travel in decimal string form rather than binary layout, so
//! stored ciphertexts stay language-agnostic and round-trip exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::envelope::{EnvelopeBundle, HybridEnvelope};
use crate::error::EnvelopeError;

/// Declared type of an encrypted record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Structured,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Structured => "structured",
        };
        f.write_str(name)
    }
}

impl FromStr for FieldKind {
    type Err = EnvelopeError;

    /// Parse a declared type name (as carried in schema configuration).
    /// Names outside the supported set fail with
    /// [`EnvelopeError::UnsupportedFieldType`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "string" | "str" => Ok(Self::Text),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            "structured" | "json" => Ok(Self::Structured),
            other => Err(EnvelopeError::UnsupportedFieldType(other.to_string())),
        }
    }
}

/// A typed record field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Structured(serde_json::Value),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Structured(_) => FieldKind::Structured,
        }
    }
}

/// Canonical byte form: UTF-8 text, decimal strings for numerics,
/// `true`/`false` for booleans, compact JSON for structured values.
pub fn encode_value(value: &FieldValue) -> Result<Vec<u8>, EnvelopeError> {
    Ok(match value {
        FieldValue::Text(s) => s.as_bytes().to_vec(),
        FieldValue::Integer(n) => n.to_string().into_bytes(),
        FieldValue::Float(x) => x.to_string().into_bytes(),
        FieldValue::Boolean(b) => (if *b { "true" } else { "false" }).into(),
        FieldValue::Structured(v) => {
            serde_json::to_vec(v).map_err(|e| EnvelopeError::FieldDecode(e.to_string()))?
        }
    })
}

/// Parse canonical bytes back into the declared type.
pub fn decode_value(bytes: &[u8], kind: FieldKind) -> Result<FieldValue, EnvelopeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| EnvelopeError::FieldDecode(format!("invalid utf-8: {e}")))?;
    match kind {
        FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
        FieldKind::Integer => text
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|e| EnvelopeError::FieldDecode(format!("integer: {e}"))),
        FieldKind::Float => text
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|e| EnvelopeError::FieldDecode(format!("float: {e}"))),
        FieldKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Ok(FieldValue::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(FieldValue::Boolean(false))
            } else {
                Err(EnvelopeError::FieldDecode(format!("boolean: {text:?}")))
            }
        }
        FieldKind::Structured => serde_json::from_str(text)
            .map(FieldValue::Structured)
            .map_err(|e| EnvelopeError::FieldDecode(format!("structured: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Single-field convenience on the orchestrator
// ---------------------------------------------------------------------------

impl HybridEnvelope {
    /// Encode then encrypt a single typed field value.
    pub fn encrypt_field(&self, value: &FieldValue) -> Result<EnvelopeBundle, EnvelopeError> {
        let encoded = encode_value(value)?;
        self.encrypt(&encoded)
    }

    /// Decrypt a bundle and parse the payload as the declared type.
    pub fn decrypt_field(
        &self,
        bundle: &EnvelopeBundle,
        kind: FieldKind,
    ) -> Result<FieldValue, EnvelopeError> {
        let plaintext = self.decrypt(bundle)?;
        decode_value(&plaintext, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_roundtrips() {
        let cases = [
            FieldValue::Text("hello".into()),
            FieldValue::Integer(42),
            FieldValue::Integer(i64::MIN),
            FieldValue::Float(3.14),
            FieldValue::Boolean(true),
            FieldValue::Boolean(false),
        ];
        for value in cases {
            let bytes = encode_value(&value).unwrap();
            assert_eq!(decode_value(&bytes, value.kind()).unwrap(), value);
        }
    }

    #[test]
    fn structured_roundtrip() {
        let value = FieldValue::Structured(json!({"name": "홍길동", "sessions": [1, 2, 3]}));
        let bytes = encode_value(&value).unwrap();
        assert_eq!(decode_value(&bytes, FieldKind::Structured).unwrap(), value);
    }

    #[test]
    fn kind_names_parse() {
        assert_eq!("text".parse::<FieldKind>().unwrap(), FieldKind::Text);
        assert_eq!("int".parse::<FieldKind>().unwrap(), FieldKind::Integer);
        assert_eq!("json".parse::<FieldKind>().unwrap(), FieldKind::Structured);
        assert!(matches!(
            "uuid".parse::<FieldKind>(),
            Err(EnvelopeError::UnsupportedFieldType(_))
        ));
    }

    #[test]
    fn boolean_decode_is_case_insensitive() {
        assert_eq!(
            decode_value(b"True", FieldKind::Boolean).unwrap(),
            FieldValue::Boolean(true)
        );
        assert!(decode_value(b"yes", FieldKind::Boolean).is_err());
    }

    #[test]
    fn mismatched_kind_fails() {
        let bytes = encode_value(&FieldValue::Text("not a number".into())).unwrap();
        assert!(matches!(
            decode_value(&bytes, FieldKind::Integer),
            Err(EnvelopeError::FieldDecode(_))
        ));
    }
}
