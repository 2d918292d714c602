//! Field codec properties: canonical encoding round-trips exactly,
//! with no key material involved.

use bastion_envelope::{decode_value, encode_value, FieldKind, FieldValue};
use proptest::prelude::*;

#[test]
fn representative_values_roundtrip() {
    let cases = [
        FieldValue::Integer(42),
        FieldValue::Float(3.14),
        FieldValue::Boolean(true),
        FieldValue::Text("hello".into()),
    ];
    for value in cases {
        let bytes = encode_value(&value).unwrap();
        assert_eq!(decode_value(&bytes, value.kind()).unwrap(), value);
    }
}

#[test]
fn numeric_encoding_is_decimal_text() {
    assert_eq!(encode_value(&FieldValue::Integer(42)).unwrap(), b"42");
    assert_eq!(encode_value(&FieldValue::Integer(-7)).unwrap(), b"-7");
    assert_eq!(encode_value(&FieldValue::Boolean(false)).unwrap(), b"false");
}

proptest! {
    #[test]
    fn integer_roundtrip_is_exact(n in any::<i64>()) {
        let bytes = encode_value(&FieldValue::Integer(n)).unwrap();
        prop_assert_eq!(
            decode_value(&bytes, FieldKind::Integer).unwrap(),
            FieldValue::Integer(n)
        );
    }

    #[test]
    fn finite_float_roundtrip_is_exact(x in any::<f64>()) {
        prop_assume!(x.is_finite());
        let bytes = encode_value(&FieldValue::Float(x)).unwrap();
        let decoded = decode_value(&bytes, FieldKind::Float).unwrap();
        prop_assert_eq!(decoded, FieldValue::Float(x));
    }

    #[test]
    fn text_roundtrip(s in ".*") {
        let bytes = encode_value(&FieldValue::Text(s.clone())).unwrap();
        prop_assert_eq!(
            decode_value(&bytes, FieldKind::Text).unwrap(),
            FieldValue::Text(s)
        );
    }
}
