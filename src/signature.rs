//! Conversion between IEEE P1363 and ASN.1 DER signature encodings.
//!
//! P1363 is the fixed-width raw form (R‖S, each zero-padded to the
//! curve's byte width); DER is the variable-length
//! `SEQUENCE { INTEGER r, INTEGER s }` form used by X.509/CMS and most
//! cryptographic APIs. All functions are pure and stateless; inputs and
//! outputs are hex strings, with raw bytes used internally.

use crate::asn1::{Asn1Object, Asn1Value, TagClass, TAG_INTEGER, TAG_SEQUENCE};
use crate::ConvertError;

/// A fixed-width P1363 signature.
///
/// `r` and `s` are unsigned big-endian hex strings of identical length,
/// each exactly the `size_in_bytes` requested at decode time (so
/// `2 * size_in_bytes` hex digits), regardless of how many bytes the
/// underlying integers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct P1363Signature {
    /// The R component, fixed-width unsigned big-endian hex.
    pub r: String,
    /// The S component, fixed-width unsigned big-endian hex.
    pub s: String,
}

impl P1363Signature {
    /// Return the component width in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.r.len() / 2
    }
}

/// Encode a P1363 signature as an ASN.1 DER `SEQUENCE { INTEGER, INTEGER }`.
///
/// Each component is reduced to the minimal signed big-endian form DER
/// requires (see [`to_min_signed_be`]) before being wrapped in an
/// INTEGER. The output is minimal DER: definite lengths only, no
/// redundant leading zero bytes beyond the single sign guard.
///
/// Odd-length component hex is tolerated (a leading `'0'` digit is
/// assumed); non-hex characters fail with `InvalidHex`.
///
/// # Arguments
/// * `r_hex` - The R component as unsigned big-endian hex.
/// * `s_hex` - The S component as unsigned big-endian hex.
///
/// # Returns
/// The DER encoding as a lowercase hex string.
pub fn p1363_to_asn1_der(r_hex: &str, s_hex: &str) -> Result<String, ConvertError> {
    let r = min_signed_be(&decode_hex_lenient(r_hex)?);
    let s = min_signed_be(&decode_hex_lenient(s_hex)?);

    let signature = Asn1Object::constructed(
        TagClass::Universal,
        TAG_SEQUENCE,
        vec![
            Asn1Object::primitive(TagClass::Universal, TAG_INTEGER, r),
            Asn1Object::primitive(TagClass::Universal, TAG_INTEGER, s),
        ],
    );
    Ok(hex::encode(signature.to_der()))
}

/// Decode an ASN.1 DER signature into fixed-width P1363 components.
///
/// The input must be exactly `SEQUENCE { INTEGER r, INTEGER s }`; any
/// other shape fails with [`ConvertError::Structure`]. Each captured
/// integer is re-widthed to `size_in_bytes` (see [`to_p1363_size`]) —
/// the DER sign-guard byte is absorbed by the left-truncation, and a
/// value wider than `size_in_bytes` silently loses its high-order
/// bytes, so callers must pass the width matching the curve's order.
///
/// # Arguments
/// * `der_hex` - The DER-encoded signature as hex.
/// * `size_in_bytes` - The fixed component width, e.g. 32 for a 256-bit curve.
///
/// # Returns
/// `Ok(P1363Signature)` on success, or an error if the hex, the DER
/// framing, or the signature shape is invalid.
pub fn asn1_der_to_p1363(
    der_hex: &str,
    size_in_bytes: usize,
) -> Result<P1363Signature, ConvertError> {
    let der = hex::decode(der_hex)?;
    let object = Asn1Object::from_der(&der)?;
    let (r, s) = match_signature(&object)?;

    Ok(P1363Signature {
        r: hex::encode(resize(r, size_in_bytes)),
        s: hex::encode(resize(s, size_in_bytes)),
    })
}

/// Reduce unsigned big-endian hex to the minimal signed form DER
/// INTEGER content requires.
///
/// An odd digit count gets a leading `'0'`; redundant leading zero
/// bytes are stripped (always leaving at least one byte); a single
/// `00` byte is prepended when the top bit is set, so the value cannot
/// be misread as negative under two's-complement. Assumes the input is
/// non-negative, as ECDSA components always are. Idempotent.
///
/// See <https://crypto.stackexchange.com/a/57734>.
///
/// # Arguments
/// * `hex_str` - Unsigned big-endian hex, odd digit count allowed.
///
/// # Returns
/// The minimal signed big-endian hex representation.
pub fn to_min_signed_be(hex_str: &str) -> Result<String, ConvertError> {
    let bytes = decode_hex_lenient(hex_str)?;
    Ok(hex::encode(min_signed_be(&bytes)))
}

/// Truncate or zero-pad unsigned big-endian hex to an exact byte width.
///
/// The result is always `2 * size_in_bytes` digits: excess leading
/// digits are dropped (high-order bytes that do not fit are silently
/// discarded), shorter input is left-padded with `'0'`. Sign-agnostic.
///
/// # Arguments
/// * `hex_str` - Unsigned big-endian hex.
/// * `size_in_bytes` - The target width in bytes.
///
/// # Returns
/// The fixed-width hex string.
pub fn to_p1363_size(hex_str: &str, size_in_bytes: usize) -> Result<String, ConvertError> {
    let bytes = decode_hex_lenient(hex_str)?;
    Ok(hex::encode(resize(&bytes, size_in_bytes)))
}

/// Decode hex, assuming a leading '0' digit when the length is odd.
fn decode_hex_lenient(hex_str: &str) -> Result<Vec<u8>, ConvertError> {
    if hex_str.len() % 2 != 0 {
        let mut padded = String::with_capacity(hex_str.len() + 1);
        padded.push('0');
        padded.push_str(hex_str);
        Ok(hex::decode(padded)?)
    } else {
        Ok(hex::decode(hex_str)?)
    }
}

/// Byte-level core of [`to_min_signed_be`].
fn min_signed_be(bytes: &[u8]) -> Vec<u8> {
    let mut start = 0;
    while start + 1 < bytes.len() && bytes[start] == 0 {
        start += 1;
    }
    let trimmed = &bytes[start..];

    if trimmed.is_empty() {
        return vec![0x00];
    }

    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

/// Byte-level core of [`to_p1363_size`].
fn resize(bytes: &[u8], size_in_bytes: usize) -> Vec<u8> {
    if bytes.len() > size_in_bytes {
        bytes[bytes.len() - size_in_bytes..].to_vec()
    } else {
        let mut out = vec![0u8; size_in_bytes];
        out[size_in_bytes - bytes.len()..].copy_from_slice(bytes);
        out
    }
}

/// Match the expected `SEQUENCE { INTEGER, INTEGER }` shape and capture
/// the two content fields, R first.
fn match_signature(object: &Asn1Object) -> Result<(&[u8], &[u8]), ConvertError> {
    let children = match object {
        Asn1Object {
            class: TagClass::Universal,
            tag: TAG_SEQUENCE,
            value: Asn1Value::Constructed(children),
        } if children.len() == 2 => children,
        _ => return Err(ConvertError::Structure),
    };

    match (&children[0], &children[1]) {
        (
            Asn1Object {
                class: TagClass::Universal,
                tag: TAG_INTEGER,
                value: Asn1Value::Primitive(r),
            },
            Asn1Object {
                class: TagClass::Universal,
                tag: TAG_INTEGER,
                value: Asn1Value::Primitive(s),
            },
        ) => Ok((r, s)),
        _ => Err(ConvertError::Structure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- minimal signed big-endian normalization --

    #[test]
    fn test_min_signed_be_strips_leading_zeros() {
        assert_eq!(
            to_min_signed_be("0000000085af").unwrap(),
            to_min_signed_be("85af").unwrap()
        );
        assert_eq!(to_min_signed_be("000001").unwrap(), "01");
    }

    #[test]
    fn test_min_signed_be_sign_guard() {
        // Top bit set: a 00 guard byte keeps the value non-negative.
        assert_eq!(to_min_signed_be("85af").unwrap(), "0085af");
        assert_eq!(to_min_signed_be("80").unwrap(), "0080");
        // Top bit clear: no guard byte.
        assert_eq!(to_min_signed_be("7fff").unwrap(), "7fff");
    }

    #[test]
    fn test_min_signed_be_odd_digit_count() {
        // 0x3af reads as 0x03af.
        assert_eq!(to_min_signed_be("3af").unwrap(), "03af");
        assert_eq!(to_min_signed_be("f").unwrap(), "0f");
    }

    #[test]
    fn test_min_signed_be_zero() {
        // Zero collapses to a single 00 byte; stripping never empties.
        assert_eq!(to_min_signed_be("00").unwrap(), "00");
        assert_eq!(to_min_signed_be("00000000").unwrap(), "00");
        assert_eq!(to_min_signed_be("").unwrap(), "00");
    }

    #[test]
    fn test_min_signed_be_idempotent() {
        for input in ["85af", "0001", "00", "7f", "0000000085af"] {
            let once = to_min_signed_be(input).unwrap();
            assert_eq!(to_min_signed_be(&once).unwrap(), once, "input {}", input);
        }
    }

    // -- fixed-width resize --

    #[test]
    fn test_p1363_size_pads() {
        assert_eq!(to_p1363_size("85af", 4).unwrap(), "000085af");
    }

    #[test]
    fn test_p1363_size_truncates() {
        assert_eq!(to_p1363_size("11223344", 2).unwrap(), "3344");
    }

    #[test]
    fn test_p1363_size_exact() {
        assert_eq!(to_p1363_size("85af", 2).unwrap(), "85af");
    }

    // -- encode --

    #[test]
    fn test_encode_concrete_vector() {
        // R sign-guards to 0085af, S strips to 01.
        let der = p1363_to_asn1_der("85af", "0001").unwrap();
        assert_eq!(der, "300802030085af020101");
    }

    #[test]
    fn test_encode_rejects_non_hex() {
        assert!(matches!(
            p1363_to_asn1_der("85ag", "01"),
            Err(ConvertError::InvalidHex(_))
        ));
    }

    // -- decode --

    #[test]
    fn test_decode_concrete_vector() {
        let sig = asn1_der_to_p1363("300802030085af020101", 2).unwrap();
        assert_eq!(sig.r, "85af");
        assert_eq!(sig.s, "0001");
        assert_eq!(sig.size_in_bytes(), 2);
    }

    /// Decode a real signature from the Bitcoin blockchain at the
    /// secp256k1 width.
    #[test]
    fn test_decode_real_signature() {
        let der = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
                   0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09";
        let sig = asn1_der_to_p1363(der, 32).unwrap();
        assert_eq!(
            sig.r,
            "4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"
        );
        assert_eq!(
            sig.s,
            "181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"
        );
    }

    #[test]
    fn test_decode_drops_sign_guard() {
        // INTEGER content 0085af re-widths to 85af at 2 bytes.
        let sig = asn1_der_to_p1363("300802030085af020101", 2).unwrap();
        assert_eq!(sig.r, "85af");
    }

    /// A value wider than the requested width loses its high-order
    /// bytes silently; the caller's width must match the curve.
    #[test]
    fn test_decode_width_mismatch_truncates() {
        let der = p1363_to_asn1_der("0185af", "02").unwrap();
        let sig = asn1_der_to_p1363(&der, 2).unwrap();
        assert_eq!(sig.r, "85af");
        assert_eq!(sig.s, "0002");
    }

    #[test]
    fn test_decode_pads_to_requested_width() {
        let sig = asn1_der_to_p1363("300802030085af020101", 4).unwrap();
        assert_eq!(sig.r, "000085af");
        assert_eq!(sig.s, "00000001");
    }

    #[test]
    fn test_roundtrip() {
        let der = p1363_to_asn1_der("85af", "0001").unwrap();
        let sig = asn1_der_to_p1363(&der, 2).unwrap();
        assert_eq!(sig.r, "85af");
        assert_eq!(sig.s, "0001");
    }

    /// Components large enough to force a long-form SEQUENCE length
    /// must still round-trip.
    #[test]
    fn test_roundtrip_long_form_length() {
        let r_hex = "22".repeat(100);
        let s_hex = "33".repeat(100);
        let der = p1363_to_asn1_der(&r_hex, &s_hex).unwrap();
        assert!(der.starts_with("3081cc"));
        let sig = asn1_der_to_p1363(&der, 100).unwrap();
        assert_eq!(sig.r, r_hex);
        assert_eq!(sig.s, s_hex);
    }

    // -- structural validation --

    #[test]
    fn test_decode_rejects_non_sequence_outer() {
        // Same bytes as the concrete vector, outer tag swapped for
        // OCTET STRING.
        assert!(matches!(
            asn1_der_to_p1363("040802030085af020101", 2),
            Err(ConvertError::Structure)
        ));
    }

    #[test]
    fn test_decode_rejects_bare_integer() {
        assert!(matches!(
            asn1_der_to_p1363("020185", 2),
            Err(ConvertError::Structure)
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_child_count() {
        // SEQUENCE of three INTEGERs.
        assert!(matches!(
            asn1_der_to_p1363("3009020101020101020101", 2),
            Err(ConvertError::Structure)
        ));
        // SEQUENCE of one INTEGER.
        assert!(matches!(
            asn1_der_to_p1363("3003020101", 2),
            Err(ConvertError::Structure)
        ));
    }

    #[test]
    fn test_decode_rejects_non_integer_child() {
        // SEQUENCE { INTEGER, OCTET STRING }.
        assert!(matches!(
            asn1_der_to_p1363("3006020101040101", 2),
            Err(ConvertError::Structure)
        ));
    }

    #[test]
    fn test_decode_rejects_nested_sequence_child() {
        // SEQUENCE { SEQUENCE { INTEGER }, INTEGER }: wrong child kind.
        assert!(matches!(
            asn1_der_to_p1363("30083003020101020101", 2),
            Err(ConvertError::Structure)
        ));
    }

    #[test]
    fn test_decode_rejects_damaged_der() {
        // Truncated content is a DER framing error, not a shape error.
        assert!(matches!(
            asn1_der_to_p1363("3008020300", 2),
            Err(ConvertError::Der(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        assert!(matches!(
            asn1_der_to_p1363("30zz", 2),
            Err(ConvertError::InvalidHex(_))
        ));
        // Odd-length hex is not tolerated on the raw DER stream.
        assert!(matches!(
            asn1_der_to_p1363("300", 2),
            Err(ConvertError::InvalidHex(_))
        ));
    }
}
