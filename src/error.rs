/// Unified error type for signature format conversion.
///
/// Covers structural validation of the DER signature shape, malformed
/// hex at the API boundary, and damage in the raw DER byte stream.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The DER input parsed, but is not `SEQUENCE { INTEGER, INTEGER }`.
    #[error("ASN.1 object is not an asn1Signature")]
    Structure,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("malformed DER: {0}")]
    Der(String),
}

impl From<hex::FromHexError> for ConvertError {
    fn from(e: hex::FromHexError) -> Self {
        ConvertError::InvalidHex(e.to_string())
    }
}
