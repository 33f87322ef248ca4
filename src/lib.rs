//! ECDSA signature format conversion.
//!
//! Converts signature values between the fixed-width IEEE P1363
//! encoding (raw R‖S, each padded to the curve's byte width) and the
//! ASN.1 DER `SEQUENCE { INTEGER r, INTEGER s }` encoding used by
//! X.509/CMS and most cryptographic APIs. Pure, stateless, no I/O;
//! key handling, hashing, and signing/verification live elsewhere.
//!
//! ```
//! use ecdsa_sigconv::{asn1_der_to_p1363, p1363_to_asn1_der};
//!
//! let der = p1363_to_asn1_der("85af", "0001").unwrap();
//! assert_eq!(der, "300802030085af020101");
//!
//! let sig = asn1_der_to_p1363(&der, 2).unwrap();
//! assert_eq!(sig.r, "85af");
//! assert_eq!(sig.s, "0001");
//! ```

pub mod asn1;
pub mod signature;

mod error;
pub use error::ConvertError;
pub use signature::{
    asn1_der_to_p1363, p1363_to_asn1_der, to_min_signed_be, to_p1363_size, P1363Signature,
};
