//! Minimal ASN.1 DER tag-length-value model.
//!
//! Each node is a tagged variant: tag class, tag number, and either
//! primitive content bytes or constructed child nodes. Covers exactly
//! what ECDSA signature values need — single-byte identifiers and
//! definite lengths (short and long form) — and rejects everything
//! else up front rather than guessing.

use crate::ConvertError;

/// ASN.1 INTEGER tag number.
pub const TAG_INTEGER: u8 = 0x02;

/// ASN.1 SEQUENCE tag number.
pub const TAG_SEQUENCE: u8 = 0x10;

/// Constructed-encoding bit of the identifier octet.
const CONSTRUCTED_BIT: u8 = 0x20;

/// Maximum nesting depth accepted by the parser.
const MAX_DEPTH: usize = 16;

/// ASN.1 tag class, from the top two bits of the identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Universal class (0b00) — SEQUENCE, INTEGER, etc.
    Universal,
    /// Application class (0b01).
    Application,
    /// Context-specific class (0b10).
    ContextSpecific,
    /// Private class (0b11).
    Private,
}

impl TagClass {
    fn from_identifier(id: u8) -> Self {
        match id >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xc0,
        }
    }
}

/// Content of an ASN.1 node.
///
/// The constructed flag of the identifier octet is carried by the
/// variant itself: primitive nodes hold raw content bytes, constructed
/// nodes hold parsed children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asn1Value {
    /// Raw content bytes of a primitive encoding.
    Primitive(Vec<u8>),
    /// Child nodes of a constructed encoding.
    Constructed(Vec<Asn1Object>),
}

/// A parsed or built ASN.1 node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Object {
    /// The tag class.
    pub class: TagClass,
    /// The tag number (low five bits of the identifier octet).
    pub tag: u8,
    /// Primitive content or constructed children.
    pub value: Asn1Value,
}

impl Asn1Object {
    /// Build a primitive node with the given content bytes.
    pub fn primitive(class: TagClass, tag: u8, content: Vec<u8>) -> Self {
        Asn1Object { class, tag, value: Asn1Value::Primitive(content) }
    }

    /// Build a constructed node with the given children.
    pub fn constructed(class: TagClass, tag: u8, children: Vec<Asn1Object>) -> Self {
        Asn1Object { class, tag, value: Asn1Value::Constructed(children) }
    }

    /// Check whether this node uses the constructed encoding.
    pub fn is_constructed(&self) -> bool {
        matches!(self.value, Asn1Value::Constructed(_))
    }

    /// Serialize this node to DER.
    ///
    /// Emits the identifier octet, a definite length (short form below
    /// 128, minimal long form otherwise), and the content bytes, with
    /// children serialized recursively in order.
    ///
    /// # Returns
    /// The DER encoding as a byte vector.
    pub fn to_der(&self) -> Vec<u8> {
        let content = match &self.value {
            Asn1Value::Primitive(bytes) => bytes.clone(),
            Asn1Value::Constructed(children) => {
                let mut buf = Vec::new();
                for child in children {
                    buf.extend_from_slice(&child.to_der());
                }
                buf
            }
        };

        let mut id = self.class.bits() | (self.tag & 0x1f);
        if self.is_constructed() {
            id |= CONSTRUCTED_BIT;
        }

        let mut out = Vec::with_capacity(content.len() + 4);
        out.push(id);
        push_length(&mut out, content.len());
        out.extend_from_slice(&content);
        out
    }

    /// Parse a single DER value spanning the whole input.
    ///
    /// Rejects indefinite lengths, high-tag-number identifiers, length
    /// fields wider than `usize`, declared lengths exceeding the
    /// remaining input (checked before any allocation), nesting deeper
    /// than 16 levels, and trailing bytes after the outer value.
    ///
    /// # Arguments
    /// * `data` - The DER-encoded bytes.
    ///
    /// # Returns
    /// `Ok(Asn1Object)` on success, or a `Der` error describing the damage.
    pub fn from_der(data: &[u8]) -> Result<Asn1Object, ConvertError> {
        let mut cursor = Cursor::new(data);
        let obj = parse_object(&mut cursor, 0)?;
        if cursor.remaining() != 0 {
            return Err(ConvertError::Der(format!(
                "{} trailing bytes after outer value",
                cursor.remaining()
            )));
        }
        Ok(obj)
    }
}

/// Append a DER definite length to `out`.
fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let be = len.to_be_bytes();
        let skip = be.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (be.len() - skip) as u8);
        out.extend_from_slice(&be[skip..]);
    }
}

/// A bounds-checked cursor over the DER input.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, ConvertError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ConvertError> {
        if n > self.data.len() - self.pos {
            return Err(ConvertError::Der("unexpected end of data".to_string()));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

fn parse_object(cursor: &mut Cursor<'_>, depth: usize) -> Result<Asn1Object, ConvertError> {
    if depth >= MAX_DEPTH {
        return Err(ConvertError::Der("nesting too deep".to_string()));
    }

    let id = cursor.read_u8()?;
    let tag = id & 0x1f;
    if tag == 0x1f {
        return Err(ConvertError::Der(
            "high-tag-number identifiers not supported".to_string(),
        ));
    }
    let class = TagClass::from_identifier(id);
    let constructed = id & CONSTRUCTED_BIT != 0;

    let len = read_length(cursor)?;
    // read_bytes re-checks the declared length against the remaining
    // input, so an oversized length field fails here without allocating.
    let content = cursor.read_bytes(len)?;

    let value = if constructed {
        let mut children = Vec::new();
        let mut inner = Cursor::new(content);
        while inner.remaining() > 0 {
            children.push(parse_object(&mut inner, depth + 1)?);
        }
        Asn1Value::Constructed(children)
    } else {
        Asn1Value::Primitive(content.to_vec())
    };

    Ok(Asn1Object { class, tag, value })
}

fn read_length(cursor: &mut Cursor<'_>) -> Result<usize, ConvertError> {
    let first = cursor.read_u8()?;
    if first < 0x80 {
        return Ok(first as usize);
    }
    if first == 0x80 {
        return Err(ConvertError::Der(
            "indefinite length is not valid DER".to_string(),
        ));
    }

    let count = (first & 0x7f) as usize;
    if count > std::mem::size_of::<usize>() {
        return Err(ConvertError::Der(format!(
            "length field of {} bytes is too large",
            count
        )));
    }
    let mut len: usize = 0;
    for &b in cursor.read_bytes(count)? {
        len = (len << 8) | b as usize;
    }
    Ok(len)
}
