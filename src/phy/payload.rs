//! Hex payload decoding with truncation recovery.

/// Outcome of decoding a row's hex payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexPayload {
    /// All declared bytes were present and valid.
    Complete(Vec<u8>),
    /// The row was cut short or malformed; holds the bytes that decoded cleanly.
    Truncated(Vec<u8>),
}

impl HexPayload {
    /// Decoded bytes, whether complete or not.
    pub fn bytes(&self) -> &[u8] {
        match self {
            HexPayload::Complete(b) | HexPayload::Truncated(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            HexPayload::Complete(b) | HexPayload::Truncated(b) => b,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, HexPayload::Truncated(_))
    }
}

/// Decode up to `declared` bytes of hex from `text`.
///
/// Digits past `declared` bytes are ignored. When the text is shorter than
/// declared, has an odd digit count, or contains a non-hex character, the
/// leading run of complete byte pairs is returned as [`HexPayload::Truncated`].
pub fn decode_payload(text: &str, declared: usize) -> HexPayload {
    let text = text.as_bytes();
    let wanted = text.len().min(declared.saturating_mul(2));

    if let Ok(bytes) = hex::decode(&text[..wanted]) {
        if bytes.len() == declared {
            return HexPayload::Complete(bytes);
        }
    }

    let valid = text[..wanted]
        .iter()
        .take_while(|c| c.is_ascii_hexdigit())
        .count();
    let bytes = hex::decode(&text[..valid - valid % 2]).unwrap_or_default();
    HexPayload::Truncated(bytes)
}
