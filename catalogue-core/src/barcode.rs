//! EAN-13 symbol derivation from product identifiers.
//!
//! Pure digit arithmetic. Fetching a rendered barcode image is a renderer concern.

use serde::{Deserialize, Serialize};

const PAYLOAD_LEN: usize = 12;
const SYMBOL_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitSource {
    /// Check digit appended by the engine.
    Computed,
    /// Identifier already carried 13 or more digits; first 13 taken verbatim.
    Supplied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedBarcode {
    pub symbol: String,
    pub check_digit: u8,
    pub source: DigitSource,
}

impl EncodedBarcode {
    /// Human readable form printed under (or instead of) the bars: `9 780306 406157`.
    pub fn fallback_text(&self) -> String {
        format!("{} {} {}", &self.symbol[..1], &self.symbol[1..7], &self.symbol[7..])
    }
}

/// Encode an identifier. `None` means the identifier carries no digits at all,
/// which is a legitimate "no barcode" outcome rather than an error.
pub fn encode(raw_identifier: &str) -> Option<EncodedBarcode> {
    let digits: Vec<u8> = raw_identifier
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.is_empty() {
        tracing::debug!(identifier = raw_identifier, "identifier has no digits, no barcode");
        return None;
    }

    if digits.len() >= SYMBOL_LEN {
        let symbol = &digits[..SYMBOL_LEN];
        return Some(EncodedBarcode {
            symbol: to_string(symbol),
            check_digit: symbol[SYMBOL_LEN - 1],
            source: DigitSource::Supplied,
        });
    }

    let mut payload = vec![0u8; PAYLOAD_LEN.saturating_sub(digits.len())];
    payload.extend_from_slice(&digits);
    // 13 digits was handled above, so anything left is at most 12 long
    let check = check_digit(&payload);
    payload.push(check);

    Some(EncodedBarcode {
        symbol: to_string(&payload),
        check_digit: check,
        source: DigitSource::Computed,
    })
}

/// EAN-13 check digit for a 12-digit payload: weights 1,3,1,3... from the left.
pub fn check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .take(PAYLOAD_LEN)
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// True when `symbol` is 13 ASCII digits satisfying the EAN-13 checksum.
pub fn is_valid_ean13(symbol: &str) -> bool {
    if symbol.len() != SYMBOL_LEN || !symbol.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u8> = symbol.bytes().map(|b| b - b'0').collect();
    check_digit(&digits[..PAYLOAD_LEN]) == digits[PAYLOAD_LEN]
}

fn to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
