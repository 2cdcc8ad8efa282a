//! Payload encoding for client-side downloads.
//!
//! Payloads whose UTF-16 code units all fit in one byte are base64-encoded as Latin-1. Anything
//! wider is first split per code unit into one to three bytes (the UTF-8 bit layout applied to
//! UTF-16 code units, so astral characters travel as two three-byte surrogate halves).

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::DownloadError;

/// Prefix of every generated download link.
pub const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Bytes that get base64-encoded for `data`.
pub fn payload_bytes(data: &str) -> Vec<u8> {
    let units: Vec<u16> = data.encode_utf16().collect();
    if units.iter().all(|unit| *unit <= 0xFF) {
        return units.into_iter().map(|unit| unit as u8).collect();
    }

    let mut out = Vec::with_capacity(units.len() * 3);
    for unit in units {
        match unit {
            0..=0x7F => out.push(unit as u8),
            0x80..=0x7FF => {
                out.push(((unit >> 6) | 0xC0) as u8);
                out.push(((unit & 0x3F) | 0x80) as u8);
            }
            _ => {
                out.push(((unit >> 12) | 0xE0) as u8);
                out.push((((unit >> 6) & 0x3F) | 0x80) as u8);
                out.push(((unit & 0x3F) | 0x80) as u8);
            }
        }
    }
    out
}

/// Base64 payload for `data`.
pub fn encode_payload(data: &str) -> String {
    STANDARD.encode(payload_bytes(data))
}

/// Download link for `data`.
pub fn data_uri(data: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", encode_payload(data))
}

/// Decodes a base64 payload back into the original text.
///
/// A payload is read through the split transform only when re-encoding that reading reproduces
/// the same bytes; everything else decodes as Latin-1.
///
/// # Errors
///
/// Fails only on invalid base64.
pub fn decode_payload(encoded: &str) -> Result<String, DownloadError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| DownloadError::InvalidBase64(err.to_string()))?;
    match decode_split(&bytes) {
        Some(text) if payload_bytes(&text) == bytes => Ok(text),
        _ => Ok(bytes.iter().copied().map(char::from).collect()),
    }
}

fn decode_split(bytes: &[u8]) -> Option<String> {
    let continuation = |at: usize| -> Option<u16> {
        bytes
            .get(at)
            .filter(|byte| *byte & 0xC0 == 0x80)
            .map(|byte| u16::from(byte & 0x3F))
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut idx = 0usize;
    while let Some(&lead) = bytes.get(idx) {
        if lead < 0x80 {
            units.push(u16::from(lead));
            idx += 1;
        } else if lead & 0xE0 == 0xC0 {
            units.push((u16::from(lead & 0x1F) << 6) | continuation(idx + 1)?);
            idx += 2;
        } else if lead & 0xF0 == 0xE0 {
            units.push(
                (u16::from(lead & 0x0F) << 12)
                    | (continuation(idx + 1)? << 6)
                    | continuation(idx + 2)?,
            );
            idx += 3;
        } else {
            return None;
        }
    }
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ascii_and_latin1_use_single_bytes() {
        assert_eq!(payload_bytes("abc"), b"abc".to_vec());
        assert_eq!(payload_bytes("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_payload("hello"), "aGVsbG8=");
        assert_eq!(
            data_uri("hello"),
            "data:application/octet-stream;base64,aGVsbG8="
        );
    }

    #[test]
    fn wide_characters_split_per_code_unit() {
        // 'é' forces no split on its own, but '€' (U+20AC) pushes the whole payload through it.
        assert_eq!(
            payload_bytes("é€"),
            vec![0xC3, 0xA9, 0xE2, 0x82, 0xAC]
        );
        // Astral characters are split as two surrogate halves.
        assert_eq!(
            payload_bytes("😀"),
            vec![0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
        );
    }

    #[test]
    fn multibyte_payloads_decode_back_to_the_original() {
        for text in ["€100", "naïve → 東京", "emoji 😀 mixed with ascii", "Ω\n\tλ"] {
            let decoded = decode_payload(&encode_payload(text)).expect("decode");
            assert_eq!(decoded, text);
        }
    }

    #[test]
    fn single_byte_payloads_decode_as_latin1() {
        for text in ["café", "é", "Ã©", "ÿ\u{80}"] {
            let decoded = decode_payload(&encode_payload(text)).expect("decode");
            assert_eq!(decoded, text);
        }
        // Bytes that are not a valid split sequence fall back to Latin-1.
        assert_eq!(decode_payload(&STANDARD.encode([0x80u8])).expect("decode"), "\u{80}");
        assert_eq!(decode_payload(&STANDARD.encode([b'a', 0xC3])).expect("decode"), "aÃ");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_payload("***"),
            Err(DownloadError::InvalidBase64(_))
        ));
    }
}
