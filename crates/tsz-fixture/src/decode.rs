//! Decoding of test sources and baselines read from disk.
//!
//! The TypeScript corpus mixes UTF-8, UTF-8 with BOM and UTF-16 (with BOM)
//! files. Baselines are always written back as plain UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::error::FixtureError;

/// Decode `bytes` using the encoding named by a leading byte order mark,
/// or UTF-8 when there is none. Malformed input is an error, not replaced.
pub fn decode_source_text(bytes: &[u8]) -> Result<String, FixtureError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| text.into_owned())
        .ok_or(FixtureError::Decode(encoding.name()))
}

#[cfg(test)]
mod tests {
    use super::decode_source_text;
    use crate::error::FixtureError;

    #[test]
    fn bom_is_dropped_from_utf8_baseline() {
        let bytes = b"\xEF\xBB\xBF//// [a.ts]\nlet a;";
        assert_eq!(decode_source_text(bytes).unwrap(), "//// [a.ts]\nlet a;");
    }

    #[test]
    fn utf16_sources_follow_their_bom() {
        let le: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("C{}".encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        let be: Vec<u8> = [0xFE, 0xFF]
            .into_iter()
            .chain("C{}".encode_utf16().flat_map(u16::to_be_bytes))
            .collect();
        assert_eq!(decode_source_text(&le).unwrap(), "C{}");
        assert_eq!(decode_source_text(&be).unwrap(), "C{}");
    }

    #[test]
    fn truncated_utf16_names_the_encoding() {
        assert_eq!(
            decode_source_text(&[0xFF, 0xFE, b'a']),
            Err(FixtureError::Decode("UTF-16LE"))
        );
    }

    #[test]
    fn invalid_utf8_is_rejected_without_replacement() {
        assert_eq!(
            decode_source_text(&[b'x', 0xC3, 0x28]),
            Err(FixtureError::Decode("UTF-8"))
        );
    }
}
