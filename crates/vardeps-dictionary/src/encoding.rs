//! Byte-to-text decoding for delimited dictionaries

use crate::error::LoadError;
use vardeps_core::TextEncoding;

/// Windows-1252 mapping for 0x80..=0x9F; `None` marks undefined bytes
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Decode raw bytes with the given encoding
///
/// Latin-1 and ISO-8859-1 accept every byte. UTF-8 and cp1252 fail on the
/// first invalid byte. A leading UTF-8 byte order mark is dropped.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, LoadError> {
    match encoding {
        TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        TextEncoding::Utf8 => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                let offset = e.valid_up_to();
                LoadError::DecodeError {
                    encoding,
                    byte: bytes.get(offset).copied().unwrap_or_default(),
                    offset,
                }
            })?;
            Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
        }
        TextEncoding::Windows1252 => bytes
            .iter()
            .enumerate()
            .map(|(offset, &b)| match b {
                0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)].ok_or(LoadError::DecodeError {
                    encoding,
                    byte: b,
                    offset,
                }),
                _ => Ok(char::from(b)),
            })
            .collect(),
    }
}
