//! Byte-order-mark detection and text decoding.

use serde::Serialize;

const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const BOM_CHAR: char = '\u{FEFF}';

/// Encoding inferred from a file's leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-16le-bom")]
    Utf16LeBom,
    #[serde(rename = "utf-8-bom")]
    Utf8Bom,
    #[serde(rename = "utf-8")]
    Utf8,
}

impl SourceEncoding {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&UTF16_LE_BOM) {
            SourceEncoding::Utf16LeBom
        } else if bytes.starts_with(&UTF8_BOM) {
            SourceEncoding::Utf8Bom
        } else {
            SourceEncoding::Utf8
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf16LeBom => "utf-16le-bom",
            SourceEncoding::Utf8Bom => "utf-8-bom",
            SourceEncoding::Utf8 => "utf-8",
        }
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode `bytes` to text according to their detected encoding.
///
/// UTF-16 input drops a trailing odd byte and replaces unpaired surrogates.
/// UTF-8 input must be valid.
pub fn decode(bytes: &[u8]) -> (SourceEncoding, Result<String, String>) {
    let encoding = SourceEncoding::detect(bytes);
    let text = match encoding {
        SourceEncoding::Utf16LeBom => Ok(decode_utf16le(&bytes[UTF16_LE_BOM.len()..])),
        SourceEncoding::Utf8Bom => std::str::from_utf8(&bytes[UTF8_BOM.len()..])
            .map(str::to_string)
            .map_err(|e| format!("invalid UTF-8 after BOM: {}", e)),
        SourceEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| format!("invalid UTF-8: {}", e)),
    };
    (encoding, text.map(|t| t.trim_start_matches(BOM_CHAR).to_string()))
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
