//! Byte-to-text decoding for the configured encoding fallback chain.

use riskscore_core::config::TextEncoding;
use riskscore_core::RiskError;

const UTF8_BOM: &str = "\u{feff}";

/// Decode raw file bytes with a single encoding.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, RiskError> {
    match encoding {
        TextEncoding::Utf8 => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| RiskError::Decode(format!("invalid UTF-8: {e}")))?;
            Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
        }
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}
