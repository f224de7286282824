//! Text encodings for thermal printers
//!
//! Printers interpret text bytes in their active character table. The builder
//! keeps strings as UTF-8 until they are appended, then converts them to the
//! table selected here.

use std::borrow::Cow;

/// Character set used for text written to the command buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 passthrough (printers with a Unicode font, or the driver transcodes)
    #[default]
    Utf8,
    /// GBK, used by most Chinese thermal printers
    Gbk,
    /// Windows-1252 (Western European, maps to ESC/POS table 16)
    Windows1252,
}

impl TextEncoding {
    /// Encode `s` in this character set.
    ///
    /// Characters missing from the target table are replaced by the encoder's
    /// fallback (`?` or a numeric entity, depending on the table).
    pub fn encode<'a>(&self, s: &'a str) -> Cow<'a, [u8]> {
        match self {
            TextEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
            TextEncoding::Gbk => encoding_rs::GBK.encode(s).0,
            TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252.encode(s).0,
        }
    }

    /// Printed width of `s` in character cells.
    ///
    /// For the legacy tables this is the encoded byte length (a GBK ideograph
    /// takes two cells); for UTF-8 each char takes one cell.
    pub fn width(&self, s: &str) -> usize {
        match self {
            TextEncoding::Utf8 => s.chars().count(),
            _ => self.encode(s).len(),
        }
    }

    /// ESC t n code table selector for this encoding, if it needs one
    pub fn code_table(&self) -> Option<u8> {
        match self {
            TextEncoding::Windows1252 => Some(16),
            _ => None,
        }
    }
}
