/*!
 * Text encoding for display rows.
 *
 * Line displays use single-byte code pages. A [`CodePage`] converts UTF-8
 * row text into the code page the controller was configured for.
 */
use std::borrow::Cow;
use std::fmt;

use encoding_rs::Encoding;
use thiserror::Error;

/// A character has no representation in the target code page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("character {character:?} cannot be encoded as {encoding}")]
pub struct EncodingError {
    /// The code page name
    pub encoding: &'static str,
    /// The first character that could not be encoded
    pub character: char,
}

/// A target code page for row text
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CodePage {
    encoding: &'static Encoding,
}

impl CodePage {
    /// Wraps an `encoding_rs` encoding.
    ///
    /// Returns `None` unless the encoding maps every character to exactly
    /// one byte. UTF-8, UTF-16 and the multi-byte CJK encodings are
    /// rejected.
    pub fn new(encoding: &'static Encoding) -> Option<Self> {
        encoding.is_single_byte().then_some(Self { encoding })
    }

    /// DOS Cyrillic (IBM866)
    pub fn cp866() -> Self {
        Self {
            encoding: encoding_rs::IBM866,
        }
    }

    /// Windows Cyrillic
    pub fn windows_1251() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1251,
        }
    }

    /// Looks up a single-byte code page by WHATWG label, e.g. `cp866` or
    /// `windows-1251`
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).and_then(Self::new)
    }

    /// The canonical name of the code page
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Converts `text`, failing on the first unrepresentable character
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, EncodingError> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if !had_errors {
            return Ok(bytes);
        }
        let mut buf = [0u8; 4];
        let character = text
            .chars()
            .find(|c| self.encoding.encode(c.encode_utf8(&mut buf)).2)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Err(EncodingError {
            encoding: self.name(),
            character,
        })
    }
}

impl fmt::Debug for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodePage").field(&self.name()).finish()
    }
}

/// Encodes `text` with `code_page`, passing UTF-8 through when there is none
pub fn encode_text<'a>(
    code_page: Option<&CodePage>,
    text: &'a str,
) -> Result<Cow<'a, [u8]>, EncodingError> {
    match code_page {
        Some(code_page) => code_page.encode(text),
        None => Ok(Cow::Borrowed(text.as_bytes())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_without_code_page() {
        let encoded = encode_text(None, "Россия").unwrap();
        assert_eq!(&*encoded, "Россия".as_bytes());
    }

    #[test]
    fn test_windows_1251() {
        let encoded = CodePage::windows_1251().encode("Россия").unwrap();
        assert_eq!(&*encoded, &[0xD0, 0xEE, 0xF1, 0xF1, 0xE8, 0xFF]);
    }

    #[test]
    fn test_cp866_label() {
        let code_page = CodePage::for_label("cp866").unwrap();
        assert_eq!(code_page, CodePage::cp866());
        assert_eq!(&*code_page.encode("Итог").unwrap(), &[0x88, 0xE2, 0xAE, 0xA3]);
    }

    #[test]
    fn test_unknown_label() {
        assert!(CodePage::for_label("klingon").is_none());
    }

    #[test]
    fn test_multi_byte_encodings_rejected() {
        for label in ["utf-8", "utf-16le", "utf-16be", "replacement", "shift_jis", "gbk"] {
            assert!(CodePage::for_label(label).is_none(), "{} should be rejected", label);
        }
        assert!(CodePage::new(encoding_rs::UTF_16LE).is_none());
        assert!(CodePage::new(encoding_rs::SHIFT_JIS).is_none());
        assert_eq!(CodePage::new(encoding_rs::IBM866), Some(CodePage::cp866()));
    }

    #[test]
    fn test_unmappable_character() {
        let err = CodePage::windows_1251().encode("Total: 5€ ✓").unwrap_err();
        assert_eq!(err.character, '✓');
        assert_eq!(err.encoding, "windows-1251");
    }
}
