use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

pub const DEFAULT_ENCODING: &str = "utf-8";

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unknown encoding '{0}'")]
    Unknown(String),

    #[error("content is not valid {0}")]
    Undecodable(&'static str),

    #[error("content has characters that cannot be written as {0}")]
    Unencodable(&'static str),

    #[error("writing {0} is not supported")]
    WriteUnsupported(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    /// Strict 7-bit ASCII.
    Ascii,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    /// UTF-8 with a BOM stripped on read and written on write.
    Utf8Sig,
    Whatwg(&'static Encoding),
}

/// A text encoding applied uniformly to every read and write of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    codec: Codec,
}

impl TextEncoding {
    /// Resolves Python codec names (`latin-1`, `utf_8_sig`, `ascii`) first,
    /// then any WHATWG label (`utf-8`, `cp1252`, `shift_jis`, `utf-16le`).
    pub fn for_label(label: &str) -> Result<Self, EncodingError> {
        let normalized = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let codec = match normalized.as_str() {
            "ascii" | "us-ascii" | "646" => Codec::Ascii,
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "8859" | "cp819" | "l1" => {
                Codec::Latin1
            }
            "utf-8-sig" | "utf8-sig" => Codec::Utf8Sig,
            "u8" | "utf" | "utf8" => Codec::Whatwg(UTF_8),
            _ => Encoding::for_label(normalized.as_bytes())
                .or_else(|| Encoding::for_label(label.trim().as_bytes()))
                .map(Codec::Whatwg)
                .ok_or_else(|| EncodingError::Unknown(label.to_string()))?,
        };
        Ok(TextEncoding { codec })
    }

    pub fn name(&self) -> &'static str {
        match self.codec {
            Codec::Ascii => "ascii",
            Codec::Latin1 => "latin-1",
            Codec::Utf8Sig => "utf-8-sig",
            Codec::Whatwg(encoding) => encoding.name(),
        }
    }

    /// Decodes without replacing malformed sequences. Only `utf-8-sig`
    /// strips a byte order mark; the text is otherwise handed on as stored.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, EncodingError> {
        let undecodable = EncodingError::Undecodable(self.name());
        match self.codec {
            Codec::Ascii if bytes.is_ascii() => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|_| undecodable),
            Codec::Ascii => Err(undecodable),
            Codec::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
            Codec::Utf8Sig => std::str::from_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
                .map(Cow::Borrowed)
                .map_err(|_| undecodable),
            Codec::Whatwg(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(undecodable),
        }
    }

    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, EncodingError> {
        match self.codec {
            Codec::Ascii if text.is_ascii() => Ok(Cow::Borrowed(text.as_bytes())),
            Codec::Ascii => Err(EncodingError::Unencodable(self.name())),
            Codec::Latin1 if text.chars().all(|c| u32::from(c) <= 0xff) => {
                Ok(encoding_rs::mem::encode_latin1_lossy(text))
            }
            Codec::Latin1 => Err(EncodingError::Unencodable(self.name())),
            Codec::Utf8Sig => {
                let mut bytes = UTF8_BOM.to_vec();
                bytes.extend_from_slice(text.as_bytes());
                Ok(Cow::Owned(bytes))
            }
            Codec::Whatwg(encoding) if encoding == UTF_16LE => Ok(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            )),
            Codec::Whatwg(encoding) if encoding == UTF_16BE => Ok(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            )),
            Codec::Whatwg(encoding) => {
                let (bytes, used, had_errors) = encoding.encode(text);
                if used != encoding {
                    return Err(EncodingError::WriteUnsupported(self.name()));
                }
                if had_errors {
                    return Err(EncodingError::Unencodable(self.name()));
                }
                Ok(bytes)
            }
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding {
            codec: Codec::Whatwg(UTF_8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(TextEncoding::for_label("UTF-8").unwrap().name(), "UTF-8");
        assert_eq!(
            TextEncoding::for_label(DEFAULT_ENCODING).unwrap(),
            TextEncoding::default()
        );
    }

    #[rstest]
    #[case("latin-1", "latin-1")]
    #[case("Latin_1", "latin-1")]
    #[case("iso8859-1", "latin-1")]
    #[case("utf-8-sig", "utf-8-sig")]
    #[case("UTF_8_SIG", "utf-8-sig")]
    #[case("ascii", "ascii")]
    #[case("us-ascii", "ascii")]
    #[case("utf8", "UTF-8")]
    #[case("cp1252", "windows-1252")]
    #[case("shift_jis", "Shift_JIS")]
    fn python_and_whatwg_spellings_resolve(#[case] label: &str, #[case] name: &str) {
        assert_eq!(TextEncoding::for_label(label).unwrap().name(), name);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            TextEncoding::for_label("klingon"),
            Err(EncodingError::Unknown("klingon".to_string()))
        );
    }

    #[test]
    fn latin1_round_trips() {
        let latin1 = TextEncoding::for_label("latin1").unwrap();
        let bytes = latin1.encode("s = 'café'\n").unwrap();
        assert_eq!(bytes.as_ref(), b"s = 'caf\xe9'\n");
        assert_eq!(latin1.decode(&bytes).unwrap(), "s = 'café'\n");
    }

    #[test]
    fn latin1_is_iso_8859_1_not_windows_1252() {
        let latin1 = TextEncoding::for_label("latin-1").unwrap();
        assert_eq!(latin1.decode(b"\x80").unwrap(), "\u{80}");
        assert_eq!(
            latin1.encode("€"),
            Err(EncodingError::Unencodable("latin-1"))
        );

        let cp1252 = TextEncoding::for_label("cp1252").unwrap();
        assert_eq!(cp1252.decode(b"\x80").unwrap(), "€");
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let ascii = TextEncoding::for_label("ascii").unwrap();
        assert_eq!(
            ascii.decode(b"x = '\xe9'"),
            Err(EncodingError::Undecodable("ascii"))
        );
        assert_eq!(ascii.decode(b"x = 1\n").unwrap(), "x = 1\n");
        assert_eq!(
            ascii.encode("x = 'é'"),
            Err(EncodingError::Unencodable("ascii"))
        );
    }

    #[test]
    fn utf8_sig_strips_and_writes_bom() {
        let sig = TextEncoding::for_label("utf-8-sig").unwrap();
        assert_eq!(sig.decode(b"\xef\xbb\xbfx = 1\n").unwrap(), "x = 1\n");
        assert_eq!(sig.decode(b"x = 1\n").unwrap(), "x = 1\n");
        assert_eq!(sig.encode("x").unwrap().as_ref(), b"\xef\xbb\xbfx");
    }

    #[test]
    fn utf16le_round_trips() {
        let utf16 = TextEncoding::for_label("utf-16le").unwrap();
        let bytes = utf16.encode("x = 'ü'\r\n").unwrap();
        assert_eq!(&bytes[..4], &[b'x', 0, b' ', 0]);
        assert_eq!(utf16.decode(&bytes).unwrap(), "x = 'ü'\r\n");
    }

    #[test]
    fn invalid_utf8_is_undecodable() {
        let utf8 = TextEncoding::default();
        assert_eq!(
            utf8.decode(b"x = '\xff'"),
            Err(EncodingError::Undecodable("UTF-8"))
        );
    }

    #[test]
    fn unmappable_characters_are_unencodable() {
        let cp1252 = TextEncoding::for_label("cp1252").unwrap();
        assert_eq!(
            cp1252.encode("名 = 1"),
            Err(EncodingError::Unencodable("windows-1252"))
        );
    }

    #[test]
    fn utf8_bom_is_preserved() {
        let utf8 = TextEncoding::default();
        assert_eq!(utf8.decode(b"\xef\xbb\xbfx").unwrap(), "\u{feff}x");
    }
}
