use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Output charset of a serialized document. / 序列化文件時使用的輸出字元編碼。
///
/// UTF-16 is encoded by hand because `encoding_rs` only decodes it; every
/// other label resolves to an `encoding_rs` encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Utf16Le,
    Utf16Be,
    Other(&'static Encoding),
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Utf8
    }
}

impl Charset {
    /// Resolves a WHATWG encoding label such as `"utf-8"` or
    /// `"windows-1252"`; `None` when the label is unknown.
    /// 解析編碼標籤；無法辨識時回傳 `None`。
    pub fn for_label(label: &str) -> Option<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())?;
        Some(if encoding == UTF_8 {
            Charset::Utf8
        } else if encoding == UTF_16LE {
            Charset::Utf16Le
        } else if encoding == UTF_16BE {
            Charset::Utf16Be
        } else {
            Charset::Other(encoding)
        })
    }

    /// Canonical name, also written into the XML declaration.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Other(encoding) => encoding.name(),
        }
    }

    /// Encodes serialized text into the charset's byte representation.
    /// Characters a legacy charset cannot map become numeric character
    /// references, which stay valid XML.
    /// 將序列化後的文字轉為位元組；無法對應的字元以數值字元參照輸出。
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::Utf16Le => encode_utf16(text, false),
            Charset::Utf16Be => encode_utf16(text, true),
            Charset::Other(encoding) => encoding.encode(text).0.into_owned(),
        }
    }
}

// BOM first, so parsers can detect the byte order without the declaration.
fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
    for unit in std::iter::once(0xFEFF_u16).chain(text.encode_utf16()) {
        let pair = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        bytes.extend_from_slice(&pair);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_case_insensitively() {
        assert_eq!(Charset::for_label("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::for_label("utf-16le"), Some(Charset::Utf16Le));
        assert_eq!(Charset::for_label("utf-16be"), Some(Charset::Utf16Be));
        assert!(matches!(
            Charset::for_label("windows-1252"),
            Some(Charset::Other(_))
        ));
        assert_eq!(Charset::for_label("klingon-1"), None);
    }

    #[test]
    fn utf16_output_starts_with_bom() {
        let le = Charset::Utf16Le.encode("A");
        assert_eq!(le, vec![0xFF, 0xFE, 0x41, 0x00]);
        let be = Charset::Utf16Be.encode("A");
        assert_eq!(be, vec![0xFE, 0xFF, 0x00, 0x41]);
    }

    #[test]
    fn legacy_charset_encodes_mapped_characters() {
        let charset = Charset::for_label("windows-1252").unwrap();
        assert_eq!(charset.name(), "windows-1252");
        assert_eq!(charset.encode("café"), b"caf\xe9".to_vec());
    }

    #[test]
    fn unmappable_characters_become_character_references() {
        let charset = Charset::for_label("windows-1252").unwrap();
        assert_eq!(charset.encode("漢"), b"&#28450;".to_vec());
    }
}
