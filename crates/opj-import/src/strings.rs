use encoding_rs::{Encoding, BIG5, EUC_KR, GBK, SHIFT_JIS, UTF_8};

/// Codepage used when the caller does not pick one. Project files carry no codepage of their
/// own; writers used the system ANSI codepage.
pub const DEFAULT_CODEPAGE: u16 = 1252;

/// Windows ANSI codepage to `encoding_rs` encoding.
pub(crate) fn encoding_for_codepage(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        874 | 1250..=1258 => Encoding::for_label(format!("windows-{codepage}").as_bytes()),
        932 => Some(SHIFT_JIS),
        936 => Some(GBK),
        949 => Some(EUC_KR),
        950 => Some(BIG5),
        65001 => Some(UTF_8),
        _ => None,
    }
}

/// Warning to record once per parse when `codepage` has no decoder.
pub(crate) fn unsupported_codepage_message(codepage: u16) -> Option<String> {
    encoding_for_codepage(codepage).is_none().then(|| {
        format!("codepage {codepage} is not supported; 8-bit text is mapped byte for byte")
    })
}

/// Decode 8-bit text stored by the writer.
///
/// Without a decoder every byte becomes the char of the same value, so ASCII names survive.
pub(crate) fn decode_ansi(codepage: u16, bytes: &[u8]) -> String {
    match encoding_for_codepage(codepage) {
        Some(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
        None => bytes.iter().copied().map(char::from).collect(),
    }
}

/// Decode a fixed-width, NUL-padded field: everything from the first NUL on is padding.
pub(crate) fn decode_nul_padded(codepage: u16, bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    decode_ansi(codepage, &bytes[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_windows_1252() {
        assert_eq!(decode_ansi(1252, b"caf\xE9"), "café");
    }

    #[test]
    fn decodes_cyrillic_codepage() {
        assert_eq!(decode_ansi(1251, b"\xC4\xE0"), "Да");
    }

    #[test]
    fn every_windows_ansi_codepage_resolves() {
        for codepage in [874, 1250, 1251, 1252, 1253, 1254, 1255, 1256, 1257, 1258] {
            let encoding = encoding_for_codepage(codepage).unwrap();
            assert_eq!(encoding.name(), format!("windows-{codepage}"));
        }
        assert_eq!(encoding_for_codepage(932), Some(SHIFT_JIS));
        assert_eq!(encoding_for_codepage(1259), None);
    }

    #[test]
    fn unknown_codepage_maps_bytes_losslessly() {
        assert_eq!(decode_ansi(12345, b"A\xE9"), "A\u{e9}");
        assert!(unsupported_codepage_message(12345).is_some());
        assert_eq!(unsupported_codepage_message(DEFAULT_CODEPAGE), None);
    }

    #[test]
    fn nul_padded_field_stops_at_first_nul() {
        assert_eq!(decode_nul_padded(1252, b"Book1\0\0garbage"), "Book1");
        assert_eq!(decode_nul_padded(1252, b"Full"), "Full");
    }
}
