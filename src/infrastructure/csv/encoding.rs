/// Decode an uploaded file with encoding detection: UTF-8 first, then
/// Windows-1252 (the usual legacy spreadsheet export), finally a lossy
/// UTF-8 pass so a stray byte never blocks an import.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.to_string();
    }

    let (content, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if !had_errors {
        return content.into_owned();
    }

    String::from_utf8_lossy(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_text("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn windows_1252_fallback() {
        // 0xE9 is 'é' in Windows-1252 but invalid as a lone UTF-8 byte.
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes), "café");
    }
}
