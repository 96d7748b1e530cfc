pub mod result_ext;

/// Lowercase hex, two digits per byte, no separator
pub fn hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Every byte becomes the char with the same code point (ISO-8859-1)
pub fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

pub fn utf8_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Big endian UTF-16, a trailing odd byte is dropped
pub fn utf16be_lossy(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect::<Vec<u16>>();

    String::from_utf16_lossy(&units)
}
