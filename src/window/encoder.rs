//! Text encoding of packed pixel windows.

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Prefix marking an in-band error body.
pub const ERROR_PREFIX: char = '!';

/// Render a value in base 36 using `0-9A-Z`, without leading zeros.
pub fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }

    // u32::MAX needs 7 digits
    let mut buf = [0u8; 7];
    let mut pos = buf.len();
    while value > 0 {
        pos -= 1;
        buf[pos] = DIGITS[(value % 36) as usize];
        value /= 36;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Encode a slice of packed pixels as space-separated base-36 tokens.
pub fn encode_window(pixels: &[u32]) -> String {
    let mut out = String::with_capacity(pixels.len() * 8);
    for (i, &value) in pixels.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&to_base36(value));
    }
    out
}
