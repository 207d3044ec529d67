//! Utility functions with platform-specific implementations.

use std::borrow::Cow;

use encoding_rs::Encoding;

/// Get a time-based seed value for pseudo-random number generation.
///
/// On native platforms, uses `SystemTime::now()`.
/// On WASM, uses `js_sys::Date::now()`.
#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed_nanos() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

#[cfg(target_arch = "wasm32")]
pub fn time_seed_nanos() -> u64 {
    // js_sys::Date::now() returns milliseconds as f64
    (js_sys::Date::now() * 1_000_000.0) as u64
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from a `\ide` line)
/// 3. Falls back to Windows-1252 (common in legacy USFM projects)
///
/// Returns the decoded text and the encoding that produced it. Uses
/// `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// # Examples
///
/// ```ignore
/// let (text, encoding) = decode_text("Hello".as_bytes(), None);
/// assert_eq!(text, "Hello");
/// assert_eq!(encoding, encoding_rs::UTF_8);
/// ```
pub fn decode_text<'a>(
    bytes: &'a [u8],
    hint_encoding: Option<&str>,
) -> (Cow<'a, str>, &'static Encoding) {
    // Try UTF-8 first (handles BOM automatically)
    let (result, encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return (result, encoding);
    }

    // If UTF-8 failed, try the hint encoding
    if let Some(name) = hint_encoding
        && let Some(encoding) = Encoding::for_label(name.trim().as_bytes())
    {
        let (result, encoding, _) = encoding.decode(bytes);
        return (result, encoding);
    }

    // Fallback: Windows-1252 (superset of ISO-8859-1)
    let (result, encoding, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    (result, encoding)
}

/// Decode with an explicit encoding label, if encoding_rs knows it.
pub fn decode_with_label<'a>(bytes: &'a [u8], label: &str) -> Option<(Cow<'a, str>, &'static Encoding)> {
    let encoding = Encoding::for_label(label.trim().as_bytes())?;
    let (result, encoding, _) = encoding.decode(bytes);
    Some((result, encoding))
}

/// Compare two strings with digit runs ordered by numeric value
/// (`2.usfm` before `10.usfm`).
pub fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let mut a = a.as_bytes();
    let mut b = b.as_bytes();
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let a_len = a.iter().take_while(|c| c.is_ascii_digit()).count();
                let b_len = b.iter().take_while(|c| c.is_ascii_digit()).count();
                let a_num = trim_zeros(&a[..a_len]);
                let b_num = trim_zeros(&b[..b_len]);
                let order = a_num
                    .len()
                    .cmp(&b_num.len())
                    .then_with(|| a_num.cmp(b_num))
                    .then_with(|| a_len.cmp(&b_len));
                if order != Ordering::Equal {
                    return order;
                }
                a = &a[a_len..];
                b = &b[b_len..];
            }
            (Some(x), Some(y)) => {
                let order = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()).then(x.cmp(y));
                if order != Ordering::Equal {
                    return order;
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[zeros..]
}

// ============================================================================
// Tests
// ============================================================================
