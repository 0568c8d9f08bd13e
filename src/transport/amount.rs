/// Lenient numeric coercion for amounts SMS-fly returns as element text.
///
/// Surrounding whitespace is ignored and only the leading numeric prefix is
/// read, so `"12.50 UAH"` becomes `12.5`. Returns `None` when no digits lead
/// the value.
pub fn coerce_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}
