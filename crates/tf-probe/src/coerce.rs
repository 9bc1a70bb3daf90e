//! Total text-to-value coercions used by the stream views.
//!
//! None of these functions fail: malformed input yields `None` (or
//! `false` for booleans), which callers turn into their own default.

/// Parse a whole trimmed string as an `i32`.
pub fn to_int(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

/// Parse a whole trimmed string as an `i64`.
pub fn to_long(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Parse a double using `.` as the decimal separator regardless of locale.
pub fn to_double(s: &str) -> Option<f64> {
    let value: f64 = s.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Extract the first run of ASCII digits anywhere in the string.
///
/// `"2 channels"` → 2, `"48.0 kHz"` → 48, `"no digits"` → `None`.
pub fn some_int(s: &str) -> Option<i64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let run = &s[start..];
    let end = run.find(|c: char| !c.is_ascii_digit()).unwrap_or(run.len());
    run[..end].parse().ok()
}

/// `true` only for a case-insensitive `"yes"`.
pub fn to_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("yes")
}
