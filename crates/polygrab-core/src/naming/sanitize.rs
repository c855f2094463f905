//! Portable filename stems.

/// Longest stem kept, in characters.
pub const STEM_MAX: usize = 200;

/// Stem used when nothing usable is left after sanitizing.
pub const UNKNOWN_STEM: &str = "unknown";

/// Sanitizes an identifier into a filename stem.
///
/// - Trims surrounding whitespace
/// - Replaces each run of characters outside `[A-Za-z0-9_.-]` with a single `_`
/// - Truncates to 200 characters
/// - Falls back to `unknown` when empty
pub fn safe_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;

    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    // Output is ASCII only, so byte length == char count.
    out.truncate(STEM_MAX);
    if out.is_empty() {
        UNKNOWN_STEM.to_string()
    } else {
        out
    }
}
