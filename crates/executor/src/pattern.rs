//! Glob matcher for the KEYS verb.
//!
//! `*` matches any run of bytes, `?` matches exactly one, and `\` forces
//! the next pattern byte to match literally. A trailing bare `\` matches
//! nothing.

/// True when `source` matches the glob `pattern`.
pub fn key_matches(source: &str, pattern: &str) -> bool {
    matches_bytes(source.as_bytes(), pattern.as_bytes())
}

fn matches_bytes(source: &[u8], pattern: &[u8]) -> bool {
    match pattern.first() {
        None => source.is_empty(),
        Some(b'*') => (0..=source.len()).any(|i| matches_bytes(&source[i..], &pattern[1..])),
        Some(b'?') => !source.is_empty() && matches_bytes(&source[1..], &pattern[1..]),
        Some(b'\\') => match pattern.get(1) {
            Some(&literal) => {
                !source.is_empty()
                    && source[0] == literal
                    && matches_bytes(&source[1..], &pattern[2..])
            }
            None => false,
        },
        Some(&byte) => {
            !source.is_empty() && source[0] == byte && matches_bytes(&source[1..], &pattern[1..])
        }
    }
}
