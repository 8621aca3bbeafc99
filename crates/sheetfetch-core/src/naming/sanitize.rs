//! Identifier sanitization for use as a filename component.

/// Characters that are reserved on common filesystems and get replaced by `_`.
pub const UNSAFE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Trims surrounding whitespace and replaces each reserved character with `_`.
///
/// Unlike general filename sanitizers this keeps everything else byte-for-byte,
/// including repeated underscores, so the mapping stays predictable.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
