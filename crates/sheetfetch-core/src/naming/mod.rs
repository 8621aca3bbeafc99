//! Deterministic file naming.
//!
//! Derives destination filenames for downloaded images from a record's
//! identifier, its per-record image index and the source URL, and splits
//! existing filenames back into identifier prefix and remainder.

mod path;
mod sanitize;

pub use path::{extension_from_url, split_file_name, FileNameParts};
pub use sanitize::{sanitize_identifier, UNSAFE_CHARS};

/// Extension used when the URL path carries no suffix.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Builds `{id}_{index:02}{ext}`.
///
/// `id` is expected to be sanitized already and `ext` to include its leading dot.
pub fn destination_file_name(id: &str, index: usize, ext: &str) -> String {
    format!("{}_{:02}{}", id, index, ext)
}
