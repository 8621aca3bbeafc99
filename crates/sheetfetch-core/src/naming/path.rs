//! Extension extraction from URLs and prefix splitting of local filenames.

use super::DEFAULT_EXTENSION;

/// Returns the suffix (with leading dot) of the last segment of the URL path.
///
/// Query string and fragment are ignored. A segment whose only dot is the
/// leading one (`.hidden`) has no suffix. Falls back to [`DEFAULT_EXTENSION`]
/// when there is no suffix or the URL does not parse.
pub fn extension_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            let segment = parsed.path().rsplit('/').next()?.to_string();
            suffix_of(&segment).map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// `Path::extension`-style suffix: the part from the last dot, unless that dot
/// starts the name or ends it.
fn suffix_of(name: &str) -> Option<&str> {
    let trimmed = name.trim_start_matches('.');
    let dot = trimmed.rfind('.')?;
    let offset = name.len() - trimmed.len();
    let suffix = &name[offset + dot..];
    if suffix.len() <= 1 {
        return None;
    }
    Some(suffix)
}

/// A local filename split as `{prefix}_{remainder}{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameParts<'a> {
    pub prefix: &'a str,
    pub remainder: &'a str,
    /// Includes the leading dot; empty if the name has no extension.
    pub extension: &'a str,
}

/// Splits a filename into prefix (before the first underscore of the stem),
/// remainder (after it) and extension (last suffix).
///
/// Returns `None` when the stem contains no underscore.
pub fn split_file_name(name: &str) -> Option<FileNameParts<'_>> {
    let (stem, extension) = match suffix_of(name) {
        Some(ext) => (&name[..name.len() - ext.len()], ext),
        None => (name, ""),
    };
    let (prefix, remainder) = stem.split_once('_')?;
    Some(FileNameParts {
        prefix,
        remainder,
        extension,
    })
}
