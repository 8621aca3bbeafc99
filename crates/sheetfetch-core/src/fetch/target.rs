use crate::naming::{destination_file_name, extension_from_url};
use std::path::{Path, PathBuf};

/// Where one qualifying URL of a record is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Sanitized record identifier.
    pub identifier: String,
    /// Position among the record's qualifying URLs, starting at 0.
    pub index: usize,
    pub url: String,
    /// `{output_dir}/{identifier}_{index:02}{ext}`.
    pub path: PathBuf,
}

impl DownloadTarget {
    pub fn new(identifier: &str, index: usize, url: &str, output_dir: &Path) -> Self {
        let name = destination_file_name(identifier, index, &extension_from_url(url));
        Self {
            identifier: identifier.to_string(),
            index,
            url: url.to_string(),
            path: output_dir.join(name),
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_built_from_id_index_and_url_suffix() {
        let t = DownloadTarget::new("adan", 3, "https://x/y/z.webp?w=1", Path::new("out"));
        assert_eq!(t.path, Path::new("out").join("adan_03.webp"));
        assert_eq!(t.file_name(), "adan_03.webp");
    }

    #[test]
    fn suffixless_url_gets_default_extension() {
        let t = DownloadTarget::new("adan", 1, "http://a/y", Path::new("out"));
        assert_eq!(t.file_name(), "adan_01.jpg");
    }
}
