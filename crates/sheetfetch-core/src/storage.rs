//! Whole-file writes through a `.part` temp file.
//!
//! A destination path only ever appears once its body is fully on disk, so a
//! later run that sees the file can treat it as finished.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the rename into place.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a_00.jpg` → `a_00.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `data` to `{final_path}.part`, syncs it, then renames it to `final_path`.
/// The temp file is removed if any step fails.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = temp_path(final_path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, final_path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
