use crate::naming::sanitize_identifier;
use crate::sheet::Cell;
use std::collections::HashMap;

/// Old identifier → `{rank:04}`, rank being the 1-based row position.
///
/// Built once from the identifier column before any file is touched.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    /// New identifier for every row, empty identifiers included.
    new_ids: Vec<String>,
    forward: HashMap<String, String>,
    /// Same entries keyed by the sanitized form used in downloaded filenames.
    sanitized: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl IdentifierMap {
    /// Assigns ranks strictly by position. Rows with an empty identifier still
    /// consume a rank but add no mapping entry; for duplicate identifiers the
    /// later row wins.
    pub fn build<'a>(identifiers: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut map = Self::default();
        for (i, cell) in identifiers.into_iter().enumerate() {
            let new_id = format!("{:04}", i + 1);
            map.new_ids.push(new_id.clone());

            let old = cell.as_text();
            if old.trim().is_empty() {
                continue;
            }
            if let Some(prev) = map.forward.insert(old.clone(), new_id.clone()) {
                tracing::warn!(old = %old, previous = %prev, new = %new_id, "duplicate identifier, later row wins");
            }
            map.sanitized.insert(sanitize_identifier(&old), new_id.clone());
            map.reverse.insert(new_id, old);
        }
        map
    }

    /// New identifier for an old one, matched as written or in sanitized form.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.forward
            .get(old)
            .or_else(|| self.sanitized.get(old))
            .map(String::as_str)
    }

    /// Old identifier a new one was assigned from.
    pub fn original(&self, new: &str) -> Option<&str> {
        self.reverse.get(new).map(String::as_str)
    }

    /// New identifiers in row order, one per row.
    pub fn new_ids(&self) -> &[String] {
        &self.new_ids
    }

    /// Number of mapped old identifiers.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
