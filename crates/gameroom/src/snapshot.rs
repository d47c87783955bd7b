use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// A single named JSON-backed collection under `DATA_DIR`
/// (`games.json`, `hands.json`, ...). Loads tolerate a missing or
/// malformed file — the repository just starts empty and logs a
/// warning — since a snapshot is a best-effort convenience, never a
/// startup dependency.
pub struct Repository<T> {
    path: PathBuf,
    items: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> Repository<T> {
    pub fn open(data_dir: &Path, name: &str) -> Self {
        let path = data_dir.join(format!("{name}.json"));
        let items = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("snapshot {} malformed, starting empty: {e}", path.display());
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        Self { path, items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Writes to `<name>.json.tmp` then renames over the real path, so a
    /// crash mid-write never leaves a half-written snapshot in place.
    pub fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Row {
        value: u32,
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = std::env::temp_dir().join(format!("gameroom-snapshot-test-{}", uuid::Uuid::new_v4()));
        let repo: Repository<Row> = Repository::open(&dir, "nonexistent");
        assert!(repo.items().is_empty());
    }

    #[test]
    fn persist_then_open_round_trips() {
        let dir = std::env::temp_dir().join(format!("gameroom-snapshot-test-{}", uuid::Uuid::new_v4()));
        let mut repo: Repository<Row> = Repository::open(&dir, "rows");
        repo.push(Row { value: 7 });
        repo.persist().unwrap();

        let reopened: Repository<Row> = Repository::open(&dir, "rows");
        assert_eq!(reopened.items(), &[Row { value: 7 }]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn malformed_file_loads_empty_instead_of_failing_startup() {
        let dir = std::env::temp_dir().join(format!("gameroom-snapshot-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("rows.json"), "not json").unwrap();
        let repo: Repository<Row> = Repository::open(&dir, "rows");
        assert!(repo.items().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
