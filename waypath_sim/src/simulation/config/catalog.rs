// waypath_sim/src/simulation/config/catalog.rs

//! Discovers every scenario file under a directory tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Scenario files found on disk. The key is a namespace string built from the
/// path relative to the root (e.g. "warehouse.loading_dock") and the value is
/// the file's location.
#[derive(Debug, Default, Clone)]
pub struct ScenarioCatalog(pub BTreeMap<String, PathBuf>);

impl ScenarioCatalog {
    /// Walks `root` and records every `.toml` file. A missing directory
    /// yields an empty catalog.
    pub fn discover(root: &Path) -> Self {
        let mut catalog = ScenarioCatalog::default();
        if !root.exists() {
            warn!(
                "Scenario directory not found at {:?}, no scenarios will be loaded.",
                root
            );
            return catalog;
        }

        info!("Discovering scenarios in: {:?}", root);

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| {
                !e.file_type().is_dir() && e.path().extension().map_or(false, |ext| ext == "toml")
            })
        {
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            // Create a key like "warehouse.loading_dock" from the path.
            let key = relative
                .with_extension("")
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, ".");

            info!("Found scenario: '{}'", key);
            catalog.0.insert(key, path.to_path_buf());
        }

        catalog
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PathBuf)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discovers_nested_toml_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("warehouse")).unwrap();
        fs::write(dir.path().join("straight.toml"), "").unwrap();
        fs::write(dir.path().join("warehouse").join("dock.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let catalog = ScenarioCatalog::discover(dir.path());
        assert_eq!(catalog.len(), 2);
        assert!(catalog.0.contains_key("straight"));
        assert!(catalog.0.contains_key("warehouse.dock"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let catalog = ScenarioCatalog::discover(Path::new("/definitely/not/here"));
        assert!(catalog.is_empty());
    }
}
