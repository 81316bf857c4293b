use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::platform::PreferenceStore;

/// Preference store persisting a flat map of boolean settings as JSON in a
/// file named after the utility's reverse-DNS domain, e.g.
/// `~/Library/Preferences/dev.tansu.scroll.json`. Reading a missing or
/// malformed file yields an empty map; writes never raise, they log.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl JsonFileStore {
    pub fn open(domain: &str) -> Self {
        let dir = dirs::preference_dir()
            .or_else(dirs::config_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::at_path(dir.join(format!("{}.json", domain)))
    }

    pub fn at_path(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Ignoring malformed preferences at {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self { path, values }
    }

    fn flush(&self) {
        let text = match serde_json::to_string_pretty(&self.values) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to serialize preferences: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, text) {
            tracing::warn!("Failed to write preferences to {:?}: {}", self.path, e);
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.tansu.test.json");

        let mut store = JsonFileStore::at_path(path.clone());
        store.set_bool("mouse.vertical", true);
        store.set_bool("enabled", false);

        let reopened = JsonFileStore::at_path(path);
        assert_eq!(reopened.get_bool("mouse.vertical"), Some(true));
        assert_eq!(reopened.get_bool("enabled"), Some(false));
        assert_eq!(reopened.get_bool("never.set"), None);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("absent.json"));
        assert_eq!(store.get_bool("enabled"), None);
    }

    #[test]
    fn test_malformed_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.tansu.test.json");
        fs::write(&path, "not json {").unwrap();

        let store = JsonFileStore::at_path(path);
        assert_eq!(store.get_bool("enabled"), None);
    }

    #[test]
    fn test_overwrite_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.tansu.test.json");

        let mut store = JsonFileStore::at_path(path.clone());
        store.set_bool("enabled", true);
        store.set_bool("enabled", false);

        let reopened = JsonFileStore::at_path(path);
        assert_eq!(reopened.get_bool("enabled"), Some(false));
    }
}
