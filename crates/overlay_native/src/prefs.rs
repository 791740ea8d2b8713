//! Preference storage backed by a single JSON map file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use overlay_host::{PrefsStore, PrefsStoreFuture};

use crate::app_state::write_atomically;

type PrefMap = BTreeMap<String, String>;

const PREFS_FILE: &str = "prefs.json";

fn load_pref_map(path: &Path) -> Result<PrefMap, String> {
    if !path.exists() {
        return Ok(PrefMap::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(PrefMap::new());
    }
    serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse prefs map {}: {err}", path.display()))
}

fn save_pref_map(path: &Path, map: &PrefMap) -> Result<(), String> {
    let serialized = serde_json::to_string_pretty(map)
        .map_err(|err| format!("failed to serialize prefs map: {err}"))?;
    write_atomically(path, &serialized)
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        Err("Preference key must not be empty".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Preference store keeping every key in one `prefs.json` map.
pub struct FilePrefsStore {
    file: PathBuf,
}

impl FilePrefsStore {
    /// Creates a prefs store rooted at `root`, creating the directory when missing.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, String> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|err| format!("failed to create prefs dir {}: {err}", root.display()))?;
        Ok(Self {
            file: root.join(PREFS_FILE),
        })
    }

    /// Loads the raw JSON stored under `key`.
    pub fn load(&self, key: &str) -> Result<Option<String>, String> {
        validate_key(key)?;
        let map = load_pref_map(&self.file)?;
        Ok(map.get(key).cloned())
    }

    /// Stores `raw_json` under `key`, replacing the whole map file.
    pub fn save(&self, key: &str, raw_json: &str) -> Result<(), String> {
        validate_key(key)?;
        let mut map = load_pref_map(&self.file)?;
        map.insert(key.to_string(), raw_json.to_string());
        save_pref_map(&self.file, &map)
    }
}

impl PrefsStore for FilePrefsStore {
    fn load_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { self.load(key) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.save(key, raw_json) })
    }
}
