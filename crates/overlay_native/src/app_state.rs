//! JSON-file app-state store, one file per namespace.

use std::fs;
use std::path::{Path, PathBuf};

use overlay_host::{check_revision, AppStateEnvelope, AppStateStore, AppStateStoreFuture, RevisionCheck};

fn validate_namespace(namespace: &str) -> Result<(), String> {
    if namespace.is_empty() {
        return Err("Namespace must not be empty".to_string());
    }
    if !namespace
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
    {
        return Err(format!(
            "Namespace `{namespace}` contains unsupported characters"
        ));
    }
    Ok(())
}

fn namespace_file(root: &Path, namespace: &str) -> Result<PathBuf, String> {
    validate_namespace(namespace)?;
    Ok(root.join(format!("{namespace}.json")))
}

fn parse_envelope(path: &Path, raw: &str) -> Result<AppStateEnvelope, String> {
    serde_json::from_str(raw).map_err(|err| {
        format!(
            "failed to parse app-state envelope {}: {err}",
            path.display()
        )
    })
}

/// Writes `contents` next to `path` and renames it into place.
///
/// The previous file is untouched unless the rename succeeds.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<(), String> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    if let Err(err) = fs::write(&temp, contents) {
        let _ = fs::remove_file(&temp);
        return Err(format!("failed to write {}: {err}", temp.display()));
    }
    fs::rename(&temp, path).map_err(|err| {
        let _ = fs::remove_file(&temp);
        format!("failed to replace {}: {err}", path.display())
    })
}

#[derive(Debug, Clone)]
/// App-state store rooted at a native directory.
pub struct FileAppStateStore {
    root: PathBuf,
}

impl FileAppStateStore {
    /// Creates a store rooted at `root`, creating the directory when missing.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, String> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|err| format!("failed to create app-state dir {}: {err}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding one `<namespace>.json` per namespace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads an app-state envelope by namespace.
    pub fn load(&self, namespace: &str) -> Result<Option<AppStateEnvelope>, String> {
        let path = namespace_file(&self.root, namespace)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        let envelope = parse_envelope(&path, &raw)?;
        Ok(Some(envelope))
    }

    /// Replaces the stored envelope when `envelope` supersedes it.
    ///
    /// An unreadable existing file never blocks a save; a newer stored snapshot does, and is
    /// reported as an error rather than silently kept.
    pub fn save(&self, envelope: &AppStateEnvelope) -> Result<(), String> {
        let path = namespace_file(&self.root, &envelope.namespace)?;

        let existing = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|err| format!("failed to read existing {}: {err}", path.display()))?;
            parse_envelope(&path, &raw).ok()
        } else {
            None
        };
        match check_revision(existing.as_ref(), envelope) {
            Ok(RevisionCheck::Write) => {}
            Ok(RevisionCheck::AlreadyStored) => return Ok(()),
            Err(err) => {
                tracing::warn!(namespace = %envelope.namespace, error = %err, "app-state save rejected");
                return Err(err);
            }
        }

        let serialized = serde_json::to_string_pretty(envelope)
            .map_err(|err| format!("failed to serialize app-state envelope: {err}"))?;
        write_atomically(&path, &serialized)
    }
}

impl AppStateStore for FileAppStateStore {
    fn load_app_state_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> AppStateStoreFuture<'a, Result<Option<AppStateEnvelope>, String>> {
        Box::pin(async move { self.load(namespace) })
    }

    fn save_app_state_envelope<'a>(
        &'a self,
        envelope: &'a AppStateEnvelope,
    ) -> AppStateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.save(envelope) })
    }
}
