//! Stored variant preferences
//!
//! A preference remembers the variant a user last chose for a family of
//! collections, keyed by a scope string. The engine reads it once at mount
//! and writes it back whenever the user selects a variant.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{Error, Result};

/// Storage for preferred variants.
pub trait PreferenceStore {
    /// Preferred variant for `scope`, if any.
    fn get(&self, scope: &str) -> Option<String>;

    /// Remember `value` for `scope`.
    fn set(&self, scope: &str, value: &str);
}

/// In-process preference store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one scope.
    pub fn with_value(scope: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(scope.into(), value.into());
        store
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, scope: &str) -> Option<String> {
        self.values.borrow().get(scope).cloned()
    }

    fn set(&self, scope: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(scope.to_string(), value.to_string());
    }
}

/// Preference store persisted as a TOML table of `scope = "variant"`.
///
/// Lives at `<config_dir>/demo-sync/preferences.toml` by default:
/// - Linux: `~/.config/demo-sync/`
/// - macOS: `~/Library/Application Support/demo-sync/`
/// - Windows: `%APPDATA%\demo-sync\`
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    const FILE_NAME: &'static str = "preferences.toml";

    /// Store in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConfigDir`] if the platform has no config directory.
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir().ok_or(Error::NoConfigDir)?;
        Ok(Self::with_dir(dir.join("demo-sync")))
    }

    /// Store in a custom directory (used for testing).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read every stored preference. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| Error::InvalidPreferences {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Store a preference, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is invalid or the write fails.
    pub fn try_set(&self, scope: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(scope.to_string(), value.to_string());

        write_atomic(&self.path, toml::to_string(&values)?.as_bytes())
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
///
/// Readers see either the old file or the new one, never a partial write.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(content)?;
    temp_file.sync_all()?;
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

impl PreferenceStore for FilePreferences {
    fn get(&self, scope: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(scope),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Ignoring unreadable preferences");
                None
            }
        }
    }

    fn set(&self, scope: &str, value: &str) {
        if let Err(e) = self.try_set(scope, value) {
            tracing::warn!(path = ?self.path, error = %e, "Failed to store preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_preferences() {
        let store = MemoryPreferences::with_value("a:b", "b");
        assert_eq!(store.get("a:b").as_deref(), Some("b"));
        store.set("a:b", "a");
        assert_eq!(store.get("a:b").as_deref(), Some("a"));
        assert_eq!(store.get("other"), None);
    }

    #[test]
    fn test_file_preferences_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FilePreferences::with_dir(temp.path().join("nested"));

        assert_eq!(store.get("Default:Premium"), None);
        store.try_set("Default:Premium", "Premium").unwrap();
        store.set("Other", "Tailwind");

        assert_eq!(store.get("Default:Premium").as_deref(), Some("Premium"));
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_file_preferences_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = FilePreferences::with_dir(temp.path());
        store.try_set("Default:Premium", "Premium").unwrap();
        store.try_set("Default:Premium", "Default").unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("preferences.toml")]);
        assert_eq!(store.get("Default:Premium").as_deref(), Some("Default"));
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("file.toml");
        write_atomic(&path, b"first = 1\n").unwrap();
        write_atomic(&path, b"second = 2\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second = 2\n");
    }

    #[test]
    fn test_file_preferences_invalid_file() {
        let temp = TempDir::new().unwrap();
        let store = FilePreferences::with_dir(temp.path());
        fs::write(store.path(), "not = [valid").unwrap();

        assert!(matches!(store.load(), Err(Error::InvalidPreferences { .. })));
        assert_eq!(store.get("anything"), None);
    }
}
