//! Persistent abbreviation settings.
//!
//! The store owns the on-disk table, edits it, and hands out immutable
//! snapshots to the expander. Every mutation is written back immediately.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::abbrev::{AbbreviationTable, AbbreviationsObserver, Expansion, default_abbreviations};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("abbreviation {0:?} not found")]
    NotFound(String),
    #[error("abbreviation {0:?} already exists")]
    DuplicateAbbreviation(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Non-fatal outcome of an edit that was saved anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionWarning {
    /// The entry has no text and will never be applied.
    Empty,
}

impl std::fmt::Display for ExpansionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("expansion is empty: saved but not applied"),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abbreviations: Option<AbbreviationTable>,
}

#[derive(Debug)]
pub struct AbbreviationStore {
    path: PathBuf,
    table: Arc<AbbreviationTable>,
}

impl AbbreviationStore {
    /// Load the store at `path`. A missing file yields the default table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = load_table(&path)?;
        Ok(Self {
            path,
            table: Arc::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current table, cheap to clone and hand to the expander.
    pub fn snapshot(&self) -> Arc<AbbreviationTable> {
        Arc::clone(&self.table)
    }

    /// Push the current snapshot to `observer`.
    pub fn publish<O: AbbreviationsObserver + ?Sized>(&self, observer: &mut O) {
        observer.on_abbreviations_changed(self.snapshot());
    }

    /// Re-read the file, e.g. after it changed on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the current
    /// table is kept in that case.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.table = Arc::new(load_table(&self.path)?);
        tracing::debug!(path = %self.path.display(), entries = self.table.len(), "abbreviations reloaded");
        Ok(())
    }

    /// Insert an empty abbreviation at the top of the list.
    ///
    /// Returns `false` without touching anything if a blank entry already
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    pub fn add_blank(&mut self) -> Result<bool, StoreError> {
        if self.table.contains("") {
            return Ok(false);
        }
        let mut table = self.table.as_ref().clone();
        let entries = table.entries_mut();
        for expansion in entries.values_mut() {
            expansion.position += 1;
        }
        entries.shift_insert(0, String::new(), Expansion::new(""));
        self.commit(table)?;
        Ok(true)
    }

    /// Delete `abbreviation`, closing the gap in display positions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown key, or an IO error
    /// if the settings cannot be written.
    pub fn remove(&mut self, abbreviation: &str) -> Result<Expansion, StoreError> {
        let mut table = self.table.as_ref().clone();
        let entries = table.entries_mut();
        let removed = entries
            .shift_remove(abbreviation)
            .ok_or_else(|| StoreError::NotFound(abbreviation.to_string()))?;
        for expansion in entries.values_mut() {
            if expansion.position > removed.position {
                expansion.position -= 1;
            }
        }
        self.commit(table)?;
        Ok(removed)
    }

    /// Change the key of an entry, keeping its expansion and place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateAbbreviation`] if the trimmed name is
    /// already taken, [`StoreError::NotFound`] for an unknown key, or an IO
    /// error if the settings cannot be written.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let new = new.trim();
        if !self.table.contains(old) {
            return Err(StoreError::NotFound(old.to_string()));
        }
        if new == old {
            return Ok(());
        }
        if self.table.contains(new) {
            return Err(StoreError::DuplicateAbbreviation(new.to_string()));
        }
        let mut table = self.table.as_ref().clone();
        let entries = table.entries_mut();
        let Some((index, _, expansion)) = entries.shift_remove_full(old) else {
            return Err(StoreError::NotFound(old.to_string()));
        };
        entries.shift_insert(index, new.to_string(), expansion);
        self.commit(table)
    }

    /// Set the text of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown key, or an IO error
    /// if the settings cannot be written.
    pub fn set_expansion(
        &mut self,
        abbreviation: &str,
        text: &str,
    ) -> Result<Option<ExpansionWarning>, StoreError> {
        let text = text.trim();
        self.modify(abbreviation, |expansion| {
            expansion.expansion_text = text.to_string();
        })?;
        Ok(text.is_empty().then_some(ExpansionWarning::Empty))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown key, or an IO error
    /// if the settings cannot be written.
    pub fn set_enabled(&mut self, abbreviation: &str, enabled: bool) -> Result<(), StoreError> {
        self.modify(abbreviation, |expansion| expansion.is_enabled = enabled)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown key, or an IO error
    /// if the settings cannot be written.
    pub fn set_case_sensitive(
        &mut self,
        abbreviation: &str,
        case_sensitive: bool,
    ) -> Result<(), StoreError> {
        self.modify(abbreviation, |expansion| {
            expansion.is_case_sensitive = case_sensitive;
        })
    }

    /// Replace the table with the defaults and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.commit(default_abbreviations())
    }

    fn modify(
        &mut self,
        abbreviation: &str,
        edit: impl FnOnce(&mut Expansion),
    ) -> Result<(), StoreError> {
        let mut table = self.table.as_ref().clone();
        let expansion = table
            .entries_mut()
            .get_mut(abbreviation)
            .ok_or_else(|| StoreError::NotFound(abbreviation.to_string()))?;
        edit(expansion);
        self.commit(table)
    }

    /// Save `table`, then make it the current snapshot. A failed write
    /// leaves the current snapshot untouched.
    fn commit(&mut self, table: AbbreviationTable) -> Result<(), StoreError> {
        self.persist(&table)?;
        self.table = Arc::new(table);
        Ok(())
    }

    /// Write the table with a temp file and rename.
    fn persist(&self, table: &AbbreviationTable) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let settings = SettingsFile {
            abbreviations: Some(table.clone()),
        };
        let content = serde_json::to_string_pretty(&settings)
            .map_err(|err| io_err(io::Error::from(err)))?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path).map_err(io_err)?;
            file.write_all(content.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(err));
        }
        tracing::debug!(path = %self.path.display(), entries = table.len(), "abbreviations saved");
        Ok(())
    }
}

fn load_table(path: &Path) -> Result<AbbreviationTable, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no abbreviations file, using defaults");
            return Ok(default_abbreviations());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let settings: SettingsFile =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(settings.abbreviations.unwrap_or_else(default_abbreviations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AbbreviationStore {
        AbbreviationStore::open(dir.path().join("abbreviations.json")).unwrap()
    }

    fn keys(store: &AbbreviationStore) -> Vec<String> {
        store.snapshot().iter().map(|(k, _)| k.to_string()).collect()
    }

    fn positions(store: &AbbreviationStore) -> Vec<(String, u32)> {
        store
            .snapshot()
            .iter()
            .map(|(k, e)| (k.to_string(), e.position))
            .collect()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(*store.snapshot(), default_abbreviations());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_without_abbreviations_key_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abbreviations.json");
        fs::write(&path, "{}").unwrap();
        let store = AbbreviationStore::open(&path).unwrap();
        assert_eq!(store.snapshot().len(), 9);
    }

    #[test]
    fn test_loaded_table_replaces_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abbreviations.json");
        fs::write(
            &path,
            r#"{"abbreviations":{"gg":{"value":"good game","isEnabled":true,"position":0}}}"#,
        )
        .unwrap();
        let store = AbbreviationStore::open(&path).unwrap();
        assert_eq!(keys(&store), vec!["gg"]);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abbreviations.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AbbreviationStore::open(&path),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_add_blank_shifts_positions() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(store.add_blank().unwrap());

        let table = store.snapshot();
        assert_eq!(table.iter().next().map(|(k, _)| k), Some(""));
        assert_eq!(table.get("").map(|e| e.position), Some(0));
        assert_eq!(table.get("eg.").map(|e| e.position), Some(1));
        assert_eq!(table.get("rn").map(|e| e.position), Some(9));
    }

    #[test]
    fn test_add_blank_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_blank().unwrap();
        let before = positions(&store);
        assert!(!store.add_blank().unwrap());
        assert_eq!(positions(&store), before);
    }

    #[test]
    fn test_remove_closes_position_gap() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let removed = store.remove("imo").unwrap();
        assert_eq!(removed.position, 2);

        let table = store.snapshot();
        assert_eq!(table.len(), 8);
        assert_eq!(table.get("atm").map(|e| e.position), Some(1));
        assert_eq!(table.get("w/").map(|e| e.position), Some(2));
        assert_eq!(table.get("rn").map(|e| e.position), Some(7));
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(store.remove("zzz"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_rename_trims_and_keeps_place() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.rename("atm", "  atmo ").unwrap();

        let k = keys(&store);
        assert_eq!(k[1], "atmo");
        let table = store.snapshot();
        assert_eq!(
            table.get("atmo").map(|e| e.expansion_text.as_str()),
            Some("at the moment")
        );
        assert!(!table.contains("atm"));
    }

    #[test]
    fn test_rename_to_existing_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.rename("atm", "btw"),
            Err(StoreError::DuplicateAbbreviation(name)) if name == "btw"
        ));
        assert!(store.snapshot().contains("atm"));
    }

    #[test]
    fn test_empty_expansion_is_saved_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let warning = store.set_expansion("btw", "   ").unwrap();
        assert_eq!(warning, Some(ExpansionWarning::Empty));
        let table = store.snapshot();
        let btw = table.get("btw").unwrap();
        assert_eq!(btw.expansion_text, "");
        assert!(!btw.is_actionable());

        assert_eq!(store.set_expansion("btw", " by the way ").unwrap(), None);
        assert_eq!(
            store.snapshot().get("btw").map(|e| e.expansion_text.as_str()),
            Some("by the way")
        );
    }

    #[test]
    fn test_flag_setters() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_enabled("rn", false).unwrap();
        store.set_case_sensitive("ily", true).unwrap();
        let table = store.snapshot();
        assert!(!table.get("rn").unwrap().is_enabled);
        assert!(table.get("ily").unwrap().is_case_sensitive);
        assert!(matches!(
            store.set_enabled("nope", true),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutations_persist_and_reopen() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_expansion("rn", "right now!").unwrap();
        store.set_case_sensitive("rn", true).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.snapshot(), store.snapshot());
        assert!(!dir.path().join("abbreviations.json.tmp").exists());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["abbreviations"]["rn"]["value"], "right now!");
        assert_eq!(raw["abbreviations"]["rn"]["isCaseSensitive"], true);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.remove("btw").unwrap();
        store.add_blank().unwrap();
        store.reset().unwrap();
        assert_eq!(*store.snapshot(), default_abbreviations());
        assert_eq!(*store_in(&dir).snapshot(), default_abbreviations());
    }

    #[test]
    fn test_failed_write_keeps_current_table() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("cfg");
        let mut store = AbbreviationStore::open(cfg.join("abbreviations.json")).unwrap();
        fs::write(&cfg, "not a directory").unwrap();

        let before = keys(&store);
        assert!(matches!(store.remove("atm"), Err(StoreError::Io { .. })));
        assert!(matches!(store.add_blank(), Err(StoreError::Io { .. })));
        assert!(matches!(store.rename("rn", "rnn"), Err(StoreError::Io { .. })));
        assert!(matches!(store.set_enabled("btw", false), Err(StoreError::Io { .. })));
        assert!(matches!(store.reset(), Err(StoreError::Io { .. })));

        assert_eq!(keys(&store), before);
        assert!(store.snapshot().get("btw").is_some_and(|e| e.is_enabled));
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_edits() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let before = store.snapshot();
        store.remove("btw").unwrap();
        assert!(before.contains("btw"));
        assert!(!store.snapshot().contains("btw"));
    }

    #[test]
    fn test_reload_picks_up_external_change() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.reset().unwrap();
        fs::write(
            store.path(),
            r#"{"abbreviations":{"ty":{"value":"thank you","isEnabled":true,"position":0}}}"#,
        )
        .unwrap();
        store.reload().unwrap();
        assert_eq!(keys(&store), vec!["ty"]);
    }

    #[test]
    fn test_publish_hands_snapshot_to_observer() {
        #[derive(Default)]
        struct Recorder(Option<Arc<AbbreviationTable>>);
        impl AbbreviationsObserver for Recorder {
            fn on_abbreviations_changed(&mut self, table: Arc<AbbreviationTable>) {
                self.0 = Some(table);
            }
        }

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut recorder = Recorder::default();
        store.publish(&mut recorder);
        assert!(recorder.0.is_some_and(|t| Arc::ptr_eq(&t, &store.snapshot())));
    }
}
