//! JSON file backend
//!
//! The whole store is one small document. Writes go to `<path>.tmp` first and
//! are renamed over the real file, so a crash mid-write keeps the old copy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{NoteStore, NoteStoreError, NotesDocument};

#[derive(Debug)]
pub struct JsonFileNoteStore {
    path: PathBuf,
    doc: NotesDocument,
}

impl JsonFileNoteStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, NoteStoreError> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No note store at {}, starting empty", path.display());
                NotesDocument::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `doc`, then adopt it. On error the in-memory copy is unchanged.
    fn commit(&mut self, doc: NotesDocument) -> Result<(), NoteStoreError> {
        let json = serde_json::to_string_pretty(&doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        self.doc = doc;
        Ok(())
    }
}

impl NoteStore for JsonFileNoteStore {
    fn has_stored_password(&self) -> bool {
        self.doc.password_digest.is_some()
    }

    fn set_password(&mut self, candidate: &str) -> Result<(), NoteStoreError> {
        let doc = NotesDocument::with_password(candidate)?;
        self.commit(doc)?;
        log::info!("Notes password set");
        Ok(())
    }

    fn verify_password(&self, candidate: &str) -> bool {
        self.doc.verify(candidate)
    }

    fn load_notes(&self) -> String {
        self.doc.notes.clone()
    }

    fn save_notes(&mut self, text: &str) -> Result<(), NoteStoreError> {
        let doc = NotesDocument {
            notes: text.to_string(),
            ..self.doc.clone()
        };
        self.commit(doc)?;
        log::info!("Notes saved ({} bytes)", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileNoteStore::open(dir.path().join("notes.json")).unwrap();
        assert!(!store.has_stored_password());
        assert_eq!(store.load_notes(), "");
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let mut store = JsonFileNoteStore::open(&path).unwrap();
        store.set_password("abcd").unwrap();
        store.save_notes("dock at 7").unwrap();
        drop(store);

        let store = JsonFileNoteStore::open(&path).unwrap();
        assert!(store.has_stored_password());
        assert!(store.verify_password("abcd"));
        assert!(!store.verify_password("wrong"));
        assert_eq!(store.load_notes(), "dock at 7");

        // Digest only, never the password itself
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("\"abcd\""));
    }

    #[test]
    fn test_too_short_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let mut store = JsonFileNoteStore::open(&path).unwrap();

        assert!(matches!(
            store.set_password("ab"),
            Err(NoteStoreError::TooShort { .. })
        ));
        assert!(!path.exists());
        assert!(!store.has_stored_password());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            JsonFileNoteStore::open(&path),
            Err(NoteStoreError::Json(_))
        ));
    }
}
