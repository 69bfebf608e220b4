//! Password-protected note storage
//!
//! The simulation never touches this directly. UI code reaches it only after
//! the trigger gate reports open (see `notes`).
//!
//! Backends:
//! - `MemoryNoteStore`: in-process, for tests and headless runs
//! - `JsonFileNoteStore`: one JSON document on disk (native)
//! - `LocalStorageNoteStore`: browser LocalStorage (wasm32)
//!
//! Passwords are kept as SHA-256 digests. Setting a password clears the notes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::consts::MIN_PASSWORD_LEN;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileNoteStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageNoteStore;

#[derive(Debug, Error)]
pub enum NoteStoreError {
    #[error("password too short: {len} characters, need at least {min}")]
    TooShort { len: usize, min: usize },
    #[error("note store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("note store document is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("note storage unavailable: {0}")]
    Unavailable(String),
}

/// The note persistence collaborator
pub trait NoteStore {
    fn has_stored_password(&self) -> bool;

    /// Store a new password and reset the notes to empty
    ///
    /// Fails with `TooShort` below `MIN_PASSWORD_LEN` characters, leaving
    /// the store untouched.
    fn set_password(&mut self, candidate: &str) -> Result<(), NoteStoreError>;

    /// Plain comparison; no lockout, no attempt counter
    fn verify_password(&self, candidate: &str) -> bool;

    fn load_notes(&self) -> String;

    fn save_notes(&mut self, text: &str) -> Result<(), NoteStoreError>;
}

/// Stored form of the notes: digest plus text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    #[serde(default)]
    pub password_digest: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl NotesDocument {
    fn verify(&self, candidate: &str) -> bool {
        self.password_digest
            .as_deref()
            .is_some_and(|stored| stored == digest_password(candidate))
    }

    /// Document after a successful password change
    fn with_password(candidate: &str) -> Result<Self, NoteStoreError> {
        check_password(candidate)?;
        Ok(Self {
            password_digest: Some(digest_password(candidate)),
            notes: String::new(),
        })
    }
}

/// Reject passwords below the minimum length
pub fn check_password(candidate: &str) -> Result<(), NoteStoreError> {
    let len = candidate.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(NoteStoreError::TooShort {
            len,
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Hex SHA-256 of a password
pub fn digest_password(candidate: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"rocket-notes");
    hasher.update([0u8]);
    hasher.update(candidate.as_bytes());
    to_hex_lower(&hasher.finalize())
}

fn to_hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    doc: NotesDocument,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryNoteStore {
    fn has_stored_password(&self) -> bool {
        self.doc.password_digest.is_some()
    }

    fn set_password(&mut self, candidate: &str) -> Result<(), NoteStoreError> {
        self.doc = NotesDocument::with_password(candidate)?;
        Ok(())
    }

    fn verify_password(&self, candidate: &str) -> bool {
        self.doc.verify(candidate)
    }

    fn load_notes(&self) -> String {
        self.doc.notes.clone()
    }

    fn save_notes(&mut self, text: &str) -> Result<(), NoteStoreError> {
        self.doc.notes = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_flow() {
        let mut store = MemoryNoteStore::new();
        assert!(!store.has_stored_password());
        assert!(!store.verify_password("abcd"));

        let err = store.set_password("ab").unwrap_err();
        assert!(matches!(err, NoteStoreError::TooShort { len: 2, min: 3 }));
        assert!(!store.has_stored_password());

        store.set_password("abcd").unwrap();
        assert!(store.has_stored_password());
        assert!(store.verify_password("abcd"));
        assert!(!store.verify_password("wrong"));
    }

    #[test]
    fn test_too_short_leaves_state() {
        let mut store = MemoryNoteStore::new();
        store.set_password("secret").unwrap();
        store.save_notes("buy fuel").unwrap();

        assert!(store.set_password("no").is_err());
        assert!(store.verify_password("secret"));
        assert_eq!(store.load_notes(), "buy fuel");
    }

    #[test]
    fn test_new_password_clears_notes() {
        let mut store = MemoryNoteStore::new();
        store.set_password("first").unwrap();
        store.save_notes("old").unwrap();
        store.set_password("second").unwrap();
        assert_eq!(store.load_notes(), "");
        assert!(!store.verify_password("first"));
    }

    #[test]
    fn test_length_counts_characters() {
        // Three multi-byte characters are long enough
        assert!(check_password("äöü").is_ok());
        assert!(check_password("äö").is_err());
    }

    #[test]
    fn test_digest_is_not_plaintext() {
        let digest = digest_password("abcd");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest_password("abcd"));
        assert_ne!(digest, digest_password("abce"));
    }
}
