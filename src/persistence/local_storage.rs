//! Browser LocalStorage backend

use super::{NoteStore, NoteStoreError, check_password, digest_password};

const PASSWORD_KEY: &str = "rocket_notes_pw";
const NOTES_KEY: &str = "rocket_notes_text";

#[derive(Debug, Clone)]
pub struct LocalStorageNoteStore {
    storage: web_sys::Storage,
}

impl LocalStorageNoteStore {
    pub fn open() -> Result<Self, NoteStoreError> {
        let storage = web_sys::window()
            .ok_or_else(|| NoteStoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| NoteStoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| NoteStoreError::Unavailable("LocalStorage disabled".into()))?;
        Ok(Self { storage })
    }

    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), NoteStoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| NoteStoreError::Unavailable(format!("{:?}", e)))
    }
}

impl NoteStore for LocalStorageNoteStore {
    fn has_stored_password(&self) -> bool {
        self.get(PASSWORD_KEY).is_some()
    }

    fn set_password(&mut self, candidate: &str) -> Result<(), NoteStoreError> {
        check_password(candidate)?;
        self.set(PASSWORD_KEY, &digest_password(candidate))?;
        self.set(NOTES_KEY, "")?;
        log::info!("Notes password set");
        Ok(())
    }

    fn verify_password(&self, candidate: &str) -> bool {
        self.get(PASSWORD_KEY)
            .is_some_and(|stored| stored == digest_password(candidate))
    }

    fn load_notes(&self) -> String {
        self.get(NOTES_KEY).unwrap_or_default()
    }

    fn save_notes(&mut self, text: &str) -> Result<(), NoteStoreError> {
        self.set(NOTES_KEY, text)?;
        log::info!("Notes saved");
        Ok(())
    }
}
