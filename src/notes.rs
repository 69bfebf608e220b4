//! Notes overlay access flow
//!
//! The overlay only opens while the trigger gate reports open. From there:
//!
//! ```text
//!   Hidden --open--> PasswordSetup --submit_new_password--> Unlocked
//!          \-------> PasswordEntry --unlock-------------->  Unlocked
//! ```
//!
//! `close` returns to `Hidden` from anywhere. Rendering the widgets is the
//! adapter's job; this type only tracks which view is showing.

use thiserror::Error;

use crate::persistence::{NoteStore, NoteStoreError};
use crate::sim::GateQuery;

/// Which overlay view is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverlayView {
    #[default]
    Hidden,
    /// No password stored yet: ask for a new one
    PasswordSetup,
    /// Password stored: ask for it
    PasswordEntry,
    /// Notes text loaded for editing
    Unlocked { text: String },
}

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("the rocket is not at the trigger")]
    GateClosed,
    #[error("wrong password")]
    WrongPassword,
    #[error("not available from the {0:?} view")]
    InvalidState(OverlayView),
    #[error(transparent)]
    Store(#[from] NoteStoreError),
}

#[derive(Debug, Default)]
pub struct NotesOverlay {
    view: OverlayView,
}

impl NotesOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }

    pub fn is_visible(&self) -> bool {
        self.view != OverlayView::Hidden
    }

    /// Try to show the overlay. Refused while the gate is closed.
    pub fn open<G, S>(&mut self, gate: &G, store: &S) -> Result<&OverlayView, NotesError>
    where
        G: GateQuery + ?Sized,
        S: NoteStore + ?Sized,
    {
        if !gate.is_open() {
            log::debug!("Notes requested away from the trigger");
            return Err(NotesError::GateClosed);
        }
        self.view = if store.has_stored_password() {
            OverlayView::PasswordEntry
        } else {
            OverlayView::PasswordSetup
        };
        Ok(&self.view)
    }

    /// Set the first password and go straight to an empty notes view
    pub fn submit_new_password<S>(&mut self, store: &mut S, password: &str) -> Result<(), NotesError>
    where
        S: NoteStore + ?Sized,
    {
        self.expect_view(&OverlayView::PasswordSetup)?;
        store.set_password(password)?;
        self.view = OverlayView::Unlocked {
            text: String::new(),
        };
        Ok(())
    }

    /// Check the password and load the notes
    pub fn unlock<S>(&mut self, store: &S, password: &str) -> Result<String, NotesError>
    where
        S: NoteStore + ?Sized,
    {
        self.expect_view(&OverlayView::PasswordEntry)?;
        if !store.verify_password(password) {
            return Err(NotesError::WrongPassword);
        }
        let text = store.load_notes();
        self.view = OverlayView::Unlocked { text: text.clone() };
        Ok(text)
    }

    /// Save edited notes
    pub fn save<S>(&mut self, store: &mut S, text: &str) -> Result<(), NotesError>
    where
        S: NoteStore + ?Sized,
    {
        if !matches!(self.view, OverlayView::Unlocked { .. }) {
            return Err(NotesError::InvalidState(self.view.clone()));
        }
        store.save_notes(text)?;
        self.view = OverlayView::Unlocked {
            text: text.to_string(),
        };
        Ok(())
    }

    pub fn close(&mut self) {
        self.view = OverlayView::Hidden;
    }

    fn expect_view(&self, expected: &OverlayView) -> Result<(), NotesError> {
        if &self.view == expected {
            Ok(())
        } else {
            Err(NotesError::InvalidState(self.view.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryNoteStore;

    struct FixedGate(bool);

    impl GateQuery for FixedGate {
        fn is_open(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_closed_gate_refuses() {
        let mut overlay = NotesOverlay::new();
        let store = MemoryNoteStore::new();
        assert!(matches!(
            overlay.open(&FixedGate(false), &store),
            Err(NotesError::GateClosed)
        ));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_first_visit_sets_password() {
        let mut overlay = NotesOverlay::new();
        let mut store = MemoryNoteStore::new();

        assert_eq!(
            overlay.open(&FixedGate(true), &store).unwrap(),
            &OverlayView::PasswordSetup
        );

        let err = overlay.submit_new_password(&mut store, "ab").unwrap_err();
        assert!(matches!(
            err,
            NotesError::Store(NoteStoreError::TooShort { .. })
        ));
        assert_eq!(overlay.view(), &OverlayView::PasswordSetup);

        overlay.submit_new_password(&mut store, "abcd").unwrap();
        assert_eq!(
            overlay.view(),
            &OverlayView::Unlocked {
                text: String::new()
            }
        );

        overlay.save(&mut store, "meet at the pad").unwrap();
        assert_eq!(store.load_notes(), "meet at the pad");
    }

    #[test]
    fn test_return_visit_unlocks() {
        let mut store = MemoryNoteStore::new();
        store.set_password("abcd").unwrap();
        store.save_notes("fuel: 40%").unwrap();

        let mut overlay = NotesOverlay::new();
        assert_eq!(
            overlay.open(&FixedGate(true), &store).unwrap(),
            &OverlayView::PasswordEntry
        );

        assert!(matches!(
            overlay.unlock(&store, "wrong"),
            Err(NotesError::WrongPassword)
        ));
        // No lockout: the right password still works
        assert_eq!(overlay.unlock(&store, "abcd").unwrap(), "fuel: 40%");

        overlay.close();
        assert_eq!(overlay.view(), &OverlayView::Hidden);
    }

    #[test]
    fn test_wrong_view_is_rejected() {
        let mut overlay = NotesOverlay::new();
        let mut store = MemoryNoteStore::new();
        assert!(matches!(
            overlay.save(&mut store, "x"),
            Err(NotesError::InvalidState(OverlayView::Hidden))
        ));
        assert!(matches!(
            overlay.unlock(&store, "abcd"),
            Err(NotesError::InvalidState(_))
        ));
        assert!(matches!(
            overlay.submit_new_password(&mut store, "abcd"),
            Err(NotesError::InvalidState(_))
        ));
        assert!(!store.has_stored_password());
    }
}
