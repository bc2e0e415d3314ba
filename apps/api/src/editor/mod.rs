//! Document Editor: view/edit state machine over a committed `StructuredDocument`.
//!
//! `Viewing` holds only the committed document. `begin_edit` snapshots it into a private
//! working copy; every mutation touches that copy alone. `commit_edit` swaps the copy in as the
//! new committed document in one move, `discard_edit` drops it. Nothing is ever half-applied.

pub mod collections;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::StructuredDocument;

pub use collections::{Collection, ListValue, ScalarField};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("Document is not in edit mode")]
    NotEditing,

    #[error("Document is already in edit mode")]
    AlreadyEditing,

    #[error("Index {index} is out of range for {collection} (length {len})")]
    IndexOutOfRange {
        collection: Collection,
        index: usize,
        len: usize,
    },

    #[error("Value does not match the item type of {collection}")]
    ValueMismatch { collection: Collection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
pub struct DocumentEditor {
    committed: StructuredDocument,
    /// Present exactly while editing.
    working: Option<StructuredDocument>,
}

impl DocumentEditor {
    /// Starts in `Viewing` over a freshly generated document.
    pub fn new(document: StructuredDocument) -> Self {
        Self {
            committed: document,
            working: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        if self.working.is_some() {
            EditorMode::Editing
        } else {
            EditorMode::Viewing
        }
    }

    pub fn committed(&self) -> &StructuredDocument {
        &self.committed
    }

    pub fn working_copy(&self) -> Option<&StructuredDocument> {
        self.working.as_ref()
    }

    // ── transitions ─────────────────────────────────────────────────────────

    pub fn begin_edit(&mut self) -> Result<(), EditorError> {
        if self.working.is_some() {
            return Err(EditorError::AlreadyEditing);
        }
        self.working = Some(self.committed.clone());
        debug!("Editor entered edit mode");
        Ok(())
    }

    pub fn commit_edit(&mut self) -> Result<(), EditorError> {
        let working = self.working.take().ok_or(EditorError::NotEditing)?;
        self.committed = working;
        debug!("Editor committed working copy");
        Ok(())
    }

    pub fn discard_edit(&mut self) -> Result<(), EditorError> {
        self.working.take().ok_or(EditorError::NotEditing)?;
        debug!("Editor discarded working copy");
        Ok(())
    }

    // ── mutations (working copy only) ───────────────────────────────────────

    pub fn set_scalar_field(&mut self, field: ScalarField, value: String) -> Result<(), EditorError> {
        *field.slot(self.working_mut()?) = value;
        Ok(())
    }

    /// Replaces the text at `index` (flat lists) or merges a patch into the entry at `index`.
    pub fn update_list_item(
        &mut self,
        collection: Collection,
        index: usize,
        value: ListValue,
    ) -> Result<(), EditorError> {
        let doc = self.working_mut()?;
        let len = collection.len(doc);
        if index >= len {
            return Err(EditorError::IndexOutOfRange {
                collection,
                index,
                len,
            });
        }

        match (collection, value) {
            (Collection::Experience, ListValue::Experience(patch)) => {
                patch.apply(&mut doc.experience[index]);
            }
            (Collection::Education, ListValue::Education(patch)) => {
                patch.apply(&mut doc.qualifications.education[index]);
            }
            (c, ListValue::Text(text)) if c.holds_text() => {
                if let Some(list) = c.text_list(doc) {
                    list[index] = text;
                }
            }
            (collection, _) => return Err(EditorError::ValueMismatch { collection }),
        }
        Ok(())
    }

    /// Appends a zero-valued item and returns its index.
    pub fn append_list_item(&mut self, collection: Collection) -> Result<usize, EditorError> {
        Ok(collection.push_empty(self.working_mut()?))
    }

    /// Removes the item at `index`; returns whether anything was removed.
    pub fn remove_list_item(&mut self, collection: Collection, index: usize) -> Result<bool, EditorError> {
        Ok(collection.remove(self.working_mut()?, index))
    }

    fn working_mut(&mut self) -> Result<&mut StructuredDocument, EditorError> {
        self.working.as_mut().ok_or(EditorError::NotEditing)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
