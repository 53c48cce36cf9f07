//! Metadata panel state machine.
//!
//! The panel edits the textual fields of one tile, independent of its
//! geometry. The host renders `form()` and `errors()`, forwards field edits
//! through `edit`, and drives the save round trip:
//!
//! ```text
//! open ──edit*──> begin_save ──Submit──> (host PATCHes) ──> finish_save
//!                    │                                        │
//!                    └─Blocked: field errors, no request      ├─Ok  -> Saved (close, sync parent)
//!                                                             └─Err -> Failed (stay open, toast)
//! ```
//!
//! While a save is in flight the controls are disabled: a second
//! `begin_save`, cancel, and Escape are all refused.

#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;

use crate::input::Key;
use crate::metadata::{FieldErrors, MetadataEdit};
use crate::tile::{Gallery, PartialTile, Tile, TileId};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, message: message.into() }
    }
}

/// Result of asking the panel to save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStart {
    /// Send `body` to the metadata endpoint, then call `finish_save`.
    Submit { id: TileId, gallery: Gallery, body: MetadataEdit },
    /// Validation failed. No request must be made.
    Blocked(Toast),
    /// A save is already in flight.
    Busy,
}

/// Result of a completed save round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Saved. The panel should close and the parent apply `patch` locally.
    Saved { id: TileId, patch: PartialTile, toast: Toast },
    /// The request failed. The panel stays open with the form intact.
    Failed(Toast),
    /// No save was in flight.
    Ignored,
}

/// State of an open metadata panel.
#[derive(Debug, Clone)]
pub struct MetadataPanel {
    tile_id: TileId,
    gallery: Gallery,
    form: MetadataEdit,
    errors: FieldErrors,
    saving: bool,
}

impl MetadataPanel {
    /// Open the panel seeded from `tile`.
    #[must_use]
    pub fn open(gallery: Gallery, tile: &Tile) -> Self {
        Self {
            tile_id: tile.id,
            gallery,
            form: MetadataEdit::from_tile(tile),
            errors: FieldErrors::default(),
            saving: false,
        }
    }

    #[must_use]
    pub fn tile_id(&self) -> TileId {
        self.tile_id
    }

    #[must_use]
    pub fn form(&self) -> &MetadataEdit {
        &self.form
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Apply a field edit. Refused while saving. Returns whether it applied.
    pub fn edit(&mut self, change: impl FnOnce(&mut MetadataEdit)) -> bool {
        if self.saving {
            return false;
        }
        change(&mut self.form);
        true
    }

    /// Validate and, if clean, enter the saving state.
    pub fn begin_save(&mut self) -> SaveStart {
        if self.saving {
            return SaveStart::Busy;
        }
        if let Err(errors) = self.form.validate() {
            self.errors = errors;
            return SaveStart::Blocked(Toast::error("Please fix validation errors"));
        }
        self.errors = FieldErrors::default();
        self.saving = true;
        SaveStart::Submit { id: self.tile_id, gallery: self.gallery, body: self.form.clone() }
    }

    /// Conclude the save started by `begin_save`.
    pub fn finish_save(&mut self, result: Result<(), String>) -> SaveOutcome {
        if !self.saving {
            return SaveOutcome::Ignored;
        }
        self.saving = false;
        match result {
            Ok(()) => SaveOutcome::Saved {
                id: self.tile_id,
                patch: PartialTile::metadata(self.form.to_patch(self.gallery)),
                toast: Toast::success("Changes saved successfully"),
            },
            Err(message) => SaveOutcome::Failed(Toast::error(format!("Failed to save changes: {message}"))),
        }
    }

    /// Whether the panel may be dismissed now. Nothing is persisted.
    #[must_use]
    pub fn cancel(&self) -> bool {
        !self.saving
    }

    /// Global keydown while the panel is mounted. Returns true to close.
    #[must_use]
    pub fn on_key(&self, key: &Key) -> bool {
        key.is_escape() && self.cancel()
    }
}
