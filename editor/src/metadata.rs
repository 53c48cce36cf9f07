//! Metadata form values, validation, and patch building.
//!
//! `MetadataEdit` is the raw form state: every text input is kept as typed,
//! so the panel can show the admin exactly what they entered. `validate`
//! checks length and format rules and reports one message per failing
//! field. `to_patch` produces the row update: strings trimmed, empty inputs
//! stored as `null`, and only the columns the target gallery owns.
//!
//! The server runs the same `validate` before writing, so both sides agree
//! on the messages.

#[cfg(test)]
#[path = "metadata_test.rs"]
mod metadata_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tile::{Gallery, Tile};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CAPTION_LEN: usize = 500;
pub const MAX_PHOTOGRAPHER_NAME_LEN: usize = 100;
pub const MAX_DEVICE_USED_LEN: usize = 100;
pub const MAX_CREDITS_LEN: usize = 500;
pub const MAX_VIDEO_THUMBNAIL_LEN: usize = 500;

const DATE_FORMAT_MESSAGE: &str = "Date must be in YYYY-MM-DD format";

/// A labelled outbound link attached to a photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub title: String,
    pub url: String,
}

/// Form values of the metadata panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataEdit {
    pub title: String,
    pub description: String,
    pub caption: String,
    pub photographer_name: String,
    /// `YYYY-MM-DD`, or empty.
    pub date_taken: String,
    pub device_used: String,
    /// Whole year as typed, or empty.
    pub year: String,
    /// Comma-separated tag list as typed.
    pub tags: String,
    pub credits: String,
    pub camera_lens: String,
    pub project_visibility: String,
    pub external_links: Vec<ExternalLink>,
    pub video_thumbnail_url: String,
    /// `YYYY-MM-DD`, or empty. Artworks only.
    pub creation_date: String,
}

/// Validation failures keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl MetadataEdit {
    /// Seed the form from a tile's current values.
    #[must_use]
    pub fn from_tile(tile: &Tile) -> Self {
        let text = |key: &str| tile.meta_str(key).unwrap_or_default().to_owned();
        let year = match tile.metadata.get("year") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let tags = tile
            .metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let external_links = match tile.metadata.get("external_links") {
            Some(v) => serde_json::from_value::<Vec<ExternalLink>>(v.clone()).unwrap_or_default(),
            None => Vec::new(),
        };

        Self {
            title: tile.title.clone().unwrap_or_default(),
            description: text("description"),
            caption: text("caption"),
            photographer_name: text("photographer_name"),
            date_taken: text("date_taken"),
            device_used: text("device_used"),
            year,
            tags,
            credits: text("credits"),
            camera_lens: text("camera_lens"),
            project_visibility: text("project_visibility"),
            external_links,
            video_thumbnail_url: text("video_thumbnail_url"),
            creation_date: text("creation_date"),
        }
    }

    /// Check every rule. Lengths count characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        let limits: [(&str, &str, &str, usize); 7] = [
            ("title", "Title", self.title.as_str(), MAX_TITLE_LEN),
            ("description", "Description", self.description.as_str(), MAX_DESCRIPTION_LEN),
            ("caption", "Caption", self.caption.as_str(), MAX_CAPTION_LEN),
            ("photographer_name", "Photographer name", self.photographer_name.as_str(), MAX_PHOTOGRAPHER_NAME_LEN),
            ("device_used", "Device used", self.device_used.as_str(), MAX_DEVICE_USED_LEN),
            ("credits", "Credits", self.credits.as_str(), MAX_CREDITS_LEN),
            ("video_thumbnail_url", "Video thumbnail URL", self.video_thumbnail_url.as_str(), MAX_VIDEO_THUMBNAIL_LEN),
        ];
        for (field, label, value, max) in limits {
            if value.chars().count() > max {
                errors.insert(field, format!("{label} must be {max} characters or less"));
            }
        }

        for (field, value) in [("date_taken", &self.date_taken), ("creation_date", &self.creation_date)] {
            let value = value.trim();
            if !value.is_empty() && !is_iso_date(value) {
                errors.insert(field, DATE_FORMAT_MESSAGE);
            }
        }

        let year = self.year.trim();
        if !year.is_empty() && year.parse::<i32>().is_err() {
            errors.insert("year", "Year must be a whole number");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build the row update for `gallery`. Call after `validate` succeeds.
    #[must_use]
    pub fn to_patch(&self, gallery: Gallery) -> Map<String, Value> {
        let mut patch = Map::new();
        patch.insert("title".into(), text_or_null(&self.title));
        patch.insert("tags".into(), self.tag_list());

        match gallery {
            Gallery::Photos => {
                for (field, value) in [
                    ("description", &self.description),
                    ("caption", &self.caption),
                    ("photographer_name", &self.photographer_name),
                    ("date_taken", &self.date_taken),
                    ("device_used", &self.device_used),
                    ("credits", &self.credits),
                    ("camera_lens", &self.camera_lens),
                    ("project_visibility", &self.project_visibility),
                    ("video_thumbnail_url", &self.video_thumbnail_url),
                ] {
                    patch.insert(field.into(), text_or_null(value));
                }
                let year = self.year.trim().parse::<i32>().map_or(Value::Null, Value::from);
                patch.insert("year".into(), year);
                patch.insert("external_links".into(), self.link_list());
            }
            Gallery::Artworks => {
                patch.insert("description".into(), text_or_null(&self.description));
                patch.insert("creation_date".into(), text_or_null(&self.creation_date));
            }
        }
        patch
    }

    fn tag_list(&self) -> Value {
        let tags: Vec<Value> = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Value::from)
            .collect();
        if tags.is_empty() { Value::Null } else { Value::Array(tags) }
    }

    fn link_list(&self) -> Value {
        let links: Vec<Value> = self
            .external_links
            .iter()
            .filter(|l| !l.url.trim().is_empty())
            .map(|l| serde_json::json!({ "title": l.title.trim(), "url": l.url.trim() }))
            .collect();
        if links.is_empty() { Value::Null } else { Value::Array(links) }
    }
}

fn text_or_null(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() { Value::Null } else { Value::from(trimmed) }
}

/// `NNNN-NN-NN` with ASCII digits. Calendar validity is not checked.
#[must_use]
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
