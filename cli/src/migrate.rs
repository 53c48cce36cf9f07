//! Bulk migration of a local image directory through the upload endpoint.
//!
//! Files are uploaded one at a time in name order so display slots follow
//! the directory listing. A file the server already holds is counted as
//! skipped; any other failure is reported and the run continues.

#[cfg(test)]
#[path = "migrate_test.rs"]
mod migrate_test;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{CliContext, CliError, MigrateArgs, api_request};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// File name fragments that place a photo in a category, checked in order.
const CATEGORY_PATTERNS: [(&str, &[&str]); 4] = [
    ("selected", &["selected-"]),
    ("commissioned", &["commissioned-", "marie-"]),
    ("editorial", &["editorial-"]),
    (
        "personal",
        &[
            "personal-",
            "country-road",
            "morning-fog",
            "farmhouse",
            "winter-landscape",
            "lake-reflection",
            "stone-wall",
            "mountain-vista",
            "wheat-field",
            "barn-detail",
            "forest-path",
            "autumn-trees",
            "prairie-sunset",
        ],
    ),
];

const DEFAULT_PHOTO_CATEGORY: &str = "personal";

/// Photo category implied by a file name. Unmatched names are personal work.
pub fn detect_category(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map_or(DEFAULT_PHOTO_CATEGORY, |(category, _)| *category)
}

pub fn is_image(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Result of one file upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: FileOutcome) {
        self.total += 1;
        match outcome {
            FileOutcome::Uploaded => self.uploaded += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Migration Summary ===")?;
        writeln!(f, "Total files: {}", self.total)?;
        writeln!(f, "Uploaded: {}", self.uploaded)?;
        writeln!(f, "Skipped (already exists): {}", self.skipped)?;
        write!(f, "Failed: {}", self.failed)
    }
}

/// Classify an upload reply: 201 creates, a `skipped` body is a skip.
pub fn classify_reply(reply: &Value) -> FileOutcome {
    if reply.get("skipped").and_then(Value::as_bool) == Some(true) {
        FileOutcome::Skipped
    } else {
        FileOutcome::Uploaded
    }
}

/// Image files directly inside `dir`, sorted by name.
async fn collect_images(dir: &Path) -> Result<Vec<(String, PathBuf)>, CliError> {
    let io_err = |source| CliError::Io { path: dir.display().to_string(), source };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if is_image(&name) && entry.file_type().await.map_err(io_err)?.is_file() {
            images.push((name, entry.path()));
        }
    }
    images.sort();
    Ok(images)
}

async fn upload_one(cli: &CliContext, gallery: &str, category: Option<&str>, name: &str, path: &Path) -> FileOutcome {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("  x cannot read {name}: {e}");
            return FileOutcome::Failed;
        }
    };
    let mut query = vec![("file_name", name)];
    if let Some(category) = category {
        query.push(("category", category));
    }
    let route = format!("/api/{gallery}/tiles/upload");
    match api_request(cli, reqwest::Method::POST, &route, &query, Some(bytes.into())).await {
        Ok(reply) => {
            let outcome = classify_reply(&reply);
            match outcome {
                FileOutcome::Skipped => println!("  - already exists, skipped: {name}"),
                _ => println!("  + uploaded: {name}"),
            }
            outcome
        }
        Err(e) => {
            eprintln!("  x {name}: {e}");
            FileOutcome::Failed
        }
    }
}

pub(crate) async fn run(cli: &CliContext, args: MigrateArgs) -> Result<(), CliError> {
    let images = collect_images(&args.dir).await?;
    println!("Found {} images in {}", images.len(), args.dir.display());

    let mut summary = Summary::default();
    for (name, path) in &images {
        let category = match (&args.category, args.gallery.as_str()) {
            (Some(category), _) => Some(category.as_str()),
            (None, "photos") => Some(detect_category(name)),
            (None, _) => None,
        };
        if args.dry_run {
            println!("  {name} -> {}", category.unwrap_or("(default)"));
            continue;
        }
        summary.record(upload_one(cli, &args.gallery, category, name, path).await);
    }

    if args.dry_run {
        return Ok(());
    }
    println!("\n{summary}");
    if summary.failed > 0 {
        return Err(CliError::MigrationFailed { failed: summary.failed, total: summary.total });
    }
    Ok(())
}
