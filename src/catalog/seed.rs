use crate::db::models::NewIssue;
use crate::error::ComicError;
use std::{fs, path::Path};
use tracing::{info, warn};

/// Load issue JSON files from a directory into NewIssue payloads.
/// Used to populate a fresh catalog on first run; unreadable files are
/// skipped with a warning rather than aborting startup.
pub fn load_from_dir(dir: &Path) -> Result<Vec<NewIssue>, ComicError> {
    if !dir.exists() {
        info!(path = %dir.display(), "seed directory not found; skipping load");
        return Ok(Vec::new());
    }

    let loaded: Vec<NewIssue> = fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                let err: ComicError = e.into();
                warn!(error = %err, "failed to read seed dir entry");
                None
            }
        })
        .filter(|path| is_json_file(path))
        .filter_map(|path| {
            load_issue(&path)
                .inspect_err(|e| {
                    warn!(path = %path.display(), error = %e, "failed to load seed issue");
                })
                .ok()
        })
        .collect();

    Ok(loaded)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        == Some(true)
}

fn load_issue(path: &Path) -> Result<NewIssue, ComicError> {
    let raw = fs::read_to_string(path)?;
    let issue: NewIssue = serde_json::from_str(&raw)?;
    Ok(issue)
}
