//! Convention-based lookup of well-known documents in a repository checkout.

use crate::Result;
use ohno::IntoAppError;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

const LOG_TARGET: &str = " documents";

pub const README_CANDIDATES: &[&str] = &["README.md", "README.MD", "Readme.md", "ReadMe.md", "README", "readme.md", "readme"];

pub const LICENSE_CANDIDATES: &[&str] = &["LICENSE", "LICENSE.txt", "LICENSE.md", "LICENSE.MD"];

/// Return the contents of the first candidate file present in `dir`.
///
/// Names are compared against the directory listing byte for byte, so the match is
/// case-sensitive even on file systems that are not. Returns `Ok(None)` when no
/// candidate exists. Candidates are never merged: the first hit wins.
pub async fn find_file(dir: &Path, candidates: &[&str]) -> Result<Option<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .into_app_err_with(|| format!("could not list directory '{}'", dir.display()))?;

    let mut names: HashSet<OsString> = HashSet::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .into_app_err_with(|| format!("could not list directory '{}'", dir.display()))?
    {
        let _ = names.insert(entry.file_name());
    }

    let Some(name) = candidates.iter().find(|name| names.contains(OsStr::new(name))) else {
        return Ok(None);
    };

    let path = dir.join(name);
    let bytes = tokio::fs::read(&path)
        .await
        .into_app_err_with(|| format!("could not read '{}'", path.display()))?;

    log::debug!(target: LOG_TARGET, "Found '{name}' in '{}'", dir.display());
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Read the repository README, treating an unreadable file as absent.
pub async fn read_readme(dir: &Path) -> Option<String> {
    read_or_log(dir, README_CANDIDATES, "README").await
}

/// Read the repository LICENSE file, treating an unreadable file as absent.
pub async fn read_license(dir: &Path) -> Option<String> {
    read_or_log(dir, LICENSE_CANDIDATES, "LICENSE").await
}

async fn read_or_log(dir: &Path, candidates: &[&str], what: &str) -> Option<String> {
    match find_file(dir, candidates).await {
        Ok(Some(text)) => Some(text),
        Ok(None) => {
            log::info!(target: LOG_TARGET, "No {what} file found in '{}'", dir.display());
            None
        }
        Err(e) => {
            log::error!(target: LOG_TARGET, "Could not read {what} file: {e:#}");
            None
        }
    }
}
