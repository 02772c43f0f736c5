//! Eligibility of changed files.
//!
//! A changed file is eligible when it is present in the non-ignored on-disk
//! listing of the repository and its content classifies as text.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use walkdir::WalkDir;

use crate::error::{NewlineError, Result};

/// How many leading bytes are inspected for NUL when classifying content.
pub const BINARY_SNIFF_LEN: usize = 8000;

/// Why a changed file is not fixed. Informational, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in the non-ignored on-disk listing
    Ignored,
    /// Content classified as binary
    Binary,
    /// Already ends with a line terminator
    AlreadyTerminated,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::Ignored => "ignored",
            SkipReason::Binary => "binary",
            SkipReason::AlreadyTerminated => "already terminated",
        };
        f.write_str(s)
    }
}

/// Outcome of filtering one changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Text content read from the working copy
    Eligible(String),
    Skip(SkipReason),
}

/// Classify raw bytes. `None` means binary.
///
/// Binary means a NUL byte among the first [`BINARY_SNIFF_LEN`] bytes or
/// content that is not valid UTF-8.
pub fn classify_text(bytes: Vec<u8>) -> Option<String> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return None;
    }
    String::from_utf8(bytes).ok()
}

/// Repository files not excluded by the ignore patterns.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    listing: HashSet<String>,
}

impl PathFilter {
    /// Walk `root` once and keep every file whose repo-relative path matches
    /// no ignore pattern. Dotfiles and everything under a dot-directory
    /// (`.git/`, `.github/`) are never listed.
    pub fn scan(root: &Path, ignore: &GlobSet) -> Result<Self> {
        let mut listing = HashSet::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = to_slash(relative);
            if !ignore.is_match(&relative) {
                listing.insert(relative);
            }
        }

        Ok(PathFilter {
            root: root.to_path_buf(),
            listing,
        })
    }

    /// Whether `filename` is in the non-ignored listing.
    pub fn is_listed(&self, filename: &str) -> bool {
        self.listing.contains(filename)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.listing.len()
    }

    /// Decide whether a changed file is eligible, reading its content if so.
    pub async fn check(&self, filename: &str) -> Result<Eligibility> {
        if !self.is_listed(filename) {
            return Ok(Eligibility::Skip(SkipReason::Ignored));
        }
        let path = self.root.join(filename);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| NewlineError::io(&path, e))?;
        Ok(match classify_text(bytes) {
            Some(text) => Eligibility::Eligible(text),
            None => Eligibility::Skip(SkipReason::Binary),
        })
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
