//! Filename normalization for console folders.
//!
//! Dump names carry tags that the frontend should not display:
//! ```text
//! Super_Mario_Bros (USA) [!].nes  ->  Super Mario Bros.nes
//! ```
//! Normalization is split into a read-only planning step and an execution
//! step, so every collision in a folder is known before anything is renamed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use romdb_core::split_extension;
use thiserror::Error;

use crate::scanner::list_regular_files;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Cannot read console folder {}: {source}", dir.display())]
    MissingDirectory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Rename collision in {}: {} would all become {target:?}", dir.display(), sources.join(", "))]
    Collision {
        dir: PathBuf,
        target: String,
        sources: Vec<String>,
    },
    #[error("Failed to rename {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The name contains no `.` to split an extension from.
    NoExtension,
    /// Every character of the stem was inside a tag or whitespace.
    EmptyStem,
    /// The name is not valid UTF-8.
    NonUtf8,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoExtension => write!(f, "no extension"),
            Self::EmptyStem => write!(f, "name is empty after normalization"),
            Self::NonUtf8 => write!(f, "name is not valid UTF-8"),
        }
    }
}

/// A file that normalization leaves untouched.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: SkipReason,
}

/// A planned in-place rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameAction {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Result of planning normalization for one folder.
#[derive(Debug, Clone)]
pub struct NormalizePlan {
    pub dir: PathBuf,
    pub renames: Vec<RenameAction>,
    /// Files whose names are already normalized.
    pub unchanged: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl NormalizePlan {
    /// Normalized filenames once the plan is executed, sorted.
    ///
    /// Skipped files stay on disk but are not listed, so they never reach
    /// the catalog.
    pub fn final_filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .renames
            .iter()
            .filter_map(|r| r.target.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .chain(self.unchanged.iter().cloned())
            .collect();
        names.sort();
        names
    }
}

/// Counts from an executed plan, plus the resulting filenames.
#[derive(Debug, Clone, Default)]
pub struct NormalizeSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub filenames: Vec<String>,
}

/// Normalize a filename stem.
///
/// Removes every `( … )` and `[ … ]` group (nested groups go whole, an
/// opener with no closer is kept), turns underscores into spaces and trims
/// trailing whitespace. Removal repeats until nothing changes, so the
/// result is a fixed point and normalizing twice equals normalizing once.
pub fn normalize_stem(stem: &str) -> String {
    let mut current = strip_groups(stem);
    loop {
        let next = strip_groups(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current.replace('_', " ").trim_end().to_string()
}

/// Normalize a full filename, keeping its extension.
pub fn normalize_filename(filename: &str) -> Result<String, SkipReason> {
    let (stem, ext) = split_extension(filename).ok_or(SkipReason::NoExtension)?;
    let stem = normalize_stem(stem);
    if stem.is_empty() {
        return Err(SkipReason::EmptyStem);
    }
    Ok(format!("{}.{}", stem, ext))
}

/// Plan renames for every regular file in `dir` without touching the disk.
///
/// Fails with [`NormalizeError::Collision`] when two files (including one
/// that already carries the name) would end up with the same target.
pub fn plan_normalization(dir: &Path) -> Result<NormalizePlan, NormalizeError> {
    let entries = list_regular_files(dir).map_err(|source| NormalizeError::MissingDirectory {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut renames = Vec::new();
    let mut unchanged = Vec::new();
    let mut skipped = Vec::new();
    let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in entries {
        let Some(filename) = entry.to_str() else {
            let lossy = entry.to_string_lossy().into_owned();
            log::warn!("Skipping {}: {}", lossy, SkipReason::NonUtf8);
            skipped.push(SkippedFile {
                filename: lossy,
                reason: SkipReason::NonUtf8,
            });
            continue;
        };

        let target = match normalize_filename(filename) {
            Ok(target) => target,
            Err(reason) => {
                log::warn!("Skipping {}: {}", dir.join(filename).display(), reason);
                skipped.push(SkippedFile {
                    filename: filename.to_string(),
                    reason,
                });
                continue;
            }
        };

        claims
            .entry(target.clone())
            .or_default()
            .push(filename.to_string());

        if target == filename {
            unchanged.push(target);
        } else {
            renames.push(RenameAction {
                source: dir.join(filename),
                target: dir.join(&target),
            });
        }
    }

    if let Some((target, sources)) = claims.into_iter().find(|(_, s)| s.len() > 1) {
        return Err(NormalizeError::Collision {
            dir: dir.to_path_buf(),
            target,
            sources,
        });
    }

    Ok(NormalizePlan {
        dir: dir.to_path_buf(),
        renames,
        unchanged,
        skipped,
    })
}

/// Perform the renames of a plan.
///
/// A target that appeared since planning is reported as a collision and
/// never overwritten. Renames done before the error stay on disk.
pub fn execute_normalization(plan: &NormalizePlan) -> Result<NormalizeSummary, NormalizeError> {
    for rename in &plan.renames {
        if rename.target.exists() {
            return Err(NormalizeError::Collision {
                dir: plan.dir.clone(),
                target: file_name_string(&rename.target),
                sources: vec![file_name_string(&rename.source)],
            });
        }
        fs::rename(&rename.source, &rename.target).map_err(|source| NormalizeError::Rename {
            from: rename.source.clone(),
            to: rename.target.clone(),
            source,
        })?;
        log::debug!(
            "Renamed {:?} -> {:?}",
            rename.source.file_name().unwrap_or_default(),
            rename.target.file_name().unwrap_or_default(),
        );
    }

    Ok(NormalizeSummary {
        renamed: plan.renames.len(),
        unchanged: plan.unchanged.len(),
        skipped: plan.skipped.len(),
        filenames: plan.final_filenames(),
    })
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// One pass of group removal.
fn strip_groups(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(ch) = rest.chars().next() {
        let close = match ch {
            '(' => Some(')'),
            '[' => Some(']'),
            _ => None,
        };
        if let Some(len) = close.and_then(|close| group_len(rest, ch, close)) {
            rest = &rest[len..];
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Byte length of the group that opens at the start of `s`, delimiters
/// included, or `None` if it is never closed.
fn group_len(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0u32;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i + c.len_utf8());
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
