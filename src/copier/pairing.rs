use std::path::{Path, PathBuf};
use crate::{Result, TagCopyError};

/// Extensions offered by the file dialogs.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "m4a", "mp4", "ogg", "oga", "opus", "wav", "wma", "aac", "aif", "aiff", "ape",
    "wv", "mpc", "spx",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Source/destination pairs, validated once when built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairList {
    pairs: Vec<FilePair>,
}

impl PairList {
    /// Zip two selections into pairs. Both must be non-empty and of equal length.
    pub fn new(sources: Vec<PathBuf>, destinations: Vec<PathBuf>) -> Result<Self> {
        if sources.is_empty() {
            return Err(TagCopyError::NoFilesSelected("source"));
        }
        if destinations.is_empty() {
            return Err(TagCopyError::NoFilesSelected("destination"));
        }
        if sources.len() != destinations.len() {
            return Err(TagCopyError::CountMismatch {
                sources: sources.len(),
                destinations: destinations.len(),
            });
        }

        let pairs = sources
            .into_iter()
            .zip(destinations)
            .map(|(source, destination)| {
                Ok(FilePair {
                    source: absolute(&source)?,
                    destination: absolute(&destination)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { pairs })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilePair> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a PairList {
    type Item = &'a FilePair;
    type IntoIter = std::slice::Iter<'a, FilePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    // Canonical path when the file exists, otherwise anchor to the cwd
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return Ok(canonical);
    }
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
