//! Final report and editor feedback types.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::research::EnrichedSource;

/// The report artifact. Each revision produces a new value with a bumped
/// `iterations` counter; reports are never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub title: String,
    /// Full markdown body
    pub content: String,
    /// Union of sources across all findings
    #[serde(default)]
    pub sources: Vec<EnrichedSource>,
    /// 1 + number of completed revisions
    pub iterations: u32,
}

impl FinalReport {
    /// Write the markdown body to `path`, appending a `.md` extension when
    /// the path has none. Returns the path actually written.
    pub fn save_markdown(&self, path: &Path) -> io::Result<PathBuf> {
        let path = if path.extension().is_none() {
            path.with_extension("md")
        } else {
            path.to_path_buf()
        };
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// One review verdict from the editor. Consumed to decide loop
/// continuation and to build the revision brief; not retained beyond that
/// iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorFeedback {
    pub approved: bool,
    /// Quality score, 1-10
    pub score: u8,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl EditorFeedback {
    pub fn score_in_range(&self) -> bool {
        (1..=10).contains(&self.score)
    }
}
