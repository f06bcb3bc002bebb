//! Core data types shared by the enumerator, executor and orchestrator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A regular file discovered under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
	/// Path relative to the root it was found under (the join key across roots)
	pub relative: PathBuf,
	/// Path as reachable from the caller (root joined with `relative`)
	pub absolute: PathBuf,
}

/// A per-file failure recorded during a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFailure {
	pub src: PathBuf,
	pub dst: PathBuf,
	pub error: String,
}

/// Aggregate outcome of one merge invocation
///
/// Created empty per run, folded from worker reports after each task joins,
/// and returned to the caller. Serializes to the four-field summary record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
	pub files_copied: usize,
	pub directories_created: usize,
	/// Destination paths left untouched because the resolver chose to skip
	pub conflicts: Vec<PathBuf>,
	pub errors: Vec<CopyFailure>,
}

impl RunSummary {
	pub fn new() -> Self {
		Self::default()
	}

	/// True when no per-file error was recorded
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}

	/// Serialize as the pretty-printed JSON summary record
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}
}

/// One-line form: counts, the skipped destination paths, and the error count
/// (error details are reported separately)
impl fmt::Display for RunSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{{files_copied: {}, directories_created: {}, conflicts: [",
			self.files_copied, self.directories_created
		)?;
		for (i, path) in self.conflicts.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", path.display())?;
		}
		write!(f, "], errors: {}}}", self.errors.len())
	}
}


// vim: ts=4
