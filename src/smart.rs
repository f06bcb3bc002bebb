//! Two-folder "smart" merge
//!
//! Compares the relative file sets of exactly two folders and copies the
//! deficit in one direction only: into the folder that is missing more files,
//! from the other one. On a tie the first folder is the source. With
//! `overwrite`, every file present in both is also re-copied from source to
//! target.
//!
//! Runs synchronously and stops at the first I/O error. Copying a file onto
//! itself (the same folder passed twice, or overlapping folders) is such an
//! error and leaves the file untouched.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::MergeError;
use crate::scan::relative_paths;
use crate::validation::ensure_distinct_files;

/// Which way a pairwise merge copied, and how much
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseOutcome {
	/// Folder files were copied from
	pub source: PathBuf,
	/// Folder that received the files
	pub target: PathBuf,
	/// Relative paths copied because the target lacked them
	pub copied: Vec<PathBuf>,
	/// Relative paths present in both and replaced by the source's version
	pub overwritten: Vec<PathBuf>,
}

impl fmt::Display for PairwiseOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} -> {}: {} copied, {} overwritten",
			self.source.display(),
			self.target.display(),
			self.copied.len(),
			self.overwritten.len()
		)
	}
}

/// True when the first folder is the copy source
///
/// The first folder becomes the target only when it is missing strictly more
/// files than the second.
pub fn copy_from_first(missing_in_a: usize, missing_in_b: usize) -> bool {
	missing_in_a <= missing_in_b
}

fn copy_relative(source: &Path, target: &Path, relative: &Path) -> Result<(), MergeError> {
	let from = source.join(relative);
	let to = target.join(relative);
	ensure_distinct_files(&from, &to)?;
	if let Some(parent) = to.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::copy(&from, &to)?;
	debug!("Copied {} -> {}", from.display(), to.display());
	Ok(())
}

/// Merge two folders pairwise, see the module docs for the direction rule
pub fn smart_merge(
	folder_a: &Path,
	folder_b: &Path,
	overwrite: bool,
) -> Result<PairwiseOutcome, MergeError> {
	let files_a = relative_paths(folder_a)?;
	let files_b = relative_paths(folder_b)?;

	let missing_in_a: BTreeSet<&PathBuf> = files_b.difference(&files_a).collect();
	let missing_in_b: BTreeSet<&PathBuf> = files_a.difference(&files_b).collect();

	let (source, target, deficit) = if copy_from_first(missing_in_a.len(), missing_in_b.len()) {
		(folder_a, folder_b, missing_in_b)
	} else {
		(folder_b, folder_a, missing_in_a)
	};
	info!(
		"Smart merge {} -> {} ({} missing file(s){})",
		source.display(),
		target.display(),
		deficit.len(),
		if overwrite { ", overwriting shared files" } else { "" }
	);

	let mut outcome = PairwiseOutcome {
		source: source.to_path_buf(),
		target: target.to_path_buf(),
		copied: Vec::with_capacity(deficit.len()),
		overwritten: Vec::new(),
	};

	for relative in deficit {
		copy_relative(source, target, relative)?;
		outcome.copied.push(relative.clone());
	}

	if overwrite {
		for relative in files_a.intersection(&files_b) {
			copy_relative(source, target, relative)?;
			outcome.overwritten.push(relative.clone());
		}
	}

	Ok(outcome)
}


// vim: ts=4
