//! Single-file copy execution
//!
//! [`execute`] runs one [`CopyTask`] to completion on the calling thread:
//! conflict check, resolver call, directory creation and the copy itself.
//! Failures are caught and returned inside the [`CopyReport`]; nothing here
//! aborts the batch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::conflict::{versioned_path, ConflictAction, ConflictResolver};
use crate::strategies::VersionNaming;
use crate::types::{CopyFailure, RunSummary};
use crate::validation::ensure_distinct_files;

/// One unit of copy work submitted by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
	/// File to copy
	pub src: PathBuf,
	/// Plain destination path (destination root joined with the relative path)
	pub dst: PathBuf,
	/// Number of missing destination directories this task is the first to need
	pub new_dirs: usize,
}

/// Options shared by every task of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
	/// Count actions without touching the filesystem
	pub dry_run: bool,
	/// Naming scheme for keep-both outputs
	pub naming: VersionNaming,
}

/// Local result of one task, folded into the run summary after the task joins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
	pub files_copied: usize,
	pub directories_created: usize,
	pub conflict: Option<PathBuf>,
	pub errors: Vec<CopyFailure>,
}

impl CopyReport {
	/// Add this report's counts and lists to `summary`
	pub fn fold_into(self, summary: &mut RunSummary) {
		summary.files_copied += self.files_copied;
		summary.directories_created += self.directories_created;
		summary.conflicts.extend(self.conflict);
		summary.errors.extend(self.errors);
	}
}

/// Per-task state: the report plus whether the parent directory is in place yet
struct Execution<'a> {
	task: &'a CopyTask,
	options: CopyOptions,
	report: CopyReport,
	dirs_ready: bool,
}

impl Execution<'_> {
	fn fail(&mut self, src: &Path, dst: &Path, err: io::Error) {
		warn!("Failed to copy {} -> {}: {}", src.display(), dst.display(), err);
		self.report.errors.push(CopyFailure {
			src: src.to_path_buf(),
			dst: dst.to_path_buf(),
			error: err.to_string(),
		});
	}

	/// Make sure the destination directory exists, counting it once
	fn ensure_parent(&mut self) -> io::Result<()> {
		if self.dirs_ready {
			return Ok(());
		}
		if !self.options.dry_run {
			if let Some(parent) = self.task.dst.parent() {
				// Other tasks may be creating the same chain; create_dir_all tolerates that
				fs::create_dir_all(parent)?;
			}
		}
		self.report.directories_created += self.task.new_dirs;
		self.dirs_ready = true;
		Ok(())
	}

	fn copy(&mut self, src: &Path, dst: &Path) -> io::Result<()> {
		ensure_distinct_files(src, dst)?;
		self.ensure_parent()?;
		if !self.options.dry_run {
			fs::copy(src, dst)?;
		}
		debug!(
			"{} {} -> {}",
			if self.options.dry_run { "Would copy" } else { "Copied" },
			src.display(),
			dst.display()
		);
		self.report.files_copied += 1;
		Ok(())
	}

	/// Copy every kept path to its `_vN` name, then drop the plain destination
	///
	/// A `_vN` name that is already taken (for instance by a source file that
	/// is itself called `a_v1.txt`) is overwritten. Because the plain name is
	/// gone afterwards, a later hash run sees no conflict there and copies the
	/// source back under it; the run after that is a no-op again.
	fn keep_all(&mut self, paths: &[PathBuf]) {
		let dst = self.task.dst.clone();
		let src = self.task.src.clone();

		// A source root that is also the destination: the occupant is the source itself
		if let Err(e) = ensure_distinct_files(&src, &dst) {
			self.fail(&src, &dst, e);
			return;
		}

		for (i, path) in paths.iter().enumerate() {
			let versioned = versioned_path(&dst, i + 1, self.options.naming);
			if versioned.exists() {
				debug!("Overwriting existing {}", versioned.display());
			}
			if let Err(e) = self.copy(path, &versioned) {
				self.fail(path, &versioned, e);
				return;
			}
		}

		// The occupant now lives on under its versioned name
		if !self.options.dry_run && paths.iter().any(|p| *p == dst) {
			if let Err(e) = fs::remove_file(&dst) {
				self.fail(&dst, &dst, e);
			}
		}
	}

	fn run(&mut self, resolver: &ConflictResolver) {
		let mut src = self.task.src.clone();
		let dst = self.task.dst.clone();

		if dst.exists() {
			match resolver.resolve(&src, &dst) {
				Ok(ConflictAction::Skip) => {
					debug!("Conflict skipped: {}", dst.display());
					self.report.conflict = Some(dst);
					return;
				}
				Ok(ConflictAction::KeepBoth(paths)) => {
					debug!("Keeping {} versions of {}", paths.len(), dst.display());
					self.keep_all(&paths);
					return;
				}
				Ok(ConflictAction::Replace(winner)) => {
					debug!("Replacing {} with {}", dst.display(), winner.display());
					src = winner;
				}
				Err(e) => {
					self.fail(&src, &dst, e);
					return;
				}
			}
		}

		if let Err(e) = self.copy(&src, &dst) {
			self.fail(&src, &dst, e);
		}
	}
}

/// Run one copy task and report what happened
///
/// In dry-run mode the destination is still inspected (and the resolver still
/// reads files) but nothing is created, copied or removed; counts are reported
/// as if it had been.
pub fn execute(task: &CopyTask, resolver: &ConflictResolver, options: CopyOptions) -> CopyReport {
	let mut execution = Execution { task, options, report: CopyReport::default(), dirs_ready: false };
	execution.run(resolver);
	execution.report
}


// vim: ts=4
