//! Directory tree enumeration
//!
//! [`FileWalker`] lazily walks a root and yields one [`FileEntry`] per regular
//! file. Directories are read one at a time, entries sorted by name, so the
//! order is stable across runs on an unchanged tree: files of a directory
//! first, then its subdirectories depth-first.
//!
//! Symlinks pointing at regular files are yielded like files; symlinked
//! directories are not descended into. Empty directories yield nothing.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::MergeError;
use crate::types::FileEntry;

/// Lazy, non-restartable walk over the regular files below one root
#[derive(Debug)]
pub struct FileWalker {
	root: PathBuf,
	/// Files of the most recently read directory, not yet yielded
	ready: VecDeque<FileEntry>,
	/// Directories still to read, relative to `root`
	pending: Vec<PathBuf>,
}

impl FileWalker {
	/// Open a walk over `root`
	///
	/// The root itself is read eagerly so that a missing or unreadable root
	/// fails here instead of silently producing an empty walk.
	pub fn new(root: impl Into<PathBuf>) -> Result<Self, MergeError> {
		let root = root.into();
		let meta = fs::metadata(&root)
			.map_err(|source| MergeError::Traversal { root: root.clone(), source })?;
		if !meta.is_dir() {
			return Err(MergeError::Traversal {
				source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
				root,
			});
		}

		let mut walker = FileWalker { root, ready: VecDeque::new(), pending: Vec::new() };
		walker
			.read_dir(PathBuf::new())
			.map_err(|source| MergeError::Traversal { root: walker.root.clone(), source })?;
		Ok(walker)
	}

	/// Root this walker was opened on
	pub fn root(&self) -> &Path {
		&self.root
	}

	fn read_dir(&mut self, relative_dir: PathBuf) -> io::Result<()> {
		let dir = self.root.join(&relative_dir);
		let mut entries = fs::read_dir(&dir)?.collect::<Result<Vec<_>, _>>()?;
		entries.sort_by_key(|e| e.file_name());

		let mut subdirs = Vec::new();
		for entry in entries {
			let relative = relative_dir.join(entry.file_name());
			let file_type = match entry.file_type() {
				Ok(t) => t,
				Err(e) => {
					debug!("Cannot stat {}: {}", entry.path().display(), e);
					continue;
				}
			};

			let is_file = if file_type.is_symlink() {
				// Follow the link only to classify it
				match fs::metadata(entry.path()) {
					Ok(target) => target.is_file(),
					Err(e) => {
						debug!("Skipping dangling symlink {}: {}", entry.path().display(), e);
						false
					}
				}
			} else if file_type.is_dir() {
				subdirs.push(relative);
				continue;
			} else {
				file_type.is_file()
			};

			if is_file {
				self.ready.push_back(FileEntry { absolute: self.root.join(&relative), relative });
			}
		}

		// Reverse so the stack pops subdirectories in name order
		self.pending.extend(subdirs.into_iter().rev());
		Ok(())
	}
}

impl Iterator for FileWalker {
	type Item = FileEntry;

	fn next(&mut self) -> Option<FileEntry> {
		loop {
			if let Some(entry) = self.ready.pop_front() {
				return Some(entry);
			}
			let dir = self.pending.pop()?;
			if let Err(e) = self.read_dir(dir.clone()) {
				warn!("Skipping unreadable directory {}: {}", self.root.join(&dir).display(), e);
			}
		}
	}
}

/// Collect the relative paths of every regular file below `root`
pub fn relative_paths(root: &Path) -> Result<std::collections::BTreeSet<PathBuf>, MergeError> {
	Ok(FileWalker::new(root)?.map(|e| e.relative).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn create_file(dir: &Path, name: &str, content: &str) {
		let path = dir.join(name);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		fs::write(path, content).unwrap();
	}

	#[test]
	fn test_walk_yields_relative_and_absolute() {
		let dir = TempDir::new().unwrap();
		create_file(dir.path(), "file1.txt", "Hello");
		create_file(dir.path(), "folder/file2.txt", "World");

		let entries: Vec<FileEntry> = FileWalker::new(dir.path()).unwrap().collect();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].relative, PathBuf::from("file1.txt"));
		assert_eq!(entries[0].absolute, dir.path().join("file1.txt"));
		assert_eq!(entries[1].relative, PathBuf::from("folder/file2.txt"));
		assert_eq!(entries[1].absolute, dir.path().join("folder/file2.txt"));
	}

	#[test]
	fn test_walk_order_files_before_subdirs() {
		let dir = TempDir::new().unwrap();
		create_file(dir.path(), "b/inner.txt", "x");
		create_file(dir.path(), "a/inner.txt", "x");
		create_file(dir.path(), "z.txt", "x");

		let rel: Vec<PathBuf> = FileWalker::new(dir.path()).unwrap().map(|e| e.relative).collect();
		assert_eq!(
			rel,
			vec![PathBuf::from("z.txt"), PathBuf::from("a/inner.txt"), PathBuf::from("b/inner.txt")]
		);
	}

	#[test]
	fn test_empty_directories_yield_nothing() {
		let dir = TempDir::new().unwrap();
		fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
		assert_eq!(FileWalker::new(dir.path()).unwrap().count(), 0);
	}

	#[test]
	fn test_missing_root_fails_immediately() {
		let dir = TempDir::new().unwrap();
		let missing = dir.path().join("nope");
		let err = FileWalker::new(&missing).unwrap_err();
		assert!(matches!(err, MergeError::Traversal { .. }));
	}

	#[test]
	fn test_file_root_is_rejected() {
		let dir = TempDir::new().unwrap();
		create_file(dir.path(), "plain.txt", "x");
		assert!(FileWalker::new(dir.path().join("plain.txt")).is_err());
	}

	#[cfg(unix)]
	#[test]
	fn test_symlink_to_file_is_yielded_dir_link_is_not_followed() {
		let dir = TempDir::new().unwrap();
		create_file(dir.path(), "real/data.txt", "x");
		std::os::unix::fs::symlink(dir.path().join("real/data.txt"), dir.path().join("link.txt"))
			.unwrap();
		std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linkdir")).unwrap();
		std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

		let rel = relative_paths(dir.path()).unwrap();
		assert!(rel.contains(Path::new("link.txt")));
		assert!(rel.contains(Path::new("real/data.txt")));
		assert!(!rel.contains(Path::new("linkdir/data.txt")));
		assert!(!rel.contains(Path::new("dangling")));
		assert_eq!(rel.len(), 2);
	}
}

// vim: ts=4
