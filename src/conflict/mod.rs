//! Conflict detection and resolution
//!
//! A conflict exists when a file is about to be copied to a destination path
//! that is already occupied. The [`ConflictResolver`] decides what happens via
//! a [`ConflictAction`].

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::strategies::VersionNaming;

pub mod resolver;

pub use resolver::{file_digest, ConflictResolver};

/// Outcome of resolving one conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
	/// Files are equivalent or the incoming file lost; nothing is copied
	Skip,

	/// Copy this path over the plain destination
	Replace(PathBuf),

	/// Keep every listed path under its own `_vN` destination, in order
	KeepBoth(Vec<PathBuf>),
}

impl ConflictAction {
	/// Number of files this action would copy
	pub fn copy_count(&self) -> usize {
		match self {
			ConflictAction::Skip => 0,
			ConflictAction::Replace(_) => 1,
			ConflictAction::KeepBoth(paths) => paths.len(),
		}
	}
}

/// Destination name for the `version`-th kept file (1-based)
///
/// Names are built on `OsStr` so non-UTF-8 file names survive intact. Existing
/// files at the returned path are not checked for.
pub fn versioned_path(dst: &Path, version: usize, naming: VersionNaming) -> PathBuf {
	let marker = format!("_v{}", version);
	match naming {
		VersionNaming::FixedWidth => match dst.to_str() {
			Some(full) => {
				// Count characters, not bytes, so multi-byte names split cleanly
				let split = full
					.char_indices()
					.rev()
					.nth(3)
					.map(|(i, _)| i)
					.unwrap_or(0);
				PathBuf::from(format!("{}{}{}", &full[..split], marker, &full[split..]))
			}
			None => splice_raw(dst.as_os_str(), &marker),
		},
		VersionNaming::Extension => {
			let mut name = OsString::new();
			if let Some(stem) = dst.file_stem() {
				name.push(stem);
			}
			name.push(&marker);
			if let Some(ext) = dst.extension() {
				name.push(".");
				name.push(ext);
			}
			dst.with_file_name(name)
		}
	}
}

/// Fixed-width splice on the raw bytes of a name that is not valid UTF-8
#[cfg(unix)]
fn splice_raw(full: &OsStr, marker: &str) -> PathBuf {
	use std::os::unix::ffi::{OsStrExt, OsStringExt};
	let bytes = full.as_bytes();
	let split = bytes.len().saturating_sub(4);
	let mut out = Vec::with_capacity(bytes.len() + marker.len());
	out.extend_from_slice(&bytes[..split]);
	out.extend_from_slice(marker.as_bytes());
	out.extend_from_slice(&bytes[split..]);
	PathBuf::from(OsString::from_vec(out))
}

#[cfg(not(unix))]
fn splice_raw(full: &OsStr, marker: &str) -> PathBuf {
	let lossy = full.to_string_lossy();
	let split = lossy.char_indices().rev().nth(3).map(|(i, _)| i).unwrap_or(0);
	PathBuf::from(format!("{}{}{}", &lossy[..split], marker, &lossy[split..]))
}


// vim: ts=4
