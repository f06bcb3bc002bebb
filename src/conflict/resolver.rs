//! Conflict resolution logic

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ConflictAction;
use crate::strategies::ResolverKind;
use crate::validation::is_path_within_root;

/// Resolves a collision between an incoming source file and an occupied destination
///
/// Stateless apart from its own configuration, so one instance is shared by
/// every copy worker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConflictResolver {
	/// Skip identical content, keep both when the SHA-256 digests differ
	#[default]
	Hash,

	/// Keep both files regardless of content
	KeepBoth,

	/// Only a source lying under `root` may replace the destination
	PreferredSource { root: PathBuf },
}

impl ConflictResolver {
	/// Decide what to do with `src` now that `dst` already exists
	///
	/// Only the hash strategy touches the disk; its read errors propagate so
	/// the caller can record them against this file.
	pub fn resolve(&self, src: &Path, dst: &Path) -> io::Result<ConflictAction> {
		match self {
			ConflictResolver::Hash => {
				let src_hash = file_digest(src)?;
				let dst_hash = file_digest(dst)?;
				if src_hash == dst_hash {
					debug!("Identical content at {} ({})", dst.display(), src_hash);
					Ok(ConflictAction::Skip)
				} else {
					Ok(ConflictAction::KeepBoth(vec![src.to_path_buf(), dst.to_path_buf()]))
				}
			}

			ConflictResolver::KeepBoth => {
				Ok(ConflictAction::KeepBoth(vec![src.to_path_buf(), dst.to_path_buf()]))
			}

			ConflictResolver::PreferredSource { root } => {
				if is_path_within_root(src, root) {
					Ok(ConflictAction::Replace(src.to_path_buf()))
				} else {
					Ok(ConflictAction::Skip)
				}
			}
		}
	}

	/// The configuration name of this resolver
	pub fn kind(&self) -> ResolverKind {
		match self {
			ConflictResolver::Hash => ResolverKind::Hash,
			ConflictResolver::KeepBoth => ResolverKind::KeepBoth,
			ConflictResolver::PreferredSource { .. } => ResolverKind::PreferredSource,
		}
	}

	/// Get a human-readable description of the strategy
	pub fn description(&self) -> &'static str {
		match self {
			ConflictResolver::Hash => "Skip identical files, keep both when content differs",
			ConflictResolver::KeepBoth => "Keep both files under versioned names",
			ConflictResolver::PreferredSource { .. } => "Only the preferred source may overwrite",
		}
	}
}

/// Hex-encoded SHA-256 of a file's full content
pub fn file_digest(path: &Path) -> io::Result<String> {
	let mut file = File::open(path)?;
	let mut hasher = Sha256::new();
	io::copy(&mut file, &mut hasher)?;
	Ok(hex::encode(hasher.finalize()))
}


// vim: ts=4
