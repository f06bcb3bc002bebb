//! Strategy and mode enums
//!
//! Names used on the command line and in config files. Each enum carries
//! `FromStr` for CLI parsing and kebab-case serde for config files.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// RESOLVER KIND
// ============================================================================

/// Which conflict resolver to build for a merge
///
/// This is only the name; the resolver with its typed configuration is
/// [`crate::conflict::ConflictResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
	/// Compare SHA-256 digests; identical files are skipped, different ones kept both
	#[default]
	Hash,

	/// Always keep both files under versioned names
	KeepBoth,

	/// Only files from the `preferred_src` root may replace an existing file
	PreferredSource,
}

impl FromStr for ResolverKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().replace('_', "-").as_str() {
			"hash" | "resolve-conflict-by-hash" => Ok(Self::Hash),
			"keep-both" | "keep-both-files" => Ok(Self::KeepBoth),
			"preferred-source" | "preferred-src" | "keep-files-from-preferred-src" => {
				Ok(Self::PreferredSource)
			}
			_ => Err(format!(
				"Unknown conflict resolver: {}. Valid options: hash, keep-both, preferred-source",
				s
			)),
		}
	}
}

impl std::fmt::Display for ResolverKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Hash => write!(f, "hash"),
			Self::KeepBoth => write!(f, "keep-both"),
			Self::PreferredSource => write!(f, "preferred-source"),
		}
	}
}

// ============================================================================
// VERSION NAMING
// ============================================================================

/// How `_vN` is spliced into a destination name when both files are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VersionNaming {
	/// Insert four characters before the end of the path (`a.txt` -> `a_v1.txt`).
	/// Names whose extension is not three characters come out garbled:
	/// `x.jpeg` -> `x._v1jpeg`, `notes.md` -> `note_v1s.md`.
	#[default]
	FixedWidth,

	/// Insert before the real last extension of the file name, or append when there is none
	Extension,
}

impl FromStr for VersionNaming {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"fixed-width" | "fixed" | "compat" => Ok(Self::FixedWidth),
			"extension" | "ext" => Ok(Self::Extension),
			_ => Err(format!(
				"Unknown version naming: {}. Valid options: fixed-width, extension",
				s
			)),
		}
	}
}

impl std::fmt::Display for VersionNaming {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::FixedWidth => write!(f, "fixed-width"),
			Self::Extension => write!(f, "extension"),
		}
	}
}


// vim: ts=4
