//! Merge configuration
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (MergeConfig::default())
//! 2. Config file (`--config`, TOML or JSON/JSON5 by extension)
//! 3. CLI flags (highest priority)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::conflict::ConflictResolver;
use crate::error::MergeError;
use crate::progress::DEFAULT_PROGRESS_INTERVAL_MS;
use crate::strategies::{ResolverKind, VersionNaming};
use crate::validation::{
	validate_destination, validate_num_threads, validate_sources, ValidationError, Validator,
};

/// Resolver option naming the preferred source root
pub const PREFERRED_SRC_KEY: &str = "preferred_src";

/// Default size of the copy worker pool
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Configuration for one merge invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeConfig {
	// ========================================================================
	// TREES
	// ========================================================================
	/// Source roots, in precedence order (first occurrence of a relative path wins)
	pub sources: Vec<PathBuf>,

	/// Destination root
	pub destination: Option<PathBuf>,

	// ========================================================================
	// CONFLICT RESOLUTION
	// ========================================================================
	/// Resolver used when the destination path is already occupied
	pub resolver: ResolverKind,

	/// Free-form resolver options (`preferred_src` for preferred-source)
	pub resolver_options: BTreeMap<String, String>,

	/// How keep-both outputs are named
	pub version_naming: VersionNaming,

	// ========================================================================
	// EXECUTION
	// ========================================================================
	/// Report what would happen without touching the filesystem
	pub dry_run: bool,

	/// Number of parallel copy workers
	pub num_threads: usize,

	// ========================================================================
	// OUTPUT & LOGGING
	// ========================================================================
	/// Where to write the JSON run summary (overwritten)
	pub summary_log: Option<PathBuf>,

	/// Show live progress
	pub show_progress: bool,

	/// Progress sampling interval in milliseconds
	pub progress_interval_ms: u64,

	/// Log level (trace, debug, info, warn, error)
	pub log_level: String,
}

impl Default for MergeConfig {
	fn default() -> Self {
		MergeConfig {
			sources: vec![],
			destination: None,
			resolver: ResolverKind::Hash,
			resolver_options: BTreeMap::new(),
			version_naming: VersionNaming::FixedWidth,
			dry_run: false,
			num_threads: DEFAULT_NUM_THREADS,
			summary_log: None,
			show_progress: false,
			progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
			log_level: "info".to_string(),
		}
	}
}

impl MergeConfig {
	/// Load a config file; `.json`/`.json5` are parsed as JSON5, anything else as TOML
	pub fn load(path: &Path) -> Result<Self, MergeError> {
		let contents = fs::read_to_string(path)?;
		let is_json = matches!(
			path.extension().and_then(|e| e.to_str()),
			Some("json") | Some("json5")
		);

		let parsed = if is_json {
			json5::from_str(&contents).map_err(|e| e.to_string())
		} else {
			toml::from_str(&contents).map_err(|e| e.to_string())
		};
		parsed.map_err(|message| MergeError::InvalidConfig {
			message: format!("{}: {}", path.display(), message),
		})
	}

	/// Parse a `key=value` resolver argument and store it
	pub fn set_resolver_arg(&mut self, arg: &str) -> Result<(), MergeError> {
		match arg.split_once('=') {
			Some((key, value)) if !key.is_empty() => {
				self.resolver_options.insert(key.to_string(), value.to_string());
				Ok(())
			}
			_ => Err(MergeError::InvalidConfig {
				message: format!("resolver argument must be key=value, got '{}'", arg),
			}),
		}
	}

	/// Build the conflict resolver named by `resolver` from `resolver_options`
	///
	/// Fails before any copying when a required option is missing.
	pub fn build_resolver(&self) -> Result<ConflictResolver, MergeError> {
		let known: &[&str] = match self.resolver {
			ResolverKind::Hash | ResolverKind::KeepBoth => &[],
			ResolverKind::PreferredSource => &[PREFERRED_SRC_KEY],
		};
		for key in self.resolver_options.keys() {
			if !known.contains(&key.as_str()) {
				warn!("Ignoring option '{}' for resolver {}", key, self.resolver);
			}
		}

		match self.resolver {
			ResolverKind::Hash => Ok(ConflictResolver::Hash),
			ResolverKind::KeepBoth => Ok(ConflictResolver::KeepBoth),
			ResolverKind::PreferredSource => {
				let root = self.resolver_options.get(PREFERRED_SRC_KEY).ok_or_else(|| {
					MergeError::InvalidConfig {
						message: format!(
							"resolver preferred-source requires option {}=<dir>",
							PREFERRED_SRC_KEY
						),
					}
				})?;
				Ok(ConflictResolver::PreferredSource { root: PathBuf::from(root) })
			}
		}
	}
}

impl Validator for MergeConfig {
	fn validate(&self) -> Result<(), ValidationError> {
		validate_sources(&self.sources)?;
		validate_destination(self.destination.as_ref())?;
		validate_num_threads(self.num_threads)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_config_default() {
		let config = MergeConfig::default();
		assert_eq!(config.num_threads, 4);
		assert_eq!(config.resolver, ResolverKind::Hash);
		assert_eq!(config.version_naming, VersionNaming::FixedWidth);
		assert!(!config.dry_run);
		assert!(config.summary_log.is_none());
	}

	#[test]
	fn test_load_toml() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("merge.toml");
		fs::write(
			&path,
			r#"
sources = ["a", "b"]
destination = "out"
resolver = "preferred-source"
numThreads = 8
dryRun = true

[resolverOptions]
preferred_src = "b"
"#,
		)
		.unwrap();

		let config = MergeConfig::load(&path).unwrap();
		assert_eq!(config.sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
		assert_eq!(config.destination, Some(PathBuf::from("out")));
		assert_eq!(config.num_threads, 8);
		assert!(config.dry_run);
		assert_eq!(
			config.build_resolver().unwrap(),
			ConflictResolver::PreferredSource { root: PathBuf::from("b") }
		);
	}

	#[test]
	fn test_load_json5() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("merge.json");
		fs::write(
			&path,
			r#"{
				// comments are allowed
				sources: ["src1"],
				destination: "dst",
				resolver: "keep-both",
				versionNaming: "extension",
			}"#,
		)
		.unwrap();

		let config = MergeConfig::load(&path).unwrap();
		assert_eq!(config.resolver, ResolverKind::KeepBoth);
		assert_eq!(config.version_naming, VersionNaming::Extension);
		assert_eq!(config.num_threads, DEFAULT_NUM_THREADS);
	}

	#[test]
	fn test_load_rejects_garbage() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("merge.toml");
		fs::write(&path, "resolver = \"newest\"").unwrap();
		assert!(matches!(MergeConfig::load(&path), Err(MergeError::InvalidConfig { .. })));
	}

	#[test]
	fn test_preferred_source_requires_option() {
		let config = MergeConfig { resolver: ResolverKind::PreferredSource, ..Default::default() };
		assert!(matches!(config.build_resolver(), Err(MergeError::InvalidConfig { .. })));
	}

	#[test]
	fn test_set_resolver_arg() {
		let mut config = MergeConfig::default();
		config.set_resolver_arg("preferred_src=/data/a=b").unwrap();
		assert_eq!(config.resolver_options["preferred_src"], "/data/a=b");
		assert!(config.set_resolver_arg("novalue").is_err());
		assert!(config.set_resolver_arg("=x").is_err());
	}

	#[test]
	fn test_validate() {
		let mut config = MergeConfig::default();
		assert!(config.validate().is_err());
		config.sources.push(PathBuf::from("a"));
		assert!(config.validate().is_err());
		config.destination = Some(PathBuf::from("b"));
		assert!(config.validate().is_ok());
		config.num_threads = 0;
		assert!(config.validate().is_err());
	}
}

// vim: ts=4
