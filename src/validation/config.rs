//! Configuration validation functions

use std::path::PathBuf;

use super::ValidationError;

/// Upper bound on worker threads; beyond this the copy pool only adds contention
pub const MAX_THREADS: usize = 512;

/// Validate the size of the copy worker pool
pub fn validate_num_threads(num_threads: usize) -> Result<(), ValidationError> {
	if num_threads == 0 {
		return Err(ValidationError::ConfigError(
			"numThreads must be at least 1".to_string(),
		));
	}
	if num_threads > MAX_THREADS {
		return Err(ValidationError::ConfigError(format!(
			"numThreads too high: {} (max {})",
			num_threads, MAX_THREADS
		)));
	}
	Ok(())
}

/// Validate that at least one source root was given
pub fn validate_sources(sources: &[PathBuf]) -> Result<(), ValidationError> {
	if sources.is_empty() {
		return Err(ValidationError::ConfigError(
			"at least one source directory is required".to_string(),
		));
	}
	Ok(())
}

/// Validate that a destination root was given
pub fn validate_destination(destination: Option<&PathBuf>) -> Result<(), ValidationError> {
	match destination {
		Some(dst) if !dst.as_os_str().is_empty() => Ok(()),
		_ => Err(ValidationError::ConfigError("destination directory is required".to_string())),
	}
}


// vim: ts=4
