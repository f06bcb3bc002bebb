//! Error types for merge operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::validation::ValidationError;

/// Main error type for merge operations
///
/// Per-file copy failures are not represented here: they are collected into
/// [`crate::types::RunSummary::errors`] and never abort a run.
#[derive(Debug)]
pub enum MergeError {
	/// A root directory is missing, not a directory, or unreadable
	Traversal { root: PathBuf, source: io::Error },

	/// Invalid configuration (resolver options, thread count, config file)
	InvalidConfig { message: String },

	/// I/O error
	Io(io::Error),

	/// A worker task panicked or was cancelled
	Task { message: String },

	/// Generic error message
	Other { message: String },
}

impl fmt::Display for MergeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MergeError::Traversal { root, source } => {
				write!(f, "Cannot traverse {}: {}", root.display(), source)
			}
			MergeError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			MergeError::Io(e) => write!(f, "I/O error: {}", e),
			MergeError::Task { message } => write!(f, "Worker task failed: {}", message),
			MergeError::Other { message } => write!(f, "{}", message),
		}
	}
}

impl Error for MergeError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			MergeError::Traversal { source, .. } => Some(source),
			MergeError::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for MergeError {
	fn from(e: io::Error) -> Self {
		MergeError::Io(e)
	}
}

impl From<String> for MergeError {
	fn from(e: String) -> Self {
		MergeError::Other { message: e }
	}
}

impl From<ValidationError> for MergeError {
	fn from(e: ValidationError) -> Self {
		MergeError::InvalidConfig { message: e.to_string() }
	}
}

impl From<tokio::task::JoinError> for MergeError {
	fn from(e: tokio::task::JoinError) -> Self {
		MergeError::Task { message: e.to_string() }
	}
}


// vim: ts=4
