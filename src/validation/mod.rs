//! Checks run before a merge touches the filesystem
//!
//! [`config`] rejects settings a run cannot start with (no sources, no
//! destination, an unusable worker count). [`path`] answers the path questions
//! resolvers and copiers ask: is this file under that root, and are these two
//! paths really the same file.

use std::error::Error;
use std::fmt;

pub mod config;
pub mod path;

pub use config::*;
pub use path::*;

/// Why a merge setting or path was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// A merge setting is missing or out of range
	ConfigError(String),
	/// A path lies outside the root it must stay under
	PathError(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
			ValidationError::PathError(msg) => write!(f, "Path validation error: {}", msg),
		}
	}
}

impl Error for ValidationError {}

/// Implemented by settings that can be checked up front
pub trait Validator {
	fn validate(&self) -> Result<(), ValidationError>;
}


// vim: ts=4
