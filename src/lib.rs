//! # mergedirs - Merge Directory Trees
//!
//! Copies the files of several source trees into one destination tree. The
//! first source that has a given relative path wins; a file that collides
//! with something already at the destination goes through a pluggable
//! [`conflict::ConflictResolver`]. Copies run on a bounded worker pool and
//! every outcome is collected into a [`types::RunSummary`].
//!
//! A separate two-folder mode, [`smart::smart_merge`], fills the gaps of one
//! folder from the other.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mergedirs::merge::MergeBuilder;
//! use mergedirs::strategies::ResolverKind;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = MergeBuilder::new()
//!         .add_source("./photos-laptop")
//!         .add_source("./photos-phone")
//!         .destination("./photos")
//!         .resolver(ResolverKind::Hash)
//!         .merge()
//!         .await?;
//!     println!("Copied {} files", summary.files_copied);
//!     Ok(())
//! }
//! ```

pub mod callbacks;
pub mod config;
pub mod conflict;
pub mod error;
pub mod executor;
pub mod logging;
pub mod merge;
pub mod progress;
pub mod scan;
pub mod smart;
pub mod strategies;
pub mod types;
pub mod validation;

// Re-export commonly used types and functions
pub use config::MergeConfig;
pub use conflict::{ConflictAction, ConflictResolver};
pub use error::MergeError;
pub use merge::{merge, merge_directories, MergeBuilder, MergeOptions};
pub use smart::{smart_merge, PairwiseOutcome};
pub use types::{CopyFailure, FileEntry, RunSummary};

// vim: ts=4
