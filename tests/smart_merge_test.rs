//! Pairwise smart merge tests
//!
//! This test suite covers:
//! - Direction selection (the folder missing more files receives)
//! - Tie handling
//! - Overwrite of shared files
//! - Folders that are already in sync

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use mergedirs::error::MergeError;
use mergedirs::scan::relative_paths;
use mergedirs::smart_merge;

// ============================================================================
// Helper Functions for Test Setup
// ============================================================================

fn create_test_file(dir: &Path, name: &str, content: &str) {
	let file_path = dir.join(name);
	if let Some(parent) = file_path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(file_path, content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
	fs::read_to_string(dir.join(name)).unwrap()
}

// ============================================================================
// Direction
// ============================================================================

#[test]
fn test_b_receives_when_it_lacks_more() {
	let a = TempDir::new().unwrap();
	let b = TempDir::new().unwrap();
	create_test_file(a.path(), "f1", "a1");
	create_test_file(a.path(), "f2", "a2");
	create_test_file(a.path(), "sub/f3", "a3");
	create_test_file(b.path(), "f1", "b1");
	create_test_file(b.path(), "only_b", "b");

	let outcome = smart_merge(a.path(), b.path(), false).unwrap();

	assert_eq!(outcome.source, a.path());
	assert_eq!(outcome.target, b.path());
	assert_eq!(outcome.copied, vec![PathBuf::from("f2"), PathBuf::from("sub/f3")]);
	assert!(outcome.overwritten.is_empty());
	assert_eq!(read(b.path(), "sub/f3"), "a3");
	// Shared file untouched without overwrite
	assert_eq!(read(b.path(), "f1"), "b1");
	// One direction only: A never receives
	assert!(!a.path().join("only_b").exists());
}

#[test]
fn test_tie_copies_from_first_into_second() {
	let a = TempDir::new().unwrap();
	let b = TempDir::new().unwrap();
	create_test_file(a.path(), "only_a", "a");
	create_test_file(b.path(), "only_b", "b");

	let outcome = smart_merge(a.path(), b.path(), false).unwrap();

	assert_eq!(outcome.source, a.path());
	assert_eq!(outcome.target, b.path());
	assert_eq!(read(b.path(), "only_a"), "a");
	assert!(!a.path().join("only_b").exists());
}

// ============================================================================
// Overwrite
// ============================================================================

#[test]
fn test_overwrite_replaces_shared_files_in_target() {
	let a = TempDir::new().unwrap();
	let b = TempDir::new().unwrap();
	create_test_file(a.path(), "shared.txt", "from a");
	create_test_file(b.path(), "shared.txt", "from b");
	create_test_file(b.path(), "extra.txt", "b only");

	// A lacks one file, B lacks none: B is the source
	let outcome = smart_merge(a.path(), b.path(), true).unwrap();

	assert_eq!(outcome.source, b.path());
	assert_eq!(outcome.copied, vec![PathBuf::from("extra.txt")]);
	assert_eq!(outcome.overwritten, vec![PathBuf::from("shared.txt")]);
	assert_eq!(read(a.path(), "shared.txt"), "from b");
	assert_eq!(read(a.path(), "extra.txt"), "b only");
}

#[test]
fn test_in_sync_folders_copy_nothing() {
	let a = TempDir::new().unwrap();
	let b = TempDir::new().unwrap();
	create_test_file(a.path(), "x/y.txt", "same");
	create_test_file(b.path(), "x/y.txt", "same");

	let outcome = smart_merge(a.path(), b.path(), false).unwrap();

	assert!(outcome.copied.is_empty());
	assert!(outcome.overwritten.is_empty());
	assert_eq!(relative_paths(a.path()).unwrap(), relative_paths(b.path()).unwrap());
}

#[test]
fn test_outcome_display() {
	let a = TempDir::new().unwrap();
	let b = TempDir::new().unwrap();
	create_test_file(a.path(), "f", "1");

	let outcome = smart_merge(a.path(), b.path(), false).unwrap();
	let line = outcome.to_string();
	assert!(line.ends_with(": 1 copied, 0 overwritten"), "got: {}", line);
}

// ============================================================================
// Same folder twice
// ============================================================================

#[test]
fn test_same_folder_with_overwrite_fails_without_truncating() {
	let a = TempDir::new().unwrap();
	create_test_file(a.path(), "f1", "data");

	let result = smart_merge(a.path(), a.path(), true);

	assert!(matches!(result, Err(MergeError::Io(_))));
	assert_eq!(read(a.path(), "f1"), "data");
}

#[test]
fn test_same_folder_without_overwrite_is_a_no_op() {
	let a = TempDir::new().unwrap();
	create_test_file(a.path(), "f1", "data");

	let outcome = smart_merge(a.path(), a.path(), false).unwrap();

	assert!(outcome.copied.is_empty());
	assert_eq!(read(a.path(), "f1"), "data");
}
