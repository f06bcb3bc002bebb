//! Path validation functions

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::ValidationError;

/// Lexically normalize a path: drop `.` components and fold `..` into its parent
///
/// No filesystem access; symlinks are not resolved.
pub fn normalize_lexically(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if !out.pop() {
					out.push("..");
				}
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}

/// Check if path is within a root directory
///
/// Both sides are normalized lexically first, so `root/./a` and `root/` compare
/// the way their common path would.
///
/// # Arguments
/// * `path` - Path to check
/// * `root` - Root directory that path should be within
pub fn is_path_within_root(path: &Path, root: &Path) -> bool {
	normalize_lexically(path).starts_with(normalize_lexically(root))
}

/// Validate that path is within root directory
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<(), ValidationError> {
	if !is_path_within_root(path, root) {
		return Err(ValidationError::PathError(format!(
			"Path {:?} is outside root directory {:?}",
			path, root
		)));
	}
	Ok(())
}

/// True when both paths exist and name the same file (hard links and symlinks included)
pub fn is_same_file(a: &Path, b: &Path) -> bool {
	match (fs::metadata(a), fs::metadata(b)) {
		(Ok(meta_a), Ok(meta_b)) => same_identity(a, b, &meta_a, &meta_b),
		_ => false,
	}
}

#[cfg(unix)]
fn same_identity(_a: &Path, _b: &Path, meta_a: &fs::Metadata, meta_b: &fs::Metadata) -> bool {
	use std::os::unix::fs::MetadataExt;
	meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino()
}

#[cfg(not(unix))]
fn same_identity(a: &Path, b: &Path, _meta_a: &fs::Metadata, _meta_b: &fs::Metadata) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => false,
	}
}

/// Refuse to copy a file onto itself
///
/// `fs::copy` truncates its target before reading the source, so copying a
/// file onto itself would leave it empty.
pub fn ensure_distinct_files(src: &Path, dst: &Path) -> io::Result<()> {
	if is_same_file(src, dst) {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("{} and {} are the same file", src.display(), dst.display()),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_path_within_root_true() {
		let root = Path::new("/home/user/sync");
		assert!(is_path_within_root(Path::new("/home/user/sync/file.txt"), root));
		assert!(is_path_within_root(Path::new("/home/user/sync/dir/file.txt"), root));
		assert!(is_path_within_root(Path::new("/home/user/sync"), root));
	}

	#[test]
	fn test_is_path_within_root_false() {
		let root = Path::new("/home/user/sync");
		assert!(!is_path_within_root(Path::new("/home/user/other/file.txt"), root));
		// Component-wise, not a string prefix
		assert!(!is_path_within_root(Path::new("/home/user/sync2/file.txt"), root));
	}

	#[test]
	fn test_is_path_within_root_normalizes() {
		assert!(is_path_within_root(Path::new("./src1/a.txt"), Path::new("src1/")));
		assert!(is_path_within_root(Path::new("src1/x/../a.txt"), Path::new("src1")));
		assert!(!is_path_within_root(Path::new("src1/../src2/a.txt"), Path::new("src1")));
	}

	#[test]
	fn test_validate_path_within_root_err() {
		let result = validate_path_within_root(Path::new("/etc/passwd"), Path::new("/home"));
		assert!(result.unwrap_err().to_string().contains("outside root"));
	}

	#[test]
	fn test_same_file_detection() {
		let dir = tempfile::TempDir::new().unwrap();
		let a = dir.path().join("a.txt");
		let b = dir.path().join("b.txt");
		fs::write(&a, "same").unwrap();
		fs::write(&b, "same").unwrap();

		assert!(is_same_file(&a, &a));
		assert!(is_same_file(&a, &dir.path().join("./a.txt")));
		// Equal content is not enough
		assert!(!is_same_file(&a, &b));
		// Nothing is the same as a missing file
		assert!(!is_same_file(&a, &dir.path().join("missing")));

		let err = ensure_distinct_files(&a, &a).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
		assert!(ensure_distinct_files(&a, &b).is_ok());
	}

	#[cfg(unix)]
	#[test]
	fn test_hard_link_is_same_file() {
		let dir = tempfile::TempDir::new().unwrap();
		let a = dir.path().join("a.txt");
		let link = dir.path().join("link.txt");
		fs::write(&a, "data").unwrap();
		fs::hard_link(&a, &link).unwrap();
		assert!(is_same_file(&a, &link));
	}
}

// vim: ts=4
