//! Callback traits for progress reporting

use std::time::Duration;

/// Progress statistics during a merge
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
	/// Copy tasks finished so far
	pub files_processed: usize,

	/// Total copy tasks expected (distinct relative paths across all sources)
	pub files_total: usize,

	/// Elapsed time since start
	pub elapsed: Duration,

	/// Estimated time remaining
	pub eta: Duration,
}

impl ProgressStats {
	/// Derive percentage and ETA from a completion count and elapsed time
	///
	/// ETA is the mean time per finished task times the tasks still
	/// outstanding; zero until the first task finishes.
	pub fn new(files_processed: usize, files_total: usize, elapsed: Duration) -> Self {
		let remaining = files_total.saturating_sub(files_processed);
		let eta = if files_processed > 0 {
			elapsed.mul_f64(remaining as f64 / files_processed as f64)
		} else {
			Duration::ZERO
		};
		ProgressStats { files_processed, files_total, elapsed, eta }
	}

	/// Completion in percent, 100 for an empty run
	pub fn percent(&self) -> f64 {
		if self.files_total == 0 {
			return 100.0;
		}
		(self.files_processed as f64 / self.files_total as f64 * 100.0).min(100.0)
	}

	pub fn is_complete(&self) -> bool {
		self.files_processed >= self.files_total
	}
}

/// Callback for progress updates
pub trait ProgressCallback: Send + Sync {
	/// Called periodically with progress statistics
	fn on_progress(&self, stats: ProgressStats);
}

impl<T: Fn(ProgressStats) + Send + Sync> ProgressCallback for T {
	fn on_progress(&self, stats: ProgressStats) {
		self(stats);
	}
}

/// Default progress callback that does nothing
pub struct NoProgressCallback;

impl ProgressCallback for NoProgressCallback {
	fn on_progress(&self, _stats: ProgressStats) {}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	#[test]
	fn test_eta_from_mean_task_time() {
		let stats = ProgressStats::new(2, 10, Duration::from_secs(4));
		assert_eq!(stats.eta, Duration::from_secs(16));
		assert!((stats.percent() - 20.0).abs() < f64::EPSILON);
		assert!(!stats.is_complete());
	}

	#[test]
	fn test_no_eta_before_first_completion() {
		let stats = ProgressStats::new(0, 10, Duration::from_secs(4));
		assert_eq!(stats.eta, Duration::ZERO);
		assert_eq!(stats.percent(), 0.0);
	}

	#[test]
	fn test_empty_run_is_complete() {
		let stats = ProgressStats::new(0, 0, Duration::ZERO);
		assert_eq!(stats.percent(), 100.0);
		assert!(stats.is_complete());
	}

	#[test]
	fn test_closure_is_a_callback() {
		let seen = Mutex::new(Vec::new());
		let callback = |stats: ProgressStats| seen.lock().unwrap().push(stats.files_processed);
		callback.on_progress(ProgressStats::new(3, 5, Duration::ZERO));
		assert_eq!(*seen.lock().unwrap(), vec![3]);
	}
}

// vim: ts=4
