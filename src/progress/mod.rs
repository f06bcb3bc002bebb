//! Progress display callback for the CLI
//!
//! Renders [`ProgressStats`] as a single, redrawn stderr line.

pub mod constants;

use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

use crate::callbacks::{ProgressCallback, ProgressStats};

/// Progress display constants
pub use constants::*;

/// CLI progress callback - draws a bar with percentage and ETA
pub struct CliProgress {
	last_update: Mutex<Option<Instant>>,
}

impl CliProgress {
	pub fn new() -> Self {
		Self { last_update: Mutex::new(None) }
	}
}

impl Default for CliProgress {
	fn default() -> Self {
		Self::new()
	}
}

/// Format one progress line, without the leading carriage return
pub fn render_line(stats: &ProgressStats) -> String {
	let ratio = (stats.percent() / 100.0).clamp(0.0, 1.0);
	let filled = (ratio * PROGRESS_BAR_WIDTH as f64) as usize;
	format!(
		"Progress: [{}{}] {:.2}% ({}/{}) | Estimated Time Remaining: {:.2}s",
		"=".repeat(filled),
		" ".repeat(PROGRESS_BAR_WIDTH - filled),
		stats.percent(),
		stats.files_processed,
		stats.files_total,
		stats.eta.as_secs_f64()
	)
}

impl ProgressCallback for CliProgress {
	fn on_progress(&self, stats: ProgressStats) {
		let complete = stats.is_complete();
		{
			let mut last = self.last_update.lock().unwrap_or_else(|e| e.into_inner());
			// Throttle redraws, but always draw the final line
			if let Some(prev) = *last {
				if !complete && prev.elapsed().as_millis() < UPDATE_THROTTLE_MS {
					return;
				}
			}
			*last = Some(Instant::now());
		}

		let mut stderr = std::io::stderr();
		let _ = write!(stderr, "\r  {}", render_line(&stats));
		if complete {
			let _ = writeln!(stderr);
		}
		let _ = stderr.flush();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn test_render_line_half_done() {
		let stats = ProgressStats::new(5, 10, Duration::from_secs(5));
		let line = render_line(&stats);
		assert!(line.contains("50.00%"));
		assert!(line.contains("(5/10)"));
		assert!(line.contains("5.00s"));
		assert!(line.contains(&"=".repeat(PROGRESS_BAR_WIDTH / 2)));
	}

	#[test]
	fn test_render_line_overshoot_is_clamped() {
		let stats = ProgressStats::new(12, 10, Duration::from_secs(1));
		let line = render_line(&stats);
		assert!(line.contains("100.00%"));
		assert!(line.contains(&"=".repeat(PROGRESS_BAR_WIDTH)));
	}
}

// vim: ts=4
