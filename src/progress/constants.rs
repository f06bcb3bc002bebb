//! Progress display constants

/// Width of the progress bar display
pub const PROGRESS_BAR_WIDTH: usize = 30;

/// Minimum time between two redraws of the progress line
pub const UPDATE_THROTTLE_MS: u128 = 100;

/// Default interval at which the merge reporter samples progress
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;
