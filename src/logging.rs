//! Tracing setup for the command line tool
//!
//! Library code logs through the `tracing` macros directly; only the binary
//! installs a subscriber.

/// Initialize the tracing subscriber with environment filter support.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (from config or CLI)
/// is used. Output goes to stderr so stdout stays free for the summary line.
///
/// ```bash
/// RUST_LOG=debug mergedirs merge --src a b --dst out
/// RUST_LOG=mergedirs::executor=debug mergedirs merge --src a b --dst out
/// ```
pub fn init_tracing(default_level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
