//! N-way merge orchestration
//!
//! One blocking planner thread walks the source roots in order, claims each
//! relative path for the first root that has it, and hands [`CopyTask`]s to the
//! async coordinator over a bounded channel. The coordinator runs each task on
//! the blocking pool, at most `num_threads` at a time, and folds every task's
//! [`CopyReport`] into the [`RunSummary`] as it joins. `merge` returns once every
//! submitted task has finished.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::callbacks::{ProgressCallback, ProgressStats};
use crate::config::MergeConfig;
use crate::conflict::ConflictResolver;
use crate::error::MergeError;
use crate::executor::{execute, CopyOptions, CopyReport, CopyTask};
use crate::scan::FileWalker;
use crate::strategies::{ResolverKind, VersionNaming};
use crate::types::{FileEntry, RunSummary};
use crate::validation::Validator;

/// Everything a run needs besides its trees and resolver
#[derive(Clone, Default)]
pub struct MergeOptions {
	pub dry_run: bool,
	pub num_threads: usize,
	pub naming: VersionNaming,
	pub summary_log: Option<PathBuf>,
	pub progress: Option<Arc<dyn ProgressCallback>>,
	pub progress_interval: Duration,
}

impl std::fmt::Debug for MergeOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MergeOptions")
			.field("dry_run", &self.dry_run)
			.field("num_threads", &self.num_threads)
			.field("naming", &self.naming)
			.field("summary_log", &self.summary_log)
			.field("progress", &self.progress.is_some())
			.field("progress_interval", &self.progress_interval)
			.finish()
	}
}

// ============================================================================
// PLANNING
// ============================================================================

/// Claims relative paths and destination directories; runs on one thread only
struct Planner {
	destination: PathBuf,
	claimed: HashSet<PathBuf>,
	/// Destination directories that exist or that an earlier task will create
	known_dirs: HashSet<PathBuf>,
}

impl Planner {
	fn new(destination: PathBuf) -> Self {
		Planner { destination, claimed: HashSet::new(), known_dirs: HashSet::new() }
	}

	/// Turn an enumerated file into a task, or None if an earlier root claimed it
	fn plan(&mut self, entry: FileEntry) -> Option<CopyTask> {
		if !self.claimed.insert(entry.relative.clone()) {
			debug!("Already claimed by an earlier source: {}", entry.absolute.display());
			return None;
		}
		let dst = self.destination.join(&entry.relative);
		let new_dirs = match dst.parent() {
			Some(parent) => self.claim_dirs(parent),
			None => 0,
		};
		Some(CopyTask { src: entry.absolute, dst, new_dirs })
	}

	/// Count the directories from `dir` upwards that neither exist nor are planned
	fn claim_dirs(&mut self, dir: &Path) -> usize {
		let mut missing = 0;
		let mut current = Some(dir);
		while let Some(d) = current {
			if d.as_os_str().is_empty() || !self.known_dirs.insert(d.to_path_buf()) {
				break;
			}
			if d.is_dir() {
				break;
			}
			missing += 1;
			current = d.parent();
		}
		missing
	}
}

/// Open a walker per source root; any unusable root fails the whole run
fn open_walkers(sources: &[PathBuf]) -> Result<Vec<FileWalker>, MergeError> {
	sources.iter().map(FileWalker::new).collect()
}

/// Number of tasks a run over `sources` will submit
fn count_distinct(sources: &[PathBuf]) -> Result<usize, MergeError> {
	let mut seen = HashSet::new();
	for walker in open_walkers(sources)? {
		seen.extend(walker.map(|e| e.relative));
	}
	Ok(seen.len())
}

/// Walk all roots in order and feed unclaimed files to the coordinator
fn produce(walkers: Vec<FileWalker>, mut planner: Planner, tx: mpsc::Sender<CopyTask>) -> usize {
	let mut submitted = 0;
	for entry in walkers.into_iter().flatten() {
		if let Some(task) = planner.plan(entry) {
			if tx.blocking_send(task).is_err() {
				// Coordinator bailed out
				break;
			}
			submitted += 1;
		}
	}
	submitted
}

// ============================================================================
// PROGRESS
// ============================================================================

struct Reporter {
	handle: JoinHandle<()>,
	callback: Arc<dyn ProgressCallback>,
	completed: Arc<AtomicUsize>,
	total: usize,
	started: Instant,
}

impl Reporter {
	fn spawn(
		callback: Arc<dyn ProgressCallback>,
		completed: Arc<AtomicUsize>,
		total: usize,
		interval: Duration,
		started: Instant,
	) -> Self {
		let (cb, done) = (callback.clone(), completed.clone());
		let handle = tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
			ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
			loop {
				ticker.tick().await;
				let processed = done.load(Ordering::Relaxed);
				cb.on_progress(ProgressStats::new(processed, total.max(processed), started.elapsed()));
			}
		});
		Reporter { handle, callback, completed, total, started }
	}

	/// Stop sampling and emit one final update
	fn finish(self) {
		self.handle.abort();
		let processed = self.completed.load(Ordering::Relaxed);
		self.callback.on_progress(ProgressStats::new(
			processed,
			self.total.max(processed),
			self.started.elapsed(),
		));
	}
}

// ============================================================================
// MERGE
// ============================================================================

/// Merge `sources` into `destination` using `resolver` for occupied paths
///
/// Returns Err only for problems that prevent the run as a whole (an unusable
/// source root, a bad option, a crashed worker). Per-file failures land in
/// [`RunSummary::errors`].
pub async fn merge_directories(
	sources: &[PathBuf],
	destination: &Path,
	resolver: ConflictResolver,
	options: MergeOptions,
) -> Result<RunSummary, MergeError> {
	crate::validation::validate_sources(sources)?;
	crate::validation::validate_num_threads(options.num_threads)?;

	info!(
		"Merging {} source(s) into {} (resolver: {}, threads: {}{})",
		sources.len(),
		destination.display(),
		resolver.kind(),
		options.num_threads,
		if options.dry_run { ", dry run" } else { "" }
	);

	let started = Instant::now();
	let owned_sources = sources.to_vec();
	let walkers = tokio::task::spawn_blocking(move || open_walkers(&owned_sources)).await??;

	let completed = Arc::new(AtomicUsize::new(0));
	let reporter = match options.progress.clone() {
		Some(callback) => {
			let owned_sources = sources.to_vec();
			let total = tokio::task::spawn_blocking(move || count_distinct(&owned_sources)).await??;
			Some(Reporter::spawn(callback, completed.clone(), total, options.progress_interval, started))
		}
		None => None,
	};

	let (tx, mut rx) = mpsc::channel::<CopyTask>(options.num_threads * 2);
	let planner = Planner::new(destination.to_path_buf());
	let producer = tokio::task::spawn_blocking(move || produce(walkers, planner, tx));

	let resolver = Arc::new(resolver);
	let copy_options = CopyOptions { dry_run: options.dry_run, naming: options.naming };
	let semaphore = Arc::new(Semaphore::new(options.num_threads));
	let mut workers: JoinSet<CopyReport> = JoinSet::new();
	let mut summary = RunSummary::new();

	while let Some(task) = rx.recv().await {
		let permit = semaphore
			.clone()
			.acquire_owned()
			.await
			.map_err(|e| MergeError::Task { message: e.to_string() })?;
		let resolver = resolver.clone();
		let completed = completed.clone();
		workers.spawn_blocking(move || {
			let report = execute(&task, &resolver, copy_options);
			completed.fetch_add(1, Ordering::Relaxed);
			drop(permit);
			report
		});

		while let Some(joined) = workers.try_join_next() {
			joined?.fold_into(&mut summary);
		}
	}

	while let Some(joined) = workers.join_next().await {
		joined?.fold_into(&mut summary);
	}
	let submitted = producer.await?;

	if let Some(reporter) = reporter {
		reporter.finish();
	}

	debug!("{} task(s) submitted in {:.2?}", submitted, started.elapsed());
	info!("Merge operation completed. Summary: {}", summary);

	if let Some(path) = &options.summary_log {
		if let Err(e) = write_summary_log(&summary, path).await {
			warn!("Cannot write summary log {}: {}", path.display(), e);
		}
	}

	Ok(summary)
}

/// Merge as described by a config: validates it and builds its resolver first
pub async fn merge(
	config: &MergeConfig,
	progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<RunSummary, MergeError> {
	config.validate()?;
	let resolver = config.build_resolver()?;
	let destination = config.destination.clone().ok_or_else(|| MergeError::InvalidConfig {
		message: "destination directory is required".to_string(),
	})?;

	let options = MergeOptions {
		dry_run: config.dry_run,
		num_threads: config.num_threads,
		naming: config.version_naming,
		summary_log: config.summary_log.clone(),
		progress,
		progress_interval: Duration::from_millis(config.progress_interval_ms),
	};
	merge_directories(&config.sources, &destination, resolver, options).await
}

/// Persist the summary as pretty JSON at `path`, replacing any existing file
pub async fn write_summary_log(summary: &RunSummary, path: &Path) -> Result<(), MergeError> {
	let json = summary.to_json().map_err(|e| MergeError::Other { message: e.to_string() })?;
	tokio::fs::write(path, json).await?;
	Ok(())
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent front end over [`merge`]
pub struct MergeBuilder {
	config: MergeConfig,
	progress: Option<Arc<dyn ProgressCallback>>,
}

impl MergeBuilder {
	pub fn new() -> Self {
		Self::from_config(MergeConfig::default())
	}

	/// Start from an existing config (e.g. one loaded from a file)
	pub fn from_config(config: MergeConfig) -> Self {
		MergeBuilder { config, progress: None }
	}

	pub fn add_source(mut self, source: impl Into<PathBuf>) -> Self {
		self.config.sources.push(source.into());
		self
	}

	pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
		self.config.destination = Some(destination.into());
		self
	}

	pub fn resolver(mut self, kind: ResolverKind) -> Self {
		self.config.resolver = kind;
		self
	}

	pub fn resolver_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.config.resolver_options.insert(key.into(), value.into());
		self
	}

	pub fn version_naming(mut self, naming: VersionNaming) -> Self {
		self.config.version_naming = naming;
		self
	}

	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.config.dry_run = dry_run;
		self
	}

	pub fn num_threads(mut self, num_threads: usize) -> Self {
		self.config.num_threads = num_threads;
		self
	}

	pub fn summary_log(mut self, path: impl Into<PathBuf>) -> Self {
		self.config.summary_log = Some(path.into());
		self
	}

	pub fn on_progress(mut self, callback: impl ProgressCallback + 'static) -> Self {
		self.progress = Some(Arc::new(callback));
		self
	}

	pub fn config(&self) -> &MergeConfig {
		&self.config
	}

	pub async fn merge(self) -> Result<RunSummary, MergeError> {
		merge(&self.config, self.progress).await
	}
}

impl Default for MergeBuilder {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
