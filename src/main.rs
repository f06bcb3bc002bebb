use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mergedirs::callbacks::ProgressCallback;
use mergedirs::config::MergeConfig;
use mergedirs::logging::init_tracing;
use mergedirs::progress::CliProgress;
use mergedirs::{merge, smart_merge};

fn cli() -> Command {
	Command::new("mergedirs")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Merge multiple directories into a destination directory")
		.subcommand_required(true)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.global(true)
				.value_name("LEVEL")
				.help("Log level when RUST_LOG is unset (trace, debug, info, warn, error)"),
		)
		.subcommand(
			Command::new("merge")
				.about("Merge source directories into a destination directory")
				.arg(
					Arg::new("config")
						.short('c')
						.long("config")
						.value_name("FILE")
						.help("TOML or JSON5 config file; flags override its values"),
				)
				.arg(
					Arg::new("src")
						.long("src")
						.value_name("DIR")
						.num_args(1..)
						.action(ArgAction::Append)
						.help("Source directories, in precedence order"),
				)
				.arg(
					Arg::new("dst")
						.long("dst")
						.value_name("DIR")
						.help("Destination directory"),
				)
				.arg(
					Arg::new("resolver")
						.short('r')
						.long("resolver")
						.value_name("NAME")
						.help("Conflict resolver: hash (default), keep-both, preferred-source"),
				)
				.arg(
					Arg::new("resolver-arg")
						.long("resolver-arg")
						.value_name("KEY=VALUE")
						.action(ArgAction::Append)
						.help("Resolver option, e.g. preferred_src=/path/to/src"),
				)
				.arg(
					Arg::new("log-file")
						.long("log-file")
						.value_name("FILE")
						.help("Write the JSON run summary to this file (overwritten)"),
				)
				.arg(
					Arg::new("dry-run")
						.long("dry-run")
						.action(ArgAction::SetTrue)
						.help("Report what would be copied without touching the filesystem"),
				)
				.arg(
					Arg::new("threads")
						.short('j')
						.long("threads")
						.value_name("N")
						.value_parser(value_parser!(usize))
						.help("Number of parallel copy workers (default 4)"),
				)
				.arg(
					Arg::new("progress")
						.long("progress")
						.action(ArgAction::SetTrue)
						.help("Show live progress on stderr"),
				)
				.arg(
					Arg::new("version-naming")
						.long("version-naming")
						.value_name("MODE")
						.help("Names for kept duplicates: fixed-width (default) or extension"),
				),
		)
		.subcommand(
			Command::new("smart")
				.about("Fill the gaps of one folder from the other")
				.arg(Arg::new("folder_a").required(true))
				.arg(Arg::new("folder_b").required(true))
				.arg(
					Arg::new("overwrite")
						.long("overwrite")
						.action(ArgAction::SetTrue)
						.help("Also replace files present in both with the source's version"),
				),
		)
}

/// Layer the merge flags over the (possibly file-loaded) config
fn merge_config(matches: &ArgMatches) -> Result<MergeConfig, Box<dyn Error>> {
	let mut config = match matches.get_one::<String>("config") {
		Some(path) => MergeConfig::load(Path::new(path))?,
		None => MergeConfig::default(),
	};

	if let Some(sources) = matches.get_many::<String>("src") {
		config.sources = sources.map(PathBuf::from).collect();
	}
	if let Some(dst) = matches.get_one::<String>("dst") {
		config.destination = Some(PathBuf::from(dst));
	}
	if let Some(resolver) = matches.get_one::<String>("resolver") {
		config.resolver = resolver.parse()?;
	}
	if let Some(args) = matches.get_many::<String>("resolver-arg") {
		for arg in args {
			config.set_resolver_arg(arg)?;
		}
	}
	if let Some(log_file) = matches.get_one::<String>("log-file") {
		config.summary_log = Some(PathBuf::from(log_file));
	}
	if matches.get_flag("dry-run") {
		config.dry_run = true;
	}
	if let Some(threads) = matches.get_one::<usize>("threads") {
		config.num_threads = *threads;
	}
	if matches.get_flag("progress") {
		config.show_progress = true;
	}
	if let Some(naming) = matches.get_one::<String>("version-naming") {
		config.version_naming = naming.parse()?;
	}
	if let Some(level) = matches.get_one::<String>("log-level") {
		config.log_level = level.clone();
	}
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = cli().get_matches();

	if let Some(sub_matches) = matches.subcommand_matches("merge") {
		let config = merge_config(sub_matches)?;
		init_tracing(&config.log_level);

		let progress: Option<Arc<dyn ProgressCallback>> =
			if config.show_progress { Some(Arc::new(CliProgress::new())) } else { None };
		let summary = merge(&config, progress).await?;

		println!("Merge operation completed. Summary: {}", summary);
		for failure in &summary.errors {
			eprintln!(
				"  error: {} -> {}: {}",
				failure.src.display(),
				failure.dst.display(),
				failure.error
			);
		}
	} else if let Some(sub_matches) = matches.subcommand_matches("smart") {
		let level = sub_matches.get_one::<String>("log-level").map(|s| s.as_str()).unwrap_or("info");
		init_tracing(level);

		let folder_a = sub_matches.get_one::<String>("folder_a").ok_or("smart: folder_a required")?;
		let folder_b = sub_matches.get_one::<String>("folder_b").ok_or("smart: folder_b required")?;
		let outcome =
			smart_merge(Path::new(folder_a), Path::new(folder_b), sub_matches.get_flag("overwrite"))?;
		println!("Smart merge completed: {}", outcome);
	}

	Ok(())
}


// vim: ts=4
