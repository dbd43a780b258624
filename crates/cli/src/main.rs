//! `flink` command line tool.
//!
//! Works on plain files: flattened document texts and connection lists
//! (`<connections>` blocks or JSON).

mod cli;
mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use flink_codec::ConnectionFormat;
use flink_linkset::{Connections, FlinkConfig};
use tracing::{debug, warn};

use crate::cli::{Cli, Command};
use crate::commands::Documents;

const DEFAULT_CONFIG: &str = "flink.toml";

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = load_config(cli.config.as_deref())?;
	debug!(?config, "loaded configuration");

	match cli.command {
		Command::Fingerprint(args) => {
			let text = commands::read(&args.text)?;
			let mut options = config.anchor;
			if let Some(min_window) = args.min_window {
				options.min_window_len = min_window;
			}
			println!(
				"{}",
				commands::fingerprint(&text, args.index, args.length, &options, args.json)?
			);
		}
		Command::Check(args) => {
			let input = commands::read(&args.connections)?;
			let mut connections = Connections::decode(&input, config.palette.clone())?;
			let documents = Documents::read(args.left.as_deref(), args.right.as_deref())?;
			let (report, healthy) = commands::check(&mut connections, &documents, args.url.as_deref());
			print!("{report}");
			if !healthy {
				return Ok(ExitCode::FAILURE);
			}
		}
		Command::Repair(args) => {
			let docs = &args.documents;
			let input = commands::read(&docs.connections)?;
			let mut connections = Connections::decode(&input, config.palette.clone())?;
			let documents = Documents::read(docs.left.as_deref(), docs.right.as_deref())?;
			let options = commands::repair_options(config.repair, args.skip_out_of_bounds);

			let unresolved = commands::repair(&mut connections, &documents, docs.url.as_deref(), &options);
			let format = args
				.to
				.map(ConnectionFormat::from)
				.unwrap_or_else(|| ConnectionFormat::detect(&input));
			println!("{}", connections.encode(format)?);
			if unresolved > 0 {
				warn!(unresolved, "some endpoints could not be repaired");
				return Ok(ExitCode::FAILURE);
			}
		}
		Command::Convert(args) => {
			let input = commands::read(&args.input)?;
			println!("{}", commands::convert(&input, args.to.into())?);
		}
	}

	Ok(ExitCode::SUCCESS)
}

/// Loads the config at `path`, or `./flink.toml` if present.
fn load_config(path: Option<&Path>) -> Result<FlinkConfig> {
	Ok(match path {
		Some(path) => FlinkConfig::load(path)?,
		None => FlinkConfig::load_or_default(PathBuf::from(DEFAULT_CONFIG))?,
	})
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("FLINK_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("flink=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
