use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flink_codec::ConnectionFormat;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "flink", version)]
#[command(about = "Anchor, check and repair floating links between documents")]
pub struct Cli {
	/// Configuration file (defaults to ./flink.toml when present)
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Fingerprint a span of a text file and print its endpoint
	Fingerprint(FingerprintArgs),
	/// Check every link of a connection list against document texts
	Check(DocumentArgs),
	/// Repair broken links and print the updated connection list
	Repair(RepairArgs),
	/// Convert a connection list between layouts
	Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct FingerprintArgs {
	/// Flattened document text
	#[arg(value_name = "TEXT")]
	pub text: PathBuf,

	/// Span start in chars
	#[arg(short, long)]
	pub index: usize,

	/// Span length in chars
	#[arg(short, long)]
	pub length: usize,

	/// Minimum anchor window length, overriding the config
	#[arg(long, value_name = "CHARS")]
	pub min_window: Option<usize>,

	/// Print the object form as JSON
	#[arg(long)]
	pub json: bool,
}

#[derive(Args, Debug)]
pub struct DocumentArgs {
	/// Connection list, as a `<connections>` block or JSON
	#[arg(value_name = "CONNECTIONS")]
	pub connections: PathBuf,

	/// Flattened text of the host document
	#[arg(long, value_name = "PATH")]
	pub left: Option<PathBuf>,

	/// Flattened text of the connected document
	#[arg(long, value_name = "PATH")]
	pub right: Option<PathBuf>,

	/// Only process the record for this URL
	#[arg(long)]
	pub url: Option<String>,
}

#[derive(Args, Debug)]
pub struct RepairArgs {
	#[command(flatten)]
	pub documents: DocumentArgs,

	/// Leave out-of-bounds endpoints unresolved
	#[arg(long)]
	pub skip_out_of_bounds: bool,

	/// Output layout (defaults to the input layout)
	#[arg(long, value_enum)]
	pub to: Option<Format>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
	/// Connection list, as a `<connections>` block or JSON
	#[arg(value_name = "CONNECTIONS")]
	pub input: PathBuf,

	/// Output layout
	#[arg(long, value_enum)]
	pub to: Format,
}

/// Connection list layout.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
	Block,
	Json,
}

impl From<Format> for ConnectionFormat {
	fn from(format: Format) -> Self {
		match format {
			Format::Block => ConnectionFormat::Block,
			Format::Json => ConnectionFormat::Json,
		}
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn command_is_well_formed() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parse_fingerprint() {
		let cli = Cli::try_parse_from(["flink", "-v", "fingerprint", "doc.txt", "-i", "4", "-l", "5"]).unwrap();
		assert!(cli.verbose);
		let Command::Fingerprint(args) = cli.command else {
			panic!("expected fingerprint");
		};
		assert_eq!((args.index, args.length), (4, 5));
		assert_eq!(args.min_window, None);
	}

	#[test]
	fn parse_repair() {
		let cli = Cli::try_parse_from([
			"flink",
			"repair",
			"links.xml",
			"--right",
			"target.txt",
			"--skip-out-of-bounds",
			"--to",
			"json",
			"--config",
			"flink.toml",
		])
		.unwrap();
		assert_eq!(cli.config, Some(PathBuf::from("flink.toml")));
		let Command::Repair(args) = cli.command else {
			panic!("expected repair");
		};
		assert!(args.skip_out_of_bounds);
		assert_eq!(args.to, Some(Format::Json));
		assert_eq!(args.documents.right, Some(PathBuf::from("target.txt")));
		assert_eq!(args.documents.left, None);
	}

	#[test]
	fn convert_requires_target_layout() {
		assert!(Cli::try_parse_from(["flink", "convert", "links.xml"]).is_err());
	}
}
