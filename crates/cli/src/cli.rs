use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

/// Composition label charted when none is given.
pub const DEFAULT_LABEL: &str = "総人口";

#[derive(Parser, Debug)]
#[command(name = "prefpop")]
#[command(about = "Browse prefecture population compositions")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to <config dir>/prefpop/config.toml when present)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Override the API base URL
	#[arg(long, value_name = "URL", global = true)]
	pub base_url: Option<Url>,

	/// Override the request timeout in seconds
	#[arg(long, value_name = "SECS", global = true)]
	pub timeout: Option<u64>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// List the available prefectures
	Prefectures {
		/// Print JSON instead of a table
		#[arg(long)]
		json: bool,
	},
	/// Select prefectures in order and print their population composition
	Population {
		/// Prefecture ids, in selection order
		#[arg(required = true, value_name = "ID")]
		ids: Vec<u32>,

		/// Composition to print (e.g. 総人口, 年少人口, 生産年齢人口, 老年人口)
		#[arg(long, short = 'l', default_value = DEFAULT_LABEL)]
		label: String,

		/// Print JSON instead of a table
		#[arg(long)]
		json: bool,
	},
}
