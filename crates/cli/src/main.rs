//! `prefpop` binary.
//!
//! Loads the prefecture catalog, selects prefectures through the
//! [`SelectionController`] and prints their population composition.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use prefpop_controller::SelectionController;
use prefpop_model::PrefectureId;
use prefpop_source::HttpSource;
use tracing::{debug, info};

mod cli;
mod config;
mod render;

use cli::{Cli, Command};
use config::AppConfig;
use render::PopulationReport;

/// Environment variable consulted for the log filter before `RUST_LOG`.
const LOG_ENV: &str = "PREFPOP_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = AppConfig::load(cli.config.as_deref())?.with_overrides(&cli)?;
	debug!(?config, "config.resolved");

	let source = Arc::new(HttpSource::new(config.api.clone()).context("building HTTP client")?);
	let mut controller = SelectionController::new(source, config.controller.clone());

	let catalog = match controller.load_catalog().await {
		Ok(catalog) => catalog,
		Err(err) => {
			eprintln!("{}", err.user_message());
			return Ok(ExitCode::FAILURE);
		}
	};
	info!(prefectures = catalog.len(), "catalog.ready");

	match cli.command {
		Command::Prefectures { json } => {
			if json {
				println!("{}", serde_json::to_string_pretty(&render::catalog_rows(&catalog))?);
			} else {
				print!("{}", render::catalog_table(&catalog));
			}
			Ok(ExitCode::SUCCESS)
		}
		Command::Population { ids, label, json } => {
			for id in ids.into_iter().map(PrefectureId) {
				// A repeated id would toggle the prefecture back off.
				if controller.selection().contains(id) {
					continue;
				}
				controller.toggle(id).with_context(|| format!("selecting prefecture {}", id.0))?;
			}
			controller.settle_all().await;

			let report = PopulationReport::build(&controller.view(), &catalog, &label);
			if json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				print!("{}", report.to_text());
			}
			Ok(if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env(LOG_ENV)
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("prefpop=debug,prefpop_controller=debug,prefpop_source=debug,warn")
			} else {
				EnvFilter::new("warn")
			}
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
