//! `wright` command-line front end.

mod cli;
mod dry_run;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use dry_run::DryRunLoader;
use wright_app::{App, ComponentKind};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Check { base_dir } => check(&base_dir),
		Command::Partials { base_dir, view_dir } => partials(&base_dir, &view_dir),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("info")
		}
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn build(base_dir: &Path) -> anyhow::Result<App> {
	App::builder(base_dir)
		.module_loader(DryRunLoader)
		.build()
		.with_context(|| format!("failed to open application at {}", base_dir.display()))
}

fn check(base_dir: &Path) -> anyhow::Result<ExitCode> {
	let app = build(base_dir)?;
	let report = app.prefetch();

	println!("roots:");
	for root in app.module_paths() {
		println!("  {}", root.display());
	}
	println!("public:");
	for dir in app.public_dirs() {
		println!("  {}", dir.display());
	}

	let definitions = app.components().loader().definitions();
	for kind in ComponentKind::ALL {
		let mut of_kind = definitions.iter().filter(|def| def.kind() == kind).peekable();
		if of_kind.peek().is_none() {
			continue;
		}
		println!("{}:", kind.subdir());
		for def in of_kind {
			match def.path() {
				Some(path) => println!("  {} ({})", def.name(), path.display()),
				None => println!("  {}", def.name()),
			}
		}
	}
	println!("views: {} directories", report.view_dirs);

	if report.is_clean() {
		return Ok(ExitCode::SUCCESS);
	}
	println!("failures:");
	for failure in &report.failures {
		println!("  {}: {}", failure.path.display(), failure.error);
	}
	Ok(ExitCode::FAILURE)
}

fn partials(base_dir: &Path, view_dir: &Path) -> anyhow::Result<ExitCode> {
	let app = build(base_dir)?;
	let set = app.partials(view_dir)?;
	for (name, partial) in set.iter() {
		println!("{name}\t{}", partial.source.display());
	}
	Ok(ExitCode::SUCCESS)
}
