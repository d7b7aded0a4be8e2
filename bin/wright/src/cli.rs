use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wright")]
#[command(about = "Inspect convention-based application trees")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Log loads and cache misses
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Load every component and partial, reporting anything that fails
	Check {
		/// Application base directory (the one holding `app/`)
		#[arg(value_name = "BASE_DIR")]
		base_dir: PathBuf,
	},
	/// Show the partials visible from one view directory
	Partials {
		/// Application base directory
		#[arg(value_name = "BASE_DIR")]
		base_dir: PathBuf,
		/// View directory, absolute or relative to the application root
		#[arg(value_name = "VIEW_DIR")]
		view_dir: PathBuf,
	},
}
