use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments
#[derive(Parser)]
#[command(name = "mython", about = "An interpreter for the Mython language")]
pub struct Cli {
	/// Program mode
	#[command(subcommand)]
	pub mode: Mode,
}

/// Program mode
#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run a program file
	File { path: PathBuf },
	/// Run a program read from standard input
	Stdin,
}
