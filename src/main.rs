use std::io::Read;

use clap::Parser;
use mython::cli::*;

fn main() {
	let mython = mython::Mython;

	match Cli::parse().mode {
		Mode::File { path } => {
			if let Err(e) = mython.run_file(&path) {
				eprintln!("Failed to run file: {e}");
			}
		}
		Mode::Stdin => {
			let mut source = String::new();
			if let Err(e) = std::io::stdin().read_to_string(&mut source) {
				eprintln!("Failed to read stdin: {e}");
				return;
			}
			let stdout = std::io::stdout();
			let mut lock = stdout.lock();
			if let Err(e) = mython.run(&source, &mut lock) {
				eprintln!("Failed to run program: {e}");
			}
		}
	}
}
