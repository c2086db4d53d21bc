#![allow(clippy::result_large_err)]

use clap::{CommandFactory, error::ErrorKind};
use compose_builder::cli::Cli;

#[tokio::main]
async fn main() {
	match compose_builder::cli::main_entrypoint().await {
		Ok(_) => {}
		Err(e) => {
			let mut cmd = Cli::command();
			cmd.error(ErrorKind::InvalidValue, e).exit();
		}
	}
}
