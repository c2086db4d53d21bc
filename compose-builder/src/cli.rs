
mod config_discovery;

use config_discovery::*;

use std::{ffi::OsString, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use compose_document::{ComposeDocument, EditorSession, project};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{store::TemplateStore, *};

/// The default path of the session files created by the cli.
pub const DEFAULT_SESSION_FILE: &str = "compose-session.yaml";

pub async fn main_entrypoint() -> Result<(), AppError> {
	init_logging();

	Cli::parse().execute().await
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

	// Fails only if a subscriber is already installed
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}

impl Cli {
	/// Parses the arguments and executes the resulting command.
	pub async fn execute_with<I, T>(args: I) -> Result<(), AppError>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let cli = Self::try_parse_from(args).map_err(anyhow::Error::from)?;

		cli.execute().await
	}

	pub async fn execute(self) -> Result<(), AppError> {
		let config = get_config_from_cli(self.overrides.unwrap_or_default())?;

		let overwrite = config.can_overwrite();

		match self.command {
			#[cfg(feature = "schemars")]
			Commands::JsonSchema { output } => {
				let schema = schemars::schema_for!(ComposeDocument);

				serialize_to_file(&schema, &output, overwrite)?;
			}
			Commands::New { output } => {
				let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

				serialize_to_file(&ComposeDocument::new(), &output, overwrite)?;
			}
			Commands::Render { session, output } => {
				let document: ComposeDocument = deserialize_file(&session)?;

				write_output(output.as_deref(), &project(&document), overwrite)?;
			}
			Commands::Import {
				file,
				output,
				session,
			} => {
				let content = read_file(&file)?;

				let document =
					ComposeDocument::from_compose_yaml(&content).map_err(|e| AppError::Import {
						name: file.display().to_string(),
						source: e,
					})?;

				write_imported(&document, output, session, overwrite)?;
			}
			Commands::Store { command } => {
				let store = TemplateStore::new(&config.store.unwrap_or_default());

				debug!(cache = %store.cache_path().display(), "using the store cache");

				match command {
					StoreCommands::List { refresh } => {
						for template in store.templates(refresh).await? {
							println!("{}", template.name);
						}
					}
					StoreCommands::Import {
						name,
						output,
						session,
					} => {
						let template = store.get(&name).await?;

						let mut editor = EditorSession::new();

						editor
							.import_template(&template.name, &template.content)
							.map_err(|e| AppError::Import {
								name: template.name.clone(),
								source: e,
							})?;

						write_imported(editor.document(), output, session, overwrite)?;
					}
				}
			}
		}

		Ok(())
	}
}

/// Writes an imported document as a session file, or as Compose YAML (to stdout if there is no output).
fn write_imported(
	document: &ComposeDocument,
	output: Option<PathBuf>,
	as_session: bool,
	overwrite: bool,
) -> Result<(), AppError> {
	if as_session {
		let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

		serialize_to_file(document, &output, overwrite)
	} else {
		write_output(output.as_deref(), &project(document), overwrite)
	}
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
	/// Do not overwrite existing files.
	#[arg(long)]
	pub no_overwrite: bool,

	/// Sets a custom config file. Any file named `compose-builder.{yaml,json,toml}` in the cwd or in `XDG_CONFIG_HOME/compose-builder` will be detected automatically. If no file is found, the default settings are used
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Ignores any automatically detected config files, uses cli instructions and config file defined with --config.
	#[arg(long)]
	pub ignore_config: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "compose-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	#[command(flatten)]
	pub overrides: Option<ConfigOverrides>,
}

/// The cli commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
	/// Creates a new session file with a single, empty service.
	New {
		/// The output file [default: compose-session.yaml]
		output: Option<PathBuf>,
	},

	/// Renders a session file as a Docker Compose file.
	Render {
		/// The path to the session file (yaml, toml or json)
		session: PathBuf,

		/// The output path of the Compose file. Implies `stdout` if absent.
		output: Option<PathBuf>,
	},

	/// Imports an existing Docker Compose file.
	Import {
		/// The path to the Compose file
		file: PathBuf,

		/// The output path. Implies `stdout` if absent, unless `--session` is set.
		output: Option<PathBuf>,

		/// Writes a session file instead of the rendered Compose file [default output: compose-session.yaml]
		#[arg(short, long)]
		session: bool,
	},

	/// Lists or imports templates from the Compose Store.
	Store {
		#[command(subcommand)]
		command: StoreCommands,
	},

	#[cfg(feature = "schemars")]
	/// Generates the json schema for session files.
	JsonSchema {
		/// The output path for the generated schema.
		output: PathBuf,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum StoreCommands {
	/// Lists the names of the available templates.
	List {
		/// Fetches the templates again, even if the cache is still fresh.
		#[arg(long)]
		refresh: bool,
	},

	/// Imports a template from the store.
	Import {
		/// The name of the template
		name: String,

		/// The output path. Implies `stdout` if absent, unless `--session` is set.
		output: Option<PathBuf>,

		/// Writes a session file instead of the rendered Compose file [default output: compose-session.yaml]
		#[arg(short, long)]
		session: bool,
	},
}
