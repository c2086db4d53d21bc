use std::{env, fs::exists, path::PathBuf};

use merge_it::*;
use tracing::debug;

use crate::{AppError, Config, cli::ConfigOverrides};

pub(crate) fn get_config_from_cli(overrides: ConfigOverrides) -> Result<Config, AppError> {
	let ConfigOverrides {
		no_overwrite,
		config: config_path,
		ignore_config,
	} = overrides;

	let mut config = Config::default();

	let config_path = if let Some(path) = config_path {
		Some(path)
	} else if !ignore_config {
		get_config_path_from_defaults()
	} else {
		None
	};

	if let Some(config_path) = config_path {
		debug!(path = %config_path.display(), "loading config file");

		config.merge(Config::from_file(&config_path)?);
	}

	if no_overwrite {
		config.no_overwrite = true;
	}

	Ok(config)
}

const DEFAULT_CONFIG_NAMES: [&str; 3] = [
	"compose-builder.yaml",
	"compose-builder.toml",
	"compose-builder.json",
];

fn get_config_path_from_defaults() -> Option<PathBuf> {
	for name in DEFAULT_CONFIG_NAMES {
		if exists(name).is_ok_and(|exists| exists) {
			return Some(PathBuf::from(name));
		}
	}

	// Try xdg path if nothing else was found
	get_config_from_xdg()
}

fn get_config_from_xdg() -> Option<PathBuf> {
	let xdg_config = if let Ok(env_val) = env::var("XDG_CONFIG_HOME") {
		Some(PathBuf::from(env_val))
	} else {
		env::home_dir().map(|home| home.join(".config"))
	};

	let config_dir = xdg_config?.join("compose-builder");

	if !config_dir.is_dir() {
		return None;
	}

	DEFAULT_CONFIG_NAMES
		.into_iter()
		.map(|name| config_dir.join(name))
		.find(|path| exists(path).is_ok_and(|exists| exists))
}
