use std::path::{Path, PathBuf};

use merge_it::*;
use serde::{Deserialize, Serialize};

use crate::{AppError, deserialize_file};

/// The default lifetime of the store cache, in seconds.
pub const DEFAULT_STORE_TTL_SECS: u64 = 3600;

/// The global configuration struct.
#[derive(Clone, Debug, Deserialize, Serialize, Merge, PartialEq, Eq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Do not overwrite existing files.
	#[merge(with = overwrite_if_true)]
	pub no_overwrite: bool,

	/// The settings for the Compose Store.
	#[merge(with = merge_options)]
	pub store: Option<StoreConfig>,
}

/// Where to find the templates of the Compose Store, and how long to keep them cached.
#[derive(Clone, Debug, Deserialize, Serialize, Merge, PartialEq, Eq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
	/// The url of the template index. It must return a JSON array of `{ "name", "content" }` objects.
	pub url: Option<String>,

	/// The path of the cache file. Relative paths are resolved from the directory of the config file [default: `$XDG_CACHE_HOME/compose-builder/store.json`].
	pub cache_path: Option<PathBuf>,

	/// The amount of seconds after which the cache is refreshed [default: 3600].
	pub ttl_secs: Option<u64>,
}

impl Config {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) const fn can_overwrite(&self) -> bool {
		!self.no_overwrite
	}

	/// Reads a config file in yaml, toml or json format.
	pub fn from_file<T: Into<PathBuf>>(config_file: T) -> Result<Self, AppError> {
		let config_file: PathBuf = config_file.into();

		let mut config: Self = deserialize_file(&config_file)?;

		if let Some(store) = config.store.as_mut()
			&& let Some(cache_path) = store.cache_path.as_mut()
			&& cache_path.is_relative()
		{
			let parent = config_file.parent().unwrap_or_else(|| Path::new(""));

			*cache_path = parent.join(&*cache_path);
		}

		Ok(config)
	}
}
