//! The Compose Store: a remote list of Compose files that can be imported as templates.
//!
//! The list is cached on disk and only fetched again once the cache is older than the configured
//! ttl. If a refresh fails, the stale cache is used instead.

use std::{
	env,
	path::{Path, PathBuf},
	time::{Duration, SystemTime, UNIX_EPOCH},
};

use reqwest::{Client, header::USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
	AppError, DEFAULT_STORE_TTL_SECS, StoreConfig, create_parent_dirs, read_file, write_file,
};

const DEFAULT_CACHE_FILE: &str = "store.json";

/// A named Compose file from the store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
	pub name: String,
	pub content: String,
}

/// The contents of the cache file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TemplateCache {
	/// When the templates were fetched, in seconds since the unix epoch.
	pub fetched_at: u64,
	pub templates: Vec<Template>,
}

pub(crate) fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or_default()
}

impl TemplateCache {
	pub fn new(templates: Vec<Template>) -> Self {
		Self {
			fetched_at: unix_now(),
			templates,
		}
	}

	pub const fn is_fresh(&self, now: u64, ttl: Duration) -> bool {
		now.saturating_sub(self.fetched_at) < ttl.as_secs()
	}

	/// Reads the cache file. A missing or corrupted cache counts as no cache.
	pub fn read(path: &Path) -> Option<Self> {
		if !path.is_file() {
			return None;
		}

		let content = match read_file(path) {
			Ok(content) => content,
			Err(e) => {
				debug!("{e}");
				return None;
			}
		};

		match serde_json::from_str(&content) {
			Ok(cache) => Some(cache),
			Err(e) => {
				debug!(path = %path.display(), "ignoring unreadable store cache: {e}");
				None
			}
		}
	}

	pub fn write(&self, path: &Path) -> Result<(), AppError> {
		let content = serde_json::to_string(self).map_err(|e| AppError::SerializationError {
			file: path.to_path_buf(),
			error: e.to_string(),
		})?;

		create_parent_dirs(path)?;

		write_file(path, &content, true)
	}
}

/// The default location of the cache file, inside `XDG_CACHE_HOME` or `~/.cache`.
fn default_cache_path() -> PathBuf {
	let cache_dir = if let Ok(env_val) = env::var("XDG_CACHE_HOME") {
		Some(PathBuf::from(env_val))
	} else {
		env::home_dir().map(|home| home.join(".cache"))
	};

	cache_dir.map_or_else(
		|| PathBuf::from(".compose-builder").join(DEFAULT_CACHE_FILE),
		|dir| dir.join("compose-builder").join(DEFAULT_CACHE_FILE),
	)
}

/// Access to the templates of the Compose Store.
#[derive(Debug, Clone)]
pub struct TemplateStore {
	url: Option<String>,
	cache_path: PathBuf,
	ttl: Duration,
	client: Client,
}

impl TemplateStore {
	pub fn new(config: &StoreConfig) -> Self {
		Self {
			url: config.url.clone(),
			cache_path: config
				.cache_path
				.clone()
				.unwrap_or_else(default_cache_path),
			ttl: Duration::from_secs(config.ttl_secs.unwrap_or(DEFAULT_STORE_TTL_SECS)),
			client: Client::new(),
		}
	}

	pub fn cache_path(&self) -> &Path {
		&self.cache_path
	}

	/// Returns the templates, from the cache if it is still fresh or from the store otherwise.
	pub async fn templates(&self, force_refresh: bool) -> Result<Vec<Template>, AppError> {
		let cached = TemplateCache::read(&self.cache_path);

		if !force_refresh
			&& let Some(cache) = &cached
			&& cache.is_fresh(unix_now(), self.ttl)
		{
			debug!(path = %self.cache_path.display(), "using the cached store templates");

			return Ok(cache.templates.clone());
		}

		match self.fetch().await {
			Ok(templates) => {
				let cache = TemplateCache::new(templates);

				match cache.write(&self.cache_path) {
					Ok(()) => info!(count = cache.templates.len(), "refreshed the store cache"),
					Err(e) => warn!("{e}. The fetched templates will not be cached"),
				}

				Ok(cache.templates)
			}
			Err(e) => match cached {
				Some(cache) => {
					warn!("{e}. Using the cached templates instead");

					Ok(cache.templates)
				}
				None => Err(e),
			},
		}
	}

	/// Finds a template by name.
	pub async fn get(&self, name: &str) -> Result<Template, AppError> {
		self
			.templates(false)
			.await?
			.into_iter()
			.find(|template| template.name == name)
			.ok_or_else(|| AppError::TemplateNotFound {
				name: name.to_string(),
			})
	}

	async fn fetch(&self) -> Result<Vec<Template>, AppError> {
		let url = self.url.as_deref().ok_or(AppError::StoreNotConfigured)?;

		info!(url, "fetching the store templates");

		let map_err = |source: reqwest::Error| AppError::Store {
			url: url.to_string(),
			source,
		};

		self
			.client
			.get(url)
			.header(
				USER_AGENT,
				concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
			)
			.send()
			.await
			.and_then(|response| response.error_for_status())
			.map_err(map_err)?
			.json()
			.await
			.map_err(map_err)
	}
}
