use std::{io, path::PathBuf};

use compose_document::{ImportError, ModelError};
use thiserror::Error;

/// The kinds of errors that can occur during operations.
#[derive(Debug, Error)]
pub enum AppError {
	// I/O errors
	#[error("Could not create the dir `{path}`: {source}")]
	DirCreation { path: PathBuf, source: io::Error },

	#[error("Failed to create or write to the file `{path}`: {source}")]
	WriteError { path: PathBuf, source: io::Error },

	#[error("Could not read the contents of `{path}`: {source}")]
	ReadError { path: PathBuf, source: io::Error },

	#[error(
		"The file `{path}` already exists. Set `no_overwrite` to false to overwrite existing files"
	)]
	FileExists { path: PathBuf },

	#[error("Invalid format for `{file}`. Allowed formats are: yaml, toml, json")]
	InvalidFormat { file: PathBuf },

	// Document errors
	#[error(transparent)]
	Model(#[from] ModelError),

	#[error("Failed to import `{name}`: {source}")]
	Import { name: String, source: ImportError },

	// Store errors
	#[error("Failed to fetch the templates from `{url}`: {source}")]
	Store { url: String, source: reqwest::Error },

	#[error("No store url is configured. Set `store.url` in the config file")]
	StoreNotConfigured,

	#[error("Template `{name}` not found in the store")]
	TemplateNotFound { name: String },

	// Serde errors
	#[error("Error while serializing the content for `{file:?}`: {error}")]
	SerializationError { file: PathBuf, error: String },

	#[error("Error while deserializing the contents of `{file:?}`: {error}")]
	DeserializationError { file: PathBuf, error: String },

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
