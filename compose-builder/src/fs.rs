use std::{
	fs::{File, create_dir_all, read_to_string},
	io::{self, Write},
	path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::AppError;

/// The file formats that can be used for session and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
	Yaml,
	Toml,
	Json,
}

impl Format {
	pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.unwrap_or_default();

		match extension {
			"yaml" | "yml" => Ok(Self::Yaml),
			"toml" => Ok(Self::Toml),
			"json" => Ok(Self::Json),
			_ => Err(AppError::InvalidFormat {
				file: path.to_path_buf(),
			}),
		}
	}
}

/// Serializes an item in the format indicated by the extension of the output path.
pub(crate) fn serialize_to_file<T: Serialize>(
	item: &T,
	path: &Path,
	overwrite: bool,
) -> Result<(), AppError> {
	let format = Format::from_path(path)?;

	let content = match format {
		Format::Yaml => serde_yaml_ng::to_string(item).map_err(|e| e.to_string()),
		Format::Toml => toml::to_string_pretty(item).map_err(|e| e.to_string()),
		Format::Json => serde_json::to_string_pretty(item).map_err(|e| e.to_string()),
	}
	.map_err(|error| AppError::SerializationError {
		file: path.to_path_buf(),
		error,
	})?;

	create_parent_dirs(path)?;

	write_file(path, &content, overwrite)
}

/// Deserializes a file in the format indicated by its extension.
pub(crate) fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
	let format = Format::from_path(path)?;

	let contents = read_file(path)?;

	match format {
		Format::Yaml => serde_yaml_ng::from_str(&contents).map_err(|e| e.to_string()),
		Format::Toml => toml::from_str(&contents).map_err(|e| e.to_string()),
		Format::Json => serde_json::from_str(&contents).map_err(|e| e.to_string()),
	}
	.map_err(|error| AppError::DeserializationError {
		file: path.to_path_buf(),
		error,
	})
}

pub(crate) fn read_file(path: &Path) -> Result<String, AppError> {
	read_to_string(path).map_err(|e| AppError::ReadError {
		path: path.to_path_buf(),
		source: e,
	})
}

pub(crate) fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<(), AppError> {
	let mut file = open_file_if_overwriting(overwrite, path)?;

	file
		.write_all(content.as_bytes())
		.map_err(|e| AppError::WriteError {
			path: path.to_path_buf(),
			source: e,
		})
}

/// Writes the content to the given path, or to stdout if there is no path.
pub(crate) fn write_output(
	path: Option<&Path>,
	content: &str,
	overwrite: bool,
) -> Result<(), AppError> {
	if let Some(path) = path {
		create_parent_dirs(path)?;

		write_file(path, content, overwrite)
	} else {
		io::stdout()
			.write_all(content.as_bytes())
			.map_err(|e| anyhow::Error::from(e).into())
	}
}

pub(crate) fn open_file_if_overwriting(overwrite: bool, path: &Path) -> Result<File, AppError> {
	if overwrite {
		File::create(path).map_err(|e| AppError::WriteError {
			path: path.to_path_buf(),
			source: e,
		})
	} else {
		File::create_new(path).map_err(|e| match e.kind() {
			io::ErrorKind::AlreadyExists => AppError::FileExists {
				path: path.to_path_buf(),
			},
			_ => AppError::WriteError {
				path: path.to_path_buf(),
				source: e,
			},
		})
	}
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), AppError> {
	let Some(parent) = path.parent() else {
		return Ok(());
	};

	create_dir_all(parent).map_err(|e| AppError::DirCreation {
		path: parent.to_path_buf(),
		source: e,
	})
}
