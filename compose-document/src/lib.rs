#![cfg_attr(docsrs, feature(doc_auto_cfg))]
//! An editable, in-memory model of a Docker Compose project.
//!
//! The [`ComposeDocument`] holds services, networks and volumes and keeps the references between
//! them consistent when entities are renamed or removed. [`project`] turns a document into
//! Compose YAML text, and [`EditorSession`] re-runs the projection after every edit.

mod document;
pub use document::*;

pub mod import;
pub use import::ImportError;

mod network;
pub use network::*;

mod projector;
pub use projector::project;

mod service;
pub use service::*;

mod session;
pub use session::EditorSession;

pub mod tokenize;

mod volume;
pub use volume::*;

pub mod yaml;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single `key`/`value` entry, as used by environment variables, labels and driver options.
///
/// An entry without a value is written as a bare `KEY`, which Compose reads as "take the value
/// from the environment of the host". That is not the same as `KEY=`, which sets an empty value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct KeyValue {
	pub key: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

impl KeyValue {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: Some(value.into()),
		}
	}

	/// An entry with a key and no value.
	pub fn key_only(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: None,
		}
	}
}
