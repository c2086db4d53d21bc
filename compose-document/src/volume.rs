#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// A top-level named volume.
///
/// `type_`, `device` and `o` are shortcuts for the driver options of the `local` driver.
/// They are merged into `driver_opts` when the document is projected.
///
/// See more: https://docs.docker.com/reference/compose-file/volumes/
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct Volume {
	#[serde(skip_serializing_if = "String::is_empty")]
	pub name: String,

	#[serde(skip_serializing_if = "String::is_empty")]
	pub driver: String,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub driver_opts: Vec<KeyValue>,

	#[serde(rename = "type", skip_serializing_if = "String::is_empty")]
	pub type_: String,

	#[serde(skip_serializing_if = "String::is_empty")]
	pub device: String,

	#[serde(skip_serializing_if = "String::is_empty")]
	pub o: String,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub labels: Vec<KeyValue>,

	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub external: bool,

	#[serde(skip_serializing_if = "String::is_empty")]
	pub external_name: String,
}

impl Volume {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}
