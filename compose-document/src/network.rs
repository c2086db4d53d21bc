#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// A top-level network of the Compose application.
///
/// See more: https://docs.docker.com/reference/compose-file/networks/
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct Network {
	#[serde(skip_serializing_if = "String::is_empty")]
	pub name: String,

	/// Specifies which driver should be used for this network.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub driver: String,

	/// Driver-dependent options.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub driver_opts: Vec<KeyValue>,

	/// Allows standalone containers to attach to this network.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attachable: Option<bool>,

	/// Creates an externally isolated network.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub internal: Option<bool>,

	/// Enables IPv6 address assignment.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_ipv6: Option<bool>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub labels: Vec<KeyValue>,

	/// Marks the network as maintained outside of the application.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub external: bool,

	/// The name of the existing network, when it differs from the key used in this file.
	/// Only used when `external` is set.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub external_name: String,

	#[serde(skip_serializing_if = "Ipam::is_empty")]
	pub ipam: Ipam,
}

impl Network {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

/// A custom IPAM configuration.
///
/// See more: https://docs.docker.com/reference/compose-file/networks/#ipam
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct Ipam {
	#[serde(skip_serializing_if = "String::is_empty")]
	pub driver: String,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub configs: Vec<IpamConfig>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<KeyValue>,
}

impl Ipam {
	pub fn is_empty(&self) -> bool {
		self.driver.is_empty() && self.configs.is_empty() && self.options.is_empty()
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct IpamConfig {
	/// Subnet in CIDR format.
	pub subnet: String,
	pub gateway: String,
}

impl IpamConfig {
	pub fn new(subnet: impl Into<String>, gateway: impl Into<String>) -> Self {
		Self {
			subnet: subnet.into(),
			gateway: gateway.into(),
		}
	}
}
