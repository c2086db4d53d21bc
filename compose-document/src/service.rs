#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Defines a service for a Compose application.
///
/// Free-text fields such as `command` and `entrypoint` are kept exactly as they were typed and
/// are only tokenized when the document is projected.
///
/// See more: https://docs.docker.com/reference/compose-file/services/
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct Service {
	/// The key of the service in the `services` map. Services without a name are not projected.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub name: String,

	/// Specifies the image to start the container from.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub image: String,

	/// A custom container name, rather than a name generated by default.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub container_name: String,

	/// Overrides the default command declared by the container image.
	///
	/// Either a shell-like string (`sh -c 'echo hi'`) or a JSON array (`["sh", "-c", "echo hi"]`).
	#[serde(skip_serializing_if = "String::is_empty")]
	pub command: String,

	/// Overrides the entrypoint of the image. Same syntax as `command`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub entrypoint: String,

	/// The policy that the platform applies on container termination.
	#[serde(skip_serializing_if = "RestartPolicy::is_unset")]
	pub restart: RestartPolicy,

	/// Overrides the container's working directory.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub working_dir: String,

	/// Overrides the user used to run the container process.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub user: String,

	/// A comma-separated list of files that contain environment variables.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub env_file: String,

	/// The size of the shared memory (`/dev/shm` on Linux).
	#[serde(skip_serializing_if = "String::is_empty")]
	pub shm_size: String,

	/// Runs the container with elevated privileges. Absent unless explicitly set.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub privileged: Option<bool>,

	/// Runs the container with a read-only filesystem. Absent unless explicitly set.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub read_only: Option<bool>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub ports: Vec<PortMapping>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub volumes: Vec<VolumeMount>,

	/// Environment variables, in order. Repeated keys collapse to the last value on output.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub environment: Vec<KeyValue>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub labels: Vec<KeyValue>,

	/// The names of the services that must be started before this one.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub depends_on: Vec<String>,

	/// The names of the networks that the service is attached to.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub networks: Vec<String>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub dns: Vec<String>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub extra_hosts: Vec<String>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub security_opt: Vec<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub healthcheck: Option<Healthcheck>,
}

impl Service {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

/// The restart policy of a service. `None` means that the key is left out of the output.
///
/// See more: https://docs.docker.com/reference/compose-file/services/#restart
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
	#[default]
	None,
	No,
	Always,
	OnFailure,
	UnlessStopped,
}

impl RestartPolicy {
	pub const fn is_unset(&self) -> bool {
		matches!(self, Self::None)
	}

	/// The value used in the Compose file, if the policy is set.
	pub const fn as_compose_str(self) -> Option<&'static str> {
		match self {
			Self::None => None,
			Self::No => Some("no"),
			Self::Always => Some("always"),
			Self::OnFailure => Some("on-failure"),
			Self::UnlessStopped => Some("unless-stopped"),
		}
	}

	/// Parses a Compose restart value. `on-failure:3` is accepted as `on-failure`.
	pub fn from_compose_str(value: &str) -> Self {
		match value.split(':').next().unwrap_or_default().trim() {
			"no" => Self::No,
			"always" => Self::Always,
			"on-failure" => Self::OnFailure,
			"unless-stopped" => Self::UnlessStopped,
			_ => Self::None,
		}
	}
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
	#[default]
	Tcp,
	Udp,
}

/// A published port.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct PortMapping {
	pub host: String,
	pub container: String,
	#[serde(skip_serializing_if = "is_default")]
	pub protocol: Protocol,
}

impl PortMapping {
	pub fn new(host: impl Into<String>, container: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			container: container.into(),
			protocol: Protocol::Tcp,
		}
	}

	#[must_use]
	pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
		self.protocol = protocol;
		self
	}

	/// The short syntax for this port (`host:container[/udp]`), or `None` if the container port is missing.
	pub fn short_syntax(&self) -> Option<String> {
		if self.container.is_empty() {
			return None;
		}

		let mut output = if self.host.is_empty() {
			self.container.clone()
		} else {
			format!("{}:{}", self.host, self.container)
		};

		if self.protocol == Protocol::Udp {
			output.push_str("/udp");
		}

		Some(output)
	}

	/// Parses the short syntax of a port. Anything before the last `:` is kept as the host part,
	/// so that an ip prefix such as `127.0.0.1:8080:80` survives.
	pub fn from_short_syntax(value: &str) -> Self {
		let (mapping, protocol) = match value.rsplit_once('/') {
			Some((mapping, "udp")) => (mapping, Protocol::Udp),
			Some((mapping, _)) => (mapping, Protocol::Tcp),
			None => (value, Protocol::Tcp),
		};

		let (host, container) = mapping.rsplit_once(':').unwrap_or(("", mapping));

		Self::new(host, container).with_protocol(protocol)
	}
}

/// A volume or bind mount attached to a service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct VolumeMount {
	/// A host path or the name of a top-level volume.
	pub host: String,
	pub container: String,
	#[serde(skip_serializing_if = "is_default")]
	pub read_only: bool,
}

impl VolumeMount {
	pub fn new(host: impl Into<String>, container: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			container: container.into(),
			read_only: false,
		}
	}

	#[must_use]
	pub const fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	/// The short syntax for this mount (`host:container[:ro]`), or `None` if the container path is missing.
	pub fn short_syntax(&self) -> Option<String> {
		if self.container.is_empty() {
			return None;
		}

		let mut output = if self.host.is_empty() {
			self.container.clone()
		} else {
			format!("{}:{}", self.host, self.container)
		};

		if self.read_only {
			output.push_str(":ro");
		}

		Some(output)
	}

	/// Parses the short syntax of a mount (`[source:]target[:mode]`).
	pub fn from_short_syntax(value: &str) -> Self {
		let parts: Vec<&str> = value.splitn(3, ':').collect();

		match parts.as_slice() {
			[container] => Self::new("", *container),
			[host, container] => Self::new(*host, *container),
			[host, container, mode] => {
				let mut mount = Self::new(*host, *container);
				mount.read_only = mode.split(',').any(|flag| flag == "ro");
				mount
			}
			_ => Self::default(),
		}
	}
}

/// Declares a check that's run to determine whether or not the service containers are "healthy".
///
/// Only projected when `test` is not empty.
///
/// See more: https://docs.docker.com/reference/compose-file/services/#healthcheck
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct Healthcheck {
	/// The command to run. Same syntax as the `command` of a service.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub test: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub interval: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub timeout: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub retries: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub start_period: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub start_interval: String,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
	*value == T::default()
}
