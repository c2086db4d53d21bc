//! Reading existing Compose files into a [`ComposeDocument`].
//!
//! Both the short and the long syntax of Compose are accepted for the fields that the document
//! models. Keys that the document has no place for are skipped.

use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

use crate::{
	ComposeDocument, Healthcheck, Ipam, IpamConfig, KeyValue, Network, PortMapping, Protocol,
	RestartPolicy, Service, Volume, VolumeMount,
};

#[derive(Debug, Error)]
pub enum ImportError {
	#[error("the template could not be read: {0}")]
	Parse(#[from] serde_yaml_ng::Error),

	#[error("the template could not be read: `{key}` must be {expected}")]
	UnexpectedShape { key: String, expected: &'static str },
}

impl ComposeDocument {
	/// Reads the text of a Compose file into a new document.
	///
	/// A file without services yields the default document with a single unnamed service.
	pub fn from_compose_yaml(text: &str) -> Result<Self, ImportError> {
		let root = match serde_yaml_ng::from_str::<Value>(text)? {
			Value::Null => Mapping::new(),
			Value::Mapping(root) => root,
			_ => {
				return Err(ImportError::UnexpectedShape {
					key: "(root)".to_string(),
					expected: "a mapping",
				});
			}
		};

		let mut services = Vec::new();
		let mut networks = Vec::new();
		let mut volumes = Vec::new();

		for (key, value) in &root {
			let key = key_name(key);

			match key.as_str() {
				"services" => services = entities(value, "services", read_service)?,
				"networks" => networks = entities(value, "networks", read_network)?,
				"volumes" => volumes = entities(value, "volumes", read_volume)?,
				_ => debug!(key = %key, "ignoring unsupported top-level key"),
			}
		}

		Ok(Self::from_parts(services, networks, volumes))
	}
}

fn entities<T>(
	value: &Value,
	section: &str,
	read: impl Fn(String, &Mapping) -> T,
) -> Result<Vec<T>, ImportError> {
	let entries = match value {
		Value::Null => return Ok(Vec::new()),
		Value::Mapping(entries) => entries,
		_ => {
			return Err(ImportError::UnexpectedShape {
				key: section.to_string(),
				expected: "a mapping",
			});
		}
	};

	let empty = Mapping::new();

	entries
		.iter()
		.map(|(name, body)| {
			let name = key_name(name);

			match body {
				Value::Null => Ok(read(name, &empty)),
				Value::Mapping(body) => Ok(read(name, body)),
				_ => Err(ImportError::UnexpectedShape {
					key: format!("{section}.{name}"),
					expected: "a mapping",
				}),
			}
		})
		.collect()
}

fn read_service(name: String, map: &Mapping) -> Service {
	let mut service = Service::new(name);

	for (key, value) in map {
		let key = key_name(key);

		match key.as_str() {
			"image" => service.image = text(value),
			"container_name" => service.container_name = text(value),
			"command" => service.command = command_text(value),
			"entrypoint" => service.entrypoint = command_text(value),
			"restart" => service.restart = restart_policy(value),
			"working_dir" => service.working_dir = text(value),
			"user" => service.user = text(value),
			"env_file" => service.env_file = env_files(value),
			"shm_size" => service.shm_size = text(value),
			"privileged" => service.privileged = value.as_bool(),
			"read_only" => service.read_only = value.as_bool(),
			"ports" => service.ports = sequence(value).iter().filter_map(port).collect(),
			"volumes" => service.volumes = sequence(value).iter().filter_map(mount).collect(),
			"environment" => service.environment = pairs(value),
			"labels" => service.labels = pairs(value),
			"healthcheck" => service.healthcheck = healthcheck(value),
			"depends_on" => service.depends_on = names(value),
			"networks" => service.networks = names(value),
			"dns" => service.dns = strings(value),
			"extra_hosts" => service.extra_hosts = hosts(value),
			"security_opt" => service.security_opt = strings(value),
			_ => debug!(service = %service.name, key = %key, "ignoring unsupported service key"),
		}
	}

	service
}

fn read_network(name: String, map: &Mapping) -> Network {
	let mut network = Network::new(name);

	for (key, value) in map {
		let key = key_name(key);

		match key.as_str() {
			"driver" => network.driver = text(value),
			"driver_opts" => network.driver_opts = pairs(value),
			"attachable" => network.attachable = value.as_bool(),
			"internal" => network.internal = value.as_bool(),
			"enable_ipv6" => network.enable_ipv6 = value.as_bool(),
			"labels" => network.labels = pairs(value),
			"external" => {
				let (external, name) = external_reference(value);
				network.external = external;
				if let Some(name) = name {
					network.external_name = name;
				}
			}
			"name" => network.external_name = text(value),
			"ipam" => network.ipam = ipam(value),
			_ => debug!(network = %network.name, key = %key, "ignoring unsupported network key"),
		}
	}

	network
}

fn read_volume(name: String, map: &Mapping) -> Volume {
	let mut volume = Volume::new(name);

	for (key, value) in map {
		let key = key_name(key);

		match key.as_str() {
			"driver" => volume.driver = text(value),
			"driver_opts" => {
				for pair in pairs(value) {
					match pair.key.as_str() {
						"type" => volume.type_ = pair.value.unwrap_or_default(),
						"device" => volume.device = pair.value.unwrap_or_default(),
						"o" => volume.o = pair.value.unwrap_or_default(),
						_ => volume.driver_opts.push(pair),
					}
				}
			}
			"labels" => volume.labels = pairs(value),
			"external" => {
				let (external, name) = external_reference(value);
				volume.external = external;
				if let Some(name) = name {
					volume.external_name = name;
				}
			}
			"name" => volume.external_name = text(value),
			_ => debug!(volume = %volume.name, key = %key, "ignoring unsupported volume key"),
		}
	}

	volume
}

fn scalar(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn text(value: &Value) -> String {
	scalar(value).unwrap_or_default()
}

fn key_name(value: &Value) -> String {
	text(value)
}

fn sequence(value: &Value) -> &[Value] {
	match value {
		Value::Sequence(items) => items,
		_ => &[],
	}
}

fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
	map.get(key)
}

fn field_text(map: &Mapping, key: &str) -> String {
	field(map, key).map(text).unwrap_or_default()
}

// A list command is stored as a JSON array, which the tokenizer reads back unchanged.
fn command_text(value: &Value) -> String {
	match value {
		Value::Sequence(items) => {
			let tokens: Vec<String> = items.iter().filter_map(scalar).collect();
			serde_json::to_string(&tokens).unwrap_or_default()
		}
		_ => text(value),
	}
}

fn restart_policy(value: &Value) -> RestartPolicy {
	match value {
		Value::Bool(false) => RestartPolicy::No,
		_ => RestartPolicy::from_compose_str(&text(value)),
	}
}

fn env_files(value: &Value) -> String {
	match value {
		Value::Sequence(items) => items
			.iter()
			.filter_map(|item| match item {
				Value::Mapping(entry) => field(entry, "path").and_then(scalar),
				_ => scalar(item),
			})
			.collect::<Vec<_>>()
			.join(", "),
		_ => text(value),
	}
}

fn port(value: &Value) -> Option<PortMapping> {
	match value {
		Value::Mapping(map) => {
			let published = field_text(map, "published");
			let host_ip = field_text(map, "host_ip");

			let host = if host_ip.is_empty() || published.is_empty() {
				published
			} else {
				format!("{host_ip}:{published}")
			};

			let protocol = if field_text(map, "protocol") == "udp" {
				Protocol::Udp
			} else {
				Protocol::Tcp
			};

			Some(PortMapping::new(host, field_text(map, "target")).with_protocol(protocol))
		}
		_ => scalar(value).map(|port| PortMapping::from_short_syntax(&port)),
	}
}

fn mount(value: &Value) -> Option<VolumeMount> {
	match value {
		Value::Mapping(map) => {
			let mut mount = VolumeMount::new(field_text(map, "source"), field_text(map, "target"));
			mount.read_only = field(map, "read_only")
				.and_then(Value::as_bool)
				.unwrap_or(false);
			Some(mount)
		}
		_ => scalar(value).map(|mount| VolumeMount::from_short_syntax(&mount)),
	}
}

// Either a list of `KEY=VALUE` strings or a mapping. A bare `KEY` or a null value has no value.
fn pairs(value: &Value) -> Vec<KeyValue> {
	match value {
		Value::Sequence(items) => items
			.iter()
			.filter_map(scalar)
			.map(|item| match item.split_once('=') {
				Some((key, value)) => KeyValue::new(key, value),
				None => KeyValue::key_only(item),
			})
			.collect(),
		Value::Mapping(map) => map
			.iter()
			.map(|(key, value)| match value {
				Value::Null => KeyValue::key_only(key_name(key)),
				_ => KeyValue::new(key_name(key), text(value)),
			})
			.collect(),
		_ => Vec::new(),
	}
}

// Either a list of names or a mapping keyed by name.
fn names(value: &Value) -> Vec<String> {
	match value {
		Value::Mapping(map) => map.keys().map(key_name).collect(),
		_ => strings(value),
	}
}

fn strings(value: &Value) -> Vec<String> {
	match value {
		Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
		_ => scalar(value).into_iter().collect(),
	}
}

fn hosts(value: &Value) -> Vec<String> {
	match value {
		Value::Mapping(map) => map
			.iter()
			.map(|(host, ip)| format!("{}={}", key_name(host), text(ip)))
			.collect(),
		_ => strings(value),
	}
}

fn healthcheck(value: &Value) -> Option<Healthcheck> {
	let Value::Mapping(map) = value else {
		return None;
	};

	Some(Healthcheck {
		test: field(map, "test").map(command_text).unwrap_or_default(),
		interval: field_text(map, "interval"),
		timeout: field_text(map, "timeout"),
		retries: field_text(map, "retries"),
		start_period: field_text(map, "start_period"),
		start_interval: field_text(map, "start_interval"),
	})
}

// `external: true` or `external: { name: ... }`
fn external_reference(value: &Value) -> (bool, Option<String>) {
	match value {
		Value::Bool(external) => (*external, None),
		Value::Mapping(map) => (true, field(map, "name").and_then(scalar)),
		_ => (false, None),
	}
}

fn ipam(value: &Value) -> Ipam {
	let Value::Mapping(map) = value else {
		return Ipam::default();
	};

	let configs = field(map, "config")
		.map(sequence)
		.unwrap_or_default()
		.iter()
		.filter_map(|config| match config {
			Value::Mapping(config) => Some(IpamConfig::new(
				field_text(config, "subnet"),
				field_text(config, "gateway"),
			)),
			_ => None,
		})
		.collect();

	Ipam {
		driver: field_text(map, "driver"),
		configs,
		options: field(map, "options").map(pairs).unwrap_or_default(),
	}
}
