use indexmap::IndexMap;
use tracing::debug;

use crate::{
	ComposeDocument, Healthcheck, Ipam, KeyValue, Network, Service, Volume,
	tokenize::tokenize,
	yaml::{self, Mapping, Node},
};

/// Renders a document as Compose YAML.
///
/// The output only depends on the document: unnamed entities are skipped, empty fields are left
/// out, and everything keeps the order in which it appears in the document.
pub fn project(document: &ComposeDocument) -> String {
	let mut root = Mapping::new();

	root.insert(
		"services",
		Node::Map(named_entries(
			document.services(),
			"service",
			|s| &s.name,
			service_node,
		)),
	);

	if document.networks().iter().any(|n| !n.name.is_empty()) {
		root.insert(
			"networks",
			Node::Map(named_entries(
				document.networks(),
				"network",
				|n| &n.name,
				network_node,
			)),
		);
	}

	if document.volumes().iter().any(|v| !v.name.is_empty()) {
		root.insert(
			"volumes",
			Node::Map(named_entries(
				document.volumes(),
				"volume",
				|v| &v.name,
				volume_node,
			)),
		);
	}

	yaml::to_string(&root)
}

// The first entity with a given name wins.
fn named_entries<T>(
	items: &[T],
	kind: &str,
	name: impl Fn(&T) -> &String,
	render: impl Fn(&T) -> Mapping,
) -> Mapping {
	let mut entries = Mapping::new();

	for item in items {
		let name = name(item);

		if name.is_empty() {
			continue;
		}

		if entries.contains_key(name) {
			debug!(kind, name = %name, "skipping entity with a duplicate name");
			continue;
		}

		entries.insert(name.clone(), Node::Map(render(item)));
	}

	entries
}

fn service_node(service: &Service) -> Mapping {
	let mut map = Mapping::new();

	map.str("image", &service.image);
	map.str("container_name", &service.container_name);
	map.flow("command", tokenize(&service.command));
	map.flow("entrypoint", tokenize(&service.entrypoint));

	if let Some(restart) = service.restart.as_compose_str() {
		map.str("restart", restart);
	}

	map.str("working_dir", &service.working_dir);

	if !service.user.is_empty() {
		map.insert("user", Node::quoted(&service.user));
	}

	let env_files: Vec<&str> = service
		.env_file
		.split(',')
		.map(str::trim)
		.filter(|path| !path.is_empty())
		.collect();

	if let [single] = env_files.as_slice() {
		map.str("env_file", single);
	} else {
		map.strings("env_file", env_files);
	}

	map.str("shm_size", &service.shm_size);

	map.seq(
		"ports",
		service
			.ports
			.iter()
			.filter_map(|port| port.short_syntax())
			.map(number_or_str)
			.collect(),
	);

	map.strings(
		"volumes",
		service.volumes.iter().filter_map(|mount| mount.short_syntax()),
	);

	map.strings("environment", assignments(&service.environment));
	map.strings("labels", assignments(&service.labels));

	if let Some(healthcheck) = &service.healthcheck {
		map.map("healthcheck", healthcheck_node(healthcheck));
	}

	map.strings("depends_on", non_empty(&service.depends_on));
	map.strings("networks", non_empty(&service.networks));
	map.strings("dns", non_empty(&service.dns));
	map.strings("extra_hosts", non_empty(&service.extra_hosts));
	map.strings("security_opt", non_empty(&service.security_opt));

	map.flag("privileged", service.privileged);
	map.flag("read_only", service.read_only);

	map
}

fn healthcheck_node(healthcheck: &Healthcheck) -> Mapping {
	let mut map = Mapping::new();

	let test = tokenize(&healthcheck.test);

	if test.is_empty() {
		return map;
	}

	map.flow("test", test);
	map.str("interval", &healthcheck.interval);
	map.str("timeout", &healthcheck.timeout);

	if !healthcheck.retries.is_empty() {
		map.insert("retries", number_or_str(healthcheck.retries.clone()));
	}

	map.str("start_period", &healthcheck.start_period);
	map.str("start_interval", &healthcheck.start_interval);

	map
}

fn network_node(network: &Network) -> Mapping {
	let mut map = Mapping::new();

	if network.external {
		map.insert("external", external_node(&network.external_name));
		map.str("driver", &network.driver);
		map.map("driver_opts", options_map(collapse(&network.driver_opts)));
		map.strings("labels", assignments(&network.labels));

		return map;
	}

	map.str("driver", &network.driver);
	map.flag("attachable", network.attachable);
	map.flag("internal", network.internal);
	map.flag("enable_ipv6", network.enable_ipv6);
	map.map("driver_opts", options_map(collapse(&network.driver_opts)));
	map.strings("labels", assignments(&network.labels));
	map.map("ipam", ipam_node(&network.ipam));

	map
}

fn ipam_node(ipam: &Ipam) -> Mapping {
	let mut map = Mapping::new();

	map.str("driver", &ipam.driver);

	map.seq(
		"config",
		ipam
			.configs
			.iter()
			.filter_map(|config| {
				let mut entry = Mapping::new();
				entry.str("subnet", &config.subnet);
				entry.str("gateway", &config.gateway);

				(!entry.is_empty()).then_some(Node::Map(entry))
			})
			.collect(),
	);

	map.map("options", options_map(collapse(&ipam.options)));

	map
}

fn volume_node(volume: &Volume) -> Mapping {
	let mut map = Mapping::new();

	let mut driver_opts = collapse(&volume.driver_opts);

	for (key, value) in [
		("type", &volume.type_),
		("device", &volume.device),
		("o", &volume.o),
	] {
		if !value.is_empty() {
			driver_opts.insert(key, Some(value.as_str()));
		}
	}

	if volume.external {
		map.insert("external", external_node(&volume.external_name));
	}

	map.str("driver", &volume.driver);
	map.map("driver_opts", options_map(driver_opts));
	map.strings("labels", assignments(&volume.labels));

	map
}

fn external_node(external_name: &str) -> Node {
	if external_name.is_empty() {
		Node::bool(true)
	} else {
		let mut map = Mapping::new();
		map.str("name", external_name);
		Node::Map(map)
	}
}

// Drops pairs without a key. A repeated key keeps its first position and its last value.
fn collapse(pairs: &[KeyValue]) -> IndexMap<&str, Option<&str>> {
	let mut map = IndexMap::new();

	for pair in pairs.iter().filter(|pair| !pair.key.is_empty()) {
		map.insert(pair.key.as_str(), pair.value.as_deref());
	}

	map
}

// `KEY=VALUE`, or a bare `KEY` for entries without a value.
fn assignments(pairs: &[KeyValue]) -> Vec<String> {
	collapse(pairs)
		.into_iter()
		.map(|(key, value)| match value {
			Some(value) => format!("{key}={value}"),
			None => key.to_string(),
		})
		.collect()
}

fn options_map(options: IndexMap<&str, Option<&str>>) -> Mapping {
	let mut map = Mapping::new();

	for (key, value) in options {
		map.insert(key, Node::str(value.unwrap_or_default()));
	}

	map
}

fn non_empty(items: &[String]) -> impl Iterator<Item = &str> {
	items
		.iter()
		.map(String::as_str)
		.filter(|item| !item.trim().is_empty())
}

fn number_or_str(value: String) -> Node {
	if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
		Node::verbatim(value)
	} else {
		Node::str(value)
	}
}
