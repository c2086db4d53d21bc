use std::fmt;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
	Healthcheck, IpamConfig, KeyValue, Network, PortMapping, Protocol, RestartPolicy, Service,
	Volume, VolumeMount,
};

/// The kinds of named entities in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
	Service,
	Network,
	Volume,
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Service => "service",
			Self::Network => "network",
			Self::Volume => "volume",
		})
	}
}

/// The collection addressed by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	Service,
	Network,
	Volume,
	Port,
	VolumeMount,
	Environment,
	Label,
	DependsOn,
	NetworkRef,
	Dns,
	ExtraHost,
	SecurityOpt,
	DriverOpt,
	IpamConfig,
	IpamOption,
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Service => "service",
			Self::Network => "network",
			Self::Volume => "volume",
			Self::Port => "port",
			Self::VolumeMount => "volume mount",
			Self::Environment => "environment variable",
			Self::Label => "label",
			Self::DependsOn => "depends_on entry",
			Self::NetworkRef => "network reference",
			Self::Dns => "dns entry",
			Self::ExtraHost => "extra host",
			Self::SecurityOpt => "security option",
			Self::DriverOpt => "driver option",
			Self::IpamConfig => "ipam config",
			Self::IpamOption => "ipam option",
		})
	}
}

/// The ways in which an edit can be rejected. A rejected edit leaves the document unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
	#[error("{target} index {index} is out of range (there are {len})")]
	IndexOutOfRange {
		target: Target,
		index: usize,
		len: usize,
	},

	#[error("a {kind} named `{name}` already exists")]
	NameTaken { kind: EntityKind, name: String },
}

/// The free-text scalar fields of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
	Name,
	Image,
	ContainerName,
	Command,
	Entrypoint,
	WorkingDir,
	User,
	EnvFile,
	ShmSize,
}

/// The string list fields of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceList {
	DependsOn,
	Networks,
	Dns,
	ExtraHosts,
	SecurityOpt,
}

impl ServiceList {
	const fn target(self) -> Target {
		match self {
			Self::DependsOn => Target::DependsOn,
			Self::Networks => Target::NetworkRef,
			Self::Dns => Target::Dns,
			Self::ExtraHosts => Target::ExtraHost,
			Self::SecurityOpt => Target::SecurityOpt,
		}
	}
}

/// The key/value list fields of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServicePairs {
	Environment,
	Labels,
}

impl ServicePairs {
	const fn target(self) -> Target {
		match self {
			Self::Environment => Target::Environment,
			Self::Labels => Target::Label,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortField {
	Host,
	Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountField {
	Host,
	Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthcheckField {
	Test,
	Interval,
	Timeout,
	Retries,
	StartPeriod,
	StartInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkField {
	Driver,
	ExternalName,
	IpamDriver,
}

/// The tri-state flags of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFlag {
	Attachable,
	Internal,
	EnableIpv6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkPairs {
	DriverOpts,
	Labels,
	IpamOptions,
}

impl NetworkPairs {
	const fn target(self) -> Target {
		match self {
			Self::DriverOpts => Target::DriverOpt,
			Self::Labels => Target::Label,
			Self::IpamOptions => Target::IpamOption,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpamField {
	Subnet,
	Gateway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeField {
	Driver,
	Type,
	Device,
	O,
	ExternalName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePairs {
	DriverOpts,
	Labels,
}

impl VolumePairs {
	const fn target(self) -> Target {
		match self {
			Self::DriverOpts => Target::DriverOpt,
			Self::Labels => Target::Label,
		}
	}
}

/// The services, networks and volumes of a Compose project.
///
/// The document always holds at least one service. Every edit checks its indices before changing
/// anything, so an edit either applies completely (cascades included) or returns an error and
/// leaves the document as it was.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(from = "DocumentData")]
pub struct ComposeDocument {
	services: Vec<Service>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	networks: Vec<Network>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	volumes: Vec<Volume>,
}

/// The raw shape of a document, before the one-service invariant is restored.
#[derive(Deserialize, Default)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
struct DocumentData {
	services: Vec<Service>,
	networks: Vec<Network>,
	volumes: Vec<Volume>,
}

impl From<DocumentData> for ComposeDocument {
	fn from(data: DocumentData) -> Self {
		Self::from_parts(data.services, data.networks, data.volumes)
	}
}

impl Default for ComposeDocument {
	fn default() -> Self {
		Self::new()
	}
}

fn entry<T>(items: &[T], index: usize, target: Target) -> Result<&T, ModelError> {
	items.get(index).ok_or(ModelError::IndexOutOfRange {
		target,
		index,
		len: items.len(),
	})
}

fn entry_mut<T>(items: &mut [T], index: usize, target: Target) -> Result<&mut T, ModelError> {
	let len = items.len();

	items
		.get_mut(index)
		.ok_or(ModelError::IndexOutOfRange { target, index, len })
}

fn remove_entry<T>(items: &mut Vec<T>, index: usize, target: Target) -> Result<T, ModelError> {
	entry(items, index, target)?;

	Ok(items.remove(index))
}

fn push_entry<T: Default>(items: &mut Vec<T>) -> usize {
	items.push(T::default());
	items.len() - 1
}

fn ensure_name_free<'a>(
	names: impl Iterator<Item = &'a str>,
	index: usize,
	kind: EntityKind,
	name: &str,
) -> Result<(), ModelError> {
	if name.is_empty() {
		return Ok(());
	}

	if names
		.enumerate()
		.any(|(i, existing)| i != index && existing == name)
	{
		return Err(ModelError::NameTaken {
			kind,
			name: name.to_string(),
		});
	}

	Ok(())
}

// The first `{prefix}{N}`, counting from 1, that no entity uses yet. With `len` names taken,
// one of the first `len + 1` candidates is always free.
fn free_name<'a>(prefix: &str, names: impl Iterator<Item = &'a str> + Clone) -> String {
	let len = names.clone().count();

	(1..=len + 1)
		.map(|n| format!("{prefix}{n}"))
		.find(|candidate| !names.clone().any(|name| name == candidate))
		.unwrap_or_else(|| format!("{prefix}{}", len + 1))
}

fn digits_only(value: &str) -> String {
	value.chars().filter(char::is_ascii_digit).collect()
}

impl ComposeDocument {
	/// A fresh document, with a single unnamed service.
	pub fn new() -> Self {
		Self {
			services: vec![Service::default()],
			networks: Vec::new(),
			volumes: Vec::new(),
		}
	}

	/// Builds a document from its parts. An empty service list is replaced by one default service.
	pub fn from_parts(services: Vec<Service>, networks: Vec<Network>, volumes: Vec<Volume>) -> Self {
		let services = if services.is_empty() {
			vec![Service::default()]
		} else {
			services
		};

		Self {
			services,
			networks,
			volumes,
		}
	}

	pub fn services(&self) -> &[Service] {
		&self.services
	}

	pub fn networks(&self) -> &[Network] {
		&self.networks
	}

	pub fn volumes(&self) -> &[Volume] {
		&self.volumes
	}

	pub fn service(&self, index: usize) -> Result<&Service, ModelError> {
		entry(&self.services, index, Target::Service)
	}

	pub fn network(&self, index: usize) -> Result<&Network, ModelError> {
		entry(&self.networks, index, Target::Network)
	}

	pub fn volume(&self, index: usize) -> Result<&Volume, ModelError> {
		entry(&self.volumes, index, Target::Volume)
	}

	fn service_mut(&mut self, index: usize) -> Result<&mut Service, ModelError> {
		entry_mut(&mut self.services, index, Target::Service)
	}

	fn network_mut(&mut self, index: usize) -> Result<&mut Network, ModelError> {
		entry_mut(&mut self.networks, index, Target::Network)
	}

	fn volume_mut(&mut self, index: usize) -> Result<&mut Volume, ModelError> {
		entry_mut(&mut self.volumes, index, Target::Volume)
	}

	// Services

	/// Appends a default service and returns its index.
	pub fn add_service(&mut self) -> usize {
		push_entry(&mut self.services)
	}

	/// Removes a service. Returns `Ok(false)` without changing anything when it is the only one left.
	pub fn remove_service(&mut self, index: usize) -> Result<bool, ModelError> {
		entry(&self.services, index, Target::Service)?;

		if self.services.len() == 1 {
			return Ok(false);
		}

		self.services.remove(index);

		Ok(true)
	}

	/// Replaces a scalar field of a service. Setting the name is the same as
	/// [`Self::rename_service`].
	pub fn set_service_field(
		&mut self,
		index: usize,
		field: ServiceField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		if field == ServiceField::Name {
			return self.rename_service(index, value);
		}

		let service = self.service_mut(index)?;
		let value = value.into();

		let slot = match field {
			ServiceField::Name => &mut service.name,
			ServiceField::Image => &mut service.image,
			ServiceField::ContainerName => &mut service.container_name,
			ServiceField::Command => &mut service.command,
			ServiceField::Entrypoint => &mut service.entrypoint,
			ServiceField::WorkingDir => &mut service.working_dir,
			ServiceField::User => &mut service.user,
			ServiceField::EnvFile => &mut service.env_file,
			ServiceField::ShmSize => &mut service.shm_size,
		};

		*slot = value;

		Ok(())
	}

	pub fn set_restart_policy(
		&mut self,
		index: usize,
		policy: RestartPolicy,
	) -> Result<(), ModelError> {
		self.service_mut(index)?.restart = policy;
		Ok(())
	}

	pub fn set_privileged(&mut self, index: usize, value: Option<bool>) -> Result<(), ModelError> {
		self.service_mut(index)?.privileged = value;
		Ok(())
	}

	pub fn set_read_only(&mut self, index: usize, value: Option<bool>) -> Result<(), ModelError> {
		self.service_mut(index)?.read_only = value;
		Ok(())
	}

	/// Renames a service and rewrites the `depends_on` entries of every service that pointed to it.
	pub fn rename_service(
		&mut self,
		index: usize,
		new_name: impl Into<String>,
	) -> Result<(), ModelError> {
		let new_name = new_name.into();
		let old_name = self.service(index)?.name.clone();

		ensure_name_free(
			self.services.iter().map(|s| s.name.as_str()),
			index,
			EntityKind::Service,
			&new_name,
		)?;

		if !old_name.is_empty() && old_name != new_name {
			for service in &mut self.services {
				for dependency in &mut service.depends_on {
					if *dependency == old_name {
						dependency.clone_from(&new_name);
					}
				}
			}

			debug!(from = %old_name, to = %new_name, "renamed service references");
		}

		self.services[index].name = new_name;

		Ok(())
	}

	// Service string lists

	fn service_list_mut(
		&mut self,
		index: usize,
		list: ServiceList,
	) -> Result<&mut Vec<String>, ModelError> {
		let service = self.service_mut(index)?;

		Ok(match list {
			ServiceList::DependsOn => &mut service.depends_on,
			ServiceList::Networks => &mut service.networks,
			ServiceList::Dns => &mut service.dns,
			ServiceList::ExtraHosts => &mut service.extra_hosts,
			ServiceList::SecurityOpt => &mut service.security_opt,
		})
	}

	/// Appends an empty entry to a list field and returns its index.
	pub fn add_service_list_entry(
		&mut self,
		index: usize,
		list: ServiceList,
	) -> Result<usize, ModelError> {
		Ok(push_entry(self.service_list_mut(index, list)?))
	}

	pub fn update_service_list_entry(
		&mut self,
		index: usize,
		list: ServiceList,
		entry_index: usize,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let items = self.service_list_mut(index, list)?;
		*entry_mut(items, entry_index, list.target())? = value.into();
		Ok(())
	}

	pub fn remove_service_list_entry(
		&mut self,
		index: usize,
		list: ServiceList,
		entry_index: usize,
	) -> Result<(), ModelError> {
		let items = self.service_list_mut(index, list)?;
		remove_entry(items, entry_index, list.target())?;
		Ok(())
	}

	// Service key/value lists

	fn service_pairs_mut(
		&mut self,
		index: usize,
		pairs: ServicePairs,
	) -> Result<&mut Vec<KeyValue>, ModelError> {
		let service = self.service_mut(index)?;

		Ok(match pairs {
			ServicePairs::Environment => &mut service.environment,
			ServicePairs::Labels => &mut service.labels,
		})
	}

	/// Appends an empty pair and returns its index.
	pub fn add_service_pair(
		&mut self,
		index: usize,
		pairs: ServicePairs,
	) -> Result<usize, ModelError> {
		Ok(push_entry(self.service_pairs_mut(index, pairs)?))
	}

	pub fn update_service_pair(
		&mut self,
		index: usize,
		pairs: ServicePairs,
		entry_index: usize,
		pair: KeyValue,
	) -> Result<(), ModelError> {
		let items = self.service_pairs_mut(index, pairs)?;
		*entry_mut(items, entry_index, pairs.target())? = pair;
		Ok(())
	}

	pub fn remove_service_pair(
		&mut self,
		index: usize,
		pairs: ServicePairs,
		entry_index: usize,
	) -> Result<(), ModelError> {
		let items = self.service_pairs_mut(index, pairs)?;
		remove_entry(items, entry_index, pairs.target())?;
		Ok(())
	}

	// Ports

	/// Appends an empty port and returns its index.
	pub fn add_port(&mut self, index: usize) -> Result<usize, ModelError> {
		Ok(push_entry(&mut self.service_mut(index)?.ports))
	}

	/// Updates one side of a port. Anything that is not an ASCII digit is dropped from the input.
	pub fn update_port(
		&mut self,
		index: usize,
		port_index: usize,
		field: PortField,
		value: &str,
	) -> Result<(), ModelError> {
		let port = entry_mut(&mut self.service_mut(index)?.ports, port_index, Target::Port)?;

		let slot = match field {
			PortField::Host => &mut port.host,
			PortField::Container => &mut port.container,
		};

		*slot = digits_only(value);

		Ok(())
	}

	pub fn set_port_protocol(
		&mut self,
		index: usize,
		port_index: usize,
		protocol: Protocol,
	) -> Result<(), ModelError> {
		entry_mut(&mut self.service_mut(index)?.ports, port_index, Target::Port)?.protocol =
			protocol;
		Ok(())
	}

	pub fn remove_port(&mut self, index: usize, port_index: usize) -> Result<PortMapping, ModelError> {
		remove_entry(&mut self.service_mut(index)?.ports, port_index, Target::Port)
	}

	// Volume mounts

	/// Appends an empty mount and returns its index.
	pub fn add_volume_mount(&mut self, index: usize) -> Result<usize, ModelError> {
		Ok(push_entry(&mut self.service_mut(index)?.volumes))
	}

	pub fn update_volume_mount(
		&mut self,
		index: usize,
		mount_index: usize,
		field: MountField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let mount = entry_mut(
			&mut self.service_mut(index)?.volumes,
			mount_index,
			Target::VolumeMount,
		)?;

		let slot = match field {
			MountField::Host => &mut mount.host,
			MountField::Container => &mut mount.container,
		};

		*slot = value.into();

		Ok(())
	}

	pub fn set_volume_mount_read_only(
		&mut self,
		index: usize,
		mount_index: usize,
		read_only: bool,
	) -> Result<(), ModelError> {
		entry_mut(
			&mut self.service_mut(index)?.volumes,
			mount_index,
			Target::VolumeMount,
		)?
		.read_only = read_only;
		Ok(())
	}

	pub fn remove_volume_mount(
		&mut self,
		index: usize,
		mount_index: usize,
	) -> Result<VolumeMount, ModelError> {
		remove_entry(
			&mut self.service_mut(index)?.volumes,
			mount_index,
			Target::VolumeMount,
		)
	}

	// Healthcheck

	/// Sets a healthcheck field, creating an empty healthcheck first if the service has none.
	pub fn set_healthcheck_field(
		&mut self,
		index: usize,
		field: HealthcheckField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let healthcheck: &mut Healthcheck =
			self.service_mut(index)?.healthcheck.get_or_insert_default();

		let slot = match field {
			HealthcheckField::Test => &mut healthcheck.test,
			HealthcheckField::Interval => &mut healthcheck.interval,
			HealthcheckField::Timeout => &mut healthcheck.timeout,
			HealthcheckField::Retries => &mut healthcheck.retries,
			HealthcheckField::StartPeriod => &mut healthcheck.start_period,
			HealthcheckField::StartInterval => &mut healthcheck.start_interval,
		};

		*slot = value.into();

		Ok(())
	}

	pub fn remove_healthcheck(&mut self, index: usize) -> Result<Option<Healthcheck>, ModelError> {
		Ok(self.service_mut(index)?.healthcheck.take())
	}

	// Networks

	/// Appends a network named `network{N}`, with the lowest N that is not taken yet.
	pub fn add_network(&mut self) -> usize {
		let name = free_name("network", self.networks.iter().map(|n| n.name.as_str()));
		self.networks.push(Network::new(name));
		self.networks.len() - 1
	}

	/// Removes a network and detaches it from every service.
	pub fn remove_network(&mut self, index: usize) -> Result<Network, ModelError> {
		let removed = remove_entry(&mut self.networks, index, Target::Network)?;

		if !removed.name.is_empty() {
			for service in &mut self.services {
				service.networks.retain(|network| *network != removed.name);
			}

			debug!(network = %removed.name, "detached removed network from services");
		}

		Ok(removed)
	}

	/// Renames a network and rewrites every service reference to it.
	pub fn rename_network(
		&mut self,
		index: usize,
		new_name: impl Into<String>,
	) -> Result<(), ModelError> {
		let new_name = new_name.into();
		let old_name = self.network(index)?.name.clone();

		ensure_name_free(
			self.networks.iter().map(|n| n.name.as_str()),
			index,
			EntityKind::Network,
			&new_name,
		)?;

		if !old_name.is_empty() && old_name != new_name {
			for service in &mut self.services {
				for network in &mut service.networks {
					if *network == old_name {
						network.clone_from(&new_name);
					}
				}
			}

			debug!(from = %old_name, to = %new_name, "renamed network references");
		}

		self.networks[index].name = new_name;

		Ok(())
	}

	pub fn set_network_field(
		&mut self,
		index: usize,
		field: NetworkField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let network = self.network_mut(index)?;

		let slot = match field {
			NetworkField::Driver => &mut network.driver,
			NetworkField::ExternalName => &mut network.external_name,
			NetworkField::IpamDriver => &mut network.ipam.driver,
		};

		*slot = value.into();

		Ok(())
	}

	pub fn set_network_flag(
		&mut self,
		index: usize,
		flag: NetworkFlag,
		value: Option<bool>,
	) -> Result<(), ModelError> {
		let network = self.network_mut(index)?;

		let slot = match flag {
			NetworkFlag::Attachable => &mut network.attachable,
			NetworkFlag::Internal => &mut network.internal,
			NetworkFlag::EnableIpv6 => &mut network.enable_ipv6,
		};

		*slot = value;

		Ok(())
	}

	pub fn set_network_external(&mut self, index: usize, external: bool) -> Result<(), ModelError> {
		self.network_mut(index)?.external = external;
		Ok(())
	}

	fn network_pairs_mut(
		&mut self,
		index: usize,
		pairs: NetworkPairs,
	) -> Result<&mut Vec<KeyValue>, ModelError> {
		let network = self.network_mut(index)?;

		Ok(match pairs {
			NetworkPairs::DriverOpts => &mut network.driver_opts,
			NetworkPairs::Labels => &mut network.labels,
			NetworkPairs::IpamOptions => &mut network.ipam.options,
		})
	}

	pub fn add_network_pair(
		&mut self,
		index: usize,
		pairs: NetworkPairs,
	) -> Result<usize, ModelError> {
		Ok(push_entry(self.network_pairs_mut(index, pairs)?))
	}

	pub fn update_network_pair(
		&mut self,
		index: usize,
		pairs: NetworkPairs,
		entry_index: usize,
		pair: KeyValue,
	) -> Result<(), ModelError> {
		let items = self.network_pairs_mut(index, pairs)?;
		*entry_mut(items, entry_index, pairs.target())? = pair;
		Ok(())
	}

	pub fn remove_network_pair(
		&mut self,
		index: usize,
		pairs: NetworkPairs,
		entry_index: usize,
	) -> Result<(), ModelError> {
		let items = self.network_pairs_mut(index, pairs)?;
		remove_entry(items, entry_index, pairs.target())?;
		Ok(())
	}

	pub fn add_ipam_config(&mut self, index: usize) -> Result<usize, ModelError> {
		Ok(push_entry(&mut self.network_mut(index)?.ipam.configs))
	}

	pub fn update_ipam_config(
		&mut self,
		index: usize,
		config_index: usize,
		field: IpamField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let config: &mut IpamConfig = entry_mut(
			&mut self.network_mut(index)?.ipam.configs,
			config_index,
			Target::IpamConfig,
		)?;

		let slot = match field {
			IpamField::Subnet => &mut config.subnet,
			IpamField::Gateway => &mut config.gateway,
		};

		*slot = value.into();

		Ok(())
	}

	pub fn remove_ipam_config(
		&mut self,
		index: usize,
		config_index: usize,
	) -> Result<IpamConfig, ModelError> {
		remove_entry(
			&mut self.network_mut(index)?.ipam.configs,
			config_index,
			Target::IpamConfig,
		)
	}

	// Volumes

	/// Appends a volume named `volume{N}`, with the lowest N that is not taken yet.
	pub fn add_volume(&mut self) -> usize {
		let name = free_name("volume", self.volumes.iter().map(|v| v.name.as_str()));
		self.volumes.push(Volume::new(name));
		self.volumes.len() - 1
	}

	/// Removes a volume along with every service mount whose host side is that volume.
	pub fn remove_volume(&mut self, index: usize) -> Result<Volume, ModelError> {
		let removed = remove_entry(&mut self.volumes, index, Target::Volume)?;

		if !removed.name.is_empty() {
			for service in &mut self.services {
				service.volumes.retain(|mount| mount.host != removed.name);
			}

			debug!(volume = %removed.name, "removed mounts of deleted volume");
		}

		Ok(removed)
	}

	/// Renames a volume and rewrites every mount that used it.
	pub fn rename_volume(
		&mut self,
		index: usize,
		new_name: impl Into<String>,
	) -> Result<(), ModelError> {
		let new_name = new_name.into();
		let old_name = self.volume(index)?.name.clone();

		ensure_name_free(
			self.volumes.iter().map(|v| v.name.as_str()),
			index,
			EntityKind::Volume,
			&new_name,
		)?;

		if !old_name.is_empty() && old_name != new_name {
			for service in &mut self.services {
				for mount in &mut service.volumes {
					if mount.host == old_name {
						mount.host.clone_from(&new_name);
					}
				}
			}

			debug!(from = %old_name, to = %new_name, "renamed volume mounts");
		}

		self.volumes[index].name = new_name;

		Ok(())
	}

	pub fn set_volume_field(
		&mut self,
		index: usize,
		field: VolumeField,
		value: impl Into<String>,
	) -> Result<(), ModelError> {
		let volume = self.volume_mut(index)?;

		let slot = match field {
			VolumeField::Driver => &mut volume.driver,
			VolumeField::Type => &mut volume.type_,
			VolumeField::Device => &mut volume.device,
			VolumeField::O => &mut volume.o,
			VolumeField::ExternalName => &mut volume.external_name,
		};

		*slot = value.into();

		Ok(())
	}

	pub fn set_volume_external(&mut self, index: usize, external: bool) -> Result<(), ModelError> {
		self.volume_mut(index)?.external = external;
		Ok(())
	}

	fn volume_pairs_mut(
		&mut self,
		index: usize,
		pairs: VolumePairs,
	) -> Result<&mut Vec<KeyValue>, ModelError> {
		let volume = self.volume_mut(index)?;

		Ok(match pairs {
			VolumePairs::DriverOpts => &mut volume.driver_opts,
			VolumePairs::Labels => &mut volume.labels,
		})
	}

	pub fn add_volume_pair(&mut self, index: usize, pairs: VolumePairs) -> Result<usize, ModelError> {
		Ok(push_entry(self.volume_pairs_mut(index, pairs)?))
	}

	pub fn update_volume_pair(
		&mut self,
		index: usize,
		pairs: VolumePairs,
		entry_index: usize,
		pair: KeyValue,
	) -> Result<(), ModelError> {
		let items = self.volume_pairs_mut(index, pairs)?;
		*entry_mut(items, entry_index, pairs.target())? = pair;
		Ok(())
	}

	pub fn remove_volume_pair(
		&mut self,
		index: usize,
		pairs: VolumePairs,
		entry_index: usize,
	) -> Result<(), ModelError> {
		let items = self.volume_pairs_mut(index, pairs)?;
		remove_entry(items, entry_index, pairs.target())?;
		Ok(())
	}
}
