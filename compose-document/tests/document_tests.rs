use compose_document::*;
use pretty_assertions::assert_eq;

fn two_services() -> Result<ComposeDocument, ModelError> {
	let mut document = ComposeDocument::new();
	document.set_service_field(0, ServiceField::Name, "web")?;

	let worker = document.add_service();
	document.set_service_field(worker, ServiceField::Name, "worker")?;

	Ok(document)
}

fn attach_network(
	document: &mut ComposeDocument,
	service: usize,
	network: &str,
) -> Result<(), ModelError> {
	let entry = document.add_service_list_entry(service, ServiceList::Networks)?;
	document.update_service_list_entry(service, ServiceList::Networks, entry, network)
}

fn mount(
	document: &mut ComposeDocument,
	service: usize,
	host: &str,
	container: &str,
) -> Result<(), ModelError> {
	let entry = document.add_volume_mount(service)?;
	document.update_volume_mount(service, entry, MountField::Host, host)?;
	document.update_volume_mount(service, entry, MountField::Container, container)
}

#[test]
fn new_document_has_one_unnamed_service() {
	let document = ComposeDocument::new();

	assert_eq!(document.services(), [Service::default()]);
	assert!(document.networks().is_empty());
	assert!(document.volumes().is_empty());
}

#[test]
fn renaming_a_network_rewrites_references() -> Result<(), ModelError> {
	let mut document = two_services()?;

	let network = document.add_network();
	document.rename_network(network, "frontend")?;
	attach_network(&mut document, 0, "frontend")?;
	attach_network(&mut document, 1, "frontend")?;

	document.rename_network(network, "edge")?;

	for service in document.services() {
		assert_eq!(service.networks, ["edge"]);
	}

	let yaml = project(&document);

	assert!(yaml.contains("networks:\n  edge:\n"));
	assert!(!yaml.contains("frontend"));

	Ok(())
}

#[test]
fn removing_a_network_detaches_it() -> Result<(), ModelError> {
	let mut document = two_services()?;

	let backend = document.add_network();
	document.rename_network(backend, "backend")?;
	document.add_network();

	attach_network(&mut document, 0, "backend")?;
	attach_network(&mut document, 0, "network2")?;
	attach_network(&mut document, 1, "backend")?;

	let removed = document.remove_network(backend)?;

	assert_eq!(removed.name, "backend");
	assert_eq!(document.services()[0].networks, ["network2"]);
	assert!(document.services()[1].networks.is_empty());

	Ok(())
}

#[test]
fn renaming_a_volume_rewrites_mounts() -> Result<(), ModelError> {
	let mut document = two_services()?;

	let volume = document.add_volume();
	document.rename_volume(volume, "data")?;
	mount(&mut document, 0, "data", "/var/lib/data")?;
	mount(&mut document, 1, "./logs", "/logs")?;

	document.rename_volume(volume, "app-data")?;

	assert_eq!(document.services()[0].volumes[0].host, "app-data");
	assert_eq!(document.services()[1].volumes[0].host, "./logs");

	Ok(())
}

#[test]
fn removing_a_volume_removes_its_mounts() -> Result<(), ModelError> {
	let mut document = two_services()?;

	let volume = document.add_volume();
	document.rename_volume(volume, "db-data")?;
	mount(&mut document, 0, "db-data", "/var/lib/postgresql/data")?;
	mount(&mut document, 0, "./init", "/docker-entrypoint-initdb.d")?;

	document.remove_volume(volume)?;

	assert_eq!(
		document.services()[0].volumes,
		[VolumeMount::new("./init", "/docker-entrypoint-initdb.d")]
	);

	let yaml = project(&document);

	assert!(!yaml.contains("db-data"));
	assert!(!yaml.contains("\nvolumes:"));

	Ok(())
}

#[test]
fn unnamed_entities_do_not_match_empty_references() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();

	let network = document.add_network();
	document.rename_network(network, "")?;
	attach_network(&mut document, 0, "")?;

	document.remove_network(network)?;

	assert_eq!(document.services()[0].networks, [""]);

	Ok(())
}

#[test]
fn last_service_cannot_be_removed() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();
	document.set_service_field(0, ServiceField::Image, "nginx")?;

	let before = document.clone();

	assert!(!document.remove_service(0)?);
	assert_eq!(document, before);

	let second = document.add_service();

	assert!(document.remove_service(second)?);
	assert_eq!(document.services().len(), 1);

	Ok(())
}

#[test]
fn out_of_range_indices_are_rejected() -> Result<(), ModelError> {
	let mut document = two_services()?;
	let before = document.clone();

	assert_eq!(
		document.update_port(0, 3, PortField::Host, "80"),
		Err(ModelError::IndexOutOfRange {
			target: Target::Port,
			index: 3,
			len: 0,
		})
	);

	assert_eq!(
		document.set_service_field(2, ServiceField::Image, "nginx"),
		Err(ModelError::IndexOutOfRange {
			target: Target::Service,
			index: 2,
			len: 2,
		})
	);

	assert!(document.remove_network(0).is_err());
	assert!(document.remove_service_list_entry(1, ServiceList::Dns, 0).is_err());

	assert_eq!(document, before);

	Ok(())
}

#[test]
fn rename_collisions_are_rejected() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();
	document.add_network();
	let second = document.add_network();

	let before = document.clone();

	assert_eq!(
		document.rename_network(second, "network1"),
		Err(ModelError::NameTaken {
			kind: EntityKind::Network,
			name: "network1".to_string(),
		})
	);
	assert_eq!(document, before);

	document.rename_network(second, "network2")?;
	assert_eq!(document, before);

	Ok(())
}

#[test]
fn new_networks_take_a_free_name() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();
	document.add_network();
	document.add_network();
	attach_network(&mut document, 0, "network2")?;

	document.remove_network(0)?;
	let added = document.add_network();

	let names: Vec<&str> = document.networks().iter().map(|n| n.name.as_str()).collect();
	assert_eq!(names, ["network2", "network1"]);

	document.remove_network(added)?;

	assert_eq!(document.networks()[0].name, "network2");
	assert_eq!(document.services()[0].networks, ["network2"]);

	Ok(())
}

#[test]
fn new_volumes_take_a_free_name() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();
	document.add_volume();
	document.add_volume();
	mount(&mut document, 0, "volume2", "/data")?;

	document.remove_volume(0)?;
	let added = document.add_volume();
	document.add_volume();

	let names: Vec<&str> = document.volumes().iter().map(|v| v.name.as_str()).collect();
	assert_eq!(names, ["volume2", "volume1", "volume3"]);

	document.remove_volume(added)?;

	assert_eq!(document.services()[0].volumes, [VolumeMount::new("volume2", "/data")]);

	Ok(())
}

#[test]
fn service_names_are_checked_by_every_setter() -> Result<(), ModelError> {
	let mut document = two_services()?;
	let before = document.clone();

	let taken = Err(ModelError::NameTaken {
		kind: EntityKind::Service,
		name: "web".to_string(),
	});

	assert_eq!(document.rename_service(1, "web"), taken);
	assert_eq!(document.set_service_field(1, ServiceField::Name, "web"), taken);
	assert_eq!(document, before);

	let entry = document.add_service_list_entry(1, ServiceList::DependsOn)?;
	document.update_service_list_entry(1, ServiceList::DependsOn, entry, "web")?;

	document.set_service_field(0, ServiceField::Name, "frontend")?;

	assert_eq!(document.services()[1].depends_on, ["frontend"]);

	Ok(())
}

#[test]
fn renaming_a_service_rewrites_dependencies() -> Result<(), ModelError> {
	let mut document = two_services()?;

	let entry = document.add_service_list_entry(1, ServiceList::DependsOn)?;
	document.update_service_list_entry(1, ServiceList::DependsOn, entry, "web")?;

	document.rename_service(0, "frontend")?;

	assert_eq!(document.services()[0].name, "frontend");
	assert_eq!(document.services()[1].depends_on, ["frontend"]);

	assert!(matches!(
		document.rename_service(0, "worker"),
		Err(ModelError::NameTaken { .. })
	));

	Ok(())
}

#[test]
fn port_values_keep_only_digits() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();

	let port = document.add_port(0)?;
	document.update_port(0, port, PortField::Host, "80a80")?;
	document.update_port(0, port, PortField::Container, " 80 ")?;
	document.set_port_protocol(0, port, Protocol::Udp)?;

	assert_eq!(
		document.services()[0].ports,
		[PortMapping::new("8080", "80").with_protocol(Protocol::Udp)]
	);

	Ok(())
}

#[test]
fn healthcheck_is_created_on_first_edit() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();

	assert_eq!(document.services()[0].healthcheck, None);

	document.set_healthcheck_field(0, HealthcheckField::Test, "CMD-SHELL pg_isready")?;
	document.set_healthcheck_field(0, HealthcheckField::Retries, "5")?;

	assert_eq!(
		document.services()[0].healthcheck,
		Some(Healthcheck {
			test: "CMD-SHELL pg_isready".to_string(),
			retries: "5".to_string(),
			..Default::default()
		})
	);

	assert!(document.remove_healthcheck(0)?.is_some());
	assert_eq!(document.services()[0].healthcheck, None);

	Ok(())
}

#[test]
fn pairs_are_edited_in_place() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();

	let first = document.add_service_pair(0, ServicePairs::Environment)?;
	let second = document.add_service_pair(0, ServicePairs::Environment)?;

	document.update_service_pair(
		0,
		ServicePairs::Environment,
		first,
		KeyValue::new("TZ", "UTC"),
	)?;
	document.update_service_pair(
		0,
		ServicePairs::Environment,
		second,
		KeyValue::new("LANG", "C"),
	)?;
	document.remove_service_pair(0, ServicePairs::Environment, first)?;

	assert_eq!(
		document.services()[0].environment,
		[KeyValue::new("LANG", "C")]
	);

	Ok(())
}

#[test]
fn network_settings() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();
	document.set_service_field(0, ServiceField::Name, "app")?;

	let network = document.add_network();
	document.set_network_field(network, NetworkField::Driver, "bridge")?;
	document.set_network_flag(network, NetworkFlag::Attachable, Some(true))?;
	document.set_network_field(network, NetworkField::IpamDriver, "default")?;

	let config = document.add_ipam_config(network)?;
	document.update_ipam_config(network, config, IpamField::Subnet, "10.0.0.0/24")?;

	let option = document.add_network_pair(network, NetworkPairs::DriverOpts)?;
	document.update_network_pair(
		network,
		NetworkPairs::DriverOpts,
		option,
		KeyValue::new("mtu", "1400"),
	)?;

	let expected = "\
networks:
  network1:
    driver: bridge
    attachable: true
    driver_opts:
      mtu: \"1400\"
    ipam:
      driver: default
      config:
        - subnet: 10.0.0.0/24
";

	assert!(project(&document).ends_with(expected));

	document.set_network_external(network, true)?;
	document.set_network_field(network, NetworkField::ExternalName, "shared")?;

	assert!(project(&document).contains("  network1:\n    external:\n      name: shared\n"));

	Ok(())
}

#[test]
fn volume_settings() -> Result<(), ModelError> {
	let mut document = ComposeDocument::new();

	let volume = document.add_volume();
	document.set_volume_field(volume, VolumeField::Type, "tmpfs")?;
	document.set_volume_field(volume, VolumeField::Device, "tmpfs")?;

	let label = document.add_volume_pair(volume, VolumePairs::Labels)?;
	document.update_volume_pair(
		volume,
		VolumePairs::Labels,
		label,
		KeyValue::new("backup", "daily"),
	)?;

	let yaml = project(&document);

	assert!(yaml.ends_with(
		"volumes:\n  volume1:\n    driver_opts:\n      type: tmpfs\n      device: tmpfs\n    labels:\n      - backup=daily\n"
	));

	document.remove_volume_pair(volume, VolumePairs::Labels, label)?;
	document.set_volume_external(volume, true)?;

	assert!(project(&document).contains("  volume1:\n    external: true\n"));

	Ok(())
}

#[test]
fn session_files_restore_the_single_service() -> Result<(), serde_yaml_ng::Error> {
	let document: ComposeDocument = serde_yaml_ng::from_str("networks:\n  - name: backend\n")?;

	assert_eq!(document.services().len(), 1);
	assert_eq!(document.networks()[0].name, "backend");

	let again: ComposeDocument = serde_yaml_ng::from_str(&serde_yaml_ng::to_string(&document)?)?;

	assert_eq!(again, document);

	Ok(())
}
