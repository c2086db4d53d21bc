use compose_document::*;
use indoc::indoc;
use pretty_assertions::assert_eq;

const FULL_PROJECT: &str = indoc! {r#"
	services:
	  api:
	    image: node:20
	    container_name: api
	    command: ["npm", "run", "start"]
	    entrypoint: ["docker-entrypoint.sh"]
	    restart: "no"
	    working_dir: /app
	    user: "1000:1000"
	    env_file:
	      - .env
	      - .env.local
	    shm_size: 256m
	    ports:
	      - 3000:3000
	      - 9229/udp
	      - 443
	    volumes:
	      - data:/data:ro
	      - /tmp/cache
	    environment:
	      - NODE_ENV=development
	      - EMPTY=
	    labels:
	      - com.example=api
	    healthcheck:
	      test: ["CMD", "curl", "-f", "http://localhost:3000"]
	      interval: 30s
	      retries: 3
	    depends_on:
	      - db
	    networks:
	      - backend
	      - edge
	    dns:
	      - 8.8.8.8
	    extra_hosts:
	      - host.docker.internal=host-gateway
	    security_opt:
	      - no-new-privileges:true
	    privileged: false
	    read_only: true
	  db:
	    image: postgres:16
	networks:
	  backend:
	    driver: bridge
	    internal: true
	    ipam:
	      config:
	        - subnet: 172.28.0.0/16
	          gateway: 172.28.0.1
	  edge:
	    external:
	      name: proxy_net
	volumes:
	  data:
	    driver_opts:
	      size: 10G
	      type: none
	      device: /srv/data
	      o: bind
	  shared:
	    external: true
"#};

#[test]
fn projected_files_import_unchanged() -> Result<(), ImportError> {
	let document = ComposeDocument::from_compose_yaml(FULL_PROJECT)?;

	assert_eq!(project(&document), FULL_PROJECT);

	Ok(())
}

#[test]
fn imported_fields() -> Result<(), ImportError> {
	let document = ComposeDocument::from_compose_yaml(FULL_PROJECT)?;

	let api = &document.services()[0];

	assert_eq!(api.restart, RestartPolicy::No);
	assert_eq!(api.env_file, ".env, .env.local");
	assert_eq!(api.healthcheck.as_ref().map(|h| h.retries.as_str()), Some("3"));
	assert_eq!(
		api.ports,
		[
			PortMapping::new("3000", "3000"),
			PortMapping::new("", "9229").with_protocol(Protocol::Udp),
			PortMapping::new("", "443"),
		]
	);

	let data = &document.volumes()[0];

	assert_eq!(data.driver_opts, [KeyValue::new("size", "10G")]);
	assert_eq!(data.type_, "none");
	assert_eq!(data.device, "/srv/data");
	assert_eq!(data.o, "bind");

	let edge = &document.networks()[1];

	assert!(edge.external);
	assert_eq!(edge.external_name, "proxy_net");

	Ok(())
}

#[test]
fn long_syntax() -> Result<(), ImportError> {
	let document = ComposeDocument::from_compose_yaml(indoc! {r#"
		services:
		  app:
		    command: ["sh", "-c", "echo hi"]
		    restart: on-failure:3
		    env_file:
		      - path: .env
		        required: false
		    ports:
		      - target: 80
		        published: "8080"
		        protocol: udp
		      - target: 443
		        published: 8443
		        host_ip: 127.0.0.1
		    volumes:
		      - type: volume
		        source: data
		        target: /data
		        read_only: true
		    environment:
		      DEBUG: "1"
		      EMPTY:
		    labels:
		      traefik.enable: "true"
		    depends_on:
		      db:
		        condition: service_healthy
		    networks:
		      backend:
		        aliases: [api]
		    extra_hosts:
		      somehost: 162.242.195.82
		  db: {}
	"#})?;

	let app = &document.services()[0];

	assert_eq!(app.name, "app");
	assert_eq!(app.command, r#"["sh","-c","echo hi"]"#);
	assert_eq!(app.restart, RestartPolicy::OnFailure);
	assert_eq!(app.env_file, ".env");
	assert_eq!(
		app.ports,
		[
			PortMapping::new("8080", "80").with_protocol(Protocol::Udp),
			PortMapping::new("127.0.0.1:8443", "443"),
		]
	);
	assert_eq!(app.volumes, [VolumeMount::new("data", "/data").read_only()]);
	assert_eq!(
		app.environment,
		[KeyValue::new("DEBUG", "1"), KeyValue::key_only("EMPTY")]
	);
	assert_eq!(app.labels, [KeyValue::new("traefik.enable", "true")]);
	assert_eq!(app.depends_on, ["db"]);
	assert_eq!(app.networks, ["backend"]);
	assert_eq!(app.extra_hosts, ["somehost=162.242.195.82"]);

	assert_eq!(document.services()[1], Service::new("db"));

	Ok(())
}

#[test]
fn variables_without_values_stay_bare() -> Result<(), ImportError> {
	let expected = indoc! {"
		services:
		  app:
		    environment:
		      - DEBUG
		      - EMPTY=
	"};

	let from_list = ComposeDocument::from_compose_yaml(expected)?;

	let from_map = ComposeDocument::from_compose_yaml(indoc! {r#"
		services:
		  app:
		    environment:
		      DEBUG:
		      EMPTY: ""
	"#})?;

	assert_eq!(
		from_map.services()[0].environment,
		[KeyValue::key_only("DEBUG"), KeyValue::new("EMPTY", "")]
	);
	assert_eq!(project(&from_list), expected);
	assert_eq!(project(&from_map), expected);

	Ok(())
}

#[test]
fn unsupported_keys_are_ignored() -> Result<(), ImportError> {
	let document = ComposeDocument::from_compose_yaml(indoc! {"
		version: '3.8'
		services:
		  web:
		    image: nginx
		    deploy:
		      replicas: 2
	"})?;

	assert_eq!(project(&document), "services:\n  web:\n    image: nginx\n");

	Ok(())
}

#[test]
fn files_without_services_get_the_default_service() -> Result<(), ImportError> {
	assert_eq!(
		ComposeDocument::from_compose_yaml("services: {}\n")?,
		ComposeDocument::new()
	);

	Ok(())
}

#[test]
fn unreadable_files_are_rejected() {
	let errors = [
		ComposeDocument::from_compose_yaml("services: [\n"),
		ComposeDocument::from_compose_yaml("- web\n- db\n"),
		ComposeDocument::from_compose_yaml("services:\n  web: nginx\n"),
		ComposeDocument::from_compose_yaml("services: nginx\n"),
	];

	for result in errors {
		let error = result.expect_err("import should have failed");

		assert!(
			error
				.to_string()
				.starts_with("the template could not be read: "),
			"unexpected message: {error}"
		);
	}

	assert!(matches!(
		ComposeDocument::from_compose_yaml("services:\n  web: nginx\n"),
		Err(ImportError::UnexpectedShape { key, .. }) if key == "services.web"
	));
}
