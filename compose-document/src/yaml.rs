//! A small YAML emitter for the subset of YAML used by Compose files.
//!
//! Mappings and sequences are written in block style with two spaces per level, except for
//! [`Node::Flow`] sequences, which are written inline. Mapping keys keep their insertion order.

use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
	/// A string, quoted only when a plain scalar would be read back as something else.
	Str(String),
	/// A string that is always double-quoted.
	Quoted(String),
	/// A value written exactly as given, such as an integer.
	Verbatim(String),
	Bool(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
	Scalar(Scalar),
	Seq(Vec<Node>),
	/// A sequence of strings written inline, as `["a", "b"]`.
	Flow(Vec<String>),
	Map(Mapping),
}

impl Node {
	pub fn str(value: impl Into<String>) -> Self {
		Self::Scalar(Scalar::Str(value.into()))
	}

	pub fn quoted(value: impl Into<String>) -> Self {
		Self::Scalar(Scalar::Quoted(value.into()))
	}

	pub fn verbatim(value: impl Into<String>) -> Self {
		Self::Scalar(Scalar::Verbatim(value.into()))
	}

	pub const fn bool(value: bool) -> Self {
		Self::Scalar(Scalar::Bool(value))
	}
}

/// An ordered mapping with helpers that leave out empty values.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Mapping(IndexMap<String, Node>);

impl Mapping {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn get(&self, key: &str) -> Option<&Node> {
		self.0.get(key)
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
		self.0.iter()
	}

	/// Inserts a node. An existing key keeps its position and takes the new value.
	pub fn insert(&mut self, key: impl Into<String>, node: Node) {
		self.0.insert(key.into(), node);
	}

	/// Inserts a string, unless it is empty.
	pub fn str(&mut self, key: &str, value: &str) {
		if !value.is_empty() {
			self.insert(key, Node::str(value));
		}
	}

	/// Inserts a flag, unless it is unset.
	pub fn flag(&mut self, key: &str, value: Option<bool>) {
		if let Some(value) = value {
			self.insert(key, Node::bool(value));
		}
	}

	/// Inserts a block sequence, unless it is empty.
	pub fn seq(&mut self, key: &str, items: Vec<Node>) {
		if !items.is_empty() {
			self.insert(key, Node::Seq(items));
		}
	}

	/// Inserts a block sequence of strings, unless it is empty.
	pub fn strings<I, S>(&mut self, key: &str, items: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.seq(key, items.into_iter().map(Node::str).collect());
	}

	/// Inserts a flow sequence, unless it is empty.
	pub fn flow(&mut self, key: &str, items: Vec<String>) {
		if !items.is_empty() {
			self.insert(key, Node::Flow(items));
		}
	}

	/// Inserts a nested mapping, unless it is empty.
	pub fn map(&mut self, key: &str, mapping: Self) {
		if !mapping.is_empty() {
			self.insert(key, Node::Map(mapping));
		}
	}
}

impl<'a> IntoIterator for &'a Mapping {
	type Item = (&'a String, &'a Node);
	type IntoIter = indexmap::map::Iter<'a, String, Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Writes a root mapping as YAML text. The output ends with a newline.
pub fn to_string(root: &Mapping) -> String {
	let mut output = String::new();
	write_mapping(&mut output, root, 0);
	output
}

fn pad(output: &mut String, level: usize) {
	for _ in 0..level {
		output.push_str("  ");
	}
}

fn write_mapping(output: &mut String, mapping: &Mapping, level: usize) {
	for (key, node) in mapping {
		pad(output, level);
		write_str_scalar(output, key);
		output.push(':');
		write_value(output, node, level);
	}
}

// Writes what follows `key:` or `-`, including the line break.
fn write_value(output: &mut String, node: &Node, level: usize) {
	match node {
		Node::Scalar(scalar) => {
			output.push(' ');
			write_scalar(output, scalar);
			output.push('\n');
		}
		Node::Flow(items) => {
			output.push_str(" [");
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					output.push_str(", ");
				}
				write_double_quoted(output, item);
			}
			output.push_str("]\n");
		}
		Node::Map(mapping) => {
			output.push('\n');
			write_mapping(output, mapping, level + 1);
		}
		Node::Seq(items) => {
			output.push('\n');
			write_sequence(output, items, level + 1);
		}
	}
}

fn write_sequence(output: &mut String, items: &[Node], level: usize) {
	for item in items {
		match item {
			// The first key goes on the dash line, the others line up with it.
			Node::Map(mapping) if !mapping.is_empty() => {
				let mut nested = String::new();
				write_mapping(&mut nested, mapping, level + 1);

				pad(output, level);
				output.push_str("- ");
				output.push_str(nested.trim_start_matches(' '));
			}
			_ => {
				pad(output, level);
				output.push('-');
				write_value(output, item, level);
			}
		}
	}
}

fn write_scalar(output: &mut String, scalar: &Scalar) {
	match scalar {
		Scalar::Str(value) => write_str_scalar(output, value),
		Scalar::Quoted(value) => write_double_quoted(output, value),
		Scalar::Verbatim(value) => output.push_str(value),
		Scalar::Bool(value) => output.push_str(if *value { "true" } else { "false" }),
	}
}

fn write_str_scalar(output: &mut String, value: &str) {
	if needs_quotes(value) {
		write_double_quoted(output, value);
	} else {
		output.push_str(value);
	}
}

// JSON string syntax is a valid YAML double-quoted scalar.
fn write_double_quoted(output: &mut String, value: &str) {
	match serde_json::to_string(value) {
		Ok(quoted) => output.push_str(&quoted),
		Err(_) => {
			output.push('"');
			output.push_str(value);
			output.push('"');
		}
	}
}

// `<<` is the merge key.
const RESERVED_WORDS: [&str; 14] = [
	"~", "null", "true", "false", "yes", "no", "on", "off", "y", "n", ".inf", "-.inf", ".nan", "<<",
];

const INDICATORS: &str = "[]{},#&*!|>'\"%@`";

/// Whether a string would be misread (or be invalid) as a plain YAML scalar.
pub fn needs_quotes(value: &str) -> bool {
	let Some(first) = value.chars().next() else {
		return true;
	};

	if value.trim() != value {
		return true;
	}

	let lowercase = value.to_ascii_lowercase();

	if RESERVED_WORDS.contains(&lowercase.as_str())
		|| looks_numeric(&lowercase)
		|| looks_like_date(&lowercase)
	{
		return true;
	}

	if INDICATORS.contains(first) {
		return true;
	}

	if matches!(first, '-' | '?' | ':') && (value.len() == 1 || value[1..].starts_with(' ')) {
		return true;
	}

	value.contains(": ")
		|| value.contains(" #")
		|| value.ends_with(':')
		|| value.chars().any(char::is_control)
}

fn looks_numeric(value: &str) -> bool {
	if value.parse::<f64>().is_ok() {
		return true;
	}

	let unsigned = value.trim_start_matches(['-', '+']);

	// YAML 1.1 allows `_` between digits, as in `1_000` or `1_000.5`
	if unsigned.starts_with(|c: char| c.is_ascii_digit())
		&& unsigned.contains('_')
		&& unsigned.replace('_', "").parse::<f64>().is_ok()
	{
		return true;
	}

	["0x", "0o", "0b"].iter().any(|prefix| {
		unsigned.strip_prefix(prefix).is_some_and(|digits| {
			!digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_')
		})
	})
}

// A `YYYY-MM-DD` date, alone or followed by a time.
fn looks_like_date(value: &str) -> bool {
	let bytes = value.as_bytes();

	if bytes.len() < 10 {
		return false;
	}

	let date_shape = bytes[..10].iter().enumerate().all(|(i, b)| match i {
		4 | 7 => *b == b'-',
		_ => b.is_ascii_digit(),
	});

	date_shape && matches!(bytes.get(10), None | Some(b't' | b' '))
}

#[cfg(test)]
mod tests {
	use indoc::indoc;
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn plain_strings_stay_plain() {
		for value in [
		"nginx:latest",
		"80:80",
		"data:/var/lib/data:ro",
		"TZ=Europe/Berlin",
		"30s",
		"backup_2001-12-14",
		"2001-12-14-snapshot",
		"my_volume",
	] {
			assert!(!needs_quotes(value), "{value} should not be quoted");
		}
	}

	#[test]
	fn ambiguous_strings_are_quoted() {
		for value in [
			"", "no", "Yes", "null", "~", "443", "1.5", "0x1F", "-", "*alias", "a: b", "key:",
			" padded", "#comment", "1e3", "1_000", "-1_000.5", "2001-12-14",
			"2001-12-14T21:59:43.10-05:00", "<<",
		] {
			assert!(needs_quotes(value), "{value:?} should be quoted");
		}
	}

	#[test]
	fn writes_nested_blocks() {
		let mut ipam = Mapping::new();
		let mut config = Mapping::new();
		config.str("subnet", "172.28.0.0/16");
		config.str("gateway", "172.28.0.1");
		ipam.seq("config", vec![Node::Map(config)]);

		let mut network = Mapping::new();
		network.str("driver", "bridge");
		network.map("ipam", ipam);

		let mut networks = Mapping::new();
		networks.insert("backend", Node::Map(network));
		networks.insert("empty", Node::Map(Mapping::new()));

		let mut root = Mapping::new();
		root.map("networks", networks);

		assert_eq!(
			to_string(&root),
			indoc! {"
				networks:
				  backend:
				    driver: bridge
				    ipam:
				      config:
				        - subnet: 172.28.0.0/16
				          gateway: 172.28.0.1
				  empty:
			"}
		);
	}

	#[test]
	fn writes_flow_sequences_inline() {
		let mut root = Mapping::new();
		root.flow("command", vec!["sh".into(), "-c".into(), "echo \"hi\"".into()]);
		root.strings("dns", ["8.8.8.8"]);

		assert_eq!(
			to_string(&root),
			indoc! {r#"
				command: ["sh", "-c", "echo \"hi\""]
				dns:
				  - 8.8.8.8
			"#}
		);
	}

	#[test]
	fn empty_values_are_skipped() {
		let mut root = Mapping::new();
		root.str("image", "");
		root.flag("privileged", None);
		root.seq("ports", Vec::new());
		root.flow("command", Vec::new());
		root.map("labels", Mapping::new());

		assert!(root.is_empty());
		assert_eq!(to_string(&root), "");
	}
}
