//! Splitting of free-text commands into argument lists.

use serde_json::Value;

/// Splits a command typed as free text into its arguments.
///
/// Input that is already a JSON array (`["sh", "-c", "echo hi"]`) is read as such. Anything else
/// is split on whitespace, with single or double quoted sections kept together and their quotes
/// removed. Unbalanced quotes never fail the split: the input is then split on whitespace only.
pub fn tokenize(input: &str) -> Vec<String> {
	let trimmed = input.trim();

	if trimmed.is_empty() {
		return Vec::new();
	}

	if trimmed.starts_with('[')
		&& let Some(tokens) = parse_json_array(trimmed)
	{
		return tokens;
	}

	split_quoted(trimmed)
		.unwrap_or_else(|| trimmed.split_whitespace().map(String::from).collect())
}

fn parse_json_array(input: &str) -> Option<Vec<String>> {
	let values: Vec<Value> = serde_json::from_str(input).ok()?;

	values
		.into_iter()
		.map(|value| match value {
			Value::String(s) => Some(s),
			Value::Number(n) => Some(n.to_string()),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		})
		.collect()
}

fn split_quoted(input: &str) -> Option<Vec<String>> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut in_token = false;
	let mut quote: Option<char> = None;

	for c in input.chars() {
		match quote {
			Some(open) if c == open => quote = None,
			Some(_) => current.push(c),
			None if c == '"' || c == '\'' => {
				quote = Some(c);
				in_token = true;
			}
			None if c.is_whitespace() => {
				if in_token {
					tokens.push(std::mem::take(&mut current));
					in_token = false;
				}
			}
			None => {
				current.push(c);
				in_token = true;
			}
		}
	}

	if quote.is_some() {
		return None;
	}

	if in_token {
		tokens.push(current);
	}

	Some(tokens)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn splits_on_whitespace() {
		assert_eq!(tokenize("  npm   run start "), ["npm", "run", "start"]);
	}

	#[test]
	fn keeps_quoted_sections_together() {
		assert_eq!(tokenize("sh -c 'echo hi'"), ["sh", "-c", "echo hi"]);
		assert_eq!(
			tokenize(r#"bash -lc "echo 'nested' ok""#),
			["bash", "-lc", "echo 'nested' ok"]
		);
	}

	#[test]
	fn glues_quotes_to_adjacent_text() {
		assert_eq!(tokenize(r#"--name="my app" -v"#), ["--name=my app", "-v"]);
	}

	#[test]
	fn keeps_empty_quoted_arguments() {
		assert_eq!(tokenize("printf ''"), ["printf", ""]);
	}

	#[test]
	fn reads_json_arrays_directly() {
		assert_eq!(
			tokenize(r#"["CMD", "curl", "-f", "http://localhost"]"#),
			["CMD", "curl", "-f", "http://localhost"]
		);
		assert_eq!(tokenize("[\"sleep\", 5]"), ["sleep", "5"]);
	}

	#[test]
	fn invalid_json_falls_back_to_splitting() {
		assert_eq!(tokenize("[ -f /tmp/ready ]"), ["[", "-f", "/tmp/ready", "]"]);
	}

	#[test]
	fn unbalanced_quotes_fall_back_to_whitespace() {
		assert_eq!(tokenize(r#"echo "hello world"#), ["echo", "\"hello", "world"]);
	}

	#[test]
	fn empty_input_has_no_tokens() {
		assert!(tokenize("   ").is_empty());
	}
}
