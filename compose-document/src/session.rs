use tracing::{debug, warn};

use crate::{ComposeDocument, ImportError, ModelError, project};

/// A document along with its YAML projection.
///
/// The projection is recomputed after every successful edit, so [`Self::yaml`] always matches
/// [`Self::document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSession {
	document: ComposeDocument,
	yaml: String,
}

impl Default for EditorSession {
	fn default() -> Self {
		Self::new()
	}
}

impl EditorSession {
	pub fn new() -> Self {
		Self::from_document(ComposeDocument::new())
	}

	pub fn from_document(document: ComposeDocument) -> Self {
		let yaml = project(&document);

		Self { document, yaml }
	}

	pub const fn document(&self) -> &ComposeDocument {
		&self.document
	}

	pub fn yaml(&self) -> &str {
		&self.yaml
	}

	pub fn into_document(self) -> ComposeDocument {
		self.document
	}

	/// Applies one or more edits as a single step.
	///
	/// If the closure returns an error, neither the document nor the projection change, even if
	/// some of the edits in the closure had already succeeded.
	pub fn edit<T>(
		&mut self,
		edit: impl FnOnce(&mut ComposeDocument) -> Result<T, ModelError>,
	) -> Result<T, ModelError> {
		let mut draft = self.document.clone();

		let output = edit(&mut draft)?;

		self.document = draft;
		self.yaml = project(&self.document);

		Ok(output)
	}

	/// Replaces the document with the contents of a Compose file. The session is left untouched
	/// if the file cannot be read.
	pub fn import_template(&mut self, name: &str, text: &str) -> Result<(), ImportError> {
		match ComposeDocument::from_compose_yaml(text) {
			Ok(document) => {
				debug!(template = name, "imported template");

				self.yaml = project(&document);
				self.document = document;

				Ok(())
			}
			Err(e) => {
				warn!(template = name, "{e}");

				Err(e)
			}
		}
	}
}
