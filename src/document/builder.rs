// self
use crate::{
	_prelude::*,
	document::{
		EntityInput, FULL_ENTITY_VERSION, JsonObject, MINIMAL_ENTITY_VERSION, MinimalEntity,
		MutationDocument, RECONCILE_VERSION, ReconcileSpec, Statement,
	},
};

const PROPERTY_ID_MAX_DIGITS: usize = 10;

/// Errors raised while building or validating a [`MutationDocument`].
#[derive(Debug, ThisError)]
pub enum DocumentError {
	/// JSON input does not have the document shape.
	#[error("Mutation document is malformed.")]
	Malformed {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// `reconcile` section uses a version the endpoint does not accept.
	#[error(
		"Unsupported reconcile version `{found}`; expected `{expected}`.",
		expected = RECONCILE_VERSION
	)]
	UnsupportedReconcileVersion {
		/// Version found in the document.
		found: String,
	},
	/// `entity` section uses a version the endpoint does not accept.
	#[error(
		"Unsupported entity version `{found}`; expected `{minimal}` or `{full}`.",
		minimal = MINIMAL_ENTITY_VERSION,
		full = FULL_ENTITY_VERSION
	)]
	UnsupportedEntityVersion {
		/// Version found in the document.
		found: String,
	},
	/// A property id does not look like `P<digits>`.
	#[error("`{value}` in {location} is not a property id.")]
	InvalidPropertyId {
		/// Where the id appeared (`urlReconcile` or `statements[i]`).
		location: String,
		/// Offending value.
		value: String,
	},
	/// A statement carries an empty value.
	#[error("Statement {index} for {property} has an empty value.")]
	EmptyStatementValue {
		/// Statement position.
		index: usize,
		/// Statement property.
		property: String,
	},
	/// The reconcile property must be asserted exactly once.
	#[error("Expected exactly one {property} statement to reconcile on, found {found}.")]
	ReconcileStatementCount {
		/// Reconcile property id.
		property: String,
		/// Number of matching statements.
		found: usize,
	},
}

/// Builder for minimal-format [`MutationDocument`] values.
#[derive(Debug)]
pub struct MutationDocumentBuilder {
	url_reconcile: String,
	entity: MinimalEntity,
}
impl MutationDocumentBuilder {
	/// Creates a builder reconciling on `url_reconcile`.
	pub fn new(url_reconcile: impl Into<String>) -> Self {
		Self {
			url_reconcile: url_reconcile.into(),
			entity: MinimalEntity {
				version: MINIMAL_ENTITY_VERSION.into(),
				labels: BTreeMap::new(),
				descriptions: BTreeMap::new(),
				aliases: BTreeMap::new(),
				sitelinks: BTreeMap::new(),
				statements: Vec::new(),
				extra: JsonObject::new(),
			},
		}
	}

	/// Appends a statement; order is preserved on the wire.
	pub fn statement(mut self, statement: Statement) -> Self {
		self.entity.statements.push(statement);

		self
	}

	/// Appends multiple statements.
	pub fn statements<I>(mut self, statements: I) -> Self
	where
		I: IntoIterator<Item = Statement>,
	{
		self.entity.statements.extend(statements);

		self
	}

	/// Sets the label for `language`.
	pub fn label(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
		self.entity.labels.insert(language.into(), text.into());

		self
	}

	/// Sets the description for `language`.
	pub fn description(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
		self.entity.descriptions.insert(language.into(), text.into());

		self
	}

	/// Adds an alias for `language`.
	pub fn alias(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
		self.entity.aliases.entry(language.into()).or_default().push(text.into());

		self
	}

	/// Sets the sitelink for `site`.
	pub fn sitelink(mut self, site: impl Into<String>, page: impl Into<String>) -> Self {
		self.entity.sitelinks.insert(site.into(), page.into());

		self
	}

	/// Consumes the builder and validates the resulting document.
	pub fn build(self) -> Result<MutationDocument, DocumentError> {
		let document = MutationDocument {
			reconcile: ReconcileSpec {
				version: RECONCILE_VERSION.into(),
				url_reconcile: self.url_reconcile,
				extra: JsonObject::new(),
			},
			entity: EntityInput::Minimal(self.entity),
			token: String::new(),
			extra: JsonObject::new(),
		};

		document.validate()?;

		Ok(document)
	}
}

impl MutationDocument {
	/// Checks the rules the edit endpoint enforces on the request envelope.
	///
	/// The sequencer runs this before fetching a token so an unusable document costs no
	/// round-trips. Datatype checks stay server-side, as does the content of a full-format entity.
	pub fn validate(&self) -> Result<(), DocumentError> {
		if self.reconcile.version != RECONCILE_VERSION {
			return Err(DocumentError::UnsupportedReconcileVersion {
				found: self.reconcile.version.clone(),
			});
		}

		let reconcile_on = &self.reconcile.url_reconcile;

		if !is_property_id(reconcile_on) {
			return Err(DocumentError::InvalidPropertyId {
				location: "urlReconcile".into(),
				value: reconcile_on.clone(),
			});
		}

		let entity = match &self.entity {
			EntityInput::Full(_) => return Ok(()),
			EntityInput::Minimal(entity) => entity,
		};

		if entity.version != MINIMAL_ENTITY_VERSION {
			return Err(DocumentError::UnsupportedEntityVersion { found: entity.version.clone() });
		}

		let mut reconcile_hits = 0;

		for (index, statement) in entity.statements.iter().enumerate() {
			if !is_property_id(&statement.property) {
				return Err(DocumentError::InvalidPropertyId {
					location: format!("statements[{index}]"),
					value: statement.property.clone(),
				});
			}
			if statement.value.is_empty() {
				return Err(DocumentError::EmptyStatementValue {
					index,
					property: statement.property.clone(),
				});
			}
			if statement.property.eq_ignore_ascii_case(reconcile_on) {
				reconcile_hits += 1;
			}
		}

		if reconcile_hits != 1 {
			return Err(DocumentError::ReconcileStatementCount {
				property: reconcile_on.clone(),
				found: reconcile_hits,
			});
		}

		Ok(())
	}
}

/// `P` (either case) followed by 1-10 digits without a leading zero.
fn is_property_id(value: &str) -> bool {
	let Some(digits) = value.strip_prefix(['P', 'p']) else {
		return false;
	};

	!digits.is_empty()
		&& digits.len() <= PROPERTY_ID_MAX_DIGITS
		&& !digits.starts_with('0')
		&& digits.bytes().all(|b| b.is_ascii_digit())
}
