//! Reconciliation edit documents.
//!
//! A [`MutationDocument`] is prepared ahead of time by the caller and never mutated. Attaching
//! a CSRF token produces a separate [`AuthorizedEdit`], which is the only value the sequencer
//! will submit, so a document can't be sent before its token exists.

/// Builder and validation rules for mutation documents.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, api::CsrfToken};

/// JSON key carrying the input format version in both sections.
pub const VERSION_KEY: &str = "wikibasereconcileedit-version";
/// Supported `reconcile` section version.
pub const RECONCILE_VERSION: &str = "0.0.1";
/// `entity` section version for the minimal statement list input.
pub const MINIMAL_ENTITY_VERSION: &str = "0.0.1/minimal";
/// `entity` section version for a full Wikibase item serialization.
pub const FULL_ENTITY_VERSION: &str = "0.0.1/full";

/// Free-form JSON members carried through untouched.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Identifies the target entity by the URL-typed property used for matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSpec {
	/// Input format version; must be [`RECONCILE_VERSION`].
	#[serde(rename = "wikibasereconcileedit-version")]
	pub version: String,
	/// Property id (e.g. `P1`) whose value locates the entity.
	#[serde(rename = "urlReconcile")]
	pub url_reconcile: String,
	/// Members this client does not interpret.
	#[serde(flatten)]
	pub extra: JsonObject,
}

/// One property/value assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
	/// Property id, e.g. `P2`.
	pub property: String,
	/// Value in the property's string form; the server parses it by datatype.
	pub value: String,
	/// Members this client does not interpret.
	#[serde(flatten)]
	pub extra: JsonObject,
}
impl Statement {
	/// Creates a new statement.
	pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
		Self { property: property.into(), value: value.into(), extra: JsonObject::new() }
	}
}

/// Entity payload in the minimal input format.
///
/// Term maps are keyed by language code (sitelinks by site id) and omitted from the wire form
/// when empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalEntity {
	/// Input format version; must be [`MINIMAL_ENTITY_VERSION`].
	#[serde(rename = "wikibasereconcileedit-version")]
	pub version: String,
	/// Labels by language.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub labels: BTreeMap<String, String>,
	/// Descriptions by language.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub descriptions: BTreeMap<String, String>,
	/// Aliases by language.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub aliases: BTreeMap<String, Vec<String>>,
	/// Page names by site id.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub sitelinks: BTreeMap<String, String>,
	/// Ordered statements to assert.
	#[serde(default)]
	pub statements: Vec<Statement>,
	/// Members this client does not interpret.
	#[serde(flatten)]
	pub extra: JsonObject,
}

/// `entity` section, dispatched on its version tag.
///
/// Anything not tagged [`FULL_ENTITY_VERSION`] is read as [`MinimalEntity`], so unknown versions
/// surface from validation rather than from parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityInput {
	/// Minimal statement list input.
	Minimal(MinimalEntity),
	/// Full Wikibase item serialization, passed through opaquely (version tag included).
	Full(JsonObject),
}
impl EntityInput {
	/// Version tag of the section.
	pub fn version(&self) -> &str {
		match self {
			Self::Minimal(entity) => &entity.version,
			Self::Full(object) =>
				object.get(VERSION_KEY).and_then(serde_json::Value::as_str).unwrap_or_default(),
		}
	}

	/// Minimal-format payload, if that is the format in use.
	pub fn as_minimal(&self) -> Option<&MinimalEntity> {
		match self {
			Self::Minimal(entity) => Some(entity),
			Self::Full(_) => None,
		}
	}

	/// Full-format payload, if that is the format in use.
	pub fn as_full(&self) -> Option<&JsonObject> {
		match self {
			Self::Full(object) => Some(object),
			Self::Minimal(_) => None,
		}
	}
}
impl<'de> Deserialize<'de> for EntityInput {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let object = JsonObject::deserialize(deserializer)?;

		if object.get(VERSION_KEY).and_then(serde_json::Value::as_str) == Some(FULL_ENTITY_VERSION)
		{
			return Ok(Self::Full(object));
		}

		MinimalEntity::deserialize(serde_json::Value::Object(object))
			.map(Self::Minimal)
			.map_err(serde::de::Error::custom)
	}
}

/// Reconciliation edit with an empty token slot.
///
/// Members outside `reconcile`, `entity`, and `token` are kept and submitted as given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationDocument {
	reconcile: ReconcileSpec,
	entity: EntityInput,
	#[serde(default)]
	token: String,
	#[serde(flatten)]
	extra: JsonObject,
}
impl MutationDocument {
	/// Starts a minimal-format document reconciled on `url_reconcile`.
	pub fn builder(url_reconcile: impl Into<String>) -> MutationDocumentBuilder {
		MutationDocumentBuilder::new(url_reconcile)
	}

	/// Wraps a full Wikibase item serialization reconciled on `url_reconcile`.
	///
	/// The version tag is set on `entity`; its remaining content is left to the server.
	pub fn full(
		url_reconcile: impl Into<String>,
		mut entity: JsonObject,
	) -> Result<Self, DocumentError> {
		entity.insert(VERSION_KEY.into(), FULL_ENTITY_VERSION.into());

		let document = Self {
			reconcile: ReconcileSpec {
				version: RECONCILE_VERSION.into(),
				url_reconcile: url_reconcile.into(),
				extra: JsonObject::new(),
			},
			entity: EntityInput::Full(entity),
			token: String::new(),
			extra: JsonObject::new(),
		};

		document.validate()?;

		Ok(document)
	}

	/// Parses and validates a caller-prepared JSON document. Any token it carries is dropped.
	pub fn from_json(raw: &str) -> Result<Self, DocumentError> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let mut document: Self = serde_path_to_error::deserialize(de)
			.map_err(|source| DocumentError::Malformed { source })?;

		document.token.clear();
		document.validate()?;

		Ok(document)
	}

	/// Target-matching section.
	pub fn reconcile(&self) -> &ReconcileSpec {
		&self.reconcile
	}

	/// Entity section.
	pub fn entity(&self) -> &EntityInput {
		&self.entity
	}

	/// Top-level members other than `reconcile`, `entity`, and `token`.
	pub fn extra(&self) -> &JsonObject {
		&self.extra
	}

	/// Returns a copy of the document carrying `token`; `self` is left untouched.
	pub fn authorize(&self, token: &CsrfToken) -> AuthorizedEdit {
		let mut document = self.clone();

		document.token = token.expose().to_owned();

		AuthorizedEdit(document)
	}
}

/// Mutation document whose `token` field holds a freshly fetched CSRF token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorizedEdit(MutationDocument);
impl AuthorizedEdit {
	/// Token embedded in the document.
	pub fn token(&self) -> &str {
		&self.0.token
	}

	/// Underlying document.
	pub fn document(&self) -> &MutationDocument {
		&self.0
	}

	/// Serializes the document into the JSON request body.
	pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn sample() -> MutationDocument {
		MutationDocument::builder("P1")
			.statement(Statement::new("P1", "https://gitlab.com/OSEGermany/ohloom"))
			.statement(Statement::new("P2", "OHLOOM"))
			.build()
			.expect("Sample document should be valid.")
	}

	#[test]
	fn wire_shape_matches_minimal_input_format() {
		let value = serde_json::to_value(sample()).expect("Document should serialize.");

		assert_eq!(
			value,
			json!({
				"reconcile": {
					"wikibasereconcileedit-version": "0.0.1",
					"urlReconcile": "P1"
				},
				"entity": {
					"wikibasereconcileedit-version": "0.0.1/minimal",
					"statements": [
						{ "property": "P1", "value": "https://gitlab.com/OSEGermany/ohloom" },
						{ "property": "P2", "value": "OHLOOM" }
					]
				},
				"token": ""
			})
		);
	}

	#[test]
	fn authorize_returns_new_value_and_leaves_prepared_document_empty() {
		let document = sample();
		let edit = document.authorize(&CsrfToken::new("abc123+\\"));

		assert_eq!(edit.token(), "abc123+\\");
		assert_eq!(edit.document().reconcile(), document.reconcile());
		assert_eq!(edit.document().entity(), document.entity());
		assert_eq!(document.token, "");

		let bytes = edit.to_json_bytes().expect("Authorized edit should serialize.");
		let text = String::from_utf8(bytes).expect("JSON output must be UTF-8.");

		assert!(text.starts_with("{\"reconcile\":"), "Field order must be preserved: {text}.");
		assert!(text.ends_with("\"token\":\"abc123+\\\\\"}"), "Token must be last: {text}.");
	}

	#[test]
	fn from_json_validates_and_clears_stale_tokens() {
		let raw = r#"{
			"reconcile": { "wikibasereconcileedit-version": "0.0.1", "urlReconcile": "P1" },
			"entity": {
				"wikibasereconcileedit-version": "0.0.1/minimal",
				"labels": { "en": "OHLOOM" },
				"statements": [ { "property": "P1", "value": "https://x" } ]
			},
			"token": "stale"
		}"#;
		let document = MutationDocument::from_json(raw).expect("Document should parse.");

		assert_eq!(document.token, "");

		let entity = document.entity().as_minimal().expect("Entity should use the minimal format.");

		assert_eq!(entity.labels.get("en").map(String::as_str), Some("OHLOOM"));

		let err = MutationDocument::from_json(r#"{"reconcile":{}}"#)
			.expect_err("Incomplete documents must be rejected.");

		match err {
			DocumentError::Malformed { source } =>
				assert_eq!(source.path().to_string(), "reconcile"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn uninterpreted_members_survive_parsing_and_authorization() {
		let input = json!({
			"reconcile": {
				"wikibasereconcileedit-version": "0.0.1",
				"urlReconcile": "P1",
				"note": "x"
			},
			"entity": {
				"wikibasereconcileedit-version": "0.0.1/minimal",
				"statements": [ { "property": "P1", "value": "https://x", "qualifiers": "q" } ],
				"claims": [1]
			},
			"token": "",
			"summary": "keep me"
		});
		let document =
			MutationDocument::from_json(&input.to_string()).expect("Document should parse.");

		assert_eq!(document.extra().get("summary"), Some(&json!("keep me")));
		assert_eq!(serde_json::to_value(&document).expect("Document should serialize."), input);

		let edit = document.authorize(&CsrfToken::new("abc123"));
		let mut expected = input;

		expected["token"] = json!("abc123");

		assert_eq!(serde_json::to_value(&edit).expect("Edit should serialize."), expected);
	}

	#[test]
	fn full_format_entities_pass_through_opaquely() {
		let input = json!({
			"reconcile": { "wikibasereconcileedit-version": "0.0.1", "urlReconcile": "P1" },
			"entity": {
				"wikibasereconcileedit-version": "0.0.1/full",
				"type": "item",
				"labels": { "en": { "language": "en", "value": "Loom" } },
				"claims": {
					"P1": [ {
						"mainsnak": {
							"snaktype": "value",
							"property": "P1",
							"datavalue": { "value": "https://x", "type": "string" }
						},
						"type": "statement",
						"rank": "normal"
					} ]
				}
			},
			"token": ""
		});
		let document =
			MutationDocument::from_json(&input.to_string()).expect("Full document should parse.");

		assert_eq!(document.entity().version(), FULL_ENTITY_VERSION);
		assert!(document.entity().as_minimal().is_none());

		let edit = document.authorize(&CsrfToken::new("abc123"));
		let mut expected = input.clone();

		expected["token"] = json!("abc123");

		assert_eq!(serde_json::to_value(&edit).expect("Edit should serialize."), expected);

		let entity = match input["entity"].clone() {
			serde_json::Value::Object(object) => object,
			other => panic!("Unexpected entity fixture: {other:?}."),
		};
		let built = MutationDocument::full("P1", entity).expect("Full document should build.");

		assert_eq!(built, document);
	}

	#[test]
	fn full_format_still_checks_the_envelope() {
		let err = MutationDocument::full("url", JsonObject::new())
			.expect_err("Non-property reconcile keys must be rejected.");

		assert!(matches!(err, DocumentError::InvalidPropertyId { .. }));

		let err = MutationDocument::from_json(
			r#"{
				"reconcile": { "wikibasereconcileedit-version": "0.0.1", "urlReconcile": "P1" },
				"entity": { "wikibasereconcileedit-version": "0.0.2/full" }
			}"#,
		)
		.expect_err("Unknown entity versions must be rejected.");

		assert!(matches!(
			err,
			DocumentError::UnsupportedEntityVersion { ref found } if found == "0.0.2/full"
		));
	}
}
