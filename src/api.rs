//! Wire contracts of the two remote endpoints.
//!
//! Only the token reply has a schema this client depends on; the edit reply is surfaced raw
//! through [`EditResult`], with [`EditResult::outcome`] as a best-effort reader for the summary
//! the reconcile-edit endpoint usually returns.

// self
use crate::{_prelude::*, auth::Secret, error::ProtocolError, http::ApiResponse};

/// Query parameters asking the action API for a CSRF token.
pub const TOKEN_QUERY: [(&str, &str); 3] =
	[("action", "query"), ("meta", "tokens"), ("format", "json")];
/// Token MediaWiki hands to sessions it could not authenticate.
pub const ANONYMOUS_TOKEN: &str = "+\\";

/// Session-bound anti-forgery token, redacted when printed.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(Secret);
impl CsrfToken {
	/// Wraps a token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Secret::new(value))
	}

	/// Returns the raw token for embedding into the edit document.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}
impl Debug for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CsrfToken").field(&"<redacted>").finish()
	}
}

/// Appends [`TOKEN_QUERY`] to the action API URL.
pub fn token_query_url(action_api: &Url) -> Url {
	let mut url = action_api.clone();

	url.query_pairs_mut().extend_pairs(TOKEN_QUERY);

	url
}

/// Extracts `query.tokens.csrftoken` from a 2xx token reply.
///
/// An action API `error` object, a missing path, an empty token, and the anonymous token are
/// all reported as [`ProtocolError`]s; none of them yields a token.
pub fn parse_token_response(body: &[u8]) -> Result<CsrfToken, ProtocolError> {
	if let Ok(ApiErrorEnvelope { error }) = serde_json::from_slice(body) {
		return Err(ProtocolError::ApiError { code: error.code, info: error.info });
	}

	let de = &mut serde_json::Deserializer::from_slice(body);
	let envelope: TokenEnvelope =
		serde_path_to_error::deserialize(de).map_err(|source| {
			ProtocolError::MalformedTokenResponse {
				source,
				body: String::from_utf8_lossy(body).into_owned(),
			}
		})?;
	let token = envelope.query.tokens.csrftoken;

	if token.is_empty() {
		return Err(ProtocolError::EmptyToken);
	}
	if token == ANONYMOUS_TOKEN {
		return Err(ProtocolError::AnonymousToken);
	}

	Ok(CsrfToken::new(token))
}

#[derive(Deserialize)]
struct TokenEnvelope {
	query: TokenQuery,
}
#[derive(Deserialize)]
struct TokenQuery {
	tokens: TokenSet,
}
#[derive(Deserialize)]
struct TokenSet {
	csrftoken: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
	error: ApiErrorBody,
}
#[derive(Deserialize)]
struct ApiErrorBody {
	code: String,
	#[serde(default)]
	info: String,
}

/// Raw reply to an accepted edit submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditResult {
	/// HTTP status code (always 2xx).
	pub status: u16,
	/// Response headers with lower-case names.
	pub headers: Vec<(String, String)>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl EditResult {
	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Body parsed as arbitrary JSON.
	pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	/// Reads the `{success, entityId, revisionId}` summary when the body carries one.
	pub fn outcome(&self) -> Option<EditOutcome> {
		serde_json::from_slice(&self.body).ok()
	}
}
impl From<ApiResponse> for EditResult {
	fn from(response: ApiResponse) -> Self {
		Self { status: response.status, headers: response.headers, body: response.body }
	}
}

/// Summary of a saved edit.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EditOutcome {
	/// Whether the server reports the save as successful.
	pub success: bool,
	/// Id of the reconciled (possibly created) item.
	#[serde(rename = "entityId", default)]
	pub entity_id: Option<String>,
	/// Revision created by the edit.
	#[serde(rename = "revisionId", default)]
	pub revision_id: Option<u64>,
}
