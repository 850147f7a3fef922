//! Client-level error types shared across the signer, transport, and edit sequence.

// self
use crate::{_prelude::*, obs::Stage};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is fatal to the invocation that produced it; the client never retries.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Signing material is missing or malformed.
	#[error(transparent)]
	InvalidCredential(#[from] crate::auth::CredentialError),
	/// Mutation document failed local validation before any request was sent.
	#[error(transparent)]
	Document(#[from] crate::document::DocumentError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while talking to either endpoint.
	#[error("Transport failure during the {stage} stage.")]
	Transport {
		/// Step that was in flight.
		stage: Stage,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// A call exceeded the configured deadline.
	#[error("The {stage} stage did not complete within {timeout:?}.")]
	Timeout {
		/// Step that was in flight.
		stage: Stage,
		/// Deadline that elapsed.
		timeout: StdDuration,
	},
	/// Token endpoint answered with a non-2xx status.
	#[error("Token endpoint returned HTTP {status}.")]
	TokenFetch {
		/// HTTP status code.
		status: u16,
		/// Raw response body for diagnosis.
		body: String,
	},
	/// Token endpoint answered 2xx but the body does not carry a usable token.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Edit endpoint answered with a non-2xx status.
	#[error("Edit endpoint returned HTTP {status}.")]
	Submission {
		/// HTTP status code.
		status: u16,
		/// Response body, verbatim.
		body: String,
	},
}
impl Error {
	/// Returns the sequence step the error belongs to, if it happened on the wire.
	///
	/// Credential, document, and configuration errors surface before any request is built and
	/// report `None`.
	pub fn stage(&self) -> Option<Stage> {
		match self {
			Self::Transport { stage, .. } | Self::Timeout { stage, .. } => Some(*stage),
			Self::TokenFetch { .. } | Self::Protocol(_) => Some(Stage::FetchToken),
			Self::Submission { .. } => Some(Stage::SubmitEdit),
			Self::InvalidCredential(_) | Self::Document(_) | Self::Config(_) => None,
		}
	}
}

impl From<crate::config::ApiConfigError> for Error {
	fn from(e: crate::config::ApiConfigError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Configuration failures raised while wiring the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint configuration is invalid.
	#[error(transparent)]
	InvalidApiConfig(#[from] crate::config::ApiConfigError),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Token endpoint was reachable but its reply does not follow the token protocol.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Body is not JSON or lacks `query.tokens.csrftoken`.
	#[error("Token response does not match the expected shape.")]
	MalformedTokenResponse {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Raw response body for diagnosis.
		body: String,
	},
	/// The action API reported an error object instead of a token.
	#[error("Action API rejected the token query with `{code}`: {info}.")]
	ApiError {
		/// Machine-readable error code (e.g. `mwoauth-invalid-authorization`).
		code: String,
		/// Human-readable explanation.
		info: String,
	},
	/// The server handed out the anonymous token, so the signature was not tied to a session.
	#[error("Token endpoint returned the anonymous token; the request was not authenticated.")]
	AnonymousToken,
	/// `csrftoken` was present but empty.
	#[error("Token endpoint returned an empty CSRF token.")]
	EmptyToken,
}
