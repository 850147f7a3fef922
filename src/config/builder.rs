// self
use crate::{_prelude::*, config::ApiConfig};

/// Errors raised while constructing or validating an [`ApiConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ApiConfigError {
	/// Action API URL is mandatory.
	#[error("Missing action API endpoint.")]
	MissingActionApi,
	/// Edit endpoint URL is mandatory.
	#[error("Missing edit endpoint.")]
	MissingEditEndpoint,
	/// Endpoint URL could not be derived.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must be plain HTTP(S) URLs.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoints must not carry credentials, query strings, or fragments.
	#[error("The {endpoint} endpoint must not carry userinfo, a query, or a fragment: {url}.")]
	UnexpectedUrlParts {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A zero deadline would fail every call.
	#[error("Timeout must be greater than zero.")]
	ZeroTimeout,
	/// User agent must be a non-empty, printable header value.
	#[error("User agent must be non-empty printable ASCII.")]
	InvalidUserAgent,
}

/// Builder for [`ApiConfig`] values.
#[derive(Debug)]
pub struct ApiConfigBuilder {
	/// Action API endpoint.
	pub action_api: Option<Url>,
	/// Reconcile-edit endpoint.
	pub edit_endpoint: Option<Url>,
	/// Per-call deadline.
	pub timeout: StdDuration,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl ApiConfigBuilder {
	/// Creates a new builder with the default timeout and user agent.
	pub fn new() -> Self {
		Self {
			action_api: None,
			edit_endpoint: None,
			timeout: ApiConfig::DEFAULT_TIMEOUT,
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}

	/// Sets the action API endpoint.
	pub fn action_api(mut self, url: Url) -> Self {
		self.action_api = Some(url);

		self
	}

	/// Sets the edit endpoint.
	pub fn edit_endpoint(mut self, url: Url) -> Self {
		self.edit_endpoint = Some(url);

		self
	}

	/// Overrides the per-call deadline (defaults to 30 seconds).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ApiConfig, ApiConfigError> {
		let action_api = self.action_api.ok_or(ApiConfigError::MissingActionApi)?;
		let edit_endpoint = self.edit_endpoint.ok_or(ApiConfigError::MissingEditEndpoint)?;
		let config =
			ApiConfig { action_api, edit_endpoint, timeout: self.timeout, user_agent: self.user_agent };

		config.validate()?;

		Ok(config)
	}
}
impl Default for ApiConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ApiConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ApiConfigError> {
		validate_endpoint("action_api", &self.action_api)?;
		validate_endpoint("edit", &self.edit_endpoint)?;

		if self.timeout.is_zero() {
			return Err(ApiConfigError::ZeroTimeout);
		}
		if self.user_agent.is_empty()
			|| !self.user_agent.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
		{
			return Err(ApiConfigError::InvalidUserAgent);
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ApiConfigError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(ApiConfigError::UnsupportedScheme { endpoint: name, url: url.to_string() });
	}
	if !url.username().is_empty()
		|| url.password().is_some()
		|| url.query().is_some()
		|| url.fragment().is_some()
	{
		return Err(ApiConfigError::UnexpectedUrlParts { endpoint: name, url: url.to_string() });
	}

	Ok(())
}
