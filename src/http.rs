//! Transport primitives for the signed token and edit calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the transport-neutral [`ApiRequest`] and
//! [`ApiResponse`] values so downstream crates can plug in their own HTTP stack. A
//! [`TransportErrorMapper`] turns each client's native error type into the crate's [`Error`],
//! which is where deadline expiry is told apart from other network failures.

// self
use crate::{_prelude::*, obs::Stage};
#[cfg(feature = "reqwest")]
use crate::{
	config::ApiConfig,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// HTTP methods used by the edit sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl HttpMethod {
	/// Upper-case method token, as used in the OAuth signature base string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound body. Form parameters take part in OAuth signing; JSON bytes do not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// Serialized JSON document.
	Json(Vec<u8>),
	/// `application/x-www-form-urlencoded` pairs, in order.
	Form(Vec<(String, String)>),
}

/// Transport-neutral outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute URL, query string included.
	pub url: Url,
	/// Header pairs with lower-case names.
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
	/// Deadline for the whole exchange; transports must fail the call once it elapses.
	pub timeout: Option<StdDuration>,
}
impl ApiRequest {
	/// Builds a body-less `GET`.
	pub fn get(url: Url) -> Self {
		Self {
			method: HttpMethod::Get,
			url,
			headers: Vec::new(),
			body: RequestBody::Empty,
			timeout: None,
		}
	}

	/// Builds a `POST` carrying serialized JSON.
	pub fn post_json(url: Url, body: Vec<u8>) -> Self {
		Self {
			method: HttpMethod::Post,
			url,
			headers: vec![("content-type".into(), "application/json".into())],
			body: RequestBody::Json(body),
			timeout: None,
		}
	}

	/// Builds a form-encoded `POST`.
	pub fn post_form(url: Url, params: Vec<(String, String)>) -> Self {
		Self {
			method: HttpMethod::Post,
			url,
			headers: vec![("content-type".into(), "application/x-www-form-urlencoded".into())],
			body: RequestBody::Form(params),
			timeout: None,
		}
	}

	/// Appends a header; the name is stored lower-cased.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.push((name.to_ascii_lowercase(), value.into()));

		self
	}

	/// Sets the per-call deadline.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Raw HTTP response handed back by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header pairs with lower-case names; non-UTF-8 values are dropped.
	pub headers: Vec<(String, String)>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Abstraction over HTTP transports able to execute signed [`ApiRequest`]s.
///
/// The trait is the sequencer's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a sequencer can be shared across tasks and must return non-2xx
/// replies (redirects included) as `Ok` responses; status classification belongs to the
/// sequencer. The sequencer stamps every request with [`ApiRequest::timeout`], and
/// implementations must fail the call with an error their [`TransportErrorMapper`] reports as
/// [`Error::Timeout`] once it elapses.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves once the full body has been read.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Maps transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts a transport error raised during `stage` into an [`Error`].
	///
	/// `timeout` is the configured deadline so elapsed calls can be reported as
	/// [`Error::Timeout`].
	fn map_transport_error(&self, stage: Stage, timeout: StdDuration, error: E) -> Error;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Per-request deadlines still apply. Redirect handling is whatever the client was built
	/// with; the default policy follows redirects.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with the configured timeout and user agent that never follows redirects.
	pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.timeout)
			.user_agent(config.user_agent.as_str())
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
			};
			let mut builder = client.request(method, request.url);

			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(bytes) => builder.body(bytes),
				RequestBody::Form(params) => builder.form(&params),
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, stage: Stage, timeout: StdDuration, err: ReqwestError) -> Error {
		if err.is_timeout() {
			return Error::Timeout { stage, timeout };
		}
		if err.is_builder() {
			return ConfigError::from(err).into();
		}

		Error::Transport { stage, source: TransportError::from(err) }
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}
