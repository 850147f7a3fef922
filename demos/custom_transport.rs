//! Demonstrates registering a custom HTTP client and mapper that emit non-reqwest errors.
//!
//! 1. Implement [`ApiHttpClient`] so the sequencer can drive an arbitrary transport.
//! 2. Provide a [`TransportErrorMapper`] that turns the transport's error type into the crate's
//!    [`Error`], telling deadline expiry apart from other failures.
//! 3. Wrap both handles in `Arc` and pass them to [`EditSequencer::with_http_client`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
	time::Duration,
};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use reconcile_edit_client::{
	auth::OAuth1Signer,
	config::ApiConfig,
	document::{MutationDocument, Statement},
	error::{Error, TransportError},
	ext::RequestSigner,
	flows::EditSequencer,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture, HttpMethod, TransportErrorMapper},
	obs::Stage,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ApiConfig::wikibase(&Url::parse("https://wiki.example.org")?)?;
	let signer: Arc<dyn RequestSigner> = Arc::new(OAuth1Signer::from_parts(
		"demo-key",
		"demo-secret",
		"demo-token",
		"demo-token-secret",
	)?);
	let document = MutationDocument::builder("P1")
		.statement(Statement::new("P1", "https://example.org/widget"))
		.statement(Statement::new("P2", "Widget"))
		.build()?;
	let mapper = <Arc<MockTransportErrorMapper>>::new(MockTransportErrorMapper);
	let sequencer: EditSequencer<MockHttpClient, MockTransportErrorMapper> =
		EditSequencer::with_http_client(
			config.clone(),
			Arc::clone(&signer),
			Arc::new(MockHttpClient::success()),
			Arc::clone(&mapper),
		);
	let result = sequencer.reconcile_edit(&document).await?;

	println!("Mock edit endpoint answered HTTP {}: {}.", result.status, result.body_text());

	let failing: EditSequencer<MockHttpClient, MockTransportErrorMapper> =
		EditSequencer::with_http_client(
			config.clone(),
			Arc::clone(&signer),
			Arc::new(MockHttpClient::failing(MockTransportError::DnsFailure {
				host: "wiki.example.org",
			})),
			Arc::clone(&mapper),
		);

	match failing.reconcile_edit(&document).await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) => println!("Transport error mapped by the sequencer ({:?}): {e}", e.stage()),
	}

	let stalled: EditSequencer<MockHttpClient, MockTransportErrorMapper> =
		EditSequencer::with_http_client(
			config,
			signer,
			Arc::new(MockHttpClient::failing(MockTransportError::DeadlineExceeded)),
			mapper,
		);

	match stalled.reconcile_edit(&document).await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) => println!("Deadline reported as a timeout: {e}"),
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure { host: &'static str },
	DeadlineExceeded,
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
			Self::DeadlineExceeded => write!(f, "Deadline exceeded"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Clone)]
struct MockHttpClient {
	failure: Option<MockTransportError>,
}
impl MockHttpClient {
	fn success() -> Self {
		Self { failure: None }
	}

	fn failing(error: MockTransportError) -> Self {
		Self { failure: Some(error) }
	}
}
impl ApiHttpClient for MockHttpClient {
	type TransportError = MockTransportError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let failure = self.failure.clone();

		Box::pin(async move {
			if let Some(error) = failure {
				return Err(error);
			}

			let body: &[u8] = match request.method {
				HttpMethod::Get => b"{\"query\":{\"tokens\":{\"csrftoken\":\"mock-token+\\\\\"}}}",
				HttpMethod::Post => b"{\"success\":true,\"entityId\":\"Q1\",\"revisionId\":1}",
			};

			Ok(ApiResponse { status: 200, headers: Vec::new(), body: body.to_vec() })
		})
	}
}

#[derive(Clone, Default)]
struct MockTransportErrorMapper;
impl TransportErrorMapper<MockTransportError> for MockTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: Stage,
		timeout: Duration,
		error: MockTransportError,
	) -> Error {
		match error {
			MockTransportError::DeadlineExceeded => Error::Timeout { stage, timeout },
			other => Error::Transport { stage, source: TransportError::network(other) },
		}
	}
}
