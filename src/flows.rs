//! Edit sequencer driving the token-fetch-then-submit transaction.

mod edit;
mod token;

// self
use crate::{
	_prelude::*,
	config::ApiConfig,
	ext::RequestSigner,
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportErrorMapper},
	obs::{self, Stage},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::OAuth1Signer,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
};

#[cfg(feature = "reqwest")]
/// Sequencer specialized for the crate's default reqwest transport stack.
pub type ReqwestEditSequencer = EditSequencer<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Progress of a single [`EditSequencer::reconcile_edit`] invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceState {
	/// Signed token query is in flight.
	FetchingToken,
	/// A CSRF token was extracted; the document is being completed and submitted.
	TokenAcquired,
	/// The edit endpoint accepted the submission.
	Submitted,
	/// The sequence aborted during the given stage.
	Failed(Stage),
}
impl SequenceState {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SequenceState::FetchingToken => "fetching_token",
			SequenceState::TokenAcquired => "token_acquired",
			SequenceState::Submitted => "submitted",
			SequenceState::Failed(_) => "failed",
		}
	}

	/// Whether no further transition can happen.
	pub const fn is_terminal(self) -> bool {
		matches!(self, SequenceState::Submitted | SequenceState::Failed(_))
	}

	/// Moves to `next`, emitting a transition event.
	fn transition(&mut self, next: Self) {
		obs::record_transition(*self, next);

		*self = next;
	}
}
impl Display for SequenceState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			SequenceState::Failed(stage) => write!(f, "failed during {stage}"),
			other => f.write_str(other.as_str()),
		}
	}
}

/// Runs the two-call reconcile-edit protocol against one wiki.
///
/// The sequencer owns the HTTP client, the endpoint configuration, and a single
/// [`RequestSigner`] that signs both the token query and the edit submission, so the server
/// attributes the two calls to the same authorized actor. It keeps no state between
/// invocations and can be shared read-only across tasks.
#[derive(Clone)]
pub struct EditSequencer<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for both outbound requests.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Endpoints, deadline, and user agent.
	pub config: ApiConfig,
	/// Signer applied identically to every request.
	pub signer: Arc<dyn RequestSigner>,
}
impl<C, M> EditSequencer<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a sequencer that reuses the caller-provided transport + mapper pair.
	///
	/// The transport is expected to enforce `config.timeout` itself.
	pub fn with_http_client(
		config: ApiConfig,
		signer: Arc<dyn RequestSigner>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config, signer }
	}

	async fn send(&self, stage: Stage, request: ApiRequest) -> Result<ApiResponse> {
		self.http_client.execute(request).await.map_err(|e| {
			self.transport_mapper.map_transport_error(stage, self.config.timeout, e)
		})
	}
}
#[cfg(feature = "reqwest")]
impl EditSequencer<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a sequencer backed by a reqwest client configured from `config`.
	pub fn new(config: ApiConfig, signer: OAuth1Signer) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(
			config,
			Arc::new(signer),
			http_client,
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> Debug for EditSequencer<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EditSequencer")
			.field("action_api", &self.config.action_api.as_str())
			.field("edit_endpoint", &self.config.edit_endpoint.as_str())
			.field("timeout", &self.config.timeout)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn terminal_states() {
		assert!(!SequenceState::FetchingToken.is_terminal());
		assert!(!SequenceState::TokenAcquired.is_terminal());
		assert!(SequenceState::Submitted.is_terminal());
		assert!(SequenceState::Failed(Stage::FetchToken).is_terminal());
	}

	#[test]
	fn transition_replaces_state() {
		let mut state = SequenceState::FetchingToken;

		state.transition(SequenceState::TokenAcquired);

		assert_eq!(state, SequenceState::TokenAcquired);

		state.transition(SequenceState::Failed(Stage::SubmitEdit));

		assert_eq!(state.to_string(), "failed during submit_edit");
		assert_eq!(state.as_str(), "failed");
	}
}
