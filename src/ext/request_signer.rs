//! Request signing contract shared by both calls of the edit sequence.

// self
use crate::{_prelude::*, http::ApiRequest};

/// Describes how to authenticate an outbound [`ApiRequest`] without constraining the HTTP
/// client type.
///
/// The sequencer holds exactly one signer and routes the token fetch and the edit submission
/// through it, so the server sees both calls as coming from the same actor.
/// [`OAuth1Signer`](crate::auth::OAuth1Signer) is the stock implementation.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it with authentication attached.
	fn sign(&self, request: ApiRequest) -> Result<ApiRequest>;
}
