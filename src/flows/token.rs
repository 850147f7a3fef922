//! Token stage: signed `meta=tokens` query against the action API.

// self
use crate::{
	_prelude::*,
	api::{self, CsrfToken},
	flows::EditSequencer,
	http::{ApiHttpClient, ApiRequest, TransportErrorMapper},
	obs::{self, Stage, StageOutcome, StageSpan},
};

impl<C, M> EditSequencer<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Requests a CSRF token bound to the signer's session.
	///
	/// A non-2xx reply fails with [`Error::TokenFetch`]; a 2xx reply without a usable token
	/// fails with [`Error::Protocol`].
	pub async fn fetch_token(&self) -> Result<CsrfToken> {
		const STAGE: Stage = Stage::FetchToken;

		let span = StageSpan::new(STAGE, &self.config.action_api);

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async {
				let request = ApiRequest::get(api::token_query_url(&self.config.action_api))
					.with_timeout(self.config.timeout);
				let response = self.send(STAGE, self.signer.sign(request)?).await?;

				span.record_status(response.status);
				obs::record_stage_status(STAGE, response.status);

				if !response.is_success() {
					return Err(Error::TokenFetch {
						status: response.status,
						body: response.body_text(),
					});
				}

				Ok(api::parse_token_response(&response.body)?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}
}
