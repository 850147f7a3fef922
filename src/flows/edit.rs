//! Submission stage and the full reconcile-edit transaction.

// self
use crate::{
	_prelude::*,
	api::EditResult,
	document::{AuthorizedEdit, MutationDocument},
	error::ConfigError,
	flows::{EditSequencer, SequenceState},
	http::{ApiHttpClient, ApiRequest, TransportErrorMapper},
	obs::{self, Stage, StageOutcome, StageSpan},
};

impl<C, M> EditSequencer<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validates `document`, fetches a fresh token, and submits the tokenized copy.
	///
	/// Exactly one token query and at most one submission are made. Any failure aborts the
	/// sequence; nothing is retried, and a document that fails local validation costs no
	/// requests at all.
	pub async fn reconcile_edit(&self, document: &MutationDocument) -> Result<EditResult> {
		document.validate()?;

		let mut state = SequenceState::FetchingToken;
		let token = match self.fetch_token().await {
			Ok(token) => token,
			Err(e) => {
				state.transition(SequenceState::Failed(Stage::FetchToken));

				return Err(e);
			},
		};

		state.transition(SequenceState::TokenAcquired);

		let edit = document.authorize(&token);

		match self.submit_edit(&edit).await {
			Ok(result) => {
				state.transition(SequenceState::Submitted);

				Ok(result)
			},
			Err(e) => {
				state.transition(SequenceState::Failed(Stage::SubmitEdit));

				Err(e)
			},
		}
	}

	/// POSTs an already tokenized document to the edit endpoint.
	///
	/// A non-2xx reply fails with [`Error::Submission`] carrying the body verbatim. The token
	/// inside `edit` is single-use in practice; callers must not resubmit it after a failure.
	pub async fn submit_edit(&self, edit: &AuthorizedEdit) -> Result<EditResult> {
		const STAGE: Stage = Stage::SubmitEdit;

		let span = StageSpan::new(STAGE, &self.config.edit_endpoint);

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async {
				let body = edit.to_json_bytes().map_err(ConfigError::Serialize)?;
				let request = ApiRequest::post_json(self.config.edit_endpoint.clone(), body)
					.with_timeout(self.config.timeout);
				let response = self.send(STAGE, self.signer.sign(request)?).await?;

				span.record_status(response.status);
				obs::record_stage_status(STAGE, response.status);

				if !response.is_success() {
					return Err(Error::Submission {
						status: response.status,
						body: response.body_text(),
					});
				}

				Ok(EditResult::from(response))
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}
}
