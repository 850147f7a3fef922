// self
use crate::{_prelude::*, flows::SequenceState, obs::Stage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by the sequencer stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage and target URL.
	pub fn new(stage: Stage, target: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"reconcile_edit.stage",
				stage = stage.as_str(),
				target = %target,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, target);

			Self {}
		}
	}

	/// Records the HTTP status observed for this stage.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("status", status);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a sequence state transition (when enabled).
pub fn record_transition(from: SequenceState, to: SequenceState) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(from = from.as_str(), to = to.as_str(), "edit sequence transition");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (from, to);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stage_span_noop_without_tracing() {
		let target = Url::parse("https://wiki.example.org/w/api.php")
			.expect("Span target fixture should parse.");
		let span = StageSpan::new(Stage::FetchToken, &target);

		span.record_status(200);
		record_transition(SequenceState::FetchingToken, SequenceState::TokenAcquired);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let target =
			Url::parse("https://wiki.example.org/w/rest.php/wikibase-reconcile-edit/v0/edit")
				.expect("Span target fixture should parse.");
		let span = StageSpan::new(Stage::SubmitEdit, &target);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
