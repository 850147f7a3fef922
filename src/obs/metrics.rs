// self
use crate::obs::{Stage, StageOutcome};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"reconcile_edit_stage_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Counts a response received during `stage`, labeled by its status class.
pub fn record_stage_status(stage: Stage, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"reconcile_edit_responses_total",
			"stage" => stage.as_str(),
			"class" => status_class(status)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, status);
	}
}

/// Buckets an HTTP status into `1xx`..`5xx`, or `other` outside that range.
pub const fn status_class(status: u16) -> &'static str {
	match status {
		100..=199 => "1xx",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_stage_outcome_noop_without_metrics() {
		record_stage_outcome(Stage::SubmitEdit, StageOutcome::Failure);
		record_stage_status(Stage::FetchToken, 403);
	}

	#[test]
	fn status_classes() {
		assert_eq!(status_class(200), "2xx");
		assert_eq!(status_class(302), "3xx");
		assert_eq!(status_class(403), "4xx");
		assert_eq!(status_class(599), "5xx");
		assert_eq!(status_class(42), "other");
		assert_eq!(status_class(600), "other");
	}
}
