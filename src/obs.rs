//! Optional observability helpers for the edit sequence.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `reconcile_edit.stage` with the `stage` field,
//!   plus debug events for every sequence state transition.
//! - Enable `metrics` to increment the `reconcile_edit_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`, and `reconcile_edit_responses_total`
//!   for every HTTP reply, labeled by `stage` + status `class` (`2xx`, `3xx`, ...).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Network-bound steps of the edit sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Signed GET against the action API for a CSRF token.
	FetchToken,
	/// Signed POST of the tokenized document to the edit endpoint.
	SubmitEdit,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::FetchToken => "fetch_token",
			Stage::SubmitEdit => "submit_edit",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
