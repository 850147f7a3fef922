//! OAuth 1.0a signed client for the Wikibase reconcile-edit REST API: fetch a session-bound CSRF
//! token, splice it into a reconciliation document, and submit the edit as the same actor.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod obs;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credential, OAuth1Signer},
		config::ApiConfig,
		document::{MutationDocument, Statement},
		flows::EditSequencer,
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	};

	/// Sequencer type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSequencer = EditSequencer<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	///
	/// The client has no deadline of its own and never follows redirects, so the sequencer's
	/// per-request timeout is the only one in play.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Credential fixture (`ck`, `cs`, `at`, `as`) shared by integration tests.
	pub fn test_credential() -> Credential {
		Credential::new("ck", "cs", "at", "as").expect("Test credential fixture should be valid.")
	}

	/// Reconciliation document keyed on `P1` asserting a URL and a name statement.
	pub fn test_document() -> MutationDocument {
		MutationDocument::builder("P1")
			.statement(Statement::new("P1", "https://x"))
			.statement(Statement::new("P2", "NAME"))
			.build()
			.expect("Test document fixture should be valid.")
	}

	/// Constructs an [`EditSequencer`] signing with [`test_credential`] and talking to `config`
	/// through the reqwest transport used across integration tests.
	pub fn build_reqwest_test_sequencer(config: ApiConfig) -> ReqwestTestSequencer {
		let http_client = test_reqwest_http_client();
		let signer: Arc<dyn crate::ext::RequestSigner> =
			Arc::new(OAuth1Signer::new(test_credential()));

		EditSequencer::with_http_client(
			config,
			signer,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _, tokio as _};
