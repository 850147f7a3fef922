//! Endpoint configuration consumed by the sequencer.
//!
//! An [`ApiConfig`] names the two collaborators of an edit (the action API that hands out CSRF
//! tokens and the reconcile-edit REST endpoint), the per-call deadline, and the user agent.
//! Values are validated once by [`ApiConfigBuilder::build`].

/// Builder API for assembling endpoint configurations.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Immutable endpoint configuration for one wiki.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	/// Action API entry point (`.../w/api.php`) queried for CSRF tokens.
	pub action_api: Url,
	/// Reconcile-edit REST endpoint receiving the mutation document.
	pub edit_endpoint: Url,
	/// Deadline applied to each of the two calls.
	pub timeout: StdDuration,
	/// `User-Agent` header sent with both calls.
	pub user_agent: String,
}
impl ApiConfig {
	/// Default per-call deadline.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);
	/// Script path appended to the wiki base for the action API.
	pub const ACTION_API_PATH: &'static str = "w/api.php";
	/// Script path appended to the wiki base for the single-entity edit endpoint.
	pub const EDIT_ENDPOINT_PATH: &'static str = "w/rest.php/wikibase-reconcile-edit/v0/edit";

	/// Creates a new builder with defaults for timeout and user agent.
	pub fn builder() -> ApiConfigBuilder {
		ApiConfigBuilder::new()
	}

	/// Derives both endpoints from a wiki base URL laid out like a stock MediaWiki install
	/// (`https://host/` serving `/w/api.php` and `/w/rest.php`).
	pub fn wikibase(base: &Url) -> Result<Self, ApiConfigError> {
		let base = with_trailing_slash(base);
		let action_api = base
			.join(Self::ACTION_API_PATH)
			.map_err(|source| ApiConfigError::InvalidUrl { endpoint: "action_api", source })?;
		let edit_endpoint = base
			.join(Self::EDIT_ENDPOINT_PATH)
			.map_err(|source| ApiConfigError::InvalidUrl { endpoint: "edit", source })?;

		Self::builder().action_api(action_api).edit_endpoint(edit_endpoint).build()
	}
}

fn with_trailing_slash(base: &Url) -> Url {
	let mut base = base.clone();

	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wikibase_layout_derives_both_endpoints() {
		let base = Url::parse("https://wikibase-reconcile-testing.wmcloud.org")
			.expect("Base URL fixture should parse.");
		let config = ApiConfig::wikibase(&base).expect("Stock layout should build.");

		assert_eq!(
			config.action_api.as_str(),
			"https://wikibase-reconcile-testing.wmcloud.org/w/api.php"
		);
		assert_eq!(
			config.edit_endpoint.as_str(),
			"https://wikibase-reconcile-testing.wmcloud.org/w/rest.php/wikibase-reconcile-edit/v0/edit"
		);
		assert_eq!(config.timeout, ApiConfig::DEFAULT_TIMEOUT);
	}

	#[test]
	fn wikibase_layout_keeps_base_subpath() {
		let base =
			Url::parse("https://example.org/wiki-a").expect("Base URL fixture should parse.");
		let config = ApiConfig::wikibase(&base).expect("Sub-path layout should build.");

		assert_eq!(config.action_api.as_str(), "https://example.org/wiki-a/w/api.php");
	}
}
