//! Runs one reconcile edit against a live wiki with owner-only OAuth 1.0a credentials.
//!
//! Required environment variables: `RECONCILE_EDIT_WIKI` (base URL such as
//! `https://wikibase-reconcile-testing.wmcloud.org`), `RECONCILE_EDIT_CONSUMER_KEY`,
//! `RECONCILE_EDIT_CONSUMER_SECRET`, `RECONCILE_EDIT_ACCESS_TOKEN`, and
//! `RECONCILE_EDIT_ACCESS_SECRET`. Pass a path to a JSON document as the first argument to
//! submit it instead of the built-in sample.

// std
use std::{env, fs};
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use url::Url;
// self
use reconcile_edit_client::{
	auth::OAuth1Signer,
	config::ApiConfig,
	document::{MutationDocument, Statement},
	flows::EditSequencer,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let wiki = Url::parse(&var("RECONCILE_EDIT_WIKI")?)?;
	let signer = OAuth1Signer::from_parts(
		var("RECONCILE_EDIT_CONSUMER_KEY")?,
		var("RECONCILE_EDIT_CONSUMER_SECRET")?,
		var("RECONCILE_EDIT_ACCESS_TOKEN")?,
		var("RECONCILE_EDIT_ACCESS_SECRET")?,
	)?;
	let document = match env::args().nth(1) {
		Some(path) => MutationDocument::from_json(
			&fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read {path}."))?,
		)?,
		None => MutationDocument::builder("P23")
			.statement(Statement::new("P23", "https://gitlab.com/OSEGermany/ohloom"))
			.statement(Statement::new("P3", "OHLOOM"))
			.build()?,
	};
	let sequencer = EditSequencer::new(ApiConfig::wikibase(&wiki)?, signer)?;
	let result = sequencer.reconcile_edit(&document).await?;

	println!("Edit endpoint answered HTTP {}.", result.status);

	for (name, value) in &result.headers {
		println!("{name}: {value}");
	}

	match result.outcome() {
		Some(outcome) => println!(
			"Saved: {} (entity {}, revision {}).",
			outcome.success,
			outcome.entity_id.as_deref().unwrap_or("?"),
			outcome.revision_id.map(|id| id.to_string()).unwrap_or_else(|| "?".into())
		),
		None => println!("{}", result.body_text()),
	}

	Ok(())
}

fn var(name: &str) -> Result<String> {
	env::var(name).wrap_err_with(|| format!("Environment variable {name} is not set."))
}
