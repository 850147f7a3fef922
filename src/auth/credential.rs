//! Four-part OAuth 1.0a credential validated at construction.

// self
use crate::{_prelude::*, auth::Secret};

const CREDENTIAL_MAX_LEN: usize = 256;

/// Error returned when credential validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The field was empty.
	#[error("Credential field `{field}` cannot be empty.")]
	Empty {
		/// Field that failed validation.
		field: &'static str,
	},
	/// The field contains whitespace characters.
	#[error("Credential field `{field}` contains whitespace.")]
	ContainsWhitespace {
		/// Field that failed validation.
		field: &'static str,
	},
	/// The field exceeded the allowed byte count.
	#[error("Credential field `{field}` exceeds {max} bytes.")]
	TooLong {
		/// Field that failed validation.
		field: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

/// Owner-only consumer credential: consumer key/secret plus access token/secret.
///
/// Values are checked once when the credential is built, so every [`Credential`] in existence
/// can be signed with. The struct is never persisted and redacts all four halves when printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	consumer_key: Secret,
	consumer_secret: Secret,
	access_token: Secret,
	access_secret: Secret,
}
impl Credential {
	/// Validates and wraps the four credential halves.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		access_token: impl Into<String>,
		access_secret: impl Into<String>,
	) -> Result<Self, CredentialError> {
		let consumer_key = validate_field("consumer_key", consumer_key.into())?;
		let consumer_secret = validate_field("consumer_secret", consumer_secret.into())?;
		let access_token = validate_field("access_token", access_token.into())?;
		let access_secret = validate_field("access_secret", access_secret.into())?;

		Ok(Self { consumer_key, consumer_secret, access_token, access_secret })
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn consumer_key(&self) -> &Secret {
		&self.consumer_key
	}

	/// Consumer secret; first half of the signing key.
	pub fn consumer_secret(&self) -> &Secret {
		&self.consumer_secret
	}

	/// Access token sent as `oauth_token`.
	pub fn access_token(&self) -> &Secret {
		&self.access_token
	}

	/// Access secret; second half of the signing key.
	pub fn access_secret(&self) -> &Secret {
		&self.access_secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &self.consumer_secret)
			.field("access_token", &self.access_token)
			.field("access_secret", &self.access_secret)
			.finish()
	}
}

fn validate_field(field: &'static str, value: String) -> Result<Secret, CredentialError> {
	if value.is_empty() {
		return Err(CredentialError::Empty { field });
	}
	if value.chars().any(char::is_whitespace) {
		return Err(CredentialError::ContainsWhitespace { field });
	}
	if value.len() > CREDENTIAL_MAX_LEN {
		return Err(CredentialError::TooLong { field, max: CREDENTIAL_MAX_LEN });
	}

	Ok(Secret::new(value))
}
