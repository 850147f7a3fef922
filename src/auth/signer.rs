//! OAuth 1.0a (RFC 5849) request signing.
//!
//! [`OAuth1Signer`] owns a validated [`Credential`] and stamps every [`ApiRequest`] with an
//! `Authorization: OAuth ...` header. The signature base string covers the method, the base
//! URI, the query parameters, form-encoded body parameters, and the protocol parameters; JSON
//! bodies are not part of the signature. Timestamp and nonce come from [`SigningParams`], so
//! callers that inject fixed values get byte-identical output.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialError},
	ext::RequestSigner,
	http::{ApiRequest, RequestBody},
};

// RFC 3986 unreserved characters pass through; everything else is percent-encoded.
const UNRESERVED: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const NONCE_LEN: usize = 32;
const OAUTH_VERSION: &str = "1.0";

/// Signature algorithms accepted by the signer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignatureMethod {
	/// `HMAC-SHA1`, the RFC 5849 baseline.
	#[default]
	HmacSha1,
	/// `HMAC-SHA256`, for servers that opt in to the stronger digest.
	HmacSha256,
}
impl SignatureMethod {
	/// Value sent as `oauth_signature_method`.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
		}
	}
}

/// Per-request protocol inputs that are not derived from the credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningParams {
	/// Seconds since the Unix epoch, sent as `oauth_timestamp`.
	pub timestamp: i64,
	/// Single-use value sent as `oauth_nonce`.
	pub nonce: String,
}
impl SigningParams {
	/// Pins timestamp and nonce.
	pub fn new(timestamp: i64, nonce: impl Into<String>) -> Self {
		Self { timestamp, nonce: nonce.into() }
	}

	/// Current time plus a random alphanumeric nonce.
	pub fn fresh() -> Self {
		let nonce = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();

		Self { timestamp: OffsetDateTime::now_utc().unix_timestamp(), nonce }
	}
}

/// Reusable OAuth 1.0a signer built once per invocation and shared by both calls.
#[derive(Clone, Debug)]
pub struct OAuth1Signer {
	credential: Credential,
	method: SignatureMethod,
}
impl OAuth1Signer {
	/// Wraps an already validated credential using `HMAC-SHA1`.
	pub fn new(credential: Credential) -> Self {
		Self { credential, method: SignatureMethod::default() }
	}

	/// Validates the four halves and builds a signer in one step.
	pub fn from_parts(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		access_token: impl Into<String>,
		access_secret: impl Into<String>,
	) -> Result<Self, CredentialError> {
		Credential::new(consumer_key, consumer_secret, access_token, access_secret).map(Self::new)
	}

	/// Overrides the signature algorithm.
	pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
		self.method = method;

		self
	}

	/// Credential the signer was built from.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Signature algorithm in use.
	pub fn signature_method(&self) -> SignatureMethod {
		self.method
	}

	/// Signs `request` with pinned timestamp/nonce and attaches the `Authorization` header.
	pub fn sign_with(&self, request: ApiRequest, params: &SigningParams) -> ApiRequest {
		let header = self.authorization_header(&request, params);

		request.with_header("authorization", header)
	}

	/// Renders the `Authorization` header value for `request`.
	pub fn authorization_header(&self, request: &ApiRequest, params: &SigningParams) -> String {
		let mut protocol = self.protocol_params(params);
		let signature = self.signature(&self.signature_base_string(request, &protocol));

		protocol.push(("oauth_signature", signature));
		protocol.sort();

		let fields = protocol
			.iter()
			.map(|(name, value)| format!("{name}=\"{}\"", encode(value)))
			.collect::<Vec<_>>()
			.join(", ");

		format!("OAuth {fields}")
	}

	/// Builds the RFC 5849 §3.4.1 signature base string.
	pub fn signature_base_string(
		&self,
		request: &ApiRequest,
		protocol: &[(&'static str, String)],
	) -> String {
		format!(
			"{}&{}&{}",
			request.method.as_str(),
			encode(&base_string_uri(&request.url)),
			encode(&normalized_parameters(request, protocol))
		)
	}

	fn protocol_params(&self, params: &SigningParams) -> Vec<(&'static str, String)> {
		vec![
			("oauth_consumer_key", self.credential.consumer_key().expose().to_owned()),
			("oauth_nonce", params.nonce.clone()),
			("oauth_signature_method", self.method.as_str().to_owned()),
			("oauth_timestamp", params.timestamp.to_string()),
			("oauth_token", self.credential.access_token().expose().to_owned()),
			("oauth_version", OAUTH_VERSION.to_owned()),
		]
	}

	fn signature(&self, base_string: &str) -> String {
		let key = format!(
			"{}&{}",
			encode(self.credential.consumer_secret().expose()),
			encode(self.credential.access_secret().expose())
		);
		let digest = match self.method {
			SignatureMethod::HmacSha1 => {
				let mut mac = <Hmac<Sha1>>::new_from_slice(key.as_bytes())
					.expect("HMAC can take a key of any size.");

				mac.update(base_string.as_bytes());
				mac.finalize().into_bytes().to_vec()
			},
			SignatureMethod::HmacSha256 => {
				let mut mac = <Hmac<Sha256>>::new_from_slice(key.as_bytes())
					.expect("HMAC can take a key of any size.");

				mac.update(base_string.as_bytes());
				mac.finalize().into_bytes().to_vec()
			},
		};

		STANDARD.encode(digest)
	}
}
impl RequestSigner for OAuth1Signer {
	fn sign(&self, request: ApiRequest) -> Result<ApiRequest> {
		Ok(self.sign_with(request, &SigningParams::fresh()))
	}
}

fn encode(value: &str) -> String {
	utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Scheme, host, non-default port, and path; query and fragment are excluded.
fn base_string_uri(url: &Url) -> String {
	let mut uri = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

	if let Some(port) = url.port() {
		uri.push(':');
		uri.push_str(&port.to_string());
	}

	uri.push_str(url.path());

	uri
}

fn normalized_parameters(request: &ApiRequest, protocol: &[(&'static str, String)]) -> String {
	let mut pairs = request
		.url
		.query_pairs()
		.map(|(name, value)| (encode(&name), encode(&value)))
		.collect::<Vec<_>>();

	if let RequestBody::Form(form) = &request.body {
		pairs.extend(form.iter().map(|(name, value)| (encode(name), encode(value))));
	}

	pairs.extend(protocol.iter().map(|(name, value)| (encode(name), encode(value))));
	pairs.sort();

	pairs.iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>().join("&")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	// Published HMAC-SHA1 walkthrough (status update example).
	const VECTOR_CONSUMER_KEY: &str = "xvz1evFS4wEEPTGEFPHBog";
	const VECTOR_CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
	const VECTOR_TOKEN: &str = "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb";
	const VECTOR_TOKEN_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";
	const VECTOR_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
	const VECTOR_TIMESTAMP: i64 = 1_318_622_958;

	fn vector_signer() -> OAuth1Signer {
		OAuth1Signer::from_parts(
			VECTOR_CONSUMER_KEY,
			VECTOR_CONSUMER_SECRET,
			VECTOR_TOKEN,
			VECTOR_TOKEN_SECRET,
		)
		.expect("Vector credential should be valid.")
	}

	fn vector_request() -> ApiRequest {
		ApiRequest::post_form(
			Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
				.expect("Vector URL should parse."),
			vec![("status".into(), "Hello Ladies + Gentlemen, a signed OAuth request!".into())],
		)
	}

	fn header_field<'a>(header: &'a str, name: &str) -> Option<&'a str> {
		header.strip_prefix("OAuth ")?.split(", ").find_map(|field| {
			let (key, value) = field.split_once('=')?;

			(key == name).then(|| value.trim_matches('"'))
		})
	}

	#[test]
	fn base_string_matches_published_vector() {
		let signer = vector_signer();
		let params = SigningParams::new(VECTOR_TIMESTAMP, VECTOR_NONCE);
		let base = signer.signature_base_string(&vector_request(), &signer.protocol_params(&params));

		assert_eq!(
			base,
			"POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
		);
	}

	#[test]
	fn signature_matches_published_vector() {
		let signer = vector_signer();
		let params = SigningParams::new(VECTOR_TIMESTAMP, VECTOR_NONCE);
		let signed = signer.sign_with(vector_request(), &params);
		let header = signed.header("authorization").expect("Signed request must carry a header.");

		assert_eq!(header_field(header, "oauth_signature"), Some("hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D"));
		assert_eq!(header_field(header, "oauth_consumer_key"), Some(VECTOR_CONSUMER_KEY));
		assert_eq!(header_field(header, "oauth_token"), Some(VECTOR_TOKEN));
		assert_eq!(header_field(header, "oauth_signature_method"), Some("HMAC-SHA1"));
		assert_eq!(header_field(header, "oauth_version"), Some("1.0"));
	}

	#[test]
	fn signing_is_deterministic_for_pinned_inputs() {
		let signer = OAuth1Signer::from_parts("ck", "cs", "at", "as").expect("Valid fixture.");
		let params = SigningParams::new(1_700_000_000, "fixed-nonce");
		let request = ApiRequest::get(
			Url::parse("https://wiki.example.org/w/api.php?action=query&meta=tokens&format=json")
				.expect("Token URL should parse."),
		);
		let first = signer.authorization_header(&request, &params);
		let second = signer.authorization_header(&request, &params);
		let later =
			signer.authorization_header(&request, &SigningParams::new(1_700_000_001, "fixed-nonce"));

		assert_eq!(first, second);
		assert_ne!(first, later);
	}

	#[test]
	fn query_parameters_are_signed_but_json_bodies_are_not() {
		let signer = OAuth1Signer::from_parts("ck", "cs", "at", "as").expect("Valid fixture.");
		let params = SigningParams::new(1_700_000_000, "fixed-nonce");
		let url = Url::parse("https://wiki.example.org/w/rest.php/wikibase-reconcile-edit/v0/edit")
			.expect("Edit URL should parse.");
		let a = ApiRequest::post_json(url.clone(), br#"{"token":"a"}"#.to_vec());
		let b = ApiRequest::post_json(url.clone(), br#"{"token":"b"}"#.to_vec());

		assert_eq!(signer.authorization_header(&a, &params), signer.authorization_header(&b, &params));

		let mut with_query = url;

		with_query.set_query(Some("format=json"));

		let c = ApiRequest::post_json(with_query, br#"{"token":"a"}"#.to_vec());

		assert_ne!(signer.authorization_header(&a, &params), signer.authorization_header(&c, &params));
	}

	#[test]
	fn base_uri_drops_default_port_and_query() {
		let explicit = Url::parse("https://Wiki.Example.org:443/w/api.php?x=1#frag")
			.expect("URL fixture should parse.");
		let custom = Url::parse("http://127.0.0.1:8080/w/api.php").expect("URL fixture should parse.");

		assert_eq!(base_string_uri(&explicit), "https://wiki.example.org/w/api.php");
		assert_eq!(base_string_uri(&custom), "http://127.0.0.1:8080/w/api.php");
	}

	#[test]
	fn sha256_produces_a_longer_distinct_signature() {
		let sha1 = vector_signer();
		let sha256 = vector_signer().with_signature_method(SignatureMethod::HmacSha256);
		let params = SigningParams::new(VECTOR_TIMESTAMP, VECTOR_NONCE);
		let request = vector_request();
		let sha1_header = sha1.authorization_header(&request, &params);
		let sha256_header = sha256.authorization_header(&request, &params);
		let sha256_signature = header_field(&sha256_header, "oauth_signature")
			.expect("SHA-256 header must carry a signature.");

		assert_ne!(header_field(&sha1_header, "oauth_signature"), Some(sha256_signature));
		assert_eq!(header_field(&sha256_header, "oauth_signature_method"), Some("HMAC-SHA256"));
		// 32 raw bytes -> 44 base64 chars, with `=` and `+`/`/` percent-encoded.
		assert!(sha256_signature.len() >= 44);
	}

	#[test]
	fn fresh_params_use_random_alphanumeric_nonces() {
		let first = SigningParams::fresh();
		let second = SigningParams::fresh();

		assert_eq!(first.nonce.len(), NONCE_LEN);
		assert!(first.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first.nonce, second.nonce);
		assert!(first.timestamp > 1_600_000_000);
	}
}
