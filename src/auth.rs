//! Credential material and the OAuth 1.0a signer built from it.

mod credential;
mod secret;
mod signer;

pub use credential::*;
pub use secret::*;
pub use signer::*;
