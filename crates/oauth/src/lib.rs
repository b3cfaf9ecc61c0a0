//! OAuth 1.0a request signing for the messaging platform's REST API.
//!
//! [`Signer`] builds the `Authorization: OAuth ...` header from the request
//! method, full URL and optional url-encoded body. [`percent`] holds the
//! RFC 3986 encoder shared by signing and by the transport that sends the
//! same encoded parameters on the wire.

pub mod percent;
pub mod signer;

pub use percent::{UNRESERVED, encode, encode_pairs};
pub use signer::{Credentials, Signer};

/// Signature method advertised in every header.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// OAuth protocol version advertised in every header.
pub const OAUTH_VERSION: &str = "1.0";

/// Errors produced while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid signing key")]
    InvalidKey,
}
