//! HMAC-SHA1 request signer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;
use url::form_urlencoded;

use crate::percent::{encode, encode_pairs};
use crate::{OAUTH_VERSION, OAuthError, SIGNATURE_METHOD};

type HmacSha1 = Hmac<Sha1>;

/// Application and user credentials for the platform API.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Returns `true` when any of the four values is empty.
    pub fn is_incomplete(&self) -> bool {
        self.consumer_key.is_empty()
            || self.consumer_secret.is_empty()
            || self.access_token.is_empty()
            || self.access_token_secret.is_empty()
    }
}

/// Builds OAuth 1.0a `Authorization` headers.
///
/// The only state mutated while signing is the request counter, which is
/// mixed into every nonce together with a fresh random UUID.
pub struct Signer {
    credentials: Credentials,
    counter: AtomicU64,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            counter: AtomicU64::new(0),
        }
    }

    /// Number of headers produced through [`Signer::authorization_header`].
    pub fn requests_signed(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Builds a header with a fresh nonce and the current Unix time.
    ///
    /// `url` is the full request URL including any query string; `body` is
    /// the url-encoded form body, if the request has one.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
    ) -> Result<String, OAuthError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let nonce = format!("{}{n}", uuid::Uuid::new_v4().simple());
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, body, &nonce, timestamp)
    }

    /// Deterministic variant of [`Signer::authorization_header`].
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, OAuthError> {
        let signature = self.signature(method, url, body, nonce, timestamp)?;

        let mut params = self.oauth_params(nonce, timestamp);
        params.push(("oauth_signature", signature));

        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        encoded.sort();

        let pairs = encoded
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {pairs}"))
    }

    /// Computes the base64 HMAC-SHA1 signature for a request.
    pub fn signature(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, OAuthError> {
        let base = signature_base_string(method, url, body, &self.oauth_params(nonce, timestamp))?;
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| OAuthError::InvalidKey)?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn oauth_params(&self, nonce: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ]
    }
}

/// Builds `METHOD&enc(base_url)&enc(sorted params)`.
///
/// Parameters come from the URL query string, the form body and the OAuth
/// set; query and body are decoded with form rules before re-encoding.
pub fn signature_base_string(
    method: &str,
    url: &str,
    body: Option<&str>,
    oauth_params: &[(&str, String)],
) -> Result<String, OAuthError> {
    let parsed = Url::parse(url)?;

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(body) = body {
        params.extend(
            form_urlencoded::parse(body.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }
    params.extend(oauth_params.iter().map(|(k, v)| (k.to_string(), v.clone())));

    let mut base_url = parsed;
    base_url.set_query(None);
    base_url.set_fragment(None);

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_url.as_str()),
        encode(encode_pairs(params))
    ))
}
