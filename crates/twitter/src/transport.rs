//! Signed HTTP transport.
//!
//! `Transport` is implemented by [`HttpTransport`] for production and by
//! in-process mocks in tests. Responses are returned for every status code;
//! deciding what a non-2xx status means is left to the caller.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use turnpost_oauth::{Credentials, Signer, encode_pairs};

use crate::error::Error;
use crate::multipart;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A request parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl AsRef<[u8]> for FormValue {
    fn as_ref(&self) -> &[u8] {
        match self {
            FormValue::Text(s) => s.as_bytes(),
            FormValue::Bytes(b) => b,
        }
    }
}

/// Ordered request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, FormValue)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields
            .push((name.into(), FormValue::Text(value.to_string())));
        self
    }

    pub fn bytes(mut self, name: impl Into<String>, value: Vec<u8>) -> Self {
        self.fields.push((name.into(), FormValue::Bytes(value)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sorted, percent-encoded `k=v&...` string; used both as the query
    /// string or form body and as the signed parameter set.
    pub fn encoded(&self) -> String {
        encode_pairs(self.iter())
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the response, or [`Error::Api`] for a non-2xx status.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_status(self.status, &self.body))
        }
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Issues requests against the platform.
pub trait Transport: Send + Sync {
    /// Signed GET with `form` as the query string.
    fn get<'a>(&'a self, url: &'a str, form: &'a Form) -> BoxFuture<'a, Result<Response, Error>>;

    /// Signed POST with `form` as a url-encoded or multipart body.
    fn post<'a>(
        &'a self,
        url: &'a str,
        multipart: bool,
        form: &'a Form,
    ) -> BoxFuture<'a, Result<Response, Error>>;

    /// Unsigned GET of a media URL.
    fn download<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Response, Error>>;
}

/// `reqwest` transport that signs every API request.
pub struct HttpTransport {
    http: reqwest::Client,
    signer: Signer,
}

impl HttpTransport {
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("turnpost/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            signer: Signer::new(credentials),
        })
    }

    /// Number of requests signed so far.
    pub fn requests_signed(&self) -> u64 {
        self.signer.requests_signed()
    }

    async fn send_get(&self, url: &str, form: &Form) -> Result<Response, Error> {
        let query = form.encoded();
        let full_url = if query.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{query}")
        };
        let auth = self.signer.authorization_header("GET", &full_url, None)?;

        let resp = self
            .http
            .get(&full_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        read_response(resp).await
    }

    async fn send_post(&self, url: &str, multipart: bool, form: &Form) -> Result<Response, Error> {
        let request = self.http.post(url).header(ACCEPT, "application/json");

        let request = if multipart {
            // Multipart fields are not part of the signature base.
            let auth = self.signer.authorization_header("POST", url, None)?;
            request
                .header(AUTHORIZATION, auth)
                .header(CONTENT_TYPE, multipart::content_type())
                .body(multipart::encode(form))
        } else {
            let body = form.encoded();
            let auth = self.signer.authorization_header("POST", url, Some(&body))?;
            request
                .header(AUTHORIZATION, auth)
                .header(CONTENT_TYPE, FORM_URLENCODED)
                .body(body)
        };

        read_response(request.send().await?).await
    }

    async fn send_download(&self, url: &str) -> Result<Response, Error> {
        let resp = self.http.get(url).header(ACCEPT, "image/*").send().await?;
        read_response(resp).await
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str, form: &'a Form) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(self.send_get(url, form))
    }

    fn post<'a>(
        &'a self,
        url: &'a str,
        multipart: bool,
        form: &'a Form,
    ) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(self.send_post(url, multipart, form))
    }

    fn download<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Response, Error>> {
        Box::pin(self.send_download(url))
    }
}

async fn read_response(resp: reqwest::Response) -> Result<Response, Error> {
    let status = resp.status().as_u16();
    let headers = resp.headers().clone();
    let body = resp.bytes().await?.to_vec();
    tracing::trace!(status, len = body.len(), "response");
    Ok(Response {
        status,
        headers,
        body,
    })
}
