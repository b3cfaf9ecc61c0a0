//! Twitter v1.1 REST client.
//!
//! [`HttpTransport`] signs every request with OAuth 1.0a and sends it with
//! `reqwest`. [`Client`] wraps any [`Transport`] with the endpoints the bot
//! needs, and [`MediaUploader`] drives the chunked media upload protocol.

pub mod client;
pub mod error;
pub mod multipart;
pub mod transport;
pub mod types;
pub mod upload;

pub use client::Client;
pub use error::Error;
pub use transport::{BoxFuture, Form, FormValue, HttpTransport, Response, Transport};
pub use types::{ApiError, MediaEntity, Tweet, User, UserRef};
pub use upload::{MediaUploader, UploadConfig};

/// REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Media upload root.
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.twitter.com/1.1";

/// Error code the API returns when a user does not exist.
pub const USER_NOT_FOUND: i64 = 50;
