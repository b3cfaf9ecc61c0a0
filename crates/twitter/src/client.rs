//! Twitter v1.1 API client.

use std::sync::Arc;

use tracing::{debug, info};
use turnpost_oauth::Credentials;

use crate::error::Error;
use crate::transport::{Form, HttpTransport, Transport};
use crate::types::{Tweet, User, UserRef};
use crate::upload::{MediaUploader, UploadConfig};
use crate::{DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL};

/// API client over any [`Transport`].
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    api_base: String,
    upload_base: String,
    upload: UploadConfig,
}

impl Client {
    /// Creates a client that signs requests with `credentials`.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(
            credentials,
        )?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_base: DEFAULT_API_BASE_URL.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE_URL.to_string(),
            upload: UploadConfig::default(),
        }
    }

    /// Overrides the REST and upload roots.
    pub fn with_base_urls(mut self, api: impl Into<String>, upload: impl Into<String>) -> Self {
        self.api_base = api.into().trim_end_matches('/').to_string();
        self.upload_base = upload.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_upload_config(mut self, config: UploadConfig) -> Self {
        self.upload = config;
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &Form,
    ) -> Result<T, Error> {
        let url = format!("{}{endpoint}", self.api_base);
        self.transport
            .get(&url, form)
            .await?
            .error_for_status()?
            .json()
    }

    /// Fetches a single status.
    pub async fn fetch_tweet(&self, id: &str) -> Result<Tweet, Error> {
        self.get_json("/statuses/show.json", &Form::new().text("id", id))
            .await
    }

    pub async fn fetch_user(&self, user: &UserRef) -> Result<User, Error> {
        let (key, value) = user.query();
        self.get_json("/users/show.json", &Form::new().text(key, value))
            .await
    }

    /// Mentions of the authenticated account newer than `since_id`,
    /// newest first.
    pub async fn fetch_mentions(&self, since_id: Option<&str>) -> Result<Vec<Tweet>, Error> {
        let form = match since_id {
            Some(id) => Form::new().text("since_id", id),
            None => Form::new(),
        };
        self.get_json("/statuses/mentions_timeline.json", &form)
            .await
    }

    /// Posts `text` as a reply to `in_reply_to`, optionally with media.
    pub async fn post_reply(
        &self,
        in_reply_to: &str,
        text: &str,
        media_id: Option<&str>,
    ) -> Result<Tweet, Error> {
        let mut form = Form::new()
            .text("status", text)
            .text("in_reply_to_status_id", in_reply_to);
        if let Some(media_id) = media_id {
            form = form.text("media_ids", media_id);
        }

        let url = format!("{}/statuses/update.json", self.api_base);
        let tweet: Tweet = self
            .transport
            .post(&url, false, &form)
            .await?
            .error_for_status()?
            .json()?;
        info!(reply_id = %tweet.id_str, in_reply_to, "reply posted");
        Ok(tweet)
    }

    /// Uploads media and returns its id.
    pub async fn upload_media(&self, data: &[u8], media_type: &str) -> Result<String, Error> {
        MediaUploader::new(self.transport.as_ref(), &self.upload_base, &self.upload)
            .upload(data, media_type)
            .await
    }

    /// Uploads `png` and posts it with `text` as a reply.
    pub async fn post_image_reply(
        &self,
        in_reply_to: &str,
        text: &str,
        png: &[u8],
    ) -> Result<Tweet, Error> {
        let media_id = self.upload_media(png, "image/png").await?;
        self.post_reply(in_reply_to, text, Some(&media_id)).await
    }

    /// Downloads media bytes from a public URL.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, Error> {
        let resp = self.transport.download(url).await?.error_for_status()?;
        debug!(url, len = resp.body.len(), "media downloaded");
        Ok(resp.body)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_base", &self.api_base)
            .field("upload_base", &self.upload_base)
            .finish_non_exhaustive()
    }
}
