//! The platform surface the dispatcher talks to.

use turnpost_twitter::{BoxFuture, Client, Error, UserRef};

use crate::event::{MentionEvent, ParentStatus, PlayerInfo};

/// Everything the dispatcher needs from the messaging platform.
///
/// Implemented for [`turnpost_twitter::Client`]; tests drive the
/// dispatcher through in-memory fakes.
pub trait Platform: Send + Sync {
    /// Mentions newer than `since`, in any order.
    fn fetch_mentions<'a>(
        &'a self,
        since: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<MentionEvent>, Error>>;

    fn fetch_status<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ParentStatus, Error>>;

    fn fetch_user<'a>(&'a self, user: &'a UserRef) -> BoxFuture<'a, Result<PlayerInfo, Error>>;

    fn download_media<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, Error>>;

    /// Uploads `png` and posts it with `text` as a reply to `to`.
    /// Returns the new message id.
    fn publish_reply<'a>(
        &'a self,
        to: &'a str,
        text: &'a str,
        png: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, Error>>;

    /// Posts a text-only reply to `to`. Returns the new message id.
    fn post_text_reply<'a>(&'a self, to: &'a str, text: &'a str)
    -> BoxFuture<'a, Result<String, Error>>;
}

impl Platform for Client {
    fn fetch_mentions<'a>(
        &'a self,
        since: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<MentionEvent>, Error>> {
        Box::pin(async move {
            let tweets = Client::fetch_mentions(self, since).await?;
            Ok(tweets.into_iter().map(MentionEvent::from).collect())
        })
    }

    fn fetch_status<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ParentStatus, Error>> {
        Box::pin(async move { Ok(self.fetch_tweet(id).await?.into()) })
    }

    fn fetch_user<'a>(&'a self, user: &'a UserRef) -> BoxFuture<'a, Result<PlayerInfo, Error>> {
        Box::pin(async move { Ok(Client::fetch_user(self, user).await?.into()) })
    }

    fn download_media<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, Error>> {
        Box::pin(self.download(url))
    }

    fn publish_reply<'a>(
        &'a self,
        to: &'a str,
        text: &'a str,
        png: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move { Ok(self.post_image_reply(to, text, &png).await?.id_str) })
    }

    fn post_text_reply<'a>(
        &'a self,
        to: &'a str,
        text: &'a str,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move { Ok(self.post_reply(to, text, None).await?.id_str) })
    }
}
