//! Platform-neutral views of the data the dispatcher consumes.

use turnpost_twitter::{Tweet, User};

/// An inbound mention of the bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    pub id: String,
    pub author_id: String,
    pub author_handle: String,
    pub text: String,
    pub in_reply_to_status_id: Option<String>,
    pub in_reply_to_user_id: Option<String>,
}

/// The message a move replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentStatus {
    pub id: String,
    /// First attached image, if any.
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: String,
    pub handle: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<Tweet> for MentionEvent {
    fn from(tweet: Tweet) -> Self {
        Self {
            id: tweet.id_str,
            author_id: tweet.user.id_str,
            author_handle: tweet.user.screen_name,
            text: tweet.text,
            in_reply_to_status_id: non_empty(tweet.in_reply_to_status_id_str),
            in_reply_to_user_id: non_empty(tweet.in_reply_to_user_id_str),
        }
    }
}

impl From<Tweet> for ParentStatus {
    fn from(tweet: Tweet) -> Self {
        Self {
            media_url: tweet.first_media_url().map(str::to_string),
            id: tweet.id_str,
        }
    }
}

impl From<User> for PlayerInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id_str,
            handle: user.screen_name,
        }
    }
}
