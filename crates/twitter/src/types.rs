//! API response types.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! v1.1 documents is ignored.

use serde::{Deserialize, Serialize};

/// One entry of an `{"errors":[...]}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id_str: String,
    pub screen_name: String,
}

/// How to look a user up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(String),
    /// Screen name without the leading `@`.
    Handle(String),
}

impl UserRef {
    pub(crate) fn query(&self) -> (&'static str, &str) {
        match self {
            UserRef::Id(id) => ("user_id", id),
            UserRef::Handle(name) => ("screen_name", name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    #[serde(default)]
    pub id_str: String,
    pub media_url_https: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

/// A status ("tweet").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    #[serde(alias = "full_text")]
    pub text: String,
    pub user: User,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id_str: Option<String>,
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,
}

impl Tweet {
    /// HTTPS URL of the first attached media item, if any.
    pub fn first_media_url(&self) -> Option<&str> {
        self.extended_entities
            .as_ref()?
            .media
            .first()
            .map(|m| m.media_url_https.as_str())
    }
}

/// Response to the INIT, FINALIZE and STATUS upload commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct MediaResponse {
    pub media_id_string: String,
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProcessingInfo {
    pub state: ProcessingState,
    #[serde(default)]
    pub check_after_secs: Option<u64>,
    #[serde(default)]
    pub progress_percent: Option<u8>,
    #[serde(default)]
    pub error: Option<ProcessingError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ProcessingState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProcessingError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}
