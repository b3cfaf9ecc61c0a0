//! In-memory platform shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use turnpost_codec::{GameRecord, encode_image};
use turnpost_dispatch::{MentionEvent, ParentStatus, Platform, PlayerInfo};
use turnpost_games::GameRegistry;
use turnpost_twitter::{ApiError, BoxFuture, Error, UserRef};

pub const BOT_ID: &str = "1082387659220271104";

#[derive(Debug, Clone)]
pub struct Published {
    pub to: String,
    pub text: String,
    pub png: Vec<u8>,
}

/// Scripted platform. Mention batches are served in order; `None` makes
/// that fetch fail.
#[derive(Default)]
pub struct FakePlatform {
    pub batches: Mutex<VecDeque<Option<Vec<MentionEvent>>>>,
    pub statuses: Mutex<HashMap<String, ParentStatus>>,
    pub users: Mutex<Vec<PlayerInfo>>,
    pub media: Mutex<HashMap<String, Vec<u8>>>,

    pub fetches: Mutex<Vec<Option<String>>>,
    pub lookups: Mutex<Vec<UserRef>>,
    pub published: Mutex<Vec<Published>>,
    pub text_replies: Mutex<Vec<(String, String)>>,
    next_id: AtomicU64,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: &str, handle: &str) -> Self {
        self.users.lock().unwrap().push(PlayerInfo {
            id: id.into(),
            handle: handle.into(),
        });
        self
    }

    /// Makes `status_id` a bot message carrying `png` as its image.
    pub fn with_board(self, status_id: &str, png: Vec<u8>) -> Self {
        let url = format!("https://img.example/{status_id}.png");
        self.media.lock().unwrap().insert(url.clone(), png);
        self.statuses.lock().unwrap().insert(
            status_id.into(),
            ParentStatus {
                id: status_id.into(),
                media_url: Some(url),
            },
        );
        self
    }

    pub fn with_batch(self, batch: Option<Vec<MentionEvent>>) -> Self {
        self.batches.lock().unwrap().push_back(batch);
        self
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }

    pub fn text_replies(&self) -> Vec<(String, String)> {
        self.text_replies.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<UserRef> {
        self.lookups.lock().unwrap().clone()
    }

    fn reply_id(&self) -> String {
        format!("r{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn not_found(code: i64) -> Error {
    Error::Api {
        status: 404,
        errors: vec![ApiError {
            code,
            message: "not found".into(),
        }],
    }
}

impl Platform for FakePlatform {
    fn fetch_mentions<'a>(
        &'a self,
        since: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<MentionEvent>, Error>> {
        Box::pin(async move {
            self.fetches.lock().unwrap().push(since.map(str::to_string));
            match self.batches.lock().unwrap().pop_front() {
                Some(Some(batch)) => Ok(batch),
                Some(None) => Err(Error::Api {
                    status: 503,
                    errors: Vec::new(),
                }),
                None => Ok(Vec::new()),
            }
        })
    }

    fn fetch_status<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ParentStatus, Error>> {
        Box::pin(async move {
            self.statuses
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| not_found(144))
        })
    }

    fn fetch_user<'a>(&'a self, user: &'a UserRef) -> BoxFuture<'a, Result<PlayerInfo, Error>> {
        Box::pin(async move {
            self.lookups.lock().unwrap().push(user.clone());
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| match user {
                    UserRef::Id(id) => &u.id == id,
                    UserRef::Handle(handle) => &u.handle == handle,
                })
                .cloned()
                .ok_or_else(|| not_found(50))
        })
    }

    fn download_media<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, Error>> {
        Box::pin(async move {
            self.media
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| not_found(34))
        })
    }

    fn publish_reply<'a>(
        &'a self,
        to: &'a str,
        text: &'a str,
        png: Vec<u8>,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            self.published.lock().unwrap().push(Published {
                to: to.into(),
                text: text.into(),
                png,
            });
            Ok(self.reply_id())
        })
    }

    fn post_text_reply<'a>(
        &'a self,
        to: &'a str,
        text: &'a str,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            self.text_replies
                .lock()
                .unwrap()
                .push((to.into(), text.into()));
            Ok(self.reply_id())
        })
    }
}

pub fn mention(id: &str, author_id: &str, handle: &str, text: &str) -> MentionEvent {
    MentionEvent {
        id: id.into(),
        author_id: author_id.into(),
        author_handle: handle.into(),
        text: text.into(),
        in_reply_to_status_id: None,
        in_reply_to_user_id: None,
    }
}

pub fn reply(id: &str, author_id: &str, handle: &str, text: &str, parent: &str) -> MentionEvent {
    MentionEvent {
        in_reply_to_status_id: Some(parent.into()),
        in_reply_to_user_id: Some(BOT_ID.into()),
        ..mention(id, author_id, handle, text)
    }
}

/// PNG of a tic-tac-toe game between `players` after `moves`.
pub fn board_png(players: [&str; 2], moves: &[&str]) -> (GameRecord, Vec<u8>) {
    let registry = GameRegistry::with_default_games();
    let engine = registry.get("tictactoe").unwrap();
    let mut state = engine.initial_state().unwrap();
    for m in moves {
        state = engine.next_state(&state, m).unwrap().unwrap();
    }
    let record = GameRecord::new("tictactoe", players.map(String::from), state);
    let png = encode_image(engine.render(&record.state).unwrap(), &record).unwrap();
    (record, png)
}
