//! Per-event pipelines: start a game, or apply a move.
//!
//! Each pipeline runs its steps strictly in order and stops at the first
//! step that either fails (`Err`) or decides the event is not actionable
//! (`Ok(Outcome::Ignored)`). All game state comes from the image attached
//! to the parent message; nothing is cached between events.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use turnpost_codec::{GameRecord, decode_image, encode_image};
use turnpost_games::{GameEngine, GameRegistry};
use turnpost_twitter::{USER_NOT_FOUND, UserRef};

use crate::classify::{EventKind, classify, extract_command, parse_new_game};
use crate::error::DispatchError;
use crate::event::MentionEvent;
use crate::pacing::Pacing;
use crate::platform::Platform;

/// What to do when a player's request cannot be honoured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionPolicy {
    /// Post nothing.
    #[default]
    Silent,
    /// Post a short text reply explaining the rejection.
    Reply,
}

/// Why an event produced no new game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Reply to a message that is not the bot's.
    NotAddressed,
    /// Top-level mention without a game keyword and opponent.
    NoGameRequest,
    /// Parent message has no image or the image carries no game.
    NotAGameImage,
    /// Image decodes to a game type this build does not know.
    UnknownGame(String),
    UnknownOpponent(String),
    UnknownPlayer(String),
    NoCommand,
    InvalidCommand(String),
    NotYourTurn,
    GameOver,
    IllegalMove(String),
}

impl IgnoreReason {
    /// Whether a player should hear about this under [`RejectionPolicy::Reply`].
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            IgnoreReason::NotAddressed
                | IgnoreReason::NoGameRequest
                | IgnoreReason::NotAGameImage
                | IgnoreReason::UnknownGame(_)
        )
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::NotAddressed => write!(f, "not a reply to this account"),
            IgnoreReason::NoGameRequest => write!(f, "no game request found"),
            IgnoreReason::NotAGameImage => write!(f, "no game found in that image"),
            IgnoreReason::UnknownGame(t) => write!(f, "unknown game type {t:?}"),
            IgnoreReason::UnknownOpponent(h) => write!(f, "I couldn't find @{h}"),
            IgnoreReason::UnknownPlayer(id) => write!(f, "player {id} no longer exists"),
            IgnoreReason::NoCommand => write!(f, "reply with your move"),
            IgnoreReason::InvalidCommand(c) => write!(f, "{c:?} is not a valid move"),
            IgnoreReason::NotYourTurn => write!(f, "it's not your turn"),
            IgnoreReason::GameOver => write!(f, "this game is already over"),
            IgnoreReason::IllegalMove(c) => write!(f, "{c:?} can't be played right now"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new board was posted.
    Published { reply_id: String, record: GameRecord },
    Ignored(IgnoreReason),
}

/// Runs event pipelines against a [`Platform`].
pub struct Dispatcher {
    platform: Arc<dyn Platform>,
    registry: GameRegistry,
    bot_user_id: String,
    policy: RejectionPolicy,
    pacing: Pacing,
}

impl Dispatcher {
    pub fn new(
        platform: Arc<dyn Platform>,
        registry: GameRegistry,
        bot_user_id: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            registry,
            bot_user_id: bot_user_id.into(),
            policy: RejectionPolicy::default(),
            pacing: Pacing::default(),
        }
    }

    pub fn with_policy(mut self, policy: RejectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    pub(crate) fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Classifies `event` and runs the matching pipeline.
    pub async fn handle(&self, event: &MentionEvent) -> Result<Outcome, DispatchError> {
        let kind = classify(event, &self.bot_user_id);
        debug!(event_id = %event.id, ?kind, "classified mention");
        match kind {
            EventKind::NewGame => self.handle_new_game(event).await,
            EventKind::Move => self.handle_move(event).await,
            EventKind::Ignored => Ok(Outcome::Ignored(IgnoreReason::NotAddressed)),
        }
    }

    /// Starts a game between the author and the mentioned opponent.
    pub async fn handle_new_game(&self, event: &MentionEvent) -> Result<Outcome, DispatchError> {
        let keywords = self.registry.keywords();
        let Some((game_type, opponent)) = parse_new_game(&event.text, &keywords) else {
            return Ok(Outcome::Ignored(IgnoreReason::NoGameRequest));
        };
        let Some(engine) = self.registry.get(game_type) else {
            return Ok(Outcome::Ignored(IgnoreReason::UnknownGame(game_type.into())));
        };

        let opponent = match self
            .platform
            .fetch_user(&UserRef::Handle(opponent.to_string()))
            .await
        {
            Ok(user) => user,
            Err(e) if e.has_code(USER_NOT_FOUND) => {
                return self
                    .reject(event, IgnoreReason::UnknownOpponent(opponent.into()))
                    .await;
            }
            Err(e) => return Err(e.into()),
        };

        let record = GameRecord::new(
            game_type,
            [event.author_id.clone(), opponent.id],
            engine.initial_state()?,
        );
        let names = [event.author_handle.clone(), opponent.handle];
        let text = engine.reply_text(&record.state, &names)?;

        info!(
            event_id = %event.id,
            game_type,
            players = ?record.players,
            "starting game"
        );
        self.publish(event, engine, record, &text).await
    }

    /// Applies the command in `event` to the game in its parent message.
    pub async fn handle_move(&self, event: &MentionEvent) -> Result<Outcome, DispatchError> {
        let Some(parent_id) = event.in_reply_to_status_id.as_deref() else {
            return Ok(Outcome::Ignored(IgnoreReason::NotAddressed));
        };

        let parent = self.platform.fetch_status(parent_id).await?;
        let Some(media_url) = parent.media_url else {
            return Ok(Outcome::Ignored(IgnoreReason::NotAGameImage));
        };
        let png = self.platform.download_media(&media_url).await?;

        let Some(record) = tokio::task::spawn_blocking(move || decode_image(&png)).await? else {
            return Ok(Outcome::Ignored(IgnoreReason::NotAGameImage));
        };
        let Some(engine) = self.registry.get(&record.game_type) else {
            return Ok(Outcome::Ignored(IgnoreReason::UnknownGame(record.game_type)));
        };

        // A record whose state does not fit its engine is not a game image.
        let turn = engine
            .current_player(&record.state)
            .and_then(|mover| Ok((mover, engine.winner(&record.state)?)));
        let (mover, winner) = match turn {
            Ok(turn) => turn,
            Err(e) => {
                debug!(event_id = %event.id, error = %e, "unreadable game state");
                return Ok(Outcome::Ignored(IgnoreReason::NotAGameImage));
            }
        };
        if record.players.get(mover) != Some(&event.author_id) {
            return self.reject(event, IgnoreReason::NotYourTurn).await;
        }
        if winner.is_some() {
            return self.reject(event, IgnoreReason::GameOver).await;
        }
        let Some(command) = extract_command(&event.text) else {
            return self.reject(event, IgnoreReason::NoCommand).await;
        };
        if !engine.is_valid_input(command) {
            return self
                .reject(event, IgnoreReason::InvalidCommand(command.into()))
                .await;
        }

        let names = match self.player_names(&record.players, mover, event).await? {
            Ok(names) => names,
            Err(reason) => return self.reject(event, reason).await,
        };

        let Some(state) = engine.next_state(&record.state, command)? else {
            return self
                .reject(event, IgnoreReason::IllegalMove(command.into()))
                .await;
        };
        let record = GameRecord::new(record.game_type, record.players, state);
        let text = engine.reply_text(&record.state, &names)?;

        info!(event_id = %event.id, command, "applying move");
        self.publish(event, engine, record, &text).await
    }

    /// Display handles in player order. The mover's comes from the event;
    /// the others are looked up one at a time with a pause after each slot.
    async fn player_names(
        &self,
        players: &[String; 2],
        mover: usize,
        event: &MentionEvent,
    ) -> Result<Result<[String; 2], IgnoreReason>, DispatchError> {
        let mut names: [String; 2] = Default::default();
        for (index, id) in players.iter().enumerate() {
            if index == mover {
                names[index] = event.author_handle.clone();
            } else {
                match self.platform.fetch_user(&UserRef::Id(id.clone())).await {
                    Ok(user) => names[index] = user.handle,
                    Err(e) if e.has_code(USER_NOT_FOUND) => {
                        return Ok(Err(IgnoreReason::UnknownPlayer(id.clone())));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            self.pacing.pause().await;
        }
        Ok(Ok(names))
    }

    /// Renders and encodes `record` off the async runtime, then posts it.
    async fn publish(
        &self,
        event: &MentionEvent,
        engine: Arc<dyn GameEngine>,
        record: GameRecord,
        text: &str,
    ) -> Result<Outcome, DispatchError> {
        let encoded = record.clone();
        let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, DispatchError> {
            let pixels = engine.render(&encoded.state)?;
            Ok(encode_image(pixels, &encoded)?)
        })
        .await??;

        let reply_id = self.platform.publish_reply(&event.id, text, png).await?;
        info!(event_id = %event.id, reply_id = %reply_id, "published board");
        Ok(Outcome::Published { reply_id, record })
    }

    /// Single decision point for requests that cannot be honoured.
    async fn reject(
        &self,
        event: &MentionEvent,
        reason: IgnoreReason,
    ) -> Result<Outcome, DispatchError> {
        debug!(event_id = %event.id, %reason, "rejecting request");
        if self.policy == RejectionPolicy::Reply && reason.is_user_facing() {
            let text = format!("@{} {reason}", event.author_handle);
            self.platform.post_text_reply(&event.id, &text).await?;
        }
        Ok(Outcome::Ignored(reason))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("bot_user_id", &self.bot_user_id)
            .field("policy", &self.policy)
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}
