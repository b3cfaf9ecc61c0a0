//! The mention poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dispatcher::{Dispatcher, Outcome};
use crate::error::DispatchError;
use crate::event::MentionEvent;
use crate::watermark::{WatermarkStore, compare_ids, newest_id};

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait before the first fetch.
    pub startup_delay: Duration,
    /// Time between fetches. 15 s keeps the mentions endpoint at 60 calls
    /// per 15-minute window.
    pub poll_interval: Duration,
    /// Watermark used when the store has none.
    pub initial_watermark: Option<String>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_secs(2),
            poll_interval: Duration::from_secs(15),
            initial_watermark: None,
        }
    }
}

/// Fetches mentions and fans them out to handler tasks.
pub struct Poller {
    dispatcher: Arc<Dispatcher>,
    store: Arc<dyn WatermarkStore>,
    watermark: Option<String>,
    config: PollConfig,
}

impl Poller {
    /// Loads the saved watermark, falling back to
    /// [`PollConfig::initial_watermark`].
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        store: Arc<dyn WatermarkStore>,
        config: PollConfig,
    ) -> Result<Self, DispatchError> {
        let watermark = store.load()?.or_else(|| config.initial_watermark.clone());
        info!(watermark = ?watermark, "loaded watermark");
        Ok(Self {
            dispatcher,
            store,
            watermark,
            config,
        })
    }

    pub fn watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }

    /// One fetch: advances the watermark past the batch, then spawns a
    /// handler per mention. Handlers run detached; the returned handles are
    /// only for callers that want to wait on them.
    pub async fn poll_once(&mut self) -> Result<Vec<JoinHandle<()>>, DispatchError> {
        let events = self
            .dispatcher
            .platform()
            .fetch_mentions(self.watermark.as_deref())
            .await?;
        info!(count = events.len(), "checking mentions");

        self.advance(&events);

        Ok(events
            .into_iter()
            .map(|event| tokio::spawn(handle_event(self.dispatcher.clone(), event)))
            .collect())
    }

    /// Moves the watermark forward to the newest id in `events` and
    /// persists it. Never moves it backwards.
    fn advance(&mut self, events: &[MentionEvent]) {
        let Some(newest) = newest_id(events.iter().map(|e| e.id.as_str())) else {
            return;
        };
        let stale = self
            .watermark
            .as_deref()
            .is_some_and(|current| compare_ids(newest, current).is_le());
        if stale {
            return;
        }

        self.watermark = Some(newest.to_string());
        if let Err(e) = self.store.save(newest) {
            error!(error = %e, watermark = newest, "failed to persist watermark");
        }
    }
}

async fn handle_event(dispatcher: Arc<Dispatcher>, event: MentionEvent) {
    match dispatcher.handle(&event).await {
        Ok(Outcome::Published { reply_id, .. }) => {
            debug!(event_id = %event.id, reply_id = %reply_id, "mention handled");
        }
        Ok(Outcome::Ignored(reason)) => {
            debug!(event_id = %event.id, %reason, "mention ignored");
        }
        Err(e) => {
            warn!(event_id = %event.id, error = %e, "mention handling failed");
        }
    }
}

/// Polls until `cancel` fires. Fetch failures are logged and retried on the
/// next tick; handler tasks are never awaited by the loop.
pub async fn run_poll_loop(mut poller: Poller, cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(poller.config.startup_delay) => {}
    }

    let mut interval = tokio::time::interval(poller.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = poller.poll_once().await {
                    warn!(error = %e, "fetching mentions failed");
                }
            }
        }
    }

    info!("poll loop stopped");
}
