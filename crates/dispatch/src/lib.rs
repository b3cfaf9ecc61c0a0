//! Turns platform mentions into game moves.
//!
//! [`classify`] sorts each mention into a new-game request, a move, or
//! noise. [`Dispatcher`] runs the matching pipeline against a [`Platform`]
//! and reports an [`Outcome`]. [`run_poll_loop`] fetches mentions on a
//! fixed interval, advances the watermark and spawns one handler per event.

mod classify;
mod dispatcher;
mod error;
mod event;
mod pacing;
mod platform;
mod poll;
mod watermark;

pub use classify::{EventKind, classify, extract_command, parse_new_game};
pub use dispatcher::{Dispatcher, IgnoreReason, Outcome, RejectionPolicy};
pub use error::DispatchError;
pub use event::{MentionEvent, ParentStatus, PlayerInfo};
pub use pacing::Pacing;
pub use platform::Platform;
pub use poll::{PollConfig, Poller, run_poll_loop};
pub use watermark::{FileWatermarkStore, MemoryWatermarkStore, WatermarkStore, newest_id};
