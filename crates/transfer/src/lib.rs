//! Chunked media upload: segment planning and per-upload session state.
//!
//! This crate has no transport dependency. The network driver lives in
//! `turnpost-twitter` and walks an [`UploadSession`] through
//! `INIT → APPENDING → FINALIZING → [PROCESSING]* → SUCCEEDED | FAILED`
//! while feeding it segments from a [`SegmentReader`].

mod chunked;
mod types;

pub use chunked::{Segment, SegmentReader, segment_count};
pub use types::{UploadSession, UploadStatus};

/// Platform chunk limit for APPEND: 1,000,000 bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: UploadStatus,
        action: &'static str,
    },

    #[error("segment out of order: expected {expected}, got {got}")]
    SegmentOutOfOrder { expected: u32, got: u32 },

    #[error("{remaining} segment(s) not yet appended")]
    Incomplete { remaining: u32 },
}
