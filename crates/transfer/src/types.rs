use crate::chunked::segment_count;
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

/// Upload lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// Session requested, no media id yet.
    Init,
    /// Media id assigned; segments being appended.
    Appending,
    /// FINALIZE sent.
    Finalizing,
    /// Platform is still processing the media.
    Processing,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

/// State of a single media upload.
///
/// Owned by the task driving the upload; transitions that do not follow
/// the protocol order are rejected.
#[derive(Debug, Clone)]
pub struct UploadSession {
    media_id: Option<String>,
    total_bytes: usize,
    chunk_size: usize,
    next_segment_index: u32,
    status: UploadStatus,
    error: Option<String>,
}

impl UploadSession {
    /// Creates a session in `Init`. A `chunk_size` of 0 means
    /// [`DEFAULT_CHUNK_SIZE`].
    pub fn new(total_bytes: usize, chunk_size: usize) -> Self {
        Self {
            media_id: None,
            total_bytes,
            chunk_size: if chunk_size == 0 {
                DEFAULT_CHUNK_SIZE
            } else {
                chunk_size
            },
            next_segment_index: 0,
            status: UploadStatus::Init,
            error: None,
        }
    }

    /// INIT succeeded: store the platform media id and start appending.
    pub fn begin(&mut self, media_id: String) -> Result<(), TransferError> {
        self.expect(&[UploadStatus::Init], "begin appending")?;
        self.media_id = Some(media_id);
        self.status = UploadStatus::Appending;
        Ok(())
    }

    /// Records a successful APPEND of segment `index`.
    pub fn record_append(&mut self, index: u32) -> Result<(), TransferError> {
        self.expect(&[UploadStatus::Appending], "append")?;
        if index != self.next_segment_index {
            return Err(TransferError::SegmentOutOfOrder {
                expected: self.next_segment_index,
                got: index,
            });
        }
        self.next_segment_index += 1;
        Ok(())
    }

    /// FINALIZE is about to be sent; every segment must be appended.
    pub fn finalize(&mut self) -> Result<(), TransferError> {
        self.expect(&[UploadStatus::Appending], "finalize")?;
        let remaining = self.segment_count() - self.next_segment_index;
        if remaining > 0 {
            return Err(TransferError::Incomplete { remaining });
        }
        self.status = UploadStatus::Finalizing;
        Ok(())
    }

    /// The platform reported processing still in progress.
    pub fn processing(&mut self) -> Result<(), TransferError> {
        self.expect(
            &[UploadStatus::Finalizing, UploadStatus::Processing],
            "poll processing",
        )?;
        self.status = UploadStatus::Processing;
        Ok(())
    }

    /// The media is ready for use.
    pub fn succeed(&mut self) -> Result<(), TransferError> {
        self.expect(
            &[UploadStatus::Finalizing, UploadStatus::Processing],
            "succeed",
        )?;
        self.status = UploadStatus::Succeeded;
        Ok(())
    }

    /// Marks the upload failed. Terminal sessions are left untouched.
    pub fn fail(&mut self, err: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = UploadStatus::Failed;
        self.error = Some(err.into());
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn media_id(&self) -> Option<&str> {
        self.media_id.as_deref()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Index the next APPEND must carry.
    pub fn next_segment_index(&self) -> u32 {
        self.next_segment_index
    }

    /// Total number of APPEND segments for this upload.
    pub fn segment_count(&self) -> u32 {
        segment_count(self.total_bytes, self.chunk_size)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn expect(&self, allowed: &[UploadStatus], action: &'static str) -> Result<(), TransferError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TransferError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }
}
