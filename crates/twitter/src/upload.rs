//! Chunked media upload: INIT, APPEND per segment, FINALIZE, then STATUS
//! polls while the platform processes the media.

use std::time::Duration;

use tracing::{debug, warn};
use turnpost_transfer::{DEFAULT_CHUNK_SIZE, SegmentReader, UploadSession, UploadStatus};

use crate::error::Error;
use crate::transport::{Form, Transport};
use crate::types::{MediaResponse, ProcessingInfo, ProcessingState};

/// Tuning for [`MediaUploader`].
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Bytes per APPEND segment.
    pub chunk_size: usize,
    /// STATUS polls allowed before giving up.
    pub max_status_polls: u32,
    /// Wait used when the platform omits `check_after_secs`.
    pub default_check_after: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_status_polls: 60,
            default_check_after: Duration::from_secs(1),
        }
    }
}

/// Drives one upload at a time against `{upload_base}/media/upload.json`.
pub struct MediaUploader<'a> {
    transport: &'a dyn Transport,
    endpoint: String,
    config: &'a UploadConfig,
}

impl<'a> MediaUploader<'a> {
    pub fn new(transport: &'a dyn Transport, upload_base: &str, config: &'a UploadConfig) -> Self {
        Self {
            transport,
            endpoint: format!("{upload_base}/media/upload.json"),
            config,
        }
    }

    /// Uploads `data` and returns the media id once it is ready for use.
    pub async fn upload(&self, data: &[u8], media_type: &str) -> Result<String, Error> {
        let mut session = UploadSession::new(data.len(), self.config.chunk_size);
        match self.run(&mut session, data, media_type).await {
            Ok(media_id) => Ok(media_id),
            Err(e) => {
                session.fail(e.to_string());
                warn!(
                    media_id = session.media_id().unwrap_or("-"),
                    error = %e,
                    "media upload failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        session: &mut UploadSession,
        data: &[u8],
        media_type: &str,
    ) -> Result<String, Error> {
        // INIT
        let form = Form::new()
            .text("command", "INIT")
            .text("total_bytes", data.len())
            .text("media_type", media_type);
        let init: MediaResponse = self.post(&form).await?;
        let media_id = init.media_id_string;
        session.begin(media_id.clone())?;
        debug!(media_id = %media_id, total_bytes = data.len(), "upload initialized");

        // APPEND
        for segment in SegmentReader::new(data, session.chunk_size()) {
            let form = Form::new()
                .text("command", "APPEND")
                .text("media_id", &media_id)
                .text("segment_index", segment.index)
                .bytes("media", segment.data.to_vec());
            self.transport
                .post(&self.endpoint, true, &form)
                .await?
                .error_for_status()?;
            session.record_append(segment.index)?;
            debug!(
                media_id = %media_id,
                segment = segment.index,
                len = segment.data.len(),
                "segment appended"
            );
        }

        // FINALIZE
        session.finalize()?;
        let form = Form::new()
            .text("command", "FINALIZE")
            .text("media_id", &media_id);
        let finalized: MediaResponse = self.post(&form).await?;

        let mut info = finalized.processing_info;
        let mut polls = 0;
        loop {
            let Some(current) = info else {
                session.succeed()?;
                break;
            };
            match current.state {
                ProcessingState::Succeeded => {
                    session.succeed()?;
                    break;
                }
                ProcessingState::Pending | ProcessingState::InProgress => {
                    session.processing()?;
                    if polls >= self.config.max_status_polls {
                        return Err(Error::Upload(format!(
                            "media {media_id} still processing after {polls} status checks"
                        )));
                    }
                    polls += 1;
                    info = self.poll_status(&media_id, &current).await?;
                }
                ProcessingState::Failed | ProcessingState::Unknown => {
                    return Err(Error::Upload(failure_reason(&media_id, &current)));
                }
            }
        }

        debug_assert_eq!(session.status(), UploadStatus::Succeeded);
        debug!(media_id = %media_id, polls, "upload complete");
        Ok(media_id)
    }

    async fn poll_status(
        &self,
        media_id: &str,
        previous: &ProcessingInfo,
    ) -> Result<Option<ProcessingInfo>, Error> {
        let wait = previous
            .check_after_secs
            .map(Duration::from_secs)
            .unwrap_or(self.config.default_check_after);
        debug!(media_id, ?wait, progress = ?previous.progress_percent, "waiting for processing");
        tokio::time::sleep(wait).await;

        let form = Form::new()
            .text("command", "STATUS")
            .text("media_id", media_id);
        let status: MediaResponse = self
            .transport
            .get(&self.endpoint, &form)
            .await?
            .error_for_status()?
            .json()?;
        Ok(status.processing_info)
    }

    async fn post(&self, form: &Form) -> Result<MediaResponse, Error> {
        self.transport
            .post(&self.endpoint, true, form)
            .await?
            .error_for_status()?
            .json()
    }
}

fn failure_reason(media_id: &str, info: &ProcessingInfo) -> String {
    match &info.error {
        Some(e) => format!("media {media_id} processing failed: {} ({})", e.message, e.name),
        None => format!("media {media_id} processing ended in {:?}", info.state),
    }
}
