//! Media key cache.

use log::{debug, warn};

use super::Attributor;
use crate::error_handling::{OutcomeType, StorageError};
use crate::ledger::PublisherInfo;

/// Result of a media key lookup.
#[derive(Debug)]
pub enum MediaKeyResolution {
    Found(PublisherInfo),
    NotFound,
    StorageError(StorageError),
}

/// Builds the cache key of a media item, e.g. `youtube_dQw4w9WgXcQ`.
/// Empty when `media_id` is empty.
pub fn media_key(media_type: &str, media_id: &str) -> String {
    if media_id.is_empty() {
        return String::new();
    }
    format!("{media_type}_{media_id}")
}

impl Attributor {
    /// One storage read; "not found" is an ordinary outcome.
    pub async fn resolve_media_key(&self, media_key: &str) -> MediaKeyResolution {
        match self.ledger.media.get_media_publisher_info(media_key).await {
            Ok(Some(info)) => {
                debug!("Media key {media_key} is bound to {}", info.id);
                MediaKeyResolution::Found(info)
            }
            Ok(None) => MediaKeyResolution::NotFound,
            Err(e) => {
                self.stats.increment(OutcomeType::StorageFailure);
                MediaKeyResolution::StorageError(e)
            }
        }
    }

    /// Binds `media_key` to `publisher_key`. Errors are logged and dropped; a
    /// lost bind only means the next event repeats the resolution.
    pub(crate) async fn bind_media_key(&self, media_key: &str, publisher_key: &str) {
        match self
            .ledger
            .media
            .save_media_publisher_info(media_key, publisher_key)
            .await
        {
            Ok(()) => {
                debug!("Bound media key {media_key} to {publisher_key}");
                self.stats.increment(OutcomeType::MediaKeyBound);
            }
            Err(e) => {
                warn!("Failed to bind media key {media_key} to {publisher_key}: {e}");
                self.stats.increment(OutcomeType::StorageFailure);
            }
        }
    }
}
