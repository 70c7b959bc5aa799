//! Visit recorder.

use log::{info, warn};

use super::{AttributionOutcome, Attributor, DropReason};
use crate::config::VIDEOS_PATH_SUFFIX;
use crate::error_handling::OutcomeType;
use crate::visit::VisitData;

/// Parameters for recording a publisher visit.
pub(crate) struct SaveVisitParams<'a> {
    pub window_id: u64,
    pub media_type: &'a str,
    pub duration: u64,
    /// Bound to the publisher after the save when non-empty.
    pub media_key: &'a str,
    pub publisher_key: &'a str,
    pub publisher_name: &'a str,
    pub publisher_url: &'a str,
    pub favicon_url: &'a str,
    pub channel_id: &'a str,
}

impl Attributor {
    /// Persists a visit for `publisher_key` built from scratch; the caller's
    /// VisitData is never reused.
    pub(crate) async fn record_visit(&self, params: SaveVisitParams<'_>) -> AttributionOutcome {
        let missing = if params.channel_id.is_empty() {
            Some("channel id")
        } else if params.publisher_key.is_empty() {
            Some("publisher key")
        } else if params.publisher_url.is_empty() {
            Some("publisher url")
        } else {
            None
        };
        if let Some(key) = missing {
            warn!(
                "{} is missing for media key '{}', publisher '{}'",
                key, params.media_key, params.publisher_key
            );
            return self.finish(AttributionOutcome::Dropped(DropReason::MissingKey(key)));
        }

        let mut visit = VisitData {
            provider: params.media_type.to_string(),
            name: params.publisher_name.to_string(),
            url: format!("{}{}", params.publisher_url, VIDEOS_PATH_SUFFIX),
            ..Default::default()
        };
        visit.apply_favicon(params.favicon_url);

        match self
            .ledger
            .visits
            .save_video_visit(
                params.publisher_key,
                &visit,
                params.duration,
                params.window_id,
            )
            .await
        {
            Ok(_) => info!(
                "Recorded visit for {} ({}s) at {}",
                params.publisher_key, params.duration, visit.url
            ),
            Err(e) => {
                warn!(
                    "Failed to save video visit for {}: {e}",
                    params.publisher_key
                );
                self.stats.increment(OutcomeType::StorageFailure);
            }
        }

        if !params.media_key.is_empty() {
            self.bind_media_key(params.media_key, params.publisher_key)
                .await;
        }

        self.finish(AttributionOutcome::VisitRecorded)
    }
}
