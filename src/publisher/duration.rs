//! Media duration updates.

use log::{debug, info, warn};

use super::media_key::{media_key, MediaKeyResolution};
use super::{AttributionOutcome, Attributor, DropReason};
use crate::error_handling::OutcomeType;
use crate::visit::VisitData;
use crate::watchtime::WatchtimeBeacon;

/// A playback duration to add to an already-identified publisher.
#[derive(Debug, Clone, Default)]
pub struct MediaDuration {
    pub window_id: u64,
    pub media_type: String,
    /// Publisher page URL; empty keeps the stored one.
    pub url: String,
    pub publisher_key: String,
    pub publisher_name: String,
    pub media_id: String,
    pub media_key: String,
    pub favicon_url: String,
    /// Seconds.
    pub duration: u64,
}

impl Attributor {
    /// Adds `duration` seconds to the publisher's current period. No observer
    /// notification; storage errors are logged.
    pub async fn update_media_duration(&self, update: &MediaDuration) -> AttributionOutcome {
        debug!(
            "Media key: {}, media id: {}, duration: {}",
            update.media_key, update.media_id, update.duration
        );

        if update.publisher_key.is_empty() {
            warn!("Publisher key is missing for media key '{}'", update.media_key);
            return self.finish(AttributionOutcome::Dropped(DropReason::MissingKey(
                "publisher key",
            )));
        }

        let visit = VisitData {
            name: update.publisher_name.clone(),
            url: update.url.clone(),
            provider: update.media_type.clone(),
            favicon_url: update.favicon_url.clone(),
            ..Default::default()
        };

        if let Err(e) = self
            .ledger
            .visits
            .save_video_visit(
                &update.publisher_key,
                &visit,
                update.duration,
                update.window_id,
            )
            .await
        {
            warn!(
                "Failed to update media duration for {}: {e}",
                update.publisher_key
            );
            self.stats.increment(OutcomeType::StorageFailure);
        }

        self.finish(AttributionOutcome::DurationUpdated)
    }

    /// Handles a watch-time beacon: credits the played duration to the
    /// publisher already bound to the beacon's media key. Unbound media is
    /// left alone until a page visit identifies its publisher.
    pub async fn on_watchtime(&self, window_id: u64, url: &str) -> AttributionOutcome {
        let beacon = match WatchtimeBeacon::parse(url) {
            Ok(beacon) => beacon,
            Err(e) => return self.drop_invalid_url(url, e),
        };

        let media_type = self.platform.media_type.clone();
        let key = media_key(&media_type, &beacon.media_id);
        if key.is_empty() {
            warn!("Watch-time beacon without media id: {url}");
            return self.finish(AttributionOutcome::Dropped(DropReason::MissingKey(
                "media id",
            )));
        }

        match self.resolve_media_key(&key).await {
            MediaKeyResolution::Found(info) => {
                info!(
                    "Updating media duration: window={window_id} publisher={} duration={}",
                    info.id, beacon.duration
                );
                self.update_media_duration(&MediaDuration {
                    window_id,
                    media_type,
                    // The beacon URL is not a publisher page
                    url: info.url,
                    publisher_key: info.id,
                    publisher_name: info.name,
                    media_id: beacon.media_id,
                    media_key: key,
                    favicon_url: info.favicon_url,
                    duration: beacon.duration,
                })
                .await
            }
            MediaKeyResolution::NotFound => {
                debug!("No publisher bound to {key} yet");
                self.finish(AttributionOutcome::Dropped(
                    DropReason::WatchtimeUnresolved,
                ))
            }
            MediaKeyResolution::StorageError(e) => {
                warn!("Media key lookup failed for {key}: {e}");
                self.finish(AttributionOutcome::Dropped(
                    DropReason::WatchtimeUnresolved,
                ))
            }
        }
    }
}
