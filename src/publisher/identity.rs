//! Identity entry points, one per platform page shape.

use log::{debug, warn};

use super::media_key::MediaKeyResolution;
use super::recorder::SaveVisitParams;
use super::{AttributionOutcome, Attributor, PublisherVisitData};
use crate::visit::{normalize, VisitData};

impl Attributor {
    /// Channel page (`/channel/<id>`): the publisher key is known from the page.
    ///
    /// An empty publisher key credits the platform instead.
    pub async fn save_publisher_visit_channel(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        debug!(
            "Visited a channel url: window={window_id} url={} channel={} publisher={}",
            data.url, data.channel_id, data.publisher_key
        );

        if data.publisher_key.is_empty() {
            return self.on_media_activity_error(window_id, &data.url).await;
        }

        self.get_publisher_panel_info(window_id, media_type, data)
            .await
    }

    /// Legacy user page (`/user/<name>`): resolved through the media key cache.
    ///
    /// Bound or not, the request continues as a channel visit on the channel's
    /// canonical URL; an unbound key is bound to the caller's publisher key
    /// first. A failed cache read credits the platform instead.
    pub async fn save_publisher_visit_user(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        debug!(
            "Visited a user url: window={window_id} url={} channel={} media_key={}",
            data.url, data.channel_id, data.media_key
        );

        if !data.media_key.is_empty() {
            match self.resolve_media_key(&data.media_key).await {
                MediaKeyResolution::Found(_) => {}
                MediaKeyResolution::NotFound => {
                    self.bind_media_key(&data.media_key, &data.publisher_key)
                        .await;
                }
                MediaKeyResolution::StorageError(e) => {
                    warn!("Media key lookup failed for {}: {e}", data.media_key);
                    return self.on_media_activity_error(window_id, &data.url).await;
                }
            }
        }

        let channel = PublisherVisitData {
            url: self.platform.channel_url(&data.channel_id),
            channel_id: data.channel_id.clone(),
            publisher_key: data.publisher_key.clone(),
            publisher_name: data.publisher_name.clone(),
            media_key: String::new(),
            favicon_url: String::new(),
        };
        self.save_publisher_visit_channel(window_id, media_type, &channel)
            .await
    }

    /// Video watch page: records a zero-duration visit directly, skipping the
    /// panel, and binds the media key. Duration arrives later through
    /// watch-time updates. An unparsable URL is dropped without any write.
    pub async fn save_publisher_visit_video(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        debug!(
            "Visited a video url: window={window_id} url={} channel={} media_key={}",
            data.url, data.channel_id, data.media_key
        );

        let mut visit = match normalize(&self.extractor, &data.url) {
            Ok(visit) => visit,
            Err(e) => return self.drop_invalid_url(&data.url, e),
        };
        visit.apply_favicon(&data.favicon_url);

        self.record_visit(SaveVisitParams {
            window_id,
            media_type,
            duration: 0,
            media_key: &data.media_key,
            publisher_key: &data.publisher_key,
            publisher_name: &data.publisher_name,
            publisher_url: &data.url,
            favicon_url: &visit.favicon_url,
            channel_id: &data.channel_id,
        })
        .await
    }

    /// Custom (vanity) page: only the channel id is reliable, so the visit is
    /// synthesized from it under the platform's own domain. A platform without
    /// a registrable domain drops the visit.
    pub async fn save_publisher_visit_custom(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        debug!(
            "Visited a custom url: window={window_id} url={} channel={}",
            data.url, data.channel_id
        );

        let domain = match self.platform.site_domain(&self.extractor) {
            Ok(domain) => domain,
            Err(e) => return self.drop_invalid_url(&self.platform.channel_base_url, e),
        };
        let mut visit = VisitData {
            name: domain.clone(),
            domain,
            url: self.platform.channel_url(&data.channel_id),
            path: format!("/channel/{}", data.channel_id),
            ..Default::default()
        };
        visit.apply_favicon(&data.favicon_url);

        self.resolve_panel(
            window_id,
            media_type,
            visit,
            &data.channel_id,
            &data.publisher_key,
            &data.publisher_name,
        )
        .await
    }

    /// Normalizes the page URL and resolves the publisher's panel info.
    pub async fn get_publisher_panel_info(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        let mut visit = match normalize(&self.extractor, &data.url) {
            Ok(visit) => visit,
            Err(e) => return self.drop_invalid_url(&data.url, e),
        };
        visit.apply_favicon(&data.favicon_url);

        self.resolve_panel(
            window_id,
            media_type,
            visit,
            &data.channel_id,
            &data.publisher_key,
            &data.publisher_name,
        )
        .await
    }
}
