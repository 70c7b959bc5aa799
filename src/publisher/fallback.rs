//! Platform-level attribution when a publisher cannot be identified.

use log::{info, warn};

use super::{AttributionOutcome, Attributor};
use crate::error_handling::OutcomeType;
use crate::visit::VisitData;

impl Attributor {
    /// Credits the platform's own domain for this window. Without a configured
    /// top-level domain the event is only logged.
    pub(crate) async fn on_media_activity_error(
        &self,
        window_id: u64,
        url: &str,
    ) -> AttributionOutcome {
        let media_type = &self.platform.media_type;

        let Some(tld) = self.platform.tld.as_deref().filter(|tld| !tld.is_empty()) else {
            info!("Media activity error for {media_type} (name: {media_type}, url: {url})");
            return self.finish(AttributionOutcome::FallbackLogged);
        };

        let visit = VisitData {
            domain: tld.to_string(),
            url: format!("https://{tld}"),
            path: "/".to_string(),
            name: media_type.clone(),
            ..Default::default()
        };

        info!("Crediting {tld} for unresolved {media_type} activity at {url}");
        if let Err(e) = self
            .ledger
            .activity
            .get_publisher_activity_from_url(window_id, &visit, "")
            .await
        {
            warn!("Platform activity request for {tld} failed: {e}");
            self.stats.increment(OutcomeType::StorageFailure);
        }

        self.finish(AttributionOutcome::FallbackDispatched)
    }
}
