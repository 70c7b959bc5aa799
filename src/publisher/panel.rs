//! Panel info resolution.

use log::{debug, warn};

use super::recorder::SaveVisitParams;
use super::{AttributionOutcome, Attributor};
use crate::error_handling::OutcomeType;
use crate::ledger::{ActivityFilter, PanelLookup};
use crate::visit::VisitData;

impl Attributor {
    /// Looks up the publisher's panel info for the current reconcile period.
    ///
    /// A hit notifies the observer and ends the request. Anything else,
    /// including lookup failures, creates the record through the visit
    /// recorder with zero duration and no media key.
    pub(crate) async fn resolve_panel(
        &self,
        window_id: u64,
        media_type: &str,
        visit: VisitData,
        channel_id: &str,
        publisher_key: &str,
        publisher_name: &str,
    ) -> AttributionOutcome {
        let lookup = self.lookup_panel(publisher_key).await;

        if lookup.is_hit() {
            if let Some(info) = lookup.info {
                debug!("Panel info hit for {publisher_key} (result {})", lookup.result);
                self.observer
                    .on_panel_publisher_info(lookup.result, info, window_id);
                return self.finish(AttributionOutcome::PanelInfoFound);
            }
        }

        debug!(
            "No panel info for {publisher_key} (result {}), creating record",
            lookup.result
        );
        self.record_visit(SaveVisitParams {
            window_id,
            media_type,
            duration: 0,
            media_key: "",
            publisher_key,
            publisher_name,
            publisher_url: &visit.url,
            favicon_url: &visit.favicon_url,
            channel_id,
        })
        .await
    }

    async fn lookup_panel(&self, publisher_key: &str) -> PanelLookup {
        let stamp = match self.ledger.state.reconcile_stamp().await {
            Ok(stamp) => stamp,
            Err(e) => {
                warn!("Failed to read reconcile stamp: {e}");
                self.stats.increment(OutcomeType::StorageFailure);
                return PanelLookup::not_found();
            }
        };

        let filter = ActivityFilter::panel(publisher_key, stamp);
        match self.ledger.panel.get_panel_publisher_info(&filter).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!("Panel lookup failed for {publisher_key}: {e}");
                self.stats.increment(OutcomeType::StorageFailure);
                PanelLookup::not_found()
            }
        }
    }
}
