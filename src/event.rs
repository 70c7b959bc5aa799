//! Incoming platform events and their routing.
//!
//! Events arrive one JSON object per line, tagged by `kind`:
//!
//! ```json
//! {"kind":"visit","path_type":"channel","window_id":1,"data":{"url":"https://www.youtube.com/channel/UC1","channel_id":"UC1","publisher_key":"youtube#channel:UC1"}}
//! {"kind":"watchtime","window_id":1,"url":"https://www.youtube.com/api/stats/watchtime?docid=abc&st=0&et=30"}
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::publisher::{
    AttributionOutcome, Attributor, DropReason, MediaKeyResolution, PublisherVisitData,
};

/// Shape of the page the publisher data was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PathType {
    Channel,
    User,
    Video,
    Custom,
}

/// A page visit with scraped publisher data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherVisitEvent {
    /// Defaults to the configured platform's media type when empty.
    #[serde(default)]
    pub media_type: String,
    pub path_type: PathType,
    pub window_id: u64,
    pub data: PublisherVisitData,
}

/// A watch-time beacon observed for a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchtimeEvent {
    pub window_id: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributionEvent {
    Visit(PublisherVisitEvent),
    Watchtime(WatchtimeEvent),
}

impl AttributionEvent {
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn window_id(&self) -> u64 {
        match self {
            AttributionEvent::Visit(visit) => visit.window_id,
            AttributionEvent::Watchtime(watchtime) => watchtime.window_id,
        }
    }
}

impl Attributor {
    /// Routes an event to its entry point.
    pub async fn handle_event(&self, event: &AttributionEvent) -> AttributionOutcome {
        match event {
            AttributionEvent::Visit(visit) => self.handle_publisher_visit(visit).await,
            AttributionEvent::Watchtime(watchtime) => {
                self.on_watchtime(watchtime.window_id, &watchtime.url)
                    .await
            }
        }
    }

    /// Routes a page visit by its path type.
    pub async fn handle_publisher_visit(&self, event: &PublisherVisitEvent) -> AttributionOutcome {
        let media_type = if event.media_type.is_empty() {
            self.platform().media_type.as_str()
        } else {
            event.media_type.as_str()
        };
        debug!(
            "Publisher visit: path_type={} window={} url={}",
            event.path_type, event.window_id, event.data.url
        );

        match event.path_type {
            PathType::Channel => {
                self.save_publisher_visit_channel(event.window_id, media_type, &event.data)
                    .await
            }
            PathType::User => {
                self.save_publisher_visit_user(event.window_id, media_type, &event.data)
                    .await
            }
            PathType::Video => self.handle_video_visit(event.window_id, media_type, &event.data).await,
            PathType::Custom => {
                self.save_publisher_visit_custom(event.window_id, media_type, &event.data)
                    .await
            }
        }
    }

    /// A video already bound to a publisher only needs its panel info; an
    /// unbound one goes through the video path, which binds it. A failed
    /// lookup is dropped.
    async fn handle_video_visit(
        &self,
        window_id: u64,
        media_type: &str,
        data: &PublisherVisitData,
    ) -> AttributionOutcome {
        if data.media_key.is_empty() {
            warn!("Failed to handle publisher visit: missing media key");
            return self.finish(AttributionOutcome::Dropped(DropReason::MissingKey(
                "media key",
            )));
        }

        match self.resolve_media_key(&data.media_key).await {
            MediaKeyResolution::Found(_) => {
                self.get_publisher_panel_info(window_id, media_type, data)
                    .await
            }
            MediaKeyResolution::NotFound => {
                self.save_publisher_visit_video(window_id, media_type, data)
                    .await
            }
            MediaKeyResolution::StorageError(e) => {
                warn!("Media key lookup failed for {}: {e}", data.media_key);
                self.finish(AttributionOutcome::Dropped(DropReason::LookupFailed))
            }
        }
    }
}
