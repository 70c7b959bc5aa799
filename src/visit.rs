//! Visit descriptors and URL normalization.

use log::debug;
use psl::List;
use serde::{Deserialize, Serialize};

use crate::config::MAX_URL_LENGTH;
use crate::domain::registrable_domain;
use crate::error_handling::ValidationError;

/// A single attributed page or media visit, as handed to the ledger.
///
/// Built fresh for every call. Fields are only ever overwritten explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitData {
    /// Registrable domain (eTLD+1).
    pub domain: String,
    /// Display name. Defaults to the domain.
    pub name: String,
    /// Canonical URL used for downstream lookups.
    pub url: String,
    /// Request path (path plus query).
    pub path: String,
    /// Platform tag, e.g. `youtube`.
    pub provider: String,
    pub favicon_url: String,
}

impl VisitData {
    /// Overwrites the favicon only when `favicon_url` is non-empty.
    pub fn apply_favicon(&mut self, favicon_url: &str) {
        if !favicon_url.is_empty() {
            self.favicon_url = favicon_url.to_string();
        }
    }
}

/// Normalizes a raw URL into a [`VisitData`].
///
/// Sets `domain` and `name` to the registrable domain of the origin host,
/// `path` to the request path and `url` to the origin followed by the path.
///
/// # Errors
///
/// Fails when the URL is too long, malformed, has no host, has an opaque
/// origin, or its host has no registrable domain.
pub fn normalize(list: &List, url: &str) -> Result<VisitData, ValidationError> {
    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::UrlTooLong(url.len()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed
        .host()
        .ok_or_else(|| ValidationError::MissingHost(url.to_string()))?;

    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "opaque origin".to_string(),
        });
    }

    let domain = registrable_domain(list, &host)?;

    let path = match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    };

    debug!("Normalized {url} to domain {domain}, path {path}");

    Ok(VisitData {
        name: domain.clone(),
        domain,
        url: format!("{}{}", origin.ascii_serialization(), path),
        path,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> List {
        List
    }

    #[test]
    fn test_normalize_channel_url() {
        let visit = normalize(&list(), "https://www.youtube.com/channel/UC1").unwrap();
        assert_eq!(visit.domain, "youtube.com");
        assert_eq!(visit.name, "youtube.com");
        assert_eq!(visit.path, "/channel/UC1");
        assert_eq!(visit.url, "https://www.youtube.com/channel/UC1");
        assert!(visit.provider.is_empty());
        assert!(visit.favicon_url.is_empty());
    }

    #[test]
    fn test_normalize_keeps_query_in_path() {
        let visit = normalize(&list(), "https://www.youtube.com/watch?v=abc123").unwrap();
        assert_eq!(visit.path, "/watch?v=abc123");
        assert_eq!(visit.url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_normalize_drops_fragment() {
        let visit = normalize(&list(), "https://www.youtube.com/watch?v=1#t=30").unwrap();
        assert_eq!(visit.url, "https://www.youtube.com/watch?v=1");
    }

    #[test]
    fn test_normalize_root_url() {
        let visit = normalize(&list(), "https://youtube.com").unwrap();
        assert_eq!(visit.path, "/");
        assert_eq!(visit.url, "https://youtube.com/");
    }

    #[test]
    fn test_normalize_keeps_non_default_port_in_origin() {
        let visit = normalize(&list(), "http://media.example.com:8080/v").unwrap();
        assert_eq!(visit.domain, "example.com");
        assert_eq!(visit.url, "http://media.example.com:8080/v");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize(&list(), "not a url"),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_unregistrable_host() {
        assert!(normalize(&list(), "https://localhost/v?id=1").is_err());
        assert!(normalize(&list(), "https://10.0.0.1/v?id=1").is_err());
        assert!(normalize(&list(), "https://video.localhost/v").is_err());
        assert!(normalize(&list(), "https://media.corp/v?id=1").is_err());
    }

    #[test]
    fn test_normalize_rejects_opaque_origin() {
        assert!(normalize(&list(), "mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_normalize_rejects_overlong_url() {
        let url = format!("https://www.youtube.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize(&list(), &url),
            Err(ValidationError::UrlTooLong(_))
        ));
    }

    #[test]
    fn test_apply_favicon_only_when_non_empty() {
        let mut visit = VisitData {
            favicon_url: "https://old/icon.png".to_string(),
            ..Default::default()
        };
        visit.apply_favicon("");
        assert_eq!(visit.favicon_url, "https://old/icon.png");
        visit.apply_favicon("https://new/icon.png");
        assert_eq!(visit.favicon_url, "https://new/icon.png");
    }
}
