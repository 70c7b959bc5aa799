//! Registrable domain extraction.
//!
//! Uses the Public Suffix List (ICANN and private sections) to find the
//! eTLD+1 of a host.
//!
//! Key functions:
//! - `registrable_domain()` - eTLD+1 of a parsed host
//! - `extract_domain()` - eTLD+1 of a URL string

use psl::{List, Psl};

use crate::error_handling::ValidationError;

/// Returns the registrable domain of `host`.
///
/// # Errors
///
/// Returns `ValidationError::IpAddress` for IPv4/IPv6 hosts and
/// `ValidationError::UnregistrableHost` when the host is itself a public suffix
/// (e.g. `co.uk`, `localhost`) or its suffix is not in the list
/// (e.g. `video.localhost`, `media.corp`).
pub fn registrable_domain(list: &List, host: &url::Host<&str>) -> Result<String, ValidationError> {
    let name = match host {
        url::Host::Domain(name) => *name,
        url::Host::Ipv4(addr) => return Err(ValidationError::IpAddress(addr.to_string())),
        url::Host::Ipv6(addr) => return Err(ValidationError::IpAddress(addr.to_string())),
    };

    let name = name.trim_end_matches('.');
    // The implicit `*` rule matches any unlisted TLD
    let domain = list
        .domain(name.as_bytes())
        .filter(|domain| domain.suffix().is_known())
        .ok_or_else(|| ValidationError::UnregistrableHost(name.to_string()))?;
    let domain = String::from_utf8_lossy(domain.as_bytes()).to_string();
    if domain.is_empty() {
        return Err(ValidationError::UnregistrableHost(name.to_string()));
    }
    Ok(domain)
}

/// Extracts the registrable domain from a URL.
///
/// # Returns
///
/// The registrable domain (e.g., "youtube.com" from "https://www.youtube.com/watch?v=1")
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed, has no host, is an IP
/// address, or has no registrable domain.
pub fn extract_domain(list: &List, url: &str) -> Result<String, ValidationError> {
    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let host = parsed
        .host()
        .ok_or_else(|| ValidationError::MissingHost(url.to_string()))?;
    registrable_domain(list, &host)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
