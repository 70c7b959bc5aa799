//! Watch-time beacon parsing.
//!
//! The player reports playback through `…/api/stats/watchtime?docid=<id>&st=<starts>&et=<ends>`
//! requests, where `st` and `et` are comma-separated lists of segment start
//! and end times in seconds (one pair per contiguous segment between seeks).

use crate::error_handling::ValidationError;

/// Media id and played duration extracted from a watch-time beacon URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchtimeBeacon {
    /// Value of `docid`; empty when absent.
    pub media_id: String,
    /// Played seconds, summed over all segments.
    pub duration: u64,
}

impl WatchtimeBeacon {
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut media_id = String::new();
        let mut starts = None;
        let mut ends = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "docid" if media_id.is_empty() => media_id = value.into_owned(),
                "st" if starts.is_none() => starts = Some(value.into_owned()),
                "et" if ends.is_none() => ends = Some(value.into_owned()),
                _ => {}
            }
        }

        let duration = match (starts, ends) {
            (Some(st), Some(et)) => segments_duration(&st, &et),
            _ => 0,
        };

        Ok(Self { media_id, duration })
    }
}

/// Sums `round(end - start)` over paired segments. Any malformed input
/// (empty lists, length mismatch, unparsable numbers, a sum that overflows)
/// yields zero.
fn segments_duration(starts: &str, ends: &str) -> u64 {
    if starts.is_empty() || ends.is_empty() {
        return 0;
    }

    let starts: Vec<&str> = starts.split(',').collect();
    let ends: Vec<&str> = ends.split(',').collect();
    if starts.len() != ends.len() {
        return 0;
    }

    let mut total = 0i64;
    for (st, et) in starts.iter().zip(ends.iter()) {
        let (Ok(st), Ok(et)) = (st.trim().parse::<f64>(), et.trim().parse::<f64>()) else {
            return 0;
        };
        if !st.is_finite() || !et.is_finite() {
            return 0;
        }
        // `as` saturates; the running sum must not overflow
        let segment = (et - st).round() as i64;
        let Some(sum) = total.checked_add(segment) else {
            return 0;
        };
        total = sum;
    }

    total.max(0) as u64
}
