//! Panel lookups over publisher records and activity.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::config::{MIN_VISITS, MIN_VISIT_TIME_SECS};
use crate::error_handling::StorageError;
use crate::ledger::{
    ActivityFilter, ExcludeFilter, LedgerResult, PanelLookup, PublisherInfo, PublisherStatus,
};

const PUBLISHER_COLUMNS: &str = "pi.publisher_id, pi.name, pi.url, pi.provider, pi.favicon_url,
     pi.status, pi.is_excluded,
     COALESCE(ai.duration, 0) AS duration, COALESCE(ai.visits, 0) AS visits";

fn row_to_info(row: &SqliteRow, reconcile_stamp: u64) -> Result<PublisherInfo, StorageError> {
    let duration: i64 = row.try_get("duration")?;
    let visits: i64 = row.try_get("visits")?;
    Ok(PublisherInfo {
        id: row.try_get("publisher_id")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        provider: row.try_get("provider")?,
        favicon_url: row.try_get("favicon_url")?,
        status: PublisherStatus::from_i64(row.try_get("status")?),
        excluded: row.try_get::<i64, _>("is_excluded")? != 0,
        duration: duration.max(0) as u64,
        visits: visits.clamp(0, i64::from(u32::MAX)) as u32,
        reconcile_stamp,
    })
}

/// Loads one publisher with its activity in the given reconcile period.
pub async fn select_publisher(
    pool: &SqlitePool,
    publisher_id: &str,
    reconcile_stamp: u64,
) -> Result<Option<PublisherInfo>, StorageError> {
    let sql = format!(
        "SELECT {PUBLISHER_COLUMNS}
         FROM publisher_info pi
         LEFT JOIN activity_info ai
           ON ai.publisher_id = pi.publisher_id AND ai.reconcile_stamp = ?
         WHERE pi.publisher_id = ?"
    );
    let row = sqlx::query(&sql)
        .bind(reconcile_stamp as i64)
        .bind(publisher_id)
        .fetch_optional(pool)
        .await?;
    row.map(|r| row_to_info(&r, reconcile_stamp)).transpose()
}

fn exclude_clause(filter: ExcludeFilter) -> Option<&'static str> {
    match filter {
        ExcludeFilter::FilterAll => None,
        ExcludeFilter::FilterExcluded => Some("pi.is_excluded = 1"),
        ExcludeFilter::FilterDefault
        | ExcludeFilter::FilterIncluded
        | ExcludeFilter::FilterAllExceptExcluded => Some("pi.is_excluded = 0"),
    }
}

/// Runs a panel lookup for the filter's publisher key.
pub async fn get_panel_publisher_info(
    pool: &SqlitePool,
    filter: &ActivityFilter,
) -> Result<PanelLookup, StorageError> {
    let mut conditions = vec!["pi.publisher_id = ?".to_string()];
    if let Some(clause) = exclude_clause(filter.excluded) {
        conditions.push(clause.to_string());
    }
    if !filter.non_verified {
        conditions.push(format!(
            "pi.status != {}",
            PublisherStatus::NotVerified.as_i64()
        ));
    }
    if filter.min_duration {
        conditions.push(format!("COALESCE(ai.duration, 0) >= {MIN_VISIT_TIME_SECS}"));
    }
    if filter.min_visits {
        conditions.push(format!("COALESCE(ai.visits, 0) >= {MIN_VISITS}"));
    }

    let sql = format!(
        "SELECT {PUBLISHER_COLUMNS}
         FROM publisher_info pi
         LEFT JOIN activity_info ai
           ON ai.publisher_id = pi.publisher_id AND ai.reconcile_stamp = ?
         WHERE {}",
        conditions.join(" AND ")
    );

    let row = sqlx::query(&sql)
        .bind(filter.reconcile_stamp as i64)
        .bind(&filter.publisher_key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(PanelLookup::found(row_to_info(&row, filter.reconcile_stamp)?)),
        None => Ok(PanelLookup {
            result: LedgerResult::NotFound,
            info: None,
        }),
    }
}
