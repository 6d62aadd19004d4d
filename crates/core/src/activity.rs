//! Activity log query parameters.
//!
//! Parses the raw `?page=&limit=&query=&sort=&dir=&createdAtFrom=&createdAtTo=`
//! parameters into an [`ActivityLogFilter`]. Lenient where the client can only
//! be sloppy (paging, sort field) and strict where a silent fallback would
//! change the result set (date bounds).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::audit::ActivityLogEntry;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Page used when the client sends none (or garbage).
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client sends none (or garbage).
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on the page size.
pub const MAX_LIMIT: i64 = 100;

/// Raw query-string parameters, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub created_at_from: Option<String>,
    pub created_at_to: Option<String>,
}

/// Columns the activity log can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Event,
    EntityId,
    EntityType,
    Description,
    IpAddress,
}

impl SortField {
    /// Parse the client's field name; unknown names fall back to `createdAt`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("event") => Self::Event,
            Some("entityId") => Self::EntityId,
            Some("entityType") => Self::EntityType,
            Some("description") => Self::Description,
            Some("ipAddress") => Self::IpAddress,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the literal `"desc"` sorts descending.
    pub fn parse(raw: Option<&str>) -> Self {
        if raw == Some("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Normalized activity log filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogFilter {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
    /// Case-insensitive substring; `None` matches everything.
    pub query: Option<String>,
    pub sort: SortField,
    pub direction: SortDirection,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<Timestamp>,
}

impl Default for ActivityLogFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            query: None,
            sort: SortField::default(),
            direction: SortDirection::default(),
            created_from: None,
            created_to: None,
        }
    }
}

impl ActivityLogFilter {
    /// Parse raw parameters.
    ///
    /// Fails only on an unparseable date bound.
    pub fn from_params(params: &ActivityLogParams) -> Result<Self, CoreError> {
        let page = parse_int(params.page.as_deref(), DEFAULT_PAGE).max(1);
        let limit = parse_int(params.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let created_from = params
            .created_at_from
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_bound(raw, Bound::Start, "createdAtFrom"))
            .transpose()?;
        let created_to = params
            .created_at_to
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_bound(raw, Bound::End, "createdAtTo"))
            .transpose()?;

        Ok(Self {
            page,
            limit,
            query,
            sort: SortField::parse(params.sort.as_deref()),
            direction: SortDirection::parse(params.dir.as_deref()),
            created_from,
            created_to,
        })
    }

    /// Number of rows to skip for the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of entries plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogSlice {
    pub entries: Vec<ActivityLogEntry>,
    pub total: i64,
}

/// Pagination metadata echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// `{ data, pagination }` response for the activity log listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLogPage {
    pub data: Vec<ActivityLogEntry>,
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_int(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(fallback)
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
///
/// A bare date covers the whole UTC day: a start bound begins at midnight, an
/// end bound runs to the last nanosecond of the day.
fn parse_bound(raw: &str, bound: Bound, field: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&chrono::Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date format for {field}")))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time).and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
