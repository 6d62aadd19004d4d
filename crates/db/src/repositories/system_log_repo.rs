//! Repository for the append-only `system_logs` table.

use backoffice_core::activity::{ActivityLogFilter, SortDirection, SortField};
use backoffice_core::audit::NewLogEntry;
use backoffice_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::system_log::SystemLog;

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `system_logs` SELECT queries.
const COLUMNS: &str = "\
    id, event, user_id, entity_id, entity_type, description, ip_address, created_at";

/// Column list for INSERT (excludes auto-generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "event, user_id, entity_id, entity_type, description, ip_address";

// ---------------------------------------------------------------------------
// SystemLogRepo
// ---------------------------------------------------------------------------

/// Provides insert and per-user query operations for audit logs.
pub struct SystemLogRepo;

impl SystemLogRepo {
    /// Append one entry. Pass `&mut *tx` to keep the write inside a
    /// transaction.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        entry: &NewLogEntry,
    ) -> Result<SystemLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_logs ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemLog>(&query)
            .bind(&entry.event)
            .bind(entry.user_id)
            .bind(&entry.entity_id)
            .bind(&entry.entity_type)
            .bind(&entry.description)
            .bind(&entry.ip_address)
            .fetch_one(executor)
            .await
    }

    /// One page of `user_id`'s entries matching `filter`.
    pub async fn list_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        filter: &ActivityLogFilter,
    ) -> Result<Vec<SystemLog>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_log_filter(user_id, filter);
        let direction = match filter.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };

        let query = format!(
            "SELECT {COLUMNS} FROM system_logs {where_clause} \
             ORDER BY {} {direction}, id {direction} \
             LIMIT ${bind_idx} OFFSET ${}",
            sort_column(filter.sort),
            bind_idx + 1
        );

        let q = bind_log_values(sqlx::query_as::<_, SystemLog>(&query), &bind_values);
        q.bind(filter.limit)
            .bind(filter.offset())
            .fetch_all(executor)
            .await
    }

    /// Count `user_id`'s entries matching `filter`, ignoring pagination.
    pub async fn count_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        filter: &ActivityLogFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_log_filter(user_id, filter);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM system_logs {where_clause}");

        let q = bind_log_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(executor).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built log queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Map a sort field onto its column. Only whitelisted names reach SQL.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::Event => "event",
        SortField::EntityId => "entity_id",
        SortField::EntityType => "entity_type",
        SortField::Description => "description",
        SortField::IpAddress => "ip_address",
    }
}

/// Escape `LIKE` metacharacters so the query text matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Build a WHERE clause and bind values for one user's log entries.
///
/// The owner condition is always present. Returns
/// `(where_clause, bind_values, next_bind_index)`.
fn build_log_filter(user_id: DbId, filter: &ActivityLogFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["user_id = $1".to_string()];
    let mut bind_idx = 2u32;
    let mut bind_values: Vec<BindValue> = vec![BindValue::BigInt(user_id)];

    if let Some(ref query) = filter.query {
        conditions.push(format!(
            "(event ILIKE ${bind_idx} OR description ILIKE ${bind_idx} \
              OR entity_id ILIKE ${bind_idx} OR entity_type ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(query))));
    }

    if let Some(from) = filter.created_from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = filter.created_to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    (
        format!("WHERE {}", conditions.join(" AND ")),
        bind_values,
        bind_idx,
    )
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_log_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_log_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like(r"50%_off\now"), r"50\%\_off\\now");
    }

    #[test]
    fn owner_condition_is_always_first() {
        let (where_clause, binds, next) = build_log_filter(9, &ActivityLogFilter::default());
        assert_eq!(where_clause, "WHERE user_id = $1");
        assert_eq!(binds.len(), 1);
        assert_eq!(next, 2);
    }

    #[test]
    fn query_and_dates_get_sequential_placeholders() {
        let filter = ActivityLogFilter {
            query: Some("role".into()),
            created_from: Some(chrono::Utc::now()),
            created_to: Some(chrono::Utc::now()),
            ..ActivityLogFilter::default()
        };
        let (where_clause, binds, next) = build_log_filter(1, &filter);
        assert!(where_clause.contains("event ILIKE $2"));
        assert!(where_clause.contains("created_at >= $3"));
        assert!(where_clause.contains("created_at <= $4"));
        assert_eq!(binds.len(), 4);
        assert_eq!(next, 5);
    }
}
