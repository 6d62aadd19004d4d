//! Activity log listing for the current user.

use crate::activity::{ActivityLogFilter, ActivityLogPage, ActivityLogParams, Pagination};
use crate::error::CoreError;
use crate::store::AdminStore;
use crate::types::Actor;

/// Return one page of `actor`'s own activity log.
///
/// Entries belonging to anyone else are never visible, whatever the filter.
pub async fn list_activity_logs<S: AdminStore>(
    store: &S,
    actor: Option<&Actor>,
    params: &ActivityLogParams,
) -> Result<ActivityLogPage, CoreError> {
    let actor = actor.ok_or_else(CoreError::unauthorized)?;
    let filter = ActivityLogFilter::from_params(params)?;

    let slice = store.list_activity(actor.user_id, &filter).await?;

    Ok(ActivityLogPage {
        data: slice.entries,
        pagination: Pagination {
            total: slice.total,
            page: filter.page,
            limit: filter.limit,
        },
    })
}
