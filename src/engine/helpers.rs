use super::Database;

use chrono::{DateTime, Duration, Utc};
use sqlx::{types::Json, Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::Draft,
    error::{not_found_error, Error},
};

/// Drafts untouched for this long are dropped.
pub const DRAFT_TTL_HOURS: i64 = 24;

pub fn stale_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(DRAFT_TTL_HOURS)
}

#[tracing::instrument(skip(executor))]
pub async fn prune_stale_drafts<'e, E>(executor: E, now: DateTime<Utc>) -> Result<u64, Error>
where
    E: Executor<'e, Database = Database>,
{
    let result = executor
        .execute(
            sqlx::query("DELETE FROM route_drafts WHERE updated_at < $1").bind(stale_before(now)),
        )
        .await?;

    if result.rows_affected() > 0 {
        tracing::info!(pruned = result.rows_affected(), "dropped stale drafts");
    }

    Ok(result.rows_affected())
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_draft_for_update(
    tx: &mut Transaction<'_, Database>,
    token: &Uuid,
) -> Result<Draft, Error> {
    let Json(draft): Json<Draft> = tx
        .fetch_optional(
            sqlx::query("SELECT data FROM route_drafts WHERE token = $1 FOR UPDATE").bind(token),
        )
        .await?
        .ok_or_else(|| not_found_error().with_message("draft not found"))?
        .try_get("data")?;

    Ok(draft)
}

#[tracing::instrument(skip(tx, draft), fields(token = %draft.token))]
pub async fn insert_draft(
    tx: &mut Transaction<'_, Database>,
    draft: &Draft,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("INSERT INTO route_drafts (token, data) VALUES ($1, $2)")
            .bind(&draft.token)
            .bind(Json(draft)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx, draft), fields(token = %draft.token))]
pub async fn update_draft(
    tx: &mut Transaction<'_, Database>,
    draft: &Draft,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE route_drafts SET data = $2, updated_at = now() WHERE token = $1")
            .bind(&draft.token)
            .bind(Json(draft)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn delete_draft(
    tx: &mut Transaction<'_, Database>,
    token: &Uuid,
) -> Result<(), Error> {
    let result = tx
        .execute(sqlx::query("DELETE FROM route_drafts WHERE token = $1").bind(token))
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error().with_message("draft not found"));
    }

    Ok(())
}
