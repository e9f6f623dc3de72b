use super::helpers::{
    delete_draft, fetch_draft_for_update, insert_draft, prune_stale_drafts, update_draft,
};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::DraftAPI,
    auth::{Collection, Session},
    editor::{drain, PointRole},
    entities::{Coordinates, Draft, DraftDetails, DraftUpdate, Program, Route},
    error::{not_found_error, Error},
};

impl Engine {
    fn authorize_route_editing(&self, session: &Session) -> Result<(), Error> {
        self.authorize(session.actor(), "update", Collection::of::<Route>())
    }

    async fn store_new_draft(&self, draft: Draft) -> Result<Draft, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        prune_stale_drafts(&mut tx, Utc::now()).await?;
        insert_draft(&mut tx, &draft).await?;

        tx.commit().await?;

        Ok(draft)
    }

    /// Loads the draft under a row lock, applies `f` and writes it back. The
    /// row is left untouched when `f` fails.
    async fn mutate_draft<F>(&self, session: &Session, token: Uuid, f: F) -> Result<DraftUpdate, Error>
    where
        F: FnOnce(&mut Draft) -> Result<(), Error> + Send,
    {
        self.authorize_route_editing(session)?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut draft = fetch_draft_for_update(&mut tx, &token).await?;
        let changes = draft.editor.subscribe();

        f(&mut draft)?;

        update_draft(&mut tx, &draft).await?;

        tx.commit().await?;

        Ok(DraftUpdate {
            changes: drain(&changes),
            draft,
        })
    }
}

#[async_trait]
impl DraftAPI for Engine {
    #[tracing::instrument(skip(self, session))]
    async fn open_draft(&self, session: Session, details: DraftDetails) -> Result<Draft, Error> {
        self.authorize_route_editing(&session)?;

        // the program must resolve on the backend before a row is stored
        let program_id = details.required_program()?;
        self.backend.show::<Program>(&session, program_id).await?;

        self.store_new_draft(Draft::new(details)).await
    }

    #[tracing::instrument(skip(self, session))]
    async fn open_route_draft(&self, session: Session, route_id: i64) -> Result<Draft, Error> {
        self.authorize_route_editing(&session)?;

        let route = self.backend.show::<Route>(&session, route_id).await?;

        self.store_new_draft(Draft::from_route(route)).await
    }

    #[tracing::instrument(skip(self, session))]
    async fn find_draft(&self, session: Session, token: Uuid) -> Result<Draft, Error> {
        self.authorize_route_editing(&session)?;

        let mut conn = self.pool.acquire().await?;

        let Json(draft): Json<Draft> = conn
            .fetch_optional(
                sqlx::query("SELECT data FROM route_drafts WHERE token = $1").bind(&token),
            )
            .await?
            .ok_or_else(|| not_found_error().with_message("draft not found"))?
            .try_get("data")?;

        Ok(draft)
    }

    #[tracing::instrument(skip(self, session))]
    async fn update_draft_details(
        &self,
        session: Session,
        token: Uuid,
        details: DraftDetails,
    ) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| {
            draft.apply_details(details);
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn begin_pick(
        &self,
        session: Session,
        token: Uuid,
        role: PointRole,
    ) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| {
            draft.editor.begin_pick(role);
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn click(
        &self,
        session: Session,
        token: Uuid,
        coordinates: Coordinates,
    ) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| {
            draft.editor.click(coordinates.lat, coordinates.lng)?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn cancel_pick(&self, session: Session, token: Uuid) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| {
            draft.editor.cancel_pick();
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn relabel_point(
        &self,
        session: Session,
        token: Uuid,
        index: usize,
        label: String,
    ) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| draft.editor.relabel(index, label))
            .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn remove_point(
        &self,
        session: Session,
        token: Uuid,
        index: usize,
    ) -> Result<DraftUpdate, Error> {
        self.mutate_draft(&session, token, |draft| {
            draft.editor.remove_point(index)?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, session))]
    async fn save_draft(&self, session: Session, token: Uuid) -> Result<Route, Error> {
        self.authorize_route_editing(&session)?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let draft = fetch_draft_for_update(&mut tx, &token).await?;
        let form = draft.to_form()?;

        let saved = match draft.route_id {
            None => self.backend.create::<Route>(&session, &form).await,
            Some(id) => self.backend.update::<Route>(&session, id, &form).await,
        };

        match saved {
            Ok(route) => {
                delete_draft(&mut tx, &token).await?;
                tx.commit().await?;

                Ok(route)
            }
            Err(err) => {
                // keep the draft so the save can be retried
                tracing::warn!(%token, %err, "saving route failed");
                tx.rollback().await?;

                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self, session))]
    async fn discard_draft(&self, session: Session, token: Uuid) -> Result<(), Error> {
        self.authorize_route_editing(&session)?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        delete_draft(&mut tx, &token).await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, session))]
    async fn draft_polyline(&self, session: Session, token: Uuid) -> Result<Value, Error> {
        let draft = self.find_draft(session, token).await?;

        draft.editor.polyline()
    }
}
