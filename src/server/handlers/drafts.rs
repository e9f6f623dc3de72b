use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::Session;
use crate::editor::PointRole;
use crate::entities::{Coordinates, Draft, DraftDetails, DraftUpdate, Route};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct PickParams {
    role: PointRole,
}

#[derive(Serialize, Deserialize)]
pub struct RelabelParams {
    label: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Json(details): Json<DraftDetails>,
) -> Result<Json<Draft>, Error> {
    let draft = api.open_draft(session, details).await?;

    Ok(draft.into())
}

pub async fn create_for_route(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(route_id): Path<i64>,
) -> Result<Json<Draft>, Error> {
    let draft = api.open_route_draft(session, route_id).await?;

    Ok(draft.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
) -> Result<Json<Draft>, Error> {
    let draft = api.find_draft(session, token).await?;

    Ok(draft.into())
}

pub async fn update_details(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
    Json(details): Json<DraftDetails>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api.update_draft_details(session, token, details).await?;

    Ok(update.into())
}

pub async fn begin_pick(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
    Json(params): Json<PickParams>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api.begin_pick(session, token, params.role).await?;

    Ok(update.into())
}

pub async fn click(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
    Json(coordinates): Json<Coordinates>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api.click(session, token, coordinates).await?;

    Ok(update.into())
}

pub async fn cancel_pick(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api.cancel_pick(session, token).await?;

    Ok(update.into())
}

pub async fn relabel_point(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path((token, index)): Path<(Uuid, usize)>,
    Json(params): Json<RelabelParams>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api
        .relabel_point(session, token, index, params.label)
        .await?;

    Ok(update.into())
}

pub async fn remove_point(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path((token, index)): Path<(Uuid, usize)>,
) -> Result<Json<DraftUpdate>, Error> {
    let update = api.remove_point(session, token, index).await?;

    Ok(update.into())
}

pub async fn save(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
) -> Result<Json<Route>, Error> {
    let route = api.save_draft(session, token).await?;

    Ok(route.into())
}

pub async fn discard(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
) -> Result<(), Error> {
    api.discard_draft(session, token).await
}

pub async fn polyline(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(token): Path<Uuid>,
) -> Result<Json<Value>, Error> {
    let polyline = api.draft_polyline(session, token).await?;

    Ok(polyline.into())
}
