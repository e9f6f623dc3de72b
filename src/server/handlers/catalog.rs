use axum::{
    body::Bytes,
    extract::{Extension, Json, Path, Query},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::{Deserialize, Serialize};

use crate::api::{CatalogAPI, PhotoAPI};
use crate::auth::Session;
use crate::entities::{Photographed, Resource};
use crate::error::{invalid_input_error, Error};
use crate::external::backend::Photo;
use crate::listing::{ListQuery, Page};
use crate::server::{Api, DynAPI};

#[derive(Serialize, Deserialize)]
pub struct PhotoParams {
    file_name: Option<String>,
}

pub async fn list<T: Resource>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<T>>, Error>
where
    Api: CatalogAPI<T>,
{
    let page = CatalogAPI::<T>::list(&*api, session, query).await?;

    Ok(page.into())
}

pub async fn show<T: Resource>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<T>, Error>
where
    Api: CatalogAPI<T>,
{
    let item = CatalogAPI::<T>::show(&*api, session, id).await?;

    Ok(item.into())
}

pub async fn create<T: Resource>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Json(form): Json<T::Form>,
) -> Result<Json<T>, Error>
where
    Api: CatalogAPI<T>,
{
    let item = CatalogAPI::<T>::create(&*api, session, form).await?;

    Ok(item.into())
}

pub async fn update<T: Resource>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
    Json(form): Json<T::Form>,
) -> Result<Json<T>, Error>
where
    Api: CatalogAPI<T>,
{
    let item = CatalogAPI::<T>::update(&*api, session, id, form).await?;

    Ok(item.into())
}

pub async fn delete<T: Resource>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<(), Error>
where
    Api: CatalogAPI<T>,
{
    CatalogAPI::<T>::delete(&*api, session, id).await
}

/// Takes the raw image as the request body; the file name comes from the
/// query string.
pub async fn upload_photo<T: Photographed>(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
    Query(params): Query<PhotoParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<T>, Error>
where
    Api: PhotoAPI<T>,
{
    if body.is_empty() {
        return Err(invalid_input_error().with_message("photo is empty"));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let photo = Photo {
        file_name: params.file_name.unwrap_or_else(|| format!("{}-{}", T::COLLECTION, id)),
        content_type,
        bytes: body.to_vec(),
    };

    let item = PhotoAPI::<T>::upload_photo(&*api, session, id, photo).await?;

    Ok(item.into())
}
