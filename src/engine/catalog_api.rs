use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{CatalogAPI, PhotoAPI},
    auth::{Collection, Session},
    entities::{Photographed, Resource},
    error::Error,
    external::backend::Photo,
    listing::{self, ListQuery, Page},
};

#[async_trait]
impl<T: Resource> CatalogAPI<T> for Engine {
    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    async fn list(&self, session: Session, query: ListQuery) -> Result<Page<T>, Error> {
        self.authorize(session.actor(), "read", Collection::of::<T>())?;

        let items = self.backend.list::<T>(&session).await?;

        Ok(listing::apply(items, &query))
    }

    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    async fn show(&self, session: Session, id: i64) -> Result<T, Error> {
        self.authorize(session.actor(), "read", Collection::of::<T>())?;

        self.backend.show::<T>(&session, id).await
    }

    #[tracing::instrument(skip(self, session, form), fields(collection = T::COLLECTION))]
    async fn create(&self, session: Session, form: T::Form) -> Result<T, Error> {
        self.authorize(session.actor(), "create", Collection::of::<T>())?;
        T::validate_form(&form)?;

        self.backend.create::<T>(&session, &form).await
    }

    #[tracing::instrument(skip(self, session, form), fields(collection = T::COLLECTION))]
    async fn update(&self, session: Session, id: i64, form: T::Form) -> Result<T, Error> {
        self.authorize(session.actor(), "update", Collection::of::<T>())?;
        T::validate_form(&form)?;

        self.backend.update::<T>(&session, id, &form).await
    }

    #[tracing::instrument(skip(self, session), fields(collection = T::COLLECTION))]
    async fn delete(&self, session: Session, id: i64) -> Result<(), Error> {
        self.authorize(session.actor(), "delete", Collection::of::<T>())?;

        self.backend.delete::<T>(&session, id).await
    }
}

#[async_trait]
impl<T: Photographed> PhotoAPI<T> for Engine {
    #[tracing::instrument(skip(self, session, photo), fields(collection = T::COLLECTION))]
    async fn upload_photo(&self, session: Session, id: i64, photo: Photo) -> Result<T, Error> {
        self.authorize(session.actor(), "update", Collection::of::<T>())?;

        self.backend
            .upload_photo::<T>(&session, id, T::PHOTO_FIELD, photo)
            .await
    }
}
