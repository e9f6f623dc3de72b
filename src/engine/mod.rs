mod catalog_api;
mod draft_api;
mod helpers;
mod portal_api;

use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::{authorizor, Collection, User},
    error::{unauthorized_error, Error},
    external::backend,
};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
    backend: backend::Client,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, backend: backend::Client) -> Result<Self, Error> {
        // route editing sessions (KV store)
        pool.execute(
            "CREATE TABLE IF NOT EXISTS route_drafts (token UUID PRIMARY KEY, data JSONB NOT NULL, updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
        )
        .await?;

        helpers::prune_stale_drafts(&pool, chrono::Utc::now()).await?;

        Ok(Self {
            pool,
            authorizor: authorizor::new()?,
            backend,
        })
    }
}

impl Engine {
    pub fn authorize(&self, actor: User, action: &str, collection: Collection) -> Result<(), Error> {
        if self.authorizor.is_allowed(actor, action, collection)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}
