mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post, put},
    Router,
};

use crate::api::{CatalogAPI, API};
use crate::entities::{
    Account, Feedback, Guide, Payment, Price, Program, Registration, Resource, Route, Schedule,
};
use crate::error::{server_error, Error};
use crate::server::handlers::{catalog, drafts, portal};

pub use crate::api::DynAPI;

pub(crate) type Api = dyn API + Send + Sync;

/// Full CRUD on `/{collection}` and `/{collection}/:id`.
fn resource<T: Resource>(router: Router) -> Router
where
    Api: CatalogAPI<T>,
{
    let collection = format!("/{}", T::COLLECTION);
    let member = format!("/{}/:id", T::COLLECTION);

    router
        .route(&collection, get(catalog::list::<T>).post(catalog::create::<T>))
        .route(
            &member,
            get(catalog::show::<T>)
                .put(catalog::update::<T>)
                .delete(catalog::delete::<T>),
        )
}

pub fn router(api: DynAPI) -> Router {
    let app = Router::new()
        .route("/login", post(portal::login))
        .route("/logout", post(portal::logout));

    let app = resource::<Program>(app);
    let app = resource::<Price>(app);
    let app = resource::<Guide>(app);
    let app = resource::<Schedule>(app);
    let app = resource::<Registration>(app);

    app.route("/dashboard", get(portal::dashboard))
        .route("/programs/:id/detail", get(portal::program_detail))
        .route("/programs/:id/photo", put(catalog::upload_photo::<Program>))
        .route("/guides/:id/photo", put(catalog::upload_photo::<Guide>))
        .route("/schedule-options", get(portal::schedule_form_options))
        .route("/bookings", post(portal::register))
        .route(
            "/registrations/:id/status",
            patch(portal::update_registration_status),
        )
        .route("/payment-tokens", post(portal::create_payment_token))
        .route("/payments", get(catalog::list::<Payment>))
        .route("/payments/:id", get(catalog::show::<Payment>))
        .route(
            "/feedbacks",
            get(catalog::list::<Feedback>).post(catalog::create::<Feedback>),
        )
        .route(
            "/feedbacks/:id",
            get(catalog::show::<Feedback>).delete(catalog::delete::<Feedback>),
        )
        .route("/feedback-summary", get(portal::feedback_summary))
        .route(
            "/users",
            get(catalog::list::<Account>).post(catalog::create::<Account>),
        )
        .route(
            "/users/:id",
            get(catalog::show::<Account>).delete(catalog::delete::<Account>),
        )
        .route("/routes", get(catalog::list::<Route>))
        .route(
            "/routes/:id",
            get(catalog::show::<Route>).delete(catalog::delete::<Route>),
        )
        .route("/routes/:id/drafts", post(drafts::create_for_route))
        .route("/drafts", post(drafts::create))
        .route(
            "/drafts/:token",
            get(drafts::find)
                .patch(drafts::update_details)
                .delete(drafts::discard),
        )
        .route("/drafts/:token/pick", patch(drafts::begin_pick))
        .route("/drafts/:token/click", patch(drafts::click))
        .route("/drafts/:token/cancel", patch(drafts::cancel_pick))
        .route(
            "/drafts/:token/points/:index",
            patch(drafts::relabel_point).delete(drafts::remove_point),
        )
        .route("/drafts/:token/save", post(drafts::save))
        .route("/drafts/:token/polyline", get(drafts::polyline))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(server_error)?
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}
