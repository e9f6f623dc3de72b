use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::{Booking, DashboardCounts, ProgramDetail, ScheduleFormOptions};
use crate::auth::Session;
use crate::entities::{
    FeedbackSummary, PaymentToken, PaymentTokenRequest, Registration, RegistrationForm,
};
use crate::error::Error;
use crate::external::backend::Credentials;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct StatusParams {
    status: String,
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, Error> {
    let session = api.login(credentials).await?;

    Ok(session.into())
}

pub async fn logout(
    Extension(api): Extension<DynAPI>,
    session: Session,
) -> Result<Json<Session>, Error> {
    let session = api.logout(session).await?;

    Ok(session.into())
}

pub async fn program_detail(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<ProgramDetail>, Error> {
    let detail = api.program_detail(session, id).await?;

    Ok(detail.into())
}

pub async fn schedule_form_options(
    Extension(api): Extension<DynAPI>,
    session: Session,
) -> Result<Json<ScheduleFormOptions>, Error> {
    let options = api.schedule_form_options(session).await?;

    Ok(options.into())
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Json(form): Json<RegistrationForm>,
) -> Result<Json<Booking>, Error> {
    let booking = api.register(session, form).await?;

    Ok(booking.into())
}

pub async fn create_payment_token(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Json(request): Json<PaymentTokenRequest>,
) -> Result<Json<PaymentToken>, Error> {
    let token = api.create_payment_token(session, request).await?;

    Ok(token.into())
}

pub async fn update_registration_status(
    Extension(api): Extension<DynAPI>,
    session: Session,
    Path(id): Path<i64>,
    Json(params): Json<StatusParams>,
) -> Result<Json<Registration>, Error> {
    let registration = api
        .update_registration_status(session, id, params.status)
        .await?;

    Ok(registration.into())
}

pub async fn feedback_summary(
    Extension(api): Extension<DynAPI>,
    session: Session,
) -> Result<Json<FeedbackSummary>, Error> {
    let summary = api.feedback_summary(session).await?;

    Ok(summary.into())
}

pub async fn dashboard(
    Extension(api): Extension<DynAPI>,
    session: Session,
) -> Result<Json<DashboardCounts>, Error> {
    let counts = api.dashboard_counts(session).await?;

    Ok(counts.into())
}
