use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::Session;
use crate::editor::PointRole;
use crate::entities::{
    Account, Checkout, Coordinates, Draft, DraftDetails, DraftUpdate, Feedback, FeedbackSummary,
    Guide, Payment, PaymentToken, PaymentTokenRequest, Photographed, Price, Program,
    Registration, RegistrationForm, Resource, Route, Schedule,
};
use crate::error::Error;
use crate::external::backend::{Credentials, Photo};
use crate::listing::{ListQuery, Page};

#[async_trait]
pub trait CatalogAPI<T: Resource> {
    async fn list(&self, session: Session, query: ListQuery) -> Result<Page<T>, Error>;
    async fn show(&self, session: Session, id: i64) -> Result<T, Error>;
    async fn create(&self, session: Session, form: T::Form) -> Result<T, Error>;
    async fn update(&self, session: Session, id: i64, form: T::Form) -> Result<T, Error>;
    async fn delete(&self, session: Session, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait PhotoAPI<T: Photographed> {
    async fn upload_photo(&self, session: Session, id: i64, photo: Photo) -> Result<T, Error>;
}

#[async_trait]
pub trait DraftAPI {
    async fn open_draft(&self, session: Session, details: DraftDetails) -> Result<Draft, Error>;
    async fn open_route_draft(&self, session: Session, route_id: i64) -> Result<Draft, Error>;
    async fn find_draft(&self, session: Session, token: Uuid) -> Result<Draft, Error>;
    async fn update_draft_details(
        &self,
        session: Session,
        token: Uuid,
        details: DraftDetails,
    ) -> Result<DraftUpdate, Error>;
    async fn begin_pick(
        &self,
        session: Session,
        token: Uuid,
        role: PointRole,
    ) -> Result<DraftUpdate, Error>;
    async fn click(
        &self,
        session: Session,
        token: Uuid,
        coordinates: Coordinates,
    ) -> Result<DraftUpdate, Error>;
    async fn cancel_pick(&self, session: Session, token: Uuid) -> Result<DraftUpdate, Error>;
    async fn relabel_point(
        &self,
        session: Session,
        token: Uuid,
        index: usize,
        label: String,
    ) -> Result<DraftUpdate, Error>;
    async fn remove_point(
        &self,
        session: Session,
        token: Uuid,
        index: usize,
    ) -> Result<DraftUpdate, Error>;
    async fn save_draft(&self, session: Session, token: Uuid) -> Result<Route, Error>;
    async fn discard_draft(&self, session: Session, token: Uuid) -> Result<(), Error>;
    async fn draft_polyline(&self, session: Session, token: Uuid) -> Result<Value, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramDetail {
    pub program: Program,
    pub route: Option<Route>,
    pub polyline: Option<Value>,
    pub schedules: Vec<Schedule>,
    pub has_open_schedule: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleFormOptions {
    pub programs: Vec<Program>,
    pub guides: Vec<Guide>,
    pub prices: Vec<Price>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub registration: Registration,
    pub checkout: Checkout,
}

/// Record counts per collection for the admin landing page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub users: usize,
    pub guides: usize,
    pub programs: usize,
    pub registrations: usize,
    pub payments: usize,
    pub feedbacks: usize,
    pub schedules: usize,
}

#[async_trait]
pub trait PortalAPI {
    async fn login(&self, credentials: Credentials) -> Result<Session, Error>;
    async fn logout(&self, session: Session) -> Result<Session, Error>;
    async fn program_detail(&self, session: Session, program_id: i64)
        -> Result<ProgramDetail, Error>;
    async fn schedule_form_options(&self, session: Session) -> Result<ScheduleFormOptions, Error>;
    async fn register(&self, session: Session, form: RegistrationForm) -> Result<Booking, Error>;
    async fn create_payment_token(
        &self,
        session: Session,
        request: PaymentTokenRequest,
    ) -> Result<PaymentToken, Error>;
    async fn update_registration_status(
        &self,
        session: Session,
        id: i64,
        status: String,
    ) -> Result<Registration, Error>;
    async fn feedback_summary(&self, session: Session) -> Result<FeedbackSummary, Error>;
    async fn dashboard_counts(&self, session: Session) -> Result<DashboardCounts, Error>;
}

pub trait API:
    DraftAPI
    + PortalAPI
    + CatalogAPI<Program>
    + CatalogAPI<Price>
    + CatalogAPI<Guide>
    + CatalogAPI<Schedule>
    + CatalogAPI<Registration>
    + CatalogAPI<Payment>
    + CatalogAPI<Feedback>
    + CatalogAPI<Account>
    + CatalogAPI<Route>
    + PhotoAPI<Program>
    + PhotoAPI<Guide>
{
}

pub type DynAPI = Arc<dyn API + Send + Sync>;
