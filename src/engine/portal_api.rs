use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{Booking, DashboardCounts, PortalAPI, ProgramDetail, ScheduleFormOptions},
    auth::{Collection, Session},
    entities::{
        Account, Checkout, Feedback, FeedbackSummary, Guide, Payment, PaymentToken,
        PaymentTokenRequest, Price, Program, Registration, RegistrationForm, Route, Schedule,
    },
    error::Error,
    external::backend::Credentials,
};

/// What the client does once a registration is stored, given the price of
/// the booked schedule.
pub fn checkout_for(registration_id: i64, price: Option<&Price>) -> Option<Checkout> {
    match price {
        None => Some(Checkout::Settled {
            reference: format!("NOPRICE-{}", registration_id),
        }),
        Some(price) if price.is_free() => Some(Checkout::Settled {
            reference: format!("FREE-{}", registration_id),
        }),
        Some(_) => None,
    }
}

impl Engine {
    async fn schedule_price(&self, session: &Session, schedule: &Schedule) -> Result<Option<Price>, Error> {
        if let Some(price) = &schedule.price {
            return Ok(Some(price.clone()));
        }

        match schedule.price_id {
            Some(id) => Ok(Some(self.backend.show::<Price>(session, id).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PortalAPI for Engine {
    #[tracing::instrument(skip_all)]
    async fn login(&self, credentials: Credentials) -> Result<Session, Error> {
        let data = self.backend.login(&credentials).await?;

        tracing::info!(user_id = data.user.id, role = %data.user.role, "signed in");

        Session::from_login(data.token, data.user)
    }

    #[tracing::instrument(skip_all)]
    async fn logout(&self, mut session: Session) -> Result<Session, Error> {
        self.backend.logout(&session).await?;
        session.clear();

        Ok(session)
    }

    #[tracing::instrument(skip(self, session))]
    async fn program_detail(
        &self,
        session: Session,
        program_id: i64,
    ) -> Result<ProgramDetail, Error> {
        self.authorize(session.actor(), "read", Collection::of::<Program>())?;

        let (program, routes, schedules) = futures::try_join!(
            self.backend.show::<Program>(&session, program_id),
            self.backend.list::<Route>(&session),
            self.backend.list::<Schedule>(&session),
        )?;

        // one route per program is assumed; the first match wins
        let route = routes.into_iter().find(|r| r.program_id == program_id);
        let polyline = match &route {
            Some(route) => Some(crate::editor::polyline(&route.coordinates)?),
            None => None,
        };

        let schedules: Vec<Schedule> = schedules
            .into_iter()
            .filter(|s| s.program_id == program_id)
            .collect();
        let has_open_schedule = schedules.iter().any(Schedule::is_open);

        Ok(ProgramDetail {
            program,
            route,
            polyline,
            schedules,
            has_open_schedule,
        })
    }

    #[tracing::instrument(skip_all)]
    async fn schedule_form_options(&self, session: Session) -> Result<ScheduleFormOptions, Error> {
        self.authorize(session.actor(), "create", Collection::of::<Schedule>())?;

        let (programs, guides, prices) = futures::try_join!(
            self.backend.list::<Program>(&session),
            self.backend.list::<Guide>(&session),
            self.backend.list::<Price>(&session),
        )?;

        Ok(ScheduleFormOptions {
            programs,
            guides,
            prices,
        })
    }

    #[tracing::instrument(skip(self, session, form), fields(schedule_id = form.schedule_id))]
    async fn register(&self, session: Session, form: RegistrationForm) -> Result<Booking, Error> {
        self.authorize(session.actor(), "create", Collection::of::<Registration>())?;

        let schedule = self
            .backend
            .show::<Schedule>(&session, form.schedule_id)
            .await?;
        let price = self.schedule_price(&session, &schedule).await?;

        let registration = self
            .backend
            .create::<Registration>(&session, &form)
            .await?;

        if let Some(checkout) = checkout_for(registration.id, price.as_ref()) {
            return Ok(Booking {
                registration,
                checkout,
            });
        }

        let request = PaymentTokenRequest {
            registration_id: registration.id,
            amount: price.map(|p| p.price).unwrap_or_default(),
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
        };
        let token = self.backend.create_payment_token(&session, &request).await?;

        Ok(Booking {
            registration,
            checkout: Checkout::Gateway { token: token.token },
        })
    }

    #[tracing::instrument(skip(self, session))]
    async fn create_payment_token(
        &self,
        session: Session,
        request: PaymentTokenRequest,
    ) -> Result<PaymentToken, Error> {
        self.authorize(session.actor(), "create", Collection::named("payment_tokens"))?;

        self.backend.create_payment_token(&session, &request).await
    }

    #[tracing::instrument(skip(self, session))]
    async fn update_registration_status(
        &self,
        session: Session,
        id: i64,
        status: String,
    ) -> Result<Registration, Error> {
        self.authorize(session.actor(), "update", Collection::of::<Registration>())?;

        let registration = self.backend.show::<Registration>(&session, id).await?;
        registration.ensure_transition(&status)?;

        self.backend
            .patch_field::<Registration>(&session, id, "status", &status)
            .await
    }

    #[tracing::instrument(skip_all)]
    async fn feedback_summary(&self, session: Session) -> Result<FeedbackSummary, Error> {
        self.authorize(session.actor(), "read", Collection::of::<Feedback>())?;

        let feedbacks = self.backend.list::<Feedback>(&session).await?;

        Ok(FeedbackSummary::from_feedbacks(&feedbacks))
    }

    #[tracing::instrument(skip_all)]
    async fn dashboard_counts(&self, session: Session) -> Result<DashboardCounts, Error> {
        self.authorize(session.actor(), "read", Collection::named("dashboard"))?;

        let (users, guides, programs, registrations, payments, feedbacks, schedules) = futures::try_join!(
            self.backend.list::<Account>(&session),
            self.backend.list::<Guide>(&session),
            self.backend.list::<Program>(&session),
            self.backend.list::<Registration>(&session),
            self.backend.list::<Payment>(&session),
            self.backend.list::<Feedback>(&session),
            self.backend.list::<Schedule>(&session),
        )?;

        Ok(DashboardCounts {
            users: users.len(),
            guides: guides.len(),
            programs: programs.len(),
            registrations: registrations.len(),
            payments: payments.len(),
            feedbacks: feedbacks.len(),
            schedules: schedules.len(),
        })
    }
}
