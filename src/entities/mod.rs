mod account;
mod draft;
mod feedback;
mod guide;
mod payment;
mod price;
mod program;
mod registration;
mod route;
mod schedule;
pub mod wire;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
use crate::listing::Searchable;

pub use account::{Account, AccountForm};
pub use draft::{Draft, DraftDetails, DraftUpdate};
pub use feedback::{Feedback, FeedbackForm, FeedbackSummary};
pub use guide::{Guide, GuideForm};
pub use payment::{Checkout, Payment, PaymentForm, PaymentToken, PaymentTokenRequest};
pub use price::{Price, PriceForm};
pub use program::{Program, ProgramForm};
pub use registration::{Registration, RegistrationForm};
pub use route::{Coordinates, Route, RouteCoordinates, RouteForm, RoutePoint};
pub use schedule::{Schedule, ScheduleForm};

/// A backend collection reachable at `/api/{COLLECTION}`.
pub trait Resource:
    Clone + Debug + Serialize + DeserializeOwned + Searchable + Send + Sync + 'static
{
    const COLLECTION: &'static str;

    type Form: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn validate_form(_form: &Self::Form) -> Result<(), Error> {
        Ok(())
    }
}

/// Resources carrying an uploaded image.
pub trait Photographed: Resource {
    const PHOTO_FIELD: &'static str;
}

impl Resource for Program {
    const COLLECTION: &'static str = "programs";
    type Form = ProgramForm;
}

impl Resource for Price {
    const COLLECTION: &'static str = "prices";
    type Form = PriceForm;
}

impl Resource for Guide {
    const COLLECTION: &'static str = "guides";
    type Form = GuideForm;
}

impl Resource for Schedule {
    const COLLECTION: &'static str = "schedules";
    type Form = ScheduleForm;
}

impl Resource for Registration {
    const COLLECTION: &'static str = "registrations";
    type Form = RegistrationForm;
}

impl Resource for Payment {
    const COLLECTION: &'static str = "payments";
    type Form = PaymentForm;
}

impl Resource for Feedback {
    const COLLECTION: &'static str = "feedbacks";
    type Form = FeedbackForm;

    fn validate_form(form: &FeedbackForm) -> Result<(), Error> {
        form.validate()
    }
}

impl Resource for Account {
    const COLLECTION: &'static str = "users";
    type Form = AccountForm;

    fn validate_form(form: &AccountForm) -> Result<(), Error> {
        form.validate()
    }
}

impl Resource for Route {
    const COLLECTION: &'static str = "routes";
    type Form = RouteForm;
}

impl Photographed for Program {
    const PHOTO_FIELD: &'static str = "program_photo";
}

impl Photographed for Guide {
    const PHOTO_FIELD: &'static str = "photo";
}
