use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::error::{invalid_state_error, Error};
use crate::listing::Searchable;

/// Registrations in these states can no longer change status.
const FINAL_STATUSES: [&str; 2] = ["selesai", "batal"];

const PENDING: &str = "menunggu";

/// Status changes an admin may make, as `(from, to)`.
const TRANSITIONS: [(&str, &str); 3] = [
    ("menunggu", "dikonfirmasi"),
    ("menunggu", "batal"),
    ("dikonfirmasi", "selesai"),
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(deserialize_with = "wire::integer")]
    pub schedule_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub region: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub instagram: String,
    #[serde(
        rename = "jumlah_orang",
        default,
        deserialize_with = "wire::optional_integer"
    )]
    pub participants: Option<i64>,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub order_number: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub schedule_id: i64,
    pub name: String,
    pub region: String,
    pub phone: String,
    pub email: String,
    pub instagram: String,
    #[serde(rename = "jumlah_orang")]
    pub participants: i64,
}

impl Registration {
    /// New registrations come back without a status until an admin acts.
    pub fn status(&self) -> &str {
        match self.status.is_empty() {
            true => PENDING,
            false => &self.status,
        }
    }

    pub fn is_locked(&self) -> bool {
        FINAL_STATUSES.contains(&self.status())
    }

    pub fn ensure_status_change_allowed(&self) -> Result<(), Error> {
        if self.is_locked() {
            return Err(invalid_state_error().with_message("registration status is final"));
        }

        Ok(())
    }

    pub fn ensure_transition(&self, next: &str) -> Result<(), Error> {
        self.ensure_status_change_allowed()?;

        if TRANSITIONS.contains(&(self.status(), next)) {
            return Ok(());
        }

        Err(invalid_state_error().with_message(format!(
            "registration status cannot change from {} to {}",
            self.status(),
            next
        )))
    }
}

impl Searchable for Registration {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("order_number", self.order_number.clone()),
            ("region", self.region.clone()),
            ("status", self.status.clone()),
            ("instagram", self.instagram.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(status: &str) -> Registration {
        serde_json::from_value(json!({
            "id": 9,
            "schedule_id": 4,
            "name": "Sari",
            "jumlah_orang": "3",
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn decodes_participants() {
        assert_eq!(registration("pending").participants, Some(3));
    }

    #[test]
    fn final_statuses_lock() {
        assert!(registration("pending").ensure_status_change_allowed().is_ok());
        assert!(registration("selesai").ensure_status_change_allowed().is_err());
        assert!(registration("batal").is_locked());
    }

    #[test]
    fn allowed_transitions() {
        assert!(registration("menunggu").ensure_transition("dikonfirmasi").is_ok());
        assert!(registration("menunggu").ensure_transition("batal").is_ok());
        assert!(registration("dikonfirmasi").ensure_transition("selesai").is_ok());
        assert!(registration("").ensure_transition("dikonfirmasi").is_ok());
    }

    #[test]
    fn refused_transitions() {
        for (from, to) in [
            ("menunggu", "selesai"),
            ("menunggu", "menunggu"),
            ("dikonfirmasi", "foo"),
            ("dikonfirmasi", "batal"),
            ("dikonfirmasi", "menunggu"),
            ("selesai", "batal"),
            ("batal", "dikonfirmasi"),
        ] {
            let err = registration(from).ensure_transition(to).unwrap_err();
            assert_eq!(err.code, 100, "{from} -> {to}");
        }
    }
}
