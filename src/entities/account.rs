use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::error::{invalid_input_error, Error};
use crate::listing::Searchable;

const MIN_PASSWORD_LEN: usize = 6;

/// A user record as the backend stores it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "wire::integer_or_zero")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub role: String,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

impl fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl AccountForm {
    pub fn validate(&self) -> Result<(), Error> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid_input_error().with_message("password must be at least 6 characters"));
        }

        Ok(())
    }
}

impl Searchable for Account {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("role", self.role.clone()),
        ]
    }
}
