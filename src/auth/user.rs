use oso::PolarClass;
use serde::{Deserialize, Serialize};

use crate::entities::Account;

/// The actor handed to the authorizor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub role: String,
    pub signed_in: bool,
}

impl User {
    pub fn guest() -> Self {
        Self {
            id: 0,
            role: "guest".into(),
            signed_in: false,
        }
    }

    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            role: account.role.clone(),
            signed_in: true,
        }
    }

    fn has_role(&self, role: String) -> bool {
        self.role == role
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id)
            .add_attribute_getter("role", |recv: &User| recv.role.clone())
            .add_attribute_getter("signed_in", |recv: &User| recv.signed_in)
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}
