use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub registration_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::optional_number")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Payment {
    pub fn amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }
}

/// Payments are written by the gateway callback, never through the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentForm {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentTokenRequest {
    pub registration_id: i64,
    pub amount: f64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentToken {
    pub token: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// What the client should do after a registration is stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Checkout {
    Gateway { token: String },
    Settled { reference: String },
}

impl Searchable for Payment {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "registration_id",
                self.registration_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
            ("amount", self.amount().to_string()),
            (
                "payment_method",
                self.payment_method.clone().unwrap_or_default(),
            ),
            (
                "transaction_id",
                self.transaction_id.clone().unwrap_or_default(),
            ),
            ("status", self.status().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default() {
        let payment: Payment = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(payment.amount(), 0.0);
        assert_eq!(payment.status(), "pending");
    }
}
