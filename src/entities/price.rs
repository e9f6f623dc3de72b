use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Price {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(deserialize_with = "wire::integer")]
    pub program_id: i64,
    #[serde(deserialize_with = "wire::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceForm {
    pub program_id: i64,
    pub price: f64,
    pub description: String,
}

impl Price {
    /// Registrations against a free schedule skip the payment gateway.
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }
}

impl Searchable for Price {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("program_id", self.program_id.to_string()),
            ("price", self.price.to_string()),
            ("description", self.description.clone()),
        ]
    }
}
