use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub payment_type: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub duration: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub program_type: String,
    #[serde(default)]
    pub program_photo: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramForm {
    pub name: String,
    pub description: String,
    pub payment_type: String,
    pub duration: String,
    pub status: String,
    pub program_type: String,
}

impl Searchable for Program {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("payment_type", self.payment_type.clone()),
            ("duration", self.duration.clone()),
            ("status", self.status.clone()),
            ("program_type", self.program_type.clone()),
        ]
    }
}
