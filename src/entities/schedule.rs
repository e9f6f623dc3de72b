use serde::{Deserialize, Serialize};

use crate::entities::{wire, Guide, Price, Program};
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(deserialize_with = "wire::integer")]
    pub program_id: i64,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub guide_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub price_id: Option<i64>,
    pub date: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub start_time: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub end_time: String,
    #[serde(deserialize_with = "wire::integer")]
    pub quota: i64,
    #[serde(default)]
    pub program: Option<Program>,
    #[serde(default)]
    pub guide: Option<Guide>,
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub program_id: i64,
    pub guide_id: i64,
    pub price_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub quota: i64,
}

impl Schedule {
    pub fn is_open(&self) -> bool {
        self.quota > 0
    }
}

impl Searchable for Schedule {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "program",
                self.program
                    .as_ref()
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
            ),
            (
                "guide",
                self.guide.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
            ),
            ("date", self.date.clone()),
            ("start_time", self.start_time.clone()),
            ("end_time", self.end_time.clone()),
            ("quota", self.quota.to_string()),
        ]
    }
}
