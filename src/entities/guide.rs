use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Guide {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub role: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub instagram: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub bio: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuideForm {
    pub name: String,
    pub phone: String,
    pub role: String,
    pub email: String,
    pub instagram: String,
    pub bio: String,
}

impl Searchable for Guide {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("phone", self.phone.clone()),
            ("role", self.role.clone()),
            ("email", self.email.clone()),
            ("instagram", self.instagram.clone()),
            ("bio", self.bio.clone()),
            ("photo", self.photo.clone().unwrap_or_default()),
        ]
    }
}
