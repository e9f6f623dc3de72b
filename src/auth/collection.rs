use oso::PolarClass;
use serde::{Deserialize, Serialize};

use crate::entities::Resource;

/// What an action is performed on: a backend collection by name.
#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Collection {
    #[polar(attribute)]
    pub name: String,
}

impl Collection {
    pub fn named(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn of<T: Resource>() -> Self {
        Self::named(T::COLLECTION)
    }
}
