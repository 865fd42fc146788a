use crate::model::{generate_id, record_url, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(new_category: NewCategory) -> Self {
        Self::new_with_id(generate_id(), new_category)
    }

    pub fn new_with_id(id: Id, new_category: NewCategory) -> Self {
        Self {
            id,
            name: new_category.name,
            description: new_category.description,
        }
    }

    pub fn url(&self) -> String {
        record_url("category", &self.id)
    }
}

/// Validated category fields, ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}
