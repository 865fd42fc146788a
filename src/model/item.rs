use crate::model::{generate_id, record_url, Category, Id};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub name: String,
    pub description: String,
    /// Ids of the categories this item is listed under (never empty once validated)
    pub category: Vec<Id>,
    pub launch_date: Option<NaiveDate>,
}

impl Item {
    pub fn new(new_item: NewItem) -> Self {
        Self::new_with_id(generate_id(), new_item)
    }

    pub fn new_with_id(id: Id, new_item: NewItem) -> Self {
        Self {
            id,
            name: new_item.name,
            description: new_item.description,
            category: new_item.category,
            launch_date: new_item.launch_date,
        }
    }

    pub fn url(&self) -> String {
        record_url("item", &self.id)
    }

    /// Medium-length date such as `Jan 1, 2023`; empty when no launch date is known.
    pub fn launch_date_formatted(&self) -> String {
        self.launch_date
            .map(|date| date.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }

    pub fn is_in_category(&self, category_id: &Id) -> bool {
        self.category.iter().any(|id| id == category_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub category: Vec<Id>,
    pub launch_date: Option<NaiveDate>,
}

/// An item with its category references replaced by the category records.
/// References that no longer resolve are left out.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedItem {
    pub item: Item,
    pub categories: Vec<Category>,
}

impl PopulatedItem {
    pub fn populate(item: Item, all_categories: &[Category]) -> Self {
        let categories = item
            .category
            .iter()
            .filter_map(|id| all_categories.iter().find(|c| &c.id == id).cloned())
            .collect();
        Self { item, categories }
    }
}
