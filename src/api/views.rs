//! JSON shapes of the catalog views. Every record carries its derived `url`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{
    Category, Condition, Id, Item, ItemInstance, PopulatedItem, PopulatedItemInstance,
};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            url: category.url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category_ids: Vec<Id>,
    pub launch_date: Option<NaiveDate>,
    pub launch_date_formatted: String,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            url: item.url(),
            category_ids: item.category.clone(),
            launch_date: item.launch_date,
            launch_date_formatted: item.launch_date_formatted(),
        }
    }
}

/// Item with its categories resolved
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedItemView {
    #[serde(flatten)]
    pub item: ItemView,
    pub category: Vec<CategoryView>,
}

impl From<&PopulatedItem> for PopulatedItemView {
    fn from(populated: &PopulatedItem) -> Self {
        Self {
            item: ItemView::from(&populated.item),
            category: populated.categories.iter().map(CategoryView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemInstanceView {
    pub id: Id,
    pub url: String,
    pub item_id: Id,
    pub condition: Condition,
    pub price: Decimal,
}

impl From<&ItemInstance> for ItemInstanceView {
    fn from(instance: &ItemInstance) -> Self {
        Self {
            id: instance.id.clone(),
            url: instance.url(),
            item_id: instance.item.clone(),
            condition: instance.condition,
            price: instance.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulatedItemInstanceView {
    #[serde(flatten)]
    pub instance: ItemInstanceView,
    pub item: Option<ItemView>,
}

impl From<&PopulatedItemInstance> for PopulatedItemInstanceView {
    fn from(populated: &PopulatedItemInstance) -> Self {
        Self {
            instance: ItemInstanceView::from(&populated.instance),
            item: populated.item.as_ref().map(ItemView::from),
        }
    }
}

pub fn category_views(categories: &[Category]) -> Vec<CategoryView> {
    categories.iter().map(CategoryView::from).collect()
}

pub fn item_views(items: &[Item]) -> Vec<ItemView> {
    items.iter().map(ItemView::from).collect()
}

pub fn item_instance_views(instances: &[ItemInstance]) -> Vec<ItemInstanceView> {
    instances.iter().map(ItemInstanceView::from).collect()
}
