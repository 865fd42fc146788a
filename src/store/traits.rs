use crate::model::{Category, Condition, Id, Item, ItemInstance};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    async fn get_category(&self, id: &Id) -> Result<Option<Category>>;
    /// All categories ordered by name (ordinal, case-sensitive)
    async fn list_categories(&self) -> Result<Vec<Category>>;
    /// Exact-match lookup on the stored name
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn upsert_category(&self, category: Category) -> Result<()>;
    async fn delete_category(&self, id: &Id) -> Result<bool>;
    async fn count_categories(&self) -> Result<u64>;
}

#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    async fn get_item(&self, id: &Id) -> Result<Option<Item>>;
    /// All items ordered by name (ordinal, case-sensitive)
    async fn list_items(&self) -> Result<Vec<Item>>;
    /// Items whose category set contains `category_id`, ordered by name
    async fn find_items_by_category(&self, category_id: &Id) -> Result<Vec<Item>>;
    async fn upsert_item(&self, item: Item) -> Result<()>;
    async fn delete_item(&self, id: &Id) -> Result<bool>;
    async fn count_items(&self) -> Result<u64>;
}

#[async_trait::async_trait]
pub trait ItemInstanceStore: Send + Sync {
    async fn get_item_instance(&self, id: &Id) -> Result<Option<ItemInstance>>;
    async fn list_item_instances(&self) -> Result<Vec<ItemInstance>>;
    async fn find_item_instances_by_item(&self, item_id: &Id) -> Result<Vec<ItemInstance>>;
    async fn upsert_item_instance(&self, instance: ItemInstance) -> Result<()>;
    async fn delete_item_instance(&self, id: &Id) -> Result<bool>;
    /// Number of instances whose condition is one of `conditions`
    async fn count_item_instances_in(&self, conditions: &[Condition]) -> Result<u64>;
}

pub trait Store: CategoryStore + ItemStore + ItemInstanceStore + Send + Sync {}
