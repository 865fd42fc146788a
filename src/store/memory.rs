use anyhow::Result;
use itertools::Itertools;
use parking_lot::RwLock;

use crate::model::{Category, Condition, Id, Item, ItemInstance};
use crate::store::traits::{CategoryStore, ItemInstanceStore, ItemStore, Store};

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    items: Vec<Item>,
    item_instances: Vec<ItemInstance>,
}

/// Process-local store. Records keep insertion order; lists are sorted on read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert_by_id<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> &Id) {
    match records.iter().position(|r| id_of(r) == id_of(&record)) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}

fn remove_by_id<T>(records: &mut Vec<T>, id: &Id, id_of: impl Fn(&T) -> &Id) -> bool {
    let before = records.len();
    records.retain(|r| id_of(r) != id);
    records.len() != before
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn get_category(&self, id: &Id) -> Result<Option<Category>> {
        let tables = self.tables.read();
        Ok(tables.categories.iter().find(|c| &c.id == id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let tables = self.tables.read();
        Ok(tables
            .categories
            .iter()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .cloned()
            .collect())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let tables = self.tables.read();
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn upsert_category(&self, category: Category) -> Result<()> {
        let mut tables = self.tables.write();
        upsert_by_id(&mut tables.categories, category, |c| &c.id);
        Ok(())
    }

    async fn delete_category(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write();
        Ok(remove_by_id(&mut tables.categories, id, |c| &c.id))
    }

    async fn count_categories(&self) -> Result<u64> {
        Ok(self.tables.read().categories.len() as u64)
    }
}

#[async_trait::async_trait]
impl ItemStore for MemoryStore {
    async fn get_item(&self, id: &Id) -> Result<Option<Item>> {
        let tables = self.tables.read();
        Ok(tables.items.iter().find(|i| &i.id == id).cloned())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let tables = self.tables.read();
        Ok(tables
            .items
            .iter()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .cloned()
            .collect())
    }

    async fn find_items_by_category(&self, category_id: &Id) -> Result<Vec<Item>> {
        let tables = self.tables.read();
        Ok(tables
            .items
            .iter()
            .filter(|i| i.is_in_category(category_id))
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .cloned()
            .collect())
    }

    async fn upsert_item(&self, item: Item) -> Result<()> {
        let mut tables = self.tables.write();
        upsert_by_id(&mut tables.items, item, |i| &i.id);
        Ok(())
    }

    async fn delete_item(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write();
        Ok(remove_by_id(&mut tables.items, id, |i| &i.id))
    }

    async fn count_items(&self) -> Result<u64> {
        Ok(self.tables.read().items.len() as u64)
    }
}

#[async_trait::async_trait]
impl ItemInstanceStore for MemoryStore {
    async fn get_item_instance(&self, id: &Id) -> Result<Option<ItemInstance>> {
        let tables = self.tables.read();
        Ok(tables.item_instances.iter().find(|i| &i.id == id).cloned())
    }

    async fn list_item_instances(&self) -> Result<Vec<ItemInstance>> {
        Ok(self.tables.read().item_instances.clone())
    }

    async fn find_item_instances_by_item(&self, item_id: &Id) -> Result<Vec<ItemInstance>> {
        let tables = self.tables.read();
        Ok(tables
            .item_instances
            .iter()
            .filter(|i| &i.item == item_id)
            .cloned()
            .collect())
    }

    async fn upsert_item_instance(&self, instance: ItemInstance) -> Result<()> {
        let mut tables = self.tables.write();
        upsert_by_id(&mut tables.item_instances, instance, |i| &i.id);
        Ok(())
    }

    async fn delete_item_instance(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write();
        Ok(remove_by_id(&mut tables.item_instances, id, |i| &i.id))
    }

    async fn count_item_instances_in(&self, conditions: &[Condition]) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables
            .item_instances
            .iter()
            .filter(|i| conditions.contains(&i.condition))
            .count() as u64)
    }
}

impl Store for MemoryStore {}
