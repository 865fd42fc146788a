pub mod counts;
pub mod integrity;
pub mod mutate;
pub mod query;
pub mod validate;

pub use counts::*;
pub use integrity::*;
pub use mutate::*;
pub use query::*;
pub use validate::*;

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::model::{
        Category, Condition, Id, Item, ItemInstance, NewCategory, NewItem, NewItemInstance,
    };
    use crate::store::traits::{CategoryStore, ItemInstanceStore, ItemStore};
    use crate::store::MemoryStore;

    pub async fn put_category(store: &MemoryStore, name: &str) -> Category {
        let category = Category::new(NewCategory {
            name: name.to_string(),
            description: None,
        });
        store.upsert_category(category.clone()).await.unwrap();
        category
    }

    pub async fn put_item(store: &MemoryStore, name: &str, categories: &[&Id]) -> Item {
        let item = Item::new(NewItem {
            name: name.to_string(),
            description: format!("{} description", name),
            category: categories.iter().map(|id| (*id).clone()).collect(),
            launch_date: None,
        });
        store.upsert_item(item.clone()).await.unwrap();
        item
    }

    pub async fn put_instance(
        store: &MemoryStore,
        item_id: &Id,
        condition: Condition,
        price: &str,
    ) -> ItemInstance {
        let instance = ItemInstance::new(NewItemInstance {
            item: item_id.clone(),
            condition,
            price: Decimal::from_str(price).unwrap(),
        });
        store.upsert_item_instance(instance.clone()).await.unwrap();
        instance
    }
}
