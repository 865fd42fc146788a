use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Category, Condition, Id, Item, ItemInstance, PopulatedItem, PopulatedItemInstance,
};
use crate::store::traits::Store;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetail {
    pub category: Category,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    pub item: PopulatedItem,
    pub instances: Vec<ItemInstance>,
}

/// What the item create/update form needs to offer
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFormContext {
    pub categories: Vec<Category>,
    /// Present when editing an existing item
    pub item: Option<Item>,
}

/// What the item instance create/update form needs to offer
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInstanceFormContext {
    pub items: Vec<Item>,
    pub conditions: Vec<Condition>,
    pub instance: Option<ItemInstance>,
}

/// Read side of the catalog. Composite reads are issued concurrently and
/// fail as a whole when any part fails.
pub struct CatalogQueries;

impl CatalogQueries {
    pub async fn list_categories<S: Store>(store: &S) -> CatalogResult<Vec<Category>> {
        Ok(store.list_categories().await?)
    }

    pub async fn list_items<S: Store>(store: &S) -> CatalogResult<Vec<PopulatedItem>> {
        let (items, categories) = tokio::try_join!(store.list_items(), store.list_categories())?;
        Ok(items
            .into_iter()
            .map(|item| PopulatedItem::populate(item, &categories))
            .collect())
    }

    pub async fn list_item_instances<S: Store>(
        store: &S,
    ) -> CatalogResult<Vec<PopulatedItemInstance>> {
        let (instances, items) =
            tokio::try_join!(store.list_item_instances(), store.list_items())?;
        Ok(instances
            .into_iter()
            .map(|instance| {
                let item = items.iter().find(|i| i.id == instance.item).cloned();
                PopulatedItemInstance { instance, item }
            })
            .collect())
    }

    pub async fn category_detail<S: Store>(store: &S, id: &Id) -> CatalogResult<CategoryDetail> {
        let (category, items) =
            tokio::try_join!(store.get_category(id), store.find_items_by_category(id))?;
        let category = category.ok_or_else(|| CatalogError::not_found("Category", id))?;
        Ok(CategoryDetail { category, items })
    }

    pub async fn item_detail<S: Store>(store: &S, id: &Id) -> CatalogResult<ItemDetail> {
        let (item, instances, categories) = tokio::try_join!(
            store.get_item(id),
            store.find_item_instances_by_item(id),
            store.list_categories()
        )?;
        let item = item.ok_or_else(|| CatalogError::not_found("Item", id))?;
        Ok(ItemDetail {
            item: PopulatedItem::populate(item, &categories),
            instances,
        })
    }

    pub async fn item_instance_detail<S: Store>(
        store: &S,
        id: &Id,
    ) -> CatalogResult<PopulatedItemInstance> {
        let instance = store
            .get_item_instance(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("ItemInstance", id))?;
        let item = store.get_item(&instance.item).await?;
        Ok(PopulatedItemInstance { instance, item })
    }

    pub async fn find_category_by_name<S: Store>(
        store: &S,
        name: &str,
    ) -> CatalogResult<Option<Category>> {
        Ok(store.find_category_by_name(name).await?)
    }

    pub async fn get_category<S: Store>(store: &S, id: &Id) -> CatalogResult<Category> {
        store
            .get_category(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", id))
    }

    /// Form context for creating (`editing = None`) or updating an item
    pub async fn item_form<S: Store>(
        store: &S,
        editing: Option<&Id>,
    ) -> CatalogResult<ItemFormContext> {
        let categories = store.list_categories();
        let item = async {
            match editing {
                Some(id) => store.get_item(id).await,
                None => Ok(None),
            }
        };
        let (categories, item) = tokio::try_join!(categories, item)?;

        if let (Some(id), None) = (editing, &item) {
            return Err(CatalogError::not_found("Item", id));
        }
        Ok(ItemFormContext { categories, item })
    }

    /// Form context for creating (`editing = None`) or updating an item instance
    pub async fn item_instance_form<S: Store>(
        store: &S,
        editing: Option<&Id>,
    ) -> CatalogResult<ItemInstanceFormContext> {
        let items = store.list_items();
        let instance = async {
            match editing {
                Some(id) => store.get_item_instance(id).await,
                None => Ok(None),
            }
        };
        let (items, instance) = tokio::try_join!(items, instance)?;

        if let (Some(id), None) = (editing, &instance) {
            return Err(CatalogError::not_found("ItemInstance", id));
        }
        Ok(ItemInstanceFormContext {
            items,
            conditions: Condition::ALL.to_vec(),
            instance,
        })
    }
}
