use log::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::logic::query::CatalogQueries;
use crate::logic::validate::{
    validate_category, validate_item, validate_item_instance, CategoryForm, Invalid, ItemForm,
    ItemInstanceForm, ValidationErrors,
};
use crate::model::{Category, Id, Item, ItemInstance};
use crate::store::traits::Store;

/// Outcome of submitting a create or update form
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T, F> {
    Saved(T),
    Rejected(Invalid<F>),
}

/// Creating a category whose name is already taken points at the existing
/// record instead of adding a second one.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryCreation {
    Created(Category),
    Existing(Category),
    Rejected(Invalid<CategoryForm>),
}

fn reject<T, F>(form: F, field: &str, message: impl Into<String>) -> Submission<T, F> {
    let mut errors = ValidationErrors::new();
    errors.push(field, message);
    Submission::Rejected(Invalid { form, errors })
}

/// Write side of the catalog. Validation always finishes before the store is touched.
pub struct CatalogMutations;

impl CatalogMutations {
    pub async fn create_category<S: Store>(
        store: &S,
        form: CategoryForm,
    ) -> CatalogResult<CategoryCreation> {
        let new_category = match validate_category(form) {
            Ok(new_category) => new_category,
            Err(invalid) => {
                warn!("Rejected category submission: {}", invalid.errors);
                return Ok(CategoryCreation::Rejected(invalid));
            }
        };

        if let Some(existing) =
            CatalogQueries::find_category_by_name(store, &new_category.name).await?
        {
            info!("Category '{}' already exists as {}", existing.name, existing.id);
            return Ok(CategoryCreation::Existing(existing));
        }

        let category = Category::new(new_category);
        store.upsert_category(category.clone()).await?;
        info!("Created category {} ({})", category.id, category.name);
        Ok(CategoryCreation::Created(category))
    }

    pub async fn update_category<S: Store>(
        store: &S,
        id: &Id,
        form: CategoryForm,
    ) -> CatalogResult<Submission<Category, CategoryForm>> {
        if store.get_category(id).await?.is_none() {
            return Err(CatalogError::not_found("Category", id));
        }

        let new_category = match validate_category(form) {
            Ok(new_category) => new_category,
            Err(invalid) => return Ok(Submission::Rejected(invalid)),
        };

        if let Some(other) = store.find_category_by_name(&new_category.name).await? {
            if &other.id != id {
                let form = CategoryForm {
                    name: new_category.name,
                    description: new_category.description.unwrap_or_default(),
                };
                return Ok(reject(form, "name", "Another category already uses this name"));
            }
        }

        let category = Category::new_with_id(id.clone(), new_category);
        store.upsert_category(category.clone()).await?;
        info!("Updated category {}", id);
        Ok(Submission::Saved(category))
    }

    pub async fn create_item<S: Store>(
        store: &S,
        form: ItemForm,
    ) -> CatalogResult<Submission<Item, ItemForm>> {
        Self::save_item(store, None, form).await
    }

    pub async fn update_item<S: Store>(
        store: &S,
        id: &Id,
        form: ItemForm,
    ) -> CatalogResult<Submission<Item, ItemForm>> {
        if store.get_item(id).await?.is_none() {
            return Err(CatalogError::not_found("Item", id));
        }
        Self::save_item(store, Some(id), form).await
    }

    async fn save_item<S: Store>(
        store: &S,
        id: Option<&Id>,
        form: ItemForm,
    ) -> CatalogResult<Submission<Item, ItemForm>> {
        let launch_date = form.launch_date.clone();
        let new_item = match validate_item(form) {
            Ok(new_item) => new_item,
            Err(invalid) => {
                warn!("Rejected item submission: {}", invalid.errors);
                return Ok(Submission::Rejected(invalid));
            }
        };

        let categories = store.list_categories().await?;
        let unknown: Vec<&Id> = new_item
            .category
            .iter()
            .filter(|id| !categories.iter().any(|c| &c.id == *id))
            .collect();
        if !unknown.is_empty() {
            let message = format!(
                "Unknown category: {}",
                unknown.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
            );
            let form = ItemForm {
                name: new_item.name,
                description: new_item.description,
                category: new_item.category,
                launch_date: launch_date.trim().to_string(),
            };
            return Ok(reject(form, "category", message));
        }

        let item = match id {
            Some(id) => Item::new_with_id(id.clone(), new_item),
            None => Item::new(new_item),
        };
        store.upsert_item(item.clone()).await?;
        info!("Saved item {} ({})", item.id, item.name);
        Ok(Submission::Saved(item))
    }

    pub async fn create_item_instance<S: Store>(
        store: &S,
        form: ItemInstanceForm,
    ) -> CatalogResult<Submission<ItemInstance, ItemInstanceForm>> {
        Self::save_item_instance(store, None, form).await
    }

    pub async fn update_item_instance<S: Store>(
        store: &S,
        id: &Id,
        form: ItemInstanceForm,
    ) -> CatalogResult<Submission<ItemInstance, ItemInstanceForm>> {
        if store.get_item_instance(id).await?.is_none() {
            return Err(CatalogError::not_found("ItemInstance", id));
        }
        Self::save_item_instance(store, Some(id), form).await
    }

    async fn save_item_instance<S: Store>(
        store: &S,
        id: Option<&Id>,
        form: ItemInstanceForm,
    ) -> CatalogResult<Submission<ItemInstance, ItemInstanceForm>> {
        let sanitized_form = ItemInstanceForm {
            item: form.item.trim().to_string(),
            condition: form.condition.trim().to_string(),
            price: form.price.trim().to_string(),
        };
        let new_instance = match validate_item_instance(form) {
            Ok(new_instance) => new_instance,
            Err(invalid) => {
                warn!("Rejected item instance submission: {}", invalid.errors);
                return Ok(Submission::Rejected(invalid));
            }
        };

        if store.get_item(&new_instance.item).await?.is_none() {
            let message = format!("Unknown item: {}", new_instance.item);
            return Ok(reject(sanitized_form, "item", message));
        }

        let instance = match id {
            Some(id) => ItemInstance::new_with_id(id.clone(), new_instance),
            None => ItemInstance::new(new_instance),
        };
        store.upsert_item_instance(instance.clone()).await?;
        info!("Saved item instance {} of item {}", instance.id, instance.item);
        Ok(Submission::Saved(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::test_support::*;
    use crate::model::Condition;
    use crate::store::traits::{CategoryStore, ItemInstanceStore, ItemStore};
    use crate::store::MemoryStore;

    fn category_form(name: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_blank_category_name_persists_nothing() {
        let store = MemoryStore::new();

        for name in ["", "   ", "\t\n"] {
            let outcome = CatalogMutations::create_category(&store, category_form(name))
                .await
                .unwrap();
            match outcome {
                CategoryCreation::Rejected(invalid) => assert!(invalid.errors.has_field("name")),
                other => panic!("expected rejection, got {:?}", other),
            }
        }
        assert_eq!(store.count_categories().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_returns_existing() {
        let store = MemoryStore::new();
        let created = match CatalogMutations::create_category(&store, category_form("CPUs"))
            .await
            .unwrap()
        {
            CategoryCreation::Created(category) => category,
            other => panic!("expected creation, got {:?}", other),
        };

        let again = CatalogMutations::create_category(&store, category_form("  CPUs "))
            .await
            .unwrap();
        assert_eq!(again, CategoryCreation::Existing(created));
        assert_eq!(store.count_categories().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_category_update_keeps_id_and_rejects_taken_name() {
        let store = MemoryStore::new();
        let cpus = put_category(&store, "CPUs").await;
        put_category(&store, "GPUs").await;

        let outcome = CatalogMutations::update_category(&store, &cpus.id, category_form("GPUs"))
            .await
            .unwrap();
        assert!(matches!(outcome, Submission::Rejected(ref invalid) if invalid.errors.has_field("name")));

        let outcome =
            CatalogMutations::update_category(&store, &cpus.id, category_form("Processors"))
                .await
                .unwrap();
        let Submission::Saved(updated) = outcome else {
            panic!("expected update to be saved");
        };
        assert_eq!(updated.id, cpus.id);
        assert_eq!(store.get_category(&cpus.id).await.unwrap().unwrap().name, "Processors");

        let missing = CatalogMutations::update_category(
            &store,
            &"missing".to_string(),
            category_form("Anything"),
        )
        .await;
        assert!(matches!(missing, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_item_round_trip_through_detail() {
        let store = MemoryStore::new();
        let cooling = put_category(&store, "Cooling").await;

        let outcome = CatalogMutations::create_item(
            &store,
            ItemForm {
                name: "Fan".to_string(),
                description: "120mm case fan".to_string(),
                category: vec![cooling.id.clone()],
                launch_date: "2023-01-01".to_string(),
            },
        )
        .await
        .unwrap();
        let Submission::Saved(item) = outcome else {
            panic!("expected item to be saved");
        };

        let detail = CatalogQueries::item_detail(&store, &item.id).await.unwrap();
        assert_eq!(detail.item.item.name, "Fan");
        assert_eq!(detail.item.item.description, "120mm case fan");
        assert_eq!(detail.item.categories, vec![cooling]);
        assert_eq!(detail.item.item.launch_date_formatted(), "Jan 1, 2023");
        assert!(detail.instances.is_empty());
    }

    #[tokio::test]
    async fn test_item_with_unknown_category_is_rejected() {
        let store = MemoryStore::new();
        let cooling = put_category(&store, "Cooling").await;

        let outcome = CatalogMutations::create_item(
            &store,
            ItemForm {
                name: "Fan".to_string(),
                description: "120mm case fan".to_string(),
                category: vec![cooling.id.clone(), "ghost".to_string()],
                launch_date: String::new(),
            },
        )
        .await
        .unwrap();

        let Submission::Rejected(invalid) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(
            invalid.errors.for_field("category").collect::<Vec<_>>(),
            vec!["Unknown category: ghost"]
        );
        assert_eq!(store.count_items().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_item_update_preserves_id() {
        let store = MemoryStore::new();
        let cooling = put_category(&store, "Cooling").await;
        let fan = put_item(&store, "Fan", &[&cooling.id]).await;

        let outcome = CatalogMutations::update_item(
            &store,
            &fan.id,
            ItemForm {
                name: "Quiet fan".to_string(),
                description: "140mm case fan".to_string(),
                category: vec![cooling.id.clone()],
                launch_date: "2024-06-30".to_string(),
            },
        )
        .await
        .unwrap();

        let Submission::Saved(updated) = outcome else {
            panic!("expected update to be saved");
        };
        assert_eq!(updated.id, fan.id);
        assert_eq!(store.count_items().await.unwrap(), 1);
        assert_eq!(store.get_item(&fan.id).await.unwrap().unwrap().name, "Quiet fan");
    }

    #[tokio::test]
    async fn test_item_instance_requires_existing_item() {
        let store = MemoryStore::new();
        let outcome = CatalogMutations::create_item_instance(
            &store,
            ItemInstanceForm {
                item: "ghost".to_string(),
                condition: "New".to_string(),
                price: "10".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(matches!(outcome, Submission::Rejected(ref invalid) if invalid.errors.has_field("item")));
        assert!(store.list_item_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_instance_create_and_update() {
        let store = MemoryStore::new();
        let cooling = put_category(&store, "Cooling").await;
        let fan = put_item(&store, "Fan", &[&cooling.id]).await;

        let Submission::Saved(unit) = CatalogMutations::create_item_instance(
            &store,
            ItemInstanceForm {
                item: fan.id.clone(),
                condition: String::new(),
                price: "12.50".to_string(),
            },
        )
        .await
        .unwrap() else {
            panic!("expected instance to be saved");
        };
        assert_eq!(unit.condition, Condition::New);

        let Submission::Saved(updated) = CatalogMutations::update_item_instance(
            &store,
            &unit.id,
            ItemInstanceForm {
                item: fan.id.clone(),
                condition: "Out of stock".to_string(),
                price: "12.50".to_string(),
            },
        )
        .await
        .unwrap() else {
            panic!("expected instance update to be saved");
        };
        assert_eq!(updated.id, unit.id);
        assert_eq!(
            store.get_item_instance(&unit.id).await.unwrap().unwrap().condition,
            Condition::OutOfStock
        );
    }
}
