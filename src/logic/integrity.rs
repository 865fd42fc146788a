use log::info;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Category, Id, Item, ItemInstance};
use crate::store::traits::Store;

/// Result of a guarded delete. A blocked delete is not a failure: the caller
/// is shown the dependents that have to go first.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<P, D> {
    Deleted(P),
    Blocked { record: P, dependents: Vec<D> },
}

impl<P, D> DeleteOutcome<P, D> {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted(_))
    }
}

/// Dependents that currently block deleting a record, read together with the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCheck<P, D> {
    pub record: P,
    pub dependents: Vec<D>,
}

/// Delete-time referential integrity for the Category <- Item <- ItemInstance tree.
///
/// The dependency check and the delete are two separate store calls, so a
/// dependent written in between is not seen.
pub struct IntegrityGuard;

impl IntegrityGuard {
    pub async fn check_category<S: Store>(
        store: &S,
        id: &Id,
    ) -> CatalogResult<DeleteCheck<Category, Item>> {
        let (category, items) =
            tokio::try_join!(store.get_category(id), store.find_items_by_category(id))?;
        let category = category.ok_or_else(|| CatalogError::not_found("Category", id))?;
        Ok(DeleteCheck {
            record: category,
            dependents: items,
        })
    }

    pub async fn check_item<S: Store>(
        store: &S,
        id: &Id,
    ) -> CatalogResult<DeleteCheck<Item, ItemInstance>> {
        let (item, instances) =
            tokio::try_join!(store.get_item(id), store.find_item_instances_by_item(id))?;
        let item = item.ok_or_else(|| CatalogError::not_found("Item", id))?;
        Ok(DeleteCheck {
            record: item,
            dependents: instances,
        })
    }

    pub async fn delete_category<S: Store>(
        store: &S,
        id: &Id,
    ) -> CatalogResult<DeleteOutcome<Category, Item>> {
        let check = Self::check_category(store, id).await?;
        if !check.dependents.is_empty() {
            info!(
                "Refusing to delete category {}: {} item(s) still reference it",
                id,
                check.dependents.len()
            );
            return Ok(DeleteOutcome::Blocked {
                record: check.record,
                dependents: check.dependents,
            });
        }

        store.delete_category(id).await?;
        info!("Deleted category {}", id);
        Ok(DeleteOutcome::Deleted(check.record))
    }

    pub async fn delete_item<S: Store>(
        store: &S,
        id: &Id,
    ) -> CatalogResult<DeleteOutcome<Item, ItemInstance>> {
        let check = Self::check_item(store, id).await?;
        if !check.dependents.is_empty() {
            info!(
                "Refusing to delete item {}: {} instance(s) still reference it",
                id,
                check.dependents.len()
            );
            return Ok(DeleteOutcome::Blocked {
                record: check.record,
                dependents: check.dependents,
            });
        }

        store.delete_item(id).await?;
        info!("Deleted item {}", id);
        Ok(DeleteOutcome::Deleted(check.record))
    }

    /// Instances are leaves; nothing can block their removal.
    pub async fn delete_item_instance<S: Store>(store: &S, id: &Id) -> CatalogResult<ItemInstance> {
        let instance = store
            .get_item_instance(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("ItemInstance", id))?;
        store.delete_item_instance(id).await?;
        info!("Deleted item instance {}", id);
        Ok(instance)
    }
}
