use log::warn;
use serde::Serialize;

use crate::model::Condition;
use crate::store::traits::Store;

/// Summary figures for the landing view. A count that could not be read is
/// left empty and the failure is reported in `error`; the others still show.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogCounts {
    pub item_count: Option<u64>,
    pub category_count: Option<u64>,
    pub item_instance_available_count: Option<u64>,
    /// Shown beside the figures rather than among them
    #[serde(skip_serializing)]
    pub error: Option<String>,
}

impl CatalogCounts {
    /// Read the three counts concurrently, keeping whichever succeed.
    pub async fn gather<S: Store>(store: &S) -> Self {
        let (items, categories, available) = tokio::join!(
            store.count_items(),
            store.count_categories(),
            store.count_item_instances_in(&Condition::AVAILABLE)
        );
        Self::from_results(items, categories, available)
    }

    pub fn from_results(
        items: anyhow::Result<u64>,
        categories: anyhow::Result<u64>,
        available: anyhow::Result<u64>,
    ) -> Self {
        let mut error = None;
        let mut keep = |label: &str, result: anyhow::Result<u64>| match result {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("Failed to count {}: {:#}", label, e);
                error.get_or_insert_with(|| format!("{:#}", e));
                None
            }
        };

        let item_count = keep("items", items);
        let category_count = keep("categories", categories);
        let item_instance_available_count = keep("available item instances", available);

        Self {
            item_count,
            category_count,
            item_instance_available_count,
            error,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::test_support::*;
    use crate::store::MemoryStore;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_counts_only_available_instances() {
        let store = MemoryStore::new();
        let cpus = put_category(&store, "CPUs").await;
        let gpus = put_category(&store, "GPUs").await;
        let ryzen = put_item(&store, "Ryzen 5800X3D", &[&cpus.id]).await;
        let rtx = put_item(&store, "RTX 4090", &[&gpus.id]).await;
        put_item(&store, "Arc A770", &[&gpus.id]).await;
        put_instance(&store, &ryzen.id, Condition::New, "449").await;
        put_instance(&store, &ryzen.id, Condition::Refurbished, "389").await;
        put_instance(&store, &rtx.id, Condition::OpenBox, "1499").await;
        put_instance(&store, &rtx.id, Condition::OutOfStock, "1599").await;

        let counts = CatalogCounts::gather(&store).await;
        assert_eq!(
            counts,
            CatalogCounts {
                item_count: Some(3),
                category_count: Some(2),
                item_instance_available_count: Some(3),
                error: None,
            }
        );
        assert!(counts.is_complete());
    }

    #[test]
    fn test_partial_failure_keeps_other_counts() {
        let counts = CatalogCounts::from_results(
            Ok(3),
            Err(anyhow!("connection reset")),
            Ok(7),
        );

        assert_eq!(counts.item_count, Some(3));
        assert_eq!(counts.category_count, None);
        assert_eq!(counts.item_instance_available_count, Some(7));
        assert_eq!(counts.error.as_deref(), Some("connection reset"));
        assert!(!counts.is_complete());
    }

    #[test]
    fn test_first_error_is_reported() {
        let counts = CatalogCounts::from_results(
            Err(anyhow!("first")),
            Err(anyhow!("second")),
            Err(anyhow!("third")),
        );
        assert_eq!(counts, CatalogCounts {
            error: Some("first".to_string()),
            ..CatalogCounts::default()
        });
    }
}
