use anyhow::{anyhow, Context, Result};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};

use crate::model::{Category, Condition, Id, Item, ItemInstance};
use crate::store::traits::{CategoryStore, ItemInstanceStore, ItemStore, Store};

const CATEGORY_COLUMNS: &str = "id, name, description";
const ITEM_COLUMNS: &str = "id, name, description, category_ids, launch_date";
const ITEM_INSTANCE_COLUMNS: &str = "id, item_id, condition, price";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn category_from_row(row: &PgRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<Item> {
    Ok(Item {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category_ids")?,
        launch_date: row.try_get("launch_date")?,
    })
}

fn item_instance_from_row(row: &PgRow) -> Result<ItemInstance> {
    let condition: String = row.try_get("condition")?;
    Ok(ItemInstance {
        id: row.try_get("id")?,
        item: row.try_get("item_id")?,
        condition: condition.parse::<Condition>().map_err(|e| anyhow!(e))?,
        price: row.try_get("price")?,
    })
}

#[async_trait::async_trait]
impl CategoryStore for PostgresStore {
    async fn get_category(&self, id: &Id) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")?;

        row.as_ref().map(category_from_row).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories ORDER BY name COLLATE \"C\"",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        rows.iter().map(category_from_row).collect()
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE name = $1 LIMIT 1",
            CATEGORY_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up category by name")?;

        row.as_ref().map(category_from_row).transpose()
    }

    async fn upsert_category(&self, category: Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await
        .context("Failed to upsert category")?;

        Ok(())
    }

    async fn delete_category(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_categories(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count categories")?;

        Ok(count as u64)
    }
}

#[async_trait::async_trait]
impl ItemStore for PostgresStore {
    async fn get_item(&self, id: &Id) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch item")?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM items ORDER BY name COLLATE \"C\"",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list items")?;

        rows.iter().map(item_from_row).collect()
    }

    async fn find_items_by_category(&self, category_id: &Id) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM items WHERE $1 = ANY(category_ids) ORDER BY name COLLATE \"C\"",
            ITEM_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find items for category")?;

        rows.iter().map(item_from_row).collect()
    }

    async fn upsert_item(&self, item: Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, category_ids, launch_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                category_ids = EXCLUDED.category_ids,
                launch_date = EXCLUDED.launch_date
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.launch_date)
        .execute(&self.pool)
        .await
        .context("Failed to upsert item")?;

        Ok(())
    }

    async fn delete_item(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete item")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_items(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count items")?;

        Ok(count as u64)
    }
}

#[async_trait::async_trait]
impl ItemInstanceStore for PostgresStore {
    async fn get_item_instance(&self, id: &Id) -> Result<Option<ItemInstance>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM item_instances WHERE id = $1",
            ITEM_INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch item instance")?;

        row.as_ref().map(item_instance_from_row).transpose()
    }

    async fn list_item_instances(&self) -> Result<Vec<ItemInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM item_instances ORDER BY id",
            ITEM_INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list item instances")?;

        rows.iter().map(item_instance_from_row).collect()
    }

    async fn find_item_instances_by_item(&self, item_id: &Id) -> Result<Vec<ItemInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM item_instances WHERE item_id = $1 ORDER BY id",
            ITEM_INSTANCE_COLUMNS
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find instances for item")?;

        rows.iter().map(item_instance_from_row).collect()
    }

    async fn upsert_item_instance(&self, instance: ItemInstance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO item_instances (id, item_id, condition, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                item_id = EXCLUDED.item_id,
                condition = EXCLUDED.condition,
                price = EXCLUDED.price
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.item)
        .bind(instance.condition.as_str())
        .bind(instance.price)
        .execute(&self.pool)
        .await
        .context("Failed to upsert item instance")?;

        Ok(())
    }

    async fn delete_item_instance(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM item_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete item instance")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_item_instances_in(&self, conditions: &[Condition]) -> Result<u64> {
        let conditions: Vec<String> = conditions.iter().map(|c| c.as_str().to_string()).collect();
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM item_instances WHERE condition = ANY($1)")
                .bind(&conditions)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count available item instances")?;

        Ok(count as u64)
    }
}

impl Store for PostgresStore {}
