use chrono::NaiveDate;
use rust_decimal::Decimal;
use shop_catalog::logic::ItemInstanceForm;
use shop_catalog::store::{CategoryStore, ItemInstanceStore, ItemStore};
use shop_catalog::{
    CatalogMutations, CatalogQueries, Category, Condition, DeleteOutcome, IntegrityGuard, Item,
    ItemInstance, NewCategory, NewItem, NewItemInstance, PostgresStore, Submission,
};
use std::str::FromStr;

/// Connect and migrate, or `None` when no database is configured for this run
async fn connect() -> Option<PostgresStore> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("DATABASE_URL not set, skipping PostgreSQL store test");
            return None;
        }
    };

    let store = PostgresStore::new(&database_url, 5)
        .await
        .expect("Failed to connect to PostgreSQL");
    store.migrate().await.expect("Failed to run migrations");
    Some(store)
}

async fn put_category(store: &PostgresStore, name: &str) -> Category {
    let category = Category::new(NewCategory {
        name: name.to_string(),
        description: Some(format!("{} description", name)),
    });
    store.upsert_category(category.clone()).await.unwrap();
    category
}

async fn put_item(
    store: &PostgresStore,
    name: &str,
    categories: &[&Category],
    launch_date: Option<NaiveDate>,
) -> Item {
    let item = Item::new(NewItem {
        name: name.to_string(),
        description: format!("{} description", name),
        category: categories.iter().map(|c| c.id.clone()).collect(),
        launch_date,
    });
    store.upsert_item(item.clone()).await.unwrap();
    item
}

async fn put_instance(
    store: &PostgresStore,
    item: &Item,
    condition: Condition,
    price: &str,
) -> ItemInstance {
    let instance = ItemInstance::new(NewItemInstance {
        item: item.id.clone(),
        condition,
        price: Decimal::from_str(price).unwrap(),
    });
    store.upsert_item_instance(instance.clone()).await.unwrap();
    instance
}

// Runs as one workflow: the database is shared, so the count checks compare
// before and after figures and every name carries a per-run tag.
#[tokio::test]
async fn test_postgres_store_workflow() {
    let Some(store) = connect().await else {
        return;
    };
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let named = |name: &str| format!("{} {}", name, tag);

    let available_before = store
        .count_item_instances_in(&Condition::AVAILABLE)
        .await
        .unwrap();
    let categories_before = store.count_categories().await.unwrap();
    let items_before = store.count_items().await.unwrap();

    println!("1. Categories list in ordinal order");
    let cables = put_category(&store, &named("cables")).await;
    let storage = put_category(&store, &named("Storage")).await;
    let cpus = put_category(&store, &named("CPUs")).await;

    let listed: Vec<String> = store
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.name.ends_with(&tag))
        .map(|c| c.name)
        .collect();
    assert_eq!(
        listed,
        vec![named("CPUs"), named("Storage"), named("cables")]
    );

    let found = store.find_category_by_name(&named("CPUs")).await.unwrap();
    assert_eq!(found, Some(cpus.clone()));
    let found = store.find_category_by_name(&named("cpus")).await.unwrap();
    assert_eq!(found, None);
    let found = CatalogQueries::find_category_by_name(&store, &named("Storage"))
        .await
        .unwrap();
    assert_eq!(found, Some(storage.clone()));

    println!("2. Items keep their categories and launch date");
    let launch = NaiveDate::from_ymd_opt(2022, 4, 20);
    let ryzen = put_item(&store, &named("Ryzen 5800X3D"), &[&cpus], launch).await;
    let apu = put_item(&store, &named("APU bundle"), &[&cpus, &storage], None).await;
    let ssd = put_item(&store, &named("Samsung 980 Pro"), &[&storage], None).await;

    let fetched = store.get_item(&ryzen.id).await.unwrap();
    assert_eq!(fetched, Some(ryzen.clone()));
    assert_eq!(fetched.unwrap().launch_date_formatted(), "Apr 20, 2022");

    let in_cpus: Vec<String> = store
        .find_items_by_category(&cpus.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(in_cpus, vec![apu.id.clone(), ryzen.id.clone()]);
    let in_storage = store.find_items_by_category(&storage.id).await.unwrap();
    assert_eq!(in_storage, vec![apu.clone(), ssd.clone()]);
    assert!(store.find_items_by_category(&cables.id).await.unwrap().is_empty());

    println!("3. Instances keep condition and price");
    let boxed = put_instance(&store, &ryzen, Condition::OpenBox, "449.99").await;
    let gone = put_instance(&store, &ryzen, Condition::OutOfStock, "429").await;
    let used = put_instance(&store, &ssd, Condition::Used, "0.5").await;

    for instance in [&boxed, &gone, &used] {
        let fetched = store.get_item_instance(&instance.id).await.unwrap().unwrap();
        assert_eq!(fetched.condition, instance.condition);
        assert_eq!(fetched.price, instance.price);
    }
    let for_ryzen = store.find_item_instances_by_item(&ryzen.id).await.unwrap();
    assert_eq!(for_ryzen.len(), 2);

    let rejected = CatalogMutations::create_item_instance(
        &store,
        ItemInstanceForm {
            item: ryzen.id.clone(),
            condition: "New".to_string(),
            price: "1.999".to_string(),
        },
    )
    .await
    .unwrap();
    match rejected {
        Submission::Rejected(invalid) => assert!(invalid.errors.has_field("price")),
        Submission::Saved(instance) => panic!("sub-cent price was saved: {:?}", instance),
    }

    println!("4. Aggregate counts");
    assert_eq!(
        store
            .count_item_instances_in(&Condition::AVAILABLE)
            .await
            .unwrap(),
        available_before + 1
    );
    assert_eq!(store.count_categories().await.unwrap(), categories_before + 3);
    assert_eq!(store.count_items().await.unwrap(), items_before + 3);

    println!("5. Deletes are guarded by dependents");
    let outcome = IntegrityGuard::delete_item(&store, &ryzen.id).await.unwrap();
    match outcome {
        DeleteOutcome::Blocked { dependents, .. } => assert_eq!(dependents.len(), 2),
        DeleteOutcome::Deleted(_) => panic!("item with instances was deleted"),
    }
    let outcome = IntegrityGuard::delete_category(&store, &cpus.id).await.unwrap();
    assert!(!outcome.is_deleted());
    assert!(store.get_category(&cpus.id).await.unwrap().is_some());

    for instance in [&boxed, &gone, &used] {
        IntegrityGuard::delete_item_instance(&store, &instance.id)
            .await
            .unwrap();
    }
    for item in [&ryzen, &apu, &ssd] {
        let outcome = IntegrityGuard::delete_item(&store, &item.id).await.unwrap();
        assert!(outcome.is_deleted(), "item {} still blocked", item.name);
    }
    for category in [&cables, &storage, &cpus] {
        let outcome = IntegrityGuard::delete_category(&store, &category.id)
            .await
            .unwrap();
        assert!(outcome.is_deleted(), "category {} still blocked", category.name);
    }

    assert!(store.get_item(&ryzen.id).await.unwrap().is_none());
    assert!(!store.delete_category(&cpus.id).await.unwrap());
    assert_eq!(
        store
            .count_item_instances_in(&Condition::AVAILABLE)
            .await
            .unwrap(),
        available_before
    );
}
