use axum::{response::Redirect, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(|| async { Redirect::to("/catalog/") }))
        // Landing page with aggregate counts
        .route("/catalog", get(handlers::index::<S>))
        .route("/catalog/", get(handlers::index::<S>))
        // Items
        .route(
            "/catalog/item/create",
            get(handlers::item_create_get::<S>).post(handlers::item_create_post::<S>),
        )
        .route(
            "/catalog/item/:id/delete",
            get(handlers::item_delete_get::<S>).post(handlers::item_delete_post::<S>),
        )
        .route(
            "/catalog/item/:id/update",
            get(handlers::item_update_get::<S>).post(handlers::item_update_post::<S>),
        )
        .route("/catalog/item/:id", get(handlers::item_detail::<S>))
        .route("/catalog/items", get(handlers::item_list::<S>))
        // Categories
        .route(
            "/catalog/category/create",
            get(handlers::category_create_get).post(handlers::category_create_post::<S>),
        )
        .route(
            "/catalog/category/:id/delete",
            get(handlers::category_delete_get::<S>).post(handlers::category_delete_post::<S>),
        )
        .route(
            "/catalog/category/:id/update",
            get(handlers::category_update_get::<S>).post(handlers::category_update_post::<S>),
        )
        .route("/catalog/category/:id", get(handlers::category_detail::<S>))
        .route("/catalog/categories", get(handlers::category_list::<S>))
        // Item instances
        .route(
            "/catalog/iteminstance/create",
            get(handlers::iteminstance_create_get::<S>)
                .post(handlers::iteminstance_create_post::<S>),
        )
        .route(
            "/catalog/iteminstance/:id/delete",
            get(handlers::iteminstance_delete_get::<S>)
                .post(handlers::iteminstance_delete_post::<S>),
        )
        .route(
            "/catalog/iteminstance/:id/update",
            get(handlers::iteminstance_update_get::<S>)
                .post(handlers::iteminstance_update_post::<S>),
        )
        .route(
            "/catalog/iteminstance/:id",
            get(handlers::iteminstance_detail::<S>),
        )
        .route(
            "/catalog/iteminstances",
            get(handlers::iteminstance_list::<S>),
        )
        // Static assets
        .nest_service("/public", ServeDir::new("public"))
}
