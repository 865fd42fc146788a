use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Json as RequestJson,
};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::views::{
    category_views, item_instance_views, item_views, CategoryView, ItemInstanceView, ItemView,
    PopulatedItemInstanceView, PopulatedItemView,
};
use crate::error::CatalogError;
use crate::logic::{
    CatalogCounts, CatalogMutations, CatalogQueries, CategoryCreation, CategoryForm,
    unescape_html, DeleteOutcome, IntegrityGuard, Invalid, ItemForm, ItemInstanceForm,
    Submission,
};
use crate::model::{Condition, Id};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

type HandlerResult = Result<Response, CatalogError>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Store(e) => {
                error!("Store failure: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}

/// Re-render a form with the sanitized input and its field errors
fn rejected<F: Serialize>(
    title: &str,
    invalid: Invalid<F>,
    context: serde_json::Value,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "title": title,
            "form": invalid.form,
            "errors": invalid.errors,
            "context": context,
        })),
    )
        .into_response()
}

fn view(body: serde_json::Value) -> Response {
    Json(body).into_response()
}

async fn item_form_context<S: Store>(store: &S) -> Result<serde_json::Value, CatalogError> {
    let form = CatalogQueries::item_form(store, None).await?;
    Ok(json!({ "categories": category_views(&form.categories) }))
}

async fn item_instance_form_context<S: Store>(
    store: &S,
) -> Result<serde_json::Value, CatalogError> {
    let form = CatalogQueries::item_instance_form(store, None).await?;
    Ok(json!({
        "items": item_views(&form.items),
        "conditions": form.conditions,
    }))
}

// Landing page

pub async fn index<S: Store>(State(store): State<AppState<S>>) -> Json<serde_json::Value> {
    let counts = CatalogCounts::gather(&*store).await;
    Json(json!({
        "title": "One-Stop Computer Shop",
        "error": counts.error,
        "data": counts,
    }))
}

// Categories

pub async fn category_list<S: Store>(State(store): State<AppState<S>>) -> HandlerResult {
    let categories = CatalogQueries::list_categories(&*store).await?;
    Ok(view(json!({
        "title": "Category List",
        "category_list": category_views(&categories),
    })))
}

pub async fn category_detail<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let detail = CatalogQueries::category_detail(&*store, &id).await?;
    Ok(view(json!({
        "title": "Category Details",
        "category": CategoryView::from(&detail.category),
        "category_items": item_views(&detail.items),
    })))
}

pub async fn category_create_get() -> Json<serde_json::Value> {
    Json(json!({
        "title": "Create Category",
        "form": CategoryForm::default(),
    }))
}

pub async fn category_create_post<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(form): RequestJson<CategoryForm>,
) -> HandlerResult {
    match CatalogMutations::create_category(&*store, form).await? {
        CategoryCreation::Created(category) | CategoryCreation::Existing(category) => {
            Ok(Redirect::to(&category.url()).into_response())
        }
        CategoryCreation::Rejected(invalid) => {
            Ok(rejected("Create Category", invalid, json!({})))
        }
    }
}

pub async fn category_update_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let category = CatalogQueries::get_category(&*store, &id).await?;
    Ok(view(json!({
        "title": "Update Category",
        "category": CategoryView::from(&category),
        "form": CategoryForm {
            name: unescape_html(&category.name),
            description: category.description.as_deref().map(unescape_html).unwrap_or_default(),
        },
    })))
}

pub async fn category_update_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    RequestJson(form): RequestJson<CategoryForm>,
) -> HandlerResult {
    match CatalogMutations::update_category(&*store, &id, form).await? {
        Submission::Saved(category) => Ok(Redirect::to(&category.url()).into_response()),
        Submission::Rejected(invalid) => Ok(rejected("Update Category", invalid, json!({}))),
    }
}

pub async fn category_delete_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let check = IntegrityGuard::check_category(&*store, &id).await?;
    Ok(view(json!({
        "title": "Delete Category",
        "category": CategoryView::from(&check.record),
        "category_items": item_views(&check.dependents),
    })))
}

pub async fn category_delete_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    match IntegrityGuard::delete_category(&*store, &id).await? {
        DeleteOutcome::Deleted(_) => Ok(Redirect::to("/catalog/categories").into_response()),
        DeleteOutcome::Blocked { record, dependents } => Ok(view(json!({
            "title": "Delete Category",
            "category": CategoryView::from(&record),
            "category_items": item_views(&dependents),
        }))),
    }
}

// Items

pub async fn item_list<S: Store>(State(store): State<AppState<S>>) -> HandlerResult {
    let items = CatalogQueries::list_items(&*store).await?;
    let item_list: Vec<PopulatedItemView> = items.iter().map(PopulatedItemView::from).collect();
    Ok(view(json!({
        "title": "Item List",
        "item_list": item_list,
    })))
}

pub async fn item_detail<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let detail = CatalogQueries::item_detail(&*store, &id).await?;
    Ok(view(json!({
        "title": detail.item.item.name,
        "item": PopulatedItemView::from(&detail.item),
        "item_instances": item_instance_views(&detail.instances),
    })))
}

pub async fn item_create_get<S: Store>(State(store): State<AppState<S>>) -> HandlerResult {
    let context = item_form_context(&*store).await?;
    Ok(view(json!({
        "title": "Create Item",
        "form": ItemForm::default(),
        "context": context,
    })))
}

pub async fn item_create_post<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(form): RequestJson<ItemForm>,
) -> HandlerResult {
    match CatalogMutations::create_item(&*store, form).await? {
        Submission::Saved(item) => Ok(Redirect::to(&item.url()).into_response()),
        Submission::Rejected(invalid) => {
            let context = item_form_context(&*store).await?;
            Ok(rejected("Create Item", invalid, context))
        }
    }
}

pub async fn item_update_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let form = CatalogQueries::item_form(&*store, Some(&id)).await?;
    let item = form.item.ok_or_else(|| CatalogError::not_found("Item", &id))?;
    Ok(view(json!({
        "title": "Update Item",
        "item": ItemView::from(&item),
        "form": ItemForm {
            name: unescape_html(&item.name),
            description: unescape_html(&item.description),
            category: item.category.clone(),
            launch_date: item.launch_date.map(|d| d.to_string()).unwrap_or_default(),
        },
        "context": { "categories": category_views(&form.categories) },
    })))
}

pub async fn item_update_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    RequestJson(form): RequestJson<ItemForm>,
) -> HandlerResult {
    match CatalogMutations::update_item(&*store, &id, form).await? {
        Submission::Saved(item) => Ok(Redirect::to(&item.url()).into_response()),
        Submission::Rejected(invalid) => {
            let context = item_form_context(&*store).await?;
            Ok(rejected("Update Item", invalid, context))
        }
    }
}

pub async fn item_delete_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let check = IntegrityGuard::check_item(&*store, &id).await?;
    Ok(view(json!({
        "title": "Delete Item",
        "item": ItemView::from(&check.record),
        "item_instances": item_instance_views(&check.dependents),
    })))
}

pub async fn item_delete_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    match IntegrityGuard::delete_item(&*store, &id).await? {
        DeleteOutcome::Deleted(_) => Ok(Redirect::to("/catalog/items").into_response()),
        DeleteOutcome::Blocked { record, dependents } => Ok(view(json!({
            "title": "Delete Item",
            "item": ItemView::from(&record),
            "item_instances": item_instance_views(&dependents),
        }))),
    }
}

// Item instances

pub async fn iteminstance_list<S: Store>(State(store): State<AppState<S>>) -> HandlerResult {
    let instances = CatalogQueries::list_item_instances(&*store).await?;
    let iteminstance_list: Vec<PopulatedItemInstanceView> = instances
        .iter()
        .map(PopulatedItemInstanceView::from)
        .collect();
    Ok(view(json!({
        "title": "Item Instance List",
        "iteminstance_list": iteminstance_list,
    })))
}

pub async fn iteminstance_detail<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let detail = CatalogQueries::item_instance_detail(&*store, &id).await?;
    Ok(view(json!({
        "title": "Item Instance Details",
        "iteminstance": PopulatedItemInstanceView::from(&detail),
    })))
}

pub async fn iteminstance_create_get<S: Store>(
    State(store): State<AppState<S>>,
) -> HandlerResult {
    let context = item_instance_form_context(&*store).await?;
    Ok(view(json!({
        "title": "Create Item Instance",
        "form": ItemInstanceForm {
            condition: Condition::default().to_string(),
            ..ItemInstanceForm::default()
        },
        "context": context,
    })))
}

pub async fn iteminstance_create_post<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(form): RequestJson<ItemInstanceForm>,
) -> HandlerResult {
    match CatalogMutations::create_item_instance(&*store, form).await? {
        Submission::Saved(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        Submission::Rejected(invalid) => {
            let context = item_instance_form_context(&*store).await?;
            Ok(rejected("Create Item Instance", invalid, context))
        }
    }
}

pub async fn iteminstance_update_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let form = CatalogQueries::item_instance_form(&*store, Some(&id)).await?;
    let instance = form
        .instance
        .ok_or_else(|| CatalogError::not_found("ItemInstance", &id))?;
    Ok(view(json!({
        "title": "Update Item Instance",
        "iteminstance": ItemInstanceView::from(&instance),
        "form": ItemInstanceForm {
            item: instance.item.clone(),
            condition: instance.condition.to_string(),
            price: instance.price.to_string(),
        },
        "context": {
            "items": item_views(&form.items),
            "conditions": form.conditions,
        },
    })))
}

pub async fn iteminstance_update_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    RequestJson(form): RequestJson<ItemInstanceForm>,
) -> HandlerResult {
    match CatalogMutations::update_item_instance(&*store, &id, form).await? {
        Submission::Saved(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        Submission::Rejected(invalid) => {
            let context = item_instance_form_context(&*store).await?;
            Ok(rejected("Update Item Instance", invalid, context))
        }
    }
}

pub async fn iteminstance_delete_get<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    let detail = CatalogQueries::item_instance_detail(&*store, &id).await?;
    Ok(view(json!({
        "title": "Delete Item Instance",
        "iteminstance": PopulatedItemInstanceView::from(&detail),
    })))
}

pub async fn iteminstance_delete_post<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> HandlerResult {
    IntegrityGuard::delete_item_instance(&*store, &id).await?;
    Ok(Redirect::to("/catalog/iteminstances").into_response())
}
