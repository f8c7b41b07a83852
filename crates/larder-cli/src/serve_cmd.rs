use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use larder_core::catalog::{self, CatalogError};
use larder_core::menu::{self, CURRENT_PLAN_ID, MemoAutosave, MenuError};
use larder_core::recipe::{self, IngredientLine, RecipeError};
use larder_core::shopping;
use larder_core::store::Store;
use larder_db::models::{Category, PlanKey, Recipe, Unit};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::EmptyName => Self::bad_request(err.to_string()),
            CatalogError::Duplicate(_) => Self::conflict(err.to_string()),
            CatalogError::Store(e) => Self::internal(e),
        }
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::UnknownRecipe(_) => Self::not_found(err.to_string()),
            MenuError::CategoryMismatch { .. } => Self::bad_request(err.to_string()),
            MenuError::Store(e) => Self::internal(e),
        }
    }
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::UnknownIngredient(_)
            | RecipeError::UnknownIngredientId(_)
            | RecipeError::InvalidQuantity { .. } => Self::bad_request(err.to_string()),
            RecipeError::NotFound(_) => Self::not_found(err.to_string()),
            RecipeError::Store(e) => Self::internal(e),
        }
    }
}

// ---------------------------------------------------------------------------
// State and request/response types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub autosave: Arc<MemoAutosave>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
    pub unit: Unit,
    #[serde(default)]
    pub exclude_from_list: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub category: Option<Category>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlotRequest {
    pub recipe_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MemoRequest {
    pub memo: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/ingredients", get(list_ingredients).post(add_ingredient))
        .route("/api/ingredients/{id}", axum::routing::delete(delete_ingredient))
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/api/plan", get(get_plan).delete(clear_plan))
        .route("/api/plan/slots/{key}", put(set_slot).delete(clear_slot))
        .route("/api/plan/memo", put(put_memo))
        .route("/api/shopping-list", get(get_shopping_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("larder serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("larder serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Minimal HTML escaping for text interpolated into the index page.
/// Titles are free text and must never reach the page verbatim.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

async fn index(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let recipes = state
        .store
        .list_recipes()
        .await
        .map_err(AppError::internal)?;

    let rows = if recipes.is_empty() {
        "<tr><td colspan=\"3\">No recipes yet.</td></tr>".to_string()
    } else {
        recipes
            .iter()
            .map(|r| {
                format!(
                    "<tr><td><a href=\"/api/recipes/{id}\">{title}</a></td><td>{category}</td><td>{id}</td></tr>",
                    id = r.id,
                    title = escape_html(&r.title),
                    category = escape_html(&r.category.to_string()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let html = format!(
        "<!DOCTYPE html>\
<html><head><title>larder</title></head><body>\
<h1>larder</h1>\
<p><a href=\"/api/recipes\">/api/recipes</a> | <a href=\"/api/ingredients\">/api/ingredients</a> \
| <a href=\"/api/plan\">/api/plan</a> | <a href=\"/api/shopping-list\">/api/shopping-list</a></p>\
<table><tr><th>Recipe</th><th>Lane</th><th>ID</th></tr>{rows}</table>\
</body></html>"
    );

    Ok(Html(html).into_response())
}

async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let ingredients = state
        .store
        .list_ingredients()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(ingredients).into_response())
}

async fn add_ingredient(
    State(state): State<AppState>,
    Json(req): Json<IngredientRequest>,
) -> Result<axum::response::Response, AppError> {
    let ingredient = catalog::register_ingredient(
        state.store.as_ref(),
        &req.name,
        req.unit,
        req.exclude_from_list,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ingredient)).into_response())
}

async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let deleted = catalog::remove_ingredient(state.store.as_ref(), id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::not_found(format!("ingredient {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> Result<axum::response::Response, AppError> {
    let recipes = state
        .store
        .list_recipes()
        .await
        .map_err(AppError::internal)?;
    let matched: Vec<&Recipe> =
        recipe::search_recipes(&recipes, query.category, query.q.as_deref());
    Ok(Json(matched).into_response())
}

async fn create_recipe(
    State(state): State<AppState>,
    Json(req): Json<RecipeRequest>,
) -> Result<axum::response::Response, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::bad_request("recipe title must not be empty"));
    }
    let (recipe, warnings) = recipe::create_recipe(
        state.store.as_ref(),
        &req.title,
        req.category,
        &req.ingredients,
        req.steps,
        req.notes,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(RecipeResponse { recipe, warnings })).into_response())
}

async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let recipe = state
        .store
        .get_recipe(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("recipe {id} not found")))?;
    Ok(Json(recipe).into_response())
}

async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecipeRequest>,
) -> Result<axum::response::Response, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::bad_request("recipe title must not be empty"));
    }
    let (recipe, warnings) = recipe::update_recipe(
        state.store.as_ref(),
        id,
        &req.title,
        req.category,
        &req.ingredients,
        req.steps,
        req.notes,
    )
    .await?;
    Ok(Json(RecipeResponse { recipe, warnings }).into_response())
}

async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let deleted = state
        .store
        .delete_recipe(id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::not_found(format!("recipe {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn get_plan(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let plan = menu::load_plan(state.store.as_ref())
        .await
        .map_err(AppError::internal)?;
    Ok(Json(plan).into_response())
}

async fn set_slot(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SlotRequest>,
) -> Result<axum::response::Response, AppError> {
    let key: PlanKey = key
        .parse()
        .map_err(|e: larder_db::models::PlanKeyParseError| AppError::bad_request(e.to_string()))?;
    let plan = menu::set_slot(state.store.as_ref(), key, req.recipe_id).await?;
    Ok(Json(plan).into_response())
}

async fn clear_slot(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let key: PlanKey = key
        .parse()
        .map_err(|e: larder_db::models::PlanKeyParseError| AppError::bad_request(e.to_string()))?;
    let plan = menu::clear_slot(state.store.as_ref(), key)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(plan).into_response())
}

async fn clear_plan(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let plan = menu::clear_plan(state.store.as_ref())
        .await
        .map_err(AppError::internal)?;
    Ok(Json(plan).into_response())
}

/// Memo writes are debounced: this handler only queues the revision, so it
/// answers 202 before anything reaches the store.
async fn put_memo(
    State(state): State<AppState>,
    Json(req): Json<MemoRequest>,
) -> axum::response::Response {
    state.autosave.submit(req.memo);
    StatusCode::ACCEPTED.into_response()
}

async fn get_shopping_list(
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let entries = shopping::build_from_store(state.store.as_ref(), CURRENT_PLAN_ID)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(entries).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
