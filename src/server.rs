use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog::{Catalog, Ingredient, IngredientCategory, Recipe};
use crate::config::Config;
use crate::detection::{DetectionResult, IngredientDetector, SimulatedDetector};
use crate::error::RecipeError;
use crate::matching::{normalize_available, MatchStrategy, ScoredRecipe};
use crate::search::{find_matching_recipes, search_by_query, sort_recipes, SearchFilters, SortKey};
use crate::store::UserStore;
use crate::suggest::suggest;

#[derive(Clone)]
struct ApiState {
    config: Config,
    catalog: &'static Catalog,
    db_path: PathBuf,
    detector: Arc<dyn IngredientDetector>,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(error: RecipeError) -> Self {
        let status = match &error {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            RecipeError::RecipeNotFound(_) => StatusCode::NOT_FOUND,
            RecipeError::DetectionFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct IngredientsQuery {
    category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SuggestRequest {
    query: String,
    #[serde(default)]
    selected: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MatchRequest {
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    filters: SearchFilters,
    sort: Option<String>,
    strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
    #[serde(default)]
    filters: SearchFilters,
    sort: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum FavoriteAction {
    Add,
    Remove,
    #[default]
    Toggle,
}

#[derive(Debug, Clone, Deserialize)]
struct FavoriteRequest {
    recipe_id: String,
    #[serde(default)]
    action: FavoriteAction,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct CategorySummary {
    category: IngredientCategory,
    count: usize,
}

#[derive(Debug, Serialize)]
struct RecipesResponse {
    strategy: MatchStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortKey>,
    results: Vec<ScoredRecipe>,
}

#[derive(Debug, Serialize)]
struct FavoritesResponse {
    ids: Vec<String>,
    recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
struct FavoriteChange {
    recipe_id: String,
    saved: bool,
}

#[derive(Debug, Serialize)]
struct RecentResponse {
    searches: Vec<String>,
}

pub async fn run_server(config: Config, bind: SocketAddr, seed: Option<u64>) -> Result<()> {
    let (delay, jitter) = config.detection_delay();
    let rng = seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);
    let detector = SimulatedDetector::new(rng)
        .with_delay(delay, jitter)
        .with_validate_delay(std::time::Duration::from_millis(
            config.detection.validate_delay_ms,
        ));
    let state = ApiState {
        db_path: config.resolved_db_path(),
        config,
        catalog: Catalog::builtin(),
        detector: Arc::new(detector),
        seed,
    };

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/ingredients", get(list_ingredients))
        .route("/v1/categories", get(list_categories))
        .route("/v1/suggest", post(suggest_ingredients))
        .route("/v1/recipes/match", post(match_recipes))
        .route("/v1/recipes/search", post(search_recipes))
        .route("/v1/recipes/popular", get(popular_recipes))
        .route("/v1/recipes/:id", get(recipe_detail))
        .route("/v1/detect", post(detect))
        .route("/v1/favorites", get(list_favorites).post(change_favorite))
        .route("/v1/recent", get(list_recent).delete(clear_recent))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn list_ingredients(
    State(state): State<ApiState>,
    Query(query): Query<IngredientsQuery>,
) -> ApiResult<Vec<Ingredient>> {
    let ingredients = match query.category.as_deref() {
        Some(raw) => {
            let category = IngredientCategory::from_str(raw)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            state
                .catalog
                .ingredients_by_category(category)
                .into_iter()
                .cloned()
                .collect()
        }
        None => state.catalog.ingredients().to_vec(),
    };
    Ok(ok(ingredients))
}

async fn list_categories(State(state): State<ApiState>) -> Json<ApiResponse<Vec<CategorySummary>>> {
    ok(category_summaries(state.catalog))
}

async fn suggest_ingredients(
    State(state): State<ApiState>,
    Json(request): Json<SuggestRequest>,
) -> Json<ApiResponse<Vec<String>>> {
    let options = state.config.suggest_options();
    ok(suggest(
        state.catalog,
        &request.query,
        &request.selected,
        &options,
    ))
}

async fn match_recipes(
    State(state): State<ApiState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<RecipesResponse> {
    let available = normalize_available(&request.ingredients);
    if available.is_empty() {
        return Err(RecipeError::EmptyIngredients.into());
    }
    let mut settings = state.config.match_settings().map_err(ApiError::internal)?;
    if let Some(raw) = request.strategy.as_deref() {
        settings.strategy = MatchStrategy::from_str(raw)?;
    }
    let sort = parse_sort(request.sort.as_deref())?;
    let filters = state.config.with_default_floor(request.filters);

    let mut rng = request_rng(&state);
    let results = find_matching_recipes(state.catalog, &available, &filters, &settings, &mut rng);
    remember_search(&state, &available.join(", "));

    Ok(ok(RecipesResponse {
        strategy: settings.strategy,
        sort: Some(sort),
        results: sort_recipes(results, sort),
    }))
}

async fn search_recipes(
    State(state): State<ApiState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<RecipesResponse> {
    let sort = request
        .sort
        .as_deref()
        .map(SortKey::from_str)
        .transpose()?;
    let mut results = search_by_query(state.catalog, &request.query, &request.filters);
    if let Some(key) = sort {
        results = sort_recipes(results, key);
    }
    remember_search(&state, &request.query);
    Ok(ok(RecipesResponse {
        strategy: MatchStrategy::Weighted,
        sort,
        results,
    }))
}

async fn popular_recipes(State(state): State<ApiState>) -> Json<ApiResponse<Vec<Recipe>>> {
    ok(state.catalog.popular_recipes().to_vec())
}

async fn recipe_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Recipe> {
    let recipe = state
        .catalog
        .recipe_by_id(&id)
        .ok_or(RecipeError::RecipeNotFound(id))?;
    Ok(ok(recipe.clone()))
}

async fn detect(State(state): State<ApiState>, body: Bytes) -> ApiResult<DetectionResult> {
    let result = state.detector.detect(&body).await.map_err(|err| {
        warn!(error = %err, "detection request failed");
        ApiError::from(err)
    })?;
    Ok(ok(result))
}

async fn list_favorites(State(state): State<ApiState>) -> ApiResult<FavoritesResponse> {
    let store = open_store(&state)?;
    let recipes = store
        .saved_recipes(state.catalog)
        .into_iter()
        .cloned()
        .collect();
    Ok(ok(FavoritesResponse {
        ids: store.favorites(),
        recipes,
    }))
}

async fn change_favorite(
    State(state): State<ApiState>,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<FavoriteChange> {
    let recipe_id = request.recipe_id.trim().to_string();
    if state.catalog.recipe_by_id(&recipe_id).is_none() {
        return Err(ApiError::not_found(format!("recipe not found: {recipe_id}")));
    }
    let store = open_store(&state)?;
    let saved = match request.action {
        FavoriteAction::Add => store.add_favorite(&recipe_id).map(|_| true),
        FavoriteAction::Remove => store.remove_favorite(&recipe_id).map(|_| false),
        FavoriteAction::Toggle => store.toggle_favorite(&recipe_id),
    }
    .map_err(ApiError::internal)?;
    Ok(ok(FavoriteChange { recipe_id, saved }))
}

async fn list_recent(State(state): State<ApiState>) -> ApiResult<RecentResponse> {
    let store = open_store(&state)?;
    Ok(ok(RecentResponse {
        searches: store.recent_searches(),
    }))
}

async fn clear_recent(State(state): State<ApiState>) -> ApiResult<RecentResponse> {
    let store = open_store(&state)?;
    store.clear_recent_searches().map_err(ApiError::internal)?;
    Ok(ok(RecentResponse {
        searches: Vec::new(),
    }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn open_store(state: &ApiState) -> std::result::Result<UserStore, ApiError> {
    UserStore::open(&state.db_path)
        .map(|store| store.with_recent_limit(state.config.user.recent_search_limit))
        .map_err(ApiError::internal)
}

/// Recent-search bookkeeping never fails the request.
fn remember_search(state: &ApiState, text: &str) {
    let recorded = open_store(state).and_then(|store| {
        store.record_search(text).map_err(ApiError::internal)
    });
    if let Err(err) = recorded {
        warn!(error = %err.message, "failed to record recent search");
    }
}

fn request_rng(state: &ApiState) -> StdRng {
    state
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy)
}

fn parse_sort(raw: Option<&str>) -> std::result::Result<SortKey, ApiError> {
    Ok(raw.map(SortKey::from_str).transpose()?.unwrap_or_default())
}

fn category_summaries(catalog: &Catalog) -> Vec<CategorySummary> {
    catalog
        .category_counts()
        .into_iter()
        .map(|(category, count)| CategorySummary { category, count })
        .collect()
}
