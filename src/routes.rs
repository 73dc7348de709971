use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Form, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use sea_orm::{IntoActiveModel, PrimaryKeyTrait};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    AppState,
    entities::{actor, film, film_to_actor},
    error::{AppError, AppResult, CatalogError},
    models::{AddFilmRequest, IdRequest, UpdateRequest},
    repository::CatalogKind,
    templates,
};

const FILM_NOT_FOUND: &str = "Film not found, check the entered id";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/film/{id}", get(film_detail))
        .route("/actor/{id}", get(actor_detail))
        .route("/add_film", get(add_film_form).post(add_film))
        .route("/film/create", post(create::<film::Entity>))
        .route("/film/update", put(update::<film::Entity>))
        .route("/film/delete", delete(remove::<film::Entity>))
        .route("/actor/create", post(create::<actor::Entity>))
        .route("/actor/update", put(update::<actor::Entity>))
        .route("/actor/delete", delete(remove::<actor::Entity>))
        .route("/film_to_actor/create", post(create::<film_to_actor::Entity>))
        .route("/film_to_actor/update", put(update::<film_to_actor::Entity>))
        .route("/film_to_actor/delete", delete(remove::<film_to_actor::Entity>))
        .route("/films", get(list::<film::Entity>))
        .route("/actors", get(list::<actor::Entity>))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let films = state.repo::<film::Entity>().get_all().await?;
    Ok(Html(templates::index_page(&films)))
}

pub async fn film_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let Some(film) = state.repo::<film::Entity>().get(id).await? else {
        return Err(AppError::not_found(format!("film {id} not found")));
    };
    let cast = state.repo::<film_to_actor::Entity>().cast_of(id).await?;
    Ok(Html(templates::film_page(&film, &cast)))
}

pub async fn actor_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let Some(actor) = state.repo::<actor::Entity>().get(id).await? else {
        return Err(AppError::not_found(format!("actor {id} not found")));
    };
    let films = state.repo::<film_to_actor::Entity>().filmography_of(id).await?;
    Ok(Html(templates::actor_page(&actor, &films)))
}

pub async fn add_film_form() -> Html<String> {
    Html(templates::add_film_page(None))
}

pub async fn add_film(
    State(state): State<Arc<AppState>>,
    Form(req): Form<AddFilmRequest>,
) -> Response {
    let external_id = req.external_id.trim();
    if external_id.is_empty() {
        return Html(templates::add_film_page(Some("Enter an IMDb id"))).into_response();
    }

    match state.enricher.resolve_or_enrich_film(external_id).await {
        Ok(Some(id)) => Redirect::to(&format!("/film/{id}")).into_response(),
        Ok(None) => Html(templates::add_film_page(Some(FILM_NOT_FOUND))).into_response(),
        Err(err) => {
            warn!(external_id = %external_id, error = %err, "film enrichment failed");
            (err.status(), Html(templates::add_film_page(Some(&err.to_string())))).into_response()
        },
    }
}

pub async fn create<K>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<K::New>, JsonRejection>,
) -> Response
where
    K: CatalogKind,
    K::Model: IntoActiveModel<K::ActiveModel> + Serialize,
    <K::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let Json(new) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(K::NAME, "create", malformed(rejection)),
    };
    match state.repo::<K>().create(new).await {
        Ok(id) => (StatusCode::CREATED, id.to_string()).into_response(),
        Err(err) => rejected(K::NAME, "create", err),
    }
}

pub async fn update<K>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateRequest<K::Changes>>, JsonRejection>,
) -> Response
where
    K: CatalogKind,
    K::Model: IntoActiveModel<K::ActiveModel> + Serialize,
    <K::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(K::NAME, "update", malformed(rejection)),
    };
    match state.repo::<K>().update(req.id, req.changes).await {
        Ok(_) => (StatusCode::OK, req.id.to_string()).into_response(),
        Err(err) => rejected(K::NAME, "update", err),
    }
}

pub async fn remove<K>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IdRequest>, JsonRejection>,
) -> Response
where
    K: CatalogKind,
    K::Model: IntoActiveModel<K::ActiveModel> + Serialize,
    <K::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(K::NAME, "delete", malformed(rejection)),
    };
    match state.repo::<K>().delete(req.id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => rejected(K::NAME, "delete", err),
    }
}

pub async fn list<K>(State(state): State<Arc<AppState>>) -> Response
where
    K: CatalogKind,
    K::Model: IntoActiveModel<K::ActiveModel> + Serialize,
    <K::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    match state.repo::<K>().get_all().await {
        Ok(rows) => Json(HashMap::from([(K::PLURAL, rows)])).into_response(),
        Err(err) => rejected(K::NAME, "list", err),
    }
}

async fn not_found() -> AppError {
    AppError::not_found("page not found")
}

fn malformed(rejection: JsonRejection) -> CatalogError {
    CatalogError::MalformedInput(rejection.body_text())
}

fn rejected(kind: &'static str, action: &'static str, err: CatalogError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        error!(kind, action, error = %err, "request failed");
    } else {
        warn!(kind, action, error = %err, "request rejected");
    }
    (status, err.to_string()).into_response()
}
