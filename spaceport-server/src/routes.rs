//! HTTP handlers for the Spaceport server.

use std::sync::Arc;

use actix_web::error::{BlockingError, InternalError};
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use spaceport_core::{
    Page, Ship, ShipCriteria, ShipDraft, ShipOrder, ShipRepository, ShipService, ShipType,
    SpaceportError, sort_ships,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Repository handle shared across workers.
pub type SharedRepository = Arc<dyn ShipRepository + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship record service.
    pub service: ShipService<SharedRepository>,
}

impl AppState {
    /// Build state around a repository.
    pub fn new(repository: SharedRepository) -> Self {
        Self {
            service: ShipService::new(repository),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Filter parameters shared by the listing and count endpoints.
///
/// `after` and `before` are epoch milliseconds.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipFilterQuery {
    /// Substring of the ship name.
    pub name: Option<String>,
    /// Substring of the home planet.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Produced strictly after this instant.
    pub after: Option<i64>,
    /// Produced strictly before this instant.
    pub before: Option<i64>,
    /// Exact used flag.
    #[serde(rename = "isUsed")]
    pub used: Option<bool>,
    /// Minimum speed.
    pub min_speed: Option<f64>,
    /// Maximum speed.
    pub max_speed: Option<f64>,
    /// Minimum crew size.
    pub min_crew_size: Option<i32>,
    /// Maximum crew size.
    pub max_crew_size: Option<i32>,
    /// Minimum rating.
    pub min_rating: Option<f64>,
    /// Maximum rating.
    pub max_rating: Option<f64>,
}

impl ShipFilterQuery {
    /// Convert the filter parameters into core criteria.
    pub fn criteria(&self) -> Result<ShipCriteria, String> {
        Ok(ShipCriteria {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: timestamp("after", self.after)?,
            before: timestamp("before", self.before)?,
            used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        })
    }
}

/// Ordering and paging parameters, read only by the listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipPageQuery {
    /// Sort field.
    pub order: Option<ShipOrder>,
    /// Zero-based page index (default 0).
    pub page_number: Option<u32>,
    /// Page size (default 3).
    pub page_size: Option<u32>,
}

impl ShipPageQuery {
    /// Requested page, falling back to the defaults.
    pub fn page(&self) -> Page {
        Page::with_defaults(self.page_number, self.page_size, Page::default())
    }
}

fn timestamp(name: &str, millis: Option<i64>) -> Result<Option<DateTime<Utc>>, String> {
    millis
        .map(|value| {
            DateTime::from_timestamp_millis(value)
                .ok_or_else(|| format!("{name} is out of range: {value}"))
        })
        .transpose()
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

fn rejected_input<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

fn error_response(err: &SpaceportError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        SpaceportError::Validation(_) | SpaceportError::InvalidId(_) => {
            HttpResponse::BadRequest().json(body)
        }
        SpaceportError::NotFound(_) => HttpResponse::NotFound().json(body),
        SpaceportError::Storage(_) => {
            error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(
    result: Result<spaceport_core::Result<T>, BlockingError>,
) -> HttpResponse {
    match result {
        Ok(Ok(body)) => HttpResponse::Ok().json(body),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        }),
    }
}

fn list_page(
    service: &ShipService<SharedRepository>,
    criteria: &ShipCriteria,
    order: Option<ShipOrder>,
    page: Page,
) -> spaceport_core::Result<Vec<Ship>> {
    let mut ships = service.list(criteria)?;
    sort_ships(order, &mut ships);
    Ok(page.slice(ships))
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipFilterQuery, ShipPageQuery),
    responses(
        (status = 200, description = "Matching ships for the requested page", body = [Ship]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filters, ordered and paged.
pub async fn list_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilterQuery>,
    paging: web::Query<ShipPageQuery>,
) -> impl Responder {
    let criteria = match filter.criteria() {
        Ok(criteria) => criteria,
        Err(message) => return bad_request(message),
    };
    let order = paging.order;
    let page = paging.page();
    let service = state.service.clone();
    respond(web::block(move || list_page(&service, &criteria, order, page)).await)
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipFilterQuery),
    responses(
        (status = 200, description = "Number of matching ships", body = usize),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filters.
pub async fn count_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilterQuery>,
) -> impl Responder {
    let criteria = match filter.criteria() {
        Ok(criteria) => criteria,
        Err(message) => return bad_request(message),
    };
    let service = state.service.clone();
    respond(web::block(move || service.count(&criteria)).await)
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship from a complete payload.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    let service = state.service.clone();
    respond(web::block(move || service.create(draft)).await)
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch one ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let service = state.service.clone();
    respond(web::block(move || service.get(&id)).await)
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply a partial update to one ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = path.into_inner();
    let patch = payload.into_inner();
    let service = state.service.clone();
    respond(
        web::block(move || {
            let existing = service.get(&id)?;
            service.update(existing, &patch)
        })
        .await,
    )
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete one ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let service = state.service.clone();
    let result = web::block(move || {
        let ship = service.get(&id)?;
        service.delete(&ship)
    })
    .await;

    match result {
        Ok(Ok(())) => HttpResponse::Ok().finish(),
        other => respond(other),
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Register every Spaceport route.
///
/// `count_ships` is registered ahead of `get_ship` so `/rest/ships/count`
/// is not read as an identifier. Malformed query strings and bodies are
/// answered with an [`ErrorResponse`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| rejected_input(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| rejected_input(err)))
        .service(count_ships)
        .service(list_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}
