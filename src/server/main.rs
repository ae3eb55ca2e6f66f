//! bePelias gateway server.
//!
//! Exposes geocoding, BeSt-id resolution, city search, and health endpoints
//! on top of a Pelias instance and its Elasticsearch index.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bepelias::elasticsearch::EsClient;
use bepelias::health::{self, HealthStatus};
use bepelias::pelias::{GeocodeRequest, PeliasClient, PROBE_ADDRESS};
use bepelias::{format, orchestrator, resolve, AddressQuery, GatewayError, GeocodeMode};

#[derive(Parser, Debug)]
#[command(name = "bepelias")]
#[command(about = "Geocoding gateway for Belgian BeSt addresses")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:4001")]
    listen: String,

    /// Pelias API URL
    #[arg(long, default_value = "http://localhost:4000")]
    pelias_url: String,

    /// Pelias interpolation service URL
    #[arg(long, default_value = "http://localhost:4300")]
    interpolation_url: String,

    /// Elasticsearch URL
    #[arg(long, default_value = "http://localhost:9200")]
    es_url: String,

    /// Elasticsearch index name
    #[arg(long, default_value = "pelias")]
    index: String,
}

/// Application state shared across handlers
struct AppState {
    pelias: PeliasClient,
    es: EsClient,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("bePelias gateway");
    info!("Pelias at {}", args.pelias_url);

    let pelias = PeliasClient::new(&args.pelias_url, &args.interpolation_url)?;

    // Startup smoke test against the known-good address; a failure is worth
    // a warning but must not keep the gateway from serving /health.
    match pelias
        .geocode(&GeocodeRequest::Unstructured(PROBE_ADDRESS.to_string()))
        .await
    {
        Ok(_) => info!("Pelias test geocode succeeded"),
        Err(err) => warn!("Pelias test geocode failed: {}", err),
    }

    let es = EsClient::new(&args.es_url, &args.index)?;

    let state = Arc::new(AppState { pelias, es });

    let app = Router::new()
        .nest(
            "/REST/bepelias/v1",
            Router::new()
                .route("/geocode", get(geocode_handler))
                .route("/searchCity", get(search_city_handler))
                .route("/id/{bestid}", get(get_by_id_handler))
                .route("/health", get(health_handler)),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct GeocodeParams {
    /// How Pelias is used: basic, simple, advanced, pelias_struct,
    /// pelias_struct_noloc or pelias_unstruct
    mode: Option<String>,
    #[serde(rename = "streetName")]
    street_name: Option<String>,
    #[serde(rename = "houseNumber")]
    house_number: Option<String>,
    #[serde(rename = "postCode")]
    post_code: Option<String>,
    #[serde(rename = "postName")]
    post_name: Option<String>,
    /// If true, return the raw Pelias result in 'peliasRaw'
    #[serde(rename = "withPeliasResult")]
    with_pelias_result: Option<String>,
}

#[derive(Deserialize)]
struct CitySearchParams {
    #[serde(rename = "postCode")]
    post_code: Option<String>,
    #[serde(rename = "postName")]
    post_name: Option<String>,
}

/// Geocode a single address
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mode: GeocodeMode = params
        .mode
        .as_deref()
        .unwrap_or("advanced")
        .parse()
        .map_err(error_response)?;

    let with_pelias_raw = match params.with_pelias_result.as_deref() {
        None => false,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Invalid withPeliasResult value ({v}). Should be 'true' or 'false'"),
            ))
        }
    };

    let query = AddressQuery::new(
        params.street_name.as_deref(),
        params.house_number.as_deref(),
        params.post_code.as_deref(),
        params.post_name.as_deref(),
    );

    info!(
        "geocode: {:?} / {:?} / {:?} / {:?}",
        query.street_name, query.house_number, query.post_code, query.post_name
    );

    let outcome = orchestrator::resolve(&state.pelias, &query, mode)
        .await
        .map_err(|e| {
            tracing::error!("Geocoding failed: {}", e);
            error_response(e)
        })?;

    Ok(Json(format::geocode_response(&outcome, with_pelias_raw)))
}

/// Search a city by postal code and/or name
async fn search_city_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CitySearchParams>,
) -> Result<Response, (StatusCode, String)> {
    let records = resolve::search_city(
        &state.es,
        params.post_code.as_deref().map(str::trim).filter(|v| !v.is_empty()),
        params.post_name.as_deref().map(str::trim).filter(|v| !v.is_empty()),
    )
    .await
    .map_err(|e| {
        tracing::error!("City search failed: {}", e);
        error_response(e)
    })?;

    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(format::records_response(&records)).into_response())
}

/// Get a BeSt object by its (URL-encoded) id
async fn get_by_id_handler(
    State(state): State<Arc<AppState>>,
    Path(bestid): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let records = resolve::resolve_by_id(&state.es, &bestid)
        .await
        .map_err(|e| {
            tracing::error!("Id resolution failed: {}", e);
            error_response(e)
        })?;

    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(format::records_response(&records)).into_response())
}

/// Composite health status: 200 when UP or DEGRADED, 503 when DOWN
async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let report = health::check(&state.pelias).await;

    let status = match report.status {
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
    };

    (status, Json(report)).into_response()
}

fn error_response(err: GatewayError) -> (StatusCode, String) {
    let status = match err {
        GatewayError::InvalidMode(_)
        | GatewayError::MalformedIdentifier(_)
        | GatewayError::UnsupportedType { .. } => StatusCode::BAD_REQUEST,
        GatewayError::Upstream(_) | GatewayError::SearchIndexUnavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, err.to_string())
}
