//! Route table and handlers.
//!
//! Handlers match the service's `Result` exhaustively: success serializes
//! the envelope as-is, failure becomes a 400 with the `{ error, codigo }`
//! payload. No other shapes leave this module.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cotiza_core::{ApiError, QuotationService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QuotationService>,
}

pub fn app_router(service: Arc<QuotationService>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/info", get(info))
        .route("/api/cotizacion/:unidad", get(cotizacion))
        .route("/api/historico/:unidad", get(historico))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "nombre": "API de Cotizaciones BCU (Unidad Indexada y Reajustable)",
        "descripcion": "API para obtener cotizaciones de UI y UR desde el Banco Central del Uruguay",
        "endpoints": [
            {
                "ruta": "/api/cotizacion/ui",
                "metodo": "GET",
                "descripcion": "Cotización de la Unidad Indexada para una fecha específica",
                "parametros": ["fecha (opcional, formato YYYY-MM-DD, por defecto la fecha actual)"],
                "ejemplo": "/api/cotizacion/ui?fecha=2023-12-31",
            },
            {
                "ruta": "/api/cotizacion/ur",
                "metodo": "GET",
                "descripcion": "Cotización de la Unidad Reajustable para una fecha específica",
                "parametros": ["fecha (opcional, formato YYYY-MM-DD, por defecto la fecha actual)"],
                "ejemplo": "/api/cotizacion/ur?fecha=2023-12-31",
            },
            {
                "ruta": "/api/historico/ui",
                "metodo": "GET",
                "descripcion": "Datos históricos de la Unidad Indexada en un rango de fechas",
                "parametros": [
                    "inicio (opcional, formato YYYY-MM-DD, por defecto 30 días antes de fin)",
                    "fin (opcional, formato YYYY-MM-DD, por defecto la fecha actual)",
                ],
                "ejemplo": "/api/historico/ui?inicio=2023-01-01&fin=2023-01-31",
            },
            {
                "ruta": "/api/historico/ur",
                "metodo": "GET",
                "descripcion": "Datos históricos de la Unidad Reajustable en un rango de fechas",
                "parametros": [
                    "inicio (opcional, formato YYYY-MM-DD, por defecto 30 días antes de fin)",
                    "fin (opcional, formato YYYY-MM-DD, por defecto la fecha actual)",
                ],
                "ejemplo": "/api/historico/ur?inicio=2023-01-01&fin=2023-01-31",
            },
        ],
        "codigos_de_error": [
            "INVALID_UNIT_TYPE",
            "INVALID_DATE_FORMAT",
            "INVALID_DATE_RANGE",
            "DATE_RANGE_TOO_LARGE",
            "DATA_FETCH_ERROR",
            "SCRAPER_ERROR",
            "GENERAL_ERROR",
        ],
        "caracteristicas": [
            "Datos obtenidos directamente desde el Banco Central del Uruguay",
            "Caché en disco para evitar consultas repetidas al BCU",
            "Logs detallados de operaciones y errores",
        ],
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct CotizacionParams {
    fecha: Option<String>,
}

async fn cotizacion(
    State(state): State<AppState>,
    Path(unidad): Path<String>,
    Query(params): Query<CotizacionParams>,
) -> Response {
    match state
        .service
        .cotizacion(&unidad, params.fecha.as_deref())
        .await
    {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(error) => (StatusCode::BAD_REQUEST, Json(ApiError::from(&error))).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct HistoricoParams {
    inicio: Option<String>,
    fin: Option<String>,
}

async fn historico(
    State(state): State<AppState>,
    Path(unidad): Path<String>,
    Query(params): Query<HistoricoParams>,
) -> Response {
    match state
        .service
        .historico(&unidad, params.inicio.as_deref(), params.fin.as_deref())
        .await
    {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(error) => (StatusCode::BAD_REQUEST, Json(ApiError::from(&error))).into_response(),
    }
}
