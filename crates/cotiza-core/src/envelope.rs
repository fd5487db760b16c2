//! Response envelopes for the HTTP API.
//!
//! The metadata-enriched success shape is canonical: it is what handlers
//! serialize and exactly what the cache stores, so a cache hit and a fresh
//! retrieval are indistinguishable to the consumer.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::domain::{HistoricalSeries, Quotation, QuoteDate};
use crate::error::{ErrorCode, ServiceError};

/// Source attribution carried in every success envelope.
pub const SOURCE_NAME: &str = "Banco Central del Uruguay";

const QUERY_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Metadata block of a single-date response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationMeta {
    pub fuente: String,
    pub fecha_consulta: String,
}

/// Single-date success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationEnvelope {
    pub tipo: String,
    pub moneda: String,
    pub fecha: QuoteDate,
    pub valor: f64,
    pub metadata: QuotationMeta,
}

impl QuotationEnvelope {
    pub fn from_quotation(quotation: &Quotation, consulted_at: OffsetDateTime) -> Self {
        Self {
            tipo: quotation.unit_kind.tag().to_owned(),
            moneda: quotation.display_name.clone(),
            fecha: quotation.date,
            valor: quotation.value,
            metadata: QuotationMeta {
                fuente: SOURCE_NAME.to_owned(),
                fecha_consulta: format_stamp(consulted_at),
            },
        }
    }
}

/// One per-day record inside a historical response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalItem {
    pub tipo: String,
    pub moneda: String,
    pub fecha: QuoteDate,
    pub valor: f64,
}

/// Metadata block of a historical response, with aggregate counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalMeta {
    pub total_registros: usize,
    pub dias_solicitados: i64,
    pub fuente: String,
}

/// Historical success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEnvelope {
    pub tipo: String,
    pub moneda: String,
    pub fecha_inicio: QuoteDate,
    pub fecha_fin: QuoteDate,
    pub cotizaciones: Vec<HistoricalItem>,
    pub metadata: HistoricalMeta,
}

impl HistoricalEnvelope {
    pub fn from_series(series: &HistoricalSeries) -> Self {
        let cotizaciones: Vec<HistoricalItem> = series
            .items
            .iter()
            .map(|quotation| HistoricalItem {
                tipo: quotation.unit_kind.tag().to_owned(),
                moneda: quotation.display_name.clone(),
                fecha: quotation.date,
                valor: quotation.value,
            })
            .collect();

        Self {
            tipo: series.unit_kind.tag().to_owned(),
            moneda: series.unit_kind.display_name().to_owned(),
            fecha_inicio: series.range.start(),
            fecha_fin: series.range.end(),
            metadata: HistoricalMeta {
                total_registros: cotizaciones.len(),
                dias_solicitados: series.range.requested_days(),
                fuente: SOURCE_NAME.to_owned(),
            },
            cotizaciones,
        }
    }
}

/// Wire error payload: a human-readable message plus a stable code. No
/// stack traces, no internal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub codigo: ErrorCode,
}

impl From<&ServiceError> for ApiError {
    fn from(error: &ServiceError) -> Self {
        Self {
            error: error.to_string(),
            codigo: error.code(),
        }
    }
}

fn format_stamp(at: OffsetDateTime) -> String {
    at.format(QUERY_STAMP)
        .expect("query timestamp must be formattable")
}
