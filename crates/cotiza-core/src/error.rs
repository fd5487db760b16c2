use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UnitKind;

/// Input validation errors. All of these are detected before any cache or
/// network access happens.
///
/// Display strings are the user-facing `error` field of the API, so they are
/// written in the product's language.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Tipo de unidad inválido: '{value}'. Use \"ui\" o \"ur\"")]
    InvalidUnitKind { value: String },

    #[error("Formato de fecha inválido. Use YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    #[error("La fecha de inicio no puede ser posterior a la fecha final")]
    InvalidDateRange,

    #[error("El rango de fechas no puede ser mayor a 365 días")]
    DateRangeTooLarge { days: i64 },

    #[error("El valor de la cotización no es un número válido")]
    InvalidQuotationValue { value: f64 },
}

/// Upstream retrieval errors, one variant per failure class.
///
/// The retriever never lets a scrape failure escape as a panic; every path
/// out of it is one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrapeError {
    /// The fetcher exhausted its attempts without a 200 response.
    #[error("No se pudo conectar con el servidor del BCU")]
    Connectivity,

    /// The page was fetched but the expected result table is missing.
    #[error("No se encontró la tabla de cotizaciones en la página")]
    PageStructure,

    /// The table is present but neither strategy located the unit's value.
    #[error("No se pudo encontrar el valor de la {}", .0.human_name())]
    ValueNotFound(UnitKind),

    /// The extracted text did not normalize to a usable number.
    #[error("El valor obtenido para la {} no es válido", .0.human_name())]
    InvalidValue(UnitKind),

    /// Every day of a historical range failed.
    #[error("No se encontraron cotizaciones para el rango de fechas especificado")]
    EmptySeries,
}

/// Stable machine-readable codes carried in the `codigo` field of error
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidUnitType,
    InvalidDateFormat,
    InvalidDateRange,
    DateRangeTooLarge,
    DataFetchError,
    ScraperError,
    GeneralError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUnitType => "INVALID_UNIT_TYPE",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::DateRangeTooLarge => "DATE_RANGE_TOO_LARGE",
            Self::DataFetchError => "DATA_FETCH_ERROR",
            Self::ScraperError => "SCRAPER_ERROR",
            Self::GeneralError => "GENERAL_ERROR",
        }
    }
}

/// Top-level error type returned by the orchestrating service.
///
/// This is the tagged success/failure seam: handlers match on
/// `Result<Envelope, ServiceError>` exhaustively instead of probing a
/// dynamic payload for an `error` key.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Input(#[from] ValidationError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("Error al procesar la solicitud: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Map every failure cause to exactly one wire code.
    ///
    /// Connectivity and empty-series failures mean nothing usable came back
    /// from the upstream; extraction failures mean the page arrived but the
    /// scraper could not read it.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Input(error) => match error {
                ValidationError::InvalidUnitKind { .. } => ErrorCode::InvalidUnitType,
                ValidationError::InvalidDateFormat { .. } => ErrorCode::InvalidDateFormat,
                ValidationError::InvalidDateRange => ErrorCode::InvalidDateRange,
                ValidationError::DateRangeTooLarge { .. } => ErrorCode::DateRangeTooLarge,
                ValidationError::InvalidQuotationValue { .. } => ErrorCode::ScraperError,
            },
            Self::Scrape(error) => match error {
                ScrapeError::Connectivity | ScrapeError::EmptySeries => ErrorCode::DataFetchError,
                ScrapeError::PageStructure
                | ScrapeError::ValueNotFound(_)
                | ScrapeError::InvalidValue(_) => ErrorCode::ScraperError,
            },
            Self::Internal(_) => ErrorCode::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_in_wire_format() {
        let json = serde_json::to_string(&ErrorCode::InvalidUnitType).expect("must serialize");
        assert_eq!(json, "\"INVALID_UNIT_TYPE\"");

        let json = serde_json::to_string(&ErrorCode::DateRangeTooLarge).expect("must serialize");
        assert_eq!(json, "\"DATE_RANGE_TOO_LARGE\"");
    }

    #[test]
    fn input_errors_map_to_input_codes() {
        let error = ServiceError::from(ValidationError::InvalidUnitKind {
            value: String::from("xx"),
        });
        assert_eq!(error.code(), ErrorCode::InvalidUnitType);

        let error = ServiceError::from(ValidationError::InvalidDateRange);
        assert_eq!(error.code(), ErrorCode::InvalidDateRange);
    }

    #[test]
    fn scrape_errors_split_between_fetch_and_scraper_codes() {
        let error = ServiceError::from(ScrapeError::Connectivity);
        assert_eq!(error.code(), ErrorCode::DataFetchError);

        let error = ServiceError::from(ScrapeError::PageStructure);
        assert_eq!(error.code(), ErrorCode::ScraperError);

        let error = ServiceError::from(ScrapeError::ValueNotFound(UnitKind::Ui));
        assert_eq!(error.code(), ErrorCode::ScraperError);

        let error = ServiceError::from(ScrapeError::EmptySeries);
        assert_eq!(error.code(), ErrorCode::DataFetchError);
    }
}
