//! Request orchestration: validate, consult the cache, retrieve on a miss,
//! normalize, store, return.
//!
//! This is the single place that maps retrieval outcomes onto the external
//! contract; nothing below it knows about wire codes, nothing above it
//! needs to branch on failure causes.

use time::OffsetDateTime;

use crate::cache::FileCacheStore;
use crate::domain::{DateRange, QuoteDate, UnitKind};
use crate::envelope::{HistoricalEnvelope, QuotationEnvelope};
use crate::error::{ServiceError, ValidationError};
use crate::retriever::QuotationRetriever;

/// Days covered by a historical query when `inicio` is not given.
const DEFAULT_SPAN_DAYS: i64 = 30;

pub struct QuotationService {
    retriever: QuotationRetriever,
    cache: FileCacheStore,
}

impl QuotationService {
    pub fn new(retriever: QuotationRetriever, cache: FileCacheStore) -> Self {
        Self { retriever, cache }
    }

    /// One unit's value on one date (today when `fecha` is absent).
    ///
    /// Pipeline: VALIDATE → CACHE_LOOKUP → (hit: return) | (miss: RETRIEVE →
    /// NORMALIZE → CACHE_STORE → return). Input errors short-circuit before
    /// any cache or network access; only success envelopes are ever cached.
    pub async fn cotizacion(
        &self,
        unit: &str,
        fecha: Option<&str>,
    ) -> Result<QuotationEnvelope, ServiceError> {
        let kind = UnitKind::parse(unit)?;
        let date = match fecha {
            Some(raw) => QuoteDate::parse(raw)?,
            None => QuoteDate::today_utc(),
        };

        let key = quotation_key(kind, date);
        if let Some(cached) = self.cache.get::<QuotationEnvelope>(&key) {
            return Ok(cached);
        }

        let quotation = self.retriever.quotation(kind, date).await?;
        let envelope = QuotationEnvelope::from_quotation(&quotation, OffsetDateTime::now_utc());

        // A failed write degrades to "operate without cache"; the response
        // is unaffected.
        self.cache.set(&key, &envelope);
        Ok(envelope)
    }

    /// Quotations for a date range, defaults resolved before anything else.
    pub async fn historico(
        &self,
        unit: &str,
        inicio: Option<&str>,
        fin: Option<&str>,
    ) -> Result<HistoricalEnvelope, ServiceError> {
        let kind = UnitKind::parse(unit)?;
        let range = resolve_range(inicio, fin, QuoteDate::today_utc())?;

        let key = historical_key(kind, range);
        if let Some(cached) = self.cache.get::<HistoricalEnvelope>(&key) {
            return Ok(cached);
        }

        let series = self.retriever.historical(kind, range).await?;
        let envelope = HistoricalEnvelope::from_series(&series);

        self.cache.set(&key, &envelope);
        Ok(envelope)
    }

    /// Remove stale cache entries; returns how many were deleted.
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep_expired()
    }
}

/// Resolve the historical defaults (`fin` → today, `inicio` → `fin` − 30
/// days) and validate the resulting range.
///
/// Pure in `(inicio, fin, today)`: equivalent requests made while "today"
/// is the same date resolve to the identical range, and therefore to the
/// identical cache key.
pub fn resolve_range(
    inicio: Option<&str>,
    fin: Option<&str>,
    today: QuoteDate,
) -> Result<DateRange, ValidationError> {
    let end = match fin {
        Some(raw) => QuoteDate::parse(raw)?,
        None => today,
    };

    let start = match inicio {
        Some(raw) => QuoteDate::parse(raw)?,
        None => end.minus_days(DEFAULT_SPAN_DAYS),
    };

    DateRange::new(start, end)
}

/// Cache key of a single-date query. Derived from the resolved date, never
/// from the raw parameter.
pub fn quotation_key(kind: UnitKind, date: QuoteDate) -> String {
    format!("{}_{}", kind.code(), date.format_iso())
}

/// Cache key of a historical query, derived after default resolution so
/// equivalent requests share one entry.
pub fn historical_key(kind: UnitKind, range: DateRange) -> String {
    format!(
        "historico_{}_{}_{}",
        kind.code(),
        range.start().format_iso(),
        range.end().format_iso()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> QuoteDate {
        QuoteDate::parse(input).expect("test date must parse")
    }

    #[test]
    fn resolves_both_defaults_from_today() {
        let range = resolve_range(None, None, date("2023-06-15")).expect("must resolve");

        assert_eq!(range.end(), date("2023-06-15"));
        assert_eq!(range.start(), date("2023-05-16"));
    }

    #[test]
    fn default_resolution_is_deterministic_for_a_fixed_today() {
        let today = date("2023-06-15");

        let first = resolve_range(None, None, today).expect("must resolve");
        let second = resolve_range(None, None, today).expect("must resolve");

        assert_eq!(
            historical_key(UnitKind::Ui, first),
            historical_key(UnitKind::Ui, second)
        );
    }

    #[test]
    fn missing_inicio_counts_back_from_the_given_fin() {
        let range =
            resolve_range(None, Some("2023-03-31"), date("2023-06-15")).expect("must resolve");

        assert_eq!(range.end(), date("2023-03-31"));
        assert_eq!(range.start(), date("2023-03-01"));
    }

    #[test]
    fn malformed_dates_fail_before_range_checks() {
        let err = resolve_range(Some("01/01/2023"), None, date("2023-06-15"))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDateFormat { .. }));

        let err = resolve_range(None, Some("ayer"), date("2023-06-15")).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDateFormat { .. }));
    }

    #[test]
    fn inverted_range_is_an_input_error() {
        let err = resolve_range(Some("2023-02-01"), Some("2023-01-01"), date("2023-06-15"))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDateRange));
    }

    #[test]
    fn oversized_range_is_an_input_error() {
        let err = resolve_range(Some("2022-01-01"), Some("2023-06-01"), date("2023-06-15"))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DateRangeTooLarge { .. }));
    }

    #[test]
    fn cache_keys_match_the_documented_format() {
        let range =
            DateRange::new(date("2023-05-16"), date("2023-06-15")).expect("valid range");

        assert_eq!(
            quotation_key(UnitKind::Ui, date("2023-12-31")),
            "ui_2023-12-31"
        );
        assert_eq!(
            historical_key(UnitKind::Ur, range),
            "historico_ur_2023-05-16_2023-06-15"
        );
    }
}
