use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DateRange, HistoricalSeries, Quotation, QuoteDate, UnitKind};
use crate::error::ScrapeError;
use crate::extract::{self, ExtractError};
use crate::fetcher::PageFetcher;
use crate::http_client::HttpClient;
use crate::retry::{Backoff, RetryConfig};

/// Quotations page of the Banco Central del Uruguay.
pub const DEFAULT_BASE_URL: &str =
    "https://www.bcu.gub.uy/Estadisticas-e-Indicadores/Paginas/Cotizaciones.aspx";

/// Default pause between per-day fetches of a historical range. Serializing
/// the range with a spread-out delay keeps burst load off the upstream.
pub const DEFAULT_DAY_DELAY: Backoff = Backoff::Uniform {
    min: Duration::from_millis(500),
    max: Duration::from_secs(1),
};

/// Orchestrates date formatting, page fetching and value extraction.
pub struct QuotationRetriever {
    fetcher: PageFetcher,
    base_url: String,
    day_delay: Backoff,
}

impl QuotationRetriever {
    pub fn new(
        client: Arc<dyn HttpClient>,
        retry: RetryConfig,
        base_url: impl Into<String>,
        day_delay: Backoff,
    ) -> Self {
        Self {
            fetcher: PageFetcher::new(client, retry),
            base_url: base_url.into(),
            day_delay,
        }
    }

    pub fn with_defaults(client: Arc<dyn HttpClient>) -> Self {
        Self::new(
            client,
            RetryConfig::default(),
            DEFAULT_BASE_URL,
            DEFAULT_DAY_DELAY,
        )
    }

    /// One unit's official value on one date.
    pub async fn quotation(
        &self,
        kind: UnitKind,
        date: QuoteDate,
    ) -> Result<Quotation, ScrapeError> {
        let url = self.quotation_url(kind, date);

        let response = self
            .fetcher
            .fetch(&url)
            .await
            .ok_or(ScrapeError::Connectivity)?;

        let found = extract::extract_value(&response.body, kind.row_label()).map_err(
            |error| match error {
                ExtractError::TableMissing => ScrapeError::PageStructure,
                ExtractError::ValueNotFound => ScrapeError::ValueNotFound(kind),
                ExtractError::InvalidNumber => ScrapeError::InvalidValue(kind),
            },
        )?;

        Quotation::new(kind, found.row_label, date, found.value)
            .map_err(|_| ScrapeError::InvalidValue(kind))
    }

    /// One quotation per day of `range`, ascending.
    ///
    /// A failed day is logged and dropped, never retried beyond the
    /// fetcher's own attempts and never fatal on its own; the operation only
    /// fails when every day failed.
    pub async fn historical(
        &self,
        kind: UnitKind,
        range: DateRange,
    ) -> Result<HistoricalSeries, ScrapeError> {
        let mut items = Vec::new();
        let mut days = range.days().peekable();

        while let Some(date) = days.next() {
            match self.quotation(kind, date).await {
                Ok(quotation) => items.push(quotation),
                Err(error) => {
                    tracing::warn!(unit = %kind, %date, %error, "día omitido de la serie histórica");
                }
            }

            if days.peek().is_some() {
                tokio::time::sleep(self.day_delay.delay()).await;
            }
        }

        if items.is_empty() {
            return Err(ScrapeError::EmptySeries);
        }

        Ok(HistoricalSeries::new(kind, range, items))
    }

    fn quotation_url(&self, kind: UnitKind, date: QuoteDate) -> String {
        format!(
            "{}?fecha={}&tipo={}",
            self.base_url,
            urlencoding::encode(&date.format_upstream()),
            kind.code()
        )
    }
}
