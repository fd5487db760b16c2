//! # Cotiza Core
//!
//! Scraping, caching and orchestration core for the BCU quotation service.
//!
//! ## Overview
//!
//! The crate implements the full retrieval pipeline behind the HTTP API:
//!
//! - **Domain models** for units, dates, quotations and historical series
//! - **HTTP client seam** with a reqwest transport and an offline stub
//! - **Bounded retry policy** with randomized delays
//! - **Page fetcher** for resilient GETs against the upstream
//! - **HTML value extractor** with a table strategy and a regex fallback
//! - **Quotation retriever** for single-date and historical lookups
//! - **File cache store** with mtime-based expiry
//! - **Orchestrating service** mapping outcomes to the API contract
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | File-backed expiring key/value store |
//! | [`config`] | Environment-driven configuration |
//! | [`domain`] | Domain models (UnitKind, Quotation, DateRange) |
//! | [`envelope`] | Response envelopes and the wire error payload |
//! | [`error`] | Per-layer error types and wire codes |
//! | [`extract`] | HTML value extraction |
//! | [`fetcher`] | Retry-bounded page fetching |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retriever`] | Single-date and historical retrieval |
//! | [`retry`] | Retry/delay policy |
//! | [`service`] | Request orchestration and cache keying |
//!
//! ## Data flow
//!
//! ```text
//! ┌──────────────────┐
//! │  HTTP handlers   │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ QuotationService │────▶│  FileCacheStore  │
//! └────────┬─────────┘     └──────────────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    Retriever     │────▶│   PageFetcher    │
//! └────────┬─────────┘     │ (HttpClient +    │
//!          ▼               │  RetryConfig)    │
//! ┌──────────────────┐     └──────────────────┘
//! │    Extractor     │
//! └──────────────────┘
//! ```
//!
//! ## Error handling
//!
//! Every layer returns structured results; nothing panics across a module
//! boundary. The service is the only place where failures are mapped to the
//! wire `codigo` values:
//!
//! ```rust
//! use cotiza_core::error::{ErrorCode, ScrapeError, ServiceError};
//!
//! let error = ServiceError::from(ScrapeError::Connectivity);
//! assert_eq!(error.code(), ErrorCode::DataFetchError);
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod http_client;
pub mod retriever;
pub mod retry;
pub mod service;

// Re-export commonly used types at crate root for convenience

pub use cache::FileCacheStore;
pub use config::{AppConfig, Environment};
pub use domain::{DateRange, HistoricalSeries, Quotation, QuoteDate, UnitKind, MAX_RANGE_DAYS};
pub use envelope::{
    ApiError, HistoricalEnvelope, HistoricalItem, HistoricalMeta, QuotationEnvelope,
    QuotationMeta, SOURCE_NAME,
};
pub use error::{ErrorCode, ScrapeError, ServiceError, ValidationError};
pub use extract::{parse_decimal, ExtractError, ExtractedValue};
pub use fetcher::PageFetcher;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
    BROWSER_USER_AGENT,
};
pub use retriever::{QuotationRetriever, DEFAULT_BASE_URL, DEFAULT_DAY_DELAY};
pub use retry::{Backoff, RetryConfig};
pub use service::{historical_key, quotation_key, resolve_range, QuotationService};
