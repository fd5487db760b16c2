//! Domain types for BCU reference-unit quotations.
//!
//! All models validate their invariants at construction time and are
//! immutable afterwards:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`UnitKind`] | The two published reference units (UI / UR) |
//! | [`QuoteDate`] | Calendar date, ISO 8601 on the wire |
//! | [`DateRange`] | Inclusive, validated historical range |
//! | [`Quotation`] | One unit's value on one date |
//! | [`HistoricalSeries`] | Ascending quotations over a range |

mod date;
mod models;
mod unit;

pub use date::{DateRange, QuoteDate, MAX_RANGE_DAYS};
pub use models::{HistoricalSeries, Quotation};
pub use unit::UnitKind;
