use crate::domain::{DateRange, QuoteDate, UnitKind};
use crate::error::ValidationError;

/// One reference unit's official value on one calendar date.
///
/// Constructed once per successful extraction and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    pub unit_kind: UnitKind,
    pub display_name: String,
    pub date: QuoteDate,
    pub value: f64,
}

impl Quotation {
    /// Build a validated quotation. `display_name` falls back to the unit's
    /// default when the source row label was not captured.
    pub fn new(
        unit_kind: UnitKind,
        display_name: Option<String>,
        date: QuoteDate,
        value: f64,
    ) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidQuotationValue { value });
        }

        Ok(Self {
            unit_kind,
            display_name: display_name
                .unwrap_or_else(|| unit_kind.display_name().to_owned()),
            date,
            value,
        })
    }
}

/// Quotations for one unit across a date range, ascending by date.
///
/// `items` may cover fewer days than the range: days whose fetch or
/// extraction failed are dropped, not retried.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    pub unit_kind: UnitKind,
    pub range: DateRange,
    pub items: Vec<Quotation>,
}

impl HistoricalSeries {
    pub fn new(unit_kind: UnitKind, range: DateRange, items: Vec<Quotation>) -> Self {
        Self {
            unit_kind,
            range,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
