//! HTML value extraction for the upstream quotation page.
//!
//! Two strategies, in order: walk the result table looking for the unit's
//! row, then fall back to a regex over the page text. The table being absent
//! altogether is a structural failure and skips the fallback; a page without
//! the result table is a different page, not a noisy one.

use regex::RegexBuilder;
use scraper::{ElementRef, Html, Selector};

/// Rows need at least name, compra and venta cells to be considered.
const MIN_ROW_CELLS: usize = 3;

/// Index of the "Venta" column. Compra and venta carry the same value for
/// these units, the upstream fills both.
const VALUE_CELL: usize = 2;

/// A located value, with the source row's name when the table strategy won.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    pub row_label: Option<String>,
    pub value: f64,
}

/// Extraction failure classes the retriever maps to its own errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// `table.resultado` is not in the document at all.
    TableMissing,
    /// Table present, but neither strategy located the label's value.
    ValueNotFound,
    /// The matched row's value cell did not normalize to a number.
    InvalidNumber,
}

/// Locate `label`'s value in `body`.
///
/// The first matching row (or, failing that, the first text match) wins;
/// multiple occurrences are not reconciled.
pub fn extract_value(body: &str, label: &str) -> Result<ExtractedValue, ExtractError> {
    let document = Html::parse_document(body);

    let table_selector = Selector::parse("table.resultado").expect("static selector is valid");
    let row_selector = Selector::parse("tr").expect("static selector is valid");
    let cell_selector = Selector::parse("td").expect("static selector is valid");

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ExtractError::TableMissing)?;

    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }

        let row_label = collect_text(cells[0]);
        if !row_label.contains(label) {
            continue;
        }

        let value =
            parse_decimal(&collect_text(cells[VALUE_CELL])).ok_or(ExtractError::InvalidNumber)?;
        return Ok(ExtractedValue {
            row_label: Some(row_label),
            value,
        });
    }

    fallback_from_text(&document, label)
        .map(|value| ExtractedValue {
            row_label: None,
            value,
        })
        .ok_or(ExtractError::ValueNotFound)
}

/// Normalize the upstream's locale format (`.` thousands separator, `,`
/// decimal separator) and parse.
///
/// The dots must be stripped before the comma is rewritten; doing it the
/// other way around would delete the new decimal point.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().replace('.', "").replace(',', ".").parse().ok()
}

/// Case-insensitive search of the whole page text for the label followed by
/// a locale-formatted number, thousands groups included.
fn fallback_from_text(document: &Html, label: &str) -> Option<f64> {
    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    let pattern = format!(
        "{}[^0-9,]*((?:[0-9]{{1,3}}(?:\\.[0-9]{{3}})+|[0-9]+),[0-9]+)",
        regex::escape(label)
    );
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    let captures = matcher.captures(&text)?;
    parse_decimal(captures.get(1)?.as_str())
}

fn collect_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_owned()
}
