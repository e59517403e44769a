//! Result extraction: page markup in, row-major text grid out.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::locators;

/// Single-row placeholder emitted when the portal returned no usable table.
pub const NO_DATA_SENTINEL: &str = "No Data Found";

/// An ordered sequence of rows, first row conventionally the header. Never
/// empty: absence of real data is the one-row sentinel, so the renderer
/// always has something to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseListTable {
    rows: Vec<Vec<String>>,
}

impl CauseListTable {
    fn sentinel() -> Self {
        Self {
            rows: vec![vec![NO_DATA_SENTINEL.to_string()]],
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn is_sentinel(&self) -> bool {
        self.rows.len() == 1
            && self.rows[0].len() == 1
            && self.rows[0][0] == NO_DATA_SENTINEL
    }
}

/// Parses the post-submission page into a cause list table.
///
/// Rows yielding zero cells (stray empty `<tr>` separators) are dropped. A
/// missing or empty table degrades to the sentinel, never to an empty grid.
pub fn extract_cause_list(html: &str) -> CauseListTable {
    let document = Html::parse_document(html);
    // Static selectors; parse failures here are programmer errors.
    let table_selector =
        Selector::parse(&format!("table#{}", locators::RESULTS_TABLE_ID)).unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();

    let Some(table) = document.select(&table_selector).next() else {
        warn!("no cause list table in page; invalid captcha or an empty day");
        return CauseListTable::sentinel();
    };

    let mut rows = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| normalize_text(cell.text()))
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        warn!("cause list table had no usable rows");
        return CauseListTable::sentinel();
    }
    CauseListTable { rows }
}

/// Joins an element's text nodes with single spaces, collapsing all interior
/// whitespace.
fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
