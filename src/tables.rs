//! Fixed-label rows for the two result panels.

use crate::models::{ChangeClass, CompanyInfo, StockSummary};

pub const DESCRIPTION_LABEL: &str = "Description";

/// One label/value line of a result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: &'static str,
    pub value: String,
    /// Style class for signed values
    pub class: Option<ChangeClass>,
}

impl TableRow {
    fn plain(label: &'static str, value: &Option<String>) -> Self {
        Self {
            label,
            value: value.clone().unwrap_or_default(),
            class: None,
        }
    }

    fn signed(label: &'static str, value: &Option<String>) -> Self {
        let value = value.clone().unwrap_or_default();
        Self {
            label,
            class: Some(ChangeClass::of(&value)),
            value,
        }
    }
}

/// Company outlook rows. `description` is the already-truncated text.
pub fn company_rows(info: &CompanyInfo, description: String) -> Vec<TableRow> {
    vec![
        TableRow::plain("Company Name", &info.name),
        TableRow::plain("Stock Ticker Symbol", &info.symbol),
        TableRow::plain("Stock Exchange Code", &info.exchange),
        TableRow::plain("Company Start Date", &info.start_date),
        TableRow {
            label: DESCRIPTION_LABEL,
            value: description,
            class: None,
        },
    ]
}

/// Stock summary rows.
pub fn summary_rows(summary: &StockSummary) -> Vec<TableRow> {
    vec![
        TableRow::plain("Stock Ticker Symbol", &summary.symbol),
        TableRow::plain("Trading Day", &summary.trading_day),
        TableRow::plain("Previous Closing Price", &summary.prev_close),
        TableRow::plain("Opening Price", &summary.open),
        TableRow::plain("High Price", &summary.high),
        TableRow::plain("Low Price", &summary.low),
        TableRow::plain("Last Price", &summary.last),
        TableRow::signed("Change", &summary.change),
        TableRow::signed("Change Percent", &summary.change_percent),
        TableRow::plain("Number of Shares Traded", &summary.volume),
    ]
}

/// Replace the description cell of a company table.
pub fn set_description(rows: &mut [TableRow], description: String) {
    if let Some(row) = rows.iter_mut().find(|r| r.label == DESCRIPTION_LABEL) {
        row.value = description;
    }
}
