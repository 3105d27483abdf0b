//! Data models for the stock lookup payload and the screen state.

use serde::Deserialize;

/// Body of a successful `/api/stock/{symbol}` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockResult {
    /// Company metadata
    #[serde(default)]
    pub company_info: Option<CompanyInfo>,
    /// Latest trading summary
    #[serde(default)]
    pub stock_summary: Option<StockSummary>,
}

/// Company metadata as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Trading summary for the latest session.
///
/// Values arrive pre-formatted by the backend. `change` and `change_percent`
/// carry their sign, e.g. `"-1.23 ▼"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub trading_day: Option<String>,
    #[serde(default)]
    pub prev_close: Option<String>,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub high: Option<String>,
    #[serde(default)]
    pub low: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub change: Option<String>,
    #[serde(default)]
    pub change_percent: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Direction of a price change, used to pick the cell style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    Positive,
    Negative,
}

impl ChangeClass {
    /// Classify a formatted change value.
    ///
    /// Any `-` in the text counts as negative, wherever it appears.
    pub fn of(value: &str) -> Self {
        if value.contains('-') {
            ChangeClass::Negative
        } else {
            ChangeClass::Positive
        }
    }
}

/// Transient state of the current search attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Resolved (trimmed, upper-cased) symbol of the last submission
    pub symbol: String,
    /// A request is in flight
    pub is_loading: bool,
    /// Text of the error banner, if shown
    pub error_message: Option<String>,
}

/// Result panels, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Company,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Company, Tab::Summary];

    /// The tab auto-selected after a successful search.
    pub fn first() -> Self {
        Tab::ALL[0]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Company => "Company Outlook",
            Tab::Summary => "Stock Summary",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Company => 0,
            Tab::Summary => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Company => Tab::Summary,
            Tab::Summary => Tab::Company,
        }
    }

    pub fn previous(self) -> Self {
        // Two tabs: stepping back is the same as stepping forward.
        self.next()
    }
}

/// Which result panel is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Active tab; `None` hides every panel
    pub active_tab: Option<Tab>,
    /// Results container (tab bar and panels) is shown
    pub results_visible: bool,
}

impl UiState {
    pub fn hide_all_tabs(&mut self) {
        self.active_tab = None;
    }

    /// Whether the panel for `tab` is the one currently shown.
    pub fn is_panel_visible(&self, tab: Tab) -> bool {
        self.results_visible && self.active_tab == Some(tab)
    }
}
