//! Search controller: input, request cycle, result panels and tabs.

use crate::api::{StockApiClient, StockSource};
use crate::cli::Args;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::models::{SearchState, StockResult, Tab, UiState};
use crate::tables::{self, TableRow};
use crate::truncate::{self, CellMetrics};
use anyhow::Result;
use std::time::{Duration, Instant};

/// Prompt reported when submitting an empty input.
pub const REQUIRED_FIELD_MESSAGE: &str = "Please fill out this field.";

pub const SEARCH_LABEL: &str = "Search";
pub const LOADING_LABEL: &str = "Loading...";

/// Live "required field" state of the search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity {
    /// Current validation message; `None` when the input is valid
    pub message: Option<&'static str>,
    /// The message has been reported and is on screen
    pub reported: bool,
}

/// Outcome of a search task, delivered back to the UI loop.
#[derive(Debug)]
pub struct SearchOutcome {
    pub symbol: String,
    pub result: Result<StockResult, FetchError>,
}

/// Application state.
pub struct App<S = StockApiClient> {
    source: S,
    /// Text of the search input
    pub input: String,
    pub validity: Validity,
    pub search: SearchState,
    pub ui: UiState,
    /// Rendered company outlook table
    pub company_rows: Option<Vec<TableRow>>,
    /// Rendered stock summary table
    pub summary_rows: Option<Vec<TableRow>>,
    /// Full description behind the truncated cell
    pub last_description: Option<String>,
    /// Width of the result tables, in cells
    pub table_width: u16,
    pending_width: Option<u16>,
    resize: Debouncer,
    metrics: CellMetrics,
    description_lines: u16,
    description_width_percent: u16,
    pub running: bool,
}

impl App<StockApiClient> {
    /// Create a new application from CLI args and config.
    pub fn new(args: &Args, config: &Config, table_width: u16) -> Result<Self> {
        let base_url = args
            .base_url
            .as_deref()
            .unwrap_or(&config.general.base_url);
        let timeout = args.timeout.unwrap_or(config.general.timeout);
        let client = StockApiClient::new(base_url, timeout)?;

        let mut app = App::with_source(client, config, table_width);
        if let Some(symbol) = &args.symbol {
            app.set_input(symbol.trim());
        }
        Ok(app)
    }
}

impl<S> App<S> {
    /// Create an application around an arbitrary stock source.
    pub fn with_source(source: S, config: &Config, table_width: u16) -> Self {
        let mut app = Self {
            source,
            input: String::new(),
            validity: Validity::default(),
            search: SearchState::default(),
            ui: UiState::default(),
            company_rows: None,
            summary_rows: None,
            last_description: None,
            table_width,
            pending_width: None,
            resize: Debouncer::new(Duration::from_millis(config.display.resize_debounce_ms)),
            metrics: CellMetrics::new(),
            description_lines: config.display.description_lines,
            description_width_percent: config.display.description_width_percent,
            running: true,
        };
        app.update_validity();
        app
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Label of the search trigger.
    pub fn trigger_label(&self) -> &'static str {
        if self.search.is_loading {
            LOADING_LABEL
        } else {
            SEARCH_LABEL
        }
    }

    pub fn trigger_enabled(&self) -> bool {
        !self.search.is_loading
    }

    /// Replace the input text.
    pub fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
        self.update_validity();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.update_validity();
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.update_validity();
    }

    fn update_validity(&mut self) {
        if self.input.trim().is_empty() {
            self.validity.message = Some(REQUIRED_FIELD_MESSAGE);
        } else {
            self.validity = Validity::default();
        }
    }

    fn report_validity(&mut self) {
        self.update_validity();
        self.validity.reported = self.validity.message.is_some();
    }

    /// Validate the input and enter the loading state.
    ///
    /// Returns the resolved symbol to request, or `None` when the input is
    /// empty (the validity prompt is reported). Submitting from the keyboard
    /// is not blocked by an in-flight request; the disabled trigger is only
    /// shown.
    pub fn begin_search(&mut self) -> Option<String> {
        let symbol = self.input.trim().to_uppercase();
        if symbol.is_empty() {
            self.report_validity();
            return None;
        }

        tracing::info!(%symbol, "search started");
        self.search.symbol = symbol.clone();
        self.search.is_loading = true;
        self.search.error_message = None;
        self.ui.hide_all_tabs();
        Some(symbol)
    }

    /// Apply a finished request and restore the trigger.
    pub fn complete_search(&mut self, outcome: SearchOutcome) {
        let SearchOutcome { symbol, result } = outcome;
        self.set_input(&symbol);

        match result {
            Ok(data) => {
                tracing::info!(%symbol, "search succeeded");
                self.search.error_message = None;
                self.display_results(data);
                self.ui.results_visible = true;
            }
            Err(err) => {
                match &err {
                    FetchError::Server { status, message } => {
                        tracing::info!(%symbol, status, %message, "backend reported an error");
                    }
                    other => tracing::error!(%symbol, error = %other, "stock lookup failed"),
                }
                self.search.error_message = Some(err.user_message());
                self.ui.results_visible = false;
                self.ui.hide_all_tabs();
            }
        }

        self.search.is_loading = false;
    }

    /// Reset input, error and results.
    pub fn clear(&mut self) {
        self.set_input("");
        self.validity.reported = false;
        self.search.error_message = None;
        self.ui.results_visible = false;
        self.ui.hide_all_tabs();
    }

    /// Show `tab` and hide the other panel.
    pub fn select_tab(&mut self, tab: Tab) {
        self.ui.active_tab = Some(tab);

        let trimmed = self.input.trim();
        if !trimmed.is_empty() {
            let trimmed = trimmed.to_string();
            self.set_input(&trimmed);
        }
    }

    pub fn next_tab(&mut self) {
        if self.ui.results_visible {
            let tab = self.ui.active_tab.map_or(Tab::first(), Tab::next);
            self.select_tab(tab);
        }
    }

    pub fn previous_tab(&mut self) {
        if self.ui.results_visible {
            let tab = self.ui.active_tab.map_or(Tab::first(), Tab::previous);
            self.select_tab(tab);
        }
    }

    /// Render whichever tables the payload carries, then open the first tab.
    fn display_results(&mut self, data: StockResult) {
        if let Some(info) = &data.company_info {
            self.last_description = info.description.clone().filter(|d| !d.is_empty());
            let description = self.truncated_description();
            self.company_rows = Some(tables::company_rows(info, description));
        }

        if let Some(summary) = &data.stock_summary {
            self.summary_rows = Some(tables::summary_rows(summary));
        }

        self.select_tab(Tab::first());
    }

    /// Width the description is fitted into.
    pub fn description_width(&self) -> u16 {
        truncate::probe_width(self.table_width, self.description_width_percent)
    }

    fn truncated_description(&self) -> String {
        match &self.last_description {
            Some(description) => truncate::truncate_description(
                description,
                &self.metrics,
                self.description_width(),
                self.description_lines,
            ),
            None => String::new(),
        }
    }

    /// Record a terminal resize; the description is refitted once resizing
    /// has been quiet for the debounce period.
    pub fn on_resize(&mut self, table_width: u16, now: Instant) {
        self.pending_width = Some(table_width);
        self.resize.trigger(now);
    }

    /// Drive time-based work. Returns `true` when the screen changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.resize.poll(now) {
            return false;
        }
        if let Some(width) = self.pending_width.take() {
            self.table_width = width;
        }
        self.refit_description()
    }

    fn refit_description(&mut self) -> bool {
        if self.last_description.is_none() {
            return false;
        }
        let description = self.truncated_description();
        match self.company_rows.as_mut() {
            Some(rows) => {
                tables::set_description(rows, description);
                true
            }
            None => false,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }
}

impl<S: StockSource> App<S> {
    /// Run one full search cycle in place.
    pub async fn search(&mut self) {
        let Some(symbol) = self.begin_search() else {
            return;
        };
        let result = self.source.fetch_stock(&symbol).await;
        self.complete_search(SearchOutcome { symbol, result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FALLBACK_ERROR;
    use crate::models::{ChangeClass, CompanyInfo, StockSummary};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records requested symbols.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<StockResult, FetchError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn with(responses: Vec<Result<StockResult, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl StockSource for ScriptedSource {
        async fn fetch_stock(&self, symbol: &str) -> Result<StockResult, FetchError> {
            self.requests.lock().unwrap().push(symbol.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no response scripted".into())))
        }
    }

    fn aapl() -> StockResult {
        StockResult {
            company_info: Some(CompanyInfo {
                name: Some("Apple Inc.".into()),
                symbol: Some("AAPL".into()),
                exchange: Some("NASDAQ".into()),
                start_date: Some("1980-12-12".into()),
                description: Some("short".into()),
            }),
            stock_summary: Some(StockSummary {
                symbol: Some("AAPL".into()),
                trading_day: Some("2024-01-01".into()),
                prev_close: Some("100".into()),
                open: Some("101".into()),
                high: Some("105".into()),
                low: Some("99".into()),
                last: Some("104".into()),
                change: Some("+4".into()),
                change_percent: Some("+4.0%".into()),
                volume: Some("1000000".into()),
            }),
        }
    }

    fn app(responses: Vec<Result<StockResult, FetchError>>) -> App<ScriptedSource> {
        App::with_source(ScriptedSource::with(responses), &Config::default(), 100)
    }

    fn row<'a>(rows: &'a Option<Vec<TableRow>>, label: &str) -> &'a TableRow {
        rows.as_ref()
            .unwrap()
            .iter()
            .find(|r| r.label == label)
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_search_renders_both_tables() {
        let mut app = app(vec![Ok(aapl())]);
        app.set_input("  aapl ");
        app.search().await;

        assert_eq!(app.source().requests(), ["AAPL"]);
        assert_eq!(app.input, "AAPL");
        assert_eq!(app.search.error_message, None);
        assert!(app.ui.results_visible);
        assert_eq!(app.ui.active_tab, Some(Tab::Company));

        assert_eq!(row(&app.company_rows, "Company Name").value, "Apple Inc.");
        assert_eq!(row(&app.company_rows, "Description").value, "short");
        assert_eq!(row(&app.summary_rows, "Last Price").value, "104");
        assert_eq!(
            row(&app.summary_rows, "Change").class,
            Some(ChangeClass::Positive)
        );
        assert_eq!(
            row(&app.summary_rows, "Change Percent").class,
            Some(ChangeClass::Positive)
        );

        assert!(app.trigger_enabled());
        assert_eq!(app.trigger_label(), SEARCH_LABEL);
    }

    #[tokio::test]
    async fn test_server_error_is_shown() {
        let mut app = app(vec![Err(FetchError::Server {
            status: 404,
            message: "Symbol not found".into(),
        })]);
        app.set_input("zzzz");
        app.search().await;

        assert_eq!(app.input, "ZZZZ");
        assert_eq!(app.search.error_message.as_deref(), Some("Symbol not found"));
        assert!(!app.ui.results_visible);
        assert_eq!(app.ui.active_tab, None);
        assert!(app.trigger_enabled());
        assert_eq!(app.trigger_label(), SEARCH_LABEL);
    }

    #[tokio::test]
    async fn test_transport_error_uses_fallback_message() {
        let mut app = app(vec![Err(FetchError::Transport("connection refused".into()))]);
        app.set_input("msft");
        app.search().await;

        assert_eq!(app.search.error_message.as_deref(), Some(FALLBACK_ERROR));
        assert!(!app.ui.results_visible);
        assert!(app.trigger_enabled());
    }

    #[tokio::test]
    async fn test_empty_input_never_fetches() {
        for input in ["", "   ", "\t"] {
            let mut app = app(vec![Ok(aapl())]);
            app.set_input(input);
            app.search().await;

            assert!(app.source().requests().is_empty());
            assert!(app.validity.reported);
            assert_eq!(app.validity.message, Some(REQUIRED_FIELD_MESSAGE));
            assert!(!app.search.is_loading);
        }
    }

    #[test]
    fn test_begin_search_enters_loading_state() {
        let mut app = app(vec![]);
        app.search.error_message = Some("old".into());
        app.ui = UiState {
            active_tab: Some(Tab::Summary),
            results_visible: true,
        };
        app.set_input("ibm");

        assert_eq!(app.begin_search().as_deref(), Some("IBM"));
        assert!(app.search.is_loading);
        assert!(!app.trigger_enabled());
        assert_eq!(app.trigger_label(), LOADING_LABEL);
        assert_eq!(app.search.error_message, None);
        assert_eq!(app.ui.active_tab, None);

        // A second submission still goes out while the first is in flight.
        app.set_input("msft");
        assert_eq!(app.begin_search().as_deref(), Some("MSFT"));
        assert_eq!(app.trigger_label(), LOADING_LABEL);
    }

    #[test]
    fn test_last_outcome_wins() {
        let mut app = app(vec![]);
        app.set_input("aapl");
        let first = app.begin_search().unwrap();
        app.set_input("msft");
        let second = app.begin_search().unwrap();
        assert_eq!(app.search.symbol, "MSFT");

        // The later request answers first, the earlier one resolves last.
        app.complete_search(SearchOutcome {
            symbol: second,
            result: Err(FetchError::Server {
                status: 400,
                message: "Symbol not found".into(),
            }),
        });
        assert_eq!(app.search.error_message.as_deref(), Some("Symbol not found"));
        assert!(app.trigger_enabled());

        app.complete_search(SearchOutcome {
            symbol: first,
            result: Ok(aapl()),
        });

        assert_eq!(app.input, "AAPL");
        assert_eq!(app.search.error_message, None);
        assert!(app.ui.results_visible);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let mut app = app(vec![Ok(aapl()), Err(FetchError::Transport("x".into()))]);
        app.set_input("aapl");
        app.search().await;
        app.clear();
        assert_eq!(app.input, "");
        assert_eq!(app.search.error_message, None);
        assert!(!app.ui.results_visible);
        assert_eq!(app.ui.active_tab, None);

        app.set_input("aapl");
        app.search().await;
        app.clear();
        assert_eq!(app.search.error_message, None);
        assert!(!app.ui.results_visible);
        assert!(!app.validity.reported);
    }

    #[tokio::test]
    async fn test_tab_switching_is_exclusive() {
        let mut app = app(vec![Ok(aapl())]);
        app.set_input("aapl");
        app.search().await;

        app.select_tab(Tab::Summary);
        assert!(app.ui.is_panel_visible(Tab::Summary));
        assert!(!app.ui.is_panel_visible(Tab::Company));

        app.next_tab();
        assert_eq!(app.ui.active_tab, Some(Tab::Company));
        app.previous_tab();
        assert_eq!(app.ui.active_tab, Some(Tab::Summary));
    }

    #[test]
    fn test_select_tab_reasserts_trimmed_input() {
        let mut app = app(vec![]);
        app.set_input("  aapl  ");
        app.select_tab(Tab::Company);
        assert_eq!(app.input, "aapl");

        app.set_input("   ");
        app.select_tab(Tab::Company);
        assert_eq!(app.input, "   ");
    }

    #[tokio::test]
    async fn test_missing_sub_record_keeps_previous_panel() {
        let summary_only = StockResult {
            company_info: None,
            ..aapl()
        };
        let mut app = app(vec![Ok(aapl()), Ok(summary_only)]);
        app.set_input("aapl");
        app.search().await;
        app.search().await;

        assert_eq!(row(&app.company_rows, "Company Name").value, "Apple Inc.");
        assert_eq!(app.ui.active_tab, Some(Tab::Company));
    }

    #[tokio::test]
    async fn test_long_description_is_truncated_and_refit_on_resize() {
        let long = "word ".repeat(200);
        let mut data = aapl();
        data.company_info.as_mut().unwrap().description = Some(long.clone());

        let mut app = app(vec![Ok(data)]);
        app.set_input("aapl");
        app.search().await;

        let fitted = row(&app.company_rows, "Description").value.clone();
        assert!(fitted.ends_with(truncate::ELLIPSIS));
        assert!(truncate::wrap_lines(&fitted, app.description_width()).len() <= 5);
        assert_eq!(app.last_description.as_deref(), Some(long.as_str()));

        let start = Instant::now();
        app.on_resize(50, start);
        assert!(!app.tick(start + Duration::from_millis(100)));
        assert_eq!(app.table_width, 100);
        assert!(app.tick(start + Duration::from_millis(250)));
        assert_eq!(app.table_width, 50);

        let refit = row(&app.company_rows, "Description").value.clone();
        assert!(refit.len() < fitted.len());
        assert!(truncate::wrap_lines(&refit, app.description_width()).len() <= 5);
    }

    #[test]
    fn test_resize_without_description_is_noop() {
        let mut app = app(vec![]);
        let start = Instant::now();
        app.on_resize(40, start);
        assert!(!app.tick(start + Duration::from_secs(1)));
        assert_eq!(app.table_width, 40);
        assert!(app.company_rows.is_none());
    }

    #[test]
    fn test_validity_tracks_input() {
        let mut app = app(vec![]);
        assert_eq!(app.validity.message, Some(REQUIRED_FIELD_MESSAGE));
        app.push_char('a');
        assert_eq!(app.validity, Validity::default());
        app.pop_char();
        assert_eq!(app.validity.message, Some(REQUIRED_FIELD_MESSAGE));
        assert!(!app.validity.reported);
    }
}
