//! Terminal user interface with ratatui.

use crate::app::App;
use crate::config::{parse_color, ColorConfig};
use crate::models::{ChangeClass, Tab};
use crate::tables::{TableRow, DESCRIPTION_LABEL};
use crate::truncate::wrap_lines;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Colors for the UI.
pub struct UiColors {
    pub positive: Color,
    pub negative: Color,
    pub header: Color,
    pub border: Color,
    pub muted: Color,
}

impl UiColors {
    pub fn from_config(colors: &ColorConfig) -> Self {
        let defaults = ColorConfig::default();
        Self {
            positive: parse_color(&colors.positive, &defaults.positive),
            negative: parse_color(&colors.negative, &defaults.negative),
            header: parse_color(&colors.header, &defaults.header),
            border: parse_color(&colors.border, &defaults.border),
            muted: Color::DarkGray,
        }
    }

    fn for_class(&self, class: Option<ChangeClass>) -> Style {
        match class {
            Some(ChangeClass::Positive) => Style::default().fg(self.positive),
            Some(ChangeClass::Negative) => Style::default().fg(self.negative),
            None => Style::default(),
        }
    }
}

impl Default for UiColors {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default())
    }
}

/// Width of the result tables for a terminal `cols` wide (panel borders
/// take one cell on each side).
pub fn table_width(cols: u16) -> u16 {
    cols.saturating_sub(2)
}

/// Render the main UI.
pub fn render<S>(frame: &mut Frame, app: &App<S>, colors: &UiColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Validity / error banner
            Constraint::Min(8),    // Results
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_title(frame, chunks[0], colors);
    render_search_bar(frame, app, chunks[1], colors);
    render_banner(frame, app, chunks[2], colors);
    if app.ui.results_visible {
        render_results(frame, app, chunks[3], colors);
    }
    render_footer(frame, chunks[4], colors);
}

fn render_title(frame: &mut Frame, area: Rect, colors: &UiColors) {
    let title = Line::from(vec![
        Span::styled(
            "STOCKLENS ",
            Style::default()
                .fg(colors.header)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("- Stock Search"),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// Input box with the Search and Clear indicators.
fn render_search_bar<S>(frame: &mut Frame, app: &App<S>, area: Rect, colors: &UiColors) {
    let block = Block::default()
        .title(" Enter Stock Ticker Symbol ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(26)])
        .split(inner);

    frame.render_widget(Paragraph::new(app.input.as_str()), parts[0]);

    let search_style = if app.trigger_enabled() {
        Style::default()
            .fg(colors.header)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.muted)
    };
    let buttons = Line::from(vec![
        Span::styled(format!("[ {} ]", app.trigger_label()), search_style),
        Span::raw(" "),
        Span::styled("[ Clear ]", Style::default().fg(colors.header)),
    ]);
    frame.render_widget(Paragraph::new(buttons), parts[1]);

    let typed = app.input.width() as u16;
    let cursor_x = parts[0].x + typed.min(parts[0].width.saturating_sub(1));
    frame.set_cursor_position((cursor_x, parts[0].y));
}

/// One-line banner: the reported validity prompt or the search error.
fn render_banner<S>(frame: &mut Frame, app: &App<S>, area: Rect, colors: &UiColors) {
    let line = if let Some(error) = &app.search.error_message {
        Line::from(Span::styled(error.as_str(), Style::default().fg(colors.negative)))
    } else if app.validity.reported {
        match app.validity.message {
            Some(message) => Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
            None => Line::default(),
        }
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn render_results<S>(frame: &mut Frame, app: &App<S>, area: Rect, colors: &UiColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let titles = Tab::ALL.iter().map(|t| format!(" {} ", t.title()));
    let mut tabs = Tabs::new(titles)
        .style(Style::default().fg(colors.muted))
        .highlight_style(
            Style::default()
                .fg(colors.header)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    if let Some(tab) = app.ui.active_tab {
        tabs = tabs.select(tab.index());
    }
    frame.render_widget(tabs, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let Some(tab) = app.ui.active_tab.filter(|t| app.ui.is_panel_visible(*t)) else {
        frame.render_widget(block, chunks[1]);
        return;
    };

    let rows = match tab {
        Tab::Company => app.company_rows.as_deref(),
        Tab::Summary => app.summary_rows.as_deref(),
    };
    let block = block.title(format!(" {} - {} ", tab.title(), app.search.symbol));

    match rows {
        Some(rows) => {
            let table = result_table(rows, app.description_width(), colors).block(block);
            frame.render_widget(table, chunks[1]);
        }
        None => frame.render_widget(block, chunks[1]),
    }
}

/// Two-column label/value table. The value column is as wide as the
/// description probe so the fitted description lays out the same way.
fn result_table<'a>(rows: &'a [TableRow], value_width: u16, colors: &UiColors) -> Table<'a> {
    let rows = rows.iter().map(|row| {
        let label = Cell::from(row.label).style(Style::default().add_modifier(Modifier::BOLD));
        if row.label == DESCRIPTION_LABEL {
            let lines: Vec<Line> = wrap_lines(&row.value, value_width)
                .into_iter()
                .map(Line::from)
                .collect();
            let height = lines.len() as u16;
            Row::new(vec![label, Cell::from(Text::from(lines))]).height(height)
        } else {
            let value = Cell::from(row.value.as_str()).style(colors.for_class(row.class));
            Row::new(vec![label, value])
        }
    });

    Table::new(rows, [Constraint::Min(0), Constraint::Length(value_width)]).column_spacing(0)
}

/// Render the footer with keybindings.
fn render_footer(frame: &mut Frame, area: Rect, colors: &UiColors) {
    let key = Style::default().fg(Color::Yellow);
    let footer = Line::from(vec![
        Span::styled(" Enter", key),
        Span::raw(":search "),
        Span::styled("Ctrl+L", key),
        Span::raw(":clear "),
        Span::styled("Tab/←→", key),
        Span::raw(":switch tab "),
        Span::styled("F1/F2", key),
        Span::raw(":company/summary "),
        Span::styled("Esc", key),
        Span::raw(":quit"),
    ]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(colors.muted)),
        area,
    );
}

/// Plain-text rendering of the screen state for batch mode.
pub fn format_batch<S>(app: &App<S>) -> String {
    let mut out = String::new();

    if app.validity.reported {
        if let Some(message) = app.validity.message {
            out.push_str(message);
            out.push('\n');
        }
    }
    if let Some(error) = &app.search.error_message {
        out.push_str(error);
        out.push('\n');
    }
    if !app.ui.results_visible {
        return out;
    }

    let panels = [
        (Tab::Company, app.company_rows.as_deref()),
        (Tab::Summary, app.summary_rows.as_deref()),
    ];
    for (tab, rows) in panels {
        let Some(rows) = rows else { continue };
        out.push_str(&format!("\n{}\n{}\n", tab.title(), "-".repeat(tab.title().len())));
        for row in rows {
            let lines = if row.label == DESCRIPTION_LABEL {
                wrap_lines(&row.value, app.description_width())
            } else {
                vec![row.value.clone()]
            };
            for (i, line) in lines.iter().enumerate() {
                let label = if i == 0 { row.label } else { "" };
                let text = format!("{:<26} {}", label, line);
                out.push_str(text.trim_end());
                out.push('\n');
            }
        }
    }

    out
}

/// Render batch mode output (non-interactive).
pub fn render_batch<S>(app: &App<S>) {
    use chrono::Local;

    println!(
        "=== STOCKLENS {} ===",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    print!("{}", format_batch(app));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchOutcome;
    use crate::config::Config;
    use crate::models::{CompanyInfo, StockResult, StockSummary};

    fn finished_app(result: StockResult) -> App<()> {
        let mut app = App::with_source((), &Config::default(), 100);
        app.set_input("aapl");
        let symbol = app.begin_search().unwrap();
        app.complete_search(SearchOutcome {
            symbol,
            result: Ok(result),
        });
        app
    }

    #[test]
    fn test_table_width() {
        assert_eq!(table_width(80), 78);
        assert_eq!(table_width(1), 0);
    }

    #[test]
    fn test_format_batch_tables() {
        let app = finished_app(StockResult {
            company_info: Some(CompanyInfo {
                name: Some("Apple Inc.".into()),
                ..Default::default()
            }),
            stock_summary: Some(StockSummary {
                change: Some("-1.23".into()),
                ..Default::default()
            }),
        });

        let out = format_batch(&app);
        assert!(out.contains("Company Outlook\n---------------\n"));
        assert!(out.contains(&format!("{:<26} {}\n", "Company Name", "Apple Inc.")));
        assert!(out.contains("Stock Summary\n"));
        assert!(out.contains(&format!("{:<26} {}\n", "Change", "-1.23")));
        assert!(out.contains("Description\n"));
    }

    #[test]
    fn test_format_batch_validity_prompt() {
        let mut app = App::with_source((), &Config::default(), 100);
        assert_eq!(app.begin_search(), None);
        assert_eq!(format_batch(&app), "Please fill out this field.\n");
    }

    #[test]
    fn test_colors_fall_back_on_invalid_config() {
        let colors = UiColors::from_config(&ColorConfig {
            positive: "bogus".into(),
            ..Default::default()
        });
        assert_eq!(colors.positive, Color::Rgb(0, 255, 0));
        assert_eq!(colors.for_class(Some(ChangeClass::Negative)).fg, Some(Color::Rgb(255, 0, 0)));
    }
}
