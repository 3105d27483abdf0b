//! Height-driven truncation of the company description.
//!
//! The description has to fit a fixed number of rendered lines. Rather than
//! guessing from a character count, candidates are laid out through a
//! [`TextMetrics`] implementation and the longest prefix that still fits is
//! found with a binary search.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Appended to a cut description.
pub const ELLIPSIS: &str = "...";

/// Measures the rendered height of text laid out at a given width.
pub trait TextMetrics {
    /// Height of a single line.
    fn line_height(&self) -> u16;

    /// Height of `text` when laid out `width` cells wide.
    fn measure_height(&self, text: &str, width: u16) -> u32;
}

/// Terminal cell metrics: one cell row per wrapped line.
#[derive(Debug, Clone, Copy)]
pub struct CellMetrics {
    line_height: u16,
}

impl CellMetrics {
    pub fn new() -> Self {
        Self { line_height: 1 }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMetrics for CellMetrics {
    fn line_height(&self) -> u16 {
        self.line_height
    }

    fn measure_height(&self, text: &str, width: u16) -> u32 {
        wrap_lines(text, width).len() as u32 * u32::from(self.line_height)
    }
}

/// Greedily word-wrap `text` to `width` terminal cells.
///
/// Widths are display widths, so wide (CJK, emoji) characters take two
/// cells. Whitespace runs collapse to a single space, explicit newlines start
/// a new line and words wider than the line are broken between characters.
/// Empty input yields one empty line.
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut col = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if col > 0 && col + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                col += 1 + word_width;
                continue;
            }
            if col > 0 {
                lines.push(std::mem::take(&mut current));
                col = 0;
            }

            for c in word.chars() {
                let cells = c.width().unwrap_or(0);
                if col > 0 && col + cells > width {
                    lines.push(std::mem::take(&mut current));
                    col = 0;
                }
                current.push(c);
                col += cells;
            }
        }

        lines.push(current);
    }

    lines
}

/// Share of the reference table width given to the description probe.
pub fn probe_width(table_width: u16, width_percent: u16) -> u16 {
    let percent = u32::from(width_percent.min(100));
    (u32::from(table_width) * percent / 100) as u16
}

/// Fit `description` into `line_count` lines at `width`.
///
/// Returns the text unchanged when it already fits. Otherwise returns the
/// longest character prefix that fits once [`ELLIPSIS`] is appended, or an
/// empty string when not even the bare ellipsis fits.
pub fn truncate_description<M: TextMetrics>(
    description: &str,
    metrics: &M,
    width: u16,
    line_count: u16,
) -> String {
    if description.is_empty() {
        return String::new();
    }

    let max_height = u32::from(metrics.line_height()) * u32::from(line_count);
    if metrics.measure_height(description, width) <= max_height {
        return description.to_string();
    }

    let chars: Vec<char> = description.chars().collect();
    let mut start = 0usize;
    let mut end = chars.len();
    let mut best_fit = String::new();

    while start <= end {
        let mid = start + (end - start) / 2;
        let mut candidate: String = chars[..mid].iter().collect();
        candidate.push_str(ELLIPSIS);

        if metrics.measure_height(&candidate, width) <= max_height {
            best_fit = candidate;
            start = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            end = mid - 1;
        }
    }

    best_fit
}
