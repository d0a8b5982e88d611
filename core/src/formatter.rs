//! Rendering helpers for content extracted by document analysis.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    ColumnHeader,
    RowHeader,
    #[default]
    #[serde(other)]
    Data,
}

impl CellKind {
    fn tag(self) -> &'static str {
        match self {
            Self::ColumnHeader | Self::RowHeader => "th",
            Self::Data => "td",
        }
    }
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row_index: usize,
    pub column_index: usize,
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub column_span: usize,
    #[serde(default)]
    pub kind: CellKind,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub row_count: usize,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// Render a table as a flat HTML `<table>`, one `<tr>` per row index.
pub fn table_to_html(table: &Table) -> String {
    let mut html = String::from("<table>");

    for row in 0..table.row_count {
        let mut cells: Vec<&Cell> = table.cells.iter().filter(|c| c.row_index == row).collect();
        cells.sort_by_key(|c| c.column_index);

        html.push_str("<tr>");
        for cell in cells {
            let tag = cell.kind.tag();
            let _ = write!(html, "<{tag}");
            if cell.column_span > 1 {
                let _ = write!(html, " colSpan={}", cell.column_span);
            }
            if cell.row_span > 1 {
                let _ = write!(html, " rowSpan={}", cell.row_span);
            }
            let _ = write!(html, ">{}</{tag}>", escape_html(&cell.content));
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn text_to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
