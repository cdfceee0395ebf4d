use std::collections::HashMap;

/// A single cell as read from the upload
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Bool(_) => None,
        }
    }

    fn into_text(self) -> String {
        match self {
            Cell::Text(s) => s,
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// One data row keyed by normalized (lower-cased, trimmed) header name
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based position in the source file; the first data row is 2
    pub row_number: usize,
    pub cells: HashMap<String, Cell>,
}

impl RawRecord {
    pub fn new(row_number: usize, cells: HashMap<String, Cell>) -> Self {
        Self { row_number, cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_blank)
    }

    /// First alias with a non-empty value wins
    fn take_first(&mut self, aliases: &[&str]) -> Option<Cell> {
        for alias in aliases {
            if let Some(cell) = self.cells.remove(*alias) {
                if !cell.is_blank() {
                    return Some(cell);
                }
            }
        }
        None
    }
}

/// Logical column and the header names that map onto it, in priority order
pub struct ColumnAlias {
    pub column: Column,
    pub headers: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Text,
    Type,
    Options,
    Required,
    Placeholder,
}

pub const COLUMN_ALIASES: &[ColumnAlias] = &[
    ColumnAlias { column: Column::Text, headers: &["question_text", "label", "question"] },
    ColumnAlias { column: Column::Type, headers: &["question_type", "type"] },
    ColumnAlias { column: Column::Options, headers: &["options"] },
    ColumnAlias { column: Column::Required, headers: &["required"] },
    ColumnAlias { column: Column::Placeholder, headers: &["placeholder"] },
];

/// A raw record resolved through the alias table, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub row_number: usize,
    pub text: String,
    /// Empty when no type column had a value
    pub question_type: String,
    pub options: String,
    /// `None` when the file has no `required` column at all
    pub required: Option<Cell>,
    pub placeholder: String,
}

impl From<RawRecord> for CandidateRow {
    fn from(mut record: RawRecord) -> Self {
        let mut value_of = |column: Column| -> String {
            record
                .take_first(headers_for(column))
                .map(Cell::into_text)
                .unwrap_or_default()
        };

        let text = value_of(Column::Text);
        let question_type = value_of(Column::Type);
        let options = value_of(Column::Options);
        let placeholder = value_of(Column::Placeholder);

        // a present but blank `required` cell still counts as present
        let required = headers_for(Column::Required)
            .iter()
            .find_map(|h| record.cells.remove(*h));

        CandidateRow {
            row_number: record.row_number,
            text,
            question_type,
            options,
            required,
            placeholder,
        }
    }
}

fn headers_for(column: Column) -> &'static [&'static str] {
    COLUMN_ALIASES
        .iter()
        .find(|alias| alias.column == column)
        .map(|alias| alias.headers)
        .unwrap_or(&[])
}
