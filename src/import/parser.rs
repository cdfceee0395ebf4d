use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use thiserror::Error;

use super::row::{Cell, RawRecord};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,
}

/// Source format, chosen by filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn for_filename(filename: &str) -> Self {
        if filename.to_ascii_lowercase().ends_with(".csv") {
            SourceFormat::Delimited
        } else {
            SourceFormat::Spreadsheet
        }
    }
}

/// Parse an uploaded buffer into data records. The first row is the header
/// and the remaining rows are numbered from 2.
///
/// Delimited input skips only lines with no content at all, so a line of bare
/// delimiters stays a (blank) record. Spreadsheets skip rows whose cells are
/// all empty.
pub fn parse_upload(bytes: &[u8], filename: &str) -> Result<Vec<RawRecord>, ParseError> {
    let format = SourceFormat::for_filename(filename);
    let table = match format {
        SourceFormat::Delimited => read_delimited(bytes)?,
        SourceFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };
    Ok(into_records(table, format))
}

/// Header row plus data rows, before keying
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn read_delimited(bytes: &[u8]) -> Result<Table, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .byte_headers()?
        .iter()
        .map(|h| normalize_header(&String::from_utf8_lossy(h)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        // whitespace-only line
        if record.len() == 1 && record[0].iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|field| Cell::Text(String::from_utf8_lossy(field).trim().to_string()))
                .collect(),
        );
    }

    Ok(Table { headers, rows })
}

fn read_spreadsheet(bytes: &[u8]) -> Result<Table, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoWorksheet)?
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| match spreadsheet_cell(cell) {
                Cell::Text(s) => normalize_header(&s),
                Cell::Bool(b) => b.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    let rows = rows.map(|row| row.iter().map(spreadsheet_cell).collect()).collect();

    Ok(Table { headers, rows })
}

/// Numbers are read as their display text; whole floats drop the fraction
fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Text(String::new()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.trim().to_string()),
        Data::Int(i) => Cell::Text(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Cell::Text(format!("{}", *f as i64)),
        Data::Float(f) => Cell::Text(f.to_string()),
        Data::Error(_) => Cell::Text(String::new()),
        other => Cell::Text(other.to_string().trim().to_string()),
    }
}

fn into_records(table: Table, format: SourceFormat) -> Vec<RawRecord> {
    let Table { headers, rows } = table;

    rows.into_iter()
        .map(|row| {
            let mut cells: HashMap<String, Cell> = HashMap::with_capacity(headers.len());
            for (idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let cell = row.get(idx).cloned().unwrap_or_else(|| Cell::Text(String::new()));
                cells.insert(header.clone(), cell);
            }
            RawRecord::new(0, cells)
        })
        .filter(|record| format == SourceFormat::Delimited || !record.is_blank())
        .enumerate()
        .map(|(idx, record)| RawRecord { row_number: idx + 2, ..record })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
        record.cells.get(key).and_then(Cell::as_text)
    }

    #[test]
    fn csv_quoted_field_keeps_embedded_delimiter() {
        let csv = b"question_text,question_type,options\n\"Pick one\",mcq,\"A,B,C\"\n";
        let records = parse_upload(csv, "upload.csv").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "options"), Some("A,B,C"));
        assert_eq!(text(&records[0], "question_type"), Some("mcq"));
    }

    #[test]
    fn csv_headers_are_normalized_and_values_trimmed() {
        let csv = b" Question_Text , TYPE \n  What is your name?  , text \n";
        let records = parse_upload(csv, "UPLOAD.CSV").unwrap();

        assert_eq!(text(&records[0], "question_text"), Some("What is your name?"));
        assert_eq!(text(&records[0], "type"), Some("text"));
    }

    #[test]
    fn row_numbers_start_at_two_and_skip_empty_lines() {
        let csv = b"label,type\nFirst,text\n\n   \nSecond,number\nThird,date\n";
        let records = parse_upload(csv, "q.csv").unwrap();

        let numbers: Vec<_> = records.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(text(&records[1], "label"), Some("Second"));
    }

    #[test]
    fn csv_delimiter_only_line_is_kept_as_a_blank_record() {
        let csv = b"label,type\nFirst,text\n,\nThird,text\n";
        let records = parse_upload(csv, "q.csv").unwrap();

        let numbers: Vec<_> = records.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert!(records[1].is_blank());
        assert_eq!(text(&records[2], "label"), Some("Third"));
    }

    #[test]
    fn spreadsheet_rows_with_only_empty_cells_are_dropped() {
        let headers = vec!["label".to_string(), "type".to_string()];
        let rows = vec![
            vec![Cell::Text("First".to_string()), Cell::Text("text".to_string())],
            vec![Cell::Text(String::new()), Cell::Text(String::new())],
            vec![Cell::Text("Third".to_string()), Cell::Text("text".to_string())],
        ];
        let records = into_records(Table { headers, rows }, SourceFormat::Spreadsheet);

        let numbers: Vec<_> = records.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(text(&records[1], "label"), Some("Third"));
    }

    #[test]
    fn short_rows_fill_missing_cells_with_empty_text() {
        let csv = b"label,type,placeholder\nOnly label\n";
        let records = parse_upload(csv, "q.csv").unwrap();

        assert_eq!(text(&records[0], "type"), Some(""));
        assert_eq!(text(&records[0], "placeholder"), Some(""));
    }

    #[test]
    fn header_only_file_yields_no_records() {
        assert!(parse_upload(b"question_text,question_type\n", "q.csv").unwrap().is_empty());
        assert!(parse_upload(b"", "q.csv").unwrap().is_empty());
    }

    #[test]
    fn utf8_bom_is_stripped_from_first_header() {
        let csv = "\u{feff}question_text,question_type\nName?,text\n".as_bytes();
        let records = parse_upload(csv, "q.csv").unwrap();
        assert_eq!(text(&records[0], "question_text"), Some("Name?"));
    }

    #[test]
    fn non_csv_suffix_selects_spreadsheet_reader() {
        assert_eq!(SourceFormat::for_filename("a.xlsx"), SourceFormat::Spreadsheet);
        assert_eq!(SourceFormat::for_filename("a.xls"), SourceFormat::Spreadsheet);
        assert_eq!(SourceFormat::for_filename("a.Csv"), SourceFormat::Delimited);
        assert!(parse_upload(b"not a workbook", "a.xlsx").is_err());
    }

    #[test]
    fn spreadsheet_numbers_render_as_text() {
        assert_eq!(spreadsheet_cell(&Data::Float(1.0)), Cell::Text("1".to_string()));
        assert_eq!(spreadsheet_cell(&Data::Float(2.5)), Cell::Text("2.5".to_string()));
        assert_eq!(spreadsheet_cell(&Data::Int(0)), Cell::Text("0".to_string()));
        assert_eq!(spreadsheet_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Text(String::new()));
    }
}
