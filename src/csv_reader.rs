use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{VizError, VizResult};

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin()).context("Failed to read CSV from stdin")
}

pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
    read_csv(file).with_context(|| format!("Failed to read dataset '{}'", path.display()))
}

pub fn read_csv<R: Read>(source: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

/// Locate a column by name, ignoring ASCII case and surrounding whitespace.
pub fn find_column(data: &CsvData, name: &str) -> VizResult<usize> {
    let wanted = name.trim();
    data.headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| VizError::MissingColumn {
            column: wanted.to_string(),
            available: data.headers.join(", "),
        })
}

/// Borrow a cell, treating short rows as empty cells.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn csv_from_string(content: &str) -> Result<CsvData> {
        read_csv(Cursor::new(content))
    }

    #[test]
    fn test_read_csv_basic() {
        let csv = csv_from_string("Age,Do you have Depression?\n18,Yes\n21,No").unwrap();
        assert_eq!(csv.headers, vec!["Age", "Do you have Depression?"]);
        assert_eq!(csv.rows.len(), 2);
        assert_eq!(csv.rows[1], vec!["21", "No"]);
    }

    #[test]
    fn test_read_csv_trims_headers() {
        let csv = csv_from_string(" Age ,Choose your gender\n19,Male").unwrap();
        assert_eq!(csv.headers, vec!["Age", "Choose your gender"]);
    }

    #[test]
    fn test_read_csv_empty_data() {
        let result = csv_from_string("x,y\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least one data row"));
    }

    #[test]
    fn test_read_csv_short_row() {
        let result = csv_from_string("x,y,z\n1,10,100\n2,20");
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("record"));
    }

    #[test]
    fn test_read_csv_quoted_commas() {
        let csv = csv_from_string("gpa,age\n\"3.00 - 3.49\",20\n").unwrap();
        assert_eq!(csv.rows[0][0], "3.00 - 3.49");
    }

    #[test]
    fn test_find_column_case_insensitive() {
        let csv = csv_from_string("What is your CGPA?,Age\n3.00 - 3.49,20").unwrap();
        assert_eq!(find_column(&csv, "what is your cgpa?").unwrap(), 0);
        assert_eq!(find_column(&csv, "  AGE ").unwrap(), 1);
    }

    #[test]
    fn test_find_column_missing() {
        let csv = csv_from_string("x,y\n1,10").unwrap();
        let err = find_column(&csv, "Age").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("x, y"));
    }

    #[test]
    fn test_read_csv_from_missing_path() {
        let result = read_csv_from_path(Path::new("does/not/exist.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to open dataset"));
    }
}
