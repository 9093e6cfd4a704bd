//! Table sources for the dashboard.
//!
//! A source hands out named tables as untyped [`RawTable`]s. Workbooks
//! (`.xlsx`, `.xls`, `.ods`, ...) are read with `calamine`; a directory of
//! `<table>.csv` files is read with the `csv` crate. Typing and validation
//! happen later in [`crate::loader`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::NaiveDateTime;
use dashboard_core::error::{DataSourceError, Result};
use tracing::{debug, warn};

/// File extensions handled by [`WorkbookSource`].
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ── Cells and tables ──────────────────────────────────────────────────────────

/// A single untyped cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A spreadsheet error cell such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell the way it should appear in an error message.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data row together with its 1-based position in the source sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<CellValue>,
}

/// An in-memory table: header names plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Build a table whose rows start directly below a header on line 1.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow { line: i + 2, cells })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Position of `column` in the header row.
    pub fn column_index(&self, column: &str) -> std::result::Result<usize, DataSourceError> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataSourceError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell at `col` in `row`; short rows read as empty.
    pub fn cell<'a>(&self, row: &'a RawRow, col: usize) -> &'a CellValue {
        row.cells.get(col).unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── TableSource ───────────────────────────────────────────────────────────────

/// Anything that can produce named tables.
pub trait TableSource {
    /// Human-readable description used in logs and the UI header.
    fn describe(&self) -> String;

    /// Names of the tables this source offers.
    fn table_names(&self) -> Vec<String>;

    /// Read one table, failing with [`DataSourceError::MissingTable`] if absent.
    fn read_table(&mut self, name: &str) -> Result<RawTable>;
}

/// Open the source at `path`: a directory becomes a [`CsvDirectorySource`],
/// a file with a workbook extension a [`WorkbookSource`].
pub fn open_source(path: &Path) -> Result<Box<dyn TableSource>> {
    if !path.exists() {
        return Err(DataSourceError::NotFound(path.to_path_buf()).into());
    }

    if path.is_dir() {
        debug!("Opening CSV directory {}", path.display());
        return Ok(Box::new(CsvDirectorySource::new(path)));
    }

    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| WORKBOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    if is_workbook {
        debug!("Opening workbook {}", path.display());
        Ok(Box::new(WorkbookSource::open(path)?))
    } else {
        Err(DataSourceError::Unsupported(path.to_path_buf()).into())
    }
}

// ── WorkbookSource ────────────────────────────────────────────────────────────

/// Spreadsheet workbook read through `calamine`. Each sheet is a table.
pub struct WorkbookSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path).map_err(|e| DataSourceError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl TableSource for WorkbookSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn table_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_table(&mut self, name: &str) -> Result<RawTable> {
        if !self.workbook.sheet_names().iter().any(|s| s == name) {
            return Err(DataSourceError::MissingTable(name.to_string()).into());
        }

        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| DataSourceError::Workbook {
                path: self.path.clone(),
                message: format!("sheet '{}': {}", name, e),
            })?;

        // Sheet row of the first cell in the used range (0-based).
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| convert_cell(c).display().trim().to_string())
                .collect(),
            None => return Err(DataSourceError::EmptyTable(name.to_string()).into()),
        };

        let mut rows = Vec::new();
        let mut skipped_blank = 0usize;
        for (i, row) in rows_iter.enumerate() {
            let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
            if cells.iter().all(CellValue::is_blank) {
                skipped_blank += 1;
                continue;
            }
            rows.push(RawRow {
                // header is at first_row + 1 (1-based), data follows
                line: first_row + i + 2,
                cells,
            });
        }

        if skipped_blank > 0 {
            debug!("Sheet '{}': skipped {} blank rows", name, skipped_blank);
        }

        Ok(RawTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

/// Convert a calamine cell into a [`CellValue`].
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Text(dt.to_string()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{e:?}")),
    }
}

// ── CsvDirectorySource ────────────────────────────────────────────────────────

/// A directory in which every table is stored as `<name>.csv`.
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

impl TableSource for CsvDirectorySource {
    fn describe(&self) -> String {
        format!("{} (csv)", self.dir.display())
    }

    fn table_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            warn!("Could not list {}", self.dir.display());
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
            })
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        names.sort();
        names
    }

    fn read_table(&mut self, name: &str) -> Result<RawTable> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(DataSourceError::MissingTable(name.to_string()).into());
        }

        let csv_err = |e: csv::Error| DataSourceError::Csv {
            path: path.clone(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(csv_err)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(DataSourceError::EmptyTable(name.to_string()).into());
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let cells: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);
            rows.push(RawRow { line, cells });
        }

        debug!("CSV table '{}': {} rows", name, rows.len());

        Ok(RawTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
