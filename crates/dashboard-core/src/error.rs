use std::path::PathBuf;
use thiserror::Error;

/// The input could not be opened, or lacks a required table or column.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// The configured workbook / directory does not exist.
    #[error("Data source not found: {0}")]
    NotFound(PathBuf),

    /// The path exists but is neither a supported workbook nor a directory.
    #[error("Unsupported data source: {0}")]
    Unsupported(PathBuf),

    /// The workbook container itself could not be decoded.
    #[error("Failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// A CSV table could not be decoded.
    #[error("Failed to read CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A required sheet / table is absent from the source.
    #[error("Missing required table '{0}'")]
    MissingTable(String),

    /// A table has no header row at all.
    #[error("Table '{0}' has no header row")]
    EmptyTable(String),

    /// A required column is absent from a table's header row.
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// A cell value could not be turned into a typed record field.
///
/// `row` is the 1-based sheet row; the header occupies row 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataFormatError {
    #[error("{table} row {row}, column '{column}': unparseable date '{value}'")]
    InvalidDate {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{table} row {row}, column '{column}': non-numeric value '{value}'")]
    InvalidNumber {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{table} row {row}, column '{column}': negative value {value}")]
    NegativeValue {
        table: String,
        row: usize,
        column: String,
        value: f64,
    },

    #[error("{table} row {row}, column '{column}': missing value")]
    MissingValue {
        table: String,
        row: usize,
        column: String,
    },

    #[error("{table} row {row}: duplicate ProductID '{id}'")]
    DuplicateKey { table: String, row: usize, id: String },
}

/// All errors produced by the inventory dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Source(#[from] DataSourceError),

    #[error(transparent)]
    Format(#[from] DataFormatError),
}

impl DashboardError {
    /// `true` for errors caused by the shape of the input rather than its content.
    pub fn is_source_error(&self) -> bool {
        matches!(self, DashboardError::Source(_))
    }

    /// `true` for errors caused by an individual cell value.
    pub fn is_format_error(&self) -> bool {
        matches!(self, DashboardError::Format(_))
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
