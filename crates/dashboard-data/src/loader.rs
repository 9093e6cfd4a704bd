//! Loading and joining the product dimension and inventory fact tables.
//!
//! The result is an immutable [`InventoryDataset`] that every aggregation
//! borrows; it is built once per process.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashboard_core::error::{DataFormatError, Result};
use dashboard_core::models::{GroupKey, InventoryFact, InventoryRecord, Product, ProductId};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::reader::{open_source, CellValue, RawRow, RawTable, TableSource};

pub const COL_PRODUCT_ID: &str = "ProductID";
pub const COL_PRODUCT_NAME: &str = "ProductName";
pub const COL_CATEGORY: &str = "Category";
pub const COL_DATE: &str = "Date";
pub const COL_OPENING_STOCK: &str = "OpeningStock";
pub const COL_CLOSING_STOCK: &str = "ClosingStock";
pub const COL_STOCK_USED: &str = "StockUsed";
pub const COL_STOCK_RECEIVED: &str = "StockReceived";
pub const COL_STOCKOUT_DAYS: &str = "StockoutDays";
pub const COL_TURNOVER: &str = "Invt TO";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// `1,200` or `12,345,678.5`; any other comma placement is not a number.
static THOUSANDS_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("regex is valid"));

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Counts gathered while loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    /// Description of where the data came from.
    pub source: String,
    /// Rows in the product dimension table.
    pub products: usize,
    /// Rows in the fact table (and therefore in the joined set).
    pub records: usize,
    /// Fact rows whose ProductID had no dimension row.
    pub unmatched_records: usize,
    /// Distinct calendar months covered.
    pub months: usize,
    /// Wall-clock seconds spent reading and joining.
    pub load_time_seconds: f64,
}

/// The joined, validated record set.
#[derive(Debug, Clone)]
pub struct InventoryDataset {
    records: Vec<InventoryRecord>,
    summary: LoadSummary,
}

impl InventoryDataset {
    /// Wrap already-joined records (mainly for tests and embedding).
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let summary = LoadSummary {
            source: "in-memory".to_string(),
            products: 0,
            records: records.len(),
            unmatched_records: records.iter().filter(|r| r.product_name.is_none()).count(),
            months: distinct_months(&records),
            load_time_seconds: 0.0,
        };
        Self { records, summary }
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Open `path` and load the two named tables from it.
pub fn load_from_path(path: &Path, product_table: &str, fact_table: &str) -> Result<InventoryDataset> {
    let mut source = open_source(path)?;
    load_inventory(source.as_mut(), product_table, fact_table)
}

/// Read both tables from `source`, validate them and left-join facts to
/// products on ProductID.
pub fn load_inventory(
    source: &mut dyn TableSource,
    product_table: &str,
    fact_table: &str,
) -> Result<InventoryDataset> {
    let start = Instant::now();
    let description = source.describe();

    let known: Vec<String> = source.table_names();
    for name in &known {
        if name != product_table && name != fact_table {
            debug!("Ignoring extra table '{}' in {}", name, description);
        }
    }

    let product_raw = source.read_table(product_table)?;
    let fact_raw = source.read_table(fact_table)?;

    let products = parse_products(&product_raw)?;
    let facts = parse_facts(&fact_raw)?;
    let fact_count = facts.len();

    let known_ids: HashSet<&ProductId> = products.iter().map(|p| &p.id).collect();
    let unmatched = facts.iter().filter(|f| !known_ids.contains(&f.product_id)).count();

    let records = join_records(facts, &products);
    debug_assert_eq!(records.len(), fact_count);

    if unmatched > 0 {
        warn!(
            "{} of {} fact rows have no matching product; grouped as {}",
            unmatched,
            records.len(),
            GroupKey::UNKNOWN_LABEL
        );
    }

    let summary = LoadSummary {
        source: description,
        products: products.len(),
        records: records.len(),
        unmatched_records: unmatched,
        months: distinct_months(&records),
        load_time_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        "Loaded {} records ({} products, {} months) from {} in {:.3}s",
        summary.records, summary.products, summary.months, summary.source, summary.load_time_seconds
    );

    Ok(InventoryDataset { records, summary })
}

// ── Table parsing ─────────────────────────────────────────────────────────────

/// Parse the product dimension table. ProductIDs must be present and unique.
pub fn parse_products(table: &RawTable) -> Result<Vec<Product>> {
    let id_col = table.column_index(COL_PRODUCT_ID)?;
    let name_col = table.column_index(COL_PRODUCT_NAME)?;
    let category_col = table.column_index(COL_CATEGORY)?;

    let mut seen: HashMap<ProductId, usize> = HashMap::with_capacity(table.len());
    let mut products = Vec::with_capacity(table.len());

    for row in &table.rows {
        let id = product_id_field(table, row, id_col)?;
        if seen.insert(id.clone(), row.line).is_some() {
            return Err(DataFormatError::DuplicateKey {
                table: table.name.clone(),
                row: row.line,
                id: id.to_string(),
            }
            .into());
        }
        products.push(Product {
            id,
            name: text_field(table.cell(row, name_col)),
            category: text_field(table.cell(row, category_col)),
        });
    }

    debug!("Parsed {} products from '{}'", products.len(), table.name);
    Ok(products)
}

/// Parse and validate the inventory fact table.
pub fn parse_facts(table: &RawTable) -> Result<Vec<InventoryFact>> {
    let id_col = table.column_index(COL_PRODUCT_ID)?;
    let date_col = table.column_index(COL_DATE)?;
    let opening_col = table.column_index(COL_OPENING_STOCK)?;
    let closing_col = table.column_index(COL_CLOSING_STOCK)?;
    let used_col = table.column_index(COL_STOCK_USED)?;
    let received_col = table.column_index(COL_STOCK_RECEIVED)?;
    let stockout_col = table.column_index(COL_STOCKOUT_DAYS)?;
    let turnover_col = table.column_index(COL_TURNOVER)?;

    let mut facts = Vec::with_capacity(table.len());
    for row in &table.rows {
        facts.push(InventoryFact {
            product_id: product_id_field(table, row, id_col)?,
            date: date_field(table, row, date_col)?,
            opening_stock: quantity_field(table, row, opening_col)?,
            closing_stock: quantity_field(table, row, closing_col)?,
            stock_used: quantity_field(table, row, used_col)?,
            stock_received: quantity_field(table, row, received_col)?,
            stockout_days: day_count_field(table, row, stockout_col)?,
            turnover: quantity_field(table, row, turnover_col)?,
        });
    }

    debug!("Parsed {} fact rows from '{}'", facts.len(), table.name);
    Ok(facts)
}

/// Left outer join: every fact yields exactly one record, in fact order.
pub fn join_records(facts: Vec<InventoryFact>, products: &[Product]) -> Vec<InventoryRecord> {
    let by_id: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();
    facts
        .into_iter()
        .map(|fact| {
            let product = by_id.get(&fact.product_id).copied();
            InventoryRecord::join(fact, product)
        })
        .collect()
}

/// Parse a date cell. Native date cells and the text formats in
/// [`DATE_FORMATS`] / [`DATETIME_FORMATS`] (plus RFC 3339) are accepted;
/// any time of day is dropped.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn column_name(table: &RawTable, col: usize) -> String {
    table.headers.get(col).map(|h| h.trim().to_string()).unwrap_or_default()
}

fn missing(table: &RawTable, row: &RawRow, col: usize) -> DataFormatError {
    DataFormatError::MissingValue {
        table: table.name.clone(),
        row: row.line,
        column: column_name(table, col),
    }
}

fn text_field(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    match cell {
        CellValue::Text(s) => Some(s.trim().to_string()),
        CellValue::Number(n) => Some(ProductId::from_number(*n).to_string()),
        other => Some(other.display()),
    }
}

fn product_id_field(table: &RawTable, row: &RawRow, col: usize) -> Result<ProductId> {
    let cell = table.cell(row, col);
    if cell.is_blank() {
        return Err(missing(table, row, col).into());
    }
    Ok(match cell {
        CellValue::Number(n) => ProductId::from_number(*n),
        other => ProductId::new(other.display()),
    })
}

fn date_field(table: &RawTable, row: &RawRow, col: usize) -> Result<NaiveDate> {
    let cell = table.cell(row, col);
    if cell.is_blank() {
        return Err(missing(table, row, col).into());
    }
    parse_date(cell).ok_or_else(|| {
        DataFormatError::InvalidDate {
            table: table.name.clone(),
            row: row.line,
            column: column_name(table, col),
            value: cell.display(),
        }
        .into()
    })
}

fn number_field(table: &RawTable, row: &RawRow, col: usize) -> Result<f64> {
    let cell = table.cell(row, col);
    if cell.is_blank() {
        return Err(missing(table, row, col).into());
    }
    let parsed = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_number_text(s),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DataFormatError::InvalidNumber {
            table: table.name.clone(),
            row: row.line,
            column: column_name(table, col),
            value: cell.display(),
        }
        .into()),
    }
}

/// Parse numeric text, accepting thousands separators only in valid groups.
fn parse_number_text(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.contains(',') {
        if !THOUSANDS_GROUPED.is_match(s) {
            return None;
        }
        return s.replace(',', "").parse().ok();
    }
    s.parse().ok()
}

/// A finite, non-negative number.
fn quantity_field(table: &RawTable, row: &RawRow, col: usize) -> Result<f64> {
    let value = number_field(table, row, col)?;
    if value < 0.0 {
        return Err(DataFormatError::NegativeValue {
            table: table.name.clone(),
            row: row.line,
            column: column_name(table, col),
            value,
        }
        .into());
    }
    Ok(value)
}

/// A non-negative whole number of days.
fn day_count_field(table: &RawTable, row: &RawRow, col: usize) -> Result<u32> {
    let value = quantity_field(table, row, col)?;
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(DataFormatError::InvalidNumber {
            table: table.name.clone(),
            row: row.line,
            column: column_name(table, col),
            value: table.cell(row, col).display(),
        }
        .into());
    }
    Ok(value as u32)
}

fn distinct_months(records: &[InventoryRecord]) -> usize {
    records.iter().map(|r| r.month).collect::<BTreeSet<_>>().len()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::error::{DashboardError, DataSourceError};
    use dashboard_core::models::YearMonth;
    use tempfile::TempDir;

    const DIM_CSV: &str = "ProductID,ProductName,Category\nP1,Widget,A\nP2,Gadget,B\n";
    const FACT_HEADER: &str =
        "ProductID,Date,OpeningStock,ClosingStock,StockUsed,StockReceived,StockoutDays,Invt TO\n";

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn fact_headers() -> Vec<String> {
        headers(&[
            "ProductID",
            "Date",
            "OpeningStock",
            "ClosingStock",
            "StockUsed",
            "StockReceived",
            "StockoutDays",
            "Invt TO",
        ])
    }

    fn fact_row(id: &str, date: &str, stockout: f64) -> Vec<CellValue> {
        vec![
            text(id),
            text(date),
            num(100.0),
            num(80.0),
            num(30.0),
            num(10.0),
            num(stockout),
            num(1.5),
        ]
    }

    /// Write a two-sheet workbook; `bad_turnover` replaces the second fact's
    /// `Invt TO` with text.
    fn write_workbook(dir: &TempDir, bad_turnover: Option<&str>) -> std::path::PathBuf {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let path = dir.path().join("inventory.xlsx");
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let dim = workbook.add_worksheet();
        dim.set_name("DimProduct").unwrap();
        for (col, name) in ["ProductID", "ProductName", "Category"].iter().enumerate() {
            dim.write_string(0, col as u16, *name).unwrap();
        }
        dim.write_number(1, 0, 101.0).unwrap();
        dim.write_string(1, 1, "Widget").unwrap();
        dim.write_string(1, 2, "A").unwrap();
        dim.write_number(2, 0, 102.0).unwrap();
        dim.write_string(2, 1, "Gadget").unwrap();
        dim.write_string(2, 2, "B").unwrap();

        let fact = workbook.add_worksheet();
        fact.set_name("FactInventory").unwrap();
        for (col, name) in fact_headers().iter().enumerate() {
            fact.write_string(0, col as u16, name).unwrap();
        }
        let rows: [(f64, (u16, u8, u8), f64); 3] = [
            (101.0, (2024, 1, 5), 2.0),
            (102.0, (2024, 1, 20), 0.0),
            (999.0, (2024, 2, 3), 4.0),
        ];
        for (i, (id, (y, m, d), stockout)) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            fact.write_number(r, 0, *id).unwrap();
            let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
            fact.write_datetime_with_format(r, 1, &date, &date_format).unwrap();
            for (col, v) in [100.0, 80.0, 30.0, 10.0, *stockout, 1.5].iter().enumerate() {
                fact.write_number(r, col as u16 + 2, *v).unwrap();
            }
        }
        if let Some(text) = bad_turnover {
            fact.write_string(2, 7, text).unwrap();
        }

        workbook.save(&path).unwrap();
        path
    }

    fn write_source(dim: &str, fact: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("DimProduct.csv"), dim).unwrap();
        std::fs::write(dir.path().join("FactInventory.csv"), fact).unwrap();
        dir
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date(&text("2024-01-05")), Some(expected));
        assert_eq!(parse_date(&text("2024/01/05")), Some(expected));
        assert_eq!(parse_date(&text("01/05/2024")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-05 13:45:00")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-05T13:45:00")), Some(expected));
        assert_eq!(parse_date(&text("2024-01-05T13:45:00+00:00")), Some(expected));
        assert_eq!(
            parse_date(&CellValue::DateTime(expected.and_hms_opt(8, 0, 0).unwrap())),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(&text("yesterday")), None);
        assert_eq!(parse_date(&text("2024-13-01")), None);
        assert_eq!(parse_date(&num(45_000.0)), None);
    }

    // ── parse_products ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_products_numeric_ids_and_blank_names() {
        let table = RawTable::new(
            "DimProduct",
            headers(&["ProductID", "ProductName", "Category"]),
            vec![
                vec![num(101.0), text("Widget"), text("A")],
                vec![num(102.0), CellValue::Empty, text("  ")],
            ],
        );
        let products = parse_products(&table).unwrap();
        assert_eq!(products[0].id, ProductId::new("101"));
        assert_eq!(products[0].name.as_deref(), Some("Widget"));
        assert!(products[1].name.is_none());
        assert!(products[1].category.is_none());
    }

    #[test]
    fn test_parse_products_rejects_duplicate_ids() {
        let table = RawTable::new(
            "DimProduct",
            headers(&["ProductID", "ProductName", "Category"]),
            vec![
                vec![text("P1"), text("Widget"), text("A")],
                vec![text("P1"), text("Widget v2"), text("A")],
            ],
        );
        let err = parse_products(&table).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Format(DataFormatError::DuplicateKey { row: 3, .. })
        ));
    }

    #[test]
    fn test_parse_products_missing_column() {
        let table = RawTable::new(
            "DimProduct",
            headers(&["ProductID", "ProductName"]),
            vec![],
        );
        let err = parse_products(&table).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Source(DataSourceError::MissingColumn { ref column, .. }) if column == "Category"
        ));
    }

    // ── parse_facts ───────────────────────────────────────────────────────────

    #[test]
    fn test_parse_facts_typed_values() {
        let table = RawTable::new(
            "FactInventory",
            fact_headers(),
            vec![fact_row("P1", "2024-01-05", 2.0)],
        );
        let facts = parse_facts(&table).unwrap();
        assert_eq!(facts.len(), 1);
        let f = &facts[0];
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(f.stockout_days, 2);
        assert!((f.turnover - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_facts_numeric_text_accepted() {
        let mut row = fact_row("P1", "2024-01-05", 0.0);
        row[2] = text("1,200");
        let table = RawTable::new("FactInventory", fact_headers(), vec![row]);
        let facts = parse_facts(&table).unwrap();
        assert!((facts[0].opening_stock - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_number_text_grouping() {
        assert_eq!(parse_number_text(" 12,345,678.5 "), Some(12_345_678.5));
        assert_eq!(parse_number_text("999"), Some(999.0));
        assert_eq!(parse_number_text("1,5"), None);
        assert_eq!(parse_number_text("1,2,3"), None);
        assert_eq!(parse_number_text("1234,567"), None);
        assert_eq!(parse_number_text("1,20"), None);
    }

    #[test]
    fn test_load_rejects_comma_decimal_turnover() {
        for bad in ["1,5", "1,2,3"] {
            let fact = format!("{FACT_HEADER}P1,2024-01-05,100,80,30,10,2,\"{bad}\"\n");
            let dir = write_source(DIM_CSV, &fact);
            let err = load_from_path(dir.path(), "DimProduct", "FactInventory").unwrap_err();
            match err {
                DashboardError::Format(DataFormatError::InvalidNumber {
                    row, column, value, ..
                }) => {
                    assert_eq!(row, 2);
                    assert_eq!(column, "Invt TO");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {bad}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_facts_bad_date_reports_row_and_column() {
        let table = RawTable::new(
            "FactInventory",
            fact_headers(),
            vec![
                fact_row("P1", "2024-01-05", 0.0),
                fact_row("P2", "not a date", 0.0),
            ],
        );
        let err = parse_facts(&table).unwrap_err();
        match err {
            DashboardError::Format(DataFormatError::InvalidDate {
                row, column, value, ..
            }) => {
                assert_eq!(row, 3);
                assert_eq!(column, "Date");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_facts_non_numeric_value() {
        let mut row = fact_row("P1", "2024-01-05", 0.0);
        row[7] = text("fast");
        let table = RawTable::new("FactInventory", fact_headers(), vec![row]);
        let err = parse_facts(&table).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Format(DataFormatError::InvalidNumber { ref column, .. }) if column == "Invt TO"
        ));
    }

    #[test]
    fn test_parse_facts_negative_and_fractional_days() {
        let negative = RawTable::new(
            "FactInventory",
            fact_headers(),
            vec![fact_row("P1", "2024-01-05", -1.0)],
        );
        assert!(matches!(
            parse_facts(&negative).unwrap_err(),
            DashboardError::Format(DataFormatError::NegativeValue { .. })
        ));

        let fractional = RawTable::new(
            "FactInventory",
            fact_headers(),
            vec![fact_row("P1", "2024-01-05", 1.5)],
        );
        assert!(matches!(
            parse_facts(&fractional).unwrap_err(),
            DashboardError::Format(DataFormatError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_facts_missing_value() {
        let mut row = fact_row("P1", "2024-01-05", 0.0);
        row[4] = CellValue::Empty;
        let table = RawTable::new("FactInventory", fact_headers(), vec![row]);
        assert!(matches!(
            parse_facts(&table).unwrap_err(),
            DashboardError::Format(DataFormatError::MissingValue { ref column, .. }) if column == "StockUsed"
        ));
    }

    // ── join_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_join_preserves_fact_count_and_order() {
        let products = vec![Product {
            id: ProductId::new("P1"),
            name: Some("Widget".to_string()),
            category: Some("A".to_string()),
        }];
        let table = RawTable::new(
            "FactInventory",
            fact_headers(),
            vec![
                fact_row("P1", "2024-01-05", 1.0),
                fact_row("P9", "2024-01-06", 2.0),
                fact_row("P1", "2024-02-01", 3.0),
            ],
        );
        let facts = parse_facts(&table).unwrap();
        let records = join_records(facts, &products);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].product_name.as_deref(), Some("Widget"));
        assert!(records[1].product_name.is_none());
        assert!(records[1].category.is_none());
        assert_eq!(records[2].stockout_days, 3);
        assert_eq!(records[2].month, YearMonth::new(2024, 2));
    }

    #[test]
    fn test_join_numeric_and_text_ids_match() {
        let products = vec![Product {
            id: ProductId::from_number(7.0),
            name: Some("Bolt".to_string()),
            category: None,
        }];
        let mut row = fact_row("7", "2024-01-05", 0.0);
        row[0] = text("7");
        let facts = parse_facts(&RawTable::new("FactInventory", fact_headers(), vec![row])).unwrap();
        let records = join_records(facts, &products);
        assert_eq!(records[0].product_name.as_deref(), Some("Bolt"));
    }

    // ── load_inventory ────────────────────────────────────────────────────────

    #[test]
    fn test_load_from_csv_directory() {
        let fact = format!(
            "{FACT_HEADER}P1,2024-01-05,100,80,30,10,2,1.5\nP2,2024-01-06,50,40,15,5,0,2.0\nP3,2024-02-01,10,5,5,0,1,0.5\n"
        );
        let dir = write_source(DIM_CSV, &fact);

        let dataset = load_from_path(dir.path(), "DimProduct", "FactInventory").unwrap();
        let summary = dataset.summary();

        assert_eq!(dataset.len(), 3);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.unmatched_records, 1);
        assert_eq!(summary.months, 2);
        assert!(summary.source.contains("(csv)"));
    }

    #[test]
    fn test_load_from_workbook_joins_numeric_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, None);

        let dataset = load_from_path(&path, "DimProduct", "FactInventory").unwrap();
        let summary = dataset.summary();
        assert_eq!(summary.products, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.unmatched_records, 1);
        assert_eq!(summary.months, 2);

        let records = dataset.records();
        assert_eq!(records[0].product_name.as_deref(), Some("Widget"));
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(records[1].category.as_deref(), Some("B"));
        assert_eq!(records[2].product_id, ProductId::new("999"));
        assert!(records[2].product_name.is_none());
        assert_eq!(records[2].month, YearMonth::new(2024, 2));

        let by_product = crate::aggregator::InventoryAggregator::stockout_frequency_by_product(records);
        assert_eq!(by_product[0].group.label(), "(none)");
        assert_eq!(by_product[0].total, 4);
        assert!(by_product[0].group.is_unknown());
        assert_eq!(by_product[1].group.label(), "Widget");
    }

    #[test]
    fn test_load_from_workbook_reports_sheet_row() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, Some("1,5"));

        let err = load_from_path(&path, "DimProduct", "FactInventory").unwrap_err();
        match err {
            DashboardError::Format(DataFormatError::InvalidNumber {
                table, row, column, ..
            }) => {
                assert_eq!(table, "FactInventory");
                assert_eq!(row, 3);
                assert_eq!(column, "Invt TO");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_fact_table() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("DimProduct.csv"), DIM_CSV).unwrap();

        let err = load_from_path(dir.path(), "DimProduct", "FactInventory").unwrap_err();
        assert!(err.is_source_error());
    }

    #[test]
    fn test_load_custom_table_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Products.csv"), DIM_CSV).unwrap();
        std::fs::write(
            dir.path().join("Stock.csv"),
            format!("{FACT_HEADER}P1,2024-01-05,100,80,30,10,2,1.5\n"),
        )
        .unwrap();

        let dataset = load_from_path(dir.path(), "Products", "Stock").unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_header_only_fact_table_is_empty_dataset() {
        let dir = write_source(DIM_CSV, FACT_HEADER);
        let dataset = load_from_path(dir.path(), "DimProduct", "FactInventory").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.summary().months, 0);
    }

    #[test]
    fn test_from_records_summary() {
        let dataset = InventoryDataset::from_records(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.summary().source, "in-memory");
    }
}
