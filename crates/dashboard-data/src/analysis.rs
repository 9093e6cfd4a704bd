//! Page assembly for the dashboard.
//!
//! Groups the aggregates each page needs into [`PageData`], and bundles both
//! pages plus load metadata into a [`DashboardReport`] for JSON export.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    CategoryDistribution, InventoryAggregator, MonthTotal, ProductSeries, ProductTotal, StockLevels,
};
use crate::loader::InventoryDataset;
use dashboard_core::models::YearMonth;

// ── Page ──────────────────────────────────────────────────────────────────────

/// A dashboard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Overview,
    Trends,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Overview, Page::Trends];

    /// Parse a page name as used on the command line (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "overview" => Some(Page::Overview),
            "trends" => Some(Page::Trends),
            _ => None,
        }
    }

    /// Page for a 1-based number key.
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Trends => "trends",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Trends => "Trends Over Time",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Page::Overview => 0,
            Page::Trends => 1,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Page data ─────────────────────────────────────────────────────────────────

/// The three headline figures of the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub avg_inventory_turnover: Option<f64>,
    pub total_stockout_days: u64,
    pub avg_stock_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewData {
    pub metrics: OverviewMetrics,
    pub stockout_frequency_by_product: Vec<ProductTotal>,
    pub turnover_distribution_by_category: Vec<CategoryDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsData {
    pub stock_levels_over_time: Vec<StockLevels<NaiveDate>>,
    pub stock_used_by_product_over_time: Vec<ProductSeries>,
    pub stockout_days_over_time: Vec<MonthTotal<u64>>,
    pub stock_received_over_time: Vec<MonthTotal<f64>>,
    pub stock_levels_by_month: Vec<StockLevels<YearMonth>>,
}

/// Aggregates for exactly one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    Overview(OverviewData),
    Trends(TrendsData),
}

impl PageData {
    pub fn page(&self) -> Page {
        match self {
            PageData::Overview(_) => Page::Overview,
            PageData::Trends(_) => Page::Trends,
        }
    }
}

pub fn build_overview(dataset: &InventoryDataset) -> OverviewData {
    let records = dataset.records();
    OverviewData {
        metrics: OverviewMetrics {
            avg_inventory_turnover: InventoryAggregator::avg_inventory_turnover(records),
            total_stockout_days: InventoryAggregator::total_stockout_days(records),
            avg_stock_level: InventoryAggregator::avg_stock_level(records),
        },
        stockout_frequency_by_product: InventoryAggregator::stockout_frequency_by_product(records),
        turnover_distribution_by_category: InventoryAggregator::turnover_distribution_by_category(
            records,
        ),
    }
}

pub fn build_trends(dataset: &InventoryDataset) -> TrendsData {
    let records = dataset.records();
    TrendsData {
        stock_levels_over_time: InventoryAggregator::stock_levels_over_time(records),
        stock_used_by_product_over_time: InventoryAggregator::stock_used_by_product_over_time(records),
        stockout_days_over_time: InventoryAggregator::stockout_days_over_time(records),
        stock_received_over_time: InventoryAggregator::stock_received_over_time(records),
        stock_levels_by_month: InventoryAggregator::stock_levels_by_month(records),
    }
}

/// Compute the aggregates for `page` only.
pub fn build_page(dataset: &InventoryDataset, page: Page) -> PageData {
    let start = Instant::now();
    let data = match page {
        Page::Overview => PageData::Overview(build_overview(dataset)),
        Page::Trends => PageData::Trends(build_trends(dataset)),
    };
    debug!(
        "Built {} page over {} records in {:.3}ms",
        page.name(),
        dataset.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    data
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Metadata attached to an exported report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// RFC 3339 timestamp when the report was generated.
    pub generated_at: String,
    pub source: String,
    pub records: usize,
    pub products: usize,
    pub unmatched_records: usize,
    pub months: usize,
    pub load_time_seconds: f64,
}

/// Both pages plus metadata; the `--export` payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub overview: OverviewData,
    pub trends: TrendsData,
}

pub fn build_report(dataset: &InventoryDataset) -> DashboardReport {
    let summary = dataset.summary();
    DashboardReport {
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            source: summary.source.clone(),
            records: summary.records,
            products: summary.products,
            unmatched_records: summary.unmatched_records,
            months: summary.months,
            load_time_seconds: summary.load_time_seconds,
        },
        overview: build_overview(dataset),
        trends: build_trends(dataset),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
