//! Dashboard aggregates over the joined inventory records.
//!
//! Every aggregate is an independent pure function of the full record set.
//! Grouped outputs use [`GroupKey`], so records with a null product name or
//! category land in a trailing `Unknown` group instead of being dropped.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use dashboard_core::models::{GroupKey, InventoryRecord, YearMonth};
use serde::Serialize;

// ── Output shapes ─────────────────────────────────────────────────────────────

/// A per-product total (e.g. stockout days).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub group: GroupKey,
    pub total: u64,
}

/// All turnover values observed for one category, in record order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub group: GroupKey,
    pub values: Vec<f64>,
}

/// Mean opening and closing stock for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLevels<K> {
    pub key: K,
    pub mean_opening: f64,
    pub mean_closing: f64,
}

/// One product's monthly series; spans every month in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSeries {
    pub group: GroupKey,
    pub points: Vec<(YearMonth, f64)>,
}

impl ProductSeries {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

/// A per-month sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal<T> {
    pub month: YearMonth,
    pub total: T,
}

// ── Accumulators ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
struct LevelAccumulator {
    opening: f64,
    closing: f64,
    count: u32,
}

impl LevelAccumulator {
    fn add(&mut self, record: &InventoryRecord) {
        self.opening += record.opening_stock;
        self.closing += record.closing_stock;
        self.count += 1;
    }

    fn finish<K>(self, key: K) -> StockLevels<K> {
        let n = f64::from(self.count.max(1));
        StockLevels {
            key,
            mean_opening: self.opening / n,
            mean_closing: self.closing / n,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u64), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ── InventoryAggregator ───────────────────────────────────────────────────────

/// Namespace for the dashboard's aggregate computations.
pub struct InventoryAggregator;

impl InventoryAggregator {
    /// Mean of `Invt TO` over all records.
    pub fn avg_inventory_turnover(records: &[InventoryRecord]) -> Option<f64> {
        mean(records.iter().map(|r| r.turnover))
    }

    /// Sum of stockout days over all records.
    pub fn total_stockout_days(records: &[InventoryRecord]) -> u64 {
        records.iter().map(|r| u64::from(r.stockout_days)).sum()
    }

    /// Average of the column means of opening and closing stock.
    pub fn avg_stock_level(records: &[InventoryRecord]) -> Option<f64> {
        let opening = mean(records.iter().map(|r| r.opening_stock))?;
        let closing = mean(records.iter().map(|r| r.closing_stock))?;
        Some((opening + closing) / 2.0)
    }

    /// Stockout days per product, largest first.
    pub fn stockout_frequency_by_product(records: &[InventoryRecord]) -> Vec<ProductTotal> {
        let mut totals: BTreeMap<GroupKey, u64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.product_key()).or_default() += u64::from(record.stockout_days);
        }

        let mut out: Vec<ProductTotal> = totals
            .into_iter()
            .map(|(group, total)| ProductTotal { group, total })
            .collect();
        // Stable: equal totals stay in key order.
        out.sort_by(|a, b| b.total.cmp(&a.total));
        out
    }

    /// Turnover values per category.
    pub fn turnover_distribution_by_category(records: &[InventoryRecord]) -> Vec<CategoryDistribution> {
        let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
        for record in records {
            groups.entry(record.category_key()).or_default().push(record.turnover);
        }
        groups
            .into_iter()
            .map(|(group, values)| CategoryDistribution { group, values })
            .collect()
    }

    /// Mean opening/closing stock per calendar date, ascending.
    pub fn stock_levels_over_time(records: &[InventoryRecord]) -> Vec<StockLevels<NaiveDate>> {
        stock_levels_by(records, |r| r.date)
    }

    /// Stock used per product per month, one zero-filled series per product.
    pub fn stock_used_by_product_over_time(records: &[InventoryRecord]) -> Vec<ProductSeries> {
        let months: BTreeSet<YearMonth> = records.iter().map(|r| r.month).collect();

        let mut sums: BTreeMap<GroupKey, BTreeMap<YearMonth, f64>> = BTreeMap::new();
        for record in records {
            *sums
                .entry(record.product_key())
                .or_default()
                .entry(record.month)
                .or_default() += record.stock_used;
        }

        sums.into_iter()
            .map(|(group, by_month)| ProductSeries {
                group,
                points: months
                    .iter()
                    .map(|m| (*m, by_month.get(m).copied().unwrap_or(0.0)))
                    .collect(),
            })
            .collect()
    }

    /// Stockout days per month, ascending.
    pub fn stockout_days_over_time(records: &[InventoryRecord]) -> Vec<MonthTotal<u64>> {
        let mut totals: BTreeMap<YearMonth, u64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.month).or_default() += u64::from(record.stockout_days);
        }
        totals
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect()
    }

    /// Stock received per month, ascending.
    pub fn stock_received_over_time(records: &[InventoryRecord]) -> Vec<MonthTotal<f64>> {
        let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.month).or_default() += record.stock_received;
        }
        totals
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect()
    }

    /// Mean opening/closing stock per month, ascending.
    pub fn stock_levels_by_month(records: &[InventoryRecord]) -> Vec<StockLevels<YearMonth>> {
        stock_levels_by(records, |r| r.month)
    }
}

fn stock_levels_by<K, F>(records: &[InventoryRecord], key_fn: F) -> Vec<StockLevels<K>>
where
    K: Ord,
    F: Fn(&InventoryRecord) -> K,
{
    let mut groups: BTreeMap<K, LevelAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().add(record);
    }
    groups.into_iter().map(|(key, acc)| acc.finish(key)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
