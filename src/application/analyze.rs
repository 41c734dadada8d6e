//! CSV analysis use case: resolve required columns, then aggregate.
//!
//! This is the whole server-side contract: an uploaded table goes in, an
//! [`AnalysisResult`] or a single descriptive error comes out. Nothing is
//! retained between requests.

use std::collections::BTreeMap;

use crate::domain::analysis::{AnalysisResult, EquipmentRow};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::CsvTable;

/// Logical columns every upload must provide, in report order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "equipment_name",
    "equipment_type",
    "flowrate",
    "pressure",
    "temperature",
];

/// Physical column indexes for the five logical columns.
struct ColumnMap {
    equipment_name: usize,
    equipment_type: usize,
    flowrate: usize,
    pressure: usize,
    temperature: usize,
}

/// Analyze raw CSV bytes end to end.
pub fn analyze(bytes: &[u8]) -> Result<AnalysisResult> {
    let table = CsvTable::parse(bytes)?;
    let columns = resolve_columns(&table.headers)?;
    let rows = build_rows(&table, &columns);
    aggregate(&rows)
}

/// Map logical column names to physical header positions.
///
/// Matching is case-insensitive and ignores surrounding whitespace; the
/// first matching header wins and extra columns are ignored. All missing
/// columns are reported together.
fn resolve_columns(headers: &[String]) -> Result<ColumnMap> {
    let find = |logical: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(logical))
    };

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|logical| find(logical).is_none())
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing columns: {}",
            missing.join(", ")
        )));
    }

    Ok(ColumnMap {
        equipment_name: find("equipment_name").unwrap(),
        equipment_type: find("equipment_type").unwrap(),
        flowrate: find("flowrate").unwrap(),
        pressure: find("pressure").unwrap(),
        temperature: find("temperature").unwrap(),
    })
}

fn build_rows(table: &CsvTable, columns: &ColumnMap) -> Vec<EquipmentRow> {
    table
        .records
        .iter()
        .map(|record| EquipmentRow {
            equipment_name: record[columns.equipment_name].clone(),
            equipment_type: record[columns.equipment_type].clone(),
            flowrate: parse_numeric(&record[columns.flowrate]),
            pressure: parse_numeric(&record[columns.pressure]),
            temperature: parse_numeric(&record[columns.temperature]),
        })
        .collect()
}

/// Parse one cell as a number; empty, non-numeric and NaN cells are missing.
fn parse_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Compute the aggregate statistics over resolved rows.
///
/// Averages run over the non-missing values of each column independently; a
/// column with no numeric values yields `None`, never zero. Type counts
/// keep each distinct `equipment_type` spelling exactly as it appears, so
/// the per-type counts always sum to `total_equipment`.
fn aggregate(rows: &[EquipmentRow]) -> Result<AnalysisResult> {
    if rows.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let mut equipment_by_type: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        *equipment_by_type
            .entry(row.equipment_type.clone())
            .or_insert(0) += 1;
    }

    Ok(AnalysisResult {
        total_equipment: rows.len() as u64,
        average_flowrate: mean(rows.iter().map(|r| r.flowrate)),
        average_pressure: mean(rows.iter().map(|r| r.pressure)),
        average_temperature: mean(rows.iter().map(|r| r.temperature)),
        equipment_by_type,
    })
}

/// Arithmetic mean over the present values, rounded to 2 decimals.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u64;
    for value in values.flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(round2(sum / count as f64))
    }
}

/// Round to 2 decimal places, half away from zero (`f64::round` semantics).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
