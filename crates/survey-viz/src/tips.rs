//! Restaurant tips dataset used by the violin chart.
//!
//! The data is an external CSV with at least `total_bill`, `tip`, `sex` and
//! `day` columns. It is read from a local path, or fetched over HTTP when the
//! `remote` feature is enabled.
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::table::WideTable;

/// Public location of the tips CSV.
pub const TIPS_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/tips.csv";

const DAY_ORDER: [&str; 7] = ["Mon", "Tues", "Wed", "Thur", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRecord {
    pub total_bill: f64,
    pub tip: f64,
    pub sex: String,
    pub day: String,
    #[serde(default)]
    pub smoker: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl TipRecord {
    pub fn tip_pct(&self) -> Option<f64> {
        tip_percentage(self.tip, self.total_bill)
    }
}

/// `tip / total_bill * 100`, rounded to one decimal place.
///
/// `None` when `total_bill` is not positive.
pub fn tip_percentage(tip: f64, total_bill: f64) -> Option<f64> {
    if total_bill.is_nan() || total_bill <= 0.0 || !tip.is_finite() {
        return None;
    }
    Some((tip / total_bill * 1000.0).round() / 10.0)
}

/// Parse tip records from any CSV reader.
pub fn read_tips<R: Read>(reader: R) -> Result<Vec<TipRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, result) in rdr.deserialize::<TipRecord>().enumerate() {
        let record = result.with_context(|| format!("Failed to parse tips record {}", line + 1))?;
        records.push(record);
    }
    log::debug!("Read {} tip records", records.len());
    Ok(records)
}

pub fn read_tips_path<P: AsRef<Path>>(path: P) -> Result<Vec<TipRecord>> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open tips file: {}", path.as_ref().display()))?;
    read_tips(std::io::BufReader::new(file))
}

/// Download and parse the tips CSV.
#[cfg(feature = "remote")]
pub fn fetch_tips(url: &str) -> Result<Vec<TipRecord>> {
    use isahc::ReadResponseExt;

    log::info!("Fetching tips dataset from {}", url);
    let mut response = isahc::get(url).with_context(|| format!("Failed to fetch {}", url))?;
    if !response.status().is_success() {
        anyhow::bail!("Fetching {} returned HTTP {}", url, response.status());
    }
    let body = response
        .text()
        .with_context(|| format!("Failed to read response body from {}", url))?;
    read_tips(body.as_bytes())
}

/// Tip percentages split by day and sex, for split violins.
#[derive(Debug, Clone, PartialEq)]
pub struct TipPercentages {
    pub days: Vec<String>,
    pub sexes: Vec<String>,
    /// `values[day][sex]`
    pub values: Vec<Vec<Vec<f64>>>,
}

fn push_level(levels: &mut Vec<String>, label: &str) -> usize {
    match levels.iter().position(|l| l == label) {
        Some(idx) => idx,
        None => {
            levels.push(label.to_string());
            levels.len() - 1
        }
    }
}

fn day_rank(day: &str) -> usize {
    DAY_ORDER
        .iter()
        .position(|d| d.eq_ignore_ascii_case(day))
        .unwrap_or(DAY_ORDER.len())
}

/// Group tip percentages by day (weekday order) and sex (first appearance).
/// Records without a defined percentage are skipped with a warning.
pub fn tip_percentages(records: &[TipRecord]) -> TipPercentages {
    let mut days: Vec<String> = Vec::new();
    for r in records {
        push_level(&mut days, &r.day);
    }
    days.sort_by_key(|d| day_rank(d));

    let mut sexes: Vec<String> = Vec::new();
    let mut values = vec![Vec::<Vec<f64>>::new(); days.len()];
    let mut skipped = 0usize;
    for r in records {
        let Some(pct) = r.tip_pct() else {
            skipped += 1;
            continue;
        };
        let day = days.iter().position(|d| *d == r.day).unwrap_or(0);
        let sex = push_level(&mut sexes, &r.sex);
        let row = &mut values[day];
        if row.len() <= sex {
            row.resize(sex + 1, Vec::new());
        }
        row[sex].push(pct);
    }
    for row in values.iter_mut() {
        row.resize(sexes.len(), Vec::new());
    }
    if skipped > 0 {
        log::warn!("Skipped {} tip records with a non-positive total bill", skipped);
    }

    TipPercentages {
        days,
        sexes,
        values,
    }
}

/// Wide view with `day` as the group label and `total_bill`, `tip` and
/// `tip_pct` columns. Records without a defined percentage are dropped.
pub fn tips_table(records: &[TipRecord]) -> WideTable {
    let kept: Vec<&TipRecord> = records.iter().filter(|r| r.tip_pct().is_some()).collect();
    let labels: Vec<&str> = kept.iter().map(|r| r.day.as_str()).collect();
    let mut table = WideTable::from_labels("day", &labels);

    let columns: [(&str, Vec<f64>); 3] = [
        ("total_bill", kept.iter().map(|r| r.total_bill).collect()),
        ("tip", kept.iter().map(|r| r.tip).collect()),
        ("tip_pct", kept.iter().filter_map(|r| r.tip_pct()).collect()),
    ];
    for (name, values) in columns {
        if let Err(err) = table.push_column(name, values) {
            log::warn!("Skipping tips column {}: {}", name, err);
        }
    }
    table
}
