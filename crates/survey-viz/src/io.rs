//! CSV export of wide and long tables.
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::table::{IdColumn, LongTable, WideTable, ID_COLUMN};

/// Write `id, <group>, <numeric columns...>` rows.
pub fn write_wide_csv<W: Write>(wide: &WideTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![ID_COLUMN.to_string(), wide.group_column().to_string()];
    header.extend(wide.column_names().iter().map(|s| s.to_string()));
    wtr.write_record(&header)?;

    for record in 0..wide.nrows() {
        let mut row = vec![record.to_string(), wide.group_label(record).to_string()];
        row.extend(wide.columns().iter().map(|c| c.values[record].to_string()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the visible columns of a long table (preserved identity columns,
/// feature, value).
pub fn write_long_csv<W: Write>(long: &LongTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(long.column_names())?;

    for row in long.rows() {
        let mut out: Vec<String> = long
            .id_columns()
            .iter()
            .map(|id| match id {
                IdColumn::Record => row.record.to_string(),
                IdColumn::Group => long.group_label(row).to_string(),
            })
            .collect();
        out.push(row.feature.clone());
        out.push(row.value.to_string());
        wtr.write_record(&out)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_wide_csv_path<P: AsRef<Path>>(wide: &WideTable, path: P) -> Result<()> {
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_wide_csv(wide, file)
        .with_context(|| format!("Failed to write wide table to {}", path.as_ref().display()))
}

pub fn write_long_csv_path<P: AsRef<Path>>(long: &LongTable, path: P) -> Result<()> {
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_long_csv(long, file)
        .with_context(|| format!("Failed to write long table to {}", path.as_ref().display()))
}
