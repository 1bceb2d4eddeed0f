//! Point tables on disk (CSV or Parquet, chosen by extension) via polars.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Format::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") => {
                Ok(Format::Parquet)
            }
            _ => bail!(
                "unsupported table format for {} (expected .csv or .parquet)",
                path.display()
            ),
        }
    }
}

/// Read a whole table.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let lf = match Format::from_path(path)? {
        Format::Csv => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()
            .with_context(|| format!("opening {}", path.display()))?,
        Format::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default())
            .with_context(|| format!("opening {}", path.display()))?,
    };
    let df = lf
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "read table");
    Ok(df)
}

/// Numeric column as `f64`; nulls become NaN (and so match no polygon).
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df
        .column(name)
        .with_context(|| format!("table has no column '{name}'"))?;
    let values = col
        .cast(&DataType::Float64)
        .with_context(|| format!("column '{name}' is not numeric"))?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Write `df`, creating parent directories.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        Format::Csv => CsvWriter::new(&mut file).finish(df)?,
        Format::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
    }
    tracing::debug!(rows = df.height(), path = %path.display(), "wrote table");
    Ok(())
}
