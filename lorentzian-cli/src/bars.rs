//! Bar sources for the CLI: CSV files and seeded synthetic series.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use lorentzian_core::synthetic;
use lorentzian_core::{Bar, StreamKey};

/// A bar with the date it was reported under, if known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedBar {
    pub date: Option<NaiveDate>,
    pub bar: Bar,
}

/// All bars for one (symbol, timeframe), chronological.
#[derive(Debug, Clone)]
pub struct Stream {
    pub key: StreamKey,
    pub bars: Vec<DatedBar>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

/// Parse `date,open,high,low,close[,volume]` rows with a header line.
///
/// Rows are not validated here; the engine rejects bad bars individually.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<DatedBar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut bars = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let row = row.with_context(|| format!("malformed row at line {}", i + 2))?;
        bars.push(DatedBar {
            date: Some(row.date),
            bar: Bar::new(row.open, row.high, row.low, row.close, row.volume),
        });
    }
    Ok(bars)
}

pub fn load_csv(path: &Path) -> Result<Vec<DatedBar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_csv(file).with_context(|| format!("failed to read {}", path.display()))
}

/// Symbol implied by a file name: `data/SPY.csv` → `SPY`.
pub fn symbol_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .with_context(|| format!("cannot derive a symbol from {}", path.display()))
}

/// Seeded random walk for `symbol`, dated on consecutive days from 2020-01-02.
pub fn synthetic_stream(symbol: &str, timeframe: &str, len: usize) -> Stream {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2);
    let bars = synthetic::for_symbol(symbol, len)
        .into_iter()
        .enumerate()
        .map(|(i, bar)| DatedBar {
            date: start.map(|d| d + Duration::days(i as i64)),
            bar,
        })
        .collect();
    Stream {
        key: StreamKey::new(symbol, timeframe),
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
date,open,high,low,close,volume
2024-01-02, 100.0, 101.5, 99.0, 101.0, 12000
2024-01-03,101.0,102.0,100.5,101.8,9000
";

    #[test]
    fn parses_rows() {
        let bars = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(bars[0].bar, Bar::new(100.0, 101.5, 99.0, 101.0, 12000.0));
        assert_eq!(bars[1].bar.close, 101.8);
    }

    #[test]
    fn volume_column_is_optional() {
        let csv = "date,open,high,low,close\n2024-01-02,1,2,0.5,1.5\n";
        let bars = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].bar.volume, 0.0);
    }

    #[test]
    fn malformed_row_names_the_line() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,10\n2024-01-03,x,2,0.5,1.5,10\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPY.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        assert_eq!(load_csv(&path).unwrap().len(), 2);
        assert_eq!(symbol_from_path(&path).unwrap(), "SPY");
        assert!(load_csv(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn synthetic_streams_are_dated_and_valid() {
        let stream = synthetic_stream("QQQ", "1d", 30);
        assert_eq!(stream.key, StreamKey::new("QQQ", "1d"));
        assert_eq!(stream.bars.len(), 30);
        assert_eq!(stream.bars[29].date, NaiveDate::from_ymd_opt(2020, 1, 31));
        assert!(stream.bars.iter().all(|b| b.bar.validate().is_ok()));
    }
}
