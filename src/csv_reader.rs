// Table input/output: CSV (and JSON arrays) in, CSV out

use crate::data::PlotData;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Read a CSV table from any reader. The first record is the header row.
pub fn read_csv<R: Read>(reader: R) -> Result<PlotData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        // Spreadsheet exports often carry a byte-order mark on the first header
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(PlotData::new(headers, rows))
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<PlotData> {
    let stdin = io::stdin();
    read_csv(stdin.lock())
}

/// Load a table from disk. `.json` files are read as an array of objects,
/// everything else as CSV.
pub fn load_table(path: &Path) -> Result<PlotData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input table '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let data = if is_json {
        let value: serde_json::Value = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON in '{}'", path.display()))?;
        PlotData::from_json(&value)?
    } else {
        read_csv(reader).with_context(|| format!("Failed to read CSV '{}'", path.display()))?
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        data.len(),
        data.headers,
        path.display()
    );
    Ok(data)
}

/// Serialise a table as CSV
pub fn write_csv<W: Write>(data: &PlotData, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&data.headers)
        .context("Failed to write CSV header")?;
    for row in &data.rows {
        wtr.write_record(row).context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn write_csv_to_path(data: &PlotData, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    write_csv(data, file)?;
    log::info!("Wrote {} rows to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let input = "Platform,Likes\nFacebook, 120\nTwitter,45\n";
        let data = read_csv(input.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["Platform", "Likes"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["Facebook", "120"]);
    }

    #[test]
    fn test_read_csv_quoted_date() {
        let input = "Date,Likes\n\"3/1/2024 (Friday)\",10\n";
        let data = read_csv(input.as_bytes()).unwrap();
        assert_eq!(data.rows[0][0], "3/1/2024 (Friday)");
    }

    #[test]
    fn test_read_csv_strips_bom() {
        let input = "\u{feff}Platform,Likes\nA,1\n";
        let data = read_csv(input.as_bytes()).unwrap();
        assert_eq!(data.headers[0], "Platform");
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let input = "a,b\n1,2\n3\n";
        assert!(read_csv(input.as_bytes()).is_err());
    }

    #[test]
    fn test_write_csv() {
        let data = PlotData::new(
            vec!["Platform".to_string(), "Likes".to_string()],
            vec![vec!["Facebook".to_string(), "12.5".to_string()]],
        );
        let mut out = Vec::new();
        write_csv(&data, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Platform,Likes\nFacebook,12.5\n");
    }

    #[test]
    fn test_load_table_missing_file() {
        let err = load_table(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open input table"));
    }
}
