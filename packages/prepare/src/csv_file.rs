//! CSV reading and writing for sample tables.
//!
//! Rows are read as [`serde_json::Value`] objects keyed by the trimmed
//! header names, with every cell kept as a string. Type coercion happens
//! later, in [`crate::normalize`].

use std::io::Read;
use std::path::Path;

use microplastics_sample_models::SampleRecord;

use crate::PrepareError;

/// Reads a CSV file into raw key/value rows.
///
/// # Errors
///
/// Returns [`PrepareError`] if the file cannot be opened or is not valid CSV.
pub fn read_csv(path: &Path) -> Result<Vec<serde_json::Value>, PrepareError> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// Parses CSV from any reader into raw key/value rows.
///
/// # Errors
///
/// Returns [`PrepareError`] if the data is not valid CSV or has no header row.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<serde_json::Value>, PrepareError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(PrepareError::Malformed {
            message: "CSV file contains no header row".to_owned(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        let mut map = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            map.insert(header.clone(), serde_json::Value::String(value));
        }
        rows.push(serde_json::Value::Object(map));
    }

    log::debug!("Parsed {} CSV rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Writes records to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`PrepareError`] if the file cannot be created or written.
pub fn write_csv(path: &Path, records: &[SampleRecord]) -> Result<(), PrepareError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoadOptions, SyntheticConfig, generate_samples, normalize_records};

    #[test]
    fn parses_rows_as_strings() {
        let data = "lat, lon ,conc\n40.7,-74.0,150\n 1.5 ,2.5,\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["lat"], "40.7");
        assert_eq!(rows[0]["lon"], "-74.0");
        assert_eq!(rows[1]["lat"], "1.5");
        assert_eq!(rows[1]["conc"], "");
    }

    #[test]
    fn short_rows_are_padded() {
        let data = "a,b,c\n1\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn written_records_read_back() {
        let dir = std::env::temp_dir().join(format!(
            "microplastics_csv_roundtrip_{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("samples.csv");
        let records = generate_samples(&SyntheticConfig {
            samples: 40,
            ..SyntheticConfig::default()
        });

        write_csv(&path, &records).unwrap();
        let rows = read_csv(&path).unwrap();
        let options = LoadOptions {
            current_year: 2024,
            ..LoadOptions::default()
        };
        let reread = normalize_records(&rows, &options).unwrap();

        assert_eq!(reread, records);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
