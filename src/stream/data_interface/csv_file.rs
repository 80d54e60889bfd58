//! Manifest (CSV) backend: reads a text manifest of
//! `uri,project,type,collector,filetime,duration,ts` rows, emitting rows newer than the last
//! seen `ts` and that pass the Filter Set.

use crate::stream::data_interface::{DataInterface, DataInterfaceOptions};
use crate::stream::descriptor::{DumpDescriptor, RecordType};
use crate::stream::error::StreamError;
use crate::stream::filter::FilterSet;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One manifest row, in the seven-field order the manifest file format defines.
#[derive(Debug, Deserialize)]
struct ManifestRow {
    uri: String,
    project: String,
    #[serde(rename = "type")]
    record_type: String,
    collector: String,
    filetime: u32,
    duration: u32,
    ts: u32,
}

/// Backend option `csv-file`.
#[derive(Default)]
pub struct CsvFileInterface {
    csv_file: Option<String>,
    last_seen_ts: u32,
}

impl CsvFileInterface {
    pub fn new() -> Self {
        CsvFileInterface::default()
    }
}

impl DataInterfaceOptions for CsvFileInterface {
    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StreamError> {
        match key {
            "csv-file" => {
                self.csv_file = Some(value.to_string());
                Ok(())
            }
            other => Err(StreamError::ConfigError(format!(
                "manifest backend: unknown option '{other}'"
            ))),
        }
    }
}

impl DataInterface for CsvFileInterface {
    fn produce_batch(
        &mut self,
        filters: &FilterSet,
        _live: bool,
    ) -> Result<Vec<DumpDescriptor>, StreamError> {
        let path = self.csv_file.as_ref().ok_or_else(|| {
            StreamError::ConfigError("manifest backend: 'csv-file' option not set".into())
        })?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(u32::MAX);
        let upper = now.saturating_sub(1);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| StreamError::BackendError(format!("manifest backend: {e}")))?;

        let mut batch = Vec::new();
        let mut max_ts = self.last_seen_ts;
        for record in reader.deserialize::<ManifestRow>() {
            let row = record.map_err(|e| StreamError::BackendError(format!("manifest backend: {e}")))?;
            if row.ts <= self.last_seen_ts || row.ts > upper {
                continue;
            }
            let record_type = match row.record_type.to_ascii_lowercase().as_str() {
                "rib" | "ribs" => RecordType::Rib,
                "updates" | "update" => RecordType::Updates,
                other => {
                    log::warn!("manifest backend: skipping row with unknown type '{other}'");
                    continue;
                }
            };
            let descriptor = DumpDescriptor::new(
                row.uri,
                row.project,
                row.collector,
                record_type,
                row.filetime,
                row.duration,
            );
            if filters.matches(&descriptor) {
                batch.push(descriptor);
            }
            max_ts = max_ts.max(row.ts);
        }
        self.last_seen_ts = max_ts;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(rows: &[&str]) -> String {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("bgpstream-manifest-test-{}.csv", std::process::id()));
        let mut f = std::fs::File::create(&tmp).unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
        tmp.to_string_lossy().into_owned()
    }

    #[test]
    fn emits_rows_newer_than_last_seen_ts() {
        let path = write_manifest(&[
            "file1.bz2,routeviews,rib,route-views2,100,900,50",
            "file2.bz2,routeviews,rib,route-views2,200,900,150",
        ]);
        let mut backend = CsvFileInterface::new();
        backend.set_option("csv-file", &path).unwrap();
        let filters = FilterSet::new();
        let batch = backend.produce_batch(&filters, false).unwrap();
        assert_eq!(batch.len(), 2);
        // A second poll with no new rows yields nothing.
        let batch2 = backend.produce_batch(&filters, false).unwrap();
        assert!(batch2.is_empty());

        std::fs::remove_file(&path).ok();
    }
}
