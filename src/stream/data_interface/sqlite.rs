//! Catalog backend: executes a parameterized query against an embedded SQLite catalog,
//! `WHERE ts > :last_ts AND ts <= :now-1`, turning each result row into a descriptor.

use crate::stream::data_interface::{DataInterface, DataInterfaceOptions};
use crate::stream::descriptor::{DumpDescriptor, RecordType};
use crate::stream::error::StreamError;
use crate::stream::filter::FilterSet;
use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};

const CATALOG_QUERY: &str = "SELECT uri, project, collector, type, filetime, duration, ts \
     FROM data WHERE ts > ?1 AND ts <= ?2 ORDER BY ts ASC";

/// Backend option `db-file`. The expected catalog schema is a single `data` table
/// with columns `(uri, project, collector, type, filetime, duration, ts)`, the same seven fields
/// as the manifest backend's rows.
pub struct SqliteInterface {
    db_file: Option<String>,
    last_ts: u32,
}

impl Default for SqliteInterface {
    fn default() -> Self {
        SqliteInterface {
            db_file: None,
            last_ts: 0,
        }
    }
}

impl SqliteInterface {
    pub fn new() -> Self {
        SqliteInterface::default()
    }
}

impl DataInterfaceOptions for SqliteInterface {
    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StreamError> {
        match key {
            "db-file" => {
                self.db_file = Some(value.to_string());
                Ok(())
            }
            other => Err(StreamError::ConfigError(format!(
                "catalog backend: unknown option '{other}'"
            ))),
        }
    }
}

impl DataInterface for SqliteInterface {
    fn produce_batch(
        &mut self,
        filters: &FilterSet,
        _live: bool,
    ) -> Result<Vec<DumpDescriptor>, StreamError> {
        let path = self.db_file.as_ref().ok_or_else(|| {
            StreamError::ConfigError("catalog backend: 'db-file' option not set".into())
        })?;
        let conn = Connection::open(path)
            .map_err(|e| StreamError::BackendError(format!("catalog backend: {e}")))?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(u32::MAX);
        let upper = now.saturating_sub(1);

        let mut stmt = conn
            .prepare(CATALOG_QUERY)
            .map_err(|e| StreamError::BackendError(format!("catalog backend: {e}")))?;
        let rows = stmt
            .query_map([self.last_ts, upper], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, u32>(6)?,
                ))
            })
            .map_err(|e| StreamError::BackendError(format!("catalog backend: {e}")))?;

        let mut batch = Vec::new();
        let mut max_ts = self.last_ts;
        for row in rows {
            let (uri, project, collector, type_str, filetime, duration, ts) =
                row.map_err(|e| StreamError::BackendError(format!("catalog backend: {e}")))?;
            let record_type = match type_str.to_ascii_lowercase().as_str() {
                "rib" | "ribs" => RecordType::Rib,
                "updates" | "update" => RecordType::Updates,
                other => {
                    log::warn!("catalog backend: skipping row with unknown type '{other}'");
                    continue;
                }
            };
            let descriptor =
                DumpDescriptor::new(uri, project, collector, record_type, filetime, duration);
            if filters.matches(&descriptor) {
                batch.push(descriptor);
            }
            max_ts = max_ts.max(ts);
        }
        self.last_ts = max_ts;
        Ok(batch)
    }
}
