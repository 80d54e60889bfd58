//! Data Interface: polls one configured backend to discover dump descriptors satisfying the
//! Filter Set.

mod broker;
mod csv_file;
mod single_file;
mod sqlite;

pub use broker::BrokerInterface;
pub use csv_file::CsvFileInterface;
pub use single_file::SingleFileInterface;
pub use sqlite::SqliteInterface;

use crate::stream::descriptor::DumpDescriptor;
use crate::stream::error::StreamError;
use crate::stream::filter::FilterSet;

/// A pluggable backend for discovering [`DumpDescriptor`]s. Each backend maps the Filter Set to
/// its native query and discovers descriptors incrementally; every call must be idempotent and
/// must never emit the same `(filetime, uri)` twice.
pub trait DataInterface {
    fn produce_batch(
        &mut self,
        filters: &FilterSet,
        live: bool,
    ) -> Result<Vec<DumpDescriptor>, StreamError>;
}

/// Sets a backend option by name, e.g. `"rib-file"`, `"csv-file"`, `"db-file"`, `"url"`, `"param"`.
/// Backends that don't recognize `key` return a `ConfigError`.
pub trait DataInterfaceOptions {
    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StreamError>;
}
