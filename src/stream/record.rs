//! Record: the unit the pipeline hands to the caller from `next_record`.

use crate::models::MrtRecord;
use crate::stream::descriptor::DumpDescriptor;
use std::sync::Arc;

/// Where in its source dump file this record falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpPosition {
    Start,
    Middle,
    End,
}

/// Status taxonomy attached to every emitted [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Valid,
    Filtered,
    Empty,
    Corrupted,
    OpenFailed,
}

/// One emitted record. `raw_entry` is `None` for synthesized error records (`OpenFailed`,
/// `Corrupted`, `Empty`, `NoMatch`-as-`Filtered`) that carry no decodable MRT entry.
///
/// `descriptor` is reference-counted rather than borrowed so a caller can retain an emitted
/// `Record` across further `next_record` calls without aliasing the `Reader` that produced it.
#[derive(Debug, Clone)]
pub struct Record {
    pub descriptor: Arc<DumpDescriptor>,
    pub raw_entry: Option<MrtRecord>,
    pub dump_position: DumpPosition,
    pub status: RecordStatus,
    /// Timestamp of the contained MRT entry. For a synthesized error record that carries no
    /// entry, this is the last valid entry's timestamp if one was read, otherwise the
    /// descriptor's filetime.
    pub record_time: u32,
    pub dump_time: u32,
}

impl Record {
    pub fn is_valid(&self) -> bool {
        matches!(self.status, RecordStatus::Valid)
    }
}
