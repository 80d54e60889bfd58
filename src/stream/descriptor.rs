//! Dump descriptors: the unit of work handed from the Data Interface to the Input Queue.

use std::fmt::{self, Display, Formatter};

/// Whether a dump file is a RIB snapshot or an updates stream.
///
/// Ordering matters: at equal filetime, RIBs sort before updates in the Input Queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordType {
    Rib,
    Updates,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Rib => "rib",
            RecordType::Updates => "updates",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invariant tuple describing one raw MRT file, as produced by a [`crate::stream::data_interface::DataInterface`].
///
/// Owned by the Input Queue until dequeued into a [`crate::stream::reader::Reader`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DumpDescriptor {
    pub uri: String,
    pub project: String,
    pub collector: String,
    pub record_type: RecordType,
    /// Nominal epoch-second timestamp labeling the dump file.
    pub filetime: u32,
    /// Nominal duration of the dump window, in seconds.
    pub nominal_duration_seconds: u32,
}

impl DumpDescriptor {
    pub fn new(
        uri: impl Into<String>,
        project: impl Into<String>,
        collector: impl Into<String>,
        record_type: RecordType,
        filetime: u32,
        nominal_duration_seconds: u32,
    ) -> Self {
        DumpDescriptor {
            uri: uri.into(),
            project: project.into(),
            collector: collector.into(),
            record_type,
            filetime,
            nominal_duration_seconds,
        }
    }

    /// The `(filetime, uri)` pair the Input Queue deduplicates on.
    pub fn dedup_key(&self) -> (u32, &str) {
        (self.filetime, self.uri.as_str())
    }

    /// Ordering key used for Input Queue insertion: ascending filetime, RIB before updates.
    pub(crate) fn order_key(&self) -> (u32, u8) {
        let type_rank = match self.record_type {
            RecordType::Rib => 0,
            RecordType::Updates => 1,
        };
        (self.filetime, type_rank)
    }
}
