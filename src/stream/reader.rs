//! Reader Set: for each admitted dump descriptor, an open MRT reader with a one-entry
//! lookahead buffer, organized as a min-heap on the lookahead's timestamp.

use crate::error::ParserError;
use crate::io::get_reader;
use crate::models::{MrtRecord, PeerIndexTable};
use crate::parser::BgpkitParser;
use crate::stream::descriptor::DumpDescriptor;
use crate::stream::filter::FilterSet;
use crate::stream::record::{DumpPosition, Record, RecordStatus};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Resolves TABLE_DUMP_V2 peer indices against the one `PEER_INDEX_TABLE` entry that arrives
/// ahead of the RIB entries referencing it in the same file. Mirrors the
/// `peer_table: Option<PeerIndexTable>` field the parser's own [`crate::parser::mrt::mrt_elem::Elementor`]
/// keeps for the same reason, scoped per open file rather than per `Elementor`.
#[derive(Debug, Default)]
pub struct PeerIndexLookup {
    table: Option<PeerIndexTable>,
}

impl PeerIndexLookup {
    pub fn new() -> Self {
        PeerIndexLookup::default()
    }

    /// Records the file's `PEER_INDEX_TABLE`, replacing any earlier one (a file only ever
    /// carries one, but a later table wins if that invariant is ever violated).
    pub fn observe(&mut self, table: PeerIndexTable) {
        self.table = Some(table);
    }

    /// Resolves `peer_index` against the observed table. `None` if no table has been seen yet,
    /// or the index is out of range.
    pub fn resolve(&self, peer_index: u16) -> Option<&crate::models::Peer> {
        self.table.as_ref()?.id_peer_map.get(&peer_index)
    }
}

/// Per-reader state. Terminal once `status != Live`; terminal readers are never heaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderStatus {
    Live,
    Exhausted,
    Corrupted,
    Empty,
    NoMatch,
    OpenFailed,
}

impl ReaderStatus {
    fn is_terminal(self) -> bool {
        !matches!(self, ReaderStatus::Live)
    }
}

/// An open MRT file plus its one-entry lookahead.
pub struct Reader {
    pub descriptor: Arc<DumpDescriptor>,
    parser: BgpkitParser<Box<dyn std::io::Read + Send>>,
    lookahead: Option<MrtRecord>,
    pub status: ReaderStatus,
    pub successful_reads: u32,
    pub valid_reads: u32,
    emitted_any: bool,
    /// Timestamp of the last entry successfully emitted, used as the `record_time` of a
    /// synthesized terminal record discovered after at least one valid entry (e.g. a file that
    /// goes corrupt partway through) instead of falling back to the file's nominal filetime.
    last_valid_timestamp: Option<u32>,
    /// Monotonic insertion counter, used to break ties between equal lookahead timestamps FIFO.
    seq: u64,
}

impl Reader {
    /// Opens `descriptor`'s URI and performs the first `fill_lookahead`. On open failure,
    /// returns a terminal `OpenFailed` reader whose `next_record` synthesizes one record.
    fn open(descriptor: Arc<DumpDescriptor>, filters: &FilterSet, seq: u64) -> Reader {
        match get_reader(&descriptor.uri) {
            Ok(raw) => {
                let mut reader = Reader {
                    descriptor,
                    parser: BgpkitParser::from_reader(raw),
                    lookahead: None,
                    status: ReaderStatus::Live,
                    successful_reads: 0,
                    valid_reads: 0,
                    emitted_any: false,
                    last_valid_timestamp: None,
                    seq,
                };
                reader.fill_lookahead(filters);
                reader
            }
            Err(_e) => Reader {
                descriptor,
                parser: BgpkitParser::from_reader(Box::new(std::io::empty())),
                lookahead: None,
                status: ReaderStatus::OpenFailed,
                successful_reads: 0,
                valid_reads: 0,
                emitted_any: false,
                last_valid_timestamp: None,
                seq,
            },
        }
    }

    /// Repeatedly pulls raw entries until one passes the Filter Set's time check, or the
    /// parser signals exhaust/corruption.
    fn fill_lookahead(&mut self, filters: &FilterSet) {
        loop {
            match self.parser.next_record() {
                Ok(entry) => {
                    self.successful_reads += 1;
                    let ts = entry.common_header.timestamp;
                    if filters.matches_time(ts, self.descriptor.record_type) {
                        self.valid_reads += 1;
                        self.lookahead = Some(entry);
                        return;
                    }
                    // fails filter: stay Live, retry with the next entry.
                }
                Err(e) => {
                    self.lookahead = None;
                    self.status = match &e.error {
                        ParserError::EofExpected | ParserError::EofError(_) => {
                            if self.successful_reads == 0 {
                                ReaderStatus::Empty
                            } else if self.valid_reads == 0 {
                                ReaderStatus::NoMatch
                            } else {
                                ReaderStatus::Exhausted
                            }
                        }
                        _ => ReaderStatus::Corrupted,
                    };
                    return;
                }
            }
        }
    }

    fn lookahead_timestamp(&self) -> u32 {
        self.lookahead
            .as_ref()
            .map(|r| r.common_header.timestamp)
            .unwrap_or(self.descriptor.filetime)
    }

    /// Pops the lookahead entry (if any) and builds the `Record` for it, assigning status and
    /// dump position, then advances the lookahead.
    fn emit(&mut self, filters: &FilterSet) -> (Record, ReaderFate) {
        let pre_status = self.status;
        let descriptor = self.descriptor.clone();

        if pre_status != ReaderStatus::Live {
            // Terminal already (on open, or discovered by a previous emit): synthesize one
            // record with no entry to show, then the reader is fully done. A reader that
            // turned corrupt after reading at least one valid entry carries that entry's
            // timestamp forward rather than reporting the file's nominal filetime, so emission
            // stays monotonic across the whole stream.
            let status = match pre_status {
                ReaderStatus::OpenFailed => RecordStatus::OpenFailed,
                ReaderStatus::Corrupted => RecordStatus::Corrupted,
                ReaderStatus::Empty => RecordStatus::Empty,
                ReaderStatus::NoMatch => RecordStatus::Filtered,
                ReaderStatus::Exhausted | ReaderStatus::Live => unreachable!(),
            };
            let record_time = self.last_valid_timestamp.unwrap_or(self.descriptor.filetime);
            let record = Record {
                descriptor,
                raw_entry: None,
                dump_position: DumpPosition::End,
                status,
                record_time,
                dump_time: self.descriptor.filetime,
            };
            return (record, ReaderFate::Done);
        }

        let entry = self.lookahead.take().expect("Live reader always has a lookahead");
        let record_time = entry.common_header.timestamp;
        self.last_valid_timestamp = Some(record_time);
        let position = if !self.emitted_any {
            DumpPosition::Start
        } else {
            DumpPosition::Middle
        };
        self.emitted_any = true;

        // Advance the lookahead before deciding the final position: a clean-EOF `End` record
        // merges into this entry's record, while a mid-file `Corrupted` discovery leaves this
        // entry's position/status untouched and instead schedules one synthesized follow-up
        // record.
        self.fill_lookahead(filters);

        let (position, status, fate) = match self.status {
            ReaderStatus::Live => (position, RecordStatus::Valid, ReaderFate::StillLive),
            ReaderStatus::Exhausted => (DumpPosition::End, RecordStatus::Valid, ReaderFate::Done),
            ReaderStatus::Corrupted => (position, RecordStatus::Valid, ReaderFate::NeedsFollowup),
            // `valid_reads` is already >= 1 (this very entry), so these can't occur here.
            ReaderStatus::Empty | ReaderStatus::NoMatch | ReaderStatus::OpenFailed => {
                unreachable!("reader with a prior valid lookahead can't regress to {:?}", self.status)
            }
        };

        let record = Record {
            descriptor,
            raw_entry: Some(entry),
            dump_position: position,
            status,
            record_time,
            dump_time: self.descriptor.filetime,
        };
        (record, fate)
    }
}

/// What the `ReaderSet` should do with a reader after `emit` returns.
enum ReaderFate {
    /// Push back into the heap, its lookahead already refreshed.
    StillLive,
    /// Drop it; it has emitted its last record.
    Done,
    /// Park it for exactly one more call, which will synthesize its terminal error record.
    NeedsFollowup,
}

/// Heap entry ordered by ascending lookahead timestamp, ties broken FIFO by insertion order.
struct HeapEntry(Reader);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.lookahead_timestamp() == other.0.lookahead_timestamp() && self.0.seq == other.0.seq
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse timestamp (and seq for FIFO tie-break) so the
        // smallest timestamp / earliest insertion comes out on top.
        other
            .0
            .lookahead_timestamp()
            .cmp(&self.0.lookahead_timestamp())
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// Min-heap of live readers plus a side list of terminal-on-open readers awaiting a single
/// synthesized emission; these never enter the heap since they have no lookahead timestamp
/// to order on.
#[derive(Default)]
pub struct ReaderSet {
    heap: BinaryHeap<HeapEntry>,
    pending_terminal: Vec<Reader>,
    next_seq: u64,
}

impl ReaderSet {
    pub fn new() -> Self {
        ReaderSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty() && self.pending_terminal.is_empty()
    }

    /// Opens each descriptor in `batch` and inserts it into the heap (if live) or the
    /// terminal-on-open side list (if it failed to open).
    pub fn absorb(&mut self, batch: Vec<DumpDescriptor>, filters: &FilterSet) {
        for descriptor in batch {
            let seq = self.next_seq;
            self.next_seq += 1;
            let reader = Reader::open(Arc::new(descriptor), filters, seq);
            if reader.status == ReaderStatus::OpenFailed {
                self.pending_terminal.push(reader);
            } else if reader.status == ReaderStatus::Live {
                self.heap.push(HeapEntry(reader));
            } else {
                // Filled to terminal on the very first read (e.g. an empty file): still
                // needs exactly one synthesized record.
                self.pending_terminal.push(reader);
            }
        }
    }

    /// The merge step: always drains pending terminal readers first, then pops the reader
    /// with the lowest lookahead timestamp off the heap.
    pub fn next_record(&mut self, filters: &FilterSet) -> Option<Record> {
        if let Some(mut reader) = self.pending_terminal.pop() {
            let (record, _fate) = reader.emit(filters);
            return Some(record);
        }
        let HeapEntry(mut reader) = self.heap.pop()?;
        let (record, fate) = reader.emit(filters);
        match fate {
            ReaderFate::StillLive => self.heap.push(HeapEntry(reader)),
            ReaderFate::Done => {}
            ReaderFate::NeedsFollowup => self.pending_terminal.push(reader),
        }
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_status_terminal_classification() {
        assert!(!ReaderStatus::Live.is_terminal());
        assert!(ReaderStatus::Exhausted.is_terminal());
        assert!(ReaderStatus::Empty.is_terminal());
        assert!(ReaderStatus::NoMatch.is_terminal());
        assert!(ReaderStatus::Corrupted.is_terminal());
        assert!(ReaderStatus::OpenFailed.is_terminal());
    }
}
