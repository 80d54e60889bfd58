//! End-to-end tests driving the full `BgpStream` pipeline against real, on-disk MRT bytes
//! hand-built the same way `tests/raw_iter.rs` builds raw records for the underlying parser --
//! these exercise the merge core's cross-file ordering and error-recovery guarantees rather
//! than just its isolated unit logic.
#![cfg(feature = "stream")]

use bgpkit_parser::stream::{
    BgpStream, DataInterface, DumpDescriptor, DumpPosition, FilterSet, RecordStatus, RecordType,
    StreamError,
};
use bytes::{BufMut, BytesMut};
use std::io::Write;

/// One MRT TABLE_DUMP (v1, IPv4) record with a distinct outer timestamp. The body fields are
/// otherwise fixed dummy values -- only `common_header.timestamp` (what `Reader` sorts and
/// `Record::record_time` reports) varies between entries.
fn table_dump_v1_record(timestamp: u32) -> Vec<u8> {
    let mut body = BytesMut::new();
    body.put_u16(0); // view number
    body.put_u16(0); // sequence number
    body.put_u32(0); // prefix 0.0.0.0
    body.put_u8(0); // prefix length
    body.put_u8(1); // status
    body.put_u32(timestamp); // originated time
    body.put_u32(0); // peer IP
    body.put_u16(0); // peer AS (16-bit, TABLE_DUMP v1 only supports 2-byte ASNs)
    body.put_u16(0); // attribute length
    let body = body.freeze();

    let mut header = BytesMut::new();
    header.put_u32(timestamp);
    header.put_u16(12); // EntryType::TABLE_DUMP
    header.put_u16(1); // subtype: AFI_IPV4
    header.put_u32(body.len() as u32);

    let mut out = header.to_vec();
    out.extend_from_slice(&body);
    out
}

/// A header declaring an undefined entry type, used to trigger `ReaderStatus::Corrupted`
/// mid-file (mirrors `tests/raw_iter.rs`'s `build_invalid_entry_type_header`).
fn corrupt_header(timestamp: u32) -> Vec<u8> {
    let mut header = BytesMut::new();
    header.put_u32(timestamp);
    header.put_u16(99); // undefined EntryType
    header.put_u16(0);
    header.put_u32(0);
    header.to_vec()
}

fn write_temp_file(name: &str, bytes: &[u8]) -> String {
    let mut path = std::env::temp_dir();
    path.push(format!("bgpstream-merge-test-{}-{name}", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path.to_string_lossy().into_owned()
}

/// Replays a fixed list of descriptor batches, same shape as `tests/stream_core.rs`'s
/// `ScriptedBackend`.
struct ScriptedBackend {
    batches: Vec<Vec<DumpDescriptor>>,
    next: usize,
}

impl ScriptedBackend {
    fn new(batches: Vec<Vec<DumpDescriptor>>) -> Self {
        ScriptedBackend { batches, next: 0 }
    }
}

impl DataInterface for ScriptedBackend {
    fn produce_batch(
        &mut self,
        filters: &FilterSet,
        _live: bool,
    ) -> Result<Vec<DumpDescriptor>, StreamError> {
        if self.next >= self.batches.len() {
            return Ok(Vec::new());
        }
        let batch = self.batches[self.next].clone();
        self.next += 1;
        Ok(batch.into_iter().filter(|d| filters.matches(d)).collect())
    }
}

/// Two RIB files, three entries each, 30s apart. `next_record` returns six records in
/// ascending timestamp order; the first of each file is `Start`, the last is `End`, the rest
/// `Middle`.
#[test]
fn scenario_a_two_files_ordered_with_start_middle_end_positions() {
    let file1 = write_temp_file(
        "a-file1.mrt",
        &[
            table_dump_v1_record(1_405_382_400),
            table_dump_v1_record(1_405_382_430),
            table_dump_v1_record(1_405_382_460),
        ]
        .concat(),
    );
    let file2 = write_temp_file(
        "a-file2.mrt",
        &[
            table_dump_v1_record(1_405_382_700),
            table_dump_v1_record(1_405_382_730),
            table_dump_v1_record(1_405_382_760),
        ]
        .concat(),
    );

    let d1 = DumpDescriptor::new(file1, "routeviews", "route-views2", RecordType::Rib, 1_405_382_400, 900);
    let d2 = DumpDescriptor::new(file2, "routeviews", "route-views2", RecordType::Rib, 1_405_382_700, 900);

    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![d1, d2]])))
        .unwrap();
    stream.start().unwrap();

    let mut times = Vec::new();
    let mut positions = Vec::new();
    while let Some(record) = stream.next_record().unwrap() {
        assert_eq!(record.status, RecordStatus::Valid);
        times.push(record.record_time);
        positions.push(record.dump_position);
    }

    assert_eq!(
        times,
        vec![
            1_405_382_400,
            1_405_382_430,
            1_405_382_460,
            1_405_382_700,
            1_405_382_730,
            1_405_382_760,
        ]
    );
    assert_eq!(
        positions,
        vec![
            DumpPosition::Start,
            DumpPosition::Middle,
            DumpPosition::End,
            DumpPosition::Start,
            DumpPosition::Middle,
            DumpPosition::End,
        ]
    );
}

/// A RIB file and an updates file share one filetime. Every record from the RIB file is
/// emitted before any record from the updates file, even though the updates file's only entry
/// has an earlier entry-level timestamp than the RIB's last entry.
#[test]
fn scenario_b_rib_fully_drained_before_updates_at_same_filetime() {
    let rib_file = write_temp_file(
        "b-rib.mrt",
        &[
            table_dump_v1_record(1_405_382_450),
            table_dump_v1_record(1_405_382_460),
        ]
        .concat(),
    );
    // Entry-level timestamp earlier than the RIB's entries, but the batch rule must still
    // drain the RIB first because it shares the updates file's filetime.
    let updates_file = write_temp_file("b-updates.mrt", &table_dump_v1_record(1_405_382_401));

    let rib_descriptor = DumpDescriptor::new(
        rib_file,
        "routeviews",
        "route-views2",
        RecordType::Rib,
        1_405_382_400,
        900,
    );
    let updates_descriptor = DumpDescriptor::new(
        updates_file,
        "routeviews",
        "route-views2",
        RecordType::Updates,
        1_405_382_400,
        300,
    );

    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![
            updates_descriptor,
            rib_descriptor,
        ]])))
        .unwrap();
    stream.start().unwrap();

    let mut record_types = Vec::new();
    while let Some(record) = stream.next_record().unwrap() {
        record_types.push(record.descriptor.record_type);
    }

    assert_eq!(
        record_types,
        vec![RecordType::Rib, RecordType::Rib, RecordType::Updates]
    );
}

/// Two valid entries, then a corrupted third. The file yields exactly three records:
/// (Start, Valid), (Middle, Valid), (End, Corrupted).
#[test]
fn scenario_d_corruption_mid_file_synthesizes_terminal_record() {
    let mut bytes = Vec::new();
    bytes.extend(table_dump_v1_record(1_405_382_400));
    bytes.extend(table_dump_v1_record(1_405_382_430));
    bytes.extend(corrupt_header(1_405_382_460));
    let path = write_temp_file("d-corrupt.mrt", &bytes);

    let descriptor = DumpDescriptor::new(path, "routeviews", "route-views2", RecordType::Rib, 1_405_382_400, 900);

    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![descriptor]])))
        .unwrap();
    stream.start().unwrap();

    let r1 = stream.next_record().unwrap().unwrap();
    assert_eq!(r1.dump_position, DumpPosition::Start);
    assert_eq!(r1.status, RecordStatus::Valid);
    assert_eq!(r1.record_time, 1_405_382_400);

    let r2 = stream.next_record().unwrap().unwrap();
    assert_eq!(r2.dump_position, DumpPosition::Middle);
    assert_eq!(r2.status, RecordStatus::Valid);
    assert_eq!(r2.record_time, 1_405_382_430);

    let r3 = stream.next_record().unwrap().unwrap();
    assert_eq!(r3.dump_position, DumpPosition::End);
    assert_eq!(r3.status, RecordStatus::Corrupted);
    assert!(r3.raw_entry.is_none());
    // Must carry forward the last valid entry's timestamp, not the file's nominal filetime,
    // so that emission across the whole stream stays monotonic.
    assert_eq!(r3.record_time, 1_405_382_430);

    assert!(stream.next_record().unwrap().is_none());
}

/// Two readers with equal lookahead timestamps emit in insertion order, stably, across
/// repeated runs.
#[test]
fn scenario_f_equal_timestamps_break_ties_by_insertion_order() {
    let first = write_temp_file("f-first.mrt", &table_dump_v1_record(1_405_382_400));
    let second = write_temp_file("f-second.mrt", &table_dump_v1_record(1_405_382_400));

    for _ in 0..3 {
        let d1 = DumpDescriptor::new(
            first.clone(),
            "routeviews",
            "route-views2",
            RecordType::Rib,
            1_405_382_400,
            900,
        );
        let d2 = DumpDescriptor::new(
            second.clone(),
            "routeviews",
            "route-views2",
            RecordType::Rib,
            1_405_382_400,
            900,
        );

        let mut stream = BgpStream::create();
        stream
            .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![d1, d2]])))
            .unwrap();
        stream.start().unwrap();

        let r1 = stream.next_record().unwrap().unwrap();
        let r2 = stream.next_record().unwrap().unwrap();
        assert_eq!(r1.descriptor.uri, first);
        assert_eq!(r2.descriptor.uri, second);
        assert!(stream.next_record().unwrap().is_none());
    }
}
