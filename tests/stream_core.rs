//! Integration tests for the BGPStream ingestion pipeline's public surface
//! (`bgpkit_parser::stream`), exercising the Control API against a fake `DataInterface` backend
//! so the tests don't depend on real remote or on-disk MRT archives.
#![cfg(feature = "stream")]

use bgpkit_parser::stream::{
    BgpStream, DataInterface, DumpDescriptor, Filter, FilterSet, RecordStatus, RecordType,
    StreamError,
};

/// A backend that returns a fixed list of batches, one per call, applying the Filter Set the
/// same way a real backend would before handing descriptors to the core.
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
        Ok(batch
            .into_iter()
            .filter(|d| filters.matches(d))
            .collect())
    }
}

fn nonexistent_descriptor(uri: &str, filetime: u32) -> DumpDescriptor {
    DumpDescriptor::new(
        uri,
        "routeviews",
        "route-views2",
        RecordType::Rib,
        filetime,
        900,
    )
}

#[test]
fn open_failed_descriptor_emits_one_synthesized_record() {
    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![
            nonexistent_descriptor("/nonexistent/path/rib.mrt", 1_405_382_400),
        ]])))
        .unwrap();
    stream.start().unwrap();

    let record = stream.next_record().unwrap().expect("one synthesized record");
    assert_eq!(record.status, RecordStatus::OpenFailed);
    assert!(record.raw_entry.is_none());

    // Non-live mode: the backend has nothing left, so the stream now ends cleanly.
    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn duplicate_descriptors_in_one_batch_collapse_to_a_single_reader() {
    let dup_a = nonexistent_descriptor("/nonexistent/dup.mrt", 1_405_382_400);
    let dup_b = dup_a.clone();

    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![dup_a, dup_b]])))
        .unwrap();
    stream.start().unwrap();

    // Only one record (one reader) despite the batch containing the descriptor twice.
    let first = stream.next_record().unwrap();
    assert!(first.is_some());
    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn non_matching_project_descriptor_never_reaches_the_reader_set() {
    let mut stream = BgpStream::create();
    stream.add_filter(Filter::Project("ris".into())).unwrap();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![vec![
            nonexistent_descriptor("/nonexistent/routeviews.mrt", 1_405_382_400),
        ]])))
        .unwrap();
    stream.start().unwrap();

    // The scripted backend applies the Filter Set itself (as a real backend would), so a
    // "routeviews"-labelled descriptor never survives an "ris"-only project filter.
    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn add_filter_after_start_is_rejected() {
    let mut stream = BgpStream::create();
    stream
        .set_data_interface(Box::new(ScriptedBackend::new(vec![])))
        .unwrap();
    stream.start().unwrap();
    let err = stream.add_filter(Filter::Project("routeviews".into()));
    assert!(err.is_err());
}
