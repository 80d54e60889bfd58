//! Input Queue: a sorted sequence of [`DumpDescriptor`]s awaiting read, dequeued in contiguous
//! "processing batches" that share `(filetime, record_type)`.

use crate::stream::descriptor::DumpDescriptor;
use std::collections::HashSet;

/// Ordered, deduplicated queue of dump descriptors.
#[derive(Debug, Default)]
pub struct InputQueue {
    items: Vec<DumpDescriptor>,
    seen: HashSet<(u32, String)>,
}

impl InputQueue {
    pub fn new() -> Self {
        InputQueue::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Inserts `descriptor` keeping the queue sorted by `(filetime asc, record_type desc)`
    /// (RIBs before updates at equal filetime). Returns `false` if `(filetime, uri)` already
    /// exists in the queue -- the insertion is rejected rather than silently deduplicated away.
    pub fn push(&mut self, descriptor: DumpDescriptor) -> bool {
        let key = (descriptor.filetime, descriptor.uri.clone());
        if self.seen.contains(&key) {
            return false;
        }
        let new_key = descriptor.order_key();
        let pos = self
            .items
            .iter()
            .position(|existing| existing.order_key() > new_key)
            .unwrap_or(self.items.len());
        self.seen.insert(key);
        self.items.insert(pos, descriptor);
        true
    }

    /// Pops a contiguous prefix sharing the head's `(filetime, record_type)`. Empty if the
    /// queue is empty.
    pub fn pop_batch(&mut self) -> Vec<DumpDescriptor> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let head_key = self.items[0].order_key();
        let split = self
            .items
            .iter()
            .position(|d| d.order_key() != head_key)
            .unwrap_or(self.items.len());
        let batch: Vec<DumpDescriptor> = self.items.drain(0..split).collect();
        for d in &batch {
            self.seen.remove(&(d.filetime, d.uri.clone()));
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::descriptor::RecordType;

    fn d(uri: &str, rt: RecordType, filetime: u32) -> DumpDescriptor {
        DumpDescriptor::new(uri, "p", "c", rt, filetime, 900)
    }

    #[test]
    fn rib_sorts_before_updates_at_equal_filetime() {
        let mut q = InputQueue::new();
        q.push(d("u1", RecordType::Updates, 100));
        q.push(d("r1", RecordType::Rib, 100));
        let batch = q.pop_batch();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].uri, "r1");
        assert!(!q.is_empty());
        let batch2 = q.pop_batch();
        assert_eq!(batch2[0].uri, "u1");
    }

    #[test]
    fn ascending_filetime_ordering() {
        let mut q = InputQueue::new();
        q.push(d("b", RecordType::Rib, 200));
        q.push(d("a", RecordType::Rib, 100));
        let batch = q.pop_batch();
        assert_eq!(batch[0].uri, "a");
    }

    #[test]
    fn duplicate_filetime_uri_rejected() {
        let mut q = InputQueue::new();
        assert!(q.push(d("same", RecordType::Rib, 100)));
        assert!(!q.push(d("same", RecordType::Rib, 100)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn batch_extraction_is_contiguous_by_type_and_filetime() {
        let mut q = InputQueue::new();
        q.push(d("r100", RecordType::Rib, 100));
        q.push(d("r100b", RecordType::Rib, 100));
        q.push(d("u100", RecordType::Updates, 100));
        q.push(d("r200", RecordType::Rib, 200));

        let b1 = q.pop_batch();
        assert_eq!(b1.len(), 2);
        let b2 = q.pop_batch();
        assert_eq!(b2.len(), 1);
        assert_eq!(b2[0].uri, "u100");
        let b3 = q.pop_batch();
        assert_eq!(b3.len(), 1);
        assert_eq!(b3[0].uri, "r200");
        assert!(q.is_empty());
    }
}
