//! Control API: `BgpStream` wires the Filter Set, Data Interface, Input Queue and
//! Reader Set together behind `create`/`add_filter`/`start`/`next_record`/`stop`/`destroy`.

use crate::stream::data_interface::DataInterface;
use crate::stream::error::StreamError;
use crate::stream::filter::{Filter, FilterSet};
use crate::stream::queue::InputQueue;
use crate::stream::reader::ReaderSet;
use crate::stream::record::Record;
use std::time::Duration;

/// Backoff schedule for live-mode polling: starts at 20s, doubles once ten
/// consecutive empty polls have elapsed, capped at 150s, and resets on the first non-empty poll.
const INITIAL_BACKOFF_SECS: u64 = 20;
const DOUBLING_THRESHOLD: u32 = 10;
const MAX_BACKOFF_SECS: u64 = 150;

/// Lifecycle state of a [`BgpStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Allocated,
    Running,
    Failed,
}

struct Backoff {
    sleep_secs: u64,
    consecutive_empty: u32,
}

impl Backoff {
    fn new() -> Self {
        Backoff {
            sleep_secs: INITIAL_BACKOFF_SECS,
            consecutive_empty: 0,
        }
    }

    /// Called after an empty poll; returns the duration to sleep before retrying: ten pulls at
    /// 20s, then doubling each further empty pull, capped at 150s.
    fn empty_poll(&mut self) -> Duration {
        self.consecutive_empty += 1;
        let sleep = self.sleep_secs;
        if self.consecutive_empty >= DOUBLING_THRESHOLD {
            self.sleep_secs = (self.sleep_secs * 2).min(MAX_BACKOFF_SECS);
        }
        Duration::from_secs(sleep)
    }

    fn reset(&mut self) {
        self.sleep_secs = INITIAL_BACKOFF_SECS;
        self.consecutive_empty = 0;
    }
}

/// The four-stage pipeline's Control API. Created in the `Allocated` state, where filters and
/// the data interface backend may be configured; `start` transitions to `Running`, where
/// `next_record` lazily refills the Input Queue from the Data Interface and drives the Reader
/// Set's merge.
pub struct BgpStream {
    state: State,
    filters: FilterSet,
    live: bool,
    backend: Option<Box<dyn DataInterface>>,
    queue: InputQueue,
    readers: ReaderSet,
    backoff: Backoff,
}

impl Default for BgpStream {
    fn default() -> Self {
        BgpStream {
            state: State::Allocated,
            filters: FilterSet::new(),
            live: false,
            backend: None,
            queue: InputQueue::new(),
            readers: ReaderSet::new(),
            backoff: Backoff::new(),
        }
    }
}

impl BgpStream {
    pub fn create() -> Self {
        BgpStream::default()
    }

    fn require_allocated(&self, what: &str) -> Result<(), StreamError> {
        if self.state != State::Allocated {
            let msg = format!("{what} is only legal in the Allocated state");
            log::warn!("{msg}");
            return Err(StreamError::ConfigError(msg));
        }
        Ok(())
    }

    /// Registers a descriptor-level filter. Legal only before `start`.
    pub fn add_filter(&mut self, filter: Filter) -> Result<(), StreamError> {
        self.require_allocated("add_filter")?;
        self.filters.add(filter);
        Ok(())
    }

    /// Registers a time interval filter, `end = None` meaning "forever".
    pub fn add_interval_filter(&mut self, begin: u32, end: Option<u32>) -> Result<(), StreamError> {
        self.require_allocated("add_interval_filter")?;
        self.filters.add_interval(begin, end);
        Ok(())
    }

    /// Selects the backend driving the Data Interface stage. Legal only before `start`.
    pub fn set_data_interface(&mut self, backend: Box<dyn DataInterface>) -> Result<(), StreamError> {
        self.require_allocated("set_data_interface")?;
        self.backend = Some(backend);
        Ok(())
    }

    /// Declares live mode: an exhausted Data Interface backend causes `next_record` to sleep and
    /// retry rather than signal end-of-stream.
    pub fn set_blocking(&mut self) -> Result<(), StreamError> {
        self.require_allocated("set_blocking")?;
        self.live = true;
        Ok(())
    }

    /// Allocated -> Running. Fails if no backend has been configured.
    pub fn start(&mut self) -> Result<(), StreamError> {
        self.require_allocated("start")?;
        if self.backend.is_none() {
            self.state = State::Failed;
            return Err(StreamError::ConfigError(
                "start: no data interface backend configured".into(),
            ));
        }
        self.state = State::Running;
        Ok(())
    }

    /// Returns the next record in strictly non-decreasing `record_time` order, refilling the
    /// Reader Set and Input Queue from the Data Interface as needed. `Ok(None)` signals a clean
    /// (non-live) end-of-stream; `Err` is a fatal stream-level failure.
    pub fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        if self.state != State::Running {
            return Err(StreamError::ConfigError(
                "next_record: stream is not Running".into(),
            ));
        }

        loop {
            if let Some(record) = self.readers.next_record(&self.filters) {
                return Ok(Some(record));
            }

            if self.queue.is_empty() {
                match self.refill_queue() {
                    Ok(true) => continue,
                    Ok(false) => return Ok(None),
                    Err(e) => {
                        self.state = State::Failed;
                        return Err(e);
                    }
                }
            }

            let batch = self.queue.pop_batch();
            self.readers.absorb(batch, &self.filters);
        }
    }

    /// Pulls processing batches from the Data Interface until the Input Queue is non-empty.
    /// Returns `Ok(true)` once descriptors are queued, `Ok(false)` on non-live end-of-stream.
    fn refill_queue(&mut self) -> Result<bool, StreamError> {
        loop {
            let backend = self
                .backend
                .as_mut()
                .expect("Running state implies a configured backend");
            log::debug!("polling data interface backend (live={})", self.live);
            let batch = backend.produce_batch(&self.filters, self.live)?;

            if batch.is_empty() {
                if !self.live {
                    return Ok(false);
                }
                let sleep = self.backoff.empty_poll();
                log::info!("data interface backend empty, sleeping {}s", sleep.as_secs());
                std::thread::sleep(sleep);
                continue;
            }

            self.backoff.reset();
            let mut queued_any = false;
            for descriptor in batch {
                if self.queue.push(descriptor) {
                    queued_any = true;
                }
            }
            if queued_any {
                return Ok(true);
            }
            // Every descriptor in this batch was already queued (duplicate poll); try again.
        }
    }

    /// Tears down the Reader Set (closing all parsers) and the Input Queue, in that order.
    /// Idempotent.
    pub fn stop(&mut self) {
        self.readers = ReaderSet::new();
        self.queue = InputQueue::new();
    }

    /// Tears down the backend and releases all state. After `destroy`, the stream is left in a
    /// fresh `Allocated` state, mirroring `create()`.
    pub fn destroy(&mut self) {
        self.stop();
        self.backend = None;
        self.filters = FilterSet::new();
        self.live = false;
        self.backoff.reset();
        self.state = State::Allocated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_rejected_after_start_fails_without_backend() {
        let mut stream = BgpStream::create();
        assert!(stream.start().is_err());
        // A failed start leaves the stream in the terminal Failed state, not back in Allocated.
        assert!(stream
            .add_filter(Filter::Project("routeviews".into()))
            .is_err());
    }

    #[test]
    fn backoff_schedule_escalates_after_ten_empty_polls() {
        let mut backoff = Backoff::new();
        let mut sleeps = Vec::new();
        for _ in 0..12 {
            sleeps.push(backoff.empty_poll().as_secs());
        }
        assert_eq!(
            sleeps,
            vec![20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 40, 80]
        );
        backoff.reset();
        assert_eq!(backoff.empty_poll().as_secs(), 20);
    }

    #[test]
    fn backoff_caps_at_150() {
        let mut backoff = Backoff::new();
        for _ in 0..20 {
            backoff.empty_poll();
        }
        assert_eq!(backoff.empty_poll().as_secs(), 150);
    }
}
