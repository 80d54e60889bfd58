use std::io::Read;

#[macro_use]
pub mod utils;
pub mod bgp;
pub mod bmp;
pub mod filter;
pub mod iters;
pub mod mrt;
pub mod rislive;
pub mod rpki;

pub(crate) use self::utils::*;
pub(crate) use bgp::attributes::AttributeParser;
pub(crate) use mrt::{
    parse_bgp4mp, parse_table_dump_message, parse_table_dump_v2_message, try_parse_mrt_record,
};

use crate::io::get_reader;
use crate::models::MrtRecord;
pub use crate::error::{ParserError, ParserErrorWithBytes};
pub use filter::{Filter, Filterable};
pub use mrt::mrt_elem::Elementor;

/// Options that tune how a [`BgpkitParser`] recovers from malformed input.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Log a warning for each recoverable per-record parsing issue.
    pub show_warnings: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            show_warnings: true,
        }
    }
}

/// Reads one MRT file, producing [`MrtRecord`]s (or, via [`Elementor`], per-prefix [`BgpElem`](crate::BgpElem)s).
///
/// This is the "opaque MRT reader" the ingestion pipeline in [`crate::stream`] opens for each
/// dump descriptor it admits: it knows nothing about collectors, filetimes, or multi-file
/// merging, only how to decode the next record out of a byte stream.
pub struct BgpkitParser<R> {
    reader: R,
    pub(crate) filters: Vec<Filter>,
    pub options: ParserOptions,
    pub core_dump: bool,
}

impl BgpkitParser<Box<dyn Read + Send>> {
    /// Opens `path` (local file path or remote URL, optionally gzip/bzip2 compressed).
    pub fn new(path: &str) -> Result<Self, ParserError> {
        let reader = get_reader(path)?;
        Ok(BgpkitParser::from_reader(reader))
    }
}

impl<R> BgpkitParser<R> {
    pub fn from_reader(reader: R) -> Self {
        BgpkitParser {
            reader,
            filters: vec![],
            options: ParserOptions::default(),
            core_dump: false,
        }
    }

    /// Adds a [`Filter`] parsed from a `(filter_type, filter_value)` pair, consuming and
    /// returning `self` for chaining. See [`filter`] for the supported filter types.
    pub fn add_filter(mut self, filter_type: &str, filter_value: &str) -> Result<Self, ParserError> {
        let filter = Filter::new(filter_type, filter_value)?;
        self.filters.push(filter);
        Ok(self)
    }

    /// Enable dumping unparsable record bytes to `mrt_core_dump` for debugging instead of
    /// skipping them.
    pub fn with_core_dump(mut self, core_dump: bool) -> Self {
        self.core_dump = core_dump;
        self
    }
}

impl<R: Read> BgpkitParser<R> {
    /// Parses and returns the next [`MrtRecord`] from the stream, or an error. EOF is reported
    /// as `ParserError::EofExpected` wrapped in [`ParserErrorWithBytes`].
    pub fn next_record(&mut self) -> Result<MrtRecord, ParserErrorWithBytes> {
        match try_parse_mrt_record(&mut self.reader) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ParserErrorWithBytes::from(ParserError::EofExpected)),
            Err(e) => Err(ParserErrorWithBytes::from(e)),
        }
    }
}
