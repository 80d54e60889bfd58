//! BGPStream core: turns a distributed archive of raw BGP MRT dumps into a single, filtered,
//! strictly time-ordered stream of typed BGP records and their decoded elements.
//!
//! The four-stage pipeline ([`filter`], [`data_interface`], [`queue`], [`reader`]) is wired
//! together by [`pipeline::BgpStream`], the crate's public entry point for this module; each
//! stage is also usable on its own for callers assembling a custom pipeline.

pub mod data_interface;
pub mod descriptor;
pub mod elem;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod queue;
pub mod reader;
pub mod record;

pub use data_interface::{
    BrokerInterface, CsvFileInterface, DataInterface, DataInterfaceOptions, SingleFileInterface,
    SqliteInterface,
};
pub use descriptor::{DumpDescriptor, RecordType};
pub use elem::{decode_elements, AsPathValue, Element, ElementType};
pub use error::StreamError;
pub use filter::{Filter, FilterSet};
pub use pipeline::BgpStream;
pub use reader::PeerIndexLookup;
pub use record::{DumpPosition, Record, RecordStatus};
