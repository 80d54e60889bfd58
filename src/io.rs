//! Byte-stream opener: turns a dump descriptor's URI into a readable stream.
//!
//! This is the one external collaborator the ingestion pipeline delegates transport to --
//! local paths, `http(s)://` URLs, and gzip/bzip2 transparent decompression are handled by
//! [`oneio`], the same way the rest of the BGPKIT stack resolves remote MRT archives.
use crate::ParserError;
use std::io::Read;

/// Open `path` (local file or remote URL, optionally gzip/bzip2 compressed) for reading.
pub(crate) fn get_reader(path: &str) -> Result<Box<dyn Read + Send>, ParserError> {
    Ok(oneio::get_reader(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scheme_falls_through_to_oneio() {
        // oneio itself rejects unreadable paths; this merely documents the contract that
        // `get_reader` is a thin, fallible wrapper rather than bespoke transport logic.
        assert!(get_reader("/nonexistent/path/should/not/exist.mrt").is_err());
    }
}