//! RPKI-to-Router (RTR) Protocol Parser
//!
//! This module provides parsing and encoding functions for RTR protocol PDUs
//! as defined in RFC 6810 (v0) and RFC 8210 (v1).
//!
//! # Parsing
//!
//! ```rust
//! use bgpkit_parser::parser::rpki::rtr::{parse_rtr_pdu, read_rtr_pdu};
//! use bgpkit_parser::models::rpki::rtr::*;
//!
//! // Parse from a byte slice
//! let bytes = [1, 2, 0, 0, 0, 0, 0, 8]; // Reset Query v1
//! let (pdu, consumed) = parse_rtr_pdu(&bytes).unwrap();
//! assert_eq!(consumed, 8);
//! ```
//!
//! # Encoding
//!
//! ```rust
//! use bgpkit_parser::parser::rpki::rtr::RtrEncode;
//! use bgpkit_parser::models::rpki::rtr::*;
//!
//! let query = RtrResetQuery::new_v1();
//! let bytes = query.encode();
//! assert_eq!(bytes.len(), 8);
//! ```

use crate::models::rpki::rtr::*;
use crate::models::Asn;
use std::fmt;
use std::io::{self, Read};
use std::net::{Ipv4Addr, Ipv6Addr};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during RTR PDU parsing or encoding
#[derive(Debug)]
pub enum RtrError {
    /// I/O error during reading
    IoError(io::Error),
    /// PDU is incomplete (need more data)
    IncompletePdu {
        /// Number of bytes available
        available: usize,
        /// Number of bytes needed
        needed: usize,
    },
    /// Invalid PDU type
    InvalidPduType(u8),
    /// Invalid protocol version
    InvalidProtocolVersion(u8),
    /// Invalid error code
    InvalidErrorCode(u16),
    /// Invalid PDU length
    InvalidLength {
        /// Expected length
        expected: u32,
        /// Actual length in header
        actual: u32,
        /// PDU type
        pdu_type: u8,
    },
    /// Invalid prefix length
    InvalidPrefixLength {
        /// Prefix length
        prefix_len: u8,
        /// Maximum length
        max_len: u8,
        /// Maximum allowed for address family (32 for IPv4, 128 for IPv6)
        max_allowed: u8,
    },
    /// Invalid UTF-8 in error text
    InvalidUtf8,
    /// Router Key PDU in v0 (not supported)
    RouterKeyInV0,
}

impl fmt::Display for RtrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtrError::IoError(e) => write!(f, "I/O error: {}", e),
            RtrError::IncompletePdu { available, needed } => {
                write!(
                    f,
                    "Incomplete PDU: have {} bytes, need {} bytes",
                    available, needed
                )
            }
            RtrError::InvalidPduType(t) => write!(f, "Invalid PDU type: {}", t),
            RtrError::InvalidProtocolVersion(v) => write!(f, "Invalid protocol version: {}", v),
            RtrError::InvalidErrorCode(c) => write!(f, "Invalid error code: {}", c),
            RtrError::InvalidLength {
                expected,
                actual,
                pdu_type,
            } => {
                write!(
                    f,
                    "Invalid length for PDU type {}: expected {}, got {}",
                    pdu_type, expected, actual
                )
            }
            RtrError::InvalidPrefixLength {
                prefix_len,
                max_len,
                max_allowed,
            } => {
                write!(
                    f,
                    "Invalid prefix length: prefix_len={}, max_len={}, max_allowed={}",
                    prefix_len, max_len, max_allowed
                )
            }
            RtrError::InvalidUtf8 => write!(f, "Invalid UTF-8 in error text"),
            RtrError::RouterKeyInV0 => write!(f, "Router Key PDU is not valid in RTR v0"),
        }
    }
}

impl std::error::Error for RtrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RtrError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RtrError {
    fn from(e: io::Error) -> Self {
        RtrError::IoError(e)
    }
}

// =============================================================================
// PDU Length Constants
// =============================================================================

/// RTR PDU header length (common to all PDUs)
pub const RTR_HEADER_LEN: usize = 8;

/// Serial Notify PDU length
pub const RTR_SERIAL_NOTIFY_LEN: u32 = 12;

/// Serial Query PDU length
pub const RTR_SERIAL_QUERY_LEN: u32 = 12;

/// Reset Query PDU length
pub const RTR_RESET_QUERY_LEN: u32 = 8;

/// Cache Response PDU length
pub const RTR_CACHE_RESPONSE_LEN: u32 = 8;

/// IPv4 Prefix PDU length
pub const RTR_IPV4_PREFIX_LEN: u32 = 20;

/// IPv6 Prefix PDU length
pub const RTR_IPV6_PREFIX_LEN: u32 = 32;

/// End of Data PDU length (v0)
pub const RTR_END_OF_DATA_V0_LEN: u32 = 12;

/// End of Data PDU length (v1)
pub const RTR_END_OF_DATA_V1_LEN: u32 = 24;

/// Cache Reset PDU length
pub const RTR_CACHE_RESET_LEN: u32 = 8;

/// Router Key PDU minimum length (header(8) + flags(1) + zero(1) + SKI(20) + ASN(4) = 34)
pub const RTR_ROUTER_KEY_MIN_LEN: u32 = 34;

// =============================================================================
// Parsing Functions
// =============================================================================

/// Parse a single RTR PDU from a byte slice.
///
/// Returns the parsed PDU and the number of bytes consumed.
///
/// # Errors
///
/// Returns an error if the input is too short, contains invalid data,
/// or references an unknown PDU type.
///
/// # Example
///
/// ```rust
/// use bgpkit_parser::parser::rpki::rtr::parse_rtr_pdu;
/// use bgpkit_parser::models::rpki::rtr::*;
///
/// // Reset Query PDU (v1)
/// let bytes = [1, 2, 0, 0, 0, 0, 0, 8];
/// let (pdu, consumed) = parse_rtr_pdu(&bytes).unwrap();
/// assert!(matches!(pdu, RtrPdu::ResetQuery(_)));
/// assert_eq!(consumed, 8);
/// ```
pub fn parse_rtr_pdu(input: &[u8]) -> Result<(RtrPdu, usize), RtrError> {
    // Need at least the header
    if input.len() < RTR_HEADER_LEN {
        return Err(RtrError::IncompletePdu {
            available: input.len(),
            needed: RTR_HEADER_LEN,
        });
    }

    // Parse header
    let version_byte = input[0];
    let pdu_type_byte = input[1];
    let session_or_error = u16::from_be_bytes([input[2], input[3]]);
    let length = u32::from_be_bytes([input[4], input[5], input[6], input[7]]);

    // Validate we have enough data
    let length_usize = length as usize;
    if input.len() < length_usize {
        return Err(RtrError::IncompletePdu {
            available: input.len(),
            needed: length_usize,
        });
    }

    // Parse version
    let version = RtrProtocolVersion::from_u8(version_byte)
        .ok_or(RtrError::InvalidProtocolVersion(version_byte))?;

    // Parse PDU type
    let pdu_type =
        RtrPduType::from_u8(pdu_type_byte).ok_or(RtrError::InvalidPduType(pdu_type_byte))?;

    // Parse based on PDU type
    let pdu = match pdu_type {
        RtrPduType::SerialNotify => {
            validate_length(length, RTR_SERIAL_NOTIFY_LEN, pdu_type_byte)?;
            let serial_number = u32::from_be_bytes([input[8], input[9], input[10], input[11]]);
            RtrPdu::SerialNotify(RtrSerialNotify {
                version,
                session_id: session_or_error,
                serial_number,
            })
        }

        RtrPduType::SerialQuery => {
            validate_length(length, RTR_SERIAL_QUERY_LEN, pdu_type_byte)?;
            let serial_number = u32::from_be_bytes([input[8], input[9], input[10], input[11]]);
            RtrPdu::SerialQuery(RtrSerialQuery {
                version,
                session_id: session_or_error,
                serial_number,
            })
        }

        RtrPduType::ResetQuery => {
            validate_length(length, RTR_RESET_QUERY_LEN, pdu_type_byte)?;
            RtrPdu::ResetQuery(RtrResetQuery { version })
        }

        RtrPduType::CacheResponse => {
            validate_length(length, RTR_CACHE_RESPONSE_LEN, pdu_type_byte)?;
            RtrPdu::CacheResponse(RtrCacheResponse {
                version,
                session_id: session_or_error,
            })
        }

        RtrPduType::IPv4Prefix => {
            validate_length(length, RTR_IPV4_PREFIX_LEN, pdu_type_byte)?;
            let flags = input[8];
            let prefix_length = input[9];
            let max_length = input[10];
            // input[11] is reserved/zero

            validate_prefix_length(prefix_length, max_length, 32)?;

            let prefix = Ipv4Addr::new(input[12], input[13], input[14], input[15]);
            let asn = u32::from_be_bytes([input[16], input[17], input[18], input[19]]);

            RtrPdu::IPv4Prefix(RtrIPv4Prefix {
                version,
                flags,
                prefix_length,
                max_length,
                prefix,
                asn: Asn::from(asn),
            })
        }

        RtrPduType::IPv6Prefix => {
            validate_length(length, RTR_IPV6_PREFIX_LEN, pdu_type_byte)?;
            let flags = input[8];
            let prefix_length = input[9];
            let max_length = input[10];
            // input[11] is reserved/zero

            validate_prefix_length(prefix_length, max_length, 128)?;

            let prefix = Ipv6Addr::from([
                input[12], input[13], input[14], input[15], input[16], input[17], input[18],
                input[19], input[20], input[21], input[22], input[23], input[24], input[25],
                input[26], input[27],
            ]);
            let asn = u32::from_be_bytes([input[28], input[29], input[30], input[31]]);

            RtrPdu::IPv6Prefix(RtrIPv6Prefix {
                version,
                flags,
                prefix_length,
                max_length,
                prefix,
                asn: Asn::from(asn),
            })
        }

        RtrPduType::EndOfData => {
            let expected_len = match version {
                RtrProtocolVersion::V0 => RTR_END_OF_DATA_V0_LEN,
                RtrProtocolVersion::V1 => RTR_END_OF_DATA_V1_LEN,
            };
            validate_length(length, expected_len, pdu_type_byte)?;

            let serial_number = u32::from_be_bytes([input[8], input[9], input[10], input[11]]);

            let (refresh_interval, retry_interval, expire_interval) = match version {
                RtrProtocolVersion::V0 => (None, None, None),
                RtrProtocolVersion::V1 => {
                    let refresh = u32::from_be_bytes([input[12], input[13], input[14], input[15]]);
                    let retry = u32::from_be_bytes([input[16], input[17], input[18], input[19]]);
                    let expire = u32::from_be_bytes([input[20], input[21], input[22], input[23]]);
                    (Some(refresh), Some(retry), Some(expire))
                }
            };

            RtrPdu::EndOfData(RtrEndOfData {
                version,
                session_id: session_or_error,
                serial_number,
                refresh_interval,
                retry_interval,
                expire_interval,
            })
        }

        RtrPduType::CacheReset => {
            validate_length(length, RTR_CACHE_RESET_LEN, pdu_type_byte)?;
            RtrPdu::CacheReset(RtrCacheReset { version })
        }

        RtrPduType::RouterKey => {
            // Router Key is v1 only
            if version == RtrProtocolVersion::V0 {
                return Err(RtrError::RouterKeyInV0);
            }

            if length < RTR_ROUTER_KEY_MIN_LEN {
                return Err(RtrError::InvalidLength {
                    expected: RTR_ROUTER_KEY_MIN_LEN,
                    actual: length,
                    pdu_type: pdu_type_byte,
                });
            }

            let flags = input[8];
            // input[9] is zero
            let mut ski = [0u8; 20];
            ski.copy_from_slice(&input[10..30]);
            let asn = u32::from_be_bytes([input[30], input[31], input[32], input[33]]);

            // SPKI is the rest of the PDU (34 bytes of header + fixed fields already parsed)
            let spki_len = (length as usize) - 34;
            let spki = if spki_len > 0 {
                input[34..34 + spki_len].to_vec()
            } else {
                Vec::new()
            };

            RtrPdu::RouterKey(RtrRouterKey {
                version,
                flags,
                subject_key_identifier: ski,
                asn: Asn::from(asn),
                subject_public_key_info: spki,
            })
        }

        RtrPduType::ErrorReport => {
            // Error Report has variable length
            // Minimum: header (8) + length of encapsulated PDU (4) + length of error text (4) = 16
            if length < 16 {
                return Err(RtrError::InvalidLength {
                    expected: 16,
                    actual: length,
                    pdu_type: pdu_type_byte,
                });
            }

            let error_code = RtrErrorCode::from_u16(session_or_error)
                .ok_or(RtrError::InvalidErrorCode(session_or_error))?;

            let encap_pdu_len =
                u32::from_be_bytes([input[8], input[9], input[10], input[11]]) as usize;

            // Validate encapsulated PDU fits
            if 12 + encap_pdu_len + 4 > length_usize {
                return Err(RtrError::InvalidLength {
                    expected: (12 + encap_pdu_len + 4) as u32,
                    actual: length,
                    pdu_type: pdu_type_byte,
                });
            }

            let erroneous_pdu = if encap_pdu_len > 0 {
                input[12..12 + encap_pdu_len].to_vec()
            } else {
                Vec::new()
            };

            let error_text_len_offset = 12 + encap_pdu_len;
            let error_text_len = u32::from_be_bytes([
                input[error_text_len_offset],
                input[error_text_len_offset + 1],
                input[error_text_len_offset + 2],
                input[error_text_len_offset + 3],
            ]) as usize;

            let error_text_offset = error_text_len_offset + 4;
            let error_text = if error_text_len > 0 {
                std::str::from_utf8(&input[error_text_offset..error_text_offset + error_text_len])
                    .map_err(|_| RtrError::InvalidUtf8)?
                    .to_string()
            } else {
                String::new()
            };

            RtrPdu::ErrorReport(RtrErrorReport {
                version,
                error_code,
                erroneous_pdu,
                error_text,
            })
        }
    };

    Ok((pdu, length_usize))
}

/// Read a single RTR PDU from a reader.
///
/// This function reads exactly one complete PDU from the reader.
///
/// # Errors
///
/// Returns an error if reading fails or the PDU is invalid.
///
/// # Example
///
/// ```rust,no_run
/// use std::net::TcpStream;
/// use bgpkit_parser::parser::rpki::rtr::read_rtr_pdu;
///
/// let mut stream = TcpStream::connect("rtr.example.com:8282").unwrap();
/// let pdu = read_rtr_pdu(&mut stream).unwrap();
/// ```
pub fn read_rtr_pdu<R: Read>(reader: &mut R) -> Result<RtrPdu, RtrError> {
    // Read header first
    let mut header = [0u8; RTR_HEADER_LEN];
    reader.read_exact(&mut header)?;

    // Get length from header
    let length = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;

    if length < RTR_HEADER_LEN {
        return Err(RtrError::InvalidLength {
            expected: RTR_HEADER_LEN as u32,
            actual: length as u32,
            pdu_type: header[1],
        });
    }

    // Allocate buffer for full PDU
    let mut buffer = vec![0u8; length];
    buffer[..RTR_HEADER_LEN].copy_from_slice(&header);

    // Read remaining bytes
    if length > RTR_HEADER_LEN {
        reader.read_exact(&mut buffer[RTR_HEADER_LEN..])?;
    }

    // Parse the complete PDU
    let (pdu, _) = parse_rtr_pdu(&buffer)?;
    Ok(pdu)
}

fn validate_length(actual: u32, expected: u32, pdu_type: u8) -> Result<(), RtrError> {
    if actual != expected {
        Err(RtrError::InvalidLength {
            expected,
            actual,
            pdu_type,
        })
    } else {
        Ok(())
    }
}

fn validate_prefix_length(prefix_len: u8, max_len: u8, max_allowed: u8) -> Result<(), RtrError> {
    if prefix_len > max_len || max_len > max_allowed {
        Err(RtrError::InvalidPrefixLength {
            prefix_len,
            max_len,
            max_allowed,
        })
    } else {
        Ok(())
    }
}

// =============================================================================
// Encoding Trait and Implementations
// =============================================================================

/// Trait for encoding RTR PDUs to bytes
pub trait RtrEncode {
    /// Encode this PDU to a byte vector
    fn encode(&self) -> Vec<u8>;
}

impl RtrEncode for RtrSerialNotify {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_SERIAL_NOTIFY_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::SerialNotify.to_u8());
        buf.extend_from_slice(&self.session_id.to_be_bytes());
        buf.extend_from_slice(&RTR_SERIAL_NOTIFY_LEN.to_be_bytes());
        buf.extend_from_slice(&self.serial_number.to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrSerialQuery {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_SERIAL_QUERY_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::SerialQuery.to_u8());
        buf.extend_from_slice(&self.session_id.to_be_bytes());
        buf.extend_from_slice(&RTR_SERIAL_QUERY_LEN.to_be_bytes());
        buf.extend_from_slice(&self.serial_number.to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrResetQuery {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_RESET_QUERY_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::ResetQuery.to_u8());
        buf.extend_from_slice(&[0, 0]); // zero
        buf.extend_from_slice(&RTR_RESET_QUERY_LEN.to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrCacheResponse {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_CACHE_RESPONSE_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::CacheResponse.to_u8());
        buf.extend_from_slice(&self.session_id.to_be_bytes());
        buf.extend_from_slice(&RTR_CACHE_RESPONSE_LEN.to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrIPv4Prefix {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_IPV4_PREFIX_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::IPv4Prefix.to_u8());
        buf.extend_from_slice(&[0, 0]); // zero
        buf.extend_from_slice(&RTR_IPV4_PREFIX_LEN.to_be_bytes());
        buf.push(self.flags);
        buf.push(self.prefix_length);
        buf.push(self.max_length);
        buf.push(0); // zero
        buf.extend_from_slice(&self.prefix.octets());
        buf.extend_from_slice(&self.asn.to_u32().to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrIPv6Prefix {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_IPV6_PREFIX_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::IPv6Prefix.to_u8());
        buf.extend_from_slice(&[0, 0]); // zero
        buf.extend_from_slice(&RTR_IPV6_PREFIX_LEN.to_be_bytes());
        buf.push(self.flags);
        buf.push(self.prefix_length);
        buf.push(self.max_length);
        buf.push(0); // zero
        buf.extend_from_slice(&self.prefix.octets());
        buf.extend_from_slice(&self.asn.to_u32().to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrEndOfData {
    fn encode(&self) -> Vec<u8> {
        let length = match self.version {
            RtrProtocolVersion::V0 => RTR_END_OF_DATA_V0_LEN,
            RtrProtocolVersion::V1 => RTR_END_OF_DATA_V1_LEN,
        };
        let mut buf = Vec::with_capacity(length as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::EndOfData.to_u8());
        buf.extend_from_slice(&self.session_id.to_be_bytes());
        buf.extend_from_slice(&length.to_be_bytes());
        buf.extend_from_slice(&self.serial_number.to_be_bytes());

        if self.version == RtrProtocolVersion::V1 {
            buf.extend_from_slice(
                &self
                    .refresh_interval
                    .unwrap_or(RtrEndOfData::DEFAULT_REFRESH)
                    .to_be_bytes(),
            );
            buf.extend_from_slice(
                &self
                    .retry_interval
                    .unwrap_or(RtrEndOfData::DEFAULT_RETRY)
                    .to_be_bytes(),
            );
            buf.extend_from_slice(
                &self
                    .expire_interval
                    .unwrap_or(RtrEndOfData::DEFAULT_EXPIRE)
                    .to_be_bytes(),
            );
        }
        buf
    }
}

impl RtrEncode for RtrCacheReset {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RTR_CACHE_RESET_LEN as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::CacheReset.to_u8());
        buf.extend_from_slice(&[0, 0]); // zero
        buf.extend_from_slice(&RTR_CACHE_RESET_LEN.to_be_bytes());
        buf
    }
}

impl RtrEncode for RtrRouterKey {
    fn encode(&self) -> Vec<u8> {
        let length = RTR_ROUTER_KEY_MIN_LEN + self.subject_public_key_info.len() as u32;
        let mut buf = Vec::with_capacity(length as usize);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::RouterKey.to_u8());
        buf.extend_from_slice(&[0, 0]); // zero (session_id field is zero for Router Key)
        buf.extend_from_slice(&length.to_be_bytes());
        buf.push(self.flags);
        buf.push(0); // zero
        buf.extend_from_slice(&self.subject_key_identifier);
        buf.extend_from_slice(&self.asn.to_u32().to_be_bytes());
        buf.extend_from_slice(&self.subject_public_key_info);
        buf
    }
}

impl RtrEncode for RtrErrorReport {
    fn encode(&self) -> Vec<u8> {
        let error_text_bytes = self.error_text.as_bytes();
        let length = 16 + self.erroneous_pdu.len() + error_text_bytes.len();
        let mut buf = Vec::with_capacity(length);
        buf.push(self.version.to_u8());
        buf.push(RtrPduType::ErrorReport.to_u8());
        buf.extend_from_slice(&self.error_code.to_u16().to_be_bytes());
        buf.extend_from_slice(&(length as u32).to_be_bytes());
        buf.extend_from_slice(&(self.erroneous_pdu.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.erroneous_pdu);
        buf.extend_from_slice(&(error_text_bytes.len() as u32).to_be_bytes());
        buf.extend_from_slice(error_text_bytes);
        buf
    }
}

impl RtrEncode for RtrPdu {
    fn encode(&self) -> Vec<u8> {
        match self {
            RtrPdu::SerialNotify(p) => p.encode(),
            RtrPdu::SerialQuery(p) => p.encode(),
            RtrPdu::ResetQuery(p) => p.encode(),
            RtrPdu::CacheResponse(p) => p.encode(),
            RtrPdu::IPv4Prefix(p) => p.encode(),
            RtrPdu::IPv6Prefix(p) => p.encode(),
            RtrPdu::EndOfData(p) => p.encode(),
            RtrPdu::CacheReset(p) => p.encode(),
            RtrPdu::RouterKey(p) => p.encode(),
            RtrPdu::ErrorReport(p) => p.encode(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
