/*!
Provides IO utility functions for reading bytes of different length from a [bytes::Buf]
and converting them to the corresponding model types.
*/
use crate::error::ParserError;
use crate::models::{Afi, Asn, AsnLength, NetworkPrefix, RouteDistinguisher, Safi};
use bytes::Buf;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Extension trait for [bytes::Buf] with BGP/MRT-specific read helpers.
///
/// All methods return [ParserError] on truncated input instead of panicking,
/// unlike the raw `get_*` methods on [bytes::Buf].
pub trait ReadUtils: Buf {
    /// Returns an error if fewer than `n` bytes remain.
    #[inline]
    fn has_n_remaining(&self, n: usize) -> Result<(), ParserError> {
        if self.remaining() < n {
            return Err(ParserError::TruncatedMsg(format!(
                "not enough bytes: {} remaining, want to read {}",
                self.remaining(),
                n
            )));
        }
        Ok(())
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_n_remaining(1)?;
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_n_remaining(2)?;
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_n_remaining(4)?;
        Ok(self.get_u32())
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64, ParserError> {
        self.has_n_remaining(8)?;
        Ok(self.get_u64())
    }

    #[inline]
    fn read_u128(&mut self) -> Result<u128, ParserError> {
        self.has_n_remaining(16)?;
        Ok(self.get_u128())
    }

    // legacy naming kept around for call sites ported from the io::Read-based parser.
    #[inline]
    fn read_8b(&mut self) -> Result<u8, ParserError> {
        self.read_u8()
    }

    #[inline]
    fn read_16b(&mut self) -> Result<u16, ParserError> {
        self.read_u16()
    }

    #[inline]
    fn read_32b(&mut self) -> Result<u32, ParserError> {
        self.read_u32()
    }

    #[inline]
    fn read_64b(&mut self) -> Result<u64, ParserError> {
        self.read_u64()
    }

    fn read_n_bytes(&mut self, n_bytes: u64) -> Result<Vec<u8>, ParserError> {
        let n_bytes = n_bytes as usize;
        self.has_n_remaining(n_bytes)?;
        let mut buffer = vec![0; n_bytes];
        self.copy_to_slice(&mut buffer);
        Ok(buffer)
    }

    fn read_n_bytes_to_string(&mut self, n_bytes: u64) -> Result<String, ParserError> {
        let buffer = self.read_n_bytes(n_bytes)?;
        Ok(buffer.into_iter().map(|x: u8| x as char).collect())
    }

    fn read_and_drop_n_bytes(&mut self, n_bytes: u64) -> Result<(), ParserError> {
        let n_bytes = n_bytes as usize;
        self.has_n_remaining(n_bytes)?;
        self.advance(n_bytes);
        Ok(())
    }

    /// Read announced prefix.
    ///
    /// The length in bits is 1 byte, and then based on the IP version it reads a different
    /// number of bytes.
    fn read_nlri_prefix(&mut self, afi: &Afi, add_path: bool) -> Result<NetworkPrefix, ParserError> {
        let path_id = if add_path { Some(self.read_u32()?) } else { None };

        // Length in bits
        let bit_len = self.read_u8()?;

        // Convert to bytes
        let byte_len: usize = bit_len.div_ceil(8) as usize;
        self.has_n_remaining(byte_len)?;

        let prefix: IpNet = match afi {
            Afi::Ipv4 => {
                if byte_len > 4 {
                    return Err(ParserError::ParseError(
                        "invalid ipv4 prefix length".to_string(),
                    ));
                }
                let mut buff = [0u8; 4];
                for i in 0..byte_len {
                    buff[i] = self.get_u8();
                }
                let addr = Ipv4Addr::from(buff);
                IpNet::V4(Ipv4Net::new(addr, bit_len).map_err(|_| {
                    ParserError::ParseError("invalid network prefix length".to_string())
                })?)
            }
            Afi::Ipv6 => {
                if byte_len > 16 {
                    return Err(ParserError::ParseError(
                        "invalid ipv6 prefix length".to_string(),
                    ));
                }
                let mut buff = [0u8; 16];
                for i in 0..byte_len {
                    buff[i] = self.get_u8();
                }
                let addr = Ipv6Addr::from(buff);
                IpNet::V6(Ipv6Net::new(addr, bit_len).map_err(|_| {
                    ParserError::ParseError("invalid network prefix length".to_string())
                })?)
            }
        };

        Ok(NetworkPrefix::new(prefix, path_id))
    }

    /// Read a VPN NLRI prefix per RFC 4364: a leading total-bit-length byte followed by a
    /// 3-byte MPLS label, an 8-byte route distinguisher, and the remaining prefix bits.
    fn read_vpn_nlri_prefix(
        &mut self,
        afi: &Afi,
        add_path: bool,
    ) -> Result<NetworkPrefix, ParserError> {
        let path_id = if add_path { Some(self.read_u32()?) } else { None };

        let bit_len = self.read_u8()?;
        const LABEL_BITS: u8 = 24;
        const RD_BITS: u8 = 64;
        if bit_len < LABEL_BITS + RD_BITS {
            return Err(ParserError::ParseError(
                "VPN NLRI prefix length too short for label and route distinguisher".to_string(),
            ));
        }

        // MPLS label, 3 bytes -- not retained on the model, only consumed.
        self.has_n_remaining(3)?;
        self.advance(3);

        self.has_n_remaining(8)?;
        let mut rd_bytes = [0u8; 8];
        for b in rd_bytes.iter_mut() {
            *b = self.get_u8();
        }
        let route_distinguisher = RouteDistinguisher::decode(&rd_bytes);

        let prefix_bit_len = bit_len - LABEL_BITS - RD_BITS;
        let byte_len = prefix_bit_len.div_ceil(8) as usize;
        self.has_n_remaining(byte_len)?;

        let prefix: IpNet = match afi {
            Afi::Ipv4 => {
                if byte_len > 4 {
                    return Err(ParserError::ParseError(
                        "invalid ipv4 VPN prefix length".to_string(),
                    ));
                }
                let mut buff = [0u8; 4];
                for i in 0..byte_len {
                    buff[i] = self.get_u8();
                }
                IpNet::V4(Ipv4Net::new(Ipv4Addr::from(buff), prefix_bit_len).map_err(|_| {
                    ParserError::ParseError("invalid network prefix length".to_string())
                })?)
            }
            Afi::Ipv6 => {
                if byte_len > 16 {
                    return Err(ParserError::ParseError(
                        "invalid ipv6 VPN prefix length".to_string(),
                    ));
                }
                let mut buff = [0u8; 16];
                for i in 0..byte_len {
                    buff[i] = self.get_u8();
                }
                IpNet::V6(Ipv6Net::new(Ipv6Addr::from(buff), prefix_bit_len).map_err(|_| {
                    ParserError::ParseError("invalid network prefix length".to_string())
                })?)
            }
        };

        Ok(NetworkPrefix::with_route_distinguisher(
            prefix,
            path_id,
            Some(route_distinguisher),
        ))
    }

    fn read_address(&mut self, afi: &Afi) -> Result<IpAddr, ParserError> {
        match afi {
            Afi::Ipv4 => self.read_ipv4_address().map(IpAddr::V4),
            Afi::Ipv6 => self.read_ipv6_address().map(IpAddr::V6),
        }
    }

    fn read_ipv4_address(&mut self) -> Result<Ipv4Addr, ParserError> {
        Ok(Ipv4Addr::from(self.read_u32()?))
    }

    fn read_ipv6_address(&mut self) -> Result<Ipv6Addr, ParserError> {
        Ok(Ipv6Addr::from(self.read_u128()?))
    }

    fn read_ipv4_prefix(&mut self) -> Result<Ipv4Net, ParserError> {
        let addr = self.read_ipv4_address()?;
        let mask = self.read_u8()?;
        Ipv4Net::new(addr, mask)
            .map_err(|_| ParserError::ParseError("invalid prefix mask".to_string()))
    }

    fn read_ipv6_prefix(&mut self) -> Result<Ipv6Net, ParserError> {
        let addr = self.read_ipv6_address()?;
        let mask = self.read_u8()?;
        Ipv6Net::new(addr, mask)
            .map_err(|_| ParserError::ParseError("invalid prefix mask".to_string()))
    }

    fn read_asn(&mut self, as_length: &AsnLength) -> Result<Asn, ParserError> {
        match as_length {
            AsnLength::Bits16 => Ok(Asn::new_16bit(self.read_u16()?)),
            AsnLength::Bits32 => Ok(Asn::new_32bit(self.read_u32()?)),
        }
    }

    fn read_asns(&mut self, as_length: &AsnLength, count: usize) -> Result<Vec<Asn>, ParserError> {
        let mut path = Vec::with_capacity(count);
        for _ in 0..count {
            path.push(self.read_asn(as_length)?);
        }
        Ok(path)
    }

    fn read_afi(&mut self) -> Result<Afi, ParserError> {
        let afi = self.read_u16()?;
        Afi::try_from(afi).map_err(|_| ParserError::Unsupported(format!("Unknown AFI type: {afi}")))
    }

    fn read_safi(&mut self) -> Result<Safi, ParserError> {
        let safi = self.read_u8()?;
        Safi::try_from(safi).map_err(|_| ParserError::Unsupported(format!("Unknown SAFI type: {safi}")))
    }
}

// All types that implement Buf can now read BGP/MRT primitives.
impl<T: Buf + ?Sized> ReadUtils for T {}
