//! BGP Tunnel Encapsulation attribute parsing - RFC 9012

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;

/// Parse BGP Tunnel Encapsulation attribute (type 23)
pub fn parse_tunnel_encapsulation_attribute(
    mut data: Bytes,
) -> Result<AttributeValue, ParserError> {
    let mut attr = TunnelEncapAttribute::new();

    while data.remaining() >= 4 {
        let tunnel_type = data.read_u16()?;
        let tunnel_length = data.read_u16()?;

        if data.remaining() < tunnel_length as usize {
            return Err(ParserError::TruncatedMsg(format!(
                "Expected {} bytes for Tunnel TLV, but only {} remaining",
                tunnel_length,
                data.remaining()
            )));
        }

        let tunnel_data = data.read_n_bytes(tunnel_length as usize)?;
        let tunnel_tlv = parse_tunnel_tlv(tunnel_type, tunnel_data.into())?;
        attr.add_tunnel_tlv(tunnel_tlv);
    }

    Ok(AttributeValue::TunnelEncapsulation(attr))
}

/// Parse a single Tunnel TLV
fn parse_tunnel_tlv(tunnel_type: u16, mut data: Bytes) -> Result<TunnelEncapTlv, ParserError> {
    let tunnel_type = TunnelType::from(tunnel_type);
    let mut tunnel_tlv = TunnelEncapTlv::new(tunnel_type);

    while data.remaining() > 0 {
        if data.remaining() < 2 {
            return Err(ParserError::TruncatedMsg(
                "Not enough data for Sub-TLV header".to_string(),
            ));
        }

        let sub_tlv_type = data.read_u8()?;

        // Sub-TLV length encoding: 1 byte for types 0-127, 2 bytes for types 128-255
        let sub_tlv_length: u16 = if sub_tlv_type < 128 {
            if data.remaining() < 1 {
                return Err(ParserError::TruncatedMsg(
                    "Not enough data for Sub-TLV length".to_string(),
                ));
            }
            data.read_u8()? as u16
        } else {
            if data.remaining() < 2 {
                return Err(ParserError::TruncatedMsg(
                    "Not enough data for extended Sub-TLV length".to_string(),
                ));
            }
            data.read_u16()?
        };

        if data.remaining() < sub_tlv_length as usize {
            return Err(ParserError::TruncatedMsg(format!(
                "Expected {} bytes for Sub-TLV data, but only {} remaining",
                sub_tlv_length,
                data.remaining()
            )));
        }

        let sub_tlv_data = data.read_n_bytes(sub_tlv_length as usize)?;
        let sub_tlv_type_enum = SubTlvType::from(sub_tlv_type as u16);
        let sub_tlv = SubTlv::new(sub_tlv_type_enum, sub_tlv_data.to_vec());
        tunnel_tlv.add_sub_tlv(sub_tlv);
    }

    Ok(tunnel_tlv)
}

/// Encode BGP Tunnel Encapsulation attribute
pub fn encode_tunnel_encapsulation_attribute(attr: &TunnelEncapAttribute) -> Bytes {
    let mut bytes = BytesMut::new();

    for tunnel_tlv in &attr.tunnel_tlvs {
        // Encode tunnel type
        bytes.put_u16(tunnel_tlv.tunnel_type as u16);

        // Encode sub-TLVs first to calculate total length
        let mut sub_tlv_bytes = BytesMut::new();
        for sub_tlv in &tunnel_tlv.sub_tlvs {
            let sub_tlv_type = sub_tlv.sub_tlv_type as u16;

            // Encode sub-TLV type
            if sub_tlv_type < 128 {
                sub_tlv_bytes.put_u8(sub_tlv_type as u8);
                sub_tlv_bytes.put_u8(sub_tlv.value.len() as u8);
            } else {
                sub_tlv_bytes.put_u8(sub_tlv_type as u8);
                sub_tlv_bytes.put_u16(sub_tlv.value.len() as u16);
            }

            // Encode sub-TLV value
            sub_tlv_bytes.extend_from_slice(&sub_tlv.value);
        }

        // Encode tunnel length
        bytes.put_u16(sub_tlv_bytes.len() as u16);

        // Append sub-TLV data
        bytes.extend_from_slice(&sub_tlv_bytes);
    }

    bytes.freeze()
}
