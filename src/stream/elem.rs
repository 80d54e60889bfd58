//! Record/Elem Decoder: expands a [`crate::stream::record::Record`]'s raw MRT entry into a
//! normalized, ordered sequence of typed [`Element`]s.

use crate::models::{
    Asn, Bgp4MpEnum, BgpMessage, BgpState, MrtMessage, NetworkPrefix, TableDumpV2Message,
};
use crate::stream::descriptor::RecordType;
use crate::stream::record::Record;
use crate::stream::reader::PeerIndexLookup;
use crate::models::AsPath;
use std::net::IpAddr;

/// Which kind of routing event an [`Element`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    RibEntry,
    Announcement,
    Withdrawal,
    PeerStateChange,
}

/// AS path textual classification: numeric when the textual path contains only digits and
/// whitespace, string when it contains AS-set/confederation syntax, `Unknown` when the textual
/// form is empty but the underlying path carries a positive hop count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsPathValue {
    Numeric(Vec<u32>),
    String(String),
    Unknown { hop_count: usize },
}

/// One decoded, per-prefix (or per-state-change) BGP element.
#[derive(Debug, Clone)]
pub struct Element {
    pub element_type: ElementType,
    pub timestamp: f64,
    pub peer_address: IpAddr,
    pub peer_asn: Asn,
    pub prefix: Option<NetworkPrefix>,
    pub next_hop: Option<IpAddr>,
    pub as_path: Option<AsPathValue>,
    pub old_state: Option<BgpState>,
    pub new_state: Option<BgpState>,
}

impl Element {
    fn base(element_type: ElementType, timestamp: f64, peer_address: IpAddr, peer_asn: Asn) -> Self {
        Element {
            element_type,
            timestamp,
            peer_address,
            peer_asn,
            prefix: None,
            next_hop: None,
            as_path: None,
            old_state: None,
            new_state: None,
        }
    }
}

/// Classifies an [`AsPath`]'s textual rendering.
pub fn classify_as_path(as_path: &AsPath) -> AsPathValue {
    let text = as_path.to_string();
    if text.chars().any(|c| matches!(c, '(' | ')' | '[' | ']' | '{' | '}')) {
        return AsPathValue::String(text);
    }
    if text.trim().is_empty() {
        let hop_count = as_path.len();
        if hop_count > 0 {
            return AsPathValue::Unknown { hop_count };
        }
        return AsPathValue::Numeric(Vec::new());
    }
    let numeric: Option<Vec<u32>> = text
        .split_whitespace()
        .map(|tok| tok.parse::<u32>().ok())
        .collect();
    match numeric {
        Some(v) => AsPathValue::Numeric(v),
        None => AsPathValue::String(text),
    }
}

/// Decodes `record`'s raw entry into its ordered, finite sequence of elements. Returns an empty
/// vector for synthesized error records (`record.raw_entry.is_none()`).
///
/// `peer_lookup` resolves TABLE_DUMP_V2 peer indices against the file's `PEER_INDEX_TABLE`,
/// which arrives once per file ahead of the RIB entries that reference it. Because the Reader
/// Set may hold several files open at once, `peer_lookup` must be scoped per
/// file: callers decoding a merged stream of records from more than one TABLE_DUMP_V2 file should
/// key a `PeerIndexLookup` per `record.descriptor.uri` rather than sharing a single instance
/// across interleaved records, or a later file's table will shadow an earlier file's still-live
/// one.
pub fn decode_elements(record: &Record, peer_lookup: &mut PeerIndexLookup) -> Vec<Element> {
    let Some(entry) = &record.raw_entry else {
        return Vec::new();
    };
    let t = entry.common_header.timestamp;
    let timestamp = match entry.common_header.microsecond_timestamp {
        Some(micro) => t as f64 + (micro as f64) / 1_000_000.0,
        None => t as f64,
    };

    match &entry.message {
        MrtMessage::TableDumpMessage(msg) => {
            let mut elem = Element::base(
                ElementType::RibEntry,
                timestamp,
                msg.peer_address,
                msg.peer_asn,
            );
            elem.prefix = Some(msg.prefix);
            fill_common_attributes(&mut elem, &msg.attributes);
            vec![elem]
        }
        MrtMessage::TableDumpV2Message(msg) => match msg {
            TableDumpV2Message::PeerIndexTable(p) => {
                peer_lookup.observe(p.clone());
                Vec::new()
            }
            TableDumpV2Message::RibAfi(t) => {
                let prefix = t.prefix;
                t.rib_entries
                    .iter()
                    .filter_map(|e| {
                        let Some(peer) = peer_lookup.resolve(e.peer_index) else {
                            log::warn!("unknown peer index {} in RIB entry, skipping", e.peer_index);
                            return None;
                        };
                        let mut elem =
                            Element::base(ElementType::RibEntry, timestamp, peer.peer_ip, peer.peer_asn);
                        elem.prefix = Some(prefix);
                        fill_common_attributes(&mut elem, &e.attributes);
                        Some(elem)
                    })
                    .collect()
            }
            TableDumpV2Message::RibGeneric(_) | TableDumpV2Message::GeoPeerTable(_) => Vec::new(),
        },
        MrtMessage::Bgp4Mp(Bgp4MpEnum::StateChange(sc)) => {
            let mut elem = Element::base(
                ElementType::PeerStateChange,
                timestamp,
                sc.peer_addr,
                sc.peer_asn,
            );
            elem.old_state = Some(sc.old_state);
            elem.new_state = Some(sc.new_state);
            vec![elem]
        }
        MrtMessage::Bgp4Mp(Bgp4MpEnum::Message(msg)) => match &msg.bgp_message {
            BgpMessage::Update(update) => {
                decode_update(update, timestamp, msg.peer_ip, msg.peer_asn)
            }
            BgpMessage::Open(_) | BgpMessage::Notification(_) | BgpMessage::KeepAlive => Vec::new(),
        },
    }
}

fn fill_common_attributes(elem: &mut Element, attributes: &crate::models::Attributes) {
    elem.next_hop = attributes.iter().find_map(|a| match &a.value {
        crate::models::AttributeValue::NextHop(v) => Some(*v),
        _ => None,
    });
    if elem.next_hop.is_none() {
        elem.next_hop = attributes.get_reachable().and_then(|n| n.next_hop.as_ref()).map(|h| h.addr());
    }
    if let Some(path) = attributes.as_path() {
        elem.as_path = Some(classify_as_path(path));
    }
}

/// Orders withdrawals before announcements, base (IPv4) NLRI before MP NLRI, per SAFI group
/// unicast -> multicast -> unicast-multicast. The parser models at most one
/// `MP_REACH_NLRI`/`MP_UNREACH_NLRI` attribute per update (RFC 4760), so there is at most one
/// extra (AFI, SAFI) group on each side; this still expresses the full 6-step ordering, it just
/// rarely has more than the base + one MP group populated.
fn decode_update(
    update: &crate::models::BgpUpdateMessage,
    timestamp: f64,
    peer_ip: IpAddr,
    peer_asn: Asn,
) -> Vec<Element> {
    let as_path = update.attributes.as_path().map(classify_as_path);
    let next_hop = update
        .attributes
        .iter()
        .find_map(|a| match &a.value {
            crate::models::AttributeValue::NextHop(v) => Some(*v),
            _ => None,
        })
        .or_else(|| {
            update
                .attributes
                .get_reachable()
                .and_then(|n| n.next_hop.as_ref())
                .map(|h| h.addr())
        });

    let mut elems = Vec::new();

    for prefix in &update.withdrawn_prefixes {
        let mut e = Element::base(ElementType::Withdrawal, timestamp, peer_ip, peer_asn);
        e.prefix = Some(*prefix);
        elems.push(e);
    }
    if let Some(nlri) = update.attributes.get_unreachable() {
        for prefix in &nlri.prefixes {
            let mut e = Element::base(ElementType::Withdrawal, timestamp, peer_ip, peer_asn);
            e.prefix = Some(*prefix);
            elems.push(e);
        }
    }

    for prefix in &update.announced_prefixes {
        let mut e = Element::base(ElementType::Announcement, timestamp, peer_ip, peer_asn);
        e.prefix = Some(*prefix);
        e.next_hop = next_hop;
        e.as_path = as_path.clone();
        elems.push(e);
    }
    if let Some(nlri) = update.attributes.get_reachable() {
        for prefix in &nlri.prefixes {
            let mut e = Element::base(ElementType::Announcement, timestamp, peer_ip, peer_asn);
            e.prefix = Some(*prefix);
            e.next_hop = next_hop;
            e.as_path = as_path.clone();
            elems.push(e);
        }
    }

    elems
}

/// Whether `record`'s descriptor is a RIB or updates file -- used by callers that want to
/// treat `Element`s differently by source kind without re-deriving it from `element_type`.
pub fn source_record_type(record: &Record) -> RecordType {
    record.descriptor.record_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AsPathSegment;

    fn path_from_segment(seg: AsPathSegment<'static>) -> AsPath {
        let mut p = AsPath::new();
        p.append_segment(seg);
        p
    }

    #[test]
    fn numeric_as_path_classified() {
        let path = path_from_segment(AsPathSegment::sequence([3356u32, 174, 7922]));
        match classify_as_path(&path) {
            AsPathValue::Numeric(v) => assert_eq!(v, vec![3356, 174, 7922]),
            other => panic!("expected numeric, got {other:?}"),
        }
    }

    #[test]
    fn as_set_classified_as_string() {
        let path = path_from_segment(AsPathSegment::set([174u32, 7922]));
        match classify_as_path(&path) {
            AsPathValue::String(s) => assert!(s.contains('{') && s.contains('}')),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn empty_path_with_hops_is_unknown() {
        // An AsSequence segment with zero ASNs prints no tokens but still counts as one
        // segment: textually empty, yet a positive hop count.
        let path = path_from_segment(AsPathSegment::sequence(Vec::<u32>::new()));
        match classify_as_path(&path) {
            AsPathValue::Unknown { hop_count } => assert_eq!(hop_count, 1),
            other => panic!("expected unknown, got {other:?}"),
        }
    }
}
