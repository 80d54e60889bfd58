//! Converts MRT records into individual per-prefix [`BgpElem`]s.
//!
//! Each MRT record may carry reachability information for multiple prefixes at once (a RIB dump
//! entry lists one peer's attributes shared across prefixes behind it; a BGP4MP update may carry
//! several prefixes behind one attribute set). [`Elementor`] flattens a record into one [`BgpElem`]
//! per prefix so callers can reason about routing changes on a per-prefix basis.
use crate::models::*;
use log::warn;
use std::net::IpAddr;

/// Tracks MRT TABLE_DUMP_V2 state across records: the `PEER_INDEX_TABLE` entry arrives once per
/// file and every later `RIB_*` entry refers back into it by peer index.
pub struct Elementor {
    pub peer_table: Option<PeerIndexTable>,
}

impl Default for Elementor {
    fn default() -> Self {
        Elementor::new()
    }
}

struct CommonAttributes {
    as_path: Option<AsPath>,
    origin: Option<Origin>,
    next_hop: Option<IpAddr>,
    local_pref: Option<u32>,
    med: Option<u32>,
    communities: Option<Vec<MetaCommunity>>,
    atomic: bool,
    aggr_asn: Option<Asn>,
    aggr_ip: Option<BgpIdentifier>,
    only_to_customer: Option<Asn>,
    announced: Option<Nlri>,
    withdrawn: Option<Nlri>,
}

fn get_relevant_attributes(attributes: Attributes) -> CommonAttributes {
    let mut as_path = None;
    let mut as4_path = None;
    let mut origin = None;
    let mut next_hop = None;
    let mut local_pref = None;
    let mut med = None;
    let mut communities: Option<Vec<MetaCommunity>> = None;
    let mut atomic = false;
    let mut aggr_asn = None;
    let mut aggr_ip = None;
    let mut only_to_customer = None;
    let mut announced = None;
    let mut withdrawn = None;

    for value in attributes {
        match value {
            AttributeValue::Origin(v) => origin = Some(v),
            AttributeValue::AsPath { path, is_as4: false } => as_path = Some(path),
            AttributeValue::AsPath { path, is_as4: true } => as4_path = Some(path),
            AttributeValue::NextHop(v) => next_hop = Some(v),
            AttributeValue::MultiExitDiscriminator(v) => med = Some(v),
            AttributeValue::LocalPreference(v) => local_pref = Some(v),
            AttributeValue::AtomicAggregate(v) => atomic = matches!(v, AtomicAggregate::AG),
            AttributeValue::Aggregator { asn, id, .. } => {
                aggr_asn = Some(asn);
                aggr_ip = Some(id);
            }
            AttributeValue::OnlyToCustomer(asn) => only_to_customer = Some(asn.into()),
            AttributeValue::Communities(v) => communities
                .get_or_insert_with(Vec::new)
                .extend(v.into_iter().map(MetaCommunity::Plain)),
            AttributeValue::ExtendedCommunities(v) => communities
                .get_or_insert_with(Vec::new)
                .extend(v.into_iter().map(MetaCommunity::Extended)),
            AttributeValue::LargeCommunities(v) => communities
                .get_or_insert_with(Vec::new)
                .extend(v.into_iter().map(MetaCommunity::Large)),
            AttributeValue::MpReachNlri(v) => announced = Some(v),
            AttributeValue::MpUnreachNlri(v) => withdrawn = Some(v),
            _ => {}
        }
    }

    let as_path = match (as_path, as4_path) {
        (None, None) => None,
        (Some(v), None) => Some(v),
        (None, Some(v)) => Some(v),
        (Some(v1), Some(v2)) => AsPath::merge_aspath_as4path(&v1, &v2).or(Some(v1)),
    };

    CommonAttributes {
        as_path,
        origin,
        next_hop,
        local_pref,
        med,
        communities,
        atomic,
        aggr_asn,
        aggr_ip,
        only_to_customer,
        announced,
        withdrawn,
    }
}

fn nlri_next_hop(nlri: &Option<Nlri>) -> Option<IpAddr> {
    nlri.as_ref().and_then(|n| n.next_hop.as_ref()).map(|h| h.addr())
}

impl Elementor {
    pub fn new() -> Elementor {
        Elementor { peer_table: None }
    }

    /// Flattens a single [`MrtRecord`] into zero or more [`BgpElem`]s, updating internal
    /// TABLE_DUMP_V2 peer-index-table state as a side effect.
    pub fn record_to_elems(&mut self, record: MrtRecord) -> Vec<BgpElem> {
        let t = record.common_header.timestamp;
        let timestamp: f64 = match record.common_header.microsecond_timestamp {
            Some(micro) => t as f64 + (micro as f64) / 1_000_000.0,
            None => t as f64,
        };

        match record.message {
            MrtMessage::TableDumpMessage(msg) => {
                let attrs = get_relevant_attributes(msg.attributes);
                let origin_asns = attrs.as_path.as_ref().map(|p| p.iter_origins().collect());
                vec![BgpElem {
                    timestamp,
                    elem_type: ElemType::ANNOUNCE,
                    peer_ip: msg.peer_address,
                    peer_asn: msg.peer_asn,
                    prefix: msg.prefix,
                    next_hop: attrs.next_hop,
                    as_path: attrs.as_path,
                    origin_asns,
                    origin: attrs.origin,
                    local_pref: attrs.local_pref,
                    med: attrs.med,
                    communities: attrs.communities,
                    atomic: attrs.atomic,
                    aggr_asn: attrs.aggr_asn,
                    aggr_ip: attrs.aggr_ip,
                    only_to_customer: attrs.only_to_customer,
                    ..Default::default()
                }]
            }

            MrtMessage::TableDumpV2Message(msg) => match msg {
                TableDumpV2Message::PeerIndexTable(p) => {
                    self.peer_table = Some(p);
                    vec![]
                }
                TableDumpV2Message::RibAfi(t) => {
                    let Some(peer_table) = self.peer_table.as_ref() else {
                        warn!("RIB entry seen before PEER_INDEX_TABLE, skipping");
                        return vec![];
                    };
                    let prefix = t.prefix;
                    t.rib_entries
                        .into_iter()
                        .filter_map(|e| {
                            let peer = match peer_table.id_peer_map.get(&e.peer_index) {
                                Some(peer) => peer,
                                None => {
                                    warn!("unknown peer index {} in RIB entry", e.peer_index);
                                    return None;
                                }
                            };
                            let attrs = get_relevant_attributes(e.attributes);
                            let origin_asns =
                                attrs.as_path.as_ref().map(|p| p.iter_origins().collect());
                            let next_hop = attrs
                                .next_hop
                                .or_else(|| nlri_next_hop(&attrs.announced));
                            Some(BgpElem {
                                timestamp,
                                elem_type: ElemType::ANNOUNCE,
                                peer_ip: peer.peer_ip,
                                peer_asn: peer.peer_asn,
                                prefix,
                                next_hop,
                                as_path: attrs.as_path,
                                origin_asns,
                                origin: attrs.origin,
                                local_pref: attrs.local_pref,
                                med: attrs.med,
                                communities: attrs.communities,
                                atomic: attrs.atomic,
                                aggr_asn: attrs.aggr_asn,
                                aggr_ip: attrs.aggr_ip,
                                only_to_customer: attrs.only_to_customer,
                                route_distinguisher: prefix.route_distinguisher,
                                ..Default::default()
                            })
                        })
                        .collect()
                }
                TableDumpV2Message::RibGeneric(_) => {
                    warn!("to_elem for TableDumpV2Message::RibGeneric not yet implemented");
                    vec![]
                }
                TableDumpV2Message::GeoPeerTable(_) => {
                    // RFC 6397 geo-peer tables carry no routing information to convert.
                    vec![]
                }
            },

            MrtMessage::Bgp4Mp(Bgp4MpEnum::StateChange(_)) => {
                // state changes carry no reachability information to turn into elements
                vec![]
            }
            MrtMessage::Bgp4Mp(Bgp4MpEnum::Message(msg)) => {
                Self::bgp_to_elems(msg.bgp_message, timestamp, &msg.peer_ip, &msg.peer_asn)
            }
        }
    }

    /// Converts a single parsed [`BgpMessage`] into [`BgpElem`]s. Useful when the BGP message was
    /// obtained out-of-band from an MRT record, e.g. from a BMP route-monitoring message.
    pub fn bgp_to_elems(
        msg: BgpMessage,
        timestamp: f64,
        peer_ip: &IpAddr,
        peer_asn: &Asn,
    ) -> Vec<BgpElem> {
        match msg {
            BgpMessage::Update(update) => {
                Self::bgp_update_to_elems(update, timestamp, peer_ip, peer_asn)
            }
            BgpMessage::Open(_) | BgpMessage::Notification(_) | BgpMessage::KeepAlive => {
                vec![]
            }
        }
    }

    /// Converts a [`BgpUpdateMessage`] into [`BgpElem`]s, combining the legacy
    /// withdrawn/announced prefix lists with any MP_REACH_NLRI/MP_UNREACH_NLRI attributes.
    pub fn bgp_update_to_elems(
        update: BgpUpdateMessage,
        timestamp: f64,
        peer_ip: &IpAddr,
        peer_asn: &Asn,
    ) -> Vec<BgpElem> {
        let attrs = get_relevant_attributes(update.attributes);
        let origin_asns = attrs.as_path.as_ref().map(|p| p.iter_origins().collect());

        let mut elems = Vec::with_capacity(
            update.withdrawn_prefixes.len()
                + update.announced_prefixes.len()
                + attrs.announced.as_ref().map_or(0, |n| n.prefixes.len())
                + attrs.withdrawn.as_ref().map_or(0, |n| n.prefixes.len()),
        );

        for prefix in update.withdrawn_prefixes {
            elems.push(BgpElem {
                timestamp,
                elem_type: ElemType::WITHDRAW,
                peer_ip: *peer_ip,
                peer_asn: *peer_asn,
                prefix,
                route_distinguisher: prefix.route_distinguisher,
                ..Default::default()
            });
        }
        if let Some(nlri) = &attrs.withdrawn {
            for prefix in &nlri.prefixes {
                elems.push(BgpElem {
                    timestamp,
                    elem_type: ElemType::WITHDRAW,
                    peer_ip: *peer_ip,
                    peer_asn: *peer_asn,
                    prefix: *prefix,
                    route_distinguisher: prefix.route_distinguisher,
                    ..Default::default()
                });
            }
        }

        let next_hop = attrs.next_hop.or_else(|| nlri_next_hop(&attrs.announced));
        for prefix in update.announced_prefixes {
            elems.push(BgpElem {
                timestamp,
                elem_type: ElemType::ANNOUNCE,
                peer_ip: *peer_ip,
                peer_asn: *peer_asn,
                prefix,
                next_hop,
                as_path: attrs.as_path.clone(),
                origin_asns: origin_asns.clone(),
                origin: attrs.origin,
                local_pref: attrs.local_pref,
                med: attrs.med,
                communities: attrs.communities.clone(),
                atomic: attrs.atomic,
                aggr_asn: attrs.aggr_asn,
                aggr_ip: attrs.aggr_ip,
                only_to_customer: attrs.only_to_customer,
                route_distinguisher: prefix.route_distinguisher,
                ..Default::default()
            });
        }
        if let Some(nlri) = &attrs.announced {
            for prefix in &nlri.prefixes {
                elems.push(BgpElem {
                    timestamp,
                    elem_type: ElemType::ANNOUNCE,
                    peer_ip: *peer_ip,
                    peer_asn: *peer_asn,
                    prefix: *prefix,
                    next_hop,
                    as_path: attrs.as_path.clone(),
                    origin_asns: origin_asns.clone(),
                    origin: attrs.origin,
                    local_pref: attrs.local_pref,
                    med: attrs.med,
                    communities: attrs.communities.clone(),
                    atomic: attrs.atomic,
                    aggr_asn: attrs.aggr_asn,
                    aggr_ip: attrs.aggr_ip,
                    only_to_customer: attrs.only_to_customer,
                    route_distinguisher: prefix.route_distinguisher,
                    ..Default::default()
                });
            }
        }

        elems
    }
}
