//! Broker backend: an HTTP-style remote query against a bgpkit-broker-shaped
//! endpoint, with repeatable `param=key=value` options forwarded verbatim as query parameters.

use crate::stream::data_interface::{DataInterface, DataInterfaceOptions};
use crate::stream::descriptor::{DumpDescriptor, RecordType};
use crate::stream::error::StreamError;
use crate::stream::filter::FilterSet;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BrokerResponse {
    data: Vec<BrokerItem>,
}

/// One item of a broker response: a resource URL plus the collector metadata needed to build a
/// [`DumpDescriptor`].
#[derive(Debug, Deserialize)]
struct BrokerItem {
    url: String,
    project: String,
    collector_id: String,
    data_type: String,
    ts_start: u32,
}

/// Backend options `url` and repeatable `param`.
#[derive(Default)]
pub struct BrokerInterface {
    url: Option<String>,
    params: Vec<(String, String)>,
    client: Option<reqwest::blocking::Client>,
}

impl BrokerInterface {
    pub fn new() -> Self {
        BrokerInterface::default()
    }

    fn client(&mut self) -> &reqwest::blocking::Client {
        self.client
            .get_or_insert_with(reqwest::blocking::Client::new)
    }
}

impl DataInterfaceOptions for BrokerInterface {
    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StreamError> {
        match key {
            "url" => {
                self.url = Some(value.to_string());
                Ok(())
            }
            "param" => {
                let (k, v) = value.split_once('=').ok_or_else(|| {
                    StreamError::ConfigError(format!(
                        "broker backend: 'param' value '{value}' is not 'key=value'"
                    ))
                })?;
                self.params.push((k.to_string(), v.to_string()));
                Ok(())
            }
            other => Err(StreamError::ConfigError(format!(
                "broker backend: unknown option '{other}'"
            ))),
        }
    }
}

impl DataInterface for BrokerInterface {
    fn produce_batch(
        &mut self,
        filters: &FilterSet,
        _live: bool,
    ) -> Result<Vec<DumpDescriptor>, StreamError> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| StreamError::ConfigError("broker backend: 'url' option not set".into()))?;
        let params = self.params.clone();

        let response = self
            .client()
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| StreamError::BackendError(format!("broker backend: {e}")))?;

        if !response.status().is_success() {
            return Err(StreamError::BackendError(format!(
                "broker backend: HTTP {}",
                response.status()
            )));
        }

        let parsed: BrokerResponse = response
            .json()
            .map_err(|e| StreamError::BackendError(format!("broker backend: {e}")))?;

        let mut batch = Vec::new();
        for item in parsed.data {
            let record_type = match item.data_type.to_ascii_lowercase().as_str() {
                "rib" | "ribs" => RecordType::Rib,
                "update" | "updates" => RecordType::Updates,
                other => {
                    log::warn!("broker backend: skipping item with unknown data_type '{other}'");
                    continue;
                }
            };
            let nominal_duration = match record_type {
                RecordType::Rib => 900,
                RecordType::Updates => 300,
            };
            let descriptor = DumpDescriptor::new(
                item.url,
                item.project,
                item.collector_id,
                record_type,
                item.ts_start,
                nominal_duration,
            );
            if filters.matches(&descriptor) {
                batch.push(descriptor);
            }
        }
        Ok(batch)
    }
}
