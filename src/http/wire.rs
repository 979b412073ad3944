//! Wire schemas for the node's JSON envelopes and their conversion into the
//! records in [`types`](super::types).
//!
//! The node encodes 64-bit integers as decimal strings and omits or nulls
//! fields freely. Every field here is optional; the conversions decide the
//! defaults: an absent or empty integer string is zero, an absent list is
//! empty, and a non-numeric integer string is an error naming the field.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::{DecodeError, RpcError};
use super::types::{NodeStatus, Peer, UnconfirmedTxs};

pub(crate) const STATUS_PATH: &str = "/status";
pub(crate) const NET_INFO_PATH: &str = "/net_info";
pub(crate) const UNCONFIRMED_TXS_PATH: &str = "/unconfirmed_txs";

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    result: Option<Object<T>>,
}

/// A struct that may only be decoded from a JSON object.
///
/// Derived struct impls also accept arrays (fields by position); here an
/// array where an object belongs is a decode error.
#[derive(Debug)]
struct Object<T>(T);

impl<T> Object<T> {
    fn into_inner(self) -> T {
        self.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Object<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        T::deserialize(Value::Object(map)).map(Object).map_err(de::Error::custom)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusResult {
    node_info: Option<Object<StatusNodeInfo>>,
    sync_info: Option<Object<SyncInfo>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusNodeInfo {
    moniker: Option<String>,
    network: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SyncInfo {
    latest_block_height: Option<String>,
    earliest_block_height: Option<String>,
    catching_up: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NetInfoResult {
    peers: Option<Vec<Object<WirePeer>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePeer {
    node_info: Option<Object<PeerNodeInfo>>,
    remote_ip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PeerNodeInfo {
    id: Option<String>,
    moniker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UnconfirmedTxsResult {
    total: Option<String>,
    txs: Option<Vec<String>>,
}

/// Parses a string-encoded integer; an empty string means zero.
pub(crate) fn parse_height(field: &'static str, value: &str) -> Result<i64, DecodeError> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<i64>().map_err(|source| DecodeError::InvalidInteger {
        field,
        value: value.to_string(),
        source,
    })
}

/// Decodes `body` into an envelope. A literal `null` body yields an empty result.
fn decode_result<T>(endpoint: &'static str, body: &[u8]) -> Result<T, RpcError>
where
    T: DeserializeOwned + Default,
{
    let envelope: Option<Object<Envelope<T>>> = serde_json::from_slice(body).map_err(|err| RpcError::Decode {
        endpoint,
        source: DecodeError::Json(err),
    })?;
    Ok(envelope
        .and_then(|e| e.into_inner().result)
        .map(Object::into_inner)
        .unwrap_or_default())
}

fn integer_field(endpoint: &'static str, field: &'static str, value: Option<&str>) -> Result<i64, RpcError> {
    parse_height(field, value.unwrap_or_default()).map_err(|source| RpcError::Decode { endpoint, source })
}

pub(crate) fn decode_node_status(body: &[u8]) -> Result<NodeStatus, RpcError> {
    let result: StatusResult = decode_result(STATUS_PATH, body)?;
    let node_info = result.node_info.map(Object::into_inner).unwrap_or_default();
    let sync_info = result.sync_info.map(Object::into_inner).unwrap_or_default();

    let latest_block_height = integer_field(
        STATUS_PATH,
        "latest_block_height",
        sync_info.latest_block_height.as_deref(),
    )?;
    let earliest_block_height = integer_field(
        STATUS_PATH,
        "earliest_block_height",
        sync_info.earliest_block_height.as_deref(),
    )?;

    Ok(NodeStatus {
        moniker: node_info.moniker.unwrap_or_default(),
        network: node_info.network.unwrap_or_default(),
        version: node_info.version.unwrap_or_default(),
        latest_block_height,
        earliest_block_height,
        catching_up: sync_info.catching_up.unwrap_or_default(),
    })
}

pub(crate) fn decode_peers(body: &[u8]) -> Result<Vec<Peer>, RpcError> {
    let result: NetInfoResult = decode_result(NET_INFO_PATH, body)?;

    let peers = result
        .peers
        .unwrap_or_default()
        .into_iter()
        .map(|peer| {
            let peer = peer.into_inner();
            let node_info = peer.node_info.map(Object::into_inner).unwrap_or_default();
            Peer {
                id: node_info.id.unwrap_or_default(),
                moniker: node_info.moniker.unwrap_or_default(),
                remote_ip: peer.remote_ip.unwrap_or_default(),
            }
        })
        .collect();

    Ok(peers)
}

pub(crate) fn decode_unconfirmed_txs(body: &[u8]) -> Result<UnconfirmedTxs, RpcError> {
    let result: UnconfirmedTxsResult = decode_result(UNCONFIRMED_TXS_PATH, body)?;
    let total = integer_field(UNCONFIRMED_TXS_PATH, "total", result.total.as_deref())?;

    Ok(UnconfirmedTxs {
        total,
        txs: result.txs.unwrap_or_default(),
    })
}

/// Re-indents a JSON body with two spaces per level.
///
/// Only whitespace between tokens changes: strings, escapes, numbers and key
/// order are copied byte for byte. A body that is not valid JSON is returned
/// as (lossy) text.
pub(crate) fn pretty_print(body: &[u8]) -> String {
    if serde_json::from_slice::<de::IgnoredAny>(body).is_err() {
        return String::from_utf8_lossy(body).into_owned();
    }
    String::from_utf8_lossy(&reindent(body)).into_owned()
}

/// Rewrites the whitespace of an already validated JSON document.
fn reindent(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + body.len() / 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    // Set after `{` or `[` so that empty containers stay on one line.
    let mut just_opened = false;

    for &byte in body {
        if in_string {
            out.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
            continue;
        }
        if just_opened {
            just_opened = false;
            if matches!(byte, b'}' | b']') {
                depth = depth.saturating_sub(1);
                out.push(byte);
                continue;
            }
            push_newline(&mut out, depth);
        }
        match byte {
            b'"' => {
                in_string = true;
                out.push(byte);
            },
            b'{' | b'[' => {
                out.push(byte);
                depth += 1;
                just_opened = true;
            },
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                push_newline(&mut out, depth);
                out.push(byte);
            },
            b',' => {
                out.push(byte);
                push_newline(&mut out, depth);
            },
            b':' => out.extend_from_slice(b": "),
            _ => out.push(byte),
        }
    }
    out
}

fn push_newline(out: &mut Vec<u8>, depth: usize) {
    out.push(b'\n');
    for _ in 0..depth {
        out.extend_from_slice(b"  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_body(latest: serde_json::Value, earliest: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "jsonrpc": "2.0",
            "id": -1,
            "result": {
                "node_info": {
                    "id": "f3c1",
                    "moniker": "validator-1",
                    "network": "plt-testnet",
                    "version": "0.38.12"
                },
                "sync_info": {
                    "latest_block_hash": "ABCD",
                    "latest_block_height": latest,
                    "earliest_block_height": earliest,
                    "catching_up": true
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_node_status() {
        let status = decode_node_status(&status_body(json!("1042"), json!("1"))).unwrap();
        assert_eq!(
            status,
            NodeStatus {
                moniker: "validator-1".to_string(),
                network: "plt-testnet".to_string(),
                version: "0.38.12".to_string(),
                latest_block_height: 1042,
                earliest_block_height: 1,
                catching_up: true,
            }
        );
    }

    #[test]
    fn test_empty_height_decodes_as_zero() {
        let status = decode_node_status(&status_body(json!(""), json!(""))).unwrap();
        assert_eq!(status.latest_block_height, 0);
        assert_eq!(status.earliest_block_height, 0);
    }

    #[test]
    fn test_missing_sections_decode_as_defaults() {
        let status = decode_node_status(br#"{"result":{}}"#).unwrap();
        assert_eq!(status, NodeStatus::default());

        let status = decode_node_status(br#"{"result":{"sync_info":{"latest_block_height":null}}}"#).unwrap();
        assert_eq!(status.latest_block_height, 0);

        let status = decode_node_status(b"null").unwrap();
        assert_eq!(status, NodeStatus::default());
    }

    #[test]
    fn test_non_numeric_height_names_field() {
        let err = decode_node_status(&status_body(json!("abc"), json!("1"))).unwrap_err();
        match err {
            RpcError::Decode {
                endpoint,
                source: DecodeError::InvalidInteger { field, value, .. },
            } => {
                assert_eq!(endpoint, STATUS_PATH);
                assert_eq!(field, "latest_block_height");
                assert_eq!(value, "abc");
            },
            other => panic!("expected invalid integer error, got {other:?}"),
        }

        let err = decode_node_status(&status_body(json!("7"), json!("x1"))).unwrap_err();
        assert!(err.to_string().contains("earliest_block_height"), "{err}");
    }

    #[test]
    fn test_wrong_json_type_is_decode_error() {
        let err = decode_node_status(&status_body(json!(1042), json!("1"))).unwrap_err();
        assert!(matches!(
            err,
            RpcError::Decode {
                endpoint: STATUS_PATH,
                source: DecodeError::Json(_)
            }
        ));

        let err = decode_peers(br#"{"result":{"peers":{"id":"x"}}}"#).unwrap_err();
        assert!(matches!(err, RpcError::Decode { endpoint: NET_INFO_PATH, .. }));
    }

    #[test]
    fn test_array_in_place_of_object_is_decode_error() {
        let is_json_error = |result: Result<NodeStatus, RpcError>| {
            matches!(
                result,
                Err(RpcError::Decode {
                    endpoint: STATUS_PATH,
                    source: DecodeError::Json(_)
                })
            )
        };

        assert!(is_json_error(decode_node_status(
            br#"[{"node_info":["m","n","v"],"sync_info":["5","1",true]}]"#
        )));
        assert!(is_json_error(decode_node_status(br#"{"result":["m"]}"#)));
        assert!(is_json_error(decode_node_status(br#"{"result":{"sync_info":["5","1",true]}}"#)));
        assert!(is_json_error(decode_node_status(br#"{"result":{"node_info":["m","n","v"]}}"#)));

        let err = decode_peers(br#"{"result":{"peers":[["id","moniker"]]}}"#).unwrap_err();
        assert!(matches!(err, RpcError::Decode { endpoint: NET_INFO_PATH, .. }));
        let err = decode_peers(br#"{"result":{"peers":[{"node_info":["id","moniker"]}]}}"#).unwrap_err();
        assert!(matches!(err, RpcError::Decode { endpoint: NET_INFO_PATH, .. }));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = decode_unconfirmed_txs(b"<html>bad gateway</html>").unwrap_err();
        match err {
            RpcError::Decode { endpoint, source } => {
                assert_eq!(endpoint, UNCONFIRMED_TXS_PATH);
                assert!(matches!(source, DecodeError::Json(_)));
            },
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_peers_preserves_order() {
        let body = json!({
            "result": {
                "listening": true,
                "n_peers": "2",
                "peers": [
                    { "node_info": { "id": "bbb", "moniker": "sentry-2" }, "remote_ip": "10.0.0.3" },
                    { "node_info": { "id": "aaa", "moniker": "sentry-1" }, "remote_ip": "10.0.0.2" }
                ]
            }
        });
        let peers = decode_peers(&serde_json::to_vec(&body).unwrap()).unwrap();
        assert_eq!(
            peers,
            vec![
                Peer {
                    id: "bbb".to_string(),
                    moniker: "sentry-2".to_string(),
                    remote_ip: "10.0.0.3".to_string(),
                },
                Peer {
                    id: "aaa".to_string(),
                    moniker: "sentry-1".to_string(),
                    remote_ip: "10.0.0.2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_or_missing_peer_list_is_empty() {
        assert!(decode_peers(br#"{"result":{"peers":[]}}"#).unwrap().is_empty());
        assert!(decode_peers(br#"{"result":{"peers":null}}"#).unwrap().is_empty());
        assert!(decode_peers(br#"{"result":{}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_unconfirmed_txs() {
        let txs = decode_unconfirmed_txs(br#"{"result":{"n_txs":"2","total":"5","total_bytes":"310","txs":["dHgx","dHgy"]}}"#)
            .unwrap();
        assert_eq!(txs.total, 5);
        assert_eq!(txs.txs, vec!["dHgx".to_string(), "dHgy".to_string()]);
    }

    #[test]
    fn test_missing_txs_decode_as_empty() {
        let txs = decode_unconfirmed_txs(br#"{"result":{"total":"0","txs":null}}"#).unwrap();
        assert_eq!(txs, UnconfirmedTxs::default());

        let txs = decode_unconfirmed_txs(br#"{"result":{"total":""}}"#).unwrap();
        assert_eq!(txs.total, 0);
        assert!(txs.txs.is_empty());
    }

    #[test]
    fn test_non_numeric_total_is_decode_error() {
        let err = decode_unconfirmed_txs(br#"{"result":{"total":"lots"}}"#).unwrap_err();
        assert!(matches!(
            err,
            RpcError::Decode {
                source: DecodeError::InvalidInteger { field: "total", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_parse_height_accepts_sign() {
        assert_eq!(parse_height("h", "").unwrap(), 0);
        assert_eq!(parse_height("h", "+12").unwrap(), 12);
        assert_eq!(parse_height("h", "-3").unwrap(), -3);
        assert!(parse_height("h", " 12").is_err());
        assert!(parse_height("h", "9223372036854775808").is_err());
    }

    #[test]
    fn test_pretty_print_indents_and_keeps_key_order() {
        let pretty = pretty_print(br#"{"result":{"zeta":1,"alpha":"two"}}"#);
        assert_eq!(pretty, "{\n  \"result\": {\n    \"zeta\": 1,\n    \"alpha\": \"two\"\n  }\n}");
    }

    #[test]
    fn test_pretty_print_keeps_number_and_string_text() {
        let pretty = pretty_print(br#"{"a":1.50,"b":"<\u003c\"x\"","c":123456789012345678901234567890,"d":1e3}"#);
        assert_eq!(
            pretty,
            "{\n  \"a\": 1.50,\n  \"b\": \"<\\u003c\\\"x\\\"\",\n  \"c\": 123456789012345678901234567890,\n  \"d\": 1e3\n}"
        );
    }

    #[test]
    fn test_pretty_print_normalizes_whitespace() {
        let pretty = pretty_print(b" {\"txs\" : [ ], \"peers\":{},\"ids\":[1, 2],\"s\":\"a, b: {c}\"}\n");
        assert_eq!(
            pretty,
            "{\n  \"txs\": [],\n  \"peers\": {},\n  \"ids\": [\n    1,\n    2\n  ],\n  \"s\": \"a, b: {c}\"\n}"
        );
        assert_eq!(pretty_print(b"[]"), "[]");
        assert_eq!(pretty_print(b"\"plain\""), "\"plain\"");
    }

    #[test]
    fn test_pretty_print_returns_invalid_json_unchanged() {
        assert_eq!(pretty_print(b"not json {"), "not json {");
        assert_eq!(pretty_print(b""), "");
        assert_eq!(pretty_print(b"{\"a\":1} trailing"), "{\"a\":1} trailing");
    }
}
