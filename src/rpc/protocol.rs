//! RPC wire format
//!
//! Requests are JSON objects holding the call's keyword arguments, published
//! to the default exchange with the method name as routing key. Replies are
//! JSON too; a reply whose AMQP `type` property is `error` carries the
//! exception the worker raised instead of a result.

use crate::address::Address;
use crate::rpc::traits::{DiscoveryError, DiscoveryResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METHOD_DISCOVER: &str = "discover";
pub const METHOD_LIST_COLLECTIONS: &str = "list_collections";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const REPLY_KIND_ERROR: &str = "error";

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoverRequest {
    pub url: Address,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoverReply {
    pub data: InboundData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InboundData {
    pub inbound: Vec<Address>,
}

/// Decodes a raw reply body into JSON, turning error replies into `Remote`
pub fn decode_reply(kind: Option<&str>, body: &[u8]) -> Result<Value, DiscoveryError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DiscoveryError::Malformed(format!("reply is not JSON: {}", e)))?;

    if kind == Some(REPLY_KIND_ERROR) {
        return Err(DiscoveryError::Remote(describe_remote_error(&value)));
    }

    Ok(value)
}

/// Extracts the inbound addresses from a `discover` reply
///
/// Only `data.inbound` is read; any other field is ignored.
pub fn parse_discover_reply(value: Value) -> Result<DiscoveryResult, DiscoveryError> {
    let reply: DiscoverReply = serde_json::from_value(value)
        .map_err(|e| DiscoveryError::Malformed(format!("unexpected discover reply: {}", e)))?;

    Ok(DiscoveryResult::new(reply.data.inbound))
}

fn describe_remote_error(value: &Value) -> String {
    let error = value.get("error").unwrap_or(value);
    let kind = error.get("type").and_then(Value::as_str);
    let message = error.get("message").and_then(Value::as_str);

    match (kind, message) {
        (Some(kind), Some(message)) => format!("{}: {}", kind, message),
        (None, Some(message)) => message.to_string(),
        (Some(kind), None) => kind.to_string(),
        (None, None) => error.to_string(),
    }
}
