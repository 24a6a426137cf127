//! RPC module for delegating work to remote workers
//!
//! This module contains:
//! - The `DiscoveryClient` trait consumed by the crawl loop
//! - The JSON wire format of requests and replies
//! - An AMQP request/response client built on a callback queue

mod amqp;
mod protocol;
mod traits;

pub use amqp::AmqpRpcClient;
pub use protocol::{decode_reply, parse_discover_reply, DiscoverReply, DiscoverRequest, InboundData};
pub use traits::{DiscoveryClient, DiscoveryError, DiscoveryResult};
