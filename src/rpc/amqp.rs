//! AMQP request/response client
//!
//! Calls are published to the default exchange, routed by method name, with a
//! fresh correlation id and `reply_to` pointing at an exclusive callback
//! queue owned by this client. The reply with the matching correlation id
//! completes the call; stray replies left over from abandoned calls are
//! dropped. Requests are published as mandatory on a confirming channel, so
//! a call nobody can receive fails instead of waiting for a reply.

use crate::address::Address;
use crate::config::AmqpConfig;
use crate::rpc::protocol::{
    decode_reply, parse_discover_reply, DiscoverRequest, CONTENT_TYPE_JSON, METHOD_DISCOVER,
    METHOD_LIST_COLLECTIONS,
};
use crate::rpc::traits::{DiscoveryClient, DiscoveryError, DiscoveryResult};
use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions,
};
use lapin::publisher_confirm::Confirmation;
use lapin::types::{FieldTable, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// RPC client speaking to platform workers over AMQP
pub struct AmqpRpcClient {
    _connection: Connection,
    channel: Channel,
    reply_queue: ShortString,
    // One call in flight at a time; the lock is held from publish to reply
    replies: Mutex<Consumer>,
}

impl fmt::Debug for AmqpRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmqpRpcClient")
            .field("reply_queue", &self.reply_queue.as_str())
            .finish()
    }
}

impl AmqpRpcClient {
    /// Connects to the broker and prepares the callback queue
    ///
    /// # Arguments
    ///
    /// * `config` - The AMQP endpoint configuration
    ///
    /// # Returns
    ///
    /// * `Ok(AmqpRpcClient)` - Client ready to issue calls
    /// * `Err(lapin::Error)` - Connection, channel or queue setup failed
    pub async fn connect(config: &AmqpConfig) -> Result<Self, lapin::Error> {
        info!("Connecting to AMQP broker at {}:{}", config.host, config.port);

        let connection = Connection::connect(&config.uri(), ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;

        let queue = channel
            .queue_declare(
                "",
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        let reply_queue = queue.name().clone();

        let consumer = channel
            .basic_consume(
                reply_queue.as_str(),
                "wcraas-control",
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!(
            "AMQP RPC client ready (callback queue {})",
            reply_queue.as_str()
        );

        Ok(Self {
            _connection: connection,
            channel,
            reply_queue,
            replies: Mutex::new(consumer),
        })
    }

    /// Invokes `method` on whichever worker consumes its queue
    ///
    /// # Arguments
    ///
    /// * `method` - Remote method name, used as routing key
    /// * `args` - Keyword arguments, serialized as a JSON object
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The decoded reply
    /// * `Err(DiscoveryError)` - Publishing failed, the worker raised, or the
    ///   reply could not be decoded
    pub async fn call<A: Serialize>(&self, method: &str, args: &A) -> Result<Value, DiscoveryError> {
        let body = serde_json::to_vec(args)
            .map_err(|e| DiscoveryError::Malformed(format!("cannot encode request: {}", e)))?;
        let correlation_id = Uuid::new_v4().to_string();

        let mut replies = self.replies.lock().await;

        let properties = BasicProperties::default()
            .with_content_type(ShortString::from(CONTENT_TYPE_JSON.to_string()))
            .with_correlation_id(ShortString::from(correlation_id.clone()))
            .with_reply_to(self.reply_queue.clone());

        debug!("RPC call {} ({})", method, correlation_id);
        let confirmation = self
            .channel
            .basic_publish(
                "",
                method,
                BasicPublishOptions {
                    mandatory: true,
                    ..BasicPublishOptions::default()
                },
                &body,
                properties,
            )
            .await?
            .await?;
        check_delivered(method, confirmation)?;

        while let Some(delivery) = replies.next().await {
            let delivery = delivery?;

            let matches = delivery
                .properties
                .correlation_id()
                .as_ref()
                .is_some_and(|id| id.as_str() == correlation_id);
            if !matches {
                debug!("Dropping reply with stale correlation id");
                continue;
            }

            let kind = delivery.properties.kind().as_ref().map(|k| k.as_str());
            return decode_reply(kind, &delivery.data);
        }

        Err(DiscoveryError::Transport(
            "reply consumer closed before the call completed".to_string(),
        ))
    }
}

/// Fails a call whose request the broker returned or refused
fn check_delivered(method: &str, confirmation: Confirmation) -> Result<(), DiscoveryError> {
    let nacked = confirmation.is_nack();
    if let Some(returned) = confirmation.take_message() {
        return Err(DiscoveryError::Transport(format!(
            "no worker serves '{}' ({} {})",
            method,
            returned.reply_code,
            returned.reply_text.as_str()
        )));
    }
    if nacked {
        return Err(DiscoveryError::Transport(format!(
            "broker refused the '{}' request",
            method
        )));
    }
    Ok(())
}

#[async_trait]
impl DiscoveryClient for AmqpRpcClient {
    async fn discover(&self, address: &Address) -> Result<DiscoveryResult, DiscoveryError> {
        let request = DiscoverRequest {
            url: address.clone(),
        };
        let reply = self.call(METHOD_DISCOVER, &request).await?;
        parse_discover_reply(reply)
    }

    async fn list_collections(&self) -> Result<Value, DiscoveryError> {
        self.call(METHOD_LIST_COLLECTIONS, &json!({})).await
    }
}
