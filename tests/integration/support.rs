use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use wcraas_control::rpc::{DiscoveryClient, DiscoveryError, DiscoveryResult};
use wcraas_control::Address;

/// A scripted worker reply for one address
#[derive(Debug, Clone)]
pub enum Reply {
    Links(Vec<String>),
    Fail(String),
}

/// Discovery backend replaying scripted replies
///
/// Each address may have several scripted replies; they are consumed in
/// order and the last one repeats. Unscripted addresses have no links.
#[derive(Default)]
pub struct ScriptedDiscovery {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(self, from: &str, to: &[&str]) -> Self {
        let to = to.iter().map(|t| t.to_string()).collect();
        self.script(from, Reply::Links(to))
    }

    pub fn fails(self, address: &str, message: &str) -> Self {
        self.script(address, Reply::Fail(message.to_string()))
    }

    fn script(self, address: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscoveryClient for ScriptedDiscovery {
    async fn discover(&self, address: &Address) -> Result<DiscoveryResult, DiscoveryError> {
        self.calls.lock().unwrap().push(address.to_string());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(address.as_str()) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Links(links)) => Ok(DiscoveryResult::new(
                links.into_iter().map(Address::from).collect(),
            )),
            Some(Reply::Fail(message)) => Err(DiscoveryError::Remote(message)),
            None => Ok(DiscoveryResult::default()),
        }
    }

    async fn list_collections(&self) -> Result<Value, DiscoveryError> {
        Ok(json!({ "collections": ["pages", "links"] }))
    }
}

/// Builds an absolute address on a test host
pub fn url(path: &str) -> String {
    format!("https://site.test{}", path)
}
