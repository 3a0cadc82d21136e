// Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{HfsError, Result};

use super::transport::Transport;

enum Reply {
    Body(Value),
    Fail(String),
}

/// Answers each URL with a canned body or transport failure and records
/// every call. Unscripted URLs fail like an unreachable host.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with the raw `body`.
    pub fn reply(&self, url: &str, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Body(body));
    }

    /// Reply with `{ok: true, payload}`.
    pub fn ok(&self, url: &str, payload: Value) {
        self.reply(url, json!({"ok": true, "payload": payload}));
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Fail(message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str, token: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), token.to_string()));

        match self.replies.lock().unwrap().get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail(message)) => Err(HfsError::Other(message.clone())),
            None => Err(HfsError::Other(format!("no route to {url}"))),
        }
    }
}
