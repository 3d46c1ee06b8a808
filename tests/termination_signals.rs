//! A blocked `read` returns once the process receives SIGHUP, SIGINT,
//! SIGTERM or SIGQUIT.
//!
//! Signals are process wide, so every case runs from a single test in its
//! own test binary.
#![cfg(unix)]

use async_trait::async_trait;
use bindings::{handler_fn, Binding, InputBinding, Metadata};
use kafka_binding::KafkaBinding;
use kafka_client::{EventHandler, KafkaClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Accepts every call and remembers the subscription token.
#[derive(Default)]
struct IdleKafka {
    subscribed: Mutex<Option<CancellationToken>>,
}

#[async_trait]
impl KafkaClient for IdleKafka {
    fn init(&mut self, _properties: &HashMap<String, String>) -> kafka_client::Result<()> {
        Ok(())
    }

    async fn publish(
        &self,
        _topic: &str,
        _data: &[u8],
        _metadata: &HashMap<String, String>,
    ) -> kafka_client::Result<()> {
        Ok(())
    }

    async fn add_topic_handler(&self, _topic: &str, _handler: EventHandler) {}

    async fn subscribe(&self, cancel: CancellationToken) -> kafka_client::Result<()> {
        *self.subscribed.lock().unwrap() = Some(cancel);
        Ok(())
    }
}

async fn read_until_signal(signal: libc::c_int) {
    let mut binding = KafkaBinding::with_client(IdleKafka::default());
    binding
        .init(Metadata::new("signals").with_property("topics", "orders"))
        .await
        .unwrap();
    let binding = Arc::new(binding);

    let task = {
        let binding = Arc::clone(&binding);
        let handler = handler_fn(|_response| async { Ok(None) });
        tokio::spawn(async move { binding.read(handler, CancellationToken::new()).await })
    };

    // Handlers are installed before subscribing
    let subscription = loop {
        if let Some(token) = binding.client().subscribed.lock().unwrap().clone() {
            break token;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    // SAFETY: raise only delivers a signal to this process, and tokio has a
    // handler installed for it
    let rc = unsafe { libc::raise(signal) };
    assert_eq!(rc, 0);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap_or_else(|_| panic!("read did not return after signal {signal}"))
        .unwrap()
        .unwrap();
    assert!(subscription.is_cancelled());
}

#[tokio::test]
async fn test_read_returns_on_termination_signals() {
    for signal in [libc::SIGHUP, libc::SIGINT, libc::SIGTERM, libc::SIGQUIT] {
        read_until_signal(signal).await;
    }
}
